use thiserror::Error;

/// Construction-time failures of the stepper families.
///
/// Every variant is raised before a stepper exists; a built stepper never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepperError {
    #[error("inconsistent Butcher tableau: {stages} coupling rows but {weights} weights")]
    InconsistentTableau { stages: usize, weights: usize },

    #[error("Butcher tableau row {row} must hold at least {expected} coefficients, got {found}")]
    RaggedTableau {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "number of RK coefficients does not match: {alphas} alphas, {betas} betas, {gammas} gammas"
    )]
    CoefficientCountMismatch {
        alphas: usize,
        betas: usize,
        gammas: usize,
    },

    #[error("{equation} does not implement `{term}`")]
    NotImplemented {
        equation: &'static str,
        term: &'static str,
    },
}

/// Two structured states disagree on shape (length, matrix dimensions, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shape mismatch: {left} vs {right}")]
pub struct ShapeMismatch {
    pub left: String,
    pub right: String,
}

impl ShapeMismatch {
    pub fn new(left: impl ToString, right: impl ToString) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}
