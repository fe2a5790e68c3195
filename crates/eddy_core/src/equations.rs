//! Equations assembled from plain functions.
//!
//! The traits in [`crate::traits`] are checked at compile time. These builders cover the
//! case where the terms arrive one at a time (from configuration or a coupling layer):
//! `build` checks that every required term is present and names the first one missing.

use crate::error::StepperError;
use crate::traits::{ExplicitNavierStokesOde, ImplicitExplicitOde, VectorSpace};

pub type TermFn<S> = Box<dyn Fn(&S) -> S>;
pub type SolveFn<S> = Box<dyn Fn(&S, f64) -> S>;

pub struct ExplicitOdeBuilder<S> {
    explicit_terms: Option<TermFn<S>>,
    pressure_projection: Option<TermFn<S>>,
}

impl<S: VectorSpace> Default for ExplicitOdeBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: VectorSpace> ExplicitOdeBuilder<S> {
    pub fn new() -> Self {
        Self {
            explicit_terms: None,
            pressure_projection: None,
        }
    }

    pub fn explicit_terms(mut self, f: impl Fn(&S) -> S + 'static) -> Self {
        self.explicit_terms = Some(Box::new(f));
        self
    }

    pub fn pressure_projection(mut self, f: impl Fn(&S) -> S + 'static) -> Self {
        self.pressure_projection = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<FnExplicitOde<S>, StepperError> {
        let explicit_terms = self.explicit_terms.ok_or(StepperError::NotImplemented {
            equation: "ExplicitNavierStokesOde",
            term: "explicit_terms",
        })?;
        let pressure_projection = self.pressure_projection.ok_or(StepperError::NotImplemented {
            equation: "ExplicitNavierStokesOde",
            term: "pressure_projection",
        })?;
        Ok(FnExplicitOde {
            explicit_terms,
            pressure_projection,
        })
    }
}

/// An [`ExplicitNavierStokesOde`] backed by two closures.
pub struct FnExplicitOde<S> {
    explicit_terms: TermFn<S>,
    pressure_projection: TermFn<S>,
}

impl<S: VectorSpace> ExplicitNavierStokesOde for FnExplicitOde<S> {
    type State = S;

    fn explicit_terms(&self, state: &S) -> S {
        (self.explicit_terms)(state)
    }

    fn pressure_projection(&self, state: &S) -> S {
        (self.pressure_projection)(state)
    }
}

pub struct ImexOdeBuilder<S> {
    explicit_terms: Option<TermFn<S>>,
    implicit_terms: Option<TermFn<S>>,
    implicit_solve: Option<SolveFn<S>>,
}

impl<S: VectorSpace> Default for ImexOdeBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: VectorSpace> ImexOdeBuilder<S> {
    pub fn new() -> Self {
        Self {
            explicit_terms: None,
            implicit_terms: None,
            implicit_solve: None,
        }
    }

    pub fn explicit_terms(mut self, f: impl Fn(&S) -> S + 'static) -> Self {
        self.explicit_terms = Some(Box::new(f));
        self
    }

    pub fn implicit_terms(mut self, f: impl Fn(&S) -> S + 'static) -> Self {
        self.implicit_terms = Some(Box::new(f));
        self
    }

    /// `f(x, h)` must return `y` with `y - h * implicit_terms(y) = x`.
    pub fn implicit_solve(mut self, f: impl Fn(&S, f64) -> S + 'static) -> Self {
        self.implicit_solve = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<FnImexOde<S>, StepperError> {
        let missing = |term| StepperError::NotImplemented {
            equation: "ImplicitExplicitOde",
            term,
        };
        Ok(FnImexOde {
            explicit_terms: self.explicit_terms.ok_or_else(|| missing("explicit_terms"))?,
            implicit_terms: self.implicit_terms.ok_or_else(|| missing("implicit_terms"))?,
            implicit_solve: self.implicit_solve.ok_or_else(|| missing("implicit_solve"))?,
        })
    }
}

/// An [`ImplicitExplicitOde`] backed by three closures.
pub struct FnImexOde<S> {
    explicit_terms: TermFn<S>,
    implicit_terms: TermFn<S>,
    implicit_solve: SolveFn<S>,
}

impl<S: VectorSpace> ImplicitExplicitOde for FnImexOde<S> {
    type State = S;

    fn explicit_terms(&self, state: &S) -> S {
        (self.explicit_terms)(state)
    }

    fn implicit_terms(&self, state: &S) -> S {
        (self.implicit_terms)(state)
    }

    fn implicit_solve(&self, state: &S, step_size: f64) -> S {
        (self.implicit_solve)(state, step_size)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExplicitOdeBuilder, ImexOdeBuilder};
    use crate::error::StepperError;
    use crate::traits::{ExplicitNavierStokesOde, ImplicitExplicitOde};

    #[test]
    fn explicit_builder_reports_missing_projection() {
        let result = ExplicitOdeBuilder::<f64>::new()
            .explicit_terms(|x| -x)
            .build();
        assert_eq!(
            result.err(),
            Some(StepperError::NotImplemented {
                equation: "ExplicitNavierStokesOde",
                term: "pressure_projection",
            })
        );
    }

    #[test]
    fn imex_builder_reports_first_missing_term() {
        let err = ImexOdeBuilder::<f64>::new()
            .explicit_terms(|_| 0.0)
            .implicit_solve(|x, _| *x)
            .build()
            .err()
            .expect("implicit_terms is missing");
        assert_eq!(
            err.to_string(),
            "ImplicitExplicitOde does not implement `implicit_terms`"
        );
    }

    #[test]
    fn built_equations_forward_to_closures() {
        let explicit = ExplicitOdeBuilder::new()
            .explicit_terms(|x: &f64| 2.0 * x)
            .pressure_projection(|x: &f64| x.clamp(-1.0, 1.0))
            .build()
            .expect("both terms provided");
        assert_eq!(explicit.explicit_terms(&3.0), 6.0);
        assert_eq!(explicit.pressure_projection(&3.0), 1.0);

        let lambda = -2.0;
        let imex = ImexOdeBuilder::new()
            .explicit_terms(|_: &f64| 0.0)
            .implicit_terms(move |x: &f64| lambda * x)
            .implicit_solve(move |x: &f64, h| x / (1.0 - h * lambda))
            .build()
            .expect("all terms provided");
        let y = imex.implicit_solve(&1.0, 0.5);
        assert!((y - 0.5 * imex.implicit_terms(&y) - 1.0).abs() < 1e-15);
    }
}
