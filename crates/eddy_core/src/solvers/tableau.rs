use crate::error::StepperError;
use serde::{Deserialize, Serialize};

/// Butcher tableau of an explicit Runge-Kutta scheme.
///
/// `a` is strictly lower-triangular and stored without its zero diagonal: row `i`
/// holds the coefficients coupling stage `i + 1` to stages `0..=i`. Rows given padded
/// to a square matrix are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButcherTableau {
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl ButcherTableau {
    pub fn new(mut a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Self, StepperError> {
        if a.len() + 1 != b.len() {
            return Err(StepperError::InconsistentTableau {
                stages: a.len(),
                weights: b.len(),
            });
        }
        for (row, coefficients) in a.iter_mut().enumerate() {
            if coefficients.len() < row + 1 {
                return Err(StepperError::RaggedTableau {
                    row,
                    expected: row + 1,
                    found: coefficients.len(),
                });
            }
            // Entries on or above the diagonal would couple to stages not yet computed.
            if coefficients[row + 1..].iter().any(|c| *c != 0.0) {
                log::warn!("Butcher tableau row {row}: coefficients past stage {row} are ignored");
            }
            coefficients.truncate(row + 1);
        }
        Ok(Self { a, b })
    }

    pub fn forward_euler() -> Self {
        Self {
            a: vec![],
            b: vec![1.0],
        }
    }

    pub fn midpoint_rk2() -> Self {
        Self {
            a: vec![vec![1.0 / 2.0]],
            b: vec![0.0, 1.0],
        }
    }

    pub fn heun_rk2() -> Self {
        Self {
            a: vec![vec![1.0]],
            b: vec![1.0 / 2.0, 1.0 / 2.0],
        }
    }

    pub fn classic_rk4() -> Self {
        Self {
            a: vec![vec![1.0 / 2.0], vec![0.0, 1.0 / 2.0], vec![0.0, 0.0, 1.0]],
            b: vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
        }
    }

    pub fn stages(&self) -> usize {
        self.b.len()
    }

    /// Coupling coefficients for stage `stage` (1-based over the stages after the first).
    pub(crate) fn a(&self, stage: usize) -> &[f64] {
        &self.a[stage - 1]
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }
}

/// Coefficients of a low-storage Runge-Kutta / Crank-Nicolson scheme.
///
/// `alphas` are the stage time fractions (`stages + 1` entries, from 0 to 1), `betas`
/// weight the previous stage increment (`betas[0]` is 0 by convention) and `gammas`
/// weight the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStorageCoefficients {
    alphas: Vec<f64>,
    betas: Vec<f64>,
    gammas: Vec<f64>,
}

impl LowStorageCoefficients {
    pub fn new(alphas: Vec<f64>, betas: Vec<f64>, gammas: Vec<f64>) -> Result<Self, StepperError> {
        if alphas.len() != betas.len() + 1 || betas.len() != gammas.len() {
            return Err(StepperError::CoefficientCountMismatch {
                alphas: alphas.len(),
                betas: betas.len(),
                gammas: gammas.len(),
            });
        }
        if betas.first().is_some_and(|beta| *beta != 0.0) {
            log::warn!(
                "low-storage beta[0] = {} is ignored: the first stage has no previous increment",
                betas[0]
            );
        }
        Ok(Self {
            alphas,
            betas,
            gammas,
        })
    }

    /// Williamson's three-stage scheme.
    pub fn williamson_rk3() -> Self {
        Self {
            alphas: vec![0.0, 1.0 / 3.0, 3.0 / 4.0, 1.0],
            betas: vec![0.0, -5.0 / 9.0, -153.0 / 128.0],
            gammas: vec![1.0 / 3.0, 15.0 / 16.0, 8.0 / 15.0],
        }
    }

    /// Carpenter and Kennedy's five-stage, fourth-order scheme.
    pub fn carpenter_kennedy_rk4() -> Self {
        Self {
            alphas: vec![
                0.0,
                0.1496590219993,
                0.3704009573644,
                0.6222557631345,
                0.9582821306748,
                1.0,
            ],
            betas: vec![
                0.0,
                -0.4178904745,
                -1.192151694643,
                -1.697784692471,
                -1.514183444257,
            ],
            gammas: vec![
                0.1496590219993,
                0.3792103129999,
                0.8229550293869,
                0.6994504559488,
                0.1530572479681,
            ],
        }
    }

    pub fn stages(&self) -> usize {
        self.betas.len()
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    pub fn gammas(&self) -> &[f64] {
        &self.gammas
    }
}

#[cfg(test)]
mod tests {
    use super::{ButcherTableau, LowStorageCoefficients};
    use crate::error::StepperError;
    use proptest::prelude::*;

    #[test]
    fn presets_pass_validation() {
        for tableau in [
            ButcherTableau::forward_euler(),
            ButcherTableau::midpoint_rk2(),
            ButcherTableau::heun_rk2(),
            ButcherTableau::classic_rk4(),
        ] {
            let rebuilt = ButcherTableau::new(tableau.a.clone(), tableau.b.clone())
                .expect("preset tableau should validate");
            assert_eq!(rebuilt, tableau);
        }
        for coefficients in [
            LowStorageCoefficients::williamson_rk3(),
            LowStorageCoefficients::carpenter_kennedy_rk4(),
        ] {
            let rebuilt = LowStorageCoefficients::new(
                coefficients.alphas.clone(),
                coefficients.betas.clone(),
                coefficients.gammas.clone(),
            )
            .expect("preset coefficients should validate");
            assert_eq!(rebuilt, coefficients);
        }
    }

    #[test]
    fn preset_weights_are_consistent() {
        for tableau in [
            ButcherTableau::forward_euler(),
            ButcherTableau::midpoint_rk2(),
            ButcherTableau::heun_rk2(),
            ButcherTableau::classic_rk4(),
        ] {
            let total: f64 = tableau.b().iter().sum();
            assert!((total - 1.0).abs() < 1e-15);
        }
        // Stage increments of a low-storage scheme sum to one full step.
        let rk3 = LowStorageCoefficients::williamson_rk3();
        let last = *rk3.alphas().last().expect("alphas are non-empty");
        assert_eq!(last, 1.0);
    }

    #[test]
    fn carpenter_kennedy_literals_are_exact() {
        let rk4 = LowStorageCoefficients::carpenter_kennedy_rk4();
        assert_eq!(rk4.stages(), 5);
        assert_eq!(rk4.alphas()[3].to_bits(), 0.6222557631345_f64.to_bits());
        assert_eq!(rk4.betas()[1].to_bits(), (-0.4178904745_f64).to_bits());
        assert_eq!(rk4.gammas()[4].to_bits(), 0.1530572479681_f64.to_bits());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = ButcherTableau::new(vec![vec![0.5], vec![0.5]], vec![0.2, 0.3, 0.5])
            .expect_err("second row is too short");
        assert_eq!(
            err,
            StepperError::RaggedTableau {
                row: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn square_padded_rows_are_trimmed() {
        let padded = ButcherTableau::new(
            vec![
                vec![0.5, 0.0, 0.0],
                vec![0.0, 0.5, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
            vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
        )
        .expect("zero padding is accepted");
        assert_eq!(padded, ButcherTableau::classic_rk4());
        assert_eq!(padded.a(1), &[0.5]);

        let midpoint = ButcherTableau::new(vec![vec![0.5, 0.0]], vec![0.0, 1.0])
            .expect("padded midpoint tableau");
        assert_eq!(midpoint, ButcherTableau::midpoint_rk2());
    }

    #[test]
    fn mismatched_low_storage_lengths_are_rejected() {
        let err = LowStorageCoefficients::new(vec![0.0, 0.3, 0.7, 1.0], vec![0.0, 0.1, 0.2], vec![0.3, 0.4])
            .expect_err("gammas are short");
        assert_eq!(
            err,
            StepperError::CoefficientCountMismatch {
                alphas: 4,
                betas: 3,
                gammas: 2,
            }
        );
        assert!(LowStorageCoefficients::new(vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 1.0]).is_err());
    }

    fn triangular(stages: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1..=stages)
            .map(|len| prop::collection::vec(-2.0..2.0f64, len))
            .collect::<Vec<_>>()
    }

    proptest! {
        #[test]
        fn tableau_accepts_consistent_lengths(
            (a, b) in (0usize..6).prop_flat_map(|rows| {
                (triangular(rows), prop::collection::vec(-1.0..1.0f64, rows + 1))
            })
        ) {
            prop_assert!(ButcherTableau::new(a, b).is_ok());
        }

        #[test]
        fn tableau_rejects_inconsistent_lengths(
            rows in 0usize..6,
            weights in 0usize..8,
        ) {
            prop_assume!(rows + 1 != weights);
            let a: Vec<Vec<f64>> = (1..=rows).map(|len| vec![0.5; len]).collect();
            let result = ButcherTableau::new(a, vec![0.25; weights]);
            prop_assert_eq!(
                result,
                Err(StepperError::InconsistentTableau { stages: rows, weights })
            );
        }
    }
}
