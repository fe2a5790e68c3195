//! Implicit-explicit time stepping.
//!
//! Every scheme here treats `explicit_terms` (F) explicitly and `implicit_terms` (G)
//! through `implicit_solve` (G⁻¹), the solver of `y - h·G(y) = x`.

use super::log_construction;
use super::tableau::LowStorageCoefficients;
use crate::error::StepperError;
use crate::traits::{ImplicitExplicitOde, TimeStepper};
use crate::tree_math::{wrap, Infix};

/// Forward Euler on F combined with backward Euler on G. First order accurate.
pub struct BackwardForwardEuler<E> {
    equation: E,
    time_step: f64,
}

impl<E: ImplicitExplicitOde> TimeStepper<E::State> for BackwardForwardEuler<E> {
    fn step(&self, state: E::State) -> E::State {
        let dt = self.time_step;
        let u0 = wrap(state);
        let g = &u0 + &(dt * wrap(self.equation.explicit_terms(u0.inner())));
        self.equation.implicit_solve(g.inner(), dt)
    }

    fn name(&self) -> &str {
        "backward_forward_euler"
    }
}

pub fn backward_forward_euler<E: ImplicitExplicitOde>(
    equation: E,
    time_step: f64,
) -> BackwardForwardEuler<E> {
    log_construction("backward_forward_euler", 1, time_step);
    BackwardForwardEuler {
        equation,
        time_step,
    }
}

/// Crank-Nicolson on G with Heun's second order Runge-Kutta on F.
///
/// Second order accurate. See Chandler & Kerswell, "Invariant recurrent solutions
/// embedded in a turbulent two-dimensional Kolmogorov flow", J. Fluid Mech. 722 (2013),
/// section 3.
pub struct CrankNicolsonRk2<E> {
    equation: E,
    time_step: f64,
}

impl<E: ImplicitExplicitOde> TimeStepper<E::State> for CrankNicolsonRk2<E> {
    fn step(&self, state: E::State) -> E::State {
        let dt = self.time_step;
        let explicit = |u: &Infix<E::State>| wrap(self.equation.explicit_terms(u.inner()));
        let solve = |u: Infix<E::State>, h: f64| wrap(self.equation.implicit_solve(u.inner(), h));

        let u0 = wrap(state);
        let g = &u0 + &(0.5 * dt * wrap(self.equation.implicit_terms(u0.inner())));
        let h1 = explicit(&u0);
        let u1 = solve(&g + &(dt * &h1), 0.5 * dt);
        let h2 = 0.5 * (explicit(&u1) + h1);
        let u2 = solve(g + &(dt * h2), 0.5 * dt);
        u2.into_inner()
    }

    fn name(&self) -> &str {
        "crank_nicolson_rk2"
    }
}

pub fn crank_nicolson_rk2<E: ImplicitExplicitOde>(
    equation: E,
    time_step: f64,
) -> CrankNicolsonRk2<E> {
    log_construction("crank_nicolson_rk2", 2, time_step);
    CrankNicolsonRk2 {
        equation,
        time_step,
    }
}

/// "Low-storage" Runge-Kutta on F with Crank-Nicolson substeps on G.
///
/// Second order accurate for the implicit terms but potentially higher order for the
/// explicit ones, a good trade when the explicit terms dominate (turbulent flows).
/// See Canuto et al., "Spectral Methods: Evolution to Complex Geometries and
/// Applications to Fluid Dynamics" (2007), appendix D.3.
pub struct LowStorageRkCn<E> {
    name: &'static str,
    coefficients: LowStorageCoefficients,
    equation: E,
    time_step: f64,
}

impl<E: ImplicitExplicitOde> LowStorageRkCn<E> {
    pub fn new(coefficients: LowStorageCoefficients, equation: E, time_step: f64) -> Self {
        Self::named(
            "low_storage_runge_kutta_crank_nicolson",
            coefficients,
            equation,
            time_step,
        )
    }

    fn named(
        name: &'static str,
        coefficients: LowStorageCoefficients,
        equation: E,
        time_step: f64,
    ) -> Self {
        log_construction(name, coefficients.stages(), time_step);
        Self {
            name,
            coefficients,
            equation,
            time_step,
        }
    }

    pub fn coefficients(&self) -> &LowStorageCoefficients {
        &self.coefficients
    }
}

impl<E: ImplicitExplicitOde> TimeStepper<E::State> for LowStorageRkCn<E> {
    fn step(&self, state: E::State) -> E::State {
        let dt = self.time_step;
        let alpha = self.coefficients.alphas();
        let beta = self.coefficients.betas();
        let gamma = self.coefficients.gammas();

        let mut u = wrap(state);
        let mut h: Option<Infix<E::State>> = None;
        for k in 0..beta.len() {
            let f = wrap(self.equation.explicit_terms(u.inner()));
            // The increment starts from zero, so the first stage ignores beta[0].
            let h_k = match h {
                Some(previous) => f + beta[k] * previous,
                None => f,
            };
            let mu = 0.5 * dt * (alpha[k + 1] - alpha[k]);
            let g = wrap(self.equation.implicit_terms(u.inner()));
            let rhs = u + &(gamma[k] * dt * &h_k) + mu * g;
            u = wrap(self.equation.implicit_solve(rhs.inner(), mu));
            h = Some(h_k);
        }
        u.into_inner()
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub fn low_storage_runge_kutta_crank_nicolson<E: ImplicitExplicitOde>(
    alphas: Vec<f64>,
    betas: Vec<f64>,
    gammas: Vec<f64>,
    equation: E,
    time_step: f64,
) -> Result<LowStorageRkCn<E>, StepperError> {
    let coefficients = LowStorageCoefficients::new(alphas, betas, gammas)?;
    Ok(LowStorageRkCn::new(coefficients, equation, time_step))
}

/// Crank-Nicolson with Williamson's RK3.
pub fn crank_nicolson_rk3<E: ImplicitExplicitOde>(
    equation: E,
    time_step: f64,
) -> LowStorageRkCn<E> {
    LowStorageRkCn::named(
        "crank_nicolson_rk3",
        LowStorageCoefficients::williamson_rk3(),
        equation,
        time_step,
    )
}

/// Crank-Nicolson with Carpenter and Kennedy's RK4.
pub fn crank_nicolson_rk4<E: ImplicitExplicitOde>(
    equation: E,
    time_step: f64,
) -> LowStorageRkCn<E> {
    LowStorageRkCn::named(
        "crank_nicolson_rk4",
        LowStorageCoefficients::carpenter_kennedy_rk4(),
        equation,
        time_step,
    )
}

#[cfg(test)]
mod tests {
    use super::{
        backward_forward_euler, crank_nicolson_rk2, crank_nicolson_rk3, crank_nicolson_rk4,
        low_storage_runge_kutta_crank_nicolson,
    };
    use crate::error::StepperError;
    use crate::traits::{ImplicitExplicitOde, TimeStepper};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    /// `dx/dt = explicit_rate·x + implicit_rate·x`.
    struct Linear {
        explicit_rate: f64,
        implicit_rate: f64,
    }

    impl ImplicitExplicitOde for Linear {
        type State = f64;

        fn explicit_terms(&self, state: &f64) -> f64 {
            self.explicit_rate * state
        }

        fn implicit_terms(&self, state: &f64) -> f64 {
            self.implicit_rate * state
        }

        fn implicit_solve(&self, state: &f64, step_size: f64) -> f64 {
            state / (1.0 - step_size * self.implicit_rate)
        }
    }

    #[test]
    fn backward_forward_euler_reproduces_backward_euler_iterates() {
        let lambda = -3.0;
        let dt = 0.1;
        let stepper = backward_forward_euler(
            Linear {
                explicit_rate: 0.0,
                implicit_rate: lambda,
            },
            dt,
        );
        let mut u = 1.0;
        let mut expected = 1.0;
        for _ in 0..10 {
            u = stepper.step(u);
            expected /= 1.0 - dt * lambda;
            assert_eq!(u.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn crank_nicolson_rk2_is_crank_nicolson_for_purely_implicit_terms() {
        let lambda = -2.0;
        let dt = 0.05;
        let stepper = crank_nicolson_rk2(
            Linear {
                explicit_rate: 0.0,
                implicit_rate: lambda,
            },
            dt,
        );
        let expected = (1.0 + 0.5 * dt * lambda) / (1.0 - 0.5 * dt * lambda);
        assert_relative_eq!(stepper.step(1.0), expected, max_relative = 1e-14);
    }

    #[test]
    fn low_storage_schemes_match_explicit_rk_for_explicit_terms() {
        // With G = 0 the scheme is a pure low-storage RK on F, so one step of
        // dx/dt = -x should track exp(-dt) to the scheme's order.
        let equation = Linear {
            explicit_rate: -1.0,
            implicit_rate: 0.0,
        };
        let dt: f64 = 0.1;
        let exact = (-dt).exp();
        let rk3 = crank_nicolson_rk3(&equation, dt).step(1.0);
        let rk4 = crank_nicolson_rk4(&equation, dt).step(1.0);
        assert!((rk3 - exact).abs() < 1e-5);
        assert!((rk4 - exact).abs() < 1e-6);
    }

    #[test]
    fn low_storage_rejects_mismatched_coefficients() {
        let calls = Cell::new(0usize);
        struct Counting<'a>(&'a Cell<usize>);
        impl ImplicitExplicitOde for Counting<'_> {
            type State = f64;
            fn explicit_terms(&self, state: &f64) -> f64 {
                self.0.set(self.0.get() + 1);
                *state
            }
            fn implicit_terms(&self, state: &f64) -> f64 {
                *state
            }
            fn implicit_solve(&self, state: &f64, _step_size: f64) -> f64 {
                *state
            }
        }

        let result = low_storage_runge_kutta_crank_nicolson(
            vec![0.0, 0.25, 0.5, 1.0],
            vec![0.0, -0.5, -1.0],
            vec![0.5, 0.5],
            Counting(&calls),
            0.1,
        );
        assert_eq!(
            result.err(),
            Some(StepperError::CoefficientCountMismatch {
                alphas: 4,
                betas: 3,
                gammas: 2,
            })
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn custom_low_storage_coefficients_reproduce_presets() {
        let equation = Linear {
            explicit_rate: -0.7,
            implicit_rate: -1.3,
        };
        let custom = low_storage_runge_kutta_crank_nicolson(
            vec![0.0, 1.0 / 3.0, 3.0 / 4.0, 1.0],
            vec![0.0, -5.0 / 9.0, -153.0 / 128.0],
            vec![1.0 / 3.0, 15.0 / 16.0, 8.0 / 15.0],
            &equation,
            0.2,
        )
        .expect("williamson coefficients are consistent");
        let preset = crank_nicolson_rk3(&equation, 0.2);
        assert_eq!(custom.coefficients(), preset.coefficients());
        assert_eq!(custom.step(1.5).to_bits(), preset.step(1.5).to_bits());
        assert_eq!(preset.name(), "crank_nicolson_rk3");
    }

    #[test]
    fn stepping_twice_differs_from_doubling_the_step() {
        let equation = Linear {
            explicit_rate: -1.0,
            implicit_rate: -4.0,
        };
        let two_steps = {
            let stepper = crank_nicolson_rk2(&equation, 0.1);
            let once = stepper.step(1.0);
            stepper.step(once)
        };
        let one_step = crank_nicolson_rk2(&equation, 0.2).step(1.0);
        assert!((two_steps - one_step).abs() > 1e-6);
    }
}
