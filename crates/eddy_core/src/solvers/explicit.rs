use super::log_construction;
use super::tableau::ButcherTableau;
use crate::error::StepperError;
use crate::traits::{ExplicitNavierStokesOde, TimeStepper, VectorSpace};
use crate::tree_math::{wrap, Infix};

/// Forward Runge-Kutta stepper for incompressible Navier-Stokes.
///
/// Implements the reference method (equations 16-21 rather than the fast projection
/// method) of "Fast-Projection Methods for the Incompressible Navier-Stokes Equations",
/// Fluids 2020, 5, 222: every intermediate stage and the final combination are passed
/// through `pressure_projection`.
pub struct ExplicitRungeKutta<E> {
    name: &'static str,
    tableau: ButcherTableau,
    equation: E,
    time_step: f64,
}

impl<E: ExplicitNavierStokesOde> ExplicitRungeKutta<E> {
    pub fn new(tableau: ButcherTableau, equation: E, time_step: f64) -> Self {
        Self::named("navier_stokes_rk", tableau, equation, time_step)
    }

    fn named(name: &'static str, tableau: ButcherTableau, equation: E, time_step: f64) -> Self {
        log_construction(name, tableau.stages(), time_step);
        Self {
            name,
            tableau,
            equation,
            time_step,
        }
    }

    pub fn tableau(&self) -> &ButcherTableau {
        &self.tableau
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn equation(&self) -> &E {
        &self.equation
    }
}

impl<E: ExplicitNavierStokesOde> TimeStepper<E::State> for ExplicitRungeKutta<E> {
    fn step(&self, state: E::State) -> E::State {
        let dt = self.time_step;
        let explicit = |u: &Infix<E::State>| wrap(self.equation.explicit_terms(u.inner()));
        let project = |u: &Infix<E::State>| wrap(self.equation.pressure_projection(u.inner()));

        let num_stages = self.tableau.stages();
        let u0 = wrap(state);
        let mut k = Vec::with_capacity(num_stages);
        k.push(explicit(&u0));

        for i in 1..num_stages {
            let u_star = increment(&u0, dt, self.tableau.a(i), &k);
            let u_i = project(&u_star);
            k.push(explicit(&u_i));
        }

        let u_star = increment(&u0, dt, self.tableau.b(), &k);
        project(&u_star).into_inner()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// `u0 + dt * Σ weights[j] * k[j]` over the non-zero weights.
fn increment<S: VectorSpace>(u0: &Infix<S>, dt: f64, weights: &[f64], k: &[Infix<S>]) -> Infix<S> {
    match weighted_sum(weights, k) {
        Some(sum) => u0 + &(dt * sum),
        None => u0.clone(),
    }
}

/// Reduces from the first non-zero term; a state space need not have a zero element.
fn weighted_sum<S: VectorSpace>(weights: &[f64], k: &[Infix<S>]) -> Option<Infix<S>> {
    weights
        .iter()
        .zip(k)
        .filter(|(weight, _)| **weight != 0.0)
        .map(|(weight, k_j)| *weight * k_j)
        .reduce(|acc, term| acc + term)
}

/// Builds an explicit stepper from raw tableau coefficients.
pub fn navier_stokes_rk<E: ExplicitNavierStokesOde>(
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
    equation: E,
    time_step: f64,
) -> Result<ExplicitRungeKutta<E>, StepperError> {
    let tableau = ButcherTableau::new(a, b)?;
    Ok(ExplicitRungeKutta::new(tableau, equation, time_step))
}

pub fn forward_euler<E: ExplicitNavierStokesOde>(
    equation: E,
    time_step: f64,
) -> ExplicitRungeKutta<E> {
    ExplicitRungeKutta::named(
        "forward_euler",
        ButcherTableau::forward_euler(),
        equation,
        time_step,
    )
}

pub fn midpoint_rk2<E: ExplicitNavierStokesOde>(
    equation: E,
    time_step: f64,
) -> ExplicitRungeKutta<E> {
    ExplicitRungeKutta::named(
        "midpoint_rk2",
        ButcherTableau::midpoint_rk2(),
        equation,
        time_step,
    )
}

pub fn heun_rk2<E: ExplicitNavierStokesOde>(equation: E, time_step: f64) -> ExplicitRungeKutta<E> {
    ExplicitRungeKutta::named("heun_rk2", ButcherTableau::heun_rk2(), equation, time_step)
}

pub fn classic_rk4<E: ExplicitNavierStokesOde>(
    equation: E,
    time_step: f64,
) -> ExplicitRungeKutta<E> {
    ExplicitRungeKutta::named(
        "classic_rk4",
        ButcherTableau::classic_rk4(),
        equation,
        time_step,
    )
}
