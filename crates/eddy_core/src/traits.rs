use crate::error::ShapeMismatch;

/// A state that behaves like an element of a real vector space.
///
/// Implementations recurse through their structure (record fields, vector entries,
/// matrix elements) down to numeric leaves, so stepper code never needs to know the
/// shape of the state it advances.
pub trait VectorSpace: Clone {
    /// Element-wise sum of two states with identical structure.
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch>;

    /// Multiplies every leaf by `factor`.
    fn scale(&self, factor: f64) -> Self;

    /// Adds `offset` to every leaf.
    fn offset(&self, offset: f64) -> Self;

    /// Human readable shape, used in mismatch reports.
    fn shape_description(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Spatially discretized Navier-Stokes advanced with explicit terms only.
///
/// ```text
/// ∂u/∂t = explicit_terms(u)
///     0 = incompressibility_constraint(u)
/// ```
pub trait ExplicitNavierStokesOde {
    type State: VectorSpace;

    /// Right-hand side of `∂u/∂t`.
    fn explicit_terms(&self, state: &Self::State) -> Self::State;

    /// Projects an unconstrained state back onto the constraint manifold.
    fn pressure_projection(&self, state: &Self::State) -> Self::State;
}

/// An ODE split into explicitly and implicitly integrated terms.
///
/// ```text
/// ∂x/∂t = explicit_terms(x) + implicit_terms(x)
/// ```
///
/// Typically the explicit terms are non-linear and the implicit terms are linear.
pub trait ImplicitExplicitOde {
    type State: VectorSpace;

    fn explicit_terms(&self, state: &Self::State) -> Self::State;

    fn implicit_terms(&self, state: &Self::State) -> Self::State;

    /// Solves `y - step_size * implicit_terms(y) = state` for `y`.
    fn implicit_solve(&self, state: &Self::State, step_size: f64) -> Self::State;
}

/// A single-step advance function closing over a fixed step size and coefficients.
pub trait TimeStepper<S> {
    /// Advances `state` by one time step.
    fn step(&self, state: S) -> S;

    /// Scheme name, e.g. `classic_rk4`.
    fn name(&self) -> &str;
}

impl<E: ExplicitNavierStokesOde + ?Sized> ExplicitNavierStokesOde for &E {
    type State = E::State;

    fn explicit_terms(&self, state: &Self::State) -> Self::State {
        (**self).explicit_terms(state)
    }

    fn pressure_projection(&self, state: &Self::State) -> Self::State {
        (**self).pressure_projection(state)
    }
}

impl<E: ImplicitExplicitOde + ?Sized> ImplicitExplicitOde for &E {
    type State = E::State;

    fn explicit_terms(&self, state: &Self::State) -> Self::State {
        (**self).explicit_terms(state)
    }

    fn implicit_terms(&self, state: &Self::State) -> Self::State {
        (**self).implicit_terms(state)
    }

    fn implicit_solve(&self, state: &Self::State, step_size: f64) -> Self::State {
        (**self).implicit_solve(state, step_size)
    }
}

impl<S, T: TimeStepper<S> + ?Sized> TimeStepper<S> for Box<T> {
    fn step(&self, state: S) -> S {
        (**self).step(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
