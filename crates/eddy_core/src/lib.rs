//! The `eddy_core` crate provides generic time steppers for spatially discretized
//! incompressible Navier-Stokes equations.
//!
//! Key components:
//! - **Traits**: `VectorSpace` (structured state arithmetic), `ExplicitNavierStokesOde` and
//!   `ImplicitExplicitOde` (equation families), `TimeStepper` (one-step advance).
//! - **Tree math**: the `Infix` adapter giving any `VectorSpace` state `+` and `*`.
//! - **Solvers**: explicit Runge-Kutta with pressure projection, and IMEX schemes
//!   (backward/forward Euler, Crank-Nicolson with RK2/RK3/RK4).
//! - **Spectral**: a pseudo-spectral 2-D vorticity equation to drive the IMEX schemes.

pub mod equations;
pub mod error;
pub mod solvers;
pub mod spectral;
pub mod traits;
pub mod tree_math;

pub use error::{ShapeMismatch, StepperError};
pub use traits::{ExplicitNavierStokesOde, ImplicitExplicitOde, TimeStepper, VectorSpace};
