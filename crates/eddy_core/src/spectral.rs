//! Pseudo-spectral 2-D Navier-Stokes on a periodic grid, the reference
//! `ImplicitExplicitOde` for the IMEX steppers.

pub mod fft;
pub mod forcings;
pub mod grid;
pub mod navier_stokes;
pub mod utils;

use nalgebra::DMatrix;
use num_complex::Complex;

/// Fourier coefficients of a scalar field, in FFT order.
pub type SpectralField = DMatrix<Complex<f64>>;

pub use fft::Fft2d;
pub use forcings::{
    sum_forcings, ForcingSettings, KolmogorovForcing, LinearForcing, SumForcing, VorticityForcing,
};
pub use grid::Grid;
pub use navier_stokes::{forced_navier_stokes_2d, NavierStokes2D, NavierStokesSettings};
pub use utils::{circular_filter_2d, vorticity_to_velocity, VelocitySolve};
