use super::grid::Grid;
use super::SpectralField;
use nalgebra::DMatrix;
use num_complex::Complex;
use std::f64::consts::PI;

/// Recovers velocity from vorticity through the stream function.
///
/// `ψ̂ = -ω̂ / Δ̂`, `û = ∂ψ/∂y`, `v̂ = -∂ψ/∂x`. The mean mode of `Δ̂` is pinned to one so
/// the (undetermined) mean of `ψ` comes out zero instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct VelocitySolve {
    kx: DMatrix<f64>,
    ky: DMatrix<f64>,
    laplace: DMatrix<f64>,
}

impl VelocitySolve {
    pub fn apply(&self, vorticity_hat: &SpectralField) -> (SpectralField, SpectralField) {
        let two_pi_i = Complex::new(0.0, 2.0 * PI);
        let psi_hat = vorticity_hat.zip_map(&self.laplace, |w, l| -w / l);
        let vx_hat = psi_hat.zip_map(&self.ky, |psi, k| two_pi_i * k * psi);
        let vy_hat = psi_hat.zip_map(&self.kx, |psi, k| -two_pi_i * k * psi);
        (vx_hat, vy_hat)
    }
}

pub fn vorticity_to_velocity(grid: &Grid) -> VelocitySolve {
    let (kx, ky) = grid.fft_mesh();
    let mut laplace = spectral_laplacian(&kx, &ky);
    laplace[(0, 0)] = 1.0;
    VelocitySolve { kx, ky, laplace }
}

/// Symbol of the Laplacian, `(2πi)²(kx² + ky²)`.
pub(crate) fn spectral_laplacian(kx: &DMatrix<f64>, ky: &DMatrix<f64>) -> DMatrix<f64> {
    kx.zip_map(ky, |x, y| -4.0 * PI * PI * (x * x + y * y))
}

/// 2/3-rule dealiasing mask: one where `|k| <= 2/3 · max|kx|`, zero elsewhere.
pub fn circular_filter_2d(grid: &Grid) -> DMatrix<f64> {
    let (kx, ky) = grid.fft_mesh();
    let max_k = kx.amax();
    let cutoff = 2.0 / 3.0 * max_k;
    kx.zip_map(&ky, |x, y| {
        if (x * x + y * y).sqrt() <= cutoff {
            1.0
        } else {
            0.0
        }
    })
}
