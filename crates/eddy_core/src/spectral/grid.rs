use anyhow::{bail, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Periodic, uniformly spaced 2-D grid.
///
/// Matrices defined on the grid are indexed `(i, j)` with `i` along x (rows) and `j`
/// along y (columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    shape: (usize, usize),
    domain: ((f64, f64), (f64, f64)),
}

impl Grid {
    pub fn new(shape: (usize, usize), domain: ((f64, f64), (f64, f64))) -> Result<Self> {
        if shape.0 == 0 || shape.1 == 0 {
            bail!("Grid shape must be positive, got {}x{}.", shape.0, shape.1);
        }
        for (axis, (lower, upper)) in [("x", domain.0), ("y", domain.1)] {
            if !lower.is_finite() || !upper.is_finite() || upper <= lower {
                bail!("Grid domain along {axis} must be a finite, non-empty interval.");
            }
        }
        Ok(Self { shape, domain })
    }

    /// `n x n` grid over `[0, length)^2`.
    pub fn square(n: usize, length: f64) -> Result<Self> {
        Self::new((n, n), ((0.0, length), (0.0, length)))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn domain(&self) -> ((f64, f64), (f64, f64)) {
        self.domain
    }

    pub fn step(&self) -> (f64, f64) {
        let ((x0, x1), (y0, y1)) = self.domain;
        (
            (x1 - x0) / self.shape.0 as f64,
            (y1 - y0) / self.shape.1 as f64,
        )
    }

    /// Physical coordinates of the grid nodes.
    pub fn mesh(&self) -> (DMatrix<f64>, DMatrix<f64>) {
        let (nx, ny) = self.shape;
        let (dx, dy) = self.step();
        let ((x0, _), (y0, _)) = self.domain;
        (
            DMatrix::from_fn(nx, ny, |i, _| x0 + i as f64 * dx),
            DMatrix::from_fn(nx, ny, |_, j| y0 + j as f64 * dy),
        )
    }

    /// Wavenumbers (cycles per unit length) in FFT order along both axes.
    pub fn fft_mesh(&self) -> (DMatrix<f64>, DMatrix<f64>) {
        let (nx, ny) = self.shape;
        let (dx, dy) = self.step();
        let fx = fftfreq(nx, dx);
        let fy = fftfreq(ny, dy);
        (
            DMatrix::from_fn(nx, ny, |i, _| fx[i]),
            DMatrix::from_fn(nx, ny, |_, j| fy[j]),
        )
    }
}

/// Sample frequencies of an `n`-point FFT with sample spacing `spacing`.
pub fn fftfreq(n: usize, spacing: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * spacing);
    let positive = n.div_ceil(2);
    (0..n)
        .map(|i| {
            let index = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            index * scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{fftfreq, Grid};
    use std::f64::consts::PI;

    #[test]
    fn fftfreq_matches_fft_ordering() {
        assert_eq!(fftfreq(4, 0.25), vec![0.0, 1.0, -2.0, -1.0]);
        let odd = fftfreq(5, 1.0);
        let expected = [0.0, 0.2, 0.4, -0.4, -0.2];
        for (got, want) in odd.iter().zip(expected) {
            assert!((got - want).abs() < 1e-15);
        }
    }

    #[test]
    fn fft_mesh_is_in_cycles_per_length() {
        let grid = Grid::square(8, 2.0 * PI).expect("valid grid");
        let (kx, ky) = grid.fft_mesh();
        assert!((kx[(1, 0)] - 1.0 / (2.0 * PI)).abs() < 1e-15);
        assert!((ky[(0, 7)] + 1.0 / (2.0 * PI)).abs() < 1e-15);
        assert_eq!(kx[(3, 5)], kx[(3, 0)]);
    }

    #[test]
    fn mesh_starts_at_domain_origin() {
        let grid = Grid::new((4, 2), ((1.0, 3.0), (-1.0, 1.0))).expect("valid grid");
        assert_eq!(grid.step(), (0.5, 1.0));
        let (x, y) = grid.mesh();
        assert_eq!(x[(3, 1)], 2.5);
        assert_eq!(y[(3, 1)], 0.0);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert!(Grid::new((0, 4), ((0.0, 1.0), (0.0, 1.0)))
            .expect_err("empty shape")
            .to_string()
            .contains("shape"));
        assert!(Grid::new((4, 4), ((0.0, 1.0), (1.0, 1.0)))
            .expect_err("empty interval")
            .to_string()
            .contains("along y"));
    }
}
