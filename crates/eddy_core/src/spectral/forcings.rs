use super::fft::Fft2d;
use super::grid::Grid;
use super::SpectralField;
use anyhow::{bail, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Physical-space source term of the vorticity equation.
pub trait VorticityForcing {
    fn forcing(&self, grid: &Grid, vorticity_hat: &SpectralField) -> DMatrix<f64>;
}

impl<F> VorticityForcing for F
where
    F: Fn(&Grid, &SpectralField) -> DMatrix<f64>,
{
    fn forcing(&self, grid: &Grid, vorticity_hat: &SpectralField) -> DMatrix<f64> {
        self(grid, vorticity_hat)
    }
}

/// Curl of the shear forcing `f_x = scale · sin(k y)`.
///
/// The wavenumber counts periods across the y extent of the domain, so on `[0, 2π)` the
/// vorticity forcing is `-scale · k · cos(k y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KolmogorovForcing {
    pub scale: f64,
    pub wavenumber: u32,
}

impl VorticityForcing for KolmogorovForcing {
    fn forcing(&self, grid: &Grid, _vorticity_hat: &SpectralField) -> DMatrix<f64> {
        let (_, y) = grid.mesh();
        let (_, (y0, y1)) = grid.domain();
        let k = 2.0 * PI * f64::from(self.wavenumber) / (y1 - y0);
        y.map(|y| -self.scale * k * (k * (y - y0)).cos())
    }
}

/// `coefficient · ω`, a linear damping (negative) or energy injection (positive).
#[derive(Debug, Clone)]
pub struct LinearForcing {
    coefficient: f64,
    fft: Fft2d,
}

impl LinearForcing {
    pub fn new(grid: &Grid, coefficient: f64) -> Self {
        Self {
            coefficient,
            fft: Fft2d::new(grid.shape()),
        }
    }
}

impl VorticityForcing for LinearForcing {
    fn forcing(&self, _grid: &Grid, vorticity_hat: &SpectralField) -> DMatrix<f64> {
        self.fft.inverse(vorticity_hat) * self.coefficient
    }
}

/// Sum of several forcings.
pub struct SumForcing {
    forcings: Vec<Box<dyn VorticityForcing>>,
}

impl VorticityForcing for SumForcing {
    fn forcing(&self, grid: &Grid, vorticity_hat: &SpectralField) -> DMatrix<f64> {
        let (nx, ny) = grid.shape();
        self.forcings
            .iter()
            .fold(DMatrix::zeros(nx, ny), |total, forcing| {
                total + forcing.forcing(grid, vorticity_hat)
            })
    }
}

pub fn sum_forcings(forcings: Vec<Box<dyn VorticityForcing>>) -> SumForcing {
    SumForcing { forcings }
}

/// Serialisable forcing choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForcingSettings {
    Kolmogorov {
        scale: f64,
        wavenumber: u32,
        #[serde(default)]
        linear_coefficient: f64,
    },
    Linear {
        coefficient: f64,
    },
}

impl ForcingSettings {
    pub fn validate(&self) -> Result<()> {
        match self {
            ForcingSettings::Kolmogorov {
                scale,
                wavenumber,
                linear_coefficient,
            } => {
                if !scale.is_finite() || !linear_coefficient.is_finite() {
                    bail!("Kolmogorov forcing coefficients must be finite.");
                }
                if *wavenumber == 0 {
                    bail!("Kolmogorov forcing wavenumber must be positive.");
                }
            }
            ForcingSettings::Linear { coefficient } => {
                if !coefficient.is_finite() {
                    bail!("Linear forcing coefficient must be finite.");
                }
            }
        }
        Ok(())
    }

    pub fn build(&self, grid: &Grid) -> Result<Box<dyn VorticityForcing>> {
        self.validate()?;
        Ok(match *self {
            ForcingSettings::Kolmogorov {
                scale,
                wavenumber,
                linear_coefficient,
            } => {
                let shear = KolmogorovForcing { scale, wavenumber };
                if linear_coefficient == 0.0 {
                    Box::new(shear)
                } else {
                    Box::new(sum_forcings(vec![
                        Box::new(shear),
                        Box::new(LinearForcing::new(grid, linear_coefficient)),
                    ]))
                }
            }
            ForcingSettings::Linear { coefficient } => {
                Box::new(LinearForcing::new(grid, coefficient))
            }
        })
    }
}
