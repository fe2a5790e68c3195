use super::fft::Fft2d;
use super::forcings::{ForcingSettings, VorticityForcing};
use super::grid::Grid;
use super::utils::{circular_filter_2d, spectral_laplacian, vorticity_to_velocity, VelocitySolve};
use super::SpectralField;
use crate::traits::ImplicitExplicitOde;
use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

fn default_smooth() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavierStokesSettings {
    pub viscosity: f64,
    #[serde(default)]
    pub drag: f64,
    /// Apply the 2/3-rule filter to the advection term.
    #[serde(default = "default_smooth")]
    pub smooth: bool,
    #[serde(default)]
    pub forcing: Option<ForcingSettings>,
}

impl Default for NavierStokesSettings {
    fn default() -> Self {
        Self {
            viscosity: 1e-3,
            drag: 0.0,
            smooth: true,
            forcing: None,
        }
    }
}

impl NavierStokesSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.viscosity.is_finite() || self.viscosity < 0.0 {
            bail!("Viscosity must be a non-negative finite number.");
        }
        if !self.drag.is_finite() || self.drag < 0.0 {
            bail!("Drag must be a non-negative finite number.");
        }
        if let Some(forcing) = &self.forcing {
            forcing.validate()?;
        }
        Ok(())
    }
}

/// Incompressible 2-D Navier-Stokes in vorticity form, solved pseudo-spectrally on a
/// periodic grid.
///
/// ```text
/// ∂ω/∂t = -u·∇ω + f   (explicit)
///       + ν∇²ω - μω   (implicit, diagonal in Fourier space)
/// ```
///
/// The state is the Fourier transform of the vorticity.
pub struct NavierStokes2D {
    grid: Grid,
    viscosity: f64,
    drag: f64,
    smooth: bool,
    forcing: Option<Box<dyn VorticityForcing>>,
    fft: Fft2d,
    velocity: VelocitySolve,
    kx: DMatrix<f64>,
    ky: DMatrix<f64>,
    filter: DMatrix<f64>,
    linear_term: DMatrix<f64>,
}

impl NavierStokes2D {
    pub fn new(grid: Grid, settings: &NavierStokesSettings) -> Result<Self> {
        settings
            .validate()
            .context("Invalid Navier-Stokes settings")?;
        let forcing = settings
            .forcing
            .as_ref()
            .map(|forcing| forcing.build(&grid))
            .transpose()?;

        let (kx, ky) = grid.fft_mesh();
        let linear_term =
            spectral_laplacian(&kx, &ky).map(|l| settings.viscosity * l - settings.drag);
        let filter = circular_filter_2d(&grid);
        log::debug!(
            "Navier-Stokes on a {}x{} grid (viscosity {}, drag {}, smooth {})",
            grid.shape().0,
            grid.shape().1,
            settings.viscosity,
            settings.drag,
            settings.smooth
        );

        Ok(Self {
            fft: Fft2d::new(grid.shape()),
            velocity: vorticity_to_velocity(&grid),
            grid,
            viscosity: settings.viscosity,
            drag: settings.drag,
            smooth: settings.smooth,
            forcing,
            kx,
            ky,
            filter,
            linear_term,
        })
    }

    /// Replaces the forcing.
    pub fn with_forcing(mut self, forcing: impl VorticityForcing + 'static) -> Self {
        self.forcing = Some(Box::new(forcing));
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn viscosity(&self) -> f64 {
        self.viscosity
    }

    pub fn drag(&self) -> f64 {
        self.drag
    }

    /// Fourier symbol of the implicit terms, `ν·Δ̂ - drag`.
    pub fn linear_term(&self) -> &DMatrix<f64> {
        &self.linear_term
    }

    /// Transforms a physical vorticity field into the state representation.
    pub fn vorticity_hat(&self, vorticity: &DMatrix<f64>) -> SpectralField {
        self.fft.forward(vorticity)
    }

    pub fn vorticity(&self, vorticity_hat: &SpectralField) -> DMatrix<f64> {
        self.fft.inverse(vorticity_hat)
    }
}

impl ImplicitExplicitOde for NavierStokes2D {
    type State = SpectralField;

    fn explicit_terms(&self, vorticity_hat: &SpectralField) -> SpectralField {
        let two_pi_i = Complex::new(0.0, 2.0 * PI);
        let (vx_hat, vy_hat) = self.velocity.apply(vorticity_hat);
        let vx = self.fft.inverse(&vx_hat);
        let vy = self.fft.inverse(&vy_hat);

        let grad_x = self
            .fft
            .inverse(&vorticity_hat.zip_map(&self.kx, |w, k| two_pi_i * k * w));
        let grad_y = self
            .fft
            .inverse(&vorticity_hat.zip_map(&self.ky, |w, k| two_pi_i * k * w));

        let advection = -(grad_x.component_mul(&vx) + grad_y.component_mul(&vy));
        let mut terms = self.fft.forward(&advection);
        if self.smooth {
            terms = terms.zip_map(&self.filter, |z, mask| z * mask);
        }
        if let Some(forcing) = &self.forcing {
            terms += self
                .fft
                .forward(&forcing.forcing(&self.grid, vorticity_hat));
        }
        terms
    }

    fn implicit_terms(&self, vorticity_hat: &SpectralField) -> SpectralField {
        vorticity_hat.zip_map(&self.linear_term, |w, l| w * l)
    }

    fn implicit_solve(&self, vorticity_hat: &SpectralField, step_size: f64) -> SpectralField {
        vorticity_hat.zip_map(&self.linear_term, |w, l| w * (1.0 / (1.0 - step_size * l)))
    }
}

/// Kolmogorov flow: Navier-Stokes with drag 0.1 and shear forcing at wavenumber 4.
pub fn forced_navier_stokes_2d(viscosity: f64, grid: Grid, smooth: bool) -> Result<NavierStokes2D> {
    let settings = NavierStokesSettings {
        viscosity,
        drag: 0.1,
        smooth,
        forcing: Some(ForcingSettings::Kolmogorov {
            scale: 1.0,
            wavenumber: 4,
            linear_coefficient: 0.0,
        }),
    };
    NavierStokes2D::new(grid, &settings)
}
