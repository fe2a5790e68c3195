pub mod explicit;
pub mod imex;
pub mod tableau;

pub use explicit::{
    classic_rk4, forward_euler, heun_rk2, midpoint_rk2, navier_stokes_rk, ExplicitRungeKutta,
};
pub use imex::{
    backward_forward_euler, crank_nicolson_rk2, crank_nicolson_rk3, crank_nicolson_rk4,
    low_storage_runge_kutta_crank_nicolson, BackwardForwardEuler, CrankNicolsonRk2,
    LowStorageRkCn,
};
pub use tableau::{ButcherTableau, LowStorageCoefficients};

use crate::traits::{ExplicitNavierStokesOde, ImplicitExplicitOde, TimeStepper};
use serde::{Deserialize, Serialize};

/// Named explicit Runge-Kutta presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplicitScheme {
    ForwardEuler,
    MidpointRk2,
    HeunRk2,
    ClassicRk4,
}

impl ExplicitScheme {
    pub fn name(self) -> &'static str {
        match self {
            ExplicitScheme::ForwardEuler => "forward_euler",
            ExplicitScheme::MidpointRk2 => "midpoint_rk2",
            ExplicitScheme::HeunRk2 => "heun_rk2",
            ExplicitScheme::ClassicRk4 => "classic_rk4",
        }
    }

    pub fn tableau(self) -> ButcherTableau {
        match self {
            ExplicitScheme::ForwardEuler => ButcherTableau::forward_euler(),
            ExplicitScheme::MidpointRk2 => ButcherTableau::midpoint_rk2(),
            ExplicitScheme::HeunRk2 => ButcherTableau::heun_rk2(),
            ExplicitScheme::ClassicRk4 => ButcherTableau::classic_rk4(),
        }
    }

    pub fn build<'a, E>(self, equation: E, time_step: f64) -> Box<dyn TimeStepper<E::State> + 'a>
    where
        E: ExplicitNavierStokesOde + 'a,
    {
        match self {
            ExplicitScheme::ForwardEuler => Box::new(forward_euler(equation, time_step)),
            ExplicitScheme::MidpointRk2 => Box::new(midpoint_rk2(equation, time_step)),
            ExplicitScheme::HeunRk2 => Box::new(heun_rk2(equation, time_step)),
            ExplicitScheme::ClassicRk4 => Box::new(classic_rk4(equation, time_step)),
        }
    }
}

/// Named implicit-explicit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImexScheme {
    BackwardForwardEuler,
    CrankNicolsonRk2,
    CrankNicolsonRk3,
    CrankNicolsonRk4,
}

impl ImexScheme {
    pub fn name(self) -> &'static str {
        match self {
            ImexScheme::BackwardForwardEuler => "backward_forward_euler",
            ImexScheme::CrankNicolsonRk2 => "crank_nicolson_rk2",
            ImexScheme::CrankNicolsonRk3 => "crank_nicolson_rk3",
            ImexScheme::CrankNicolsonRk4 => "crank_nicolson_rk4",
        }
    }

    pub fn build<'a, E>(self, equation: E, time_step: f64) -> Box<dyn TimeStepper<E::State> + 'a>
    where
        E: ImplicitExplicitOde + 'a,
    {
        match self {
            ImexScheme::BackwardForwardEuler => {
                Box::new(backward_forward_euler(equation, time_step))
            }
            ImexScheme::CrankNicolsonRk2 => Box::new(crank_nicolson_rk2(equation, time_step)),
            ImexScheme::CrankNicolsonRk3 => Box::new(crank_nicolson_rk3(equation, time_step)),
            ImexScheme::CrankNicolsonRk4 => Box::new(crank_nicolson_rk4(equation, time_step)),
        }
    }
}

/// Stepper choice plus step size, as read from a run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepperSettings {
    pub scheme: ImexScheme,
    pub time_step: f64,
}

impl StepperSettings {
    pub fn build<'a, E>(&self, equation: E) -> Box<dyn TimeStepper<E::State> + 'a>
    where
        E: ImplicitExplicitOde + 'a,
    {
        self.scheme.build(equation, self.time_step)
    }
}

fn log_construction(name: &str, stages: usize, time_step: f64) {
    if !time_step.is_finite() || time_step <= 0.0 {
        log::warn!("{name}: time step {time_step} is not a positive finite number");
    }
    log::debug!("built {name} stepper ({stages} stages, dt = {time_step})");
}
