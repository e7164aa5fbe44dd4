use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    pub points: i32,    // N, grid points per axis
    pub length: f64,    // L, extent of the domain
    pub amplitude: f64, // A, Dirichlet boundary value
    pub time: f64,      // T, total simulated time
    pub deltat: f64,    // D, time step; also scales diffusion and reaction
    pub snapshots: i32, // P, number of snapshots to write
}

impl Parameters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            points: config.points(),
            length: config.length(),
            amplitude: config.amplitude(),
            time: config.time(),
            deltat: config.deltat(),
            snapshots: config.snapshots(),
        }
    }

    pub fn dx(&self) -> f64 {
        self.length / (self.points as f64 - 1.0)
    }

    pub fn alpha(&self) -> f64 {
        self.deltat / (self.dx() * self.dx())
    }

    pub fn nsteps(&self) -> usize {
        (self.time / self.deltat) as usize
    }

    pub fn snapshot_interval(&self) -> usize {
        (self.nsteps() / self.snapshots as usize).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.points < 3 {
            return Err(Error::invalid_parameters(
                "At least 3 grid points are required",
            ));
        }
        if self.length <= 0.0 {
            return Err(Error::invalid_parameters("Domain length must be > 0"));
        }
        if self.deltat <= 0.0 {
            return Err(Error::invalid_parameters("Time step must be > 0"));
        }
        if self.time < self.deltat {
            return Err(Error::invalid_parameters(
                "Simulated time must cover at least one step",
            ));
        }
        if self.snapshots < 1 {
            return Err(Error::invalid_parameters(
                "At least one snapshot is required",
            ));
        }
        Ok(())
    }

    /// Largest explicit-Euler time step for the 7-point stencil.
    pub fn max_stable_deltat(&self) -> f64 {
        self.dx() * self.dx() / 6.0
    }

    /// Optional pre-flight check; the stepper itself never enforces this.
    pub fn check_stability(&self) -> Result<()> {
        let max_stable = self.max_stable_deltat();
        if self.deltat > max_stable {
            return Err(Error::InvalidParameters(format!(
                "Time step exceeds stability limit (max: {})",
                max_stable
            )));
        }
        Ok(())
    }

    pub fn warn(&self) {
        if self.amplitude < 0.0 || self.amplitude > 1.0 {
            eprintln!("Warning: amplitudes outside [0, 1] can make the logistic reaction diverge");
        }
        if self.snapshots as usize > self.nsteps() {
            eprintln!("Warning: more snapshots requested than time steps taken");
        }
    }
}
