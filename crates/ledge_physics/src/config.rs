//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Physics world configuration
///
/// The world runs in a y-down frame so that pixel and meter coordinates share
/// orientation; positive gravity pulls toward the bottom of the screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector in m/s² (default: 10 toward +Y)
    pub gravity: [f32; 2],

    /// Pixels per simulation meter
    pub pixels_per_meter: f32,

    /// Fixed timestep for physics simulation, in seconds
    pub timestep: f32,

    /// Maximum number of substeps per frame
    pub max_substeps: u32,

    /// Solver iterations
    pub solver_iterations: usize,

    /// Enable continuous collision detection on dynamic bodies
    pub ccd_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, 10.0],
            pixels_per_meter: 50.0,
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 4,
            ccd_enabled: true,
        }
    }
}

impl PhysicsConfig {
    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = [x, y];
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_pixels_per_meter(mut self, pixels_per_meter: f32) -> Self {
        self.pixels_per_meter = pixels_per_meter;
        self
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.pixels_per_meter > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "pixels_per_meter must be positive, got {}",
                self.pixels_per_meter
            )));
        }
        if !(self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn pixels_to_meters(&self, pixels: f32) -> f32 {
        pixels / self.pixels_per_meter
    }

    #[inline]
    pub fn meters_to_pixels(&self, meters: f32) -> i32 {
        (meters * self.pixels_per_meter).round() as i32
    }
}
