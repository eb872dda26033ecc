//! Driver configuration
//!
//! The core reads no environment variables or files; everything the driver
//! needs is supplied here at construction time.

use crate::core::error::{Result, SimError};

/// Flat configuration set for the simulation driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Tick cadence in ticks per second. `dt` handed to the world each tick
    /// is `1.0 / tick_rate` seconds of simulated time.
    pub tick_rate: f32,

    /// Optional cap on the total number of ticks a `run()` will execute.
    /// `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: None,
        }
    }
}

impl DriverConfig {
    pub fn new(tick_rate: f32) -> Self {
        Self {
            tick_rate,
            max_ticks: None,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tick_rate ({}) must be finite and positive",
                self.tick_rate
            )));
        }
        if self.max_ticks == Some(0) {
            return Err(SimError::InvalidConfig(
                "max_ticks must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }

    /// Simulated seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}
