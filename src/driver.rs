//! Simulation driver - couples world stepping to a wall-clock cadence
//!
//! The driver is the only place external timing enters the simulation. It is
//! strictly serialized with tick execution: no tick begins before the
//! previous one's mutation-queue flush completes, and stopping takes effect
//! only between ticks.

use std::time::{Duration, Instant};

use crate::core::config::DriverConfig;
use crate::core::error::{Result, SimError};
use crate::world::World;

/// Driver control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Paused,
    Stopped,
    /// A tick returned an error; the driver stays unrunnable until `reset`
    Failed,
}

/// Drives `World::update(dt)` on a configured cadence and exposes
/// start/pause/resume/step/stop/reset controls to the surrounding
/// application.
pub struct SimulationDriver {
    config: DriverConfig,
    state: DriverState,
    world: Option<World>,
    ticks_run: u64,
}

impl SimulationDriver {
    pub fn new(config: DriverConfig, world: World) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: DriverState::Idle,
            world: Some(world),
            ticks_run: 0,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Ticks executed since construction or the last `reset`
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// The driven world, unless released by `stop`
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Mutable world access for input collaborators, between ticks
    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    /// Idle/Stopped -> Running. Fails after `stop` has released the world.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            DriverState::Idle | DriverState::Stopped if self.world.is_some() => {
                self.state = DriverState::Running;
                tracing::info!("driver started");
                Ok(())
            }
            state => Err(SimError::InvalidTransition {
                action: "start",
                state,
            }),
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            DriverState::Running => {
                self.state = DriverState::Paused;
                tracing::info!("driver paused");
                Ok(())
            }
            state => Err(SimError::InvalidTransition {
                action: "pause",
                state,
            }),
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            DriverState::Paused => {
                self.state = DriverState::Running;
                tracing::info!("driver resumed");
                Ok(())
            }
            state => Err(SimError::InvalidTransition {
                action: "resume",
                state,
            }),
        }
    }

    /// Perform exactly one tick. Valid only while Paused or Idle; the driver
    /// returns to the same state afterwards.
    pub fn step(&mut self) -> Result<()> {
        match self.state {
            DriverState::Idle | DriverState::Paused => self.tick_once(),
            state => Err(SimError::InvalidTransition {
                action: "step",
                state,
            }),
        }
    }

    /// Any state -> Stopped. Releases the world; a new run requires `reset`.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
        self.world = None;
        tracing::info!("driver stopped");
    }

    /// Install a fresh world and return to Idle, clearing any failure
    pub fn reset(&mut self, world: World) {
        self.world = Some(world);
        self.state = DriverState::Idle;
        self.ticks_run = 0;
        tracing::info!("driver reset");
    }

    /// Drive the cadence loop: one tick per `1 / tick_rate` seconds of wall
    /// clock, until stopped, failed, or `max_ticks` is reached (which pauses,
    /// leaving the world inspectable). Callable from Idle and Stopped, and
    /// from Paused, where it resumes; once the cap is reached, `step()` is
    /// the only way to tick further.
    ///
    /// A failed tick stops the loop and propagates the error; ticks are not
    /// retried, since partial mutation queues make them unsafe to replay.
    pub fn run(&mut self) -> Result<()> {
        match self.state {
            DriverState::Paused => self.resume()?,
            _ => self.start()?,
        }
        let period = Duration::from_secs_f32(self.config.dt());

        while self.state == DriverState::Running {
            if let Some(max) = self.config.max_ticks {
                if self.ticks_run >= max {
                    self.state = DriverState::Paused;
                    tracing::info!(ticks = self.ticks_run, "max_ticks reached, pausing");
                    break;
                }
            }

            let tick_started = Instant::now();
            self.tick_once()?;

            if let Some(remaining) = period.checked_sub(tick_started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }

    fn tick_once(&mut self) -> Result<()> {
        let dt = self.config.dt();
        let state = self.state;
        let world = self
            .world
            .as_mut()
            .ok_or(SimError::InvalidTransition { action: "step", state })?;

        match world.update(dt) {
            Ok(()) => {
                self.ticks_run += 1;
                Ok(())
            }
            Err(err) => {
                self.state = DriverState::Failed;
                tracing::error!(error = %err, "tick failed, driver entering Failed state");
                Err(err)
            }
        }
    }
}
