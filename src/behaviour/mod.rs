//! Behaviour framework - pluggable per-tick decision strategies
//!
//! A behaviour is owned by exactly one agent and invoked once per tick to
//! decide that agent's action. Variants share no common mutable state;
//! polymorphism is over the single capability "decide one step".

pub mod composite;
pub mod fsm;
pub mod reactive;

pub use composite::Composite;
pub use fsm::Fsm;
pub use reactive::Reactive;

use thiserror::Error;

use crate::agent::AgentState;
use crate::world::TickCtx;

/// Failure raised inside a behaviour's decision step.
///
/// Surfaced, never swallowed: the world wraps it with the failing agent's id
/// and propagates it out of the tick.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct BehaviourError(pub String);

impl BehaviourError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The polymorphic decision contract.
///
/// `decide` may read any world state through `ctx` and mutate its own agent,
/// but must not structurally mutate the live collection directly; spawn and
/// despawn requests go through `ctx`, which queues them for the end-of-tick
/// flush.
///
/// No timeout guards a decision: a non-terminating `decide` blocks the whole
/// simulation. That is a documented limitation of the core, not a fault it
/// can recover from.
pub trait Behaviour {
    /// Decide one step for the owning agent.
    fn decide(
        &mut self,
        agent: &mut AgentState,
        ctx: &mut TickCtx<'_>,
        dt: f32,
    ) -> Result<(), BehaviourError>;

    /// Whether this behaviour wants to act right now. Used by [`Composite`]
    /// to pick the first applicable sub-behaviour; defaults to always.
    fn applicable(&self, _agent: &AgentState, _ctx: &TickCtx<'_>) -> bool {
        true
    }
}

/// A behaviour that does nothing every tick
pub struct Inert;

impl Behaviour for Inert {
    fn decide(
        &mut self,
        _agent: &mut AgentState,
        _ctx: &mut TickCtx<'_>,
        _dt: f32,
    ) -> Result<(), BehaviourError> {
        Ok(())
    }
}
