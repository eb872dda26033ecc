//! Reactive behaviour - a stateless function of current percepts

use crate::agent::AgentState;
use crate::behaviour::{Behaviour, BehaviourError};
use crate::world::TickCtx;

type Rule = Box<dyn FnMut(&mut AgentState, &mut TickCtx<'_>, f32) -> Result<(), BehaviourError>>;
type Guard = Box<dyn Fn(&AgentState, &TickCtx<'_>) -> bool>;

/// Closure-backed reactive rule.
///
/// Holds no decision state of its own; anything the rule wants to remember
/// across ticks belongs in the agent's memory.
pub struct Reactive {
    rule: Rule,
    guard: Option<Guard>,
}

impl Reactive {
    pub fn new<F>(rule: F) -> Self
    where
        F: FnMut(&mut AgentState, &mut TickCtx<'_>, f32) -> Result<(), BehaviourError> + 'static,
    {
        Self {
            rule: Box::new(rule),
            guard: None,
        }
    }

    /// Attach an applicability guard, used when this rule sits inside a
    /// composite
    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&AgentState, &TickCtx<'_>) -> bool + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }
}

impl Behaviour for Reactive {
    fn decide(
        &mut self,
        agent: &mut AgentState,
        ctx: &mut TickCtx<'_>,
        dt: f32,
    ) -> Result<(), BehaviourError> {
        (self.rule)(agent, ctx, dt)
    }

    fn applicable(&self, agent: &AgentState, ctx: &TickCtx<'_>) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard(agent, ctx))
    }
}
