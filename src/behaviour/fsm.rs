//! Finite-state behaviour with a condition-table transition rule

use ahash::AHashMap;

use crate::agent::AgentState;
use crate::behaviour::{Behaviour, BehaviourError};
use crate::world::TickCtx;

type Condition = Box<dyn Fn(&AgentState, &TickCtx<'_>) -> bool>;
type StateAction =
    Box<dyn FnMut(&mut AgentState, &mut TickCtx<'_>, f32) -> Result<(), BehaviourError>>;

struct Transition {
    from: String,
    to: String,
    condition: Condition,
}

/// Finite-state controller: named states with per-state actions, plus an
/// ordered condition table of transitions.
///
/// Each tick, the first transition out of the current state whose condition
/// holds fires (tie-break: earliest in the table), then the new current
/// state's action runs. A state declared without an action is a no-op state.
pub struct Fsm {
    current: String,
    actions: AHashMap<String, StateAction>,
    transitions: Vec<Transition>,
}

impl Fsm {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            actions: AHashMap::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare the action run every tick while in `state`
    pub fn on_state<F>(mut self, state: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut AgentState, &mut TickCtx<'_>, f32) -> Result<(), BehaviourError> + 'static,
    {
        self.actions.insert(state.into(), Box::new(action));
        self
    }

    /// Append a row to the transition table
    pub fn transition<C>(mut self, from: impl Into<String>, to: impl Into<String>, condition: C) -> Self
    where
        C: Fn(&AgentState, &TickCtx<'_>) -> bool + 'static,
    {
        self.transitions.push(Transition {
            from: from.into(),
            to: to.into(),
            condition: Box::new(condition),
        });
        self
    }

    /// Name of the current state
    pub fn current(&self) -> &str {
        &self.current
    }
}

impl Behaviour for Fsm {
    fn decide(
        &mut self,
        agent: &mut AgentState,
        ctx: &mut TickCtx<'_>,
        dt: f32,
    ) -> Result<(), BehaviourError> {
        for transition in &self.transitions {
            if transition.from == self.current && (transition.condition)(agent, ctx) {
                self.current = transition.to.clone();
                break;
            }
        }
        match self.actions.get_mut(&self.current) {
            Some(action) => action(agent, ctx, dt),
            None => Ok(()),
        }
    }
}
