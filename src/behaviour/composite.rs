//! Composite behaviour - prioritized delegation to sub-behaviours

use crate::agent::AgentState;
use crate::behaviour::{Behaviour, BehaviourError};
use crate::world::TickCtx;

/// Delegates each tick to the first applicable sub-behaviour.
///
/// Sub-behaviours are tried in the order they were added; ties break toward
/// the earliest in the list. A tick where no sub-behaviour is applicable is a
/// no-op.
#[derive(Default)]
pub struct Composite {
    children: Vec<Box<dyn Behaviour>>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-behaviour at the lowest priority so far
    pub fn then(mut self, child: Box<dyn Behaviour>) -> Self {
        self.children.push(child);
        self
    }
}

impl Behaviour for Composite {
    fn decide(
        &mut self,
        agent: &mut AgentState,
        ctx: &mut TickCtx<'_>,
        dt: f32,
    ) -> Result<(), BehaviourError> {
        for child in &mut self.children {
            if child.applicable(agent, ctx) {
                return child.decide(agent, ctx, dt);
            }
        }
        Ok(())
    }

    fn applicable(&self, agent: &AgentState, ctx: &TickCtx<'_>) -> bool {
        self.children.iter().any(|child| child.applicable(agent, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, MemoryValue};
    use crate::behaviour::Reactive;
    use crate::object::Object;
    use crate::world::World;

    fn recorder(label: &'static str) -> Reactive {
        Reactive::new(move |state, _ctx, _dt| {
            state.memory.set("ran", MemoryValue::Text(label.into()));
            Ok(())
        })
    }

    #[test]
    fn test_first_applicable_wins() {
        let mut world = World::new();
        let composite = Composite::new()
            .then(Box::new(
                recorder("guarded").with_guard(|state, _ctx| state.object.position.x > 10.0),
            ))
            .then(Box::new(recorder("fallback")))
            .then(Box::new(recorder("never")));
        let id = world
            .add_agent(Agent::new(Object::new(0.0, 0.0, 0.0), Box::new(composite)))
            .unwrap();

        world.update(1.0).unwrap();
        let agent = world.get(id).unwrap().as_agent().unwrap();
        assert_eq!(
            agent.memory().get("ran"),
            Some(&MemoryValue::Text("fallback".into()))
        );
    }

    #[test]
    fn test_guard_unblocks_higher_priority() {
        let mut world = World::new();
        let composite = Composite::new()
            .then(Box::new(
                recorder("guarded").with_guard(|state, _ctx| state.object.position.x > 10.0),
            ))
            .then(Box::new(recorder("fallback")));
        let id = world
            .add_agent(Agent::new(Object::new(20.0, 0.0, 0.0), Box::new(composite)))
            .unwrap();

        world.update(1.0).unwrap();
        let agent = world.get(id).unwrap().as_agent().unwrap();
        assert_eq!(
            agent.memory().get("ran"),
            Some(&MemoryValue::Text("guarded".into()))
        );
    }

    #[test]
    fn test_no_applicable_child_is_noop() {
        let mut world = World::new();
        let composite = Composite::new().then(Box::new(
            recorder("guarded").with_guard(|_state, _ctx| false),
        ));
        let id = world
            .add_agent(Agent::new(Object::new(0.0, 0.0, 0.0), Box::new(composite)))
            .unwrap();

        world.update(1.0).unwrap();
        let agent = world.get(id).unwrap().as_agent().unwrap();
        assert!(agent.memory().is_empty());
    }
}
