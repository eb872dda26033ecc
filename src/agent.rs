//! Agents - objects with a perception-decision-action cycle

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::behaviour::{Behaviour, BehaviourError};
use crate::core::types::{ObjectId, Vec2};
use crate::object::Object;
use crate::world::TickCtx;

/// An agent: an object augmented with a behaviour and a per-agent memory.
///
/// The behaviour is held separately from the rest of the agent so a decision
/// step can borrow the agent state mutably while the behaviour runs.
pub struct Agent {
    state: AgentState,
    behaviour: Box<dyn Behaviour>,
}

/// Everything about an agent except its behaviour: the spatial body and the
/// cross-tick memory the behaviour reads and writes.
pub struct AgentState {
    pub object: Object,
    pub memory: Memory,
}

impl Agent {
    pub fn new(object: Object, behaviour: Box<dyn Behaviour>) -> Self {
        Self {
            state: AgentState {
                object,
                memory: Memory::default(),
            },
            behaviour,
        }
    }

    /// Replace the current behaviour. The agent keeps its identity and id.
    ///
    /// The outgoing behaviour is dropped without a lifecycle callback; any
    /// cleanup it needs is the caller's responsibility.
    pub fn set_behaviour(&mut self, behaviour: Box<dyn Behaviour>) {
        self.behaviour = behaviour;
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    pub fn object(&self) -> &Object {
        &self.state.object
    }

    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.state.object
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.state.memory
    }

    /// One tick of the perception-decision-action cycle, called by the world.
    ///
    /// Delegates the decision to the behaviour, then integrates the body's
    /// kinematics. A behaviour failure propagates to the world's tick driver.
    pub(crate) fn update(
        &mut self,
        ctx: &mut TickCtx<'_>,
        dt: f32,
    ) -> Result<(), BehaviourError> {
        self.behaviour.decide(&mut self.state, ctx, dt)?;
        self.state.object.step(dt);
        Ok(())
    }
}

/// Typed values an agent can remember across ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemoryValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Id(ObjectId),
    Point(Vec2),
}

/// Explicit per-agent key-value memory.
///
/// Replaces ad-hoc attribute bags with a declared map; which keys a given
/// behaviour owns is a documentation convention of that behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    slots: AHashMap<String, MemoryValue>,
}

impl Memory {
    pub fn set(&mut self, key: impl Into<String>, value: MemoryValue) {
        self.slots.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MemoryValue> {
        self.slots.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MemoryValue> {
        self.slots.remove(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.slots.get(key) {
            Some(MemoryValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.slots.get(key) {
            Some(MemoryValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.slots.get(key) {
            Some(MemoryValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_id(&self, key: &str) -> Option<ObjectId> {
        match self.slots.get(key) {
            Some(MemoryValue::Id(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_point(&self, key: &str) -> Option<Vec2> {
        match self.slots.get(key) {
            Some(MemoryValue::Point(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::Inert;

    #[test]
    fn test_memory_typed_accessors() {
        let mut memory = Memory::default();
        memory.set("seen", MemoryValue::Bool(true));
        memory.set("count", MemoryValue::Int(3));
        memory.set("home", MemoryValue::Point(Vec2::new(1.0, 2.0)));

        assert_eq!(memory.get_bool("seen"), Some(true));
        assert_eq!(memory.get_int("count"), Some(3));
        assert_eq!(memory.get_point("home"), Some(Vec2::new(1.0, 2.0)));
        // Wrong type reads as absent
        assert_eq!(memory.get_float("count"), None);
        assert_eq!(memory.get("missing"), None);
    }

    #[test]
    fn test_memory_overwrite_and_remove() {
        let mut memory = Memory::default();
        memory.set("k", MemoryValue::Int(1));
        memory.set("k", MemoryValue::Int(2));
        assert_eq!(memory.get_int("k"), Some(2));
        assert_eq!(memory.remove("k"), Some(MemoryValue::Int(2)));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_set_behaviour_keeps_body() {
        let mut agent = Agent::new(Object::new(4.0, 5.0, 0.0), Box::new(Inert));
        agent.memory_mut().set("k", MemoryValue::Int(9));
        agent.set_behaviour(Box::new(Inert));
        assert_eq!(agent.object().position.x, 4.0);
        assert_eq!(agent.memory().get_int("k"), Some(9));
    }
}
