//! Agentarium - a minimal agent-based simulation framework
//!
//! Agents perceive a shared world, decide an action through a pluggable
//! behaviour, and act, while a discrete tick loop advances simulated time.

pub mod agent;
pub mod behaviour;
pub mod core;
pub mod driver;
pub mod influence;
pub mod object;
pub mod spatial;
pub mod world;
