pub mod config;
pub mod error;
pub mod types;

pub use config::DriverConfig;
pub use error::{Result, SimError};
pub use types::{ObjectId, Tick, Vec2};
