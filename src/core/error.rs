use thiserror::Error;

use crate::behaviour::BehaviourError;
use crate::core::types::ObjectId;
use crate::driver::DriverState;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("object already registered with id {0:?}")]
    AlreadyRegistered(ObjectId),

    #[error("object not registered in this world: {0:?}")]
    NotRegistered(ObjectId),

    #[error("behaviour failed for agent {id:?}: {source}")]
    Behaviour {
        id: ObjectId,
        #[source]
        source: BehaviourError,
    },

    #[error("invalid driver transition: {action}() while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: DriverState,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
