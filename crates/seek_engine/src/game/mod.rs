//! Game domain: object registry, session state machine and their errors

pub mod error;
pub mod registry;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::GameError;
pub use registry::{GameObjectDescriptor, ObjectId, ObjectRegistry, RegistryError};
pub use state::{ClickOutcome, GameStateMachine, Phase, SessionSnapshot};
