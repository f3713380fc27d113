//! Game-level error type

use crate::config::ConfigError;
use crate::scene::SceneError;
use super::registry::RegistryError;
use super::state::Phase;

/// Errors raised while setting up or driving a session
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Registry rejected an operation
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Scene assembly failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lifecycle action not allowed in the current phase
    #[error("Cannot {action} while the game is {phase}")]
    InvalidTransition {
        /// Phase the machine was in
        phase: Phase,
        /// Rejected action
        action: &'static str,
    },

    /// A session cannot start without registered objects
    #[error("No game objects registered")]
    EmptyRegistry,
}
