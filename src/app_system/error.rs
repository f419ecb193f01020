use thiserror::Error;

use crate::category_actor::CategoryError;
use crate::config::ConfigError;
use crate::session::AuthError;

/// Errors raised while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Category seeding failed: {0}")]
    Seed(#[from] CategoryError),
    #[error("Session error: {0}")]
    Auth(#[from] AuthError),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}
