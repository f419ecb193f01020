//! System orchestration, startup, and shutdown logic.

pub mod donation_system;
pub mod error;
pub mod tracing;

pub use donation_system::*;
pub use error::*;
pub use self::tracing::*;
