//! Donation lifecycle rules and form validation.

mod actions;
pub mod entity;
pub mod error;
pub mod state_machine;
pub mod validation;

pub use actions::*;
pub use error::*;
