//! Volunteer application notifications.
//!
//! A dedicated service formats the application into an email and hands it to
//! an [`EmailTransport`]. The organizational recipient comes from
//! configuration and is never taken from the request.

mod email;
mod error;
mod service;
mod transport;

pub use email::*;
pub use error::*;
pub use service::*;
pub use transport::*;
