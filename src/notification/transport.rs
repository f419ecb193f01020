use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::email::OutgoingEmail;
use super::error::NotificationError;

/// Proof that the transport accepted a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
    pub accepted_at: DateTime<Utc>,
}

/// Outbound email boundary.
pub trait EmailTransport: Send + Sync + 'static {
    fn send(&self, email: OutgoingEmail) -> impl Future<Output = Result<SendReceipt, NotificationError>> + Send;
}

/// Writes messages to the log instead of delivering them. Used when no
/// provider is configured.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl EmailTransport for LogTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt, NotificationError> {
        let receipt = SendReceipt {
            message_id: Uuid::new_v4().to_string(),
            accepted_at: Utc::now(),
        };
        info!(
            message_id = %receipt.message_id,
            to = %email.to,
            subject = %email.subject,
            "Email accepted by log transport"
        );
        Ok(receipt)
    }
}
