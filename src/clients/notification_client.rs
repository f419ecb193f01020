use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::VolunteerApplication;
use crate::messages::NotificationRequest;
use crate::notification::{NotificationError, SendReceipt};

/// Client for the notification service.
#[derive(Clone)]
pub struct NotificationClient {
    sender: mpsc::Sender<NotificationRequest>,
}

impl NotificationClient {
    pub fn new(sender: mpsc::Sender<NotificationRequest>) -> Self {
        Self { sender }
    }

    /// Manual method for special cases (no response needed)
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), NotificationError> {
        debug!("Sending shutdown request");
        self.sender
            .send(NotificationRequest::Shutdown)
            .await
            .map_err(|e| NotificationError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(NotificationClient => fn notify_volunteer_application(application: VolunteerApplication) -> SendReceipt as NotificationRequest::NotifyVolunteerApplication, Error = NotificationError);

#[cfg(test)]
client_method!(NotificationClient => fn get_sent_count() -> usize as NotificationRequest::GetSentCount, Error = NotificationError);
