use tokio::sync::oneshot;

use crate::domain::VolunteerApplication;
use crate::notification::{NotificationError, SendReceipt};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages for services that are not plain resource stores. Each variant
/// carries its parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum NotificationRequest {
    NotifyVolunteerApplication {
        application: VolunteerApplication,
        respond_to: ServiceResponse<SendReceipt, NotificationError>,
    },
    Shutdown,
    #[cfg(test)]
    GetSentCount {
        respond_to: ServiceResponse<usize, NotificationError>,
    },
}
