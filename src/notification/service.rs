use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use super::email::{format_volunteer_email, validate_application};
use super::error::NotificationError;
use super::transport::{EmailTransport, SendReceipt};
use crate::clients::NotificationClient;
use crate::config::NotificationConfig;
use crate::domain::VolunteerApplication;
use crate::messages::{NotificationRequest, ServiceResponse};

pub struct NotificationService<T: EmailTransport> {
    receiver: mpsc::Receiver<NotificationRequest>,
    transport: T,
    config: NotificationConfig,
    sent: usize,
}

impl<T: EmailTransport> NotificationService<T> {
    pub fn new(buffer_size: usize, transport: T, config: NotificationConfig) -> (Self, NotificationClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            transport,
            config,
            sent: 0,
        };
        (service, NotificationClient::new(sender))
    }

    #[instrument(name = "notification_service", skip(self))]
    pub async fn run(mut self) {
        info!("NotificationService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                NotificationRequest::NotifyVolunteerApplication { application, respond_to } => {
                    self.handle_volunteer_application(application, respond_to).await;
                }
                NotificationRequest::Shutdown => {
                    info!("NotificationService shutting down");
                    break;
                }
                #[cfg(test)]
                NotificationRequest::GetSentCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.sent));
                }
            }
        }
        info!("NotificationService stopped");
    }

    #[instrument(fields(volunteer = %application.name), skip(self, application, respond_to))]
    async fn handle_volunteer_application(
        &mut self,
        application: VolunteerApplication,
        respond_to: ServiceResponse<SendReceipt, NotificationError>,
    ) {
        if let Err(e) = validate_application(&application) {
            warn!(error = %e, "Volunteer application rejected");
            let _ = respond_to.send(Err(e));
            return;
        }

        let email = format_volunteer_email(&application, &self.config);
        match self.transport.send(email).await {
            Ok(receipt) => {
                self.sent += 1;
                info!(message_id = %receipt.message_id, "Volunteer notification sent");
                let _ = respond_to.send(Ok(receipt));
            }
            Err(e) => {
                error!(error = %e, "Volunteer notification failed");
                let _ = respond_to.send(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::notification::{LogTransport, OutgoingEmail};

    #[derive(Clone, Default)]
    struct RecordingTransport {
        outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
        fail: bool,
    }

    impl EmailTransport for RecordingTransport {
        async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt, NotificationError> {
            if self.fail {
                return Err(NotificationError::Transport("provider unavailable".into()));
            }
            self.outbox.lock().unwrap().push(email);
            Ok(SendReceipt {
                message_id: "msg-1".into(),
                accepted_at: chrono::Utc::now(),
            })
        }
    }

    fn application() -> VolunteerApplication {
        VolunteerApplication {
            name: "Joana Lima".into(),
            email: "joana@gmail.com".into(),
            phone: "(11) 99999-0000".into(),
            interest_areas: vec!["Triagem".into()],
            availability: "Sábados".into(),
            prior_experience: Some("Banco de alimentos".into()),
        }
    }

    #[tokio::test]
    async fn sends_to_the_configured_recipient() {
        let transport = RecordingTransport::default();
        let outbox = transport.outbox.clone();
        let config = NotificationConfig::default();
        let (service, client) = NotificationService::new(4, transport, config.clone());
        tokio::spawn(service.run());

        let receipt = client.notify_volunteer_application(application()).await.unwrap();
        assert_eq!(receipt.message_id, "msg-1");
        assert_eq!(client.get_sent_count().await.unwrap(), 1);

        let sent = outbox.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, config.recipient);
        assert!(sent[0].body.contains("Banco de alimentos"));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_500() {
        let transport = RecordingTransport { fail: true, ..Default::default() };
        let (service, client) = NotificationService::new(4, transport, NotificationConfig::default());
        tokio::spawn(service.run());

        let err = client.notify_volunteer_application(application()).await.unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert_eq!(client.get_sent_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_application_never_reaches_the_transport() {
        let transport = RecordingTransport::default();
        let outbox = transport.outbox.clone();
        let (service, client) = NotificationService::new(4, transport, NotificationConfig::default());
        tokio::spawn(service.run());

        let mut invalid = application();
        invalid.email = "not-an-email".into();
        let err = client.notify_volunteer_application(invalid).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(outbox.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn shutdown_closes_the_service() {
        let (service, client) = NotificationService::new(4, LogTransport, NotificationConfig::default());
        let handle = tokio::spawn(service.run());
        client.shutdown().await.unwrap();
        handle.await.unwrap();

        let err = client.notify_volunteer_application(application()).await.unwrap_err();
        assert!(matches!(err, NotificationError::ActorCommunicationError(_)));
    }
}
