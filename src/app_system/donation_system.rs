use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::error::SystemError;
use crate::actor_framework::ResourceActor;
use crate::cache::QueryCache;
use crate::clients::{CategoryClient, DonationClient, NotificationClient, StatisticsClient, UserClient};
use crate::config::AppConfig;
use crate::domain::{default_categories, Category, Donation, User};
use crate::notification::{EmailTransport, LogTransport, NotificationService};
use crate::session::{AuthProvider, SessionContext};

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct DonationSystem<A: AuthProvider> {
    pub donation_client: DonationClient,
    pub statistics_client: StatisticsClient,
    pub user_client: UserClient,
    pub category_client: CategoryClient,
    pub notification_client: NotificationClient,
    pub session: SessionContext<A>,
    handles: Vec<JoinHandle<()>>,
}

impl<A: AuthProvider> DonationSystem<A> {
    /// Starts the system with notifications written to the log.
    pub async fn start(config: &AppConfig, auth: A) -> Result<Self, SystemError> {
        Self::start_with_transport(config, auth, LogTransport).await
    }

    /// **Startup Order:**
    /// 1. Resource actors (users, categories, donations) and the notification service
    /// 2. Category seed data
    /// 3. Clients sharing one query cache, and the session over the user client
    #[instrument(name = "donation_system", skip_all)]
    pub async fn start_with_transport<T: EmailTransport>(
        config: &AppConfig,
        auth: A,
        transport: T,
    ) -> Result<Self, SystemError> {
        let buffer_size = config.actors.buffer_size;
        info!(buffer_size, "Starting donation system");

        let (user_actor, user_resource_client) = ResourceActor::<User>::new(buffer_size, Uuid::new_v4);
        let user_handle = tokio::spawn(user_actor.run());

        let (category_actor, category_resource_client) =
            ResourceActor::<Category>::new(buffer_size, Uuid::new_v4);
        let category_handle = tokio::spawn(category_actor.run());

        let (donation_actor, donation_resource_client) =
            ResourceActor::<Donation>::new(buffer_size, Uuid::new_v4);
        let donation_handle = tokio::spawn(donation_actor.run());

        let (notification_service, notification_client) =
            NotificationService::new(buffer_size, transport, config.notification.clone());
        let notification_handle = tokio::spawn(notification_service.run());

        let category_client = CategoryClient::new(category_resource_client);
        category_client.seed(default_categories()).await?;

        let cache = QueryCache::new();
        let user_client = UserClient::new(user_resource_client);
        let donation_client =
            DonationClient::new(donation_resource_client.clone(), category_client.clone(), cache.clone());
        let statistics_client = StatisticsClient::new(donation_resource_client, cache);
        let session = SessionContext::new(auth, user_client.clone());

        info!("Donation system started successfully");

        Ok(Self {
            donation_client,
            statistics_client,
            user_client,
            category_client,
            notification_client,
            session,
            handles: vec![user_handle, category_handle, donation_handle, notification_handle],
        })
    }

    /// Signs out, stops the notification service and waits for every actor.
    ///
    /// Resource actors stop once their last client is dropped, so clones of
    /// the clients handed out earlier must be dropped first.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down donation system");

        if let Err(e) = self.session.sign_out().await {
            warn!(error = %e, "Sign-out during shutdown failed");
        }
        if let Err(e) = self.notification_client.shutdown().await {
            warn!(error = %e, "Notification service already stopped");
        }

        drop(self.session);
        drop(self.donation_client);
        drop(self.statistics_client);
        drop(self.user_client);
        drop(self.category_client);
        drop(self.notification_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("Donation system shutdown complete");
        Ok(())
    }
}
