use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::actor_framework::ResourceClient;
use crate::cache::QueryCache;
use crate::domain::{Donation, DonationFilter, DonationStats};

/// Dashboard counters over the donation store.
#[derive(Clone)]
pub struct StatisticsClient {
    inner: ResourceClient<Donation>,
    cache: QueryCache,
}

impl StatisticsClient {
    pub fn new(inner: ResourceClient<Donation>, cache: QueryCache) -> Self {
        Self { inner, cache }
    }

    /// Counts donations per status, optionally restricted to one donor.
    ///
    /// Never fails: a backend error is logged and reported as all zeros,
    /// which is not cached.
    #[instrument(skip(self))]
    pub async fn count_by_status(&self, owner: Option<Uuid>) -> DonationStats {
        if let Some(stats) = self.cache.statistics(owner).await {
            debug!("Serving statistics from cache");
            return stats;
        }

        let seen = self.cache.generation().await;
        let filter = DonationFilter { donor_id: owner, ..Default::default() };
        match self.inner.list(filter, None).await {
            Ok(donations) => {
                let stats = DonationStats::from_donations(&donations);
                self.cache.store_statistics(owner, stats, seen).await;
                debug!(total = stats.total, "Statistics computed");
                stats
            }
            Err(e) => {
                warn!(error = %e, "Statistics unavailable, reporting zeros");
                DonationStats::default()
            }
        }
    }
}
