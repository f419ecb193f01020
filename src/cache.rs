//! Client-side query cache for donation lists and statistics.
//!
//! Invalidation is best-effort and not transactional with the mutation that
//! triggers it: callers invalidate after the repository call succeeds.
//!
//! Every invalidation bumps a generation counter. A reader records the
//! generation before fetching and hands it back when storing, so a result
//! fetched before an invalidation is never written over it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::actor_framework::Page;
use crate::domain::{Donation, DonationFilter, DonationStats};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DonationListKey {
    pub filter: DonationFilter,
    pub page: Option<Page>,
}

impl DonationListKey {
    pub fn new(filter: DonationFilter, page: Option<Page>) -> Self {
        Self { filter, page }
    }
}

/// Snapshot of the invalidation counter taken before a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Default)]
struct CacheState {
    donation_lists: HashMap<DonationListKey, Vec<Donation>>,
    /// Keyed by owner; `None` is the global dashboard.
    statistics: HashMap<Option<Uuid>, DonationStats>,
    generation: u64,
}

impl CacheState {
    fn is_current(&self, seen: Generation) -> bool {
        if self.generation == seen.0 {
            return true;
        }
        debug!(seen = seen.0, current = self.generation, "Dropping stale cache write");
        false
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<RwLock<CacheState>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn donations(&self, key: &DonationListKey) -> Option<Vec<Donation>> {
        self.state.read().await.donation_lists.get(key).cloned()
    }

    pub async fn generation(&self) -> Generation {
        Generation(self.state.read().await.generation)
    }

    /// Stores a list fetched after `seen` was taken. Returns `false` when an
    /// invalidation happened in between and the write was dropped.
    pub async fn store_donations(&self, key: DonationListKey, donations: Vec<Donation>, seen: Generation) -> bool {
        let mut state = self.state.write().await;
        if !state.is_current(seen) {
            return false;
        }
        state.donation_lists.insert(key, donations);
        true
    }

    pub async fn statistics(&self, owner: Option<Uuid>) -> Option<DonationStats> {
        self.state.read().await.statistics.get(&owner).copied()
    }

    pub async fn store_statistics(&self, owner: Option<Uuid>, stats: DonationStats, seen: Generation) -> bool {
        let mut state = self.state.write().await;
        if !state.is_current(seen) {
            return false;
        }
        state.statistics.insert(owner, stats);
        true
    }

    /// Drops every list that may contain donations of `donor_id`: the
    /// donor's own lists and any list not restricted to a single donor.
    pub async fn invalidate_donor_lists(&self, donor_id: Uuid) {
        let mut state = self.state.write().await;
        state
            .donation_lists
            .retain(|key, _| key.filter.donor_id.is_some_and(|owner| owner != donor_id));
        state.bump();
        debug!(%donor_id, "Invalidated donation lists for donor");
    }

    pub async fn invalidate_all_donation_lists(&self) {
        let mut state = self.state.write().await;
        state.donation_lists.clear();
        state.bump();
        debug!("Invalidated all donation lists");
    }

    pub async fn invalidate_statistics(&self) {
        let mut state = self.state.write().await;
        state.statistics.clear();
        state.bump();
        debug!("Invalidated statistics");
    }
}
