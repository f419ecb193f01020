use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DonationStatus;

/// Custom actions for Donation entities.
///
/// Status changes go through actions rather than generic updates so that the
/// check and the write happen in one step inside the actor.
#[derive(Debug, Clone)]
pub enum DonationAction {
    /// Moves the donation along the lifecycle.
    Transition(TransitionRequest),
}

#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub to: DonationStatus,
    pub actor_id: Uuid,
    pub at: DateTime<Utc>,
    /// Conditional update: only applies while the stored status equals this.
    pub expected: Option<DonationStatus>,
    /// Only applies while this user still holds the reservation.
    pub beneficiary: Option<Uuid>,
}

impl TransitionRequest {
    pub fn new(to: DonationStatus, actor_id: Uuid) -> Self {
        Self { to, actor_id, at: Utc::now(), expected: None, beneficiary: None }
    }

    pub fn expecting(mut self, status: DonationStatus) -> Self {
        self.expected = Some(status);
        self
    }

    pub fn held_by(mut self, beneficiary: Uuid) -> Self {
        self.beneficiary = Some(beneficiary);
        self
    }
}

/// Conditions the actor rechecks before removing a donation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteGuard {
    /// Staff removal.
    #[default]
    Unconditional,
    /// Only removes while the donation belongs to this donor and is still `cadastrada`.
    DraftOf(Uuid),
}
