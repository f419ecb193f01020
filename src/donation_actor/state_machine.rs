//! Donation lifecycle transitions and who may trigger them.
//!
//! ```text
//! cadastrada ─► disponivel ─► reservada ─► entregue
//!                    ▲             │
//!                    └─────────────┘
//! any non-terminal state ─► cancelada
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DonationError;
use crate::domain::{ActingUser, Donation, DonationStatus};
use crate::permissions::{has_permission, Permission};

use DonationStatus::*;

const TRANSITIONS: &[(DonationStatus, DonationStatus)] = &[
    (Registered, Available),
    (Available, Reserved),
    (Reserved, Available),
    (Reserved, Delivered),
    (Registered, Cancelled),
    (Available, Cancelled),
    (Reserved, Cancelled),
];

pub fn is_allowed(from: DonationStatus, to: DonationStatus) -> bool {
    TRANSITIONS.contains(&(from, to))
}

pub fn check_transition(from: DonationStatus, to: DonationStatus) -> Result<(), DonationError> {
    if is_allowed(from, to) {
        Ok(())
    } else {
        Err(DonationError::InvalidTransition { from, to })
    }
}

pub fn allowed_targets(from: DonationStatus) -> Vec<DonationStatus> {
    TRANSITIONS
        .iter()
        .filter(|(source, _)| *source == from)
        .map(|(_, target)| *target)
        .collect()
}

/// Moves `donation` to `to`, applying the side effects of that edge.
///
/// On error the donation is untouched.
pub fn apply_transition(
    donation: &mut Donation,
    to: DonationStatus,
    actor_id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), DonationError> {
    let from = donation.status;
    check_transition(from, to)?;

    match (from, to) {
        (Registered, Available) => {
            donation.available_date = at;
        }
        (Reserved, Available) => {
            donation.beneficiary_id = None;
            donation.reserved_date = None;
        }
        (_, Reserved) => {
            donation.beneficiary_id = Some(actor_id);
            donation.reserved_date = Some(at);
        }
        (_, Delivered) => {
            donation.delivered_date = Some(at);
            donation.reserved_date = None;
        }
        (_, Cancelled) => {
            donation.beneficiary_id = None;
            donation.reserved_date = None;
        }
        _ => {}
    }

    donation.status = to;
    donation.updated_at = at;
    Ok(())
}

/// Checks that `actor` may move `donation` to `to`.
///
/// - reserving only needs an authenticated user;
/// - the donor may always cancel their own donation;
/// - the reserving beneficiary may confirm delivery or give the reservation back;
/// - approval needs `approve_donations`;
/// - everything else needs `update_donation_status`.
pub fn authorize_transition(
    actor: &ActingUser,
    donation: &Donation,
    to: DonationStatus,
) -> Result<(), DonationError> {
    let is_beneficiary = donation.beneficiary_id == Some(actor.id);
    let required = match (donation.status, to) {
        (_, Reserved) => return Ok(()),
        (_, Cancelled) if donation.donor_id == actor.id => return Ok(()),
        (Reserved, Delivered) | (Reserved, Available) if is_beneficiary => return Ok(()),
        (Registered, Available) => Permission::ApproveDonations,
        _ => Permission::UpdateDonationStatus,
    };
    require(actor, required)
}

pub(crate) fn require(actor: &ActingUser, permission: Permission) -> Result<(), DonationError> {
    if has_permission(actor.role, permission) {
        Ok(())
    } else {
        Err(DonationError::Forbidden(format!("role {} lacks {}", actor.role, permission)))
    }
}
