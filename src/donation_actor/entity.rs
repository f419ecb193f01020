use chrono::Utc;
use uuid::Uuid;

use super::actions::{DeleteGuard, DonationAction};
use super::error::DonationError;
use super::state_machine;
use crate::actor_framework::Entity;
use crate::domain::{Donation, DonationCreate, DonationFilter, DonationStatus};

impl Entity for Donation {
    type Id = Uuid;
    type CreateParams = DonationCreate;
    type Patch = ();
    type Filter = DonationFilter;
    type Action = DonationAction;
    type ActionResult = Donation;
    type DeleteGuard = DeleteGuard;
    type Error = DonationError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    /// New donations always start as `cadastrada`.
    fn from_create_params(id: Uuid, params: DonationCreate) -> Result<Self, DonationError> {
        let now = Utc::now();
        Ok(Self {
            id,
            title: params.title,
            description: params.description,
            category_id: params.category_id,
            quantity: params.quantity,
            unit: params.unit,
            status: DonationStatus::Registered,
            donor_id: params.donor_id,
            beneficiary_id: None,
            pickup_address: params.pickup_address,
            delivery_address: params.delivery_address,
            delivery_type: params.delivery_type,
            notes: params.notes,
            available_date: params.available_date.unwrap_or(now),
            reserved_date: None,
            delivered_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Donations change only through status transitions.
    fn on_update(&mut self, _patch: ()) -> Result<(), DonationError> {
        Ok(())
    }

    fn on_delete(&self, guard: &DeleteGuard) -> Result<(), DonationError> {
        let DeleteGuard::DraftOf(donor) = *guard else {
            return Ok(());
        };
        if self.donor_id != donor {
            return Err(DonationError::Forbidden(format!("donation {} is not owned by {donor}", self.id)));
        }
        if self.status != DonationStatus::Registered {
            return Err(DonationError::Conflict {
                id: self.id,
                expected: DonationStatus::Registered,
                actual: self.status,
            });
        }
        Ok(())
    }

    fn matches(&self, filter: &DonationFilter) -> bool {
        filter.matches(self)
    }

    /// Applies a transition. A conditional request whose expected status no
    /// longer holds is a lost race (`Conflict`) unless the donation already
    /// reached a terminal state, which no request can leave.
    fn handle_action(&mut self, action: DonationAction) -> Result<Donation, DonationError> {
        match action {
            DonationAction::Transition(request) => {
                if let Some(expected) = request.expected {
                    if self.status != expected {
                        if self.status.is_terminal() {
                            return Err(DonationError::InvalidTransition {
                                from: self.status,
                                to: request.to,
                            });
                        }
                        return Err(DonationError::Conflict {
                            id: self.id,
                            expected,
                            actual: self.status,
                        });
                    }
                }
                if let Some(beneficiary) = request.beneficiary {
                    if self.beneficiary_id != Some(beneficiary) {
                        return Err(DonationError::Forbidden(format!(
                            "reservation on {} is not held by {beneficiary}",
                            self.id
                        )));
                    }
                }
                state_machine::apply_transition(self, request.to, request.actor_id, request.at)?;
                Ok(self.clone())
            }
        }
    }
}
