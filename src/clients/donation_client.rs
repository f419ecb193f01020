use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::actor_framework::{Page, ResourceClient};
use crate::cache::{DonationListKey, QueryCache};
use crate::clients::CategoryClient;
use crate::domain::{ActingUser, Donation, DonationFilter, DonationInput, DonationStatus};
use crate::donation_actor::state_machine::{authorize_transition, require};
use crate::donation_actor::validation::prepare_donation;
use crate::donation_actor::{DeleteGuard, DonationAction, DonationError, TransitionRequest, ValidationError};
use crate::permissions::{has_permission, Permission};

/// Client for interacting with the Donation actor.
///
/// Orchestrates the donation use cases: authentication and permission checks
/// and form validation run here before the actor sees a request. Status
/// changes are sent as conditional transitions so the actor decides races.
#[derive(Clone)]
pub struct DonationClient {
    inner: ResourceClient<Donation>,
    category_client: CategoryClient,
    cache: QueryCache,
}

impl_client_methods!(DonationClient, Donation, DonationError, donation);

impl DonationClient {
    pub fn new(inner: ResourceClient<Donation>, category_client: CategoryClient, cache: QueryCache) -> Self {
        Self { inner, category_client, cache }
    }

    #[instrument(skip(self, input, actor), fields(title = %input.title))]
    pub async fn create_donation(
        &self,
        input: DonationInput,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        info!("Processing create_donation request (Client Side)");

        // Step 1: Authenticate and authorize
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        require(actor, Permission::CreateDonation)?;

        // Step 2: Validate the form; the donor is always the acting user
        let params = prepare_donation(input, actor.id).inspect_err(|violation| {
            warn!(field = violation.field, reason = %violation.reason, "Donation form rejected");
        })?;

        // Step 3: Validate category
        match self.category_client.get_category(params.category_id).await {
            Ok(Some(category)) => debug!(category = %category.name, "Category validation successful"),
            Ok(None) => {
                error!(category_id = %params.category_id, "Category not found");
                return Err(ValidationError::new("category_id", "unknown category").into());
            }
            Err(e) => {
                error!(error = %e, "Category validation failed");
                return Err(DonationError::Repository(format!("Category validation failed: {e}")));
            }
        }

        // Step 4: Persist
        let donation = self.inner.create(params).await.map_err(|e| {
            error!(error = %e, "Donation insert failed");
            DonationError::from(e)
        })?;

        self.cache.invalidate_donor_lists(actor.id).await;
        self.cache.invalidate_statistics().await;
        info!(donation_id = %donation.id, donor_id = %actor.id, "Donation created");
        Ok(donation)
    }

    /// Claims an available donation for the acting user. Exactly one of
    /// several concurrent reservations succeeds; the rest get `Conflict`.
    #[instrument(skip(self, actor))]
    pub async fn reserve_donation(
        &self,
        id: Uuid,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        let request = TransitionRequest::new(DonationStatus::Reserved, actor.id)
            .expecting(DonationStatus::Available);
        self.transition(id, request).await
    }

    /// Marks a reserved donation as delivered. Staff with
    /// `update_donation_status` may confirm any delivery; otherwise only the
    /// reserving beneficiary may.
    #[instrument(skip(self, actor))]
    pub async fn confirm_delivery(
        &self,
        id: Uuid,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        let request = TransitionRequest::new(DonationStatus::Delivered, actor.id);
        let request = if has_permission(actor.role, Permission::UpdateDonationStatus) {
            request
        } else {
            let donation = self.load(id).await?;
            authorize_transition(actor, &donation, DonationStatus::Delivered)?;
            request.held_by(actor.id)
        };
        self.transition(id, request).await
    }

    /// Publishes a registered donation.
    #[instrument(skip(self, actor))]
    pub async fn approve_donation(
        &self,
        id: Uuid,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        require(actor, Permission::ApproveDonations)?;
        self.transition(id, TransitionRequest::new(DonationStatus::Available, actor.id)).await
    }

    #[instrument(skip(self, actor))]
    pub async fn cancel_donation(
        &self,
        id: Uuid,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        let donation = self.load(id).await?;
        authorize_transition(actor, &donation, DonationStatus::Cancelled)?;
        self.transition(id, TransitionRequest::new(DonationStatus::Cancelled, actor.id)).await
    }

    /// Gives a reservation back, returning the donation to `disponivel`.
    #[instrument(skip(self, actor))]
    pub async fn cancel_reservation(
        &self,
        id: Uuid,
        actor: Option<&ActingUser>,
    ) -> Result<Donation, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        let donation = self.load(id).await?;
        authorize_transition(actor, &donation, DonationStatus::Available)?;

        let mut request = TransitionRequest::new(DonationStatus::Available, actor.id)
            .expecting(DonationStatus::Reserved);
        if !has_permission(actor.role, Permission::UpdateDonationStatus) {
            request = request.held_by(actor.id);
        }
        self.transition(id, request).await
    }

    /// Removes a donation. Donors may delete their own donation while it is
    /// still `cadastrada`; anything else needs `manage_donations`. The donor
    /// condition is sent along and rechecked by the actor, so a donation
    /// approved after the read is kept.
    #[instrument(skip(self, actor))]
    pub async fn delete_donation(&self, id: Uuid, actor: Option<&ActingUser>) -> Result<(), DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        let donation = self.load(id).await?;
        let guard = if has_permission(actor.role, Permission::ManageDonations) {
            DeleteGuard::Unconditional
        } else {
            let own_draft = donation.donor_id == actor.id && donation.status == DonationStatus::Registered;
            if !own_draft {
                require(actor, Permission::ManageDonations)?;
            }
            DeleteGuard::DraftOf(actor.id)
        };

        self.inner.delete(id, guard).await.map_err(|e| {
            let e = DonationError::from(e);
            match &e {
                DonationError::Conflict { .. } => warn!(donation_id = %id, error = %e, "Delete lost a race"),
                _ => error!(error = %e, "Donation delete failed"),
            }
            e
        })?;
        self.cache.invalidate_all_donation_lists().await;
        self.cache.invalidate_statistics().await;
        info!(donation_id = %id, "Donation deleted");
        Ok(())
    }

    /// The acting user's own donations, newest first.
    #[instrument(skip(self, actor))]
    pub async fn list_my_donations(
        &self,
        actor: Option<&ActingUser>,
        page: Option<Page>,
    ) -> Result<Vec<Donation>, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        require(actor, Permission::ViewOwnDonations)?;
        self.list_cached(DonationListKey::new(DonationFilter::by_donor(actor.id), page)).await
    }

    /// The public catalogue: every `disponivel` donation.
    #[instrument(skip(self, actor))]
    pub async fn list_available_donations(
        &self,
        actor: Option<&ActingUser>,
        page: Option<Page>,
    ) -> Result<Vec<Donation>, DonationError> {
        actor.ok_or(DonationError::Unauthenticated)?;
        let filter = DonationFilter::by_status(DonationStatus::Available);
        self.list_cached(DonationListKey::new(filter, page)).await
    }

    /// Arbitrary filtered listing. Filtering to one's own donations needs
    /// `view_own_donations`; anything broader needs `view_all_donations`.
    #[instrument(skip(self, actor))]
    pub async fn list_donations(
        &self,
        actor: Option<&ActingUser>,
        filter: DonationFilter,
        page: Option<Page>,
    ) -> Result<Vec<Donation>, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        require(actor, listing_permission(actor, &filter))?;
        self.list_cached(DonationListKey::new(filter, page)).await
    }

    #[instrument(skip(self, actor))]
    pub async fn count_donations(
        &self,
        actor: Option<&ActingUser>,
        filter: DonationFilter,
    ) -> Result<u64, DonationError> {
        let actor = actor.ok_or(DonationError::Unauthenticated)?;
        require(actor, listing_permission(actor, &filter))?;
        self.inner.count(filter).await.map_err(DonationError::from)
    }

    async fn load(&self, id: Uuid) -> Result<Donation, DonationError> {
        self.inner.get(id).await?.ok_or(DonationError::NotFound(id))
    }

    async fn transition(&self, id: Uuid, request: TransitionRequest) -> Result<Donation, DonationError> {
        let to = request.to;
        let donation = self
            .inner
            .perform_action(id, DonationAction::Transition(request))
            .await
            .map_err(|e| {
                let e = DonationError::from(e);
                match &e {
                    DonationError::Conflict { .. } => warn!(donation_id = %id, %to, error = %e, "Transition lost a race"),
                    _ => error!(donation_id = %id, %to, error = %e, "Transition failed"),
                }
                e
            })?;

        self.cache.invalidate_all_donation_lists().await;
        self.cache.invalidate_statistics().await;
        info!(donation_id = %id, status = %donation.status, "Donation status changed");
        Ok(donation)
    }

    async fn list_cached(&self, key: DonationListKey) -> Result<Vec<Donation>, DonationError> {
        if let Some(donations) = self.cache.donations(&key).await {
            debug!(donation_count = donations.len(), "Serving donation list from cache");
            return Ok(donations);
        }
        let seen = self.cache.generation().await;
        let donations = self.inner.list(key.filter.clone(), key.page).await.map_err(|e| {
            error!(error = %e, "Donation list failed");
            DonationError::from(e)
        })?;
        self.cache.store_donations(key, donations.clone(), seen).await;
        Ok(donations)
    }
}

fn listing_permission(actor: &ActingUser, filter: &DonationFilter) -> Permission {
    if filter.donor_id == Some(actor.id) {
        Permission::ViewOwnDonations
    } else {
        Permission::ViewAllDonations
    }
}
