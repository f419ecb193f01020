#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::app_system::DonationSystem;
    use crate::cache::QueryCache;
    use crate::clients::{CategoryClient, DonationClient};
    use crate::config::AppConfig;
    use crate::domain::{
        ActingUser, Category, DeliveryType, Donation, DonationFilter, DonationInput, DonationStatus, Role,
    };
    use crate::actor_framework::FrameworkError;
    use crate::donation_actor::{DeleteGuard, DonationAction, DonationError};
    use crate::mock_framework::{
        create_mock_client, expect_action, expect_create, expect_delete, expect_get, expect_list,
    };
    use crate::session::InMemoryAuthProvider;

    fn cesta_basica(category_id: Uuid) -> DonationInput {
        DonationInput {
            title: "Cesta básica".into(),
            category_id: Some(category_id),
            quantity: 5.0,
            unit: "unidade".into(),
            delivery_type: Some(DeliveryType::Pickup),
            pickup_address: Some("Rua X, 123".into()),
            ..Default::default()
        }
    }

    fn donor() -> ActingUser {
        ActingUser::new(Uuid::new_v4(), Role::Donor)
    }

    fn staff() -> ActingUser {
        ActingUser::new(Uuid::new_v4(), Role::Internal)
    }

    fn registered(id: Uuid, donor_id: Uuid) -> Donation {
        let now = Utc::now();
        Donation {
            id,
            title: "Cesta básica".into(),
            description: None,
            category_id: Uuid::new_v4(),
            quantity: 5.0,
            unit: "unidade".into(),
            status: DonationStatus::Registered,
            donor_id,
            beneficiary_id: None,
            pickup_address: Some("Rua X, 123".into()),
            delivery_address: None,
            delivery_type: DeliveryType::Pickup,
            notes: None,
            available_date: now,
            reserved_date: None,
            delivered_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn start_system() -> (DonationSystem<InMemoryAuthProvider>, Uuid) {
        let system = DonationSystem::start(&AppConfig::default(), InMemoryAuthProvider::new())
            .await
            .unwrap();
        let food = system
            .category_client
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Alimentos")
            .unwrap();
        (system, food.id)
    }

    /// Creates a donation as `owner` and has staff approve it.
    async fn available_donation(system: &DonationSystem<InMemoryAuthProvider>, category_id: Uuid, owner: &ActingUser) -> Donation {
        let created = system
            .donation_client
            .create_donation(cesta_basica(category_id), Some(owner))
            .await
            .unwrap();
        system
            .donation_client
            .approve_donation(created.id, Some(&staff()))
            .await
            .unwrap()
    }

    // =========================================================================
    // Client orchestration against mocked actors
    // =========================================================================

    #[tokio::test]
    async fn test_donation_creation_flow() {
        // 1. Setup Mocks
        let (category_inner, mut category_rx) = create_mock_client::<Category>(10);
        let (donation_inner, mut donation_rx) = create_mock_client::<Donation>(10);
        let donation_client =
            DonationClient::new(donation_inner, CategoryClient::new(category_inner), QueryCache::new());

        let actor = donor();
        let category_id = Uuid::new_v4();
        let spoofed_donor = Uuid::new_v4();

        // 2. Execute creation in background with a tampered form
        let task = tokio::spawn(async move {
            let mut input = cesta_basica(category_id);
            input.donor_id = Some(spoofed_donor);
            input.status = Some(DonationStatus::Delivered);
            donation_client.create_donation(input, Some(&actor)).await
        });

        // 3. Verify Interactions
        let (id, responder) = expect_get(&mut category_rx).await.expect("Expected Category Get");
        assert_eq!(id, category_id);
        responder
            .send(Ok(Some(Category {
                id: category_id,
                name: "Alimentos".into(),
                description: None,
                color: None,
                icon: None,
            })))
            .unwrap();

        let (params, responder) = expect_create(&mut donation_rx).await.expect("Expected Donation Create");
        assert_eq!(params.donor_id, actor.id, "donor comes from the session, not the form");
        assert_eq!(params.title, "Cesta básica");
        let now = Utc::now();
        let stored = Donation {
            id: Uuid::new_v4(),
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
            available_date: now,
            reserved_date: None,
            delivered_date: None,
            created_at: now,
            updated_at: now,
        };
        responder.send(Ok(stored.clone())).unwrap();

        // 4. Verify Result
        assert_eq!(task.await.unwrap(), Ok(stored));
    }

    #[tokio::test]
    async fn rejected_forms_never_reach_the_actor() {
        let (category_inner, mut category_rx) = create_mock_client::<Category>(10);
        let (donation_inner, mut donation_rx) = create_mock_client::<Donation>(10);
        let donation_client =
            DonationClient::new(donation_inner, CategoryClient::new(category_inner), QueryCache::new());

        let mut zero = cesta_basica(Uuid::new_v4());
        zero.quantity = 0.0;
        let err = donation_client.create_donation(zero, Some(&donor())).await.unwrap_err();
        assert!(matches!(err, DonationError::Validation(ref v) if v.field == "quantity"));

        let err = donation_client
            .create_donation(cesta_basica(Uuid::new_v4()), None)
            .await
            .unwrap_err();
        assert_eq!(err, DonationError::Unauthenticated);

        assert!(category_rx.try_recv().is_err());
        assert!(donation_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reserve_is_sent_as_a_conditional_transition() {
        let (category_inner, _category_rx) = create_mock_client::<Category>(10);
        let (donation_inner, mut donation_rx) = create_mock_client::<Donation>(10);
        let donation_client =
            DonationClient::new(donation_inner, CategoryClient::new(category_inner), QueryCache::new());
        let beneficiary = donor();
        let donation_id = Uuid::new_v4();

        let task =
            tokio::spawn(async move { donation_client.reserve_donation(donation_id, Some(&beneficiary)).await });

        let (id, action, responder) = expect_action(&mut donation_rx).await.expect("Expected Action");
        assert_eq!(id, donation_id);
        let DonationAction::Transition(request) = action;
        assert_eq!(request.to, DonationStatus::Reserved);
        assert_eq!(request.expected, Some(DonationStatus::Available));
        assert_eq!(request.actor_id, beneficiary.id);

        let conflict = DonationError::Conflict {
            id: donation_id,
            expected: DonationStatus::Available,
            actual: DonationStatus::Reserved,
        };
        responder
            .send(Err(FrameworkError::Entity(conflict.clone())))
            .unwrap();
        assert_eq!(task.await.unwrap(), Err(conflict));
    }

    #[tokio::test]
    async fn draft_delete_sends_the_donor_condition_to_the_actor() {
        let (category_inner, _category_rx) = create_mock_client::<Category>(10);
        let (donation_inner, mut donation_rx) = create_mock_client::<Donation>(10);
        let cache = QueryCache::new();
        let donation_client =
            DonationClient::new(donation_inner, CategoryClient::new(category_inner), cache.clone());
        let owner = donor();
        let donation_id = Uuid::new_v4();

        let task = tokio::spawn(async move { donation_client.delete_donation(donation_id, Some(&owner)).await });

        // The read still shows a draft.
        let (_, responder) = expect_get(&mut donation_rx).await.expect("Expected Get");
        responder.send(Ok(Some(registered(donation_id, owner.id)))).unwrap();

        // Staff approved it before the delete arrived.
        let (id, guard, responder) = expect_delete(&mut donation_rx).await.expect("Expected Delete");
        assert_eq!(id, donation_id);
        assert_eq!(guard, DeleteGuard::DraftOf(owner.id));
        let conflict = DonationError::Conflict {
            id: donation_id,
            expected: DonationStatus::Registered,
            actual: DonationStatus::Available,
        };
        responder.send(Err(FrameworkError::Entity(conflict.clone()))).unwrap();
        assert_eq!(task.await.unwrap(), Err(conflict));
    }

    #[tokio::test]
    async fn list_fetched_across_a_mutation_is_not_cached() {
        let (category_inner, _category_rx) = create_mock_client::<Category>(10);
        let (donation_inner, mut donation_rx) = create_mock_client::<Donation>(10);
        let cache = QueryCache::new();
        let donation_client =
            DonationClient::new(donation_inner, CategoryClient::new(category_inner), cache.clone());
        let viewer = donor();

        let client = donation_client.clone();
        let task = tokio::spawn(async move { client.list_available_donations(Some(&viewer), None).await });
        let (_, _, responder) = expect_list(&mut donation_rx).await.expect("Expected List");

        // A transition commits while the old snapshot is in flight.
        cache.invalidate_all_donation_lists().await;
        responder.send(Ok(Vec::new())).unwrap();
        assert_eq!(task.await.unwrap(), Ok(Vec::new()));

        let task = tokio::spawn(async move { donation_client.list_available_donations(Some(&viewer), None).await });
        let (filter, _, responder) = expect_list(&mut donation_rx).await.expect("Expected a fresh List");
        assert_eq!(filter, DonationFilter::by_status(DonationStatus::Available));
        responder.send(Ok(Vec::new())).unwrap();
        assert!(task.await.unwrap().unwrap().is_empty());
    }

    // =========================================================================
    // Scenarios against the running system
    // =========================================================================

    #[tokio::test]
    async fn cesta_basica_lifecycle() {
        let (system, food) = start_system().await;
        let client = &system.donation_client;
        let (ana, bruno, carla) = (donor(), donor(), donor());

        let created = client.create_donation(cesta_basica(food), Some(&ana)).await.unwrap();
        assert_eq!(created.status, DonationStatus::Registered);
        assert_eq!(created.donor_id, ana.id);

        let err = client.approve_donation(created.id, Some(&ana)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));

        let approved = client.approve_donation(created.id, Some(&staff())).await.unwrap();
        assert_eq!(approved.status, DonationStatus::Available);

        // Two beneficiaries race for the same donation: exactly one wins.
        let (first, second) = tokio::join!(
            client.reserve_donation(created.id, Some(&bruno)),
            client.reserve_donation(created.id, Some(&carla)),
        );
        let (winner, loser) = match (first, second) {
            (Ok(donation), Err(e)) => ((donation, bruno), e),
            (Err(e), Ok(donation)) => ((donation, carla), e),
            other => panic!("expected exactly one reservation to succeed, got {other:?}"),
        };
        assert!(matches!(loser, DonationError::Conflict { .. }));
        let (reserved, holder) = winner;
        assert_eq!(reserved.status, DonationStatus::Reserved);
        assert_eq!(reserved.beneficiary_id, Some(holder.id));
        assert!(reserved.reserved_date.is_some());

        // Reserving again, even by the holder, is a conflict.
        let err = client.reserve_donation(created.id, Some(&holder)).await.unwrap_err();
        assert!(matches!(err, DonationError::Conflict { .. }));

        let delivered = client.confirm_delivery(created.id, Some(&holder)).await.unwrap();
        assert_eq!(delivered.status, DonationStatus::Delivered);
        assert!(delivered.delivered_date.is_some());

        let err = client.reserve_donation(created.id, Some(&carla)).await.unwrap_err();
        assert_eq!(
            err,
            DonationError::InvalidTransition { from: DonationStatus::Delivered, to: DonationStatus::Reserved }
        );
        let err = client.cancel_donation(created.id, Some(&staff())).await.unwrap_err();
        assert_eq!(
            err,
            DonationError::InvalidTransition { from: DonationStatus::Delivered, to: DonationStatus::Cancelled }
        );

        let stored = client.get_donation(created.id).await.unwrap().unwrap();
        assert_eq!(stored, delivered, "rejected transitions leave the record unchanged");

        let stats = system.statistics_client.count_by_status(None).await;
        assert_eq!(stats.total, 1);
        assert_eq!(stats.entregue, 1);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn only_the_holder_confirms_or_returns_a_reservation() {
        let (system, food) = start_system().await;
        let client = &system.donation_client;
        let ana = donor();
        let donation = available_donation(&system, food, &ana).await;
        let (holder, stranger) = (donor(), donor());

        client.reserve_donation(donation.id, Some(&holder)).await.unwrap();

        let err = client.confirm_delivery(donation.id, Some(&stranger)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));
        let err = client.cancel_reservation(donation.id, Some(&stranger)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));

        let released = client.cancel_reservation(donation.id, Some(&holder)).await.unwrap();
        assert_eq!(released.status, DonationStatus::Available);
        assert!(released.beneficiary_id.is_none());
        assert!(released.reserved_date.is_none());

        // The donation can be claimed again.
        let reserved = client.reserve_donation(donation.id, Some(&stranger)).await.unwrap();
        assert_eq!(reserved.beneficiary_id, Some(stranger.id));
    }

    #[tokio::test]
    async fn donors_cancel_and_delete_their_own_donations() {
        let (system, food) = start_system().await;
        let client = &system.donation_client;
        let (ana, bruno) = (donor(), donor());

        let draft = client.create_donation(cesta_basica(food), Some(&ana)).await.unwrap();
        let err = client.delete_donation(draft.id, Some(&bruno)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));
        client.delete_donation(draft.id, Some(&ana)).await.unwrap();
        assert!(client.get_donation(draft.id).await.unwrap().is_none());
        assert_eq!(
            client.delete_donation(draft.id, Some(&ana)).await.unwrap_err(),
            DonationError::NotFound(draft.id)
        );

        let published = available_donation(&system, food, &ana).await;
        let err = client.delete_donation(published.id, Some(&ana)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));

        let err = client.cancel_donation(published.id, Some(&bruno)).await.unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));
        let cancelled = client.cancel_donation(published.id, Some(&ana)).await.unwrap();
        assert_eq!(cancelled.status, DonationStatus::Cancelled);

        let err = client.approve_donation(published.id, Some(&staff())).await.unwrap_err();
        assert_eq!(
            err,
            DonationError::InvalidTransition { from: DonationStatus::Cancelled, to: DonationStatus::Available }
        );
    }

    #[tokio::test]
    async fn lists_and_statistics_follow_mutations() {
        let (system, food) = start_system().await;
        let client = &system.donation_client;
        let (ana, bruno) = (donor(), donor());

        client.create_donation(cesta_basica(food), Some(&ana)).await.unwrap();
        assert_eq!(client.list_my_donations(Some(&ana), None).await.unwrap().len(), 1);
        assert_eq!(system.statistics_client.count_by_status(Some(ana.id)).await.cadastrada, 1);

        // A cached list must not hide the next donation.
        let second = client.create_donation(cesta_basica(food), Some(&ana)).await.unwrap();
        let mine = client.list_my_donations(Some(&ana), None).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id, "newest first");
        assert_eq!(system.statistics_client.count_by_status(Some(ana.id)).await.cadastrada, 2);

        assert!(client.list_available_donations(Some(&bruno), None).await.unwrap().is_empty());
        client.approve_donation(second.id, Some(&staff())).await.unwrap();
        let available = client.list_available_donations(Some(&bruno), None).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, second.id);

        // Seeing someone else's donations needs view_all_donations.
        let err = client
            .list_donations(Some(&bruno), DonationFilter::by_donor(ana.id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DonationError::Forbidden(_)));
        let all = client.list_donations(Some(&staff()), DonationFilter::default(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            client
                .count_donations(Some(&ana), DonationFilter::by_donor(ana.id))
                .await
                .unwrap(),
            2
        );

        let stats = system.statistics_client.count_by_status(None).await;
        assert_eq!((stats.total, stats.cadastrada, stats.disponivel), (2, 1, 1));
    }

    #[tokio::test]
    async fn unknown_category_is_a_validation_error() {
        let (system, _) = start_system().await;
        let err = system
            .donation_client
            .create_donation(cesta_basica(Uuid::new_v4()), Some(&donor()))
            .await
            .unwrap_err();
        assert!(matches!(err, DonationError::Validation(ref v) if v.field == "category_id"));
    }

    #[tokio::test]
    async fn signed_in_session_drives_donations() {
        let auth = InMemoryAuthProvider::new();
        auth.register("ana@gmail.com", "segredo123").await.unwrap();
        let system = DonationSystem::start(&AppConfig::default(), auth).await.unwrap();
        let food = system.category_client.list_categories().await.unwrap()[0].id;

        let err = system
            .donation_client
            .create_donation(cesta_basica(food), system.session.acting_user().as_ref())
            .await
            .unwrap_err();
        assert_eq!(err, DonationError::Unauthenticated);

        let profile = system.session.sign_in("ana@gmail.com", "segredo123").await.unwrap();
        let donation = system
            .donation_client
            .create_donation(cesta_basica(food), system.session.acting_user().as_ref())
            .await
            .unwrap();
        assert_eq!(donation.donor_id, profile.id);

        system.shutdown().await.unwrap();
    }
}
