use tracing::{error, info, Instrument};

use donation_hub::app_system::{setup_tracing, DonationSystem};
use donation_hub::config::AppConfig;
use donation_hub::domain::{DeliveryType, DonationInput, VolunteerApplication};
use donation_hub::session::InMemoryAuthProvider;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.logging.filter);

    info!("Starting donation hub demo");

    let auth = InMemoryAuthProvider::new();
    for email in ["ana@gmail.com", "maria.interno@ong.org", "bruno@gmail.com"] {
        auth.register(email, "segredo123").await.map_err(|e| e.to_string())?;
    }

    let system = DonationSystem::start(&config, auth).await.map_err(|e| e.to_string())?;
    let categories = system.category_client.list_categories().await.map_err(|e| e.to_string())?;
    let food = categories
        .iter()
        .find(|c| c.name == "Alimentos")
        .ok_or("Alimentos category missing")?;

    // Donor registers a donation
    let donation = async {
        let donor = system.session.sign_in("ana@gmail.com", "segredo123").await?;
        info!(user_id = %donor.id, "Donor signed in");
        let input = DonationInput {
            title: "Cesta básica".into(),
            category_id: Some(food.id),
            quantity: 5.0,
            unit: "unidade".into(),
            delivery_type: Some(DeliveryType::Pickup),
            pickup_address: Some("Rua X, 123".into()),
            ..Default::default()
        };
        let donation = system
            .donation_client
            .create_donation(input, system.session.acting_user().as_ref())
            .await?;
        system.session.sign_out().await?;
        Ok::<_, Box<dyn std::error::Error>>(donation)
    }
    .instrument(tracing::info_span!("donor_flow"))
    .await
    .map_err(|e| e.to_string())?;

    info!(donation_id = %donation.id, status = %donation.status, "Donation registered");

    // Staff approves it
    async {
        system.session.sign_in("maria.interno@ong.org", "segredo123").await?;
        let approved = system
            .donation_client
            .approve_donation(donation.id, system.session.acting_user().as_ref())
            .await?;
        info!(status = %approved.status, "Donation approved");
        system.session.sign_out().await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(tracing::info_span!("staff_flow"))
    .await
    .map_err(|e| e.to_string())?;

    // Beneficiary reserves and confirms delivery
    let result = async {
        system.session.sign_in("bruno@gmail.com", "segredo123").await?;
        let actor = system.session.acting_user();
        let reserved = system.donation_client.reserve_donation(donation.id, actor.as_ref()).await?;
        info!(status = %reserved.status, "Donation reserved");
        let delivered = system.donation_client.confirm_delivery(donation.id, actor.as_ref()).await?;
        Ok::<_, Box<dyn std::error::Error>>(delivered)
    }
    .instrument(tracing::info_span!("beneficiary_flow"))
    .await;

    match result {
        Ok(delivered) => info!(status = %delivered.status, "Donation delivered"),
        Err(e) => error!(error = %e, "Beneficiary flow failed"),
    }

    let stats = system.statistics_client.count_by_status(None).await;
    info!(total = stats.total, entregue = stats.entregue, "Dashboard statistics");

    let application = VolunteerApplication {
        name: "Joana Lima".into(),
        email: "joana@gmail.com".into(),
        phone: "(11) 99999-0000".into(),
        interest_areas: vec!["Triagem".into()],
        availability: "Sábados".into(),
        prior_experience: None,
    };
    match system.notification_client.notify_volunteer_application(application).await {
        Ok(receipt) => info!(message_id = %receipt.message_id, "Volunteer team notified"),
        Err(e) => error!(error = %e, status = e.http_status(), "Volunteer notification failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
