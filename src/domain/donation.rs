use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a physical-goods donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationStatus {
    #[serde(rename = "cadastrada")]
    Registered,
    #[serde(rename = "disponivel")]
    Available,
    #[serde(rename = "reservada")]
    Reserved,
    #[serde(rename = "entregue")]
    Delivered,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 5] = [
        DonationStatus::Registered,
        DonationStatus::Available,
        DonationStatus::Reserved,
        DonationStatus::Delivered,
        DonationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Registered => "cadastrada",
            DonationStatus::Available => "disponivel",
            DonationStatus::Reserved => "reservada",
            DonationStatus::Delivered => "entregue",
            DonationStatus::Cancelled => "cancelada",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Delivered | DonationStatus::Cancelled)
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryType {
    #[serde(rename = "pickup", alias = "retirada")]
    Pickup,
    #[serde(rename = "donor_delivery", alias = "entrega_doador")]
    DonorDelivery,
}

/// A donation record as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub status: DonationStatus,
    pub donor_id: Uuid,
    pub beneficiary_id: Option<Uuid>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_type: DeliveryType,
    pub notes: Option<String>,
    pub available_date: DateTime<Utc>,
    pub reserved_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied donation form.
///
/// `donor_id` and `status` are accepted so that payloads round-trip, but
/// creation always overwrites them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonationInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub delivery_type: Option<DeliveryType>,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub available_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub donor_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<DonationStatus>,
}

/// Validated creation parameters handed to the repository.
#[derive(Debug, Clone)]
pub struct DonationCreate {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub delivery_type: DeliveryType,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub available_date: Option<DateTime<Utc>>,
    pub donor_id: Uuid,
}

/// Repository filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub category_id: Option<Uuid>,
    pub donor_id: Option<Uuid>,
    pub beneficiary_id: Option<Uuid>,
}

impl DonationFilter {
    pub fn by_donor(donor_id: Uuid) -> Self {
        Self { donor_id: Some(donor_id), ..Default::default() }
    }

    pub fn by_status(status: DonationStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn matches(&self, donation: &Donation) -> bool {
        self.status.map_or(true, |s| donation.status == s)
            && self.category_id.map_or(true, |c| donation.category_id == c)
            && self.donor_id.map_or(true, |d| donation.donor_id == d)
            && self.beneficiary_id.map_or(true, |b| donation.beneficiary_id == Some(b))
    }
}

/// Per-status counters for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationStats {
    pub total: u64,
    pub cadastrada: u64,
    pub disponivel: u64,
    pub reservada: u64,
    pub entregue: u64,
    pub cancelada: u64,
}

impl DonationStats {
    pub fn from_donations<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> Self {
        donations.into_iter().fold(Self::default(), |mut stats, donation| {
            stats.total += 1;
            match donation.status {
                DonationStatus::Registered => stats.cadastrada += 1,
                DonationStatus::Available => stats.disponivel += 1,
                DonationStatus::Reserved => stats.reservada += 1,
                DonationStatus::Delivered => stats.entregue += 1,
                DonationStatus::Cancelled => stats.cancelada += 1,
            }
            stats
        })
    }
}
