//! Donation form validation. Pure and synchronous; runs before any
//! repository call.

use uuid::Uuid;

use super::error::ValidationError;
use crate::domain::{DeliveryType, DonationCreate, DonationInput};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_TEXT_CHARS: usize = 1000;

/// Every violation in field order.
pub fn collect_violations(input: &DonationInput) -> Vec<ValidationError> {
    let mut violations = Vec::new();

    let title = input.title.trim();
    if title.is_empty() {
        violations.push(ValidationError::new("title", "title is required"));
    } else if title.chars().count() > MAX_TITLE_CHARS {
        violations.push(ValidationError::new(
            "title",
            format!("title must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }

    if input.category_id.is_none() {
        violations.push(ValidationError::new("category_id", "category is required"));
    }

    if !input.quantity.is_finite() || input.quantity <= 0.0 {
        violations.push(ValidationError::new("quantity", "quantity must be greater than zero"));
    }

    if input.unit.trim().is_empty() {
        violations.push(ValidationError::new("unit", "unit is required"));
    }

    match input.delivery_type {
        None => violations.push(ValidationError::new("delivery_type", "delivery type is required")),
        Some(DeliveryType::Pickup) if is_blank(&input.pickup_address) => violations.push(
            ValidationError::new("pickup_address", "pickup address is required for pickup"),
        ),
        Some(DeliveryType::DonorDelivery) if is_blank(&input.delivery_address) => violations.push(
            ValidationError::new("delivery_address", "delivery address is required for donor delivery"),
        ),
        Some(_) => {}
    }

    for (field, value) in [("description", &input.description), ("notes", &input.notes)] {
        if value.as_deref().is_some_and(|text| text.chars().count() > MAX_TEXT_CHARS) {
            violations.push(ValidationError::new(
                field,
                format!("{field} must be at most {MAX_TEXT_CHARS} characters"),
            ));
        }
    }

    violations
}

/// First violation, if any.
pub fn validate_donation_input(input: &DonationInput) -> Result<(), ValidationError> {
    match collect_violations(input).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Validates and normalizes a form into creation parameters owned by
/// `donor_id`. Any donor id or status in the form is discarded.
pub fn prepare_donation(input: DonationInput, donor_id: Uuid) -> Result<DonationCreate, ValidationError> {
    validate_donation_input(&input)?;

    let category_id = input
        .category_id
        .ok_or_else(|| ValidationError::new("category_id", "category is required"))?;
    let delivery_type = input
        .delivery_type
        .ok_or_else(|| ValidationError::new("delivery_type", "delivery type is required"))?;

    Ok(DonationCreate {
        title: input.title.trim().to_string(),
        description: trimmed(input.description),
        category_id,
        quantity: input.quantity,
        unit: input.unit.trim().to_string(),
        delivery_type,
        pickup_address: trimmed(input.pickup_address),
        delivery_address: trimmed(input.delivery_address),
        notes: trimmed(input.notes),
        available_date: input.available_date,
        donor_id,
    })
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |text| text.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
