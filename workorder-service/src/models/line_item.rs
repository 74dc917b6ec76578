//! Labour, material, charge and discount line items.
//!
//! Line totals (`total_cost`, `amount`) are computed by callers at entry
//! time; the service validates and sums them but does not re-derive them.
//! Discount `amount` is the exception: it is always recomputed from
//! `discount_type`/`value` against the current subtotal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Custom validator: monetary and quantity fields must not be negative.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Custom validator: percentage fields must fall within 0..=100.
pub fn percentage_range(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_range"));
    }
    Ok(())
}

/// A single labour cost entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LabourLineItem {
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub hours: Decimal,
    pub employee_id: Uuid,
    #[validate(custom(function = "non_negative"))]
    pub cost_per_hour: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub total_cost: Decimal,
}

/// A single material cost entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MaterialLineItem {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,
    pub supplier: Option<String>,
}

/// A flat extra cost with no formula behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AdditionalCharge {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,
}

/// Discount calculation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "fixed" => DiscountType::Fixed,
            _ => DiscountType::Percentage,
        }
    }
}

/// A discount applied to an estimate subtotal.
///
/// `amount` is a cached derivation, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub description: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub amount: Decimal,
}

/// Caller-supplied discount: `amount` is intentionally absent, it is
/// recomputed server-side against the current subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscountInput {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    #[validate(custom(function = "non_negative"))]
    pub value: Decimal,
}

impl From<DiscountInput> for Discount {
    fn from(input: DiscountInput) -> Self {
        Discount {
            description: input.description,
            discount_type: input.discount_type,
            value: input.value,
            amount: Decimal::ZERO,
        }
    }
}
