//! Estimate model for workorder-service.

use crate::models::{AdditionalCharge, DiscountInput, LabourLineItem, MaterialLineItem};
use crate::models::line_item::{percentage_range, Discount};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Estimate lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Expired,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Draft => "draft",
            EstimateStatus::Sent => "sent",
            EstimateStatus::Approved => "approved",
            EstimateStatus::Rejected => "rejected",
            EstimateStatus::Expired => "expired",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => EstimateStatus::Sent,
            "approved" => EstimateStatus::Approved,
            "rejected" => EstimateStatus::Rejected,
            "expired" => EstimateStatus::Expired,
            _ => EstimateStatus::Draft,
        }
    }

    /// The set of statuses this status may transition to. Approval is a
    /// one-way door; rejected and expired estimates can be re-opened as
    /// drafts.
    pub fn allowed_transitions(&self) -> &'static [EstimateStatus] {
        match self {
            EstimateStatus::Draft => &[EstimateStatus::Sent, EstimateStatus::Rejected],
            EstimateStatus::Sent => &[
                EstimateStatus::Approved,
                EstimateStatus::Rejected,
                EstimateStatus::Expired,
            ],
            EstimateStatus::Rejected => &[EstimateStatus::Draft],
            EstimateStatus::Expired => &[EstimateStatus::Draft],
            EstimateStatus::Approved => &[],
        }
    }
}

impl std::fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimate document: a numbered financial projection for a work order,
/// snapshotting labour/material lines with derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub estimate_id: Uuid,
    pub work_order_id: Uuid,
    pub estimate_number: String,
    pub estimate_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub estimated_labour: Vec<LabourLineItem>,
    pub estimated_materials: Vec<MaterialLineItem>,
    pub additional_charges: Vec<AdditionalCharge>,
    pub discounts: Vec<Discount>,
    pub tax_percentage: Decimal,
    pub tax_amount: Decimal,
    pub subtotal: Decimal,
    pub grand_total: Decimal,
    pub notes: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub status: EstimateStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub is_deleted: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating an estimate. Labour/material snapshots default to
/// the work order's current entries when not supplied.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateEstimate {
    pub estimate_date: NaiveDate,
    pub valid_until: NaiveDate,
    #[validate(nested)]
    pub estimated_labour: Option<Vec<LabourLineItem>>,
    #[validate(nested)]
    pub estimated_materials: Option<Vec<MaterialLineItem>>,
    #[validate(nested)]
    pub additional_charges: Vec<AdditionalCharge>,
    #[validate(nested)]
    pub discounts: Vec<DiscountInput>,
    #[validate(custom(function = "percentage_range"))]
    pub tax_percentage: Decimal,
    pub notes: Option<String>,
    pub terms_and_conditions: Option<String>,
}

/// Input for updating a non-approved estimate. Provided fields are
/// merged over the stored document; financials are then recomputed
/// from the effective merged inputs.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateEstimate {
    pub estimate_date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    #[validate(nested)]
    pub estimated_labour: Option<Vec<LabourLineItem>>,
    #[validate(nested)]
    pub estimated_materials: Option<Vec<MaterialLineItem>>,
    #[validate(nested)]
    pub additional_charges: Option<Vec<AdditionalCharge>>,
    #[validate(nested)]
    pub discounts: Option<Vec<DiscountInput>>,
    #[validate(custom(function = "percentage_range"))]
    pub tax_percentage: Option<Decimal>,
    pub notes: Option<String>,
    pub terms_and_conditions: Option<String>,
}
