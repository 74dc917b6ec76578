//! Work order model for workorder-service.

use crate::models::{LabourLineItem, MaterialLineItem};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Client the job is executed for.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Client {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Client code is required"))]
    pub code: String,
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

/// Order intake details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDetail {
    pub received_by: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub order_time: Option<String>,
    pub job_start_date: Option<NaiveDate>,
    pub date_promised: Option<NaiveDate>,
    pub date_delivered: Option<NaiveDate>,
}

/// Job execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Checked,
    Approved,
    Completed,
    Delivered,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Checked => "checked",
            JobStatus::Approved => "approved",
            JobStatus::Completed => "completed",
            JobStatus::Delivered => "delivered",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "checked" => JobStatus::Checked,
            "approved" => JobStatus::Approved,
            "completed" => JobStatus::Completed,
            "delivered" => JobStatus::Delivered,
            _ => JobStatus::Pending,
        }
    }

    /// Terminal execution states after which reconciliation makes sense.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Delivered)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job metadata and workflow stamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub priority: Option<String>,
    pub job_type: Option<String>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub checked_by: Option<Uuid>,
    pub checked_at: Option<DateTime<Utc>>,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for JobInfo {
    fn default() -> Self {
        JobInfo {
            priority: None,
            job_type: None,
            description: None,
            status: JobStatus::Pending,
            checked_by: None,
            checked_at: None,
            completed_by: None,
            completed_at: None,
        }
    }
}

/// Approval and delivery stamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Approval {
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub delivered_by: Option<Uuid>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub delivered_on_time: Option<bool>,
    pub remarks: Option<String>,
    pub customer_signature: Option<String>,
}

/// Running totals over actual labour and material entries. Recomputed
/// from scratch on every entry append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderTotal {
    pub total_labour_hours: Decimal,
    pub total_labour_cost: Decimal,
    pub total_material_cost: Decimal,
    pub grand_total: Decimal,
}

/// Work order document. Accumulates actual cost entries as the job
/// progresses; `has_estimate`/`estimate_amount` are denormalized from
/// the estimate for fast list rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub work_order_id: Uuid,
    pub order_number: String,
    pub client: Client,
    pub labour_entry: Vec<LabourLineItem>,
    pub material_entry: Vec<MaterialLineItem>,
    pub order_detail: OrderDetail,
    pub job_info: JobInfo,
    pub approval: Approval,
    pub total: WorkOrderTotal,
    pub estimate_id: Option<Uuid>,
    pub has_estimate: bool,
    pub estimate_amount: Option<Decimal>,
    pub created_by: Option<Uuid>,
    pub is_deleted: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a work order.
#[derive(Debug, Clone, Validate)]
pub struct CreateWorkOrder {
    #[validate(length(min = 1, message = "Order number is required"))]
    pub order_number: String,
    #[validate(nested)]
    pub client: Client,
    pub order_detail: Option<OrderDetail>,
    pub priority: Option<String>,
    pub job_type: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}
