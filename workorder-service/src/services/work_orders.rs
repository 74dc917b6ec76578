//! Work order creation, actual cost entry appends with running-total
//! recomputation, and the job execution workflow.
//!
//! Totals are recomputed from scratch on every append rather than
//! incrementally updated, which keeps them drift-free at the entry-list
//! sizes this domain sees. `estimate_amount` is not touched here; that
//! field belongs to the estimate lifecycle.

use crate::error::DomainError;
use crate::models::{
    Approval, CreateWorkOrder, JobInfo, JobStatus, LabourLineItem, MaterialLineItem, WorkOrder,
    WorkOrderTotal,
};
use crate::services::metrics::WORK_ORDERS_TOTAL;
use crate::services::store::Store;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Recompute the running totals block from all current entries.
pub fn recompute_totals(
    labour: &[LabourLineItem],
    materials: &[MaterialLineItem],
) -> WorkOrderTotal {
    let total_labour_hours: Decimal = labour.iter().map(|entry| entry.hours).sum();
    let total_labour_cost: Decimal = labour.iter().map(|entry| entry.total_cost).sum();
    let total_material_cost: Decimal = materials.iter().map(|entry| entry.amount).sum();

    WorkOrderTotal {
        total_labour_hours,
        total_labour_cost,
        total_material_cost,
        grand_total: total_labour_cost + total_material_cost,
    }
}

pub struct WorkOrderService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> WorkOrderService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a work order with empty entry lists in the pending state.
    #[instrument(skip(self, input), fields(order_number = %input.order_number))]
    pub async fn create_work_order(
        &self,
        input: CreateWorkOrder,
    ) -> Result<WorkOrder, DomainError> {
        input.validate()?;

        let now = Utc::now();
        let work_order = WorkOrder {
            work_order_id: Uuid::new_v4(),
            order_number: input.order_number,
            client: input.client,
            labour_entry: Vec::new(),
            material_entry: Vec::new(),
            order_detail: input.order_detail.unwrap_or_default(),
            job_info: JobInfo {
                priority: input.priority,
                job_type: input.job_type,
                description: input.description,
                ..JobInfo::default()
            },
            approval: Approval::default(),
            total: WorkOrderTotal::default(),
            estimate_id: None,
            has_estimate: false,
            estimate_amount: None,
            created_by: input.created_by,
            is_deleted: false,
            created_utc: now,
            updated_utc: now,
        };

        let work_order = self.store.insert_work_order(work_order).await?;

        WORK_ORDERS_TOTAL.with_label_values(&["pending"]).inc();

        Ok(work_order)
    }

    pub async fn get_work_order(&self, work_order_id: Uuid) -> Result<WorkOrder, DomainError> {
        self.store.get_work_order(work_order_id).await
    }

    /// Append a labour entry and recompute the totals block.
    #[instrument(skip(self, entry), fields(work_order_id = %work_order_id))]
    pub async fn append_labour(
        &self,
        work_order_id: Uuid,
        entry: LabourLineItem,
    ) -> Result<WorkOrder, DomainError> {
        entry.validate()?;

        let mut work_order = self.store.get_work_order(work_order_id).await?;
        work_order.labour_entry.push(entry);
        work_order.total = recompute_totals(&work_order.labour_entry, &work_order.material_entry);
        work_order.updated_utc = Utc::now();

        let work_order = self.store.save_work_order(work_order).await?;

        info!(
            total_labour_hours = %work_order.total.total_labour_hours,
            grand_total = %work_order.total.grand_total,
            "Labour entry added"
        );

        Ok(work_order)
    }

    /// Append a material entry and recompute the totals block.
    #[instrument(skip(self, entry), fields(work_order_id = %work_order_id))]
    pub async fn append_material(
        &self,
        work_order_id: Uuid,
        entry: MaterialLineItem,
    ) -> Result<WorkOrder, DomainError> {
        entry.validate()?;

        let mut work_order = self.store.get_work_order(work_order_id).await?;
        work_order.material_entry.push(entry);
        work_order.total = recompute_totals(&work_order.labour_entry, &work_order.material_entry);
        work_order.updated_utc = Utc::now();

        let work_order = self.store.save_work_order(work_order).await?;

        info!(
            total_material_cost = %work_order.total.total_material_cost,
            grand_total = %work_order.total.grand_total,
            "Material entry added"
        );

        Ok(work_order)
    }

    /// Mark a pending work order as checked.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn check(&self, work_order_id: Uuid, actor: Uuid) -> Result<WorkOrder, DomainError> {
        let mut work_order = self.store.get_work_order(work_order_id).await?;

        if work_order.job_info.status != JobStatus::Pending {
            return Err(DomainError::InvalidJobTransition {
                action: "check",
                current: work_order.job_info.status,
            });
        }

        work_order.job_info.status = JobStatus::Checked;
        work_order.job_info.checked_by = Some(actor);
        work_order.job_info.checked_at = Some(Utc::now());
        work_order.updated_utc = Utc::now();

        self.transition(work_order, JobStatus::Checked).await
    }

    /// Approve a checked work order for execution.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn approve(
        &self,
        work_order_id: Uuid,
        actor: Uuid,
    ) -> Result<WorkOrder, DomainError> {
        let mut work_order = self.store.get_work_order(work_order_id).await?;

        if work_order.job_info.status != JobStatus::Checked {
            return Err(DomainError::InvalidJobTransition {
                action: "approve",
                current: work_order.job_info.status,
            });
        }

        work_order.job_info.status = JobStatus::Approved;
        work_order.approval.approved_by = Some(actor);
        work_order.approval.approved_at = Some(Utc::now());
        work_order.updated_utc = Utc::now();

        self.transition(work_order, JobStatus::Approved).await
    }

    /// Mark an approved work order as completed.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn complete(
        &self,
        work_order_id: Uuid,
        actor: Uuid,
    ) -> Result<WorkOrder, DomainError> {
        let mut work_order = self.store.get_work_order(work_order_id).await?;

        if work_order.job_info.status != JobStatus::Approved {
            return Err(DomainError::InvalidJobTransition {
                action: "complete",
                current: work_order.job_info.status,
            });
        }

        work_order.job_info.status = JobStatus::Completed;
        work_order.job_info.completed_by = Some(actor);
        work_order.job_info.completed_at = Some(Utc::now());
        work_order.updated_utc = Utc::now();

        self.transition(work_order, JobStatus::Completed).await
    }

    /// Deliver a completed work order, stamping the delivery date.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn deliver(
        &self,
        work_order_id: Uuid,
        actor: Uuid,
    ) -> Result<WorkOrder, DomainError> {
        let mut work_order = self.store.get_work_order(work_order_id).await?;

        if work_order.job_info.status != JobStatus::Completed {
            return Err(DomainError::InvalidJobTransition {
                action: "deliver",
                current: work_order.job_info.status,
            });
        }

        let now = Utc::now();
        work_order.job_info.status = JobStatus::Delivered;
        work_order.approval.delivered_by = Some(actor);
        work_order.approval.delivered_at = Some(now);
        work_order.order_detail.date_delivered = Some(now.date_naive());
        work_order.updated_utc = now;

        self.transition(work_order, JobStatus::Delivered).await
    }

    async fn transition(
        &self,
        work_order: WorkOrder,
        to: JobStatus,
    ) -> Result<WorkOrder, DomainError> {
        let work_order = self.store.save_work_order(work_order).await?;

        WORK_ORDERS_TOTAL.with_label_values(&[to.as_str()]).inc();

        info!(
            work_order_id = %work_order.work_order_id,
            status = %to,
            "Work order status changed"
        );

        Ok(work_order)
    }
}
