//! Estimate lifecycle: creation, update, approval, status transitions
//! and soft deletion.
//!
//! The service owns every estimate state change. Financials always go
//! through `money::compute_financials` on the effective inputs, and the
//! work order's denormalized `has_estimate`/`estimate_amount` fields are
//! kept in sync on every write.

use crate::error::DomainError;
use crate::models::{
    CreateEstimate, Discount, Estimate, EstimateStatus, UpdateEstimate,
};
use crate::services::metrics::{ERRORS_TOTAL, ESTIMATES_TOTAL};
use crate::services::store::Store;
use crate::services::{money, numbering};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Number allocation is read-then-insert; on a unique-number conflict
/// the allocation is retried rather than locking around the read.
const NUMBER_ALLOCATION_ATTEMPTS: usize = 3;

pub struct EstimateService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> EstimateService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create the estimate for a work order. Labour/material snapshots
    /// default to the work order's current entries; discounts are
    /// recalculated against the freshly computed subtotal before the
    /// grand total is derived.
    #[instrument(skip(self, input), fields(work_order_id = %work_order_id))]
    pub async fn create_estimate(
        &self,
        work_order_id: Uuid,
        input: CreateEstimate,
        created_by: Uuid,
    ) -> Result<Estimate, DomainError> {
        input.validate()?;

        let mut work_order = self.store.get_work_order(work_order_id).await?;

        if self
            .store
            .find_estimate_for_work_order(work_order_id)
            .await?
            .is_some()
        {
            ERRORS_TOTAL
                .with_label_values(&["duplicate_estimate"])
                .inc();
            return Err(DomainError::DuplicateEstimate(work_order_id));
        }

        let labour = input
            .estimated_labour
            .unwrap_or_else(|| work_order.labour_entry.clone());
        let materials = input
            .estimated_materials
            .unwrap_or_else(|| work_order.material_entry.clone());
        let charges = input.additional_charges;
        let discounts: Vec<Discount> = input.discounts.into_iter().map(Discount::from).collect();

        let subtotal = money::subtotal(&labour, &materials, &charges);
        let discounts = money::recalculate_discounts(subtotal, &discounts);
        let financials =
            money::compute_financials(&labour, &materials, &charges, &discounts, input.tax_percentage);

        let now = Utc::now();
        let mut attempt = 0;
        let estimate = loop {
            let prefix = numbering::current_month_prefix();
            let latest = self.store.latest_estimate_number(&prefix).await?;
            let estimate_number = numbering::next_in_sequence(&prefix, latest.as_deref());

            let candidate = Estimate {
                estimate_id: Uuid::new_v4(),
                work_order_id,
                estimate_number,
                estimate_date: input.estimate_date,
                valid_until: input.valid_until,
                estimated_labour: labour.clone(),
                estimated_materials: materials.clone(),
                additional_charges: charges.clone(),
                discounts: discounts.clone(),
                tax_percentage: input.tax_percentage,
                tax_amount: financials.tax_amount,
                subtotal: financials.subtotal,
                grand_total: financials.grand_total,
                notes: input.notes.clone(),
                terms_and_conditions: input.terms_and_conditions.clone(),
                status: EstimateStatus::Draft,
                approved_by: None,
                approved_at: None,
                created_by,
                is_deleted: false,
                created_utc: now,
                updated_utc: now,
            };

            match self.store.insert_estimate(candidate).await {
                Ok(estimate) => break estimate,
                Err(DomainError::ConcurrencyConflict(_))
                    if attempt + 1 < NUMBER_ALLOCATION_ATTEMPTS =>
                {
                    attempt += 1;
                    continue;
                }
                Err(err) => {
                    ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
                    return Err(err);
                }
            }
        };

        work_order.estimate_id = Some(estimate.estimate_id);
        work_order.has_estimate = true;
        work_order.estimate_amount = Some(estimate.grand_total);
        work_order.updated_utc = now;
        self.store.save_work_order(work_order).await?;

        ESTIMATES_TOTAL.with_label_values(&["draft"]).inc();

        info!(
            estimate_id = %estimate.estimate_id,
            estimate_number = %estimate.estimate_number,
            grand_total = %estimate.grand_total,
            "Estimate created"
        );

        Ok(estimate)
    }

    /// The non-deleted estimate for a work order.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn get_estimate_for_work_order(
        &self,
        work_order_id: Uuid,
    ) -> Result<Estimate, DomainError> {
        self.store
            .find_estimate_for_work_order(work_order_id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Estimate" })
    }

    /// Merge provided fields over the stored estimate and recompute
    /// discounts and financials from the effective merged inputs, not
    /// just the delta. Approved estimates are immutable.
    #[instrument(skip(self, input), fields(work_order_id = %work_order_id))]
    pub async fn update_estimate(
        &self,
        work_order_id: Uuid,
        input: UpdateEstimate,
    ) -> Result<Estimate, DomainError> {
        input.validate()?;

        let mut estimate = self.get_estimate_for_work_order(work_order_id).await?;

        if estimate.status == EstimateStatus::Approved {
            ERRORS_TOTAL.with_label_values(&["estimate_locked"]).inc();
            return Err(DomainError::EstimateLocked(estimate.estimate_number));
        }

        let labour = input
            .estimated_labour
            .unwrap_or_else(|| estimate.estimated_labour.clone());
        let materials = input
            .estimated_materials
            .unwrap_or_else(|| estimate.estimated_materials.clone());
        let charges = input
            .additional_charges
            .unwrap_or_else(|| estimate.additional_charges.clone());
        let discounts: Vec<Discount> = match input.discounts {
            Some(inputs) => inputs.into_iter().map(Discount::from).collect(),
            None => estimate.discounts.clone(),
        };
        let tax_percentage = input.tax_percentage.unwrap_or(estimate.tax_percentage);

        let subtotal = money::subtotal(&labour, &materials, &charges);
        let discounts = money::recalculate_discounts(subtotal, &discounts);
        let financials =
            money::compute_financials(&labour, &materials, &charges, &discounts, tax_percentage);

        if let Some(date) = input.estimate_date {
            estimate.estimate_date = date;
        }
        if let Some(date) = input.valid_until {
            estimate.valid_until = date;
        }
        if let Some(notes) = input.notes {
            estimate.notes = Some(notes);
        }
        if let Some(terms) = input.terms_and_conditions {
            estimate.terms_and_conditions = Some(terms);
        }
        estimate.estimated_labour = labour;
        estimate.estimated_materials = materials;
        estimate.additional_charges = charges;
        estimate.discounts = discounts;
        estimate.tax_percentage = tax_percentage;
        estimate.tax_amount = financials.tax_amount;
        estimate.subtotal = financials.subtotal;
        estimate.grand_total = financials.grand_total;
        estimate.updated_utc = Utc::now();

        let estimate = self.store.save_estimate(estimate).await?;
        self.denormalize_estimate_amount(work_order_id, &estimate)
            .await?;

        info!(
            estimate_id = %estimate.estimate_id,
            grand_total = %estimate.grand_total,
            "Estimate updated"
        );

        Ok(estimate)
    }

    /// Approve the estimate, stamping the approver. Only permitted from
    /// draft or sent; approval is the point at which the document
    /// becomes immutable.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn approve_estimate(
        &self,
        work_order_id: Uuid,
        approved_by: Uuid,
    ) -> Result<Estimate, DomainError> {
        let mut estimate = self.get_estimate_for_work_order(work_order_id).await?;

        match estimate.status {
            EstimateStatus::Approved => {
                ERRORS_TOTAL.with_label_values(&["already_approved"]).inc();
                return Err(DomainError::AlreadyApproved(estimate.estimate_number));
            }
            EstimateStatus::Draft | EstimateStatus::Sent => {}
            current => {
                return Err(DomainError::InvalidTransition {
                    current,
                    requested: EstimateStatus::Approved,
                    allowed: current.allowed_transitions().to_vec(),
                });
            }
        }

        estimate.status = EstimateStatus::Approved;
        estimate.approved_by = Some(approved_by);
        estimate.approved_at = Some(Utc::now());
        estimate.updated_utc = Utc::now();

        let estimate = self.store.save_estimate(estimate).await?;
        self.denormalize_estimate_amount(work_order_id, &estimate)
            .await?;

        ESTIMATES_TOTAL.with_label_values(&["approved"]).inc();

        info!(
            estimate_id = %estimate.estimate_id,
            estimate_number = %estimate.estimate_number,
            "Estimate approved"
        );

        Ok(estimate)
    }

    /// Generic status change, validated against the transition table.
    /// Requesting the current status is a no-op success; leaving the
    /// approved state is never allowed.
    #[instrument(skip(self), fields(work_order_id = %work_order_id, requested = %requested))]
    pub async fn change_status(
        &self,
        work_order_id: Uuid,
        requested: EstimateStatus,
        actor: Uuid,
    ) -> Result<Estimate, DomainError> {
        let mut estimate = self.get_estimate_for_work_order(work_order_id).await?;
        let current = estimate.status;

        if requested == current {
            return Ok(estimate);
        }

        if current == EstimateStatus::Approved {
            ERRORS_TOTAL.with_label_values(&["estimate_locked"]).inc();
            return Err(DomainError::EstimateLocked(estimate.estimate_number));
        }

        if !current.allowed_transitions().contains(&requested) {
            ERRORS_TOTAL
                .with_label_values(&["invalid_transition"])
                .inc();
            return Err(DomainError::InvalidTransition {
                current,
                requested,
                allowed: current.allowed_transitions().to_vec(),
            });
        }

        // A transition into approved through the generic path still
        // stamps the approver, keeping the approved/stamped invariant.
        if requested == EstimateStatus::Approved {
            estimate.approved_by = Some(actor);
            estimate.approved_at = Some(Utc::now());
        }
        estimate.status = requested;
        estimate.updated_utc = Utc::now();

        let estimate = self.store.save_estimate(estimate).await?;

        if requested == EstimateStatus::Approved {
            self.denormalize_estimate_amount(work_order_id, &estimate)
                .await?;
        }

        ESTIMATES_TOTAL.with_label_values(&[requested.as_str()]).inc();

        info!(
            estimate_id = %estimate.estimate_id,
            from = %current,
            to = %requested,
            "Estimate status changed"
        );

        Ok(estimate)
    }

    /// Soft-delete a non-approved estimate, freeing the work order's
    /// single estimate slot and clearing the denormalized fields.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn delete_estimate(&self, work_order_id: Uuid) -> Result<(), DomainError> {
        let mut estimate = self.get_estimate_for_work_order(work_order_id).await?;

        if estimate.status == EstimateStatus::Approved {
            ERRORS_TOTAL.with_label_values(&["estimate_locked"]).inc();
            return Err(DomainError::EstimateLocked(estimate.estimate_number));
        }

        estimate.is_deleted = true;
        estimate.updated_utc = Utc::now();
        let estimate = self.store.save_estimate(estimate).await?;

        let mut work_order = self.store.get_work_order(work_order_id).await?;
        work_order.estimate_id = None;
        work_order.has_estimate = false;
        work_order.estimate_amount = None;
        work_order.updated_utc = Utc::now();
        self.store.save_work_order(work_order).await?;

        info!(estimate_id = %estimate.estimate_id, "Estimate deleted");

        Ok(())
    }

    async fn denormalize_estimate_amount(
        &self,
        work_order_id: Uuid,
        estimate: &Estimate,
    ) -> Result<(), DomainError> {
        let mut work_order = self.store.get_work_order(work_order_id).await?;
        work_order.estimate_amount = Some(estimate.grand_total);
        work_order.updated_utc = Utc::now();
        self.store.save_work_order(work_order).await?;
        Ok(())
    }
}
