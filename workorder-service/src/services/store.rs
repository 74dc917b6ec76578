//! Persistence seam for workorder-service.
//!
//! The core is stateless; all state lives behind the `Store` trait. The
//! in-memory implementation guards its maps with a single `RwLock`, and
//! the write section doubles as the unique index: estimate-number
//! uniqueness and the one-non-deleted-estimate-per-work-order rule are
//! checked and applied atomically, surfacing as `ConcurrencyConflict` /
//! `DuplicateEstimate` exactly like a database constraint violation.

use crate::error::DomainError;
use crate::models::{Estimate, WorkOrder};
use crate::services::metrics::STORE_OP_DURATION;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_work_order(&self, work_order: WorkOrder) -> Result<WorkOrder, DomainError>;
    async fn get_work_order(&self, work_order_id: Uuid) -> Result<WorkOrder, DomainError>;
    async fn save_work_order(&self, work_order: WorkOrder) -> Result<WorkOrder, DomainError>;

    async fn insert_estimate(&self, estimate: Estimate) -> Result<Estimate, DomainError>;
    async fn get_estimate(&self, estimate_id: Uuid) -> Result<Estimate, DomainError>;
    async fn save_estimate(&self, estimate: Estimate) -> Result<Estimate, DomainError>;

    /// The non-deleted estimate for a work order, if one exists.
    async fn find_estimate_for_work_order(
        &self,
        work_order_id: Uuid,
    ) -> Result<Option<Estimate>, DomainError>;

    /// Greatest issued estimate number under the given month prefix.
    /// Deleted estimates count; numbers are never reused.
    async fn latest_estimate_number(&self, prefix: &str) -> Result<Option<String>, DomainError>;
}

#[derive(Default)]
struct Inner {
    work_orders: HashMap<Uuid, WorkOrder>,
    estimates: HashMap<Uuid, Estimate>,
}

/// In-memory store backed by a single `RwLock`.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_work_order(&self, work_order: WorkOrder) -> Result<WorkOrder, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["insert_work_order"])
            .start_timer();

        let mut inner = self.inner.write().await;

        let duplicate = inner
            .work_orders
            .values()
            .any(|existing| !existing.is_deleted && existing.order_number == work_order.order_number);
        if duplicate {
            return Err(DomainError::ConcurrencyConflict(format!(
                "Work order number '{}' already exists",
                work_order.order_number
            )));
        }

        inner
            .work_orders
            .insert(work_order.work_order_id, work_order.clone());

        timer.observe_duration();

        info!(work_order_id = %work_order.work_order_id, order_number = %work_order.order_number, "Work order created");

        Ok(work_order)
    }

    async fn get_work_order(&self, work_order_id: Uuid) -> Result<WorkOrder, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["get_work_order"])
            .start_timer();

        let inner = self.inner.read().await;
        let work_order = inner
            .work_orders
            .get(&work_order_id)
            .filter(|wo| !wo.is_deleted)
            .cloned()
            .ok_or(DomainError::NotFound {
                entity: "Work order",
            });

        timer.observe_duration();

        work_order
    }

    async fn save_work_order(&self, work_order: WorkOrder) -> Result<WorkOrder, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["save_work_order"])
            .start_timer();

        let mut inner = self.inner.write().await;
        if !inner.work_orders.contains_key(&work_order.work_order_id) {
            return Err(DomainError::NotFound {
                entity: "Work order",
            });
        }
        inner
            .work_orders
            .insert(work_order.work_order_id, work_order.clone());

        timer.observe_duration();

        Ok(work_order)
    }

    async fn insert_estimate(&self, estimate: Estimate) -> Result<Estimate, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["insert_estimate"])
            .start_timer();

        let mut inner = self.inner.write().await;

        let number_taken = inner
            .estimates
            .values()
            .any(|existing| existing.estimate_number == estimate.estimate_number);
        if number_taken {
            return Err(DomainError::ConcurrencyConflict(format!(
                "Estimate number '{}' already issued",
                estimate.estimate_number
            )));
        }

        let slot_taken = inner
            .estimates
            .values()
            .any(|existing| !existing.is_deleted && existing.work_order_id == estimate.work_order_id);
        if slot_taken {
            return Err(DomainError::DuplicateEstimate(estimate.work_order_id));
        }

        inner
            .estimates
            .insert(estimate.estimate_id, estimate.clone());

        timer.observe_duration();

        info!(
            estimate_id = %estimate.estimate_id,
            estimate_number = %estimate.estimate_number,
            "Estimate created"
        );

        Ok(estimate)
    }

    async fn get_estimate(&self, estimate_id: Uuid) -> Result<Estimate, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["get_estimate"])
            .start_timer();

        let inner = self.inner.read().await;
        let estimate = inner
            .estimates
            .get(&estimate_id)
            .filter(|est| !est.is_deleted)
            .cloned()
            .ok_or(DomainError::NotFound { entity: "Estimate" });

        timer.observe_duration();

        estimate
    }

    async fn save_estimate(&self, estimate: Estimate) -> Result<Estimate, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["save_estimate"])
            .start_timer();

        let mut inner = self.inner.write().await;
        if !inner.estimates.contains_key(&estimate.estimate_id) {
            return Err(DomainError::NotFound { entity: "Estimate" });
        }
        inner
            .estimates
            .insert(estimate.estimate_id, estimate.clone());

        timer.observe_duration();

        Ok(estimate)
    }

    async fn find_estimate_for_work_order(
        &self,
        work_order_id: Uuid,
    ) -> Result<Option<Estimate>, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["find_estimate_for_work_order"])
            .start_timer();

        let inner = self.inner.read().await;
        let estimate = inner
            .estimates
            .values()
            .find(|est| !est.is_deleted && est.work_order_id == work_order_id)
            .cloned();

        timer.observe_duration();

        Ok(estimate)
    }

    async fn latest_estimate_number(&self, prefix: &str) -> Result<Option<String>, DomainError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["latest_estimate_number"])
            .start_timer();

        let inner = self.inner.read().await;
        let latest = inner
            .estimates
            .values()
            .map(|est| est.estimate_number.as_str())
            .filter(|number| number.starts_with(prefix))
            .max()
            .map(|number| number.to_string());

        timer.observe_duration();

        Ok(latest)
    }
}
