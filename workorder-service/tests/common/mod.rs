//! Common test utilities for workorder-service integration tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Once};
use uuid::Uuid;
use workorder_service::models::{
    AdditionalCharge, Client, CreateEstimate, CreateWorkOrder, DiscountInput, DiscountType,
    LabourLineItem, MaterialLineItem, WorkOrder,
};
use workorder_service::services::{
    EstimateService, InMemoryStore, ReconciliationService, WorkOrderService,
};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
#[allow(dead_code)]
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workorder_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test application wrapper: all services over one in-memory store.
#[allow(dead_code)]
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub work_orders: WorkOrderService<InMemoryStore>,
    pub estimates: EstimateService<InMemoryStore>,
    pub reconciliation: ReconciliationService<InMemoryStore>,
    pub actor: Uuid,
}

#[allow(dead_code)]
pub fn spawn_app() -> TestApp {
    init_tracing();
    workorder_service::services::init_metrics();

    let store = Arc::new(InMemoryStore::new());
    TestApp {
        work_orders: WorkOrderService::new(Arc::clone(&store)),
        estimates: EstimateService::new(Arc::clone(&store)),
        reconciliation: ReconciliationService::new(Arc::clone(&store)),
        store,
        actor: Uuid::new_v4(),
    }
}

#[allow(dead_code)]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

/// Labour entry with `total_cost = hours * cost_per_hour` precomputed,
/// as callers are expected to submit it.
#[allow(dead_code)]
pub fn labour_entry(description: &str, hours: Decimal, cost_per_hour: Decimal) -> LabourLineItem {
    LabourLineItem {
        date: test_date(),
        description: description.to_string(),
        hours,
        employee_id: Uuid::new_v4(),
        cost_per_hour,
        total_cost: hours * cost_per_hour,
    }
}

#[allow(dead_code)]
pub fn material_entry(description: &str, quantity: Decimal, unit_price: Decimal) -> MaterialLineItem {
    MaterialLineItem {
        description: description.to_string(),
        quantity,
        unit: "pcs".to_string(),
        unit_price,
        amount: quantity * unit_price,
        supplier: None,
    }
}

#[allow(dead_code)]
pub fn charge(description: &str, amount: Decimal) -> AdditionalCharge {
    AdditionalCharge {
        description: description.to_string(),
        amount,
    }
}

#[allow(dead_code)]
pub fn percentage_discount(description: &str, value: Decimal) -> DiscountInput {
    DiscountInput {
        description: description.to_string(),
        discount_type: DiscountType::Percentage,
        value,
    }
}

#[allow(dead_code)]
pub fn fixed_discount(description: &str, value: Decimal) -> DiscountInput {
    DiscountInput {
        description: description.to_string(),
        discount_type: DiscountType::Fixed,
        value,
    }
}

#[allow(dead_code)]
pub fn create_order_input(order_number: &str) -> CreateWorkOrder {
    CreateWorkOrder {
        order_number: order_number.to_string(),
        client: Client {
            name: "Test Client".to_string(),
            code: "TC-01".to_string(),
            contact_phone: None,
            contact_email: None,
        },
        order_detail: None,
        priority: Some("normal".to_string()),
        job_type: Some("repair".to_string()),
        description: Some("Test job".to_string()),
        created_by: None,
    }
}

#[allow(dead_code)]
pub async fn seeded_work_order(app: &TestApp, order_number: &str) -> WorkOrder {
    app.work_orders
        .create_work_order(create_order_input(order_number))
        .await
        .expect("Failed to create work order")
}

/// Minimal estimate input: empty snapshots default to the work order's
/// current entries, zero tax, no discounts.
#[allow(dead_code)]
pub fn estimate_input() -> CreateEstimate {
    CreateEstimate {
        estimate_date: test_date(),
        valid_until: NaiveDate::from_ymd_opt(2025, 7, 15).expect("valid date"),
        estimated_labour: None,
        estimated_materials: None,
        additional_charges: Vec::new(),
        discounts: Vec::new(),
        tax_percentage: Decimal::ZERO,
        notes: None,
        terms_and_conditions: None,
    }
}
