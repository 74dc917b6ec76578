//! Work order running-total tests: appends recompute the totals block
//! from scratch, invalid entries are rejected with field-level errors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;
use workorder_service::error::DomainError;
use workorder_service::services::work_orders::recompute_totals;

mod common;

use common::{labour_entry, material_entry, seeded_work_order, spawn_app};

#[test]
fn recompute_totals_sums_hours_and_costs() {
    let labour = vec![
        labour_entry("Welding", dec!(2), dec!(100)),
        labour_entry("Painting", dec!(3), dec!(80)),
    ];
    let materials = vec![material_entry("Steel", dec!(2), dec!(150))];

    let totals = recompute_totals(&labour, &materials);

    assert_eq!(totals.total_labour_hours, dec!(5));
    assert_eq!(totals.total_labour_cost, dec!(440));
    assert_eq!(totals.total_material_cost, dec!(300));
    assert_eq!(totals.grand_total, dec!(740));
}

#[test]
fn recompute_totals_of_empty_entries_is_zero() {
    let totals = recompute_totals(&[], &[]);

    assert_eq!(totals.total_labour_hours, Decimal::ZERO);
    assert_eq!(totals.grand_total, Decimal::ZERO);
}

#[tokio::test]
async fn appends_keep_the_totals_block_current() {
    let app = spawn_app();
    let order = seeded_work_order(&app, "WO-2001").await;

    assert_eq!(order.total.grand_total, Decimal::ZERO);

    let order = app
        .work_orders
        .append_labour(order.work_order_id, labour_entry("Wiring", dec!(2), dec!(100)))
        .await
        .expect("Failed to add labour");
    assert_eq!(order.total.total_labour_hours, dec!(2));
    assert_eq!(order.total.total_labour_cost, dec!(200));
    assert_eq!(order.total.grand_total, dec!(200));

    let order = app
        .work_orders
        .append_material(order.work_order_id, material_entry("Conduit", dec!(3), dec!(100)))
        .await
        .expect("Failed to add material");
    assert_eq!(order.total.total_material_cost, dec!(300));
    assert_eq!(order.total.grand_total, dec!(500));
}

#[tokio::test]
async fn negative_hours_are_rejected_with_a_field_error() {
    let app = spawn_app();
    let order = seeded_work_order(&app, "WO-2002").await;

    let mut entry = labour_entry("Rework", dec!(1), dec!(100));
    entry.hours = dec!(-1);

    let result = app.work_orders.append_labour(order.work_order_id, entry).await;

    match result {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.field_errors().contains_key("hours"));
        }
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn empty_material_description_is_rejected() {
    let app = spawn_app();
    let order = seeded_work_order(&app, "WO-2003").await;

    let entry = material_entry("", dec!(1), dec!(10));
    let result = app
        .work_orders
        .append_material(order.work_order_id, entry)
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn appending_to_an_unknown_work_order_is_not_found() {
    let app = spawn_app();

    let result = app
        .work_orders
        .append_labour(Uuid::new_v4(), labour_entry("Ghost", dec!(1), dec!(50)))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound { entity: "Work order" })
    ));
}
