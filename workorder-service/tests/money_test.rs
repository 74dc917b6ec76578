//! Money math tests: subtotal, discount recalculation, clamping and the
//! grand-total formula.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use workorder_service::models::{Discount, DiscountType};
use workorder_service::services::money;

mod common;

use common::{charge, labour_entry, material_entry};

fn discount(discount_type: DiscountType, value: Decimal) -> Discount {
    Discount {
        description: "Test discount".to_string(),
        discount_type,
        value,
        // Deliberately wrong; recalculation must replace it.
        amount: dec!(999),
    }
}

#[test]
fn subtotal_sums_labour_materials_and_charges() {
    let labour = vec![labour_entry("Welding", dec!(2), dec!(100))];
    let materials = vec![material_entry("Steel plate", dec!(3), dec!(50))];
    let charges = vec![charge("Site visit", dec!(25))];

    let subtotal = money::subtotal(&labour, &materials, &charges);

    assert_eq!(subtotal, dec!(375));
}

#[test]
fn subtotal_of_empty_inputs_is_zero() {
    assert_eq!(money::subtotal(&[], &[], &[]), Decimal::ZERO);
}

#[test]
fn percentage_discount_is_fraction_of_subtotal() {
    assert_eq!(
        money::discount_amount(dec!(1000), DiscountType::Percentage, dec!(10)),
        dec!(100)
    );
}

#[test]
fn fixed_discount_is_taken_verbatim() {
    assert_eq!(
        money::discount_amount(dec!(1000), DiscountType::Fixed, dec!(150)),
        dec!(150)
    );
}

#[test]
fn recalculate_discounts_ignores_submitted_amounts() {
    let discounts = vec![
        discount(DiscountType::Percentage, dec!(10)),
        discount(DiscountType::Fixed, dec!(50)),
    ];

    let recalculated = money::recalculate_discounts(dec!(1000), &discounts);

    assert_eq!(recalculated[0].amount, dec!(100));
    assert_eq!(recalculated[1].amount, dec!(50));
}

#[test]
fn recalculate_discounts_is_idempotent() {
    let discounts = vec![discount(DiscountType::Percentage, dec!(10))];

    let once = money::recalculate_discounts(dec!(1000), &discounts);
    let twice = money::recalculate_discounts(dec!(1000), &once);

    assert_eq!(once, twice);
}

#[test]
fn discounts_cannot_push_amount_below_zero() {
    let discounts = vec![discount(DiscountType::Fixed, dec!(2000))];
    let recalculated = money::recalculate_discounts(dec!(1000), &discounts);

    assert_eq!(money::apply_discounts(dec!(1000), &recalculated), Decimal::ZERO);
}

#[test]
fn grand_total_is_discounted_subtotal_plus_tax() {
    let labour = vec![labour_entry("Assembly", dec!(5), dec!(100))];
    let materials = vec![material_entry("Fasteners", dec!(10), dec!(50))];
    let charges = vec![];

    let subtotal = money::subtotal(&labour, &materials, &charges);
    let discounts = money::recalculate_discounts(
        subtotal,
        &[discount(DiscountType::Percentage, dec!(10))],
    );

    let financials =
        money::compute_financials(&labour, &materials, &charges, &discounts, dec!(10));

    // 500 + 500 = 1000; minus 10% = 900; plus 10% tax = 990.
    assert_eq!(financials.subtotal, dec!(1000));
    assert_eq!(financials.total_discount, dec!(100));
    assert_eq!(financials.amount_after_discount, dec!(900));
    assert_eq!(financials.tax_amount, dec!(90));
    assert_eq!(financials.grand_total, dec!(990));
}

#[test]
fn tax_applies_to_clamped_amount_when_discounts_exceed_subtotal() {
    let materials = vec![material_entry("Paint", dec!(1), dec!(100))];
    let discounts =
        money::recalculate_discounts(dec!(100), &[discount(DiscountType::Fixed, dec!(500))]);

    let financials = money::compute_financials(&[], &materials, &[], &discounts, dec!(18));

    assert_eq!(financials.amount_after_discount, Decimal::ZERO);
    assert_eq!(financials.tax_amount, Decimal::ZERO);
    assert_eq!(financials.grand_total, Decimal::ZERO);
}

#[test]
fn zero_tax_leaves_grand_total_at_discounted_subtotal() {
    let materials = vec![material_entry("Cable", dec!(4), dec!(25))];
    let financials = money::compute_financials(&[], &materials, &[], &[], Decimal::ZERO);

    assert_eq!(financials.grand_total, dec!(100));
    assert_eq!(financials.tax_amount, Decimal::ZERO);
}
