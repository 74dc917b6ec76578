//! Money math for estimates and totals.
//!
//! Pure functions over `Decimal`. `compute_financials` is the single
//! authoritative subtotal/discount/tax/grand-total formula; estimate
//! creation and update both go through it rather than carrying their
//! own arithmetic.

use crate::models::{AdditionalCharge, Discount, DiscountType, LabourLineItem, MaterialLineItem};
use rust_decimal::Decimal;
use serde::Serialize;

/// Derived financial block for an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateFinancials {
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub amount_after_discount: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
}

/// Sum of each item's already-computed cost field. Zero for empty inputs.
pub fn subtotal(
    labour: &[LabourLineItem],
    materials: &[MaterialLineItem],
    charges: &[AdditionalCharge],
) -> Decimal {
    let labour_total: Decimal = labour.iter().map(|entry| entry.total_cost).sum();
    let material_total: Decimal = materials.iter().map(|entry| entry.amount).sum();
    let charges_total: Decimal = charges.iter().map(|charge| charge.amount).sum();

    labour_total + material_total + charges_total
}

/// Discount amount for a single discount against a subtotal. No upper
/// clamp here; the post-discount amount is clamped downstream.
pub fn discount_amount(subtotal: Decimal, discount_type: DiscountType, value: Decimal) -> Decimal {
    match discount_type {
        DiscountType::Percentage => subtotal * value / Decimal::ONE_HUNDRED,
        DiscountType::Fixed => value,
    }
}

/// Refresh every discount's cached `amount` against the given subtotal.
/// Client-submitted amounts are never trusted; this must run before any
/// grand-total computation that takes caller-supplied discounts.
pub fn recalculate_discounts(subtotal: Decimal, discounts: &[Discount]) -> Vec<Discount> {
    discounts
        .iter()
        .map(|discount| Discount {
            amount: discount_amount(subtotal, discount.discount_type, discount.value),
            ..discount.clone()
        })
        .collect()
}

/// Subtotal minus all discount amounts, clamped so the result is never
/// negative.
pub fn apply_discounts(subtotal: Decimal, discounts: &[Discount]) -> Decimal {
    let total_discount: Decimal = discounts.iter().map(|discount| discount.amount).sum();
    (subtotal - total_discount).max(Decimal::ZERO)
}

/// Tax on the post-discount amount.
pub fn tax_amount(amount_after_discount: Decimal, tax_percentage: Decimal) -> Decimal {
    amount_after_discount * tax_percentage / Decimal::ONE_HUNDRED
}

/// Compose subtotal, discounts and tax into the full financial block.
pub fn compute_financials(
    labour: &[LabourLineItem],
    materials: &[MaterialLineItem],
    charges: &[AdditionalCharge],
    discounts: &[Discount],
    tax_percentage: Decimal,
) -> EstimateFinancials {
    let subtotal = subtotal(labour, materials, charges);
    let total_discount: Decimal = discounts.iter().map(|discount| discount.amount).sum();
    let amount_after_discount = (subtotal - total_discount).max(Decimal::ZERO);
    let tax = tax_amount(amount_after_discount, tax_percentage);

    EstimateFinancials {
        subtotal,
        total_discount,
        amount_after_discount,
        tax_amount: tax,
        grand_total: amount_after_discount + tax,
    }
}
