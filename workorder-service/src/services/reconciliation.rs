//! Reconciliation of estimated vs actual costs into a final statement.
//!
//! Line matching is a single pass keyed by trimmed, lowercased
//! description. Estimate lines seed the output in order; actual entries
//! either overwrite the actual side of a seeded row or append a new row
//! with a zero estimated baseline. Two estimate lines sharing a
//! description collapse into one row (last write wins for the estimated
//! side) - an accepted limitation of description matching, not a bug.

use crate::error::DomainError;
use crate::models::{
    ActualCosts, CostVariance, Estimate, EstimatedCosts, FinalStatement, FinancialSummary,
    LabourComparison, MaterialComparison, WorkOrder,
};
use crate::services::metrics::STATEMENTS_TOTAL;
use crate::services::store::Store;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

fn normalize(description: &str) -> String {
    description.trim().to_lowercase()
}

fn labour_comparison(
    estimated: &[crate::models::LabourLineItem],
    actual: &[crate::models::LabourLineItem],
) -> Vec<LabourComparison> {
    let mut rows: Vec<LabourComparison> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in estimated {
        let row = LabourComparison {
            description: line.description.clone(),
            estimated_hours: line.hours,
            actual_hours: Decimal::ZERO,
            estimated_cost: line.total_cost,
            actual_cost: Decimal::ZERO,
            variance: -line.total_cost,
        };
        match index.get(&normalize(&line.description)) {
            Some(&at) => rows[at] = row,
            None => {
                index.insert(normalize(&line.description), rows.len());
                rows.push(row);
            }
        }
    }

    for entry in actual {
        let key = normalize(&entry.description);
        match index.get(&key) {
            Some(&at) => {
                let row = &mut rows[at];
                row.actual_hours = entry.hours;
                row.actual_cost = entry.total_cost;
                row.variance = row.actual_cost - row.estimated_cost;
            }
            None => {
                index.insert(key, rows.len());
                rows.push(LabourComparison {
                    description: entry.description.clone(),
                    estimated_hours: Decimal::ZERO,
                    actual_hours: entry.hours,
                    estimated_cost: Decimal::ZERO,
                    actual_cost: entry.total_cost,
                    variance: entry.total_cost,
                });
            }
        }
    }

    rows
}

fn material_comparison(
    estimated: &[crate::models::MaterialLineItem],
    actual: &[crate::models::MaterialLineItem],
) -> Vec<MaterialComparison> {
    let mut rows: Vec<MaterialComparison> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in estimated {
        let row = MaterialComparison {
            description: line.description.clone(),
            estimated_quantity: line.quantity,
            actual_quantity: Decimal::ZERO,
            estimated_amount: line.amount,
            actual_amount: Decimal::ZERO,
            variance: -line.amount,
        };
        match index.get(&normalize(&line.description)) {
            Some(&at) => rows[at] = row,
            None => {
                index.insert(normalize(&line.description), rows.len());
                rows.push(row);
            }
        }
    }

    for entry in actual {
        let key = normalize(&entry.description);
        match index.get(&key) {
            Some(&at) => {
                let row = &mut rows[at];
                row.actual_quantity = entry.quantity;
                row.actual_amount = entry.amount;
                row.variance = row.actual_amount - row.estimated_amount;
            }
            None => {
                index.insert(key, rows.len());
                rows.push(MaterialComparison {
                    description: entry.description.clone(),
                    estimated_quantity: Decimal::ZERO,
                    actual_quantity: entry.quantity,
                    estimated_amount: Decimal::ZERO,
                    actual_amount: entry.amount,
                    variance: entry.amount,
                });
            }
        }
    }

    rows
}

/// Build the final statement for a work order against its estimate, if
/// any. Actuals are straight sums over the work order's entries; the
/// estimated block trusts the estimate's persisted totals as the
/// baseline rather than recomputing them.
pub fn build_final_statement(
    work_order: &WorkOrder,
    estimate: Option<&Estimate>,
) -> FinalStatement {
    let actual_labour_cost: Decimal = work_order
        .labour_entry
        .iter()
        .map(|entry| entry.total_cost)
        .sum();
    let actual_material_cost: Decimal = work_order
        .material_entry
        .iter()
        .map(|entry| entry.amount)
        .sum();
    let actual_grand_total = actual_labour_cost + actual_material_cost;

    let actual = ActualCosts {
        labour_cost: actual_labour_cost,
        material_cost: actual_material_cost,
        grand_total: actual_grand_total,
    };

    let Some(estimate) = estimate else {
        return FinalStatement {
            work_order: work_order.clone(),
            estimate: None,
            has_estimate: false,
            labour_comparison: Vec::new(),
            material_comparison: Vec::new(),
            financial_summary: FinancialSummary {
                estimated: EstimatedCosts::default(),
                actual,
                variance: CostVariance::default(),
            },
        };
    };

    let estimated_labour_cost: Decimal = estimate
        .estimated_labour
        .iter()
        .map(|entry| entry.total_cost)
        .sum();
    let estimated_material_cost: Decimal = estimate
        .estimated_materials
        .iter()
        .map(|entry| entry.amount)
        .sum();
    let estimated_charges: Decimal = estimate
        .additional_charges
        .iter()
        .map(|charge| charge.amount)
        .sum();
    let estimated_discount: Decimal = estimate
        .discounts
        .iter()
        .map(|discount| discount.amount)
        .sum();

    let total_variance = actual_grand_total - estimate.grand_total;
    let variance_percentage = if estimate.grand_total.is_zero() {
        Decimal::ZERO
    } else {
        total_variance / estimate.grand_total * Decimal::ONE_HUNDRED
    };

    FinalStatement {
        work_order: work_order.clone(),
        estimate: Some(estimate.clone()),
        has_estimate: true,
        labour_comparison: labour_comparison(&estimate.estimated_labour, &work_order.labour_entry),
        material_comparison: material_comparison(
            &estimate.estimated_materials,
            &work_order.material_entry,
        ),
        financial_summary: FinancialSummary {
            estimated: EstimatedCosts {
                labour_cost: estimated_labour_cost,
                material_cost: estimated_material_cost,
                additional_charges: estimated_charges,
                subtotal: estimate.subtotal,
                discount: estimated_discount,
                tax: estimate.tax_amount,
                grand_total: estimate.grand_total,
            },
            actual,
            variance: CostVariance {
                labour_cost: actual_labour_cost - estimated_labour_cost,
                material_cost: actual_material_cost - estimated_material_cost,
                total: total_variance,
                percentage: variance_percentage,
            },
        },
    }
}

pub struct ReconciliationService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ReconciliationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the work order and its estimate (if any) and project the
    /// final statement. Always a fresh computation, never persisted.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn final_statement(
        &self,
        work_order_id: Uuid,
    ) -> Result<FinalStatement, DomainError> {
        let work_order = self.store.get_work_order(work_order_id).await?;
        let estimate = self
            .store
            .find_estimate_for_work_order(work_order_id)
            .await?;

        let statement = build_final_statement(&work_order, estimate.as_ref());

        STATEMENTS_TOTAL.inc();

        info!(
            has_estimate = statement.has_estimate,
            actual_grand_total = %statement.financial_summary.actual.grand_total,
            "Final statement generated"
        );

        Ok(statement)
    }
}
