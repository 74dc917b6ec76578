//! Final statement projection: estimated vs actual costs for a work
//! order. Computed on demand, never persisted.

use crate::models::{Estimate, WorkOrder};
use rust_decimal::Decimal;
use serde::Serialize;

/// Per-line labour comparison, matched by normalized description.
#[derive(Debug, Clone, Serialize)]
pub struct LabourComparison {
    pub description: String,
    pub estimated_hours: Decimal,
    pub actual_hours: Decimal,
    pub estimated_cost: Decimal,
    pub actual_cost: Decimal,
    pub variance: Decimal,
}

/// Per-line material comparison, matched by normalized description.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialComparison {
    pub description: String,
    pub estimated_quantity: Decimal,
    pub actual_quantity: Decimal,
    pub estimated_amount: Decimal,
    pub actual_amount: Decimal,
    pub variance: Decimal,
}

/// Estimated cost block, taken from the estimate's persisted totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EstimatedCosts {
    pub labour_cost: Decimal,
    pub material_cost: Decimal,
    pub additional_charges: Decimal,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

/// Actual cost block, summed from the work order's entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActualCosts {
    pub labour_cost: Decimal,
    pub material_cost: Decimal,
    pub grand_total: Decimal,
}

/// Actual minus estimated; positive means overrun.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CostVariance {
    pub labour_cost: Decimal,
    pub material_cost: Decimal,
    pub total: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FinancialSummary {
    pub estimated: EstimatedCosts,
    pub actual: ActualCosts,
    pub variance: CostVariance,
}

/// On-demand reconciliation of a work order against its estimate.
#[derive(Debug, Clone, Serialize)]
pub struct FinalStatement {
    pub work_order: WorkOrder,
    pub estimate: Option<Estimate>,
    pub has_estimate: bool,
    pub labour_comparison: Vec<LabourComparison>,
    pub material_comparison: Vec<MaterialComparison>,
    pub financial_summary: FinancialSummary,
}
