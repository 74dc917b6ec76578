//! Domain models for workorder-service.

mod estimate;
mod line_item;
mod statement;
mod work_order;

pub use estimate::{CreateEstimate, Estimate, EstimateStatus, UpdateEstimate};
pub use line_item::{
    AdditionalCharge, Discount, DiscountInput, DiscountType, LabourLineItem, MaterialLineItem,
};
pub use statement::{
    ActualCosts, CostVariance, EstimatedCosts, FinalStatement, FinancialSummary, LabourComparison,
    MaterialComparison,
};
pub use work_order::{
    Approval, Client, CreateWorkOrder, JobInfo, JobStatus, OrderDetail, WorkOrder, WorkOrderTotal,
};
