//! Services module for workorder-service.

pub mod estimates;
pub mod metrics;
pub mod money;
pub mod numbering;
pub mod reconciliation;
pub mod store;
pub mod work_orders;

pub use estimates::EstimateService;
pub use metrics::{get_metrics, init_metrics};
pub use reconciliation::{build_final_statement, ReconciliationService};
pub use store::{InMemoryStore, Store};
pub use work_orders::WorkOrderService;
