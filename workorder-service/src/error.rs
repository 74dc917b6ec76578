//! Typed domain errors for workorder-service.
//!
//! Every core operation returns these as values; the hosting layer maps
//! each kind onto a transport response via `AppError`.

use crate::models::{EstimateStatus, JobStatus};
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Estimate already exists for work order {0}")]
    DuplicateEstimate(Uuid),

    #[error("Cannot modify approved estimate {0}")]
    EstimateLocked(String),

    #[error("Estimate {0} is already approved")]
    AlreadyApproved(String),

    #[error("Cannot transition estimate from {current} to {requested}, allowed: {allowed:?}")]
    InvalidTransition {
        current: EstimateStatus,
        requested: EstimateStatus,
        allowed: Vec<EstimateStatus>,
    },

    #[error("Cannot {action} work order with status {current}")]
    InvalidJobTransition {
        action: &'static str,
        current: JobStatus,
    },

    #[error("Conflict: {0}")]
    ConcurrencyConflict(String),
}

impl DomainError {
    /// Stable label for the error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::NotFound { .. } => "not_found",
            DomainError::DuplicateEstimate(_) => "duplicate_estimate",
            DomainError::EstimateLocked(_) => "estimate_locked",
            DomainError::AlreadyApproved(_) => "already_approved",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::InvalidJobTransition { .. } => "invalid_job_transition",
            DomainError::ConcurrencyConflict(_) => "concurrency_conflict",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(e) => AppError::ValidationError(e),
            DomainError::NotFound { .. } => AppError::NotFound(anyhow::anyhow!("{}", err)),
            DomainError::DuplicateEstimate(_) | DomainError::ConcurrencyConflict(_) => {
                AppError::Conflict(anyhow::anyhow!("{}", err))
            }
            DomainError::EstimateLocked(_)
            | DomainError::AlreadyApproved(_)
            | DomainError::InvalidTransition { .. }
            | DomainError::InvalidJobTransition { .. } => {
                AppError::BadRequest(anyhow::anyhow!("{}", err))
            }
        }
    }
}
