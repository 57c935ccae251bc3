//! Outer failures of a plan call.
//!
//! Provider business errors are not listed here: they come back inside the
//! `Error` variant of a successful result.

use thiserror::Error;

use crate::domain::ValidationError;
use crate::domain::model::Interrupt;
use crate::plan::PlanAction;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("{action} plan: deadline exceeded after {attempts} attempt(s)")]
    DeadlineExceeded { action: PlanAction, attempts: u32 },

    #[error("{action} plan: cancelled after {attempts} attempt(s)")]
    Cancelled { action: PlanAction, attempts: u32 },

    #[error("{action} is not handled by this operation")]
    UnsupportedAction { action: PlanAction },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PlanError {
    pub(crate) fn interrupted(reason: Interrupt, action: PlanAction, attempts: u32) -> Self {
        match reason {
            Interrupt::DeadlineExceeded => PlanError::DeadlineExceeded { action, attempts },
            Interrupt::Cancelled => PlanError::Cancelled { action, attempts },
        }
    }

    /// True for failures caused by the call's deadline or cancellation.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            PlanError::DeadlineExceeded { .. } | PlanError::Cancelled { .. }
        )
    }
}
