//! Preconditions checked on every request before it reaches the provider.

use thiserror::Error;

use super::model::{
    CreatePlanRequest, Currency, DeletePlanRequest, GetPlanRequest, Interval, ListPlansRequest,
    UpdatePlanRequest,
};

/// A request field failed its precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait Validate {
    /// Returns the first failing field, if any.
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_id(id: &str, verb: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new(
            "id",
            format!("id is required to {} a plan", verb),
        ));
    }
    Ok(())
}

impl Validate for CreatePlanRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id, "create")?;
        if self.name.is_empty() {
            return Err(ValidationError::new(
                "name",
                "name is required to create a plan",
            ));
        }
        if self.interval == Interval::Unspecified {
            return Err(ValidationError::new("interval", "plan interval is required"));
        }
        if self.currency == Currency::Unspecified {
            return Err(ValidationError::new("currency", "plan currency is required"));
        }
        Ok(())
    }
}

impl Validate for UpdatePlanRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id, "update")
    }
}

impl Validate for DeletePlanRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id, "delete")
    }
}

impl Validate for GetPlanRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id, "get")
    }
}

impl Validate for ListPlansRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
