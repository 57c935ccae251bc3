//! Domain requests accepted by the plan client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Currency, Interval};

/// Request to create a plan. `id`, `name`, `interval` and `currency` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CreatePlanRequest {
    pub id: String,
    pub amount: i64,
    pub currency: Currency,
    pub name: String,
    pub interval: Interval,
    /// Number of intervals between billings; zero means one.
    pub interval_count: u64,
    pub metadata: HashMap<String, String>,
    pub statement_descriptor: String,
    pub trial_period_days: u64,
}

/// Request to update the mutable fields of a plan.
///
/// Empty strings and zero values leave the stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdatePlanRequest {
    pub id: String,
    pub name: String,
    pub metadata: HashMap<String, String>,
    pub statement_descriptor: String,
    pub trial_period_days: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeletePlanRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetPlanRequest {
    pub id: String,
}

/// Bounds on a unix-seconds timestamp. Unset bounds are not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RangeFilter {
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
}

impl RangeFilter {
    pub fn is_empty(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListPlansRequest {
    pub starting_after: String,
    pub ending_before: String,
    /// Page size; zero means the default of 10.
    pub limit: u64,
    pub created: Option<RangeFilter>,
}
