//! Translation of provider objects into unified responses.

use serde_json::Value;

use super::errors::api_error_to_provider_error;
use super::tokens::{currency_from_token, interval_from_token};
use crate::domain::model::{
    DeletePlanResponse, DeletedPlan, ErrorType, Plan, PlanResponse, ProviderError,
};
use crate::provider::api;

impl From<api::Plan> for Plan {
    fn from(plan: api::Plan) -> Self {
        Plan {
            id: plan.id,
            amount: plan.amount.unwrap_or_default(),
            currency: currency_from_token(&plan.currency),
            interval: interval_from_token(&plan.interval),
            interval_count: plan.interval_count,
            metadata: plan.metadata.unwrap_or_default(),
            livemode: plan.livemode,
            created: plan.created,
            name: plan.name.unwrap_or_default(),
            statement_descriptor: plan.statement_descriptor.unwrap_or_default(),
            trial_period_days: plan.trial_period_days.unwrap_or_default(),
        }
    }
}

impl From<api::DeletedPlan> for DeletedPlan {
    fn from(deleted: api::DeletedPlan) -> Self {
        DeletedPlan {
            id: deleted.id,
            deleted: deleted.deleted,
        }
    }
}

pub fn plan_to_response(plan: api::Plan) -> PlanResponse {
    PlanResponse::Success(plan.into())
}

pub fn deleted_to_response(deleted: api::DeletedPlan) -> DeletePlanResponse {
    DeletePlanResponse::Success(deleted.into())
}

/// Translates one raw list item. An embedded error object, or anything that
/// does not decode as a plan, becomes an `Error` response for this item only.
pub fn item_to_response(item: &Value) -> PlanResponse {
    if let Some(error) = item.get("error").filter(|e| e.is_object()) {
        return match serde_json::from_value::<api::ApiError>(error.clone()) {
            Ok(error) => PlanResponse::Error(api_error_to_provider_error(&error)),
            Err(e) => PlanResponse::Error(undecodable_item(e)),
        };
    }

    match serde_json::from_value::<api::Plan>(item.clone()) {
        Ok(plan) => plan_to_response(plan),
        Err(e) => PlanResponse::Error(undecodable_item(e)),
    }
}

fn undecodable_item(e: serde_json::Error) -> ProviderError {
    ProviderError {
        error_type: ErrorType::Api,
        message: format!("unexpected plan object in list: {}", e),
        ..Default::default()
    }
}
