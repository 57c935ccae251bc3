//! Runs one provider operation under the retry loop and translates the result.

use std::fmt;

use super::convert::{deleted_to_response, plan_to_response};
use super::errors::api_error_to_provider_error;
use crate::domain::model::{CallContext, DeletePlanResponse, PlanResponse};
use crate::error::PlanError;
use crate::provider::{PlanApi, PlanListParams, PlanParams, RequestOptions, api};
use crate::retry::{BackoffPolicy, Interrupted, Outcome, retry_with_backoff};

/// Which provider operation a call performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanAction {
    Create,
    Update,
    Get,
    Delete,
    ListInit,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::Create => write!(f, "create"),
            PlanAction::Update => write!(f, "update"),
            PlanAction::Get => write!(f, "get"),
            PlanAction::Delete => write!(f, "delete"),
            PlanAction::ListInit => write!(f, "list"),
        }
    }
}

fn interrupted(action: PlanAction) -> impl Fn(Interrupted) -> PlanError {
    move |i| PlanError::interrupted(i.reason, action, i.attempts)
}

/// Executes a create, update or get. Other actions are rejected before any
/// provider call.
#[tracing::instrument(skip(api, params, options, policy, ctx))]
pub async fn execute_plan<A: PlanApi + ?Sized>(
    api: &A,
    action: PlanAction,
    params: &PlanParams,
    options: &RequestOptions,
    policy: &BackoffPolicy,
    ctx: &CallContext,
) -> Result<PlanResponse, PlanError> {
    let operation = format!("{} plan {}", action, params.id);
    let outcome = match action {
        PlanAction::Create => {
            retry_with_backoff(policy, ctx, &operation, || api.create(params, options)).await
        }
        PlanAction::Update => {
            retry_with_backoff(policy, ctx, &operation, || api.update(params, options)).await
        }
        PlanAction::Get => {
            retry_with_backoff(policy, ctx, &operation, || api.get(&params.id, options)).await
        }
        PlanAction::Delete | PlanAction::ListInit => {
            return Err(PlanError::UnsupportedAction { action });
        }
    };

    match outcome.map_err(interrupted(action))? {
        Outcome::Completed(plan) => Ok(plan_to_response(plan)),
        Outcome::Rejected(error) => Ok(PlanResponse::Error(api_error_to_provider_error(&error))),
    }
}

#[tracing::instrument(skip(api, options, policy, ctx))]
pub async fn execute_delete<A: PlanApi + ?Sized>(
    api: &A,
    id: &str,
    options: &RequestOptions,
    policy: &BackoffPolicy,
    ctx: &CallContext,
) -> Result<DeletePlanResponse, PlanError> {
    let operation = format!("delete plan {}", id);
    let outcome = retry_with_backoff(policy, ctx, &operation, || api.delete(id, options))
        .await
        .map_err(interrupted(PlanAction::Delete))?;

    match outcome {
        Outcome::Completed(deleted) => Ok(deleted_to_response(deleted)),
        Outcome::Rejected(error) => Ok(DeletePlanResponse::Error(api_error_to_provider_error(
            &error,
        ))),
    }
}

/// Fetches the first page of a list under the retry loop.
#[tracing::instrument(skip(api, params, options, policy, ctx))]
pub async fn execute_list_init<A: PlanApi + ?Sized>(
    api: &A,
    params: &PlanListParams,
    options: &RequestOptions,
    policy: &BackoffPolicy,
    ctx: &CallContext,
) -> Result<Outcome<api::ListPage>, PlanError> {
    retry_with_backoff(policy, ctx, "list plans", || api.list(params, options))
        .await
        .map_err(interrupted(PlanAction::ListInit))
}
