//! Builds provider parameters from a validated request and its call context.

use log::warn;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::{BTreeMap, HashMap};

use super::tokens::{currency_token, interval_token};
use crate::domain::model::{
    CallContext, CreatePlanRequest, ListPlansRequest, RangeFilter, UpdatePlanRequest,
};
use crate::provider::{PlanListParams, PlanParams, RangeParams, RequestOptions};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub const ACCOUNT_HEADER: &str = "Stripe-Account";

pub const DEFAULT_INTERVAL_COUNT: u64 = 1;
pub const DEFAULT_LIST_LIMIT: u64 = 10;

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_zero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

fn sorted_metadata(metadata: &HashMap<String, String>) -> BTreeMap<String, String> {
    metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!("Skipping header {} with an invalid name or value", name),
    }
}

/// Request options carried by the call context. Custom headers are applied
/// first, so the idempotency key and account always win over a custom header
/// of the same name.
pub fn request_options(ctx: &CallContext) -> RequestOptions {
    let mut headers = HeaderMap::new();
    for (name, value) in &ctx.headers {
        insert_header(&mut headers, name, value);
    }
    if let Some(key) = &ctx.idempotency_key {
        insert_header(&mut headers, IDEMPOTENCY_KEY_HEADER, key);
    }
    if let Some(account) = &ctx.account {
        insert_header(&mut headers, ACCOUNT_HEADER, account);
    }

    RequestOptions { headers }
}

pub fn create_params(req: &CreatePlanRequest) -> PlanParams {
    let interval_count = if req.interval_count == 0 {
        DEFAULT_INTERVAL_COUNT
    } else {
        req.interval_count
    };

    PlanParams {
        id: req.id.clone(),
        amount: Some(req.amount),
        currency: non_empty(currency_token(req.currency)),
        interval: non_empty(interval_token(req.interval)),
        interval_count: Some(interval_count),
        name: non_empty(&req.name),
        statement_descriptor: non_empty(&req.statement_descriptor),
        trial_period_days: non_zero(req.trial_period_days),
        metadata: sorted_metadata(&req.metadata),
    }
}

/// Only fields that carry a value are sent, so the provider keeps the rest.
pub fn update_params(req: &UpdatePlanRequest) -> PlanParams {
    PlanParams {
        id: req.id.clone(),
        name: non_empty(&req.name),
        statement_descriptor: non_empty(&req.statement_descriptor),
        trial_period_days: non_zero(req.trial_period_days),
        metadata: sorted_metadata(&req.metadata),
        ..Default::default()
    }
}

/// Get and delete identify the plan and send nothing else.
pub fn id_params(id: &str) -> PlanParams {
    PlanParams {
        id: id.to_string(),
        ..Default::default()
    }
}

fn range_params(filter: &RangeFilter) -> Option<RangeParams> {
    if filter.is_empty() {
        return None;
    }
    Some(RangeParams {
        gt: filter.gt,
        gte: filter.gte,
        lt: filter.lt,
        lte: filter.lte,
    })
}

/// A missing request lists with defaults.
pub fn list_params(req: Option<&ListPlansRequest>) -> PlanListParams {
    let Some(req) = req else {
        return PlanListParams {
            limit: DEFAULT_LIST_LIMIT,
            ..Default::default()
        };
    };

    PlanListParams {
        starting_after: non_empty(&req.starting_after),
        ending_before: non_empty(&req.ending_before),
        limit: if req.limit == 0 {
            DEFAULT_LIST_LIMIT
        } else {
            req.limit
        },
        created: req.created.as_ref().and_then(range_params),
    }
}
