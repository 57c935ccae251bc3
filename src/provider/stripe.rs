//! Stripe implementation of `PlanApi` over the `/v1/plans` REST resource.

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Url};

use crate::config::ClientConfig;
use crate::error::PlanError;
use crate::http::HttpClient;

use super::{PlanApi, PlanListParams, PlanParams, ProviderFailure, RequestOptions, api};

/// Stripe plan API client.
pub struct StripePlanApi {
    http_client: HttpClient,
    base_url: Url,
}

impl StripePlanApi {
    /// Create a client from configuration. Fails on an unusable API URL.
    pub fn new(config: &ClientConfig) -> Result<Self, PlanError> {
        Ok(Self {
            http_client: config.build_http_client()?,
            base_url: config.base_url()?,
        })
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    fn plans_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "plans"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url, options: &RequestOptions) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http_client
            .inner()
            .request(method, url)
            .headers(options.headers.clone())
    }
}

/// Form body of a create or update call. The id travels in the path on update.
fn plan_form(params: &PlanParams, include_id: bool) -> Vec<(String, String)> {
    let mut form = Vec::new();
    if include_id {
        form.push(("id".to_string(), params.id.clone()));
    }
    if let Some(amount) = params.amount {
        form.push(("amount".to_string(), amount.to_string()));
    }
    if let Some(currency) = &params.currency {
        form.push(("currency".to_string(), currency.clone()));
    }
    if let Some(interval) = &params.interval {
        form.push(("interval".to_string(), interval.clone()));
    }
    if let Some(count) = params.interval_count {
        form.push(("interval_count".to_string(), count.to_string()));
    }
    if let Some(name) = &params.name {
        form.push(("name".to_string(), name.clone()));
    }
    if let Some(descriptor) = &params.statement_descriptor {
        form.push(("statement_descriptor".to_string(), descriptor.clone()));
    }
    if let Some(days) = params.trial_period_days {
        form.push(("trial_period_days".to_string(), days.to_string()));
    }
    for (key, value) in &params.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }
    form
}

fn list_query(params: &PlanListParams) -> Vec<(String, String)> {
    let mut query = vec![("limit".to_string(), params.limit.to_string())];
    if let Some(cursor) = &params.starting_after {
        query.push(("starting_after".to_string(), cursor.clone()));
    }
    if let Some(cursor) = &params.ending_before {
        query.push(("ending_before".to_string(), cursor.clone()));
    }
    if let Some(created) = &params.created {
        let bounds = [
            ("gt", created.gt),
            ("gte", created.gte),
            ("lt", created.lt),
            ("lte", created.lte),
        ];
        for (op, value) in bounds {
            if let Some(value) = value {
                query.push((format!("created[{}]", op), value.to_string()));
            }
        }
    }
    query
}

#[async_trait]
impl PlanApi for StripePlanApi {
    #[tracing::instrument(skip(self, options))]
    async fn create(
        &self,
        params: &PlanParams,
        options: &RequestOptions,
    ) -> Result<api::Plan, ProviderFailure> {
        let request = self
            .request(Method::POST, self.plans_url(None), options)
            .form(&plan_form(params, true));
        self.http_client.send_json(request).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn get(&self, id: &str, options: &RequestOptions) -> Result<api::Plan, ProviderFailure> {
        let request = self.request(Method::GET, self.plans_url(Some(id)), options);
        self.http_client.send_json(request).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn update(
        &self,
        params: &PlanParams,
        options: &RequestOptions,
    ) -> Result<api::Plan, ProviderFailure> {
        let request = self
            .request(Method::POST, self.plans_url(Some(&params.id)), options)
            .form(&plan_form(params, false));
        self.http_client.send_json(request).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn delete(
        &self,
        id: &str,
        options: &RequestOptions,
    ) -> Result<api::DeletedPlan, ProviderFailure> {
        let request = self.request(Method::DELETE, self.plans_url(Some(id)), options);
        self.http_client.send_json(request).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn list(
        &self,
        params: &PlanListParams,
        options: &RequestOptions,
    ) -> Result<api::ListPage, ProviderFailure> {
        let request = self
            .request(Method::GET, self.plans_url(None), options)
            .query(&list_query(params));
        self.http_client.send_json(request).await
    }
}
