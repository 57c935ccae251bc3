//! The plan client: validation, parameter building, retried execution and
//! response translation for the five plan operations.

pub mod convert;
pub mod errors;
pub mod executor;
pub mod params;
pub mod stream;
pub mod tokens;

use log::debug;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::domain::Validate;
use crate::domain::model::{
    CallContext, CreatePlanRequest, DeletePlanRequest, DeletePlanResponse, GetPlanRequest,
    ListPlansRequest, PlanResponse, UpdatePlanRequest,
};
use crate::error::PlanError;
use crate::provider::{PlanApi, StripePlanApi};
use crate::retry::{BackoffPolicy, Outcome};

pub use executor::{PlanAction, execute_delete, execute_list_init, execute_plan};
pub use stream::PlanIterator;

/// Recurring billing plan operations against a provider.
///
/// Every call validates its request first. Provider business errors come
/// back as the `Error` variant of an `Ok` result; `Err` is reserved for
/// invalid requests and for calls stopped by their deadline or cancellation.
pub struct PlanClient<A: PlanApi + ?Sized = StripePlanApi> {
    api: Arc<A>,
    backoff: BackoffPolicy,
}

impl PlanClient<StripePlanApi> {
    /// Creates a client talking to Stripe with the given configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, PlanError> {
        let api = StripePlanApi::new(config)?;
        Ok(Self::new(Arc::new(api), config.backoff))
    }
}

impl<A: PlanApi + ?Sized> PlanClient<A> {
    pub fn new(api: Arc<A>, backoff: BackoffPolicy) -> Self {
        Self { api, backoff }
    }

    #[tracing::instrument(skip(self, req, ctx), fields(id = %req.id))]
    pub async fn create(
        &self,
        req: &CreatePlanRequest,
        ctx: &CallContext,
    ) -> Result<PlanResponse, PlanError> {
        req.validate()?;
        let params = params::create_params(req);
        let options = params::request_options(ctx);
        execute_plan(
            self.api.as_ref(),
            PlanAction::Create,
            &params,
            &options,
            &self.backoff,
            ctx,
        )
        .await
    }

    #[tracing::instrument(skip(self, req, ctx), fields(id = %req.id))]
    pub async fn update(
        &self,
        req: &UpdatePlanRequest,
        ctx: &CallContext,
    ) -> Result<PlanResponse, PlanError> {
        req.validate()?;
        let params = params::update_params(req);
        let options = params::request_options(ctx);
        execute_plan(
            self.api.as_ref(),
            PlanAction::Update,
            &params,
            &options,
            &self.backoff,
            ctx,
        )
        .await
    }

    #[tracing::instrument(skip(self, req, ctx), fields(id = %req.id))]
    pub async fn get(
        &self,
        req: &GetPlanRequest,
        ctx: &CallContext,
    ) -> Result<PlanResponse, PlanError> {
        req.validate()?;
        let params = params::id_params(&req.id);
        let options = params::request_options(ctx);
        execute_plan(
            self.api.as_ref(),
            PlanAction::Get,
            &params,
            &options,
            &self.backoff,
            ctx,
        )
        .await
    }

    #[tracing::instrument(skip(self, req, ctx), fields(id = %req.id))]
    pub async fn delete(
        &self,
        req: &DeletePlanRequest,
        ctx: &CallContext,
    ) -> Result<DeletePlanResponse, PlanError> {
        req.validate()?;
        let options = params::request_options(ctx);
        execute_delete(self.api.as_ref(), &req.id, &options, &self.backoff, ctx).await
    }

    /// Starts listing plans. Only the first page is fetched here, under the
    /// retry loop; later pages are fetched as the iterator advances.
    #[tracing::instrument(skip(self, req, ctx))]
    pub async fn list(
        &self,
        req: Option<&ListPlansRequest>,
        ctx: &CallContext,
    ) -> Result<PlanIterator<A>, PlanError> {
        if let Some(req) = req {
            req.validate()?;
        }
        let params = params::list_params(req);
        let options = params::request_options(ctx);

        let outcome =
            execute_list_init(self.api.as_ref(), &params, &options, &self.backoff, ctx).await?;
        let api = Arc::clone(&self.api);
        Ok(match outcome {
            Outcome::Completed(page) => {
                debug!("First page holds {} plan(s)", page.data.len());
                PlanIterator::new(api, params, options, page)
            }
            Outcome::Rejected(error) => PlanIterator::failed(
                api,
                params,
                options,
                errors::api_error_to_provider_error(&error),
            ),
        })
    }
}
