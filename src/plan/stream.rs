//! Lazy, forward-only iteration over a paginated plan list.

use futures_util::Stream;
use log::{debug, warn};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

use super::convert::item_to_response;
use super::errors::failure_to_provider_error;
use crate::domain::model::{PlanResponse, ProviderError};
use crate::provider::{PlanApi, PlanListParams, RequestOptions, api};

enum Slot {
    Item(Value),
    Failure(ProviderError),
}

/// Cursor over the plans returned by a list call.
///
/// Call [`advance`](Self::advance) before each [`current`](Self::current).
/// Items are translated when read, so one malformed item does not stop the
/// iteration. Follow-up pages are fetched once each, without retries; a
/// failed fetch yields one final `Error` item. When listing with
/// `ending_before`, plans come out in reverse provider order, each page
/// reversed as it is loaded.
pub struct PlanIterator<A: PlanApi + ?Sized> {
    api: Arc<A>,
    params: PlanListParams,
    options: RequestOptions,
    page: VecDeque<Value>,
    has_more: bool,
    next_cursor: Option<String>,
    pending_error: Option<ProviderError>,
    current: Option<Slot>,
}

impl<A: PlanApi + ?Sized> PlanIterator<A> {
    /// Starts from an already fetched first page.
    pub fn new(
        api: Arc<A>,
        params: PlanListParams,
        options: RequestOptions,
        first_page: api::ListPage,
    ) -> Self {
        let mut iter = Self {
            api,
            params,
            options,
            page: VecDeque::new(),
            has_more: false,
            next_cursor: None,
            pending_error: None,
            current: None,
        };
        iter.load(first_page);
        iter
    }

    /// An iterator whose only item is `error`.
    pub fn failed(
        api: Arc<A>,
        params: PlanListParams,
        options: RequestOptions,
        error: ProviderError,
    ) -> Self {
        Self {
            api,
            params,
            options,
            page: VecDeque::new(),
            has_more: false,
            next_cursor: None,
            pending_error: Some(error),
            current: None,
        }
    }

    fn paging_backwards(&self) -> bool {
        self.params.ending_before.is_some()
    }

    /// Pages fetched with `ending_before` arrive in provider order while the
    /// cursor walks back towards the start of the list, so each one is
    /// reversed.
    fn load(&mut self, page: api::ListPage) {
        let mut data = page.data;
        if self.paging_backwards() {
            data.reverse();
        }

        self.next_cursor = data
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_str))
            .last()
            .map(str::to_string);
        self.has_more = page.has_more;
        self.page = data.into();
    }

    async fn fetch_next_page(&mut self) {
        let Some(cursor) = self.next_cursor.take() else {
            warn!("Provider reported more plans but the page carried no cursor");
            self.has_more = false;
            return;
        };

        let mut params = self.params.clone();
        if self.paging_backwards() {
            params.ending_before = Some(cursor);
        } else {
            params.starting_after = Some(cursor);
        }
        debug!(
            "Fetching next page of plans (starting_after={:?}, ending_before={:?})",
            params.starting_after, params.ending_before
        );

        match self.api.list(&params, &self.options).await {
            Ok(page) => {
                self.params = params;
                self.load(page);
            }
            Err(failure) => {
                warn!("Failed to fetch next page of plans: {}", failure);
                self.has_more = false;
                self.pending_error = Some(failure_to_provider_error(&failure));
            }
        }
    }

    /// Moves to the next item, fetching the next page when needed. Returns
    /// `false` once the list is exhausted.
    pub async fn advance(&mut self) -> bool {
        loop {
            if let Some(item) = self.page.pop_front() {
                self.current = Some(Slot::Item(item));
                return true;
            }
            if let Some(error) = self.pending_error.take() {
                self.current = Some(Slot::Failure(error));
                return true;
            }
            if !self.has_more {
                self.current = None;
                return false;
            }
            self.fetch_next_page().await;
        }
    }

    /// The item under the cursor, translated. `None` before the first
    /// `advance` and after the last.
    pub fn current(&self) -> Option<PlanResponse> {
        match &self.current {
            Some(Slot::Item(item)) => Some(item_to_response(item)),
            Some(Slot::Failure(error)) => Some(PlanResponse::Error(error.clone())),
            None => None,
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = PlanResponse> {
        futures_util::stream::unfold(self, |mut iter| async move {
            if !iter.advance().await {
                return None;
            }
            let response = iter.current()?;
            Some((response, iter))
        })
    }
}
