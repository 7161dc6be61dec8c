use std::sync::Arc;

use reqwest::Client;
use shared::{
    domain::{CompanyId, PageSize, SortField, SortOrder, StatusFlag},
    protocol::{CompanyRecord, RosterPageResponse},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{error::FetchError, events::RosterEvent};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Input state of the query controller. Changing anything other than `page`
/// resets `page` to 1: a page number is meaningless under a new ordering or
/// filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    /// 1-based page number. Callers clamp to `total_pages()` before setting;
    /// the controller forwards whatever it is given.
    pub page: u32,
    pub page_size: PageSize,
    pub sort: Option<(SortField, SortOrder)>,
    /// Substring filter on the company name, passed through to the store
    /// verbatim (case-sensitivity is the store's call).
    pub search: Option<String>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            sort: None,
            search: None,
        }
    }
}

/// The materialized slice of the roster plus the size of the full filtered
/// roster. Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterPage {
    pub companies: Vec<CompanyRecord>,
    pub total: u64,
}

/// What the roster view shows right now. `Loading` blanks the table (no
/// stale-page display); `Failed` is terminal until a full reload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RosterViewState {
    #[default]
    Loading,
    Loaded(RosterPage),
    Failed(String),
}

/// A targeted single-field edit applied to one held record. Only the
/// mutation coordinator constructs these.
#[derive(Debug, Clone)]
pub enum RecordPatch {
    /// `None` means unassigned.
    Coordinator(Option<String>),
    Flag { flag: StatusFlag, value: bool },
}

struct QueryState {
    params: QueryParameters,
    view: RosterViewState,
    /// Identity of the most recently issued fetch. Completions carrying an
    /// older identity are discarded so the displayed page always reflects
    /// the latest requested parameters.
    latest_request: u64,
}

/// Owns the paging/sort/search parameters and the page they produced,
/// keeping the two consistent across racing fetches.
pub struct RosterQueryController {
    http: Client,
    api_base: String,
    inner: Mutex<QueryState>,
    events: broadcast::Sender<RosterEvent>,
}

impl RosterQueryController {
    pub fn new(api_base: impl Into<String>) -> Arc<Self> {
        Self::with_params(api_base, QueryParameters::default())
    }

    pub fn with_params(api_base: impl Into<String>, params: QueryParameters) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            api_base: crate::trim_api_base(api_base),
            inner: Mutex::new(QueryState {
                params,
                view: RosterViewState::Loading,
                latest_request: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    pub(crate) fn events_sender(&self) -> broadcast::Sender<RosterEvent> {
        self.events.clone()
    }

    /// Re-fetches with the current parameters (also the initial load).
    pub async fn refresh(self: &Arc<Self>) -> Result<(), FetchError> {
        self.change_params(|_| {}).await
    }

    /// Navigates to `page`. The caller is responsible for clamping to
    /// `1..=total_pages()`; no silent clamping happens here.
    pub async fn set_page(self: &Arc<Self>, page: u32) -> Result<(), FetchError> {
        self.change_params(|params| params.page = page).await
    }

    pub async fn set_page_size(self: &Arc<Self>, page_size: PageSize) -> Result<(), FetchError> {
        self.change_params(|params| {
            params.page_size = page_size;
            params.page = 1;
        })
        .await
    }

    /// Sorting contract: the active field flips its order, any other field
    /// becomes active ascending. Either way the page resets to 1.
    pub async fn set_sort(self: &Arc<Self>, field: SortField) -> Result<(), FetchError> {
        self.change_params(|params| {
            params.sort = match params.sort {
                Some((active, order)) if active == field => Some((field, order.toggled())),
                _ => Some((field, SortOrder::Ascending)),
            };
            params.page = 1;
        })
        .await
    }

    pub async fn clear_sort(self: &Arc<Self>) -> Result<(), FetchError> {
        self.change_params(|params| {
            params.sort = None;
            params.page = 1;
        })
        .await
    }

    /// Replaces the name filter. An empty string clears it.
    pub async fn set_search(self: &Arc<Self>, text: impl Into<String>) -> Result<(), FetchError> {
        let text = text.into();
        self.change_params(|params| {
            params.search = if text.is_empty() { None } else { Some(text) };
            params.page = 1;
        })
        .await
    }

    pub async fn params(&self) -> QueryParameters {
        self.inner.lock().await.params.clone()
    }

    pub async fn snapshot(&self) -> RosterViewState {
        self.inner.lock().await.view.clone()
    }

    /// `ceil(total / page_size)` of the last loaded page, or 0 while nothing
    /// is loaded.
    pub async fn total_pages(&self) -> u32 {
        let state = self.inner.lock().await;
        match &state.view {
            RosterViewState::Loaded(page) => {
                page_count(page.total, state.params.page_size.as_u32())
            }
            _ => 0,
        }
    }

    pub async fn has_prev(&self) -> bool {
        self.inner.lock().await.params.page > 1
    }

    pub async fn has_next(&self) -> bool {
        let state = self.inner.lock().await;
        match &state.view {
            RosterViewState::Loaded(page) => {
                state.params.page < page_count(page.total, state.params.page_size.as_u32())
            }
            _ => false,
        }
    }

    /// Applies a confirmed single-field edit to the held page in place.
    /// No re-fetch and no reordering: a row edited under an active
    /// coordinator sort may sit out of order until the next fetch. A record
    /// no longer on the page is silently skipped.
    pub async fn apply_patch(&self, id: &CompanyId, patch: RecordPatch) {
        let mut state = self.inner.lock().await;
        let RosterViewState::Loaded(page) = &mut state.view else {
            return;
        };
        let Some(record) = page.companies.iter_mut().find(|record| &record.id == id) else {
            return;
        };
        match patch {
            RecordPatch::Coordinator(name) => record.coordinator = name,
            RecordPatch::Flag { flag, value } => match flag {
                StatusFlag::Tracked => record.tracked = value,
                StatusFlag::Invited => record.invited = value,
                StatusFlag::Called => record.called = value,
            },
        }
        let _ = self.events.send(RosterEvent::RecordPatched { id: id.clone() });
    }

    /// Mutates the parameters and issues the fetch for them. The new fetch
    /// supersedes any still in flight; their completions will be discarded.
    async fn change_params<F>(self: &Arc<Self>, apply: F) -> Result<(), FetchError>
    where
        F: FnOnce(&mut QueryParameters),
    {
        let (request_id, params) = {
            let mut state = self.inner.lock().await;
            if let RosterViewState::Failed(message) = &state.view {
                return Err(FetchError::ViewFailed(message.clone()));
            }
            apply(&mut state.params);
            state.view = RosterViewState::Loading;
            state.latest_request += 1;
            (state.latest_request, state.params.clone())
        };

        let _ = self.events.send(RosterEvent::RosterLoading);

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = controller.fetch_page(&params).await;
            controller.complete_fetch(request_id, outcome).await;
        });

        Ok(())
    }

    async fn fetch_page(&self, params: &QueryParameters) -> Result<RosterPageResponse, reqwest::Error> {
        let mut request = self
            .http
            .get(format!("{}/companies", self.api_base))
            .query(&[
                ("page", params.page.to_string()),
                ("limit", params.page_size.as_u32().to_string()),
            ]);
        if let Some((field, order)) = params.sort {
            request = request.query(&[("sortBy", field.as_str()), ("sortOrder", order.as_str())]);
        }
        if let Some(search) = &params.search {
            request = request.query(&[("search", search.as_str())]);
        }
        request.send().await?.error_for_status()?.json().await
    }

    async fn complete_fetch(
        &self,
        request_id: u64,
        outcome: Result<RosterPageResponse, reqwest::Error>,
    ) {
        let mut state = self.inner.lock().await;
        if request_id != state.latest_request {
            info!(
                request_id,
                latest_request = state.latest_request,
                "roster: discarding superseded fetch completion"
            );
            return;
        }
        if matches!(state.view, RosterViewState::Failed(_)) {
            return;
        }
        match outcome {
            Ok(body) => {
                info!(
                    page = state.params.page,
                    total = body.total,
                    returned = body.companies.len(),
                    "roster: page loaded"
                );
                let _ = self.events.send(RosterEvent::RosterLoaded {
                    page: state.params.page,
                    total: body.total,
                });
                state.view = RosterViewState::Loaded(RosterPage {
                    companies: body.companies,
                    total: body.total,
                });
            }
            Err(err) => {
                warn!(%err, "roster: page fetch failed");
                let message = err.to_string();
                state.view = RosterViewState::Failed(message.clone());
                let _ = self.events.send(RosterEvent::RosterFailed(message));
            }
        }
    }
}

fn page_count(total: u64, page_size: u32) -> u32 {
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
