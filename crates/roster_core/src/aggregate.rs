use reqwest::Client;
use shared::protocol::CoordinatorStat;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::FetchError;

/// What the performance view shows. Same lifecycle as the roster view:
/// `Failed` is terminal for this activation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatsViewState {
    #[default]
    Loading,
    Loaded(Vec<CoordinatorStat>),
    Failed(String),
}

struct StatsState {
    view: StatsViewState,
    selected: Option<String>,
}

/// Fetches and holds the per-coordinator aggregates, independent of the
/// roster pager. One snapshot per view activation; edits made in the roster
/// view only show up here after a fresh activation.
pub struct AggregateViewBuilder {
    http: Client,
    api_base: String,
    inner: Mutex<StatsState>,
}

impl AggregateViewBuilder {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: crate::trim_api_base(api_base),
            inner: Mutex::new(StatsState {
                view: StatsViewState::Loading,
                selected: None,
            }),
        }
    }

    /// Fetches the full stats snapshot. Clears any selection first so a
    /// reloaded view never points at a coordinator that no longer exists.
    pub async fn load(&self) -> Result<(), FetchError> {
        {
            let mut state = self.inner.lock().await;
            if let StatsViewState::Failed(message) = &state.view {
                return Err(FetchError::ViewFailed(message.clone()));
            }
            state.view = StatsViewState::Loading;
            state.selected = None;
        }

        let outcome: Result<Vec<CoordinatorStat>, reqwest::Error> = async {
            self.http
                .get(format!("{}/coordinator-stats", self.api_base))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        let mut state = self.inner.lock().await;
        match outcome {
            Ok(stats) => {
                info!(coordinators = stats.len(), "stats: snapshot loaded");
                state.view = StatsViewState::Loaded(stats);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "stats: snapshot fetch failed");
                state.view = StatsViewState::Failed(err.to_string());
                Err(FetchError::Transport(err))
            }
        }
    }

    pub async fn snapshot(&self) -> StatsViewState {
        self.inner.lock().await.view.clone()
    }

    /// Focuses `coordinator`'s detail panel. Selecting the already focused
    /// name collapses the panel; selecting another switches focus directly.
    pub async fn select(&self, coordinator: &str) {
        let mut state = self.inner.lock().await;
        state.selected = match state.selected.as_deref() {
            Some(current) if current == coordinator => None,
            _ => Some(coordinator.to_string()),
        };
    }

    pub async fn selected(&self) -> Option<String> {
        self.inner.lock().await.selected.clone()
    }

    /// The stat entry for the focused coordinator, if the snapshot still
    /// contains one.
    pub async fn selected_stat(&self) -> Option<CoordinatorStat> {
        let state = self.inner.lock().await;
        let selected = state.selected.as_deref()?;
        let StatsViewState::Loaded(stats) = &state.view else {
            return None;
        };
        stats
            .iter()
            .find(|stat| stat.coordinator == selected)
            .cloned()
    }
}

/// Per-flag completion fractions in `[0, 1]` for progress indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionRatios {
    pub tracked: f64,
    pub invited: f64,
    pub called: f64,
}

/// A coordinator with nothing assigned renders empty progress bars rather
/// than failing on division by zero.
pub fn completion_ratios(stat: &CoordinatorStat) -> CompletionRatios {
    if stat.total == 0 {
        return CompletionRatios {
            tracked: 0.0,
            invited: 0.0,
            called: 0.0,
        };
    }
    let total = stat.total as f64;
    CompletionRatios {
        tracked: stat.tracked as f64 / total,
        invited: stat.invited as f64 / total,
        called: stat.called as f64 / total,
    }
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
