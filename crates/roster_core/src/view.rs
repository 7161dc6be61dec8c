use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::{aggregate::AggregateViewBuilder, query::RosterQueryController};

/// Which of the two mutually exclusive panes is showing, and therefore
/// which fetch logic is active. A tagged union so frontends match on it
/// exhaustively instead of juggling a loose flag.
#[derive(Clone)]
pub enum ActiveView {
    Roster(Arc<RosterQueryController>),
    Performance(Arc<AggregateViewBuilder>),
}

/// Switches between the roster and performance panes. The roster controller
/// persists across switches; the performance view is rebuilt on every
/// activation so it always shows a fresh snapshot.
pub struct ViewRouter {
    api_base: String,
    roster: Arc<RosterQueryController>,
    active: Mutex<ActiveView>,
}

impl ViewRouter {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = crate::trim_api_base(api_base);
        let roster = RosterQueryController::new(&api_base);
        Self {
            active: Mutex::new(ActiveView::Roster(roster.clone())),
            roster,
            api_base,
        }
    }

    pub fn roster(&self) -> Arc<RosterQueryController> {
        self.roster.clone()
    }

    pub async fn active(&self) -> ActiveView {
        self.active.lock().await.clone()
    }

    /// Activates the performance pane with a freshly fetched snapshot. The
    /// pane becomes active even when the load fails; the failure is its
    /// view state.
    pub async fn show_performance(&self) -> Arc<AggregateViewBuilder> {
        let stats = Arc::new(AggregateViewBuilder::new(&self.api_base));
        *self.active.lock().await = ActiveView::Performance(stats.clone());
        if let Err(err) = stats.load().await {
            warn!(%err, "view: performance activation failed to load");
        }
        stats
    }

    /// Activates the roster pane and re-drives its fetch. A roster that
    /// already failed stays failed (terminal until a full reload).
    pub async fn show_roster(&self) -> Arc<RosterQueryController> {
        *self.active.lock().await = ActiveView::Roster(self.roster.clone());
        if let Err(err) = self.roster.refresh().await {
            warn!(%err, "view: roster activation refresh refused");
        }
        self.roster.clone()
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
