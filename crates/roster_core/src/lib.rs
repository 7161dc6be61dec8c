//! Client core for the roster tracker: view-state machines over a remote
//! HTTP store that performs pagination, sorting and search server-side.
//!
//! Three cooperating components, each a thin layer over the one below:
//! the [`RosterQueryController`] owns paging/sort/search parameters and the
//! resulting page, the [`FieldMutationCoordinator`] applies single-field
//! edits and patches the held page in place, and the
//! [`AggregateViewBuilder`] is an independent read path for per-coordinator
//! stats.

pub mod aggregate;
pub mod color;
pub mod error;
pub mod events;
pub mod mutation;
pub mod query;
pub mod view;

pub use aggregate::{completion_ratios, AggregateViewBuilder, CompletionRatios, StatsViewState};
pub use color::coordinator_category;
pub use error::{FetchError, MutationError};
pub use events::RosterEvent;
pub use mutation::{EditBuffer, FieldMutationCoordinator};
pub use query::{QueryParameters, RecordPatch, RosterPage, RosterQueryController, RosterViewState};
pub use view::{ActiveView, ViewRouter};

/// Normalizes a configured API base so path joins never produce `//`.
pub(crate) fn trim_api_base(api_base: impl Into<String>) -> String {
    let mut base = api_base.into();
    while base.ends_with('/') {
        base.pop();
    }
    base
}
