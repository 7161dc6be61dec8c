use std::sync::Arc;

use reqwest::Client;
use shared::{
    domain::{CompanyId, StatusFlag},
    protocol::{CoordinatorUpdateBody, NewCompany, StatusUpdateBody},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    error::MutationError,
    events::RosterEvent,
    query::{RecordPatch, RosterQueryController},
};

/// In-progress coordinator edit for one row. Kept across a failed save so
/// the user's typed input is never lost.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub id: CompanyId,
    pub input: String,
}

/// Applies single-field, single-record writes against the remote store and
/// reconciles the roster page held by the query controller.
///
/// Write-after-confirm: nothing is written locally until the store accepts
/// the write, so a failed mutation leaves local state exactly as it was.
pub struct FieldMutationCoordinator {
    http: Client,
    api_base: String,
    roster: Arc<RosterQueryController>,
    edit: Mutex<Option<EditBuffer>>,
    events: broadcast::Sender<RosterEvent>,
}

impl FieldMutationCoordinator {
    pub fn new(api_base: impl Into<String>, roster: Arc<RosterQueryController>) -> Self {
        let events = roster.events_sender();
        Self {
            http: Client::new(),
            api_base: crate::trim_api_base(api_base),
            roster,
            edit: Mutex::new(None),
            events,
        }
    }

    /// Assigns `name` as the coordinator of record `id`; an empty string
    /// unassigns. On success the held record is patched in place, with no
    /// re-fetch and no reordering, even under an active coordinator sort.
    pub async fn set_coordinator(&self, id: &CompanyId, name: &str) -> Result<(), MutationError> {
        let request = self
            .http
            .patch(format!("{}/company/{}/coordinator", self.api_base, id))
            .json(&CoordinatorUpdateBody {
                coordinator: name.to_string(),
            });
        self.execute(request).await?;

        let assigned = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        info!(%id, assigned = name, "roster: coordinator updated");
        self.roster
            .apply_patch(id, RecordPatch::Coordinator(assigned))
            .await;
        Ok(())
    }

    /// Writes the negation of `current` for the named flag. The pre-state is
    /// trusted as supplied by the caller, not re-read from the store: if the
    /// local page is stale relative to a concurrent editor, the written
    /// value is the stale negation, not a flip of the store's true value.
    pub async fn toggle_flag(
        &self,
        id: &CompanyId,
        flag: StatusFlag,
        current: bool,
    ) -> Result<(), MutationError> {
        let value = !current;
        let request = self
            .http
            .patch(format!("{}/company/{}/status", self.api_base, id))
            .json(&StatusUpdateBody { field: flag, value });
        self.execute(request).await?;

        info!(%id, %flag, value, "roster: status flag updated");
        self.roster
            .apply_patch(id, RecordPatch::Flag { flag, value })
            .await;
        Ok(())
    }

    /// Creates a new record. The store echoes nothing back; the caller must
    /// re-fetch to see it.
    pub async fn add_company(&self, company: &NewCompany) -> Result<(), MutationError> {
        if company.name.trim().is_empty() {
            return Err(MutationError::Validation(
                "company Name must not be empty".to_string(),
            ));
        }
        let request = self
            .http
            .post(format!("{}/company", self.api_base))
            .json(company);
        self.execute(request).await?;
        info!(name = %company.name, "roster: company created");
        Ok(())
    }

    /// Opens an edit for record `id`, pre-filling the currently assigned
    /// name.
    pub async fn begin_edit(&self, id: &CompanyId, current: Option<&str>) {
        let mut edit = self.edit.lock().await;
        *edit = Some(EditBuffer {
            id: id.clone(),
            input: current.unwrap_or_default().to_string(),
        });
    }

    /// Replaces the typed input of the active edit, if any.
    pub async fn edit_input(&self, text: impl Into<String>) {
        let mut edit = self.edit.lock().await;
        if let Some(buffer) = edit.as_mut() {
            buffer.input = text.into();
        }
    }

    pub async fn cancel_edit(&self) {
        *self.edit.lock().await = None;
    }

    pub async fn active_edit(&self) -> Option<EditBuffer> {
        self.edit.lock().await.clone()
    }

    /// Saves the active edit. The buffer is cleared only on success; a
    /// rejected save keeps it intact, typed input and all.
    pub async fn save_coordinator(&self) -> Result<(), MutationError> {
        let Some(buffer) = self.active_edit().await else {
            return Err(MutationError::Validation("no edit in progress".to_string()));
        };
        self.set_coordinator(&buffer.id, &buffer.input).await?;
        *self.edit.lock().await = None;
        Ok(())
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<(), MutationError> {
        let result = async {
            request.send().await?.error_for_status()?;
            Ok::<_, reqwest::Error>(())
        }
        .await;

        if let Err(err) = result {
            warn!(%err, "roster: mutation rejected by the remote store");
            let _ = self.events.send(RosterEvent::MutationFailed(err.to_string()));
            return Err(MutationError::Transport(err));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/mutation_tests.rs"]
mod tests;
