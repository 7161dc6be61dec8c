use serde::{Deserialize, Serialize};

use crate::domain::{CompanyId, StatusFlag};

/// One roster entry as returned by the remote store. Wire field names carry
/// the store's own spellings, including embedded spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Job Title", default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(rename = "CGPA", default, skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(rename = "Stipend", default, skip_serializing_if = "Option::is_none")]
    pub stipend: Option<f64>,
    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Opaque string; compared and sorted only by the remote store, never
    /// parsed as a date client-side.
    #[serde(rename = "Arrival Date", default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(rename = "Coordinator", default, skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<String>,
    #[serde(rename = "Tracked", default)]
    pub tracked: bool,
    #[serde(rename = "Invited", default)]
    pub invited: bool,
    #[serde(rename = "Called", default)]
    pub called: bool,
}

impl CompanyRecord {
    /// Assigned coordinator, treating both absent and empty as unassigned.
    pub fn coordinator(&self) -> Option<&str> {
        self.coordinator.as_deref().filter(|name| !name.is_empty())
    }

    pub fn flag(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Tracked => self.tracked,
            StatusFlag::Invited => self.invited,
            StatusFlag::Called => self.called,
        }
    }
}

/// Response body of `GET /companies`. `total` counts the full filtered
/// roster, not the returned slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPageResponse {
    pub companies: Vec<CompanyRecord>,
    pub total: u64,
}

/// Body of `PATCH /company/{id}/coordinator`. An empty string unassigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorUpdateBody {
    pub coordinator: String,
}

/// Body of `PATCH /company/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateBody {
    pub field: StatusFlag,
    pub value: bool,
}

/// Body of `POST /company`. Only `Name` is required; the store accepts the
/// rest as nullable and echoes nothing back on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompany {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CGPA", default, skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Stipend", default, skip_serializing_if = "Option::is_none")]
    pub stipend: Option<f64>,
    #[serde(rename = "Stipend Info", default, skip_serializing_if = "Option::is_none")]
    pub stipend_info: Option<String>,
    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "Job Title", default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(rename = "Arrival Date", default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
}

/// A record reduced to the fields the performance detail panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedCompany {
    pub name: String,
    #[serde(default)]
    pub tracked: bool,
    #[serde(default)]
    pub invited: bool,
    #[serde(default)]
    pub called: bool,
}

/// Per-coordinator aggregate computed by the remote store. Treated as an
/// immutable snapshot for as long as it is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorStat {
    pub coordinator: String,
    pub total: u64,
    pub tracked: u64,
    pub invited: u64,
    pub called: u64,
    #[serde(default)]
    pub companies: Vec<AssignedCompany>,
}
