use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque record identity assigned by the remote store. Stable across
/// fetches and never reassigned; every mutation targets one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Sortable roster columns. `as_str` yields the exact `sortBy` value the
/// remote store expects, including the space in `Arrival Date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Cgpa,
    Stipend,
    ArrivalDate,
    CompanyType,
    Coordinator,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Cgpa => "CGPA",
            SortField::Stipend => "Stipend",
            SortField::ArrivalDate => "Arrival Date",
            SortField::CompanyType => "Type",
            SortField::Coordinator => "Coordinator",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown sort field '{0}' (expected one of: name, cgpa, stipend, arrival-date, type, coordinator)")]
pub struct ParseSortFieldError(String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "cgpa" => Ok(SortField::Cgpa),
            "stipend" => Ok(SortField::Stipend),
            "arrival-date" | "arrival date" => Ok(SortField::ArrivalDate),
            "type" => Ok(SortField::CompanyType),
            "coordinator" => Ok(SortField::Coordinator),
            other => Err(ParseSortFieldError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// The fixed page-size choices the roster view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Fifty,
    Hundred,
    HundredFifty,
    ThreeHundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Fifty,
        PageSize::Hundred,
        PageSize::HundredFifty,
        PageSize::ThreeHundred,
    ];

    pub fn as_u32(&self) -> u32 {
        match self {
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
            PageSize::HundredFifty => 150,
            PageSize::ThreeHundred => 300,
        }
    }
}

#[derive(Debug, Error)]
#[error("unsupported page size {0} (expected 50, 100, 150 or 300)")]
pub struct InvalidPageSize(u32);

impl TryFrom<u32> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::Hundred),
            150 => Ok(PageSize::HundredFifty),
            300 => Ok(PageSize::ThreeHundred),
            other => Err(InvalidPageSize(other)),
        }
    }
}

/// The three independent status booleans on a roster record. Serializes to
/// the wire spelling used by `PATCH /company/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFlag {
    Tracked,
    Invited,
    Called,
}

impl StatusFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFlag::Tracked => "Tracked",
            StatusFlag::Invited => "Invited",
            StatusFlag::Called => "Called",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown status flag '{0}' (expected tracked, invited or called)")]
pub struct ParseStatusFlagError(String);

impl FromStr for StatusFlag {
    type Err = ParseStatusFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tracked" => Ok(StatusFlag::Tracked),
            "invited" => Ok(StatusFlag::Invited),
            "called" => Ok(StatusFlag::Called),
            other => Err(ParseStatusFlagError(other.to_string())),
        }
    }
}
