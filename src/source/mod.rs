//! Record sources.
//!
//! The engine never cares where records come from. The dashboard ships with a
//! seeded synthetic generator for each view, a fixed in-memory fixture, and a
//! JSON file reader for real exports.

pub mod mock;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::BookingRecord;

pub use mock::MockSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    #[default]
    AllBookings,
    Upcoming,
    Guests,
}

impl DashboardView {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" | "all-bookings" | "all_bookings" | "bookings" => Some(Self::AllBookings),
            "upcoming" | "upcoming-bookings" | "upcoming_bookings" => Some(Self::Upcoming),
            "guests" | "guest" | "occupancy" => Some(Self::Guests),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardView::AllBookings => "all bookings",
            DashboardView::Upcoming => "upcoming bookings",
            DashboardView::Guests => "current guests",
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read records from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode records from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record from {origin}: {message}")]
    InvalidRecord { origin: String, message: String },

    #[error("duplicate record id {id} from {origin}")]
    DuplicateId { origin: String, id: u64 },
}

pub trait RecordSource {
    fn name(&self) -> &str;

    /// Produces the session's record collection. `now` anchors any
    /// time-relative generation; sources backed by stored data ignore it.
    fn load(&mut self, now: NaiveDateTime) -> Result<Vec<BookingRecord>, SourceError>;
}

/// A fixed collection, returned as-is on every load.
#[derive(Clone, Debug, Default)]
pub struct FixtureSource {
    records: Vec<BookingRecord>,
}

impl FixtureSource {
    pub fn new(records: Vec<BookingRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn load(&mut self, _now: NaiveDateTime) -> Result<Vec<BookingRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Reads a JSON array of records, e.g. an earlier `--output-format json` export's
/// `records` list or a hand-written fixture.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    label: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn load(&mut self, _now: NaiveDateTime) -> Result<Vec<BookingRecord>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<BookingRecord> =
            serde_json::from_str(&contents).map_err(|source| SourceError::Decode {
                path: self.path.clone(),
                source,
            })?;
        validate_records(&self.label, &records)?;
        Ok(records)
    }
}

pub fn validate_records(origin: &str, records: &[BookingRecord]) -> Result<(), SourceError> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    for r in records {
        r.validate().map_err(|message| SourceError::InvalidRecord {
            origin: origin.to_string(),
            message,
        })?;
        if !seen.insert(r.id) {
            return Err(SourceError::DuplicateId {
                origin: origin.to_string(),
                id: r.id,
            });
        }
    }
    Ok(())
}
