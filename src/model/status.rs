use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckingOut,
    Completed,
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckingOut,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::CheckingOut => "checking-out",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL.into_iter().find(|s| s.as_str() == v)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (CheckedIn, CheckingOut)
                | (CheckedIn, Completed)
                | (CheckedIn, Cancelled)
                | (CheckingOut, Completed)
        )
    }

    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus, StatusError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status implied by the stay dates alone. `Cancelled` is never derived.
pub fn status_from_dates(
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    now: NaiveDateTime,
) -> BookingStatus {
    if now < check_in {
        BookingStatus::Confirmed
    } else if now < check_out {
        BookingStatus::CheckedIn
    } else {
        BookingStatus::Completed
    }
}
