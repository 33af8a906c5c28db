use chrono::NaiveDate;
use regex::Regex;

use crate::engine::RelativePeriod;
use crate::model::{BookingSource, BookingStatus, RoomType};
use crate::output::OutputFormat;
use crate::source::DashboardView;

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let raw = value.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// `all`, `N` (last N days), `last-N` or `next-N`, with an optional `d`/`days`
/// suffix.
pub fn parse_period(value: &str) -> Result<RelativePeriod, String> {
    let raw = value.trim().to_lowercase();
    if raw == "all" {
        return Ok(RelativePeriod::All);
    }
    let re = Regex::new(r"^(?:(last|next)[-_ ]?)?(\d{1,5})\s*(?:d|days?)?$")
        .map_err(|e| format!("period pattern: {e}"))?;
    let caps = re
        .captures(&raw)
        .ok_or_else(|| format!("invalid period '{raw}', expected all, N, last-N or next-N"))?;
    let days: u32 = caps
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .parse()
        .map_err(|_| format!("invalid day count in period '{raw}'"))?;
    if days == 0 {
        return Err("period must cover at least one day".to_string());
    }
    match caps.get(1).map(|m| m.as_str()) {
        Some("next") => Ok(RelativePeriod::NextDays(days)),
        _ => Ok(RelativePeriod::LastDays(days)),
    }
}

pub fn parse_source(value: &str) -> Result<BookingSource, String> {
    BookingSource::parse(value).ok_or_else(|| {
        format!(
            "unknown booking source '{}', expected one of: {}",
            value.trim(),
            BookingSource::ALL.map(BookingSource::as_str).join(", ")
        )
    })
}

pub fn parse_status(value: &str) -> Result<BookingStatus, String> {
    BookingStatus::parse(value).ok_or_else(|| {
        format!(
            "unknown status '{}', expected one of: {}",
            value.trim(),
            BookingStatus::ALL.map(BookingStatus::as_str).join(", ")
        )
    })
}

pub fn parse_room_type(value: &str) -> Result<RoomType, String> {
    RoomType::parse(value).ok_or_else(|| {
        format!(
            "unknown room type '{}', expected one of: {}",
            value.trim(),
            RoomType::ALL.map(RoomType::as_str).join(", ")
        )
    })
}

pub fn parse_view(value: &str) -> Result<DashboardView, String> {
    DashboardView::parse(value).ok_or_else(|| {
        format!(
            "unknown view '{}', expected all, upcoming or guests",
            value.trim()
        )
    })
}

pub fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value).ok_or_else(|| {
        format!(
            "unknown output format '{}', expected text, json, csv or html",
            value.trim()
        )
    })
}

/// Empty strings and the `all` sentinel of the filter dropdowns mean "no filter".
pub fn non_wildcard(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}
