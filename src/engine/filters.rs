use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde::Serialize;

use crate::model::{BookingRecord, BookingSource, BookingStatus, RoomType};

/// Inclusive check-in window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Builds a range whose end covers the whole of its calendar day.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end: end_of_day(end.date()),
        }
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    /// Last admitted instant. `end` may arrive un-normalized from a struct
    /// literal or deserialized criteria, so the day is widened here too.
    pub fn last_instant(&self) -> NaiveDateTime {
        end_of_day(self.end.date())
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.last_instant()
    }
}

pub(crate) fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Quick filter buttons. Overrides any explicit [`DateRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativePeriod {
    All,
    LastDays(u32),
    NextDays(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CheckInWindow {
    Unbounded,
    Between(NaiveDateTime, NaiveDateTime),
}

impl CheckInWindow {
    fn admits(self, at: NaiveDateTime) -> bool {
        match self {
            CheckInWindow::Unbounded => true,
            CheckInWindow::Between(start, end) => at >= start && at <= end,
        }
    }
}

/// Which text fields the free-text search looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    Bookings,
    /// Guest table search also matches the address.
    Guests,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub scope: SearchScope,
    pub source: Option<BookingSource>,
    pub status: Option<BookingStatus>,
    pub room_type: Option<RoomType>,
    pub date_range: Option<DateRange>,
    pub period: Option<RelativePeriod>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.source.is_none()
            && self.status.is_none()
            && self.room_type.is_none()
            && self.date_range.is_none()
            && matches!(self.period, None | Some(RelativePeriod::All))
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn check_in_window(&self, now: NaiveDateTime) -> CheckInWindow {
        match self.period {
            Some(RelativePeriod::All) => CheckInWindow::Unbounded,
            Some(RelativePeriod::LastDays(n)) => {
                let today = now.date();
                let start = (today - Duration::days(i64::from(n))).and_time(NaiveTime::MIN);
                CheckInWindow::Between(start, end_of_day(today))
            }
            Some(RelativePeriod::NextDays(n)) => {
                CheckInWindow::Between(now, now + Duration::days(i64::from(n)))
            }
            None => match self.date_range {
                Some(range) => CheckInWindow::Between(range.start, range.last_instant()),
                None => CheckInWindow::Unbounded,
            },
        }
    }

    /// Compiles the criteria against a fixed `now` so a whole collection is
    /// tested with one lowered search term and one resolved window.
    pub(crate) fn matcher(&self, now: NaiveDateTime) -> RecordMatcher<'_> {
        RecordMatcher {
            criteria: self,
            term: self.search_term(),
            window: self.check_in_window(now),
        }
    }
}

pub(crate) struct RecordMatcher<'a> {
    criteria: &'a FilterCriteria,
    term: Option<String>,
    window: CheckInWindow,
}

impl RecordMatcher<'_> {
    pub(crate) fn matches(&self, record: &BookingRecord) -> bool {
        if let Some(term) = self.term.as_deref() {
            if !search_matches(record, term, self.criteria.scope) {
                return false;
            }
        }
        if let Some(source) = self.criteria.source {
            if record.booking_source != source {
                return false;
            }
        }
        if let Some(status) = self.criteria.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(room_type) = self.criteria.room_type {
            if record.room_type != room_type {
                return false;
            }
        }
        self.window.admits(record.check_in)
    }
}

fn search_matches(record: &BookingRecord, term: &str, scope: SearchScope) -> bool {
    if record.guest_name.to_lowercase().contains(term)
        || record.mobile.to_lowercase().contains(term)
        || record.room_number.to_string().contains(term)
        || record.booking_source.as_str().to_lowercase().contains(term)
    {
        return true;
    }
    scope == SearchScope::Guests && record.address.to_lowercase().contains(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::apply_filters;
    use crate::model::{GuestDetails, StayDetails};

    fn guest(
        id: u64,
        name: &str,
        room_number: u32,
        source: BookingSource,
        check_in: NaiveDateTime,
    ) -> BookingRecord {
        BookingRecord::new(
            id,
            GuestDetails {
                name: name.to_string(),
                mobile: format!("+91 98765-4321{id}"),
                address: format!("{id} Lake Road, Pune, MH"),
                ..Default::default()
            },
            StayDetails {
                room_number,
                room_type: RoomType::Deluxe,
                check_in,
                check_out: check_in + Duration::days(2),
                booking_date: check_in - Duration::days(5),
                booking_source: source,
                status: BookingStatus::Confirmed,
            },
        )
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn ids(records: &[BookingRecord], criteria: &FilterCriteria) -> Vec<u64> {
        apply_filters(records, criteria, noon(2024, 6, 1))
            .iter()
            .map(|r| r.id)
            .collect()
    }

    fn searching(term: &str, scope: SearchScope) -> FilterCriteria {
        FilterCriteria {
            search: Some(term.to_string()),
            scope,
            ..Default::default()
        }
    }

    fn desk() -> Vec<BookingRecord> {
        vec![
            guest(1, "Priya Sharma", 204, BookingSource::Oyo, noon(2024, 1, 10)),
            guest(2, "Rahul Mehta", 315, BookingSource::Offline, noon(2024, 1, 31)),
            guest(3, "Anita Rao", 42, BookingSource::Agoda, noon(2024, 2, 1)),
        ]
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_end_covers_whole_day() {
        let range = DateRange::from_dates(day(2024, 1, 1), day(2024, 1, 31));
        let late = day(2024, 1, 31).and_hms_opt(23, 30, 0).unwrap();
        let next = day(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap();
        assert!(range.contains(late));
        assert!(!range.contains(next));
    }

    #[test]
    fn period_overrides_explicit_range() {
        let now = day(2024, 6, 10).and_hms_opt(9, 0, 0).unwrap();
        let criteria = FilterCriteria {
            date_range: Some(DateRange::from_dates(day(2020, 1, 1), day(2020, 1, 2))),
            period: Some(RelativePeriod::All),
            ..Default::default()
        };
        assert_eq!(criteria.check_in_window(now), CheckInWindow::Unbounded);
    }

    #[test]
    fn last_days_window_starts_at_midnight() {
        let now = day(2024, 6, 10).and_hms_opt(9, 0, 0).unwrap();
        let criteria = FilterCriteria {
            period: Some(RelativePeriod::LastDays(7)),
            ..Default::default()
        };
        assert_eq!(
            criteria.check_in_window(now),
            CheckInWindow::Between(
                day(2024, 6, 3).and_hms_opt(0, 0, 0).unwrap(),
                end_of_day(day(2024, 6, 10))
            )
        );
    }

    #[test]
    fn empty_search_is_no_constraint() {
        let criteria = FilterCriteria {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
    }

    #[test]
    fn search_matches_name_ignoring_case() {
        assert_eq!(ids(&desk(), &searching("PRIYA", SearchScope::Bookings)), [1]);
        assert_eq!(ids(&desk(), &searching("mehta", SearchScope::Bookings)), [2]);
    }

    #[test]
    fn search_matches_mobile() {
        assert_eq!(ids(&desk(), &searching("43213", SearchScope::Bookings)), [3]);
    }

    #[test]
    fn search_matches_room_number_text() {
        assert_eq!(ids(&desk(), &searching("315", SearchScope::Bookings)), [2]);
        assert_eq!(ids(&desk(), &searching("20", SearchScope::Bookings)), [1]);
    }

    #[test]
    fn search_matches_booking_source() {
        assert_eq!(ids(&desk(), &searching("oyo", SearchScope::Bookings)), [1]);
        assert_eq!(ids(&desk(), &searching("offline", SearchScope::Bookings)), [2]);
    }

    #[test]
    fn address_is_searched_only_on_the_guest_board() {
        assert!(ids(&desk(), &searching("lake road", SearchScope::Bookings)).is_empty());
        assert_eq!(
            ids(&desk(), &searching("lake road", SearchScope::Guests)),
            [1, 2, 3]
        );
        assert_eq!(ids(&desk(), &searching("3 lake", SearchScope::Guests)), [3]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let mut records = desk();
        records[1].room_type = RoomType::Suite;
        records[2].status = BookingStatus::Cancelled;
        let criteria = FilterCriteria {
            search: Some("a".to_string()),
            source: Some(BookingSource::Offline),
            status: Some(BookingStatus::Confirmed),
            room_type: Some(RoomType::Suite),
            ..Default::default()
        };
        assert_eq!(ids(&records, &criteria), [2]);

        let wrong_status = FilterCriteria {
            status: Some(BookingStatus::Cancelled),
            ..criteria.clone()
        };
        assert!(ids(&records, &wrong_status).is_empty());
        let wrong_search = FilterCriteria {
            search: Some("priya".to_string()),
            ..criteria
        };
        assert!(ids(&records, &wrong_search).is_empty());
    }

    #[test]
    fn date_range_is_inclusive_at_both_ends() {
        let criteria = FilterCriteria {
            date_range: Some(DateRange::from_dates(day(2024, 1, 10), day(2024, 1, 31))),
            ..Default::default()
        };
        assert_eq!(ids(&desk(), &criteria), [1, 2]);
    }

    #[test]
    fn un_normalized_range_end_still_covers_the_day() {
        let literal = FilterCriteria {
            date_range: Some(DateRange {
                start: day(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
                end: day(2024, 1, 31).and_hms_opt(0, 0, 0).unwrap(),
            }),
            ..Default::default()
        };
        assert_eq!(ids(&desk(), &literal), [1, 2]);

        let json = r#"{"search":null,"scope":"bookings","source":null,"status":null,
            "room_type":null,"period":null,
            "date_range":{"start":"2024-01-01T00:00:00","end":"2024-01-31T00:00:00"}}"#;
        let decoded: FilterCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(ids(&desk(), &decoded), [1, 2]);
        assert!(decoded.date_range.unwrap().contains(noon(2024, 1, 31)));
    }
}
