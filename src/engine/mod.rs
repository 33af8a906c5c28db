//! Booking query engine.
//!
//! Pure functions over a borrowed record collection: filtering, stable sorting,
//! pagination and (in [`stats`]) aggregation. Nothing here mutates records or
//! keeps state between calls; the presentation layer owns the query state and
//! re-runs the pipeline whenever an input changes.

pub mod filters;
pub mod stats;

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;

use crate::model::BookingRecord;

pub use filters::{DateRange, FilterCriteria, RelativePeriod, SearchScope};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Returns the records matching every criterion, in input order.
pub fn apply_filters<'a>(
    records: &'a [BookingRecord],
    criteria: &FilterCriteria,
    now: NaiveDateTime,
) -> Vec<&'a BookingRecord> {
    let matcher = criteria.matcher(now);
    records.iter().filter(|r| matcher.matches(r)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CheckIn,
    BookingDate,
    Amount,
    Name,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CheckIn => "checkIn",
            SortField::BookingDate => "bookingDate",
            SortField::Amount => "amount",
            SortField::Name => "name",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "checkin" | "check-in" => Some(Self::CheckIn),
            "bookingdate" | "booking-date" | "booked" => Some(Self::BookingDate),
            "amount" | "total" | "totalamount" | "total-amount" => Some(Self::Amount),
            "name" | "guest" => Some(Self::Name),
            _ => None,
        }
    }

    fn compare(self, a: &BookingRecord, b: &BookingRecord) -> Ordering {
        match self {
            SortField::CheckIn => a.check_in.cmp(&b.check_in),
            SortField::BookingDate => a.booking_date.cmp(&b.booking_date),
            SortField::Amount => a.total_amount.cmp(&b.total_amount),
            SortField::Name => a
                .guest_name
                .to_lowercase()
                .cmp(&b.guest_name.to_lowercase()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// A sort key such as `bookingDate-desc`. `field` is `None` when the key named
/// a field the engine does not know; sorting with it leaves the order alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: Some(SortField::BookingDate),
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self {
            field: None,
            direction: SortDirection::Descending,
        }
    }

    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let (field, direction) = match value.rsplit_once('-') {
            Some((field, dir)) if dir.eq_ignore_ascii_case("asc") => {
                (field, SortDirection::Ascending)
            }
            Some((field, dir)) if dir.eq_ignore_ascii_case("desc") => {
                (field, SortDirection::Descending)
            }
            _ => (value, SortDirection::Descending),
        };
        Self {
            field: SortField::parse(field),
            direction,
        }
    }

    pub fn label(&self) -> String {
        match self.field {
            Some(field) => {
                let dir = match self.direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                };
                format!("{}-{}", field.as_str(), dir)
            }
            None => "none".to_string(),
        }
    }
}

/// Stable sort; equal keys keep their input order in either direction.
pub fn apply_sort<'a>(
    mut records: Vec<&'a BookingRecord>,
    sort: SortSpec,
) -> Vec<&'a BookingRecord> {
    let Some(field) = sort.field else {
        return records;
    };
    match sort.direction {
        SortDirection::Ascending => records.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Descending => records.sort_by(|a, b| field.compare(b, a)),
    }
    records
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page<'s, T> {
    pub items: &'s [T],
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// Clipped, 0-based, half-open bounds of `items` within the full list.
    pub start_index: usize,
    pub end_index: usize,
}

impl<T> Page<'_, T> {
    /// 1-based "showing a-b of n" bounds; `(0, 0)` when the page is empty.
    pub fn display_range(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.start_index + 1, self.end_index)
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slices page `page` (1-based) out of `items`. Pages past the end are not
/// clamped and come back empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    Page {
        items: &items[start..end],
        page,
        page_size: size,
        total_items: items.len(),
        total_pages: total_pages(items.len(), size),
        start_index: start,
        end_index: end,
    }
}

/// Page numbers for the pager buttons around `current`.
pub fn page_window(current: usize, total_pages: usize, max_visible: usize) -> RangeInclusive<usize> {
    let start = current.saturating_sub(max_visible / 2).max(1);
    let end = total_pages.min(start + max_visible.max(1) - 1);
    start..=end
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuery {
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
    pub page: usize,
    pub page_size: usize,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Result of one pass of the pipeline. `matches` is the full filtered and
/// sorted list; the current page is a window into it.
#[derive(Clone, Debug)]
pub struct QueryView<'a> {
    pub matches: Vec<&'a BookingRecord>,
    pub page: usize,
    pub page_size: usize,
}

impl<'a> QueryView<'a> {
    pub fn page(&self) -> Page<'_, &'a BookingRecord> {
        paginate(&self.matches, self.page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.matches.len(), self.page_size)
    }
}

pub fn run_query<'a>(
    records: &'a [BookingRecord],
    query: &BookingQuery,
    now: NaiveDateTime,
) -> QueryView<'a> {
    let matches = apply_sort(apply_filters(records, &query.criteria, now), query.sort);
    QueryView {
        matches,
        page: query.page,
        page_size: query.page_size.max(1),
    }
}
