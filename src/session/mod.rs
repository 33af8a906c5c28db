//! Query state for one dashboard.
//!
//! The session owns the record collection and the user's current filters,
//! sort key and page. Every change re-runs the whole pipeline on the next
//! [`DashboardSession::view`]; nothing is cached between calls.

use chrono::NaiveDateTime;
use rand::Rng;

use crate::engine::{self, BookingQuery, FilterCriteria, QueryView, SortSpec};
use crate::model::{BookingRecord, BookingStatus};
use crate::source::{DashboardView, RecordSource, SourceError};

/// Chance that a simulated update tick changes anything.
pub const UPDATE_PROBABILITY: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct DashboardSession {
    view: DashboardView,
    records: Vec<BookingRecord>,
    query: BookingQuery,
}

impl DashboardSession {
    pub fn new(view: DashboardView, records: Vec<BookingRecord>) -> Self {
        let mut query = BookingQuery::default();
        if view == DashboardView::Guests {
            query.criteria.scope = engine::SearchScope::Guests;
        }
        Self {
            view,
            records,
            query,
        }
    }

    pub fn load<S: RecordSource + ?Sized>(
        view: DashboardView,
        source: &mut S,
        now: NaiveDateTime,
    ) -> Result<Self, SourceError> {
        let records = source.load(now)?;
        log::info!("loaded {} records from {}", records.len(), source.name());
        Ok(Self::new(view, records))
    }

    pub fn dashboard_view(&self) -> DashboardView {
        self.view
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn query(&self) -> &BookingQuery {
        &self.query
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.query.criteria
    }

    /// Replaces every filter at once and goes back to the first page.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.query.criteria = criteria;
        self.query.page = 1;
    }

    /// Edits the filters in place and goes back to the first page.
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) {
        edit(&mut self.query.criteria);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.sort = sort;
        self.query.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    pub fn page(&self) -> usize {
        self.query.page
    }

    pub fn total_pages(&self, now: NaiveDateTime) -> usize {
        let matched = engine::apply_filters(&self.records, &self.query.criteria, now).len();
        engine::total_pages(matched, self.query.page_size)
    }

    /// Moves to `page`, clamped to the pages the current filters produce.
    pub fn go_to_page(&mut self, page: usize, now: NaiveDateTime) -> usize {
        let last = self.total_pages(now);
        self.query.page = page.clamp(1, last);
        self.query.page
    }

    pub fn next_page(&mut self, now: NaiveDateTime) -> usize {
        self.go_to_page(self.query.page.saturating_add(1), now)
    }

    pub fn previous_page(&mut self, now: NaiveDateTime) -> usize {
        self.go_to_page(self.query.page.saturating_sub(1), now)
    }

    pub fn view(&self, now: NaiveDateTime) -> QueryView<'_> {
        engine::run_query(&self.records, &self.query, now)
    }

    /// Moves the record at `index` from checked-in to checking-out. Returns
    /// whether anything changed.
    pub fn mark_checking_out(&mut self, index: usize) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        match record.status.transition_to(BookingStatus::CheckingOut) {
            Ok(next) => {
                log::debug!("booking {} room {} -> {}", record.id, record.room_number, next);
                record.status = next;
                true
            }
            Err(_) => false,
        }
    }

    /// One periodic tick of the live guest board: occasionally a random
    /// checked-in guest starts checking out.
    pub fn simulate_update<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.records.is_empty() || !rng.gen_bool(UPDATE_PROBABILITY) {
            return false;
        }
        let index = rng.gen_range(0..self.records.len());
        self.mark_checking_out(index)
    }
}
