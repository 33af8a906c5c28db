use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;
use serde::Serializer;

use crate::model::{BookingRecord, BookingSource};

pub const MONTHLY_WINDOW: usize = 6;
pub const DEFAULT_TOTAL_ROOMS: u32 = 100;

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn average(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_count: usize,
    pub total_revenue: u64,
    pub avg_booking_value: f64,
    /// Rounded percentage of all records booked through an online channel.
    pub online_share: u32,
}

pub fn compute_overview_stats<'a, I>(records: I) -> OverviewStats
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    let mut total_count = 0usize;
    let mut online = 0usize;
    let mut billable = 0usize;
    let mut total_revenue = 0u64;
    for r in records {
        total_count += 1;
        if r.booking_source.is_online() {
            online += 1;
        }
        if !r.is_cancelled() {
            billable += 1;
            total_revenue += r.total_amount;
        }
    }
    OverviewStats {
        total_count,
        total_revenue,
        avg_booking_value: average(total_revenue, billable),
        online_share: percent(online, total_count),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SourceStat {
    pub source: BookingSource,
    pub count: usize,
    pub revenue: u64,
    pub avg_value: f64,
}

/// Per-source totals over non-cancelled records, in order of first appearance.
pub fn compute_source_breakdown<'a, I>(records: I) -> Vec<SourceStat>
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    let groups = group_by_source(records.into_iter().filter(|r| !r.is_cancelled()));
    groups
        .into_iter()
        .map(|(source, count, revenue)| SourceStat {
            source,
            count,
            revenue,
            avg_value: average(revenue, count),
        })
        .collect()
}

fn group_by_source<'a, I>(records: I) -> Vec<(BookingSource, usize, u64)>
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    let mut groups: Vec<(BookingSource, usize, u64)> = Vec::new();
    for r in records {
        match groups.iter_mut().find(|g| g.0 == r.booking_source) {
            Some(group) => {
                group.1 += 1;
                group.2 += r.total_amount;
            }
            None => groups.push((r.booking_source, 1, r.total_amount)),
        }
    }
    groups
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyStat {
    pub month: MonthKey,
    pub count: usize,
    pub revenue: u64,
}

/// Non-cancelled bookings grouped by check-in month: the six most recent
/// months that have any, oldest first.
pub fn compute_monthly_breakdown<'a, I>(records: I) -> Vec<MonthlyStat>
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    let mut months: BTreeMap<MonthKey, (usize, u64)> = BTreeMap::new();
    for r in records.into_iter().filter(|r| !r.is_cancelled()) {
        let entry = months.entry(MonthKey::of(r.check_in)).or_default();
        entry.0 += 1;
        entry.1 += r.total_amount;
    }
    let skip = months.len().saturating_sub(MONTHLY_WINDOW);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, (count, revenue))| MonthlyStat {
            month,
            count,
            revenue,
        })
        .collect()
}

fn checks_in_within(r: &BookingRecord, now: NaiveDateTime, days: i64) -> bool {
    r.check_in >= now && r.check_in <= now + Duration::days(days)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpcomingStats {
    pub next_7_day_count: usize,
    pub next_30_day_count: usize,
    pub expected_revenue_30_day: u64,
    /// `None` when nothing checks in within 30 days.
    pub top_source: Option<BookingSource>,
    pub top_source_share: u32,
}

pub fn compute_upcoming_stats(records: &[BookingRecord], now: NaiveDateTime) -> UpcomingStats {
    let next_7_day_count = records
        .iter()
        .filter(|r| checks_in_within(r, now, 7))
        .count();
    let window: Vec<&BookingRecord> = records
        .iter()
        .filter(|r| checks_in_within(r, now, 30))
        .collect();
    let expected_revenue_30_day = window.iter().map(|r| r.total_amount).sum();

    let mut top: Option<(BookingSource, usize)> = None;
    for (source, count, _) in group_by_source(window.iter().copied()) {
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((source, count));
        }
    }

    UpcomingStats {
        next_7_day_count,
        next_30_day_count: window.len(),
        expected_revenue_30_day,
        top_source: top.map(|(source, _)| source),
        top_source_share: top.map_or(0, |(_, count)| percent(count, window.len())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceShare {
    pub source: BookingSource,
    pub count: usize,
    pub revenue: u64,
    pub share: u32,
}

/// Source cards of the upcoming view: check-ins within the next 30 days.
pub fn compute_upcoming_source_breakdown(
    records: &[BookingRecord],
    now: NaiveDateTime,
) -> Vec<SourceShare> {
    let window: Vec<&BookingRecord> = records
        .iter()
        .filter(|r| checks_in_within(r, now, 30))
        .collect();
    group_by_source(window.iter().copied())
        .into_iter()
        .map(|(source, count, revenue)| SourceShare {
            source,
            count,
            revenue,
            share: percent(count, window.len()),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OccupancyStats {
    pub total_rooms: u32,
    pub occupied_rooms: u32,
    pub vacant_rooms: u32,
    pub occupancy_rate: u32,
    pub vacancy_rate: u32,
    pub today_check_ins: usize,
    pub today_check_outs: usize,
    /// Mean stay in nights, one decimal place.
    pub avg_stay_days: f64,
    pub weekly_revenue: u64,
}

/// Guest-table figures: every record is treated as an occupied room.
pub fn compute_occupancy_stats(
    guests: &[BookingRecord],
    total_rooms: u32,
    now: NaiveDateTime,
) -> OccupancyStats {
    let occupied_rooms = u32::try_from(guests.len()).unwrap_or(u32::MAX);
    let occupancy_rate = percent(occupied_rooms as usize, total_rooms as usize);
    let today = now.date();
    let week_ago = now - Duration::days(7);

    let total_nights: u64 = guests.iter().map(BookingRecord::stay_duration_days).sum();
    let avg_stay_days = (average(total_nights, guests.len()) * 10.0).round() / 10.0;

    OccupancyStats {
        total_rooms,
        occupied_rooms,
        vacant_rooms: total_rooms.saturating_sub(occupied_rooms),
        occupancy_rate,
        vacancy_rate: 100u32.saturating_sub(occupancy_rate),
        today_check_ins: guests.iter().filter(|g| g.check_in.date() == today).count(),
        today_check_outs: guests.iter().filter(|g| g.check_out.date() == today).count(),
        avg_stay_days,
        weekly_revenue: guests
            .iter()
            .filter(|g| g.check_in >= week_ago)
            .map(|g| g.total_amount)
            .sum(),
    }
}
