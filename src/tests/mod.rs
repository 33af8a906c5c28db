use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::stats;
use crate::engine::{self, FilterCriteria, SortDirection, SortField, SortSpec};
use crate::model::{
    status_from_dates, BookingRecord, BookingSource, BookingStatus, GuestDetails, RoomType,
    StayDetails,
};
use crate::output::{self, OutputFormat};
use crate::session::DashboardSession;
use crate::source::{DashboardView, FixtureSource, MockSource, RecordSource};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn now() -> NaiveDateTime {
    at(2024, 6, 15)
}

fn booking(id: u64, check_in: NaiveDateTime, status: BookingStatus) -> BookingRecord {
    BookingRecord::new(
        id,
        GuestDetails {
            name: format!("Guest {id}"),
            mobile: format!("+91 90000-{id:05}"),
            ..Default::default()
        },
        StayDetails {
            room_number: 100 + id as u32,
            room_type: RoomType::Standard,
            check_in,
            check_out: check_in + Duration::days(1),
            booking_date: check_in - Duration::days(10),
            booking_source: BookingSource::Offline,
            status,
        },
    )
}

#[test]
fn overview_of_nothing_is_all_zero() {
    let empty: Vec<BookingRecord> = Vec::new();
    let o = stats::compute_overview_stats(&empty);
    assert_eq!(o.total_count, 0);
    assert_eq!(o.total_revenue, 0);
    assert_eq!(o.avg_booking_value, 0.0);
    assert_eq!(o.online_share, 0);
}

#[test]
fn cancelled_bookings_earn_nothing() {
    let mut records: Vec<BookingRecord> = (1..=3)
        .map(|id| booking(id, at(2024, 3, 1), BookingStatus::Completed))
        .collect();
    for (r, amount) in records.iter_mut().zip([100, 200, 300]) {
        r.total_amount = amount;
    }
    records[2].status = BookingStatus::Cancelled;
    let o = stats::compute_overview_stats(&records);
    assert_eq!(o.total_count, 3);
    assert_eq!(o.total_revenue, 300);
    assert_eq!(o.avg_booking_value, 150.0);
}

#[test]
fn monthly_breakdown_is_oldest_first() {
    let records = vec![
        booking(1, at(2024, 2, 10), BookingStatus::Completed),
        booking(2, at(2024, 1, 5), BookingStatus::Completed),
    ];
    let months = stats::compute_monthly_breakdown(&records);
    let labels: Vec<String> = months.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(labels, ["2024-01", "2024-02"]);
    assert!(months.iter().all(|m| m.count == 1));
}

#[test]
fn monthly_breakdown_keeps_last_six_months() {
    let records: Vec<BookingRecord> = (1..=9)
        .map(|m| booking(m as u64, at(2023, m, 3), BookingStatus::Completed))
        .collect();
    let months = stats::compute_monthly_breakdown(&records);
    assert_eq!(months.len(), stats::MONTHLY_WINDOW);
    assert_eq!(months[0].month.to_string(), "2023-04");
    assert_eq!(months[5].month.to_string(), "2023-09");
}

#[test]
fn status_follows_dates() {
    let today = now();
    let day = Duration::days(1);
    assert_eq!(
        status_from_dates(today - day, today + day, today),
        BookingStatus::CheckedIn
    );
    assert_eq!(
        status_from_dates(today + day, today + day * 3, today),
        BookingStatus::Confirmed
    );
    assert_eq!(
        status_from_dates(today - day * 5, today - day * 3, today),
        BookingStatus::Completed
    );
}

#[test]
fn upcoming_top_source_prefers_first_seen_on_ties() {
    let mut a = booking(1, now() + Duration::days(2), BookingStatus::Confirmed);
    a.booking_source = BookingSource::Agoda;
    let mut b = booking(2, now() + Duration::days(3), BookingStatus::Confirmed);
    b.booking_source = BookingSource::Oyo;
    let far = booking(3, now() + Duration::days(45), BookingStatus::Confirmed);
    let u = stats::compute_upcoming_stats(&[a, b, far], now());
    assert_eq!(u.next_7_day_count, 2);
    assert_eq!(u.next_30_day_count, 2);
    assert_eq!(u.top_source, Some(BookingSource::Agoda));
    assert_eq!(u.top_source_share, 50);
    assert_eq!(u.expected_revenue_30_day, 2 * RoomType::Standard.nightly_rate());
}

#[test]
fn occupancy_counts_today() {
    let guests = vec![
        booking(1, now() - Duration::hours(2), BookingStatus::CheckedIn),
        booking(2, now() - Duration::days(1), BookingStatus::CheckingOut),
    ];
    let occ = stats::compute_occupancy_stats(&guests, 100, now());
    assert_eq!(occ.occupied_rooms, 2);
    assert_eq!(occ.vacant_rooms, 98);
    assert_eq!(occ.occupancy_rate, 2);
    assert_eq!(occ.vacancy_rate, 98);
    assert_eq!(occ.today_check_ins, 1);
    assert_eq!(occ.today_check_outs, 1);
    assert_eq!(occ.avg_stay_days, 1.0);
}

#[test]
fn page_window_tracks_current_page() {
    assert_eq!(engine::page_window(1, 10, 5), 1..=5);
    assert_eq!(engine::page_window(9, 10, 5), 7..=10);
    assert_eq!(engine::page_window(1, 1, 5), 1..=1);
}

#[test]
fn csv_exports_every_match_not_just_the_page() {
    let mut source = MockSource::new(DashboardView::AllBookings, 99);
    let mut session = DashboardSession::load(DashboardView::AllBookings, &mut source, now()).unwrap();
    session.set_page_size(10);
    let report = output::build_report(&session, now());
    assert_eq!(report.records.len(), 10);

    let csv = String::from_utf8(output::render(&report, OutputFormat::Csv)).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("BookingDate,Name,Mobile,CheckIn,CheckOut,Duration,RoomType,BookingSource,TotalAmount,Status")
    );
    assert_eq!(lines.count(), session.records().len());
}

#[test]
fn guest_csv_quotes_addresses() {
    let mut guest = booking(1, now(), BookingStatus::CheckedIn);
    guest.address = "12 Main St, Austin, TX".to_string();
    let csv = String::from_utf8(output::render_csv([&guest], output::CsvLayout::Guests)).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("101,Guest 1,"));
    assert!(row.contains(",\"12 Main St, Austin, TX\","));
    assert!(row.contains("2024-06-15T12:00:00.000"));
}

#[test]
fn json_report_carries_view_sections() {
    let mut source = MockSource::new(DashboardView::Guests, 4);
    let session = DashboardSession::load(DashboardView::Guests, &mut source, now()).unwrap();
    let report = output::build_report(&session, now());
    let value: serde_json::Value =
        serde_json::from_slice(&output::render(&report, OutputFormat::Json)).unwrap();
    assert_eq!(value["view"], "guests");
    assert!(value["occupancy"]["occupied_rooms"].as_u64().unwrap() >= 45);
    assert!(value.get("upcoming").is_none());
    assert!(value["records"].as_array().unwrap().len() <= engine::DEFAULT_PAGE_SIZE);
}

#[test]
fn html_report_escapes_guest_names() {
    let mut r = booking(1, now(), BookingStatus::Confirmed);
    r.guest_name = "<script>alert(1)</script>".to_string();
    let session = DashboardSession::new(DashboardView::AllBookings, vec![r]);
    let report = output::build_report(&session, now());
    let html = String::from_utf8(output::render(&report, OutputFormat::Html)).unwrap();
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)</script>"));
}

#[test]
fn text_report_lists_page_rows() {
    colored::control::set_override(false);
    let records = vec![
        booking(1, at(2024, 6, 1), BookingStatus::Completed),
        booking(2, at(2024, 6, 20), BookingStatus::Confirmed),
    ];
    let session = DashboardSession::new(DashboardView::AllBookings, records);
    let report = output::build_report(&session, now());
    let text = String::from_utf8(output::render_text(&report)).unwrap();
    assert!(text.contains(":: Overview  : bookings=2"));
    assert!(text.contains("Guest 1"));
    assert!(text.contains("Guest 2"));
    assert!(text.contains("showing 1-2 of 2"));
}

#[tokio::test]
async fn watch_loop_stops_after_tick_limit() {
    let guests: Vec<BookingRecord> = (1..=20)
        .map(|id| booking(id, now() - Duration::days(1), BookingStatus::CheckedIn))
        .collect();
    let mut source = FixtureSource::new(guests);
    let mut session = DashboardSession::load(DashboardView::Guests, &mut source, now()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut renders = 0;
    let settings = crate::app::WatchSettings {
        interval: StdDuration::from_millis(5),
        ticks: Some(4),
    };
    let refreshes = crate::app::watch_session(&mut session, settings, &mut rng, |s, _| {
        assert_eq!(s.records().len(), 20);
        renders += 1;
        Ok(())
    })
    .await
    .unwrap();
    assert_eq!(refreshes, 4);
    assert_eq!(renders, 4);
    let moved = session
        .records()
        .iter()
        .filter(|r| r.status == BookingStatus::CheckingOut)
        .count();
    assert!(moved <= 4);
}

#[tokio::test]
async fn watch_loop_surfaces_render_errors() {
    let mut session = DashboardSession::new(DashboardView::AllBookings, Vec::new());
    let mut rng = StdRng::seed_from_u64(1);
    let settings = crate::app::WatchSettings {
        interval: StdDuration::from_millis(1),
        ticks: None,
    };
    let result = crate::app::watch_session(&mut session, settings, &mut rng, |_, _| {
        Err("disk full".to_string())
    })
    .await;
    assert_eq!(result, Err("disk full".to_string()));
}

const NAMES: &[&str] = &["Asha", "bala", "Chen", "asha", "Dev"];

fn arb_records() -> impl Strategy<Value = Vec<BookingRecord>> {
    let fields = (
        0..BookingSource::ALL.len(),
        0..BookingStatus::ALL.len(),
        0..RoomType::ALL.len(),
        -60i64..60,
        1i64..6,
        0..NAMES.len(),
    );
    prop::collection::vec(fields, 0..80).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (source, status, room, offset, nights, name))| {
                let check_in = now() + Duration::days(offset);
                BookingRecord::new(
                    i as u64 + 1,
                    GuestDetails {
                        name: NAMES[name].to_string(),
                        ..Default::default()
                    },
                    StayDetails {
                        room_number: (i % 7) as u32 + 1,
                        room_type: RoomType::ALL[room],
                        check_in,
                        check_out: check_in + Duration::days(nights),
                        booking_date: check_in - Duration::days(nights),
                        booking_source: BookingSource::ALL[source],
                        status: BookingStatus::ALL[status],
                    },
                )
            })
            .collect()
    })
}

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::option::of(prop_oneof![Just("a"), Just("1"), Just("oyo"), Just("ch")]),
        prop::option::of(0..BookingSource::ALL.len()),
        prop::option::of(0..BookingStatus::ALL.len()),
        prop::option::of(0..RoomType::ALL.len()),
    )
        .prop_map(|(search, source, status, room)| FilterCriteria {
            search: search.map(str::to_string),
            source: source.map(|i| BookingSource::ALL[i]),
            status: status.map(|i| BookingStatus::ALL[i]),
            room_type: room.map(|i| RoomType::ALL[i]),
            ..Default::default()
        })
}

fn arb_sort() -> impl Strategy<Value = SortSpec> {
    (
        prop_oneof![
            Just(SortField::CheckIn),
            Just(SortField::BookingDate),
            Just(SortField::Amount),
            Just(SortField::Name),
        ],
        prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)],
    )
        .prop_map(|(field, direction)| SortSpec::new(field, direction))
}

proptest! {
    #[test]
    fn prop_filter_is_ordered_subset(records in arb_records(), criteria in arb_criteria()) {
        let filtered = engine::apply_filters(&records, &criteria, now());
        prop_assert!(filtered.len() <= records.len());
        let ids: Vec<u64> = filtered.iter().map(|r| r.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for r in &filtered {
            prop_assert_eq!(*r, &records[r.id as usize - 1]);
        }
    }

    #[test]
    fn prop_sort_is_stable(records in arb_records(), sort in arb_sort()) {
        let sorted = engine::apply_sort(records.iter().collect(), sort);
        prop_assert_eq!(sorted.len(), records.len());
        let key = |r: &BookingRecord| match sort.field {
            Some(SortField::CheckIn) => r.check_in.and_utc().timestamp().to_string(),
            Some(SortField::BookingDate) => r.booking_date.and_utc().timestamp().to_string(),
            Some(SortField::Amount) => r.total_amount.to_string(),
            _ => r.guest_name.to_lowercase(),
        };
        for w in sorted.windows(2) {
            if key(w[0]) == key(w[1]) {
                prop_assert!(w[0].id < w[1].id);
            }
        }
    }

    #[test]
    fn prop_pages_cover_every_record(records in arb_records(), page_size in 1usize..25) {
        let total = engine::total_pages(records.len(), page_size);
        prop_assert_eq!(total, std::cmp::max(1, records.len().div_ceil(page_size)));
        let covered: usize = (1..=total)
            .map(|p| engine::paginate(&records, p, page_size).items.len())
            .sum();
        prop_assert_eq!(covered, records.len());
        prop_assert!(engine::paginate(&records, total + 1, page_size).items.is_empty());
    }

    #[test]
    fn prop_clearing_filters_leaks_nothing(records in arb_records(), source in 0..BookingSource::ALL.len()) {
        let by_source = FilterCriteria {
            source: Some(BookingSource::ALL[source]),
            ..Default::default()
        };
        let once: Vec<BookingRecord> = engine::apply_filters(&records, &by_source, now())
            .into_iter()
            .cloned()
            .collect();
        let cleared = engine::apply_filters(&once, &FilterCriteria::default(), now());
        let direct = engine::apply_filters(&records, &by_source, now());
        prop_assert_eq!(cleared, direct);
    }
}

#[test]
fn fixture_source_round_trips_through_session() {
    let records = vec![
        booking(1, at(2024, 6, 20), BookingStatus::Confirmed),
        booking(2, at(2024, 6, 18), BookingStatus::Confirmed),
    ];
    let mut source = FixtureSource::new(records.clone());
    assert_eq!(source.name(), "fixture");
    let mut session = DashboardSession::load(DashboardView::Upcoming, &mut source, now()).unwrap();
    session.set_sort(SortSpec::new(SortField::CheckIn, SortDirection::Ascending));
    let ids: Vec<u64> = session.view(now()).matches.iter().map(|r| r.id).collect();
    assert_eq!(ids, [2, 1]);
    assert_eq!(session.records(), records.as_slice());
}
