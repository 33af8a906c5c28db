use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{DashboardView, RecordSource, SourceError};
use crate::engine::stats::DEFAULT_TOTAL_ROOMS;
use crate::model::{
    status_from_dates, BookingRecord, BookingSource, BookingStatus, GuestDetails, RoomType,
    StayDetails,
};

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Sarah", "David", "Emma", "Robert", "Lisa", "William", "Jennifer",
    "James", "Maria", "Christopher", "Anna", "Daniel", "Patricia", "Matthew", "Michelle",
    "Anthony", "Linda", "Mark", "Elizabeth", "Steven", "Susan", "Paul", "Jessica", "Andrew",
    "Karen", "Joshua", "Nancy", "Kevin", "Betty", "Ronald", "Dorothy", "Jason", "Helen",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
];

const IN_CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Kolkata", "Pune", "Ahmedabad",
    "Jaipur", "Surat", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal",
];

const IN_STATES: &[&str] = &[
    "MH", "DL", "KA", "TG", "TN", "WB", "GJ", "RJ", "UP", "MP", "AP", "HR",
];

const US_CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "Austin", "Seattle", "Denver", "Boston", "Nashville", "Portland",
];

const US_STATES: &[&str] = &[
    "CA", "TX", "FL", "NY", "PA", "IL", "OH", "GA", "NC", "MI", "NJ", "VA", "WA", "AZ", "MA",
];

/// Deterministic synthetic data for one dashboard view. Two sources with the
/// same view, seed and `now` produce identical records.
#[derive(Clone, Debug)]
pub struct MockSource {
    view: DashboardView,
    seed: u64,
    label: String,
}

impl MockSource {
    pub fn new(view: DashboardView, seed: u64) -> Self {
        Self {
            view,
            seed,
            label: format!("mock:{}:{}", view.label(), seed),
        }
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn generate(&self, now: NaiveDateTime) -> Vec<BookingRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        match self.view {
            DashboardView::AllBookings => all_bookings(&mut rng, now),
            DashboardView::Upcoming => upcoming_bookings(&mut rng, now),
            DashboardView::Guests => current_guests(&mut rng, now),
        }
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn load(&mut self, now: NaiveDateTime) -> Result<Vec<BookingRecord>, SourceError> {
        Ok(self.generate(now))
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn pick_room_type(rng: &mut StdRng) -> RoomType {
    RoomType::ALL[rng.gen_range(0..RoomType::ALL.len())]
}

fn pick_source(rng: &mut StdRng) -> BookingSource {
    BookingSource::ALL[rng.gen_range(0..BookingSource::ALL.len())]
}

fn random_guest(rng: &mut StdRng, domestic: bool) -> GuestDetails {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let (mobile, address) = if domestic {
        let city = pick(rng, IN_CITIES);
        let state = pick(rng, IN_STATES);
        (
            format!(
                "+91 {}-{}",
                rng.gen_range(10000..=99999),
                rng.gen_range(10000..=99999)
            ),
            format!("{} {city} Road, {city}, {state}", rng.gen_range(1..=999)),
        )
    } else {
        let city = pick(rng, US_CITIES);
        let state = pick(rng, US_STATES);
        (
            format!(
                "+1 ({}) {}-{}",
                rng.gen_range(100..=999),
                rng.gen_range(100..=999),
                rng.gen_range(1000..=9999)
            ),
            format!("{} Main St, {city}, {state}", rng.gen_range(1..=9999)),
        )
    };
    GuestDetails {
        name: format!("{first} {last}"),
        mobile,
        email: format!("{}.{}@email.com", first.to_lowercase(), last.to_lowercase()),
        address,
        id_number: format!("ID{}", rng.gen_range(100000..=999999)),
    }
}

/// Bookings spread from a year back to three months ahead, newest booking first.
fn all_bookings(rng: &mut StdRng, now: NaiveDateTime) -> Vec<BookingRecord> {
    let count = rng.gen_range(300..=500);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let guest = random_guest(rng, true);
        let room_type = pick_room_type(rng);
        let booking_source = pick_source(rng);
        let booking_date = now + Duration::days(rng.gen_range(-365..85));
        let check_in = booking_date + Duration::days(rng.gen_range(0..=60));
        let check_out = check_in + Duration::days(rng.gen_range(1..=10));
        let status = match status_from_dates(check_in, check_out, now) {
            BookingStatus::Completed if rng.gen_bool(0.1) => BookingStatus::Cancelled,
            BookingStatus::Confirmed if rng.gen_bool(0.05) => BookingStatus::Cancelled,
            derived => derived,
        };
        out.push(BookingRecord::new(
            i as u64 + 1,
            guest,
            StayDetails {
                room_number: rng.gen_range(1..=DEFAULT_TOTAL_ROOMS),
                room_type,
                check_in,
                check_out,
                booking_date,
                booking_source,
                status,
            },
        ));
    }
    out.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
    out
}

/// Confirmed future stays over the next 90 days; a room is never booked twice
/// for the same check-in day.
fn upcoming_bookings(rng: &mut StdRng, now: NaiveDateTime) -> Vec<BookingRecord> {
    let count = rng.gen_range(80..=120);
    let mut taken = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let (room_number, check_in) = loop {
            let room = rng.gen_range(1..=DEFAULT_TOTAL_ROOMS);
            let check_in = now + Duration::days(rng.gen_range(1..=90));
            if taken.insert((room, check_in.date())) {
                break (room, check_in);
            }
        };
        let guest = random_guest(rng, true);
        let room_type = pick_room_type(rng);
        let booking_source = pick_source(rng);
        let check_out = check_in + Duration::days(rng.gen_range(1..=7));
        let booking_date = check_in - Duration::days(rng.gen_range(0..45));
        out.push(BookingRecord::new(
            i as u64 + 1,
            guest,
            StayDetails {
                room_number,
                room_type,
                check_in,
                check_out,
                booking_date,
                booking_source,
                status: BookingStatus::Confirmed,
            },
        ));
    }
    out.sort_by(|a, b| a.check_in.cmp(&b.check_in));
    out
}

/// Guests currently in house, one per room.
fn current_guests(rng: &mut StdRng, now: NaiveDateTime) -> Vec<BookingRecord> {
    let count = rng.gen_range(45..=65);
    let rooms = rand::seq::index::sample(rng, DEFAULT_TOTAL_ROOMS as usize, count);
    let mut out = Vec::with_capacity(count);
    for (i, room) in rooms.into_iter().enumerate() {
        let guest = random_guest(rng, false);
        let room_type = pick_room_type(rng);
        let check_in = now - Duration::days(rng.gen_range(0..7));
        let check_out = check_in + Duration::days(rng.gen_range(1..=5));
        let status = if rng.gen_bool(0.9) {
            BookingStatus::CheckedIn
        } else {
            BookingStatus::CheckingOut
        };
        let booking_source = pick_source(rng);
        let booking_date = check_in - Duration::days(rng.gen_range(0..14));
        out.push(BookingRecord::new(
            i as u64 + 1,
            guest,
            StayDetails {
                room_number: room as u32 + 1,
                room_type,
                check_in,
                check_out,
                booking_date,
                booking_source,
                status,
            },
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn same_seed_same_records() {
        let a = MockSource::new(DashboardView::AllBookings, 7).generate(now());
        let b = MockSource::new(DashboardView::AllBookings, 7).generate(now());
        assert_eq!(a, b);
    }

    #[test]
    fn all_bookings_respect_invariants() {
        let records = MockSource::new(DashboardView::AllBookings, 11).generate(now());
        assert!((300..=500).contains(&records.len()));
        assert!(super::super::validate_records("test", &records).is_ok());
        assert!(records
            .windows(2)
            .all(|w| w[0].booking_date >= w[1].booking_date));
        for r in &records {
            if r.status != BookingStatus::Cancelled {
                assert_eq!(r.status, status_from_dates(r.check_in, r.check_out, now()));
            }
        }
    }

    #[test]
    fn upcoming_bookings_are_future_and_conflict_free() {
        let records = MockSource::new(DashboardView::Upcoming, 3).generate(now());
        assert!((80..=120).contains(&records.len()));
        let mut slots = HashSet::new();
        for r in &records {
            assert!(r.check_in > now());
            assert_eq!(r.status, BookingStatus::Confirmed);
            assert!(slots.insert((r.room_number, r.check_in.date())));
        }
        assert!(records.windows(2).all(|w| w[0].check_in <= w[1].check_in));
    }

    #[test]
    fn guests_occupy_distinct_rooms() {
        let records = MockSource::new(DashboardView::Guests, 5).generate(now());
        assert!((45..=65).contains(&records.len()));
        let rooms: HashSet<u32> = records.iter().map(|r| r.room_number).collect();
        assert_eq!(rooms.len(), records.len());
        assert!(records.iter().all(|r| matches!(
            r.status,
            BookingStatus::CheckedIn | BookingStatus::CheckingOut
        )));
        assert!(rooms.iter().all(|room| (1..=100).contains(room)));
    }
}
