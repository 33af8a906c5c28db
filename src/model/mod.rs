pub mod status;

use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;

pub use status::{status_from_dates, BookingStatus, StatusError};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Deluxe, RoomType::Suite];

    /// Nightly rate in the dashboard's single currency unit.
    pub fn nightly_rate(self) -> u64 {
        match self {
            RoomType::Standard => 2500,
            RoomType::Deluxe => 4200,
            RoomType::Suite => 7500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(v))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingSource {
    Offline,
    #[serde(rename = "OYO")]
    Oyo,
    MakeMyTrip,
    Goibibo,
    #[serde(rename = "Booking.com")]
    BookingCom,
    Expedia,
    Agoda,
}

impl BookingSource {
    pub const ALL: [BookingSource; 7] = [
        BookingSource::Offline,
        BookingSource::Oyo,
        BookingSource::MakeMyTrip,
        BookingSource::Goibibo,
        BookingSource::BookingCom,
        BookingSource::Expedia,
        BookingSource::Agoda,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingSource::Offline => "Offline",
            BookingSource::Oyo => "OYO",
            BookingSource::MakeMyTrip => "MakeMyTrip",
            BookingSource::Goibibo => "Goibibo",
            BookingSource::BookingCom => "Booking.com",
            BookingSource::Expedia => "Expedia",
            BookingSource::Agoda => "Agoda",
        }
    }

    pub fn is_online(self) -> bool {
        self != BookingSource::Offline
    }

    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(v))
    }
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of nights billed for a stay: whole days rounded up, never less than one.
pub fn stay_duration_days(check_in: NaiveDateTime, check_out: NaiveDateTime) -> u64 {
    let millis = (check_out - check_in).num_milliseconds().unsigned_abs();
    let days = millis.div_ceil(DAY_MILLIS as u64);
    days.max(1)
}

pub fn total_amount_for(
    room_type: RoomType,
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
) -> u64 {
    room_type.nightly_rate() * stay_duration_days(check_in, check_out)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: u64,
    pub guest_name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub id_number: String,
    pub room_number: u32,
    pub room_type: RoomType,
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
    pub booking_date: NaiveDateTime,
    pub booking_source: BookingSource,
    pub status: BookingStatus,
    pub total_amount: u64,
}

/// Identity and contact fields of a guest, kept apart from stay details so
/// record construction reads clearly at call sites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuestDetails {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub id_number: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StayDetails {
    pub room_number: u32,
    pub room_type: RoomType,
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
    pub booking_date: NaiveDateTime,
    pub booking_source: BookingSource,
    pub status: BookingStatus,
}

impl BookingRecord {
    pub fn new(id: u64, guest: GuestDetails, stay: StayDetails) -> Self {
        Self {
            id,
            guest_name: guest.name,
            mobile: guest.mobile,
            email: guest.email,
            address: guest.address,
            id_number: guest.id_number,
            room_number: stay.room_number,
            room_type: stay.room_type,
            check_in: stay.check_in,
            check_out: stay.check_out,
            booking_date: stay.booking_date,
            booking_source: stay.booking_source,
            status: stay.status,
            total_amount: total_amount_for(stay.room_type, stay.check_in, stay.check_out),
        }
    }

    pub fn stay_duration_days(&self) -> u64 {
        stay_duration_days(self.check_in, self.check_out)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    /// Checks the invariants a record source must uphold.
    pub fn validate(&self) -> Result<(), String> {
        if self.check_out <= self.check_in {
            return Err(format!(
                "booking {}: check-out {} is not after check-in {}",
                self.id, self.check_out, self.check_in
            ));
        }
        let expected = total_amount_for(self.room_type, self.check_in, self.check_out);
        if self.total_amount != expected {
            return Err(format!(
                "booking {}: total amount {} does not match {} x {} nights",
                self.id,
                self.total_amount,
                self.room_type.nightly_rate(),
                self.stay_duration_days()
            ));
        }
        Ok(())
    }
}
