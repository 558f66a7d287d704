// Pure fold functions from cached bookings/rooms to chart-ready statistics.
// Booking totals are authoritative from the server and are only summed here,
// never recomputed. Deterministic, no I/O, no cache coupling.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{Booking, PaymentStatus, Room};

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilitySplit {
    pub available: usize,
    pub unavailable: usize,
}

pub fn total_revenue(bookings: &[Booking]) -> f64 {
    bookings.iter().map(|b| b.total).sum()
}

// Buckets by the weekday of the check-in date. Check-in arrives as a plain
// calendar date (YYYY-MM-DD), so the weekday is fixed at parse time and no
// timezone conversion can shift it. All seven days are always present, in
// Mon..Sun order.
pub fn revenue_by_weekday(bookings: &[Booking]) -> Vec<(Weekday, f64)> {
    let mut buckets = [0.0f64; 7];
    for booking in bookings {
        let index = booking.check_in_date.weekday().num_days_from_monday() as usize;
        buckets[index] += booking.total;
    }
    WEEKDAYS
        .iter()
        .zip(buckets)
        .map(|(day, revenue)| (*day, revenue))
        .collect()
}

// Calendar-chronological (year, month) buckets, independent of the order
// bookings were fetched in.
pub fn revenue_by_month(bookings: &[Booking]) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for booking in bookings {
        let key = (booking.check_in_date.year(), booking.check_in_date.month());
        *buckets.entry(key).or_insert(0.0) += booking.total;
    }
    buckets
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            year,
            month,
            revenue,
        })
        .collect()
}

// Per-check-in-date buckets for the daily sales trend, chronological.
pub fn revenue_by_day(bookings: &[Booking]) -> Vec<(NaiveDate, f64)> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for booking in bookings {
        *buckets.entry(booking.check_in_date).or_insert(0.0) += booking.total;
    }
    buckets.into_iter().collect()
}

// All five statuses are always present, defaulting to 0.
pub fn count_by_status(bookings: &[Booking]) -> BTreeMap<PaymentStatus, usize> {
    let mut counts: BTreeMap<PaymentStatus, usize> = PaymentStatus::ALL
        .iter()
        .map(|status| (*status, 0))
        .collect();
    for booking in bookings {
        *counts.entry(booking.payment_status).or_insert(0) += 1;
    }
    counts
}

pub fn availability_split(rooms: &[Room]) -> AvailabilitySplit {
    let mut split = AvailabilitySplit::default();
    for room in rooms {
        if room.is_available {
            split.available += 1;
        } else {
            split.unavailable += 1;
        }
    }
    split
}
