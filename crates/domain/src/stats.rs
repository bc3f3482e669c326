// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking aggregation for the admin dashboard.
//!
//! Stats are a derived view recomputed from the full booking set on each
//! request; nothing is cached or incrementally maintained. Cost is linear
//! in the number of bookings.

use crate::booking_status::BookingStatus;
use crate::types::Booking;
use time::{Duration, OffsetDateTime, Time};

/// Derived booking counts by status and creation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingStats {
    /// Count of all bookings.
    pub total: usize,
    /// Bookings with status `Pending`.
    pub pending: usize,
    /// Bookings with status `Ongoing`.
    pub ongoing: usize,
    /// Bookings with status `Completed`.
    pub completed: usize,
    /// Bookings with status `Cancelled`.
    pub cancelled: usize,
    /// Bookings created since the start of `now`'s calendar day.
    pub today: usize,
    /// Bookings created since the most recent Sunday midnight.
    pub this_week: usize,
    /// Bookings created since the 1st of the current month, midnight.
    pub this_month: usize,
}

/// Computes booking statistics against a reference instant.
///
/// Window starts are midnight boundaries in `now`'s offset: the current
/// calendar day, the current week (weeks start on Sunday), and the current
/// month. A booking counts toward a window when `created_at >= start`.
///
/// # Arguments
///
/// * `bookings` - The full booking set
/// * `now` - The reference instant for window computation
#[must_use]
pub fn compute_stats(bookings: &[Booking], now: OffsetDateTime) -> BookingStats {
    let day_start: OffsetDateTime = now.replace_time(Time::MIDNIGHT);
    let week_start: OffsetDateTime =
        day_start - Duration::days(i64::from(now.weekday().number_days_from_sunday()));
    // Day 1 exists in every month, so replace_day cannot fail here.
    let month_start: OffsetDateTime = day_start.replace_day(1).unwrap_or(day_start);

    let count_status =
        |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
    let count_since =
        |start: OffsetDateTime| bookings.iter().filter(|b| b.created_at >= start).count();

    BookingStats {
        total: bookings.len(),
        pending: count_status(BookingStatus::Pending),
        ongoing: count_status(BookingStatus::Ongoing),
        completed: count_status(BookingStatus::Completed),
        cancelled: count_status(BookingStatus::Cancelled),
        today: count_since(day_start),
        this_week: count_since(week_start),
        this_month: count_since(month_start),
    }
}
