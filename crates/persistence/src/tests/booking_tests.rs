// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking collection tests, including the malformed-record skip policy.

use konseling_domain::BookingStatus;
use time::macros::datetime;

use super::{create_test_booking, create_test_persistence};
use crate::data_models::BookingRow;
use crate::error::PersistenceError;

#[test]
fn test_create_assigns_fresh_id_and_persists_pending() {
    let mut persistence = create_test_persistence();

    let booking =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));
    let id = persistence.create_booking(&booking).expect("create failed");
    assert!(!id.is_empty());

    let stored = persistence
        .get_booking(&id)
        .expect("get failed")
        .expect("booking missing");
    assert_eq!(stored.id, id);
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.ktm_url, "");
    assert_eq!(stored.counselor, "");
}

#[test]
fn test_create_generates_distinct_ids() {
    let mut persistence = create_test_persistence();
    let booking =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));

    let first = persistence.create_booking(&booking).expect("create failed");
    let second = persistence.create_booking(&booking).expect("create failed");
    assert_ne!(first, second);
}

#[test]
fn test_list_for_user_orders_most_recent_first() {
    let mut persistence = create_test_persistence();

    let oldest =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-01 09:00 UTC));
    let newest =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-12 09:00 UTC));
    let middle =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-05 09:00 UTC));
    let other_user =
        create_test_booking("user-2", BookingStatus::Pending, datetime!(2026-02-20 09:00 UTC));

    persistence.create_booking(&oldest).expect("create failed");
    persistence.create_booking(&newest).expect("create failed");
    persistence.create_booking(&middle).expect("create failed");
    persistence.create_booking(&other_user).expect("create failed");

    let listed = persistence
        .list_bookings_for_user("user-1")
        .expect("list failed");

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].created_at, datetime!(2026-02-12 09:00 UTC));
    assert_eq!(listed[1].created_at, datetime!(2026-02-05 09:00 UTC));
    assert_eq!(listed[2].created_at, datetime!(2026-02-01 09:00 UTC));
}

#[test]
fn test_list_all_with_status_filter_returns_exact_matches() {
    let mut persistence = create_test_persistence();

    for status in [
        BookingStatus::Pending,
        BookingStatus::Pending,
        BookingStatus::Ongoing,
        BookingStatus::Completed,
    ] {
        let booking = create_test_booking("user-1", status, datetime!(2026-02-10 09:00 UTC));
        persistence.create_booking(&booking).expect("create failed");
    }

    let ongoing = persistence
        .list_all_bookings(Some(BookingStatus::Ongoing))
        .expect("list failed");
    assert_eq!(ongoing.len(), 1);
    assert_eq!(ongoing[0].status, BookingStatus::Ongoing);

    let all = persistence.list_all_bookings(None).expect("list failed");
    assert_eq!(all.len(), 4);
}

#[test]
fn test_update_status_single_field_write() {
    let mut persistence = create_test_persistence();
    let booking =
        create_test_booking("user-1", BookingStatus::Ongoing, datetime!(2026-02-10 09:00 UTC));
    let id = persistence.create_booking(&booking).expect("create failed");

    persistence
        .update_booking_status(&id, BookingStatus::Completed)
        .expect("update failed");

    let stored = persistence
        .get_booking(&id)
        .expect("get failed")
        .expect("booking missing");
    assert_eq!(stored.status, BookingStatus::Completed);
}

#[test]
fn test_assign_counselor_sets_name_and_status_together() {
    let mut persistence = create_test_persistence();
    let booking =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));
    let id = persistence.create_booking(&booking).expect("create failed");

    persistence
        .assign_counselor(&id, "Dr. X")
        .expect("assign failed");

    let stored = persistence
        .get_booking(&id)
        .expect("get failed")
        .expect("booking missing");
    assert_eq!(stored.status, BookingStatus::Ongoing);
    assert_eq!(stored.counselor, "Dr. X");
}

#[test]
fn test_update_status_unknown_id_is_not_found() {
    let mut persistence = create_test_persistence();

    let result = persistence.update_booking_status("missing", BookingStatus::Cancelled);
    assert_eq!(
        result,
        Err(PersistenceError::BookingNotFound(String::from("missing")))
    );
}

#[test]
fn test_update_booking_replaces_document() {
    let mut persistence = create_test_persistence();
    let booking =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));
    let id = persistence.create_booking(&booking).expect("create failed");

    let mut updated = persistence
        .get_booking(&id)
        .expect("get failed")
        .expect("booking missing");
    updated.phone_number = String::from("089999999999");
    updated.ktm_url = String::from("http://localhost:3000/files/ktm/new.jpg");

    persistence.update_booking(&updated).expect("update failed");

    let stored = persistence
        .get_booking(&id)
        .expect("get failed")
        .expect("booking missing");
    assert_eq!(stored.phone_number, "089999999999");
    assert_eq!(stored.ktm_url, "http://localhost:3000/files/ktm/new.jpg");
}

#[test]
fn test_delete_removes_record() {
    let mut persistence = create_test_persistence();
    let booking =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));
    let id = persistence.create_booking(&booking).expect("create failed");

    persistence.delete_booking(&id).expect("delete failed");

    assert_eq!(persistence.get_booking(&id).expect("get failed"), None);
    assert_eq!(
        persistence.delete_booking(&id),
        Err(PersistenceError::BookingNotFound(id))
    );
}

#[test]
fn test_malformed_record_is_skipped_in_lists() {
    let mut persistence = create_test_persistence();

    let valid =
        create_test_booking("user-1", BookingStatus::Pending, datetime!(2026-02-10 09:00 UTC));
    persistence.create_booking(&valid).expect("create failed");

    // A record whose status no code path writes anymore; the skip-and-log
    // policy keeps it from poisoning list views.
    let corrupt = BookingRow {
        id: String::from("corrupt-1"),
        user_id: String::from("user-1"),
        student_name: String::from("Ana"),
        nim: String::from("12345678901"),
        study_program: String::from("Ilmu Komputer"),
        phone_number: String::from("081234567890"),
        session_date: String::from("2026-02-10T09:00:00.000000000Z"),
        session_slot: String::from("Sesi 1 (10.00 - 11.00)"),
        counselor: String::new(),
        status: String::from("Archived"),
        ktm_url: String::new(),
        created_at: String::from("2026-02-10T09:00:00.000000000Z"),
    };
    persistence
        .insert_raw_booking_row(&corrupt)
        .expect("raw insert failed");

    let listed = persistence
        .list_bookings_for_user("user-1")
        .expect("list failed");
    assert_eq!(listed.len(), 1);

    let all = persistence.list_all_bookings(None).expect("list failed");
    assert_eq!(all.len(), 1);

    // A direct get of the corrupt document surfaces the decode error.
    assert!(persistence.get_booking("corrupt-1").is_err());
}
