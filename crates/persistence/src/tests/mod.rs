// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod booking_tests;

use konseling_domain::{Booking, BookingStatus, SessionSlot, Student};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_booking(
    user_id: &str,
    status: BookingStatus,
    created_at: OffsetDateTime,
) -> Booking {
    Booking {
        id: String::new(),
        user_id: user_id.to_string(),
        student_name: String::from("Ana"),
        nim: String::from("12345678901"),
        study_program: String::from("Ilmu Komputer"),
        phone_number: String::from("081234567890"),
        session_date: datetime!(2026-03-02 10:00 UTC),
        session_slot: SessionSlot::Sesi1,
        counselor: String::new(),
        status,
        ktm_url: String::new(),
        created_at,
    }
}

pub fn create_test_student(uid: &str) -> Student {
    Student {
        uid: uid.to_string(),
        name: String::from("Ana"),
        nim: String::from("12345678901"),
        study_program: String::from("Ilmu Komputer"),
        phone_number: String::from("081234567890"),
        email: format!("{uid}@student.ub.ac.id"),
        photo_url: String::new(),
    }
}
