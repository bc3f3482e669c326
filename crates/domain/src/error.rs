// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Booking status string is not one of the defined values.
    InvalidBookingStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// A status transition is not permitted by the booking lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Session slot label is not one of the defined slots.
    InvalidSessionSlot(String),
    /// Counselor name is empty or invalid.
    InvalidCounselorName(String),
    /// Student name is empty or invalid.
    InvalidStudentName(String),
    /// NIM (student number) is empty or invalid.
    InvalidNim(String),
    /// Study program is empty or invalid.
    InvalidStudyProgram(String),
    /// Phone number is empty or invalid.
    InvalidPhoneNumber(String),
    /// Email address is empty or invalid.
    InvalidEmail(String),
    /// Failed to parse a timestamp from its stored string form.
    DateParseError {
        /// The invalid timestamp string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBookingStatus { status } => {
                write!(f, "Invalid booking status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition {from} -> {to}: {reason}")
            }
            Self::InvalidSessionSlot(label) => write!(f, "Invalid session slot: '{label}'"),
            Self::InvalidCounselorName(msg) => write!(f, "Invalid counselor name: {msg}"),
            Self::InvalidStudentName(msg) => write!(f, "Invalid student name: {msg}"),
            Self::InvalidNim(msg) => write!(f, "Invalid NIM: {msg}"),
            Self::InvalidStudyProgram(msg) => write!(f, "Invalid study program: {msg}"),
            Self::InvalidPhoneNumber(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
