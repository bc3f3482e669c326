// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use konseling_domain::DomainError;
use konseling_persistence::PersistenceError;
use konseling_storage::StorageError;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidBookingStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid booking status: '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_lifecycle"),
                message: format!("Cannot move booking from {from} to {to}: {reason}"),
            }
        }
        DomainError::InvalidSessionSlot(label) => ApiError::InvalidInput {
            field: String::from("sesi"),
            message: format!("Invalid session slot: '{label}'"),
        },
        DomainError::InvalidCounselorName(msg) => ApiError::InvalidInput {
            field: String::from("konselor"),
            message: msg,
        },
        DomainError::InvalidStudentName(msg) => ApiError::InvalidInput {
            field: String::from("nama"),
            message: msg,
        },
        DomainError::InvalidNim(msg) => ApiError::InvalidInput {
            field: String::from("nim"),
            message: msg,
        },
        DomainError::InvalidStudyProgram(msg) => ApiError::InvalidInput {
            field: String::from("prodi"),
            message: msg,
        },
        DomainError::InvalidPhoneNumber(msg) => ApiError::InvalidInput {
            field: String::from("nomor_hp"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("tanggal"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Not-found conditions become `ResourceNotFound`; everything else is an
/// internal failure whose detail stays in the logs.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking '{id}' does not exist"),
        },
        PersistenceError::StudentNotFound(uid) => ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student '{uid}' does not exist"),
        },
        PersistenceError::AccountExists(email) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("An account already exists for '{email}'"),
        },
        PersistenceError::AccountNotFound(msg) | PersistenceError::SessionNotFound(msg) => {
            ApiError::AuthenticationFailed { reason: msg }
        }
        _ => ApiError::Internal {
            message: format!("Persistence error: {err}"),
        },
    }
}

/// Translates an attachment storage error into an API error.
///
/// Validation failures carry the user-facing messages the booking client
/// shows inline; upload failures fail the whole create (no orphan
/// booking record).
#[must_use]
pub fn translate_storage_error(err: &StorageError) -> ApiError {
    match err {
        StorageError::UnsupportedType { .. } => ApiError::InvalidInput {
            field: String::from("ktm"),
            message: String::from("Format file tidak didukung. Gunakan JPG, PNG, atau GIF."),
        },
        StorageError::TooLarge { .. } => ApiError::InvalidInput {
            field: String::from("ktm"),
            message: String::from("Ukuran file terlalu besar. Maksimal 5MB."),
        },
        StorageError::Unreadable => ApiError::InvalidInput {
            field: String::from("ktm"),
            message: String::from("Gagal membaca file"),
        },
        StorageError::AlreadyExists { .. } | StorageError::NotFound { .. }
        | StorageError::Io { .. } => ApiError::Internal {
            message: format!("Gagal upload KTM: {err}"),
        },
    }
}
