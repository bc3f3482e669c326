// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates the student-supplied fields of a booking request.
///
/// These checks mirror the submitting client's form gating and are
/// enforced again at the API boundary before any write happens.
///
/// # Errors
///
/// Returns an error if any required field is empty.
pub fn validate_booking_fields(
    student_name: &str,
    nim: &str,
    study_program: &str,
    phone_number: &str,
) -> Result<(), DomainError> {
    if student_name.trim().is_empty() {
        return Err(DomainError::InvalidStudentName(String::from(
            "Student name cannot be empty",
        )));
    }

    if nim.trim().is_empty() {
        return Err(DomainError::InvalidNim(String::from("NIM cannot be empty")));
    }

    if study_program.trim().is_empty() {
        return Err(DomainError::InvalidStudyProgram(String::from(
            "Study program cannot be empty",
        )));
    }

    if phone_number.trim().is_empty() {
        return Err(DomainError::InvalidPhoneNumber(String::from(
            "Phone number cannot be empty",
        )));
    }

    Ok(())
}

/// Validates the fields of a registration request.
///
/// # Errors
///
/// Returns an error if:
/// - any required field is empty
/// - the NIM is not all digits or shorter than 10 characters
/// - the email has no `@`
pub fn validate_registration_fields(
    email: &str,
    name: &str,
    nim: &str,
    study_program: &str,
    phone_number: &str,
) -> Result<(), DomainError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must be a valid address",
        )));
    }

    validate_booking_fields(name, nim, study_program, phone_number)?;

    // Rule: NIM is numeric and at least 10 digits
    if nim.len() < 10 || !nim.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidNim(String::from(
            "NIM must be numeric and at least 10 digits",
        )));
    }

    Ok(())
}

/// Validates a counselor name for assignment.
///
/// # Errors
///
/// Returns an error if the name is empty.
pub fn validate_counselor_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidCounselorName(String::from(
            "Counselor name cannot be empty",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_fields_accept_complete_input() {
        let result =
            validate_booking_fields("Ana", "12345678901", "CS", "081234567890");
        assert!(result.is_ok());
    }

    #[test]
    fn test_booking_fields_reject_empty_name() {
        let result = validate_booking_fields("", "12345678901", "CS", "081234567890");
        assert!(matches!(result, Err(DomainError::InvalidStudentName(_))));
    }

    #[test]
    fn test_booking_fields_reject_whitespace_phone() {
        let result = validate_booking_fields("Ana", "12345678901", "CS", "   ");
        assert!(matches!(result, Err(DomainError::InvalidPhoneNumber(_))));
    }

    #[test]
    fn test_registration_rejects_short_nim() {
        let result = validate_registration_fields(
            "ana@student.ub.ac.id",
            "Ana",
            "12345",
            "CS",
            "081234567890",
        );
        assert!(matches!(result, Err(DomainError::InvalidNim(_))));
    }

    #[test]
    fn test_registration_rejects_non_numeric_nim() {
        let result = validate_registration_fields(
            "ana@student.ub.ac.id",
            "Ana",
            "12345ABC901",
            "CS",
            "081234567890",
        );
        assert!(matches!(result, Err(DomainError::InvalidNim(_))));
    }

    #[test]
    fn test_registration_rejects_bad_email() {
        let result = validate_registration_fields(
            "not-an-email",
            "Ana",
            "12345678901",
            "CS",
            "081234567890",
        );
        assert!(matches!(result, Err(DomainError::InvalidEmail(_))));
    }

    #[test]
    fn test_counselor_name_rules() {
        assert!(validate_counselor_name("Dr. X").is_ok());
        assert!(validate_counselor_name("").is_err());
        assert!(validate_counselor_name("  ").is_err());
    }
}
