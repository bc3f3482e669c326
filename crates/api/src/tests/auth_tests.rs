// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication flow tests: registration, login, session validation,
//! logout robustness, and role classification.

use crate::{
    ApiError, AuthError, AuthenticationService, Role, get_admin_profile, get_student_profile,
    localized_auth_message,
};

use super::helpers::{create_register_request, setup_test_persistence};

#[test]
fn test_register_creates_account_profile_and_session() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("ana@student.ub.ac.id");
    let (token, user) =
        AuthenticationService::register(&mut persistence, &request).expect("register failed");

    assert!(!token.is_empty());
    assert_eq!(user.role, Role::Student);

    let validated = AuthenticationService::validate_session(&mut persistence, &token)
        .expect("session validation failed");
    assert_eq!(validated.uid, user.uid);
    assert_eq!(validated.email, "ana@student.ub.ac.id");

    let profile = get_student_profile(&mut persistence, &user).expect("profile missing");
    assert_eq!(profile.name, "Ana");
    assert_eq!(profile.nim, "12345678901");
}

#[test]
fn test_register_admin_email_writes_marker_record() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("admin@admin.ub.ac.id");
    let (_token, user) =
        AuthenticationService::register(&mut persistence, &request).expect("register failed");
    assert_eq!(user.role, Role::Admin);

    let marker = get_admin_profile(&mut persistence, &user).expect("marker missing");
    assert_eq!(marker.role, "admin");
    assert_eq!(marker.email, "admin@admin.ub.ac.id");
}

#[test]
fn test_register_duplicate_email_rejected() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("ana@student.ub.ac.id");
    AuthenticationService::register(&mut persistence, &request).expect("register failed");

    let result = AuthenticationService::register(&mut persistence, &request);
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "email"));
}

#[test]
fn test_register_short_password_rejected() {
    let mut persistence = setup_test_persistence();

    let mut request = create_register_request("ana@student.ub.ac.id");
    request.password = String::from("12345");

    let result = AuthenticationService::register(&mut persistence, &request);
    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_register_invalid_nim_rejected() {
    let mut persistence = setup_test_persistence();

    let mut request = create_register_request("ana@student.ub.ac.id");
    request.nim = String::from("12AB5");

    let result = AuthenticationService::register(&mut persistence, &request);
    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "nim"));
}

#[test]
fn test_login_succeeds_with_correct_credentials() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("ana@student.ub.ac.id");
    let (_token, registered) =
        AuthenticationService::register(&mut persistence, &request).expect("register failed");

    let (token, user) =
        AuthenticationService::login(&mut persistence, "ana@student.ub.ac.id", "rahasia123")
            .expect("login failed");
    assert!(!token.is_empty());
    assert_eq!(user.uid, registered.uid);
}

#[test]
fn test_login_wrong_password_localizes() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("ana@student.ub.ac.id");
    AuthenticationService::register(&mut persistence, &request).expect("register failed");

    let result = AuthenticationService::login(&mut persistence, "ana@student.ub.ac.id", "salah99");
    let Err(AuthError::AuthenticationFailed { reason }) = result else {
        panic!("Expected authentication failure");
    };
    assert_eq!(
        localized_auth_message(&reason),
        "Password salah. Silakan coba lagi."
    );
}

#[test]
fn test_login_unknown_email_localizes() {
    let mut persistence = setup_test_persistence();

    let result = AuthenticationService::login(&mut persistence, "ghost@student.ub.ac.id", "x");
    let Err(AuthError::AuthenticationFailed { reason }) = result else {
        panic!("Expected authentication failure");
    };
    assert_eq!(localized_auth_message(&reason), "Email tidak terdaftar.");
}

#[test]
fn test_logout_always_leaves_logged_out() {
    let mut persistence = setup_test_persistence();

    let request = create_register_request("ana@student.ub.ac.id");
    let (token, _user) =
        AuthenticationService::register(&mut persistence, &request).expect("register failed");

    AuthenticationService::logout(&mut persistence, &token);
    assert!(AuthenticationService::validate_session(&mut persistence, &token).is_err());

    // A second logout of the same (now missing) token is harmless.
    AuthenticationService::logout(&mut persistence, &token);
}

#[test]
fn test_unknown_token_is_rejected() {
    let mut persistence = setup_test_persistence();

    let result = AuthenticationService::validate_session(&mut persistence, "session_bogus");
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_role_classification_heuristic() {
    assert_eq!(Role::classify_email("ana@student.ub.ac.id"), Role::Student);
    assert_eq!(Role::classify_email("staff@admin.ub.ac.id"), Role::Admin);
    assert_eq!(Role::classify_email("admin@ub.ac.id"), Role::Admin);
    // The substring rule is deliberately broad; any "admin" anywhere
    // classifies as admin.
    assert_eq!(Role::classify_email("budiadmin@gmail.com"), Role::Admin);
}
