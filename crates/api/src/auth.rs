// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use konseling_domain::{
    AdminProfile, Booking, BookingStatus, Student, validate_registration_fields,
};
use konseling_persistence::{AccountData, Persistence, SessionData, parse_timestamp};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;

/// Institutional email domain whose addresses classify as admins.
pub const ADMIN_EMAIL_DOMAIN: &str = "@admin.ub.ac.id";

/// Roles for authorization.
///
/// Roles determine which operations an authenticated identity may
/// perform. Classification is derived from the email address and
/// re-checked server-side on every admin operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: reviews bookings, assigns counselors, resolves
    /// requests, and views aggregate statistics.
    Admin,
    /// Student role: submits and tracks own bookings.
    Student,
}

impl Role {
    /// Classifies an email address into a role.
    ///
    /// An identity is `Admin` if its email contains the substring
    /// `"admin"` or ends with the institutional admin domain; every
    /// other identity is `Student`.
    #[must_use]
    pub fn classify_email(email: &str) -> Self {
        if email.contains("admin") || email.ends_with(ADMIN_EMAIL_DOMAIN) {
            Self::Admin
        } else {
            Self::Student
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

/// An authenticated identity with its classified role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The opaque identity id.
    pub uid: String,
    /// The registered email address.
    pub email: String,
    /// The classified role.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates an authenticated identity, classifying the role from the
    /// email address.
    #[must_use]
    pub fn new(uid: String, email: String) -> Self {
        let role: Role = Role::classify_email(&email);
        Self { uid, email, role }
    }

    /// Returns true if the identity classified as admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// A registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    /// The email address to register.
    pub email: String,
    /// The password.
    pub password: String,
    /// Full name.
    pub name: String,
    /// Student number (NIM).
    pub nim: String,
    /// Study program / department.
    pub study_program: String,
    /// Contact phone number.
    pub phone_number: String,
}

/// Authorization service for enforcing role-based access control.
///
/// Admin-only operations are re-checked here on every call; the email
/// heuristic that classifies roles is routing convenience, these checks
/// are the authorization boundary.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor has the admin role.
    fn require_admin(actor: &AuthenticatedUser, action: &str) -> Result<(), AuthError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            })
        }
    }

    /// Checks if an actor is authorized to list every booking.
    ///
    /// Only Admin actors may view the full booking set.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_list_all_bookings(actor: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(actor, "list_all_bookings")
    }

    /// Checks if an actor is authorized to assign a counselor.
    ///
    /// Only Admin actors may assign counselors.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_assign_counselor(actor: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(actor, "assign_counselor")
    }

    /// Checks if an actor is authorized to view booking statistics.
    ///
    /// Only Admin actors may view aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_stats(actor: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(actor, "view_stats")
    }

    /// Checks if an actor is authorized to list registered students.
    ///
    /// Only Admin actors may list students.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_list_students(actor: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(actor, "list_students")
    }

    /// Checks if an actor is authorized to read an admin profile.
    ///
    /// Only Admin actors have one.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_admin_profile(actor: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(actor, "view_admin_profile")
    }

    /// Checks if an actor is authorized to apply a status transition.
    ///
    /// Admins may apply any transition the lifecycle permits. The owning
    /// student may only cancel their own booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has neither the Admin role nor the
    /// owner-cancellation right.
    pub fn authorize_update_status(
        actor: &AuthenticatedUser,
        booking: &Booking,
        new_status: BookingStatus,
    ) -> Result<(), AuthError> {
        if actor.is_admin() {
            return Ok(());
        }

        if actor.uid == booking.user_id && new_status == BookingStatus::Cancelled {
            return Ok(());
        }

        Err(AuthError::Unauthorized {
            action: String::from("update_booking_status"),
            required_role: String::from("Admin"),
        })
    }

    /// Checks if an actor is authorized to modify or delete a booking.
    ///
    /// Admins and the owning student may.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither an admin nor the owner.
    pub fn authorize_modify_booking(
        actor: &AuthenticatedUser,
        booking: &Booking,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.uid == booking.user_id {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("modify_booking"),
                required_role: String::from("Admin"),
            })
        }
    }
}

/// Authentication service for account and session management.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// How many times logout attempts the session delete before giving up.
    const LOGOUT_ATTEMPTS: u32 = 2;

    /// Registers a new account and signs it in.
    ///
    /// Creates the auth account, writes the student profile keyed by the
    /// new uid, writes an admin marker record when the email classifies
    /// as admin, and issues a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `request` - The registration fields
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`)
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the password is too short,
    /// the email is already registered, or a write fails.
    pub fn register(
        persistence: &mut Persistence,
        request: &RegisterRequest,
    ) -> Result<(String, AuthenticatedUser), ApiError> {
        validate_registration_fields(
            &request.email,
            &request.name,
            &request.nim,
            &request.study_program,
            &request.phone_number,
        )
        .map_err(translate_domain_error)?;

        PasswordPolicy::default().validate(&request.password)?;

        let password_hash: String = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to hash password: {e}"),
            })?;

        let uid: String = Uuid::new_v4().to_string();
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        persistence
            .create_account(&uid, &request.email, &password_hash, now)
            .map_err(translate_persistence_error)?;

        let student: Student = Student {
            uid: uid.clone(),
            name: request.name.clone(),
            nim: request.nim.clone(),
            study_program: request.study_program.clone(),
            phone_number: request.phone_number.clone(),
            email: request.email.clone(),
            photo_url: String::new(),
        };
        persistence
            .create_student(&student)
            .map_err(translate_persistence_error)?;

        let user: AuthenticatedUser = AuthenticatedUser::new(uid.clone(), request.email.clone());

        if user.is_admin() {
            let admin: AdminProfile = AdminProfile {
                uid: uid.clone(),
                name: request.name.clone(),
                email: request.email.clone(),
                role: String::from("admin"),
                created_at: now,
            };
            persistence
                .create_admin_profile(&admin)
                .map_err(translate_persistence_error)?;
        }

        let session_token: String = Self::open_session(persistence, &uid, now)?;

        info!(uid = %uid, role = user.role.as_str(), "Registered new account");

        Ok((session_token, user))
    }

    /// Authenticates an identity and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The password to verify
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`)
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, the password does not
    /// match, or session creation fails.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser), AuthError> {
        let account: AccountData = persistence
            .get_account_by_email(email)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("user not found: {email}"),
            })?;

        let password_matches: bool = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("password verification failed: {e}"),
            })?;

        if !password_matches {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("wrong password"),
            });
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let session_token: String = Self::open_session(persistence, &account.uid, now)?;

        Ok((
            session_token,
            AuthenticatedUser::new(account.uid, account.email),
        ))
    }

    /// Validates a session token and returns the authenticated identity.
    ///
    /// This is the server-side initialization check: callers get an
    /// explicit logged-out error rather than a guessed destination.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the
    /// backing account no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_db_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_uid(&session.account_uid)
            .map_err(Self::map_db_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id, OffsetDateTime::now_utc())
            .map_err(Self::map_db_error)?;

        Ok(AuthenticatedUser::new(account.uid, account.email))
    }

    /// Logs out by deleting the session.
    ///
    /// The delete is attempted twice before giving up, and the caller
    /// always ends up logged out: a stuck logged-in state is the worse
    /// failure mode, so failures are logged and swallowed.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to delete
    pub fn logout(persistence: &mut Persistence, session_token: &str) {
        for attempt in 1..=Self::LOGOUT_ATTEMPTS {
            match persistence.delete_session(session_token) {
                Ok(_) => return,
                Err(e) => {
                    warn!(attempt, error = %e, "Logout attempt failed");
                }
            }
        }
    }

    /// Issues a fresh session for an account.
    fn open_session(
        persistence: &mut Persistence,
        uid: &str,
        now: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now + Self::DEFAULT_SESSION_EXPIRATION;

        persistence
            .create_session(&session_token, uid, now, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        Ok(session_token)
    }

    /// Generates a session token.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    /// Maps persistence errors to authentication errors.
    fn map_db_error(err: konseling_persistence::PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
