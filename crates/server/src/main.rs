// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use konseling_api::{
    ApiError, AuthError, AuthenticationService, CreateBookingRequest, RegisterRequest,
    UpdateBookingRequest, localized_auth_message,
};
use konseling_domain::{AdminProfile, Booking, BookingStats, Student};
use konseling_persistence::{Persistence, format_timestamp};
use konseling_storage::{AttachmentFile, LocalObjectStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tokio::sync::Mutex;
use tracing::{error, info};

mod session;

use session::SessionUser;

/// Upload size ceiling: the 5 MB attachment cap plus form overhead.
const MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

/// Booking Konseling Server - HTTP server for the counseling booking system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory attachment objects are stored under
    #[arg(long, default_value = "storage")]
    storage_root: String,

    /// Public base URL attachment objects resolve beneath
    #[arg(long, default_value = "http://localhost:3000/files")]
    public_base_url: String,
}

/// Application state shared across handlers.
///
/// The persistence layer and object store are constructed once by the
/// composition root and injected here; handlers never reach for ambient
/// globals.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for all collections.
    persistence: Arc<Mutex<Persistence>>,
    /// The attachment object store.
    store: Arc<LocalObjectStore>,
}

/// API request for registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterApiRequest {
    /// The email address to register.
    email: String,
    /// The password.
    password: String,
    /// Full name.
    nama: String,
    /// Student number.
    nim: String,
    /// Study program.
    prodi: String,
    /// Contact phone number.
    nomor_hp: String,
}

/// API request for login.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoginApiRequest {
    /// The account email.
    email: String,
    /// The password.
    password: String,
}

/// API response for a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthApiResponse {
    /// The session token for subsequent requests.
    token: String,
    /// The identity's uid.
    uid: String,
    /// The identity's email.
    email: String,
    /// The classified role (`admin` or `student`).
    role: String,
}

/// API response for the current-identity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MeApiResponse {
    /// The identity's uid.
    uid: String,
    /// The identity's email.
    email: String,
    /// The classified role (`admin` or `student`).
    role: String,
}

/// Generic write acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// API response for a successful booking submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateBookingApiResponse {
    /// Success indicator.
    success: bool,
    /// The freshly assigned booking id.
    booking_id: String,
    /// The stored attachment URL; empty when no attachment was sent.
    ktm_url: String,
}

/// A booking as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingApiResponse {
    /// The booking id.
    id: String,
    /// The owning student's uid.
    user_id: String,
    /// Student name.
    nama: String,
    /// Student number.
    nim: String,
    /// Study program.
    prodi: String,
    /// Contact phone number.
    nomor_hp: String,
    /// Session date (ISO 8601).
    tanggal: String,
    /// Session slot label.
    sesi: String,
    /// Assigned counselor; empty until assigned.
    konselor: String,
    /// Lifecycle status.
    status: String,
    /// Attachment URL; empty when absent.
    ktm_url: String,
    /// Creation timestamp (ISO 8601).
    created_at: String,
}

/// API response for booking lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListBookingsApiResponse {
    /// The bookings, most recent first.
    bookings: Vec<BookingApiResponse>,
}

/// API response for the admin dashboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsApiResponse {
    /// Count of all bookings.
    total_bookings: usize,
    /// Bookings with status `Pending`.
    pending_bookings: usize,
    /// Bookings with status `Ongoing`.
    ongoing_bookings: usize,
    /// Bookings with status `Completed`.
    completed_bookings: usize,
    /// Bookings with status `Cancelled`.
    cancelled_bookings: usize,
    /// Bookings created today.
    today_bookings: usize,
    /// Bookings created this week.
    this_week_bookings: usize,
    /// Bookings created this month.
    this_month_bookings: usize,
}

/// A student profile as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StudentApiResponse {
    /// The student's uid.
    uid: String,
    /// Full name.
    nama: String,
    /// Student number.
    nim: String,
    /// Study program.
    prodi: String,
    /// Contact phone number.
    nomor_hp: String,
    /// Registered email.
    email: String,
    /// Profile photo URL; empty when unset.
    photo_url: String,
}

/// API response for the admin student listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListStudentsApiResponse {
    /// All registered students.
    students: Vec<StudentApiResponse>,
}

/// An admin role-marker record as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdminProfileApiResponse {
    /// The admin's uid.
    uid: String,
    /// Display name.
    nama: String,
    /// Registered email.
    email: String,
    /// Role tag.
    role: String,
    /// Creation timestamp (ISO 8601).
    created_at: String,
}

/// API request for a status update.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateStatusApiRequest {
    /// The target status value.
    status: String,
}

/// API request for a counselor assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AssignKonselorApiRequest {
    /// The counselor name.
    konselor: String,
}

/// Query parameters for the admin booking list.
#[derive(Debug, Deserialize)]
struct StatusFilterQuery {
    /// Exact status value, or `All`/absent for everything.
    status: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { reason } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: localized_auth_message(&reason).to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { message, .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message,
            },
            ApiError::InvalidInput { message, .. }
            | ApiError::PasswordPolicyViolation { message } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { message } => {
                error!(message = %message, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                }
            }
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        HttpError::from(ApiError::from(err))
    }
}

/// Converts a `Booking` to its response form.
fn booking_to_response(booking: &Booking) -> Result<BookingApiResponse, HttpError> {
    Ok(BookingApiResponse {
        id: booking.id.clone(),
        user_id: booking.user_id.clone(),
        nama: booking.student_name.clone(),
        nim: booking.nim.clone(),
        prodi: booking.study_program.clone(),
        nomor_hp: booking.phone_number.clone(),
        tanggal: format_http_timestamp(booking.session_date)?,
        sesi: booking.session_slot.as_str().to_string(),
        konselor: booking.counselor.clone(),
        status: booking.status.as_str().to_string(),
        ktm_url: booking.ktm_url.clone(),
        created_at: format_http_timestamp(booking.created_at)?,
    })
}

/// Converts a `Student` to its response form.
fn student_to_response(student: &Student) -> StudentApiResponse {
    StudentApiResponse {
        uid: student.uid.clone(),
        nama: student.name.clone(),
        nim: student.nim.clone(),
        prodi: student.study_program.clone(),
        nomor_hp: student.phone_number.clone(),
        email: student.email.clone(),
        photo_url: student.photo_url.clone(),
    }
}

/// Converts an `AdminProfile` to its response form.
fn admin_to_response(admin: &AdminProfile) -> Result<AdminProfileApiResponse, HttpError> {
    Ok(AdminProfileApiResponse {
        uid: admin.uid.clone(),
        nama: admin.name.clone(),
        email: admin.email.clone(),
        role: admin.role.clone(),
        created_at: format_http_timestamp(admin.created_at)?,
    })
}

/// Converts `BookingStats` to the response form.
const fn stats_to_response(stats: BookingStats) -> StatsApiResponse {
    StatsApiResponse {
        total_bookings: stats.total,
        pending_bookings: stats.pending,
        ongoing_bookings: stats.ongoing,
        completed_bookings: stats.completed,
        cancelled_bookings: stats.cancelled,
        today_bookings: stats.today,
        this_week_bookings: stats.this_week,
        this_month_bookings: stats.this_month,
    }
}

/// Formats a timestamp for a response body.
fn format_http_timestamp(timestamp: OffsetDateTime) -> Result<String, HttpError> {
    format_timestamp(timestamp).map_err(|e| {
        error!(error = %e, "Failed to format timestamp");
        HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Failed to format timestamp"),
        }
    })
}

/// Converts a list of bookings to the response form.
fn bookings_to_response(bookings: &[Booking]) -> Result<ListBookingsApiResponse, HttpError> {
    let converted: Result<Vec<BookingApiResponse>, HttpError> =
        bookings.iter().map(booking_to_response).collect();
    Ok(ListBookingsApiResponse {
        bookings: converted?,
    })
}

/// Handler for POST `/auth/register`.
///
/// Registers a new account and signs it in.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterApiRequest>,
) -> Result<Json<AuthApiResponse>, HttpError> {
    info!(email = %req.email, "Handling register request");

    let request: RegisterRequest = RegisterRequest {
        email: req.email,
        password: req.password,
        name: req.nama,
        nim: req.nim,
        study_program: req.prodi,
        phone_number: req.nomor_hp,
    };

    let mut persistence = app_state.persistence.lock().await;
    let (token, user) = AuthenticationService::register(&mut persistence, &request)?;
    drop(persistence);

    Ok(Json(AuthApiResponse {
        token,
        uid: user.uid,
        email: user.email,
        role: user.role.as_str().to_string(),
    }))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginApiRequest>,
) -> Result<Json<AuthApiResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let (token, user) = AuthenticationService::login(&mut persistence, &req.email, &req.password)?;
    drop(persistence);

    Ok(Json(AuthApiResponse {
        token,
        uid: user.uid,
        email: user.email,
        role: user.role.as_str().to_string(),
    }))
}

/// Handler for POST `/auth/logout`.
///
/// Always reports success: the session is gone from the caller's point
/// of view even if the backing delete failed (it was retried and logged).
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, token): SessionUser,
) -> Json<WriteResponse> {
    info!(uid = %user.uid, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, &token);
    drop(persistence);

    Json(WriteResponse {
        success: true,
        message: Some(String::from("Logged out")),
    })
}

/// Handler for GET `/auth/me`.
///
/// The current-identity check clients run at startup.
async fn handle_me(SessionUser(user, _token): SessionUser) -> Json<MeApiResponse> {
    Json(MeApiResponse {
        uid: user.uid,
        email: user.email,
        role: user.role.as_str().to_string(),
    })
}

/// Handler for GET `/profile`.
async fn handle_get_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<StudentApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let student: Student = konseling_api::get_student_profile(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(student_to_response(&student)))
}

/// Collected multipart fields of a booking submission.
#[derive(Debug, Default)]
struct BookingFormFields {
    nama: Option<String>,
    nim: Option<String>,
    prodi: Option<String>,
    nomor_hp: Option<String>,
    tanggal: Option<String>,
    sesi: Option<String>,
    attachment: Option<AttachmentFile>,
}

/// Reads a multipart booking submission.
async fn read_booking_form(mut multipart: Multipart) -> Result<BookingFormFields, HttpError> {
    let mut form: BookingFormFields = BookingFormFields::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Malformed multipart body: {e}"),
    })? {
        let name: String = field.name().unwrap_or_default().to_string();

        if name == "ktm" {
            let file_name: Option<String> = field.file_name().map(ToString::to_string);
            let content_type: Option<String> = field.content_type().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|e| HttpError {
                status: StatusCode::BAD_REQUEST,
                message: format!("Failed to read file part: {e}"),
            })?;
            form.attachment = Some(AttachmentFile::new(file_name, content_type, bytes.to_vec()));
            continue;
        }

        let value: String = field.text().await.map_err(|e| HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Failed to read field '{name}': {e}"),
        })?;

        match name.as_str() {
            "nama" => form.nama = Some(value),
            "nim" => form.nim = Some(value),
            "prodi" => form.prodi = Some(value),
            "nomor_hp" => form.nomor_hp = Some(value),
            "tanggal" => form.tanggal = Some(value),
            "sesi" => form.sesi = Some(value),
            _ => {
                // Unknown fields are ignored, matching lenient form clients.
            }
        }
    }

    Ok(form)
}

/// Pulls a required field out of the form.
fn require_field(value: Option<String>, name: &str) -> Result<String, HttpError> {
    value.ok_or_else(|| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Missing required field '{name}'"),
    })
}

/// Parses the session date field.
fn parse_session_date(raw: &str) -> Result<OffsetDateTime, HttpError> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid 'tanggal' value '{raw}': {e}"),
    })
}

/// Handler for POST `/bookings` (multipart).
///
/// Accepts the booking fields plus an optional `ktm` file part. The
/// attachment is validated and uploaded before the record is written;
/// on attachment failure no record is created.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    multipart: Multipart,
) -> Result<Json<CreateBookingApiResponse>, HttpError> {
    let form: BookingFormFields = read_booking_form(multipart).await?;

    let tanggal: String = require_field(form.tanggal, "tanggal")?;
    let request: CreateBookingRequest = CreateBookingRequest {
        student_name: require_field(form.nama, "nama")?,
        nim: require_field(form.nim, "nim")?,
        study_program: require_field(form.prodi, "prodi")?,
        phone_number: require_field(form.nomor_hp, "nomor_hp")?,
        session_date: parse_session_date(&tanggal)?,
        session_slot: require_field(form.sesi, "sesi")?,
    };

    info!(uid = %user.uid, has_attachment = form.attachment.is_some(), "Handling create_booking request");

    let mut persistence = app_state.persistence.lock().await;
    let response = konseling_api::create_booking(
        &mut persistence,
        app_state.store.as_ref(),
        &user,
        &request,
        form.attachment.as_ref(),
    )?;
    drop(persistence);

    Ok(Json(CreateBookingApiResponse {
        success: true,
        booking_id: response.booking_id,
        ktm_url: response.ktm_url,
    }))
}

/// Handler for PUT `/bookings/{id}` (multipart).
///
/// Edits a booking's student-supplied fields; a fresh `ktm` file part
/// replaces the stored attachment.
async fn handle_update_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    SessionUser(user, _token): SessionUser,
    multipart: Multipart,
) -> Result<Json<WriteResponse>, HttpError> {
    let form: BookingFormFields = read_booking_form(multipart).await?;

    let tanggal: String = require_field(form.tanggal, "tanggal")?;
    let request: UpdateBookingRequest = UpdateBookingRequest {
        booking_id: booking_id.clone(),
        student_name: require_field(form.nama, "nama")?,
        nim: require_field(form.nim, "nim")?,
        study_program: require_field(form.prodi, "prodi")?,
        phone_number: require_field(form.nomor_hp, "nomor_hp")?,
        session_date: parse_session_date(&tanggal)?,
        session_slot: require_field(form.sesi, "sesi")?,
    };

    info!(booking_id = %booking_id, "Handling update_booking request");

    let mut persistence = app_state.persistence.lock().await;
    konseling_api::update_booking(
        &mut persistence,
        app_state.store.as_ref(),
        &user,
        &request,
        form.attachment.as_ref(),
    )?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Updated booking {booking_id}")),
    }))
}

/// Handler for GET `/bookings`.
///
/// Lists the caller's own bookings, most recent first.
async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListBookingsApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bookings: Vec<Booking> = konseling_api::list_user_bookings(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(bookings_to_response(&bookings)?))
}

/// Handler for POST `/bookings/{id}/cancel`.
///
/// Owner (or admin) cancellation.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id = %booking_id, uid = %user.uid, "Handling cancel_booking request");

    let mut persistence = app_state.persistence.lock().await;
    konseling_api::update_booking_status(&mut persistence, &user, &booking_id, "Cancelled")?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Cancelled booking {booking_id}")),
    }))
}

/// Handler for GET `/admin/bookings`.
///
/// Admin booking review list, optionally filtered by exact status.
async fn handle_admin_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<StatusFilterQuery>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListBookingsApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bookings: Vec<Booking> =
        konseling_api::list_all_bookings(&mut persistence, &user, query.status.as_deref())?;
    drop(persistence);

    Ok(Json(bookings_to_response(&bookings)?))
}

/// Handler for POST `/admin/bookings/{id}/status`.
async fn handle_admin_update_status(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<UpdateStatusApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id = %booking_id, status = %req.status, "Handling update_status request");

    let mut persistence = app_state.persistence.lock().await;
    konseling_api::update_booking_status(&mut persistence, &user, &booking_id, &req.status)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Updated booking {booking_id} to {}", req.status)),
    }))
}

/// Handler for POST `/admin/bookings/{id}/assign`.
async fn handle_admin_assign(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<AssignKonselorApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id = %booking_id, konselor = %req.konselor, "Handling assign request");

    let mut persistence = app_state.persistence.lock().await;
    konseling_api::assign_counselor(&mut persistence, &user, &booking_id, &req.konselor)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Assigned {} to booking {booking_id}", req.konselor)),
    }))
}

/// Handler for DELETE `/admin/bookings/{id}`.
async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(booking_id = %booking_id, "Handling delete_booking request");

    let mut persistence = app_state.persistence.lock().await;
    konseling_api::delete_booking(
        &mut persistence,
        app_state.store.as_ref(),
        &user,
        &booking_id,
    )?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted booking {booking_id}")),
    }))
}

/// Handler for GET `/admin/stats`.
async fn handle_admin_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<StatsApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let stats: BookingStats = konseling_api::booking_stats(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(stats_to_response(stats)))
}

/// Handler for GET `/admin/students`.
async fn handle_admin_students(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListStudentsApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let students: Vec<Student> = konseling_api::list_students(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(ListStudentsApiResponse {
        students: students.iter().map(student_to_response).collect(),
    }))
}

/// Handler for GET `/admin/profile`.
async fn handle_admin_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<AdminProfileApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let admin: AdminProfile = konseling_api::get_admin_profile(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(admin_to_response(&admin)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_me))
        .route("/profile", get(handle_get_profile))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings", get(handle_list_my_bookings))
        .route("/bookings/{id}", put(handle_update_booking))
        .route("/bookings/{id}/cancel", post(handle_cancel_booking))
        .route("/admin/bookings", get(handle_admin_list_bookings))
        .route("/admin/bookings/{id}/status", post(handle_admin_update_status))
        .route("/admin/bookings/{id}/assign", post(handle_admin_assign))
        .route("/admin/bookings/{id}", delete(handle_delete_booking))
        .route("/admin/stats", get(handle_admin_stats))
        .route("/admin/students", get(handle_admin_students))
        .route("/admin/profile", get(handle_admin_profile))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Booking Konseling Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Initialize the attachment store
    let store: LocalObjectStore =
        LocalObjectStore::new(&args.storage_root, &args.public_base_url)?;
    info!("Storing attachments under {}", args.storage_root);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        store: Arc::new(store),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use std::path::PathBuf;
    use tower::ServiceExt;
    use uuid::Uuid;

    const BOUNDARY: &str = "X-KONSELING-BOUNDARY";

    /// Helper to create test app state with in-memory persistence and a
    /// temp-dir object store.
    fn create_test_app() -> (Router, PathBuf) {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let root: PathBuf =
            std::env::temp_dir().join(format!("konseling-server-test-{}", Uuid::new_v4()));
        let store: LocalObjectStore = LocalObjectStore::new(&root, "http://localhost:3000/files")
            .expect("Failed to create test store");

        let app_state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            store: Arc::new(store),
        };
        (build_router(app_state), root)
    }

    /// Sends a JSON request, optionally with a Bearer token.
    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request")
        } else {
            builder.body(Body::empty()).expect("Failed to build request")
        };

        app.clone().oneshot(request).await.expect("Request failed")
    }

    /// Builds a multipart booking submission body.
    fn multipart_booking_body(file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in [
            ("nama", "Ana"),
            ("nim", "12345678901"),
            ("prodi", "Ilmu Komputer"),
            ("nomor_hp", "081234567890"),
            ("tanggal", "2026-03-02T10:00:00Z"),
            ("sesi", "Sesi 1 (10.00 - 11.00)"),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ktm\"; filename=\"ktm.png\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Posts a multipart booking submission.
    async fn post_booking(
        app: &Router,
        token: &str,
        file: Option<(&str, &[u8])>,
    ) -> axum::response::Response {
        let request = Request::builder()
            .method("POST")
            .uri("/bookings")
            .header("Authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_booking_body(file)))
            .expect("Failed to build request");

        app.clone().oneshot(request).await.expect("Request failed")
    }

    /// Registers an account and returns its session token.
    async fn register(app: &Router, email: &str) -> String {
        let response = send_json(
            app,
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": "rahasia123",
                "nama": "Ana",
                "nim": "12345678901",
                "prodi": "Ilmu Komputer",
                "nomor_hp": "081234567890",
            })),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: AuthApiResponse = read_json(response).await;
        body.token
    }

    /// Reads a JSON response body.
    async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Failed to parse body")
    }

    #[tokio::test]
    async fn test_register_me_and_logout_flow() {
        let (app, root) = create_test_app();

        let token = register(&app, "ana@student.ub.ac.id").await;

        let me = send_json(&app, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(me.status(), HttpStatusCode::OK);
        let me_body: MeApiResponse = read_json(me).await;
        assert_eq!(me_body.role, "student");
        assert_eq!(me_body.email, "ana@student.ub.ac.id");

        let logout = send_json(&app, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(logout.status(), HttpStatusCode::OK);

        // The token no longer validates.
        let me_after = send_json(&app, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(me_after.status(), HttpStatusCode::UNAUTHORIZED);

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let (app, root) = create_test_app();

        let no_header = send_json(&app, "GET", "/auth/me", None, None).await;
        assert_eq!(no_header.status(), HttpStatusCode::UNAUTHORIZED);

        let bad_token = send_json(&app, "GET", "/auth/me", Some("session_bogus"), None).await;
        assert_eq!(bad_token.status(), HttpStatusCode::UNAUTHORIZED);

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_localized() {
        let (app, root) = create_test_app();

        register(&app, "ana@student.ub.ac.id").await;

        let response = send_json(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({
                "email": "ana@student.ub.ac.id",
                "password": "salah99",
            })),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.message, "Password salah. Silakan coba lagi.");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_create_and_list_booking_without_attachment() {
        let (app, root) = create_test_app();
        let token = register(&app, "ana@student.ub.ac.id").await;

        let created = post_booking(&app, &token, None).await;
        assert_eq!(created.status(), HttpStatusCode::OK);
        let created_body: CreateBookingApiResponse = read_json(created).await;
        assert!(created_body.success);
        assert!(!created_body.booking_id.is_empty());
        assert_eq!(created_body.ktm_url, "");

        let listed = send_json(&app, "GET", "/bookings", Some(&token), None).await;
        assert_eq!(listed.status(), HttpStatusCode::OK);
        let listed_body: ListBookingsApiResponse = read_json(listed).await;
        assert_eq!(listed_body.bookings.len(), 1);
        assert_eq!(listed_body.bookings[0].status, "Pending");
        assert_eq!(listed_body.bookings[0].sesi, "Sesi 1 (10.00 - 11.00)");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_create_booking_with_attachment_stores_url() {
        let (app, root) = create_test_app();
        let token = register(&app, "ana@student.ub.ac.id").await;

        let created = post_booking(&app, &token, Some(("image/png", &[1_u8, 2, 3, 4]))).await;
        assert_eq!(created.status(), HttpStatusCode::OK);
        let body: CreateBookingApiResponse = read_json(created).await;
        assert!(body.ktm_url.starts_with("http://localhost:3000/files/ktm/"));

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_create_booking_rejects_wrong_file_type() {
        let (app, root) = create_test_app();
        let token = register(&app, "ana@student.ub.ac.id").await;

        let created =
            post_booking(&app, &token, Some(("application/pdf", &[1_u8, 2, 3, 4]))).await;
        assert_eq!(created.status(), HttpStatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(created).await;
        assert_eq!(
            body.message,
            "Format file tidak didukung. Gunakan JPG, PNG, atau GIF."
        );

        // Fail closed: nothing was recorded.
        let listed = send_json(&app, "GET", "/bookings", Some(&token), None).await;
        let listed_body: ListBookingsApiResponse = read_json(listed).await;
        assert!(listed_body.bookings.is_empty());

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_admin_review_flow() {
        let (app, root) = create_test_app();
        let student_token = register(&app, "ana@student.ub.ac.id").await;
        let admin_token = register(&app, "admin@admin.ub.ac.id").await;

        let created = post_booking(&app, &student_token, None).await;
        let created_body: CreateBookingApiResponse = read_json(created).await;
        let booking_id = created_body.booking_id;

        // Students may not see the review list.
        let forbidden =
            send_json(&app, "GET", "/admin/bookings", Some(&student_token), None).await;
        assert_eq!(forbidden.status(), HttpStatusCode::FORBIDDEN);

        // The admin sees the pending booking.
        let pending = send_json(
            &app,
            "GET",
            "/admin/bookings?status=Pending",
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(pending.status(), HttpStatusCode::OK);
        let pending_body: ListBookingsApiResponse = read_json(pending).await;
        assert_eq!(pending_body.bookings.len(), 1);

        // Assign a counselor; the booking moves to Ongoing.
        let assigned = send_json(
            &app,
            "POST",
            &format!("/admin/bookings/{booking_id}/assign"),
            Some(&admin_token),
            Some(serde_json::json!({ "konselor": "Dr. X" })),
        )
        .await;
        assert_eq!(assigned.status(), HttpStatusCode::OK);

        let ongoing = send_json(
            &app,
            "GET",
            "/admin/bookings?status=Ongoing",
            Some(&admin_token),
            None,
        )
        .await;
        let ongoing_body: ListBookingsApiResponse = read_json(ongoing).await;
        assert_eq!(ongoing_body.bookings.len(), 1);
        assert_eq!(ongoing_body.bookings[0].konselor, "Dr. X");

        // Finish the session.
        let completed = send_json(
            &app,
            "POST",
            &format!("/admin/bookings/{booking_id}/status"),
            Some(&admin_token),
            Some(serde_json::json!({ "status": "Completed" })),
        )
        .await;
        assert_eq!(completed.status(), HttpStatusCode::OK);

        // A second assignment on the completed booking is rejected.
        let reassigned = send_json(
            &app,
            "POST",
            &format!("/admin/bookings/{booking_id}/assign"),
            Some(&admin_token),
            Some(serde_json::json!({ "konselor": "Dr. Y" })),
        )
        .await;
        assert_eq!(reassigned.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        // Stats reflect the one completed booking.
        let stats = send_json(&app, "GET", "/admin/stats", Some(&admin_token), None).await;
        assert_eq!(stats.status(), HttpStatusCode::OK);
        let stats_body: StatsApiResponse = read_json(stats).await;
        assert_eq!(stats_body.total_bookings, 1);
        assert_eq!(stats_body.completed_bookings, 1);
        assert_eq!(stats_body.today_bookings, 1);

        // The admin profile marker was written at registration.
        let profile = send_json(&app, "GET", "/admin/profile", Some(&admin_token), None).await;
        assert_eq!(profile.status(), HttpStatusCode::OK);
        let profile_body: AdminProfileApiResponse = read_json(profile).await;
        assert_eq!(profile_body.role, "admin");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_student_cancel_own_booking() {
        let (app, root) = create_test_app();
        let token = register(&app, "ana@student.ub.ac.id").await;

        let created = post_booking(&app, &token, None).await;
        let created_body: CreateBookingApiResponse = read_json(created).await;

        let cancelled = send_json(
            &app,
            "POST",
            &format!("/bookings/{}/cancel", created_body.booking_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(cancelled.status(), HttpStatusCode::OK);

        let listed = send_json(&app, "GET", "/bookings", Some(&token), None).await;
        let listed_body: ListBookingsApiResponse = read_json(listed).await;
        assert_eq!(listed_body.bookings[0].status, "Cancelled");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_update_booking_route_edits_fields() {
        let (app, root) = create_test_app();
        let token = register(&app, "ana@student.ub.ac.id").await;

        let created = post_booking(&app, &token, None).await;
        let created_body: CreateBookingApiResponse = read_json(created).await;

        let mut body: Vec<u8> = Vec::new();
        for (name, value) in [
            ("nama", "Ana Putri"),
            ("nim", "12345678901"),
            ("prodi", "Ilmu Komputer"),
            ("nomor_hp", "089999999999"),
            ("tanggal", "2026-03-02T10:00:00Z"),
            ("sesi", "Sesi 2 (11.00 - 12.00)"),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/bookings/{}", created_body.booking_id))
            .header("Authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        let updated = app.clone().oneshot(request).await.expect("Request failed");
        assert_eq!(updated.status(), HttpStatusCode::OK);

        let listed = send_json(&app, "GET", "/bookings", Some(&token), None).await;
        let listed_body: ListBookingsApiResponse = read_json(listed).await;
        assert_eq!(listed_body.bookings[0].nama, "Ana Putri");
        assert_eq!(listed_body.bookings[0].sesi, "Sesi 2 (11.00 - 12.00)");
        assert_eq!(listed_body.bookings[0].status, "Pending");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_admin_students_listing() {
        let (app, root) = create_test_app();
        register(&app, "ana@student.ub.ac.id").await;
        let admin_token = register(&app, "admin@admin.ub.ac.id").await;

        let students = send_json(&app, "GET", "/admin/students", Some(&admin_token), None).await;
        assert_eq!(students.status(), HttpStatusCode::OK);
        let body: ListStudentsApiResponse = read_json(students).await;
        // Both registrations wrote profiles; the admin registered too.
        assert_eq!(body.students.len(), 2);

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let (app, root) = create_test_app();
        let admin_token = register(&app, "admin@admin.ub.ac.id").await;

        let response = send_json(
            &app,
            "POST",
            "/admin/bookings/ghost/status",
            Some(&admin_token),
            Some(serde_json::json!({ "status": "Cancelled" })),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);

        std::fs::remove_dir_all(root).ok();
    }
}
