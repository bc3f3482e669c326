// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User-facing message translation.
//!
//! Known backend error substrings map to localized text shown inline by
//! clients; anything unrecognized falls back to a generic failure
//! message. The table mirrors the login client's behavior.

/// Translates a raw authentication failure into localized user text.
///
/// Matching is best-effort on known substrings; unrecognized errors get
/// the generic fallback.
#[must_use]
pub fn localized_auth_message(raw: &str) -> &'static str {
    if raw.contains("password") {
        "Password salah. Silakan coba lagi."
    } else if raw.contains("user") {
        "Email tidak terdaftar."
    } else if raw.contains("network") {
        "Periksa koneksi internet Anda."
    } else if raw.contains("invalid-email") {
        "Format email tidak valid."
    } else if raw.contains("too-many-requests") {
        "Terlalu banyak percobaan. Coba lagi nanti."
    } else {
        "Login gagal. Periksa email dan password Anda."
    }
}
