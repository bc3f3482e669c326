// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Counseling session slots.
//!
//! Sessions run in four fixed one-hour slots per day. The slot label is
//! what the client submits and what the `bookings` collection stores.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A fixed counseling session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSlot {
    /// 10.00 - 11.00
    #[serde(rename = "Sesi 1 (10.00 - 11.00)")]
    Sesi1,
    /// 11.00 - 12.00
    #[serde(rename = "Sesi 2 (11.00 - 12.00)")]
    Sesi2,
    /// 13.00 - 14.00
    #[serde(rename = "Sesi 3 (13.00 - 14.00)")]
    Sesi3,
    /// 14.00 - 15.00
    #[serde(rename = "Sesi 4 (14.00 - 15.00)")]
    Sesi4,
}

impl SessionSlot {
    /// Returns the slot label as stored and displayed.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sesi1 => "Sesi 1 (10.00 - 11.00)",
            Self::Sesi2 => "Sesi 2 (11.00 - 12.00)",
            Self::Sesi3 => "Sesi 3 (13.00 - 14.00)",
            Self::Sesi4 => "Sesi 4 (14.00 - 15.00)",
        }
    }

    /// Parses a slot from its label.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionSlot` if the label is not a
    /// defined slot.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "Sesi 1 (10.00 - 11.00)" => Ok(Self::Sesi1),
            "Sesi 2 (11.00 - 12.00)" => Ok(Self::Sesi2),
            "Sesi 3 (13.00 - 14.00)" => Ok(Self::Sesi3),
            "Sesi 4 (14.00 - 15.00)" => Ok(Self::Sesi4),
            _ => Err(DomainError::InvalidSessionSlot(s.to_string())),
        }
    }

    /// Returns all defined slots, in daily order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Sesi1, Self::Sesi2, Self::Sesi3, Self::Sesi4]
    }
}

impl FromStr for SessionSlot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for SessionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_label_round_trip() {
        for slot in SessionSlot::all() {
            let label = slot.as_str();
            match SessionSlot::parse_str(label) {
                Ok(parsed) => assert_eq!(slot, parsed),
                Err(e) => panic!("Failed to parse slot label: {label}: {e}"),
            }
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(SessionSlot::parse_str("Sesi 5 (15.00 - 16.00)").is_err());
        assert!(SessionSlot::parse_str("").is_err());
    }
}
