// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Stowage crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a queue item (opaque to callers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle status of a queue item.
///
/// Transitions: PENDING -> ACTIVE (claim), ACTIVE -> COMPLETED (exit code 0),
/// ACTIVE -> FAILED (nonzero exit code or worker error), PENDING -> CANCELLED
/// (cancel), FAILED -> PENDING (retry). COMPLETED and CANCELLED are terminal.
///
/// The wire form is SCREAMING_SNAKE_CASE (`PENDING`, `ACTIVE`, ...), matching
/// the persisted queue item shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Pending,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl QueueStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// All statuses, in the order used for cross-status probes and listing.
    pub const ALL: [QueueStatus; 5] = [
        Self::Pending,
        Self::Active,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in QueueStatus::ALL {
            let s = status.to_string();
            assert_eq!(s, s.to_uppercase());
            assert_eq!(QueueStatus::from_str(&s).unwrap(), status);
        }
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&QueueStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let back: QueueStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(back, QueueStatus::Cancelled);
    }

    #[test]
    fn terminal_statuses() {
        assert!(QueueStatus::Completed.is_terminal());
        assert!(QueueStatus::Cancelled.is_terminal());
        assert!(!QueueStatus::Pending.is_terminal());
        assert!(!QueueStatus::Active.is_terminal());
        assert!(!QueueStatus::Failed.is_terminal());
    }
}
