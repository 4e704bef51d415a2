// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue item wire types.
//!
//! The persisted shape uses camelCase field names so blobs written by this
//! core match what remote workers and dashboards already consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stowage_core::{QueueStatus, StowageError, TaskId};

/// Priority bounds: 1 is highest, 5 is lowest.
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// A persisted unit of work tracked through the status lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub task_id: TaskId,
    pub function_name: String,
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_name: Option<String>,
    /// Opaque, already-built composite vault payload. This core never
    /// inspects it.
    pub vault_content: String,
    pub priority: u8,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub retry_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

/// Caller-supplied fields for a new queue item.
#[derive(Debug, Clone)]
pub struct NewQueueItem {
    pub function_name: String,
    pub team_name: String,
    pub machine_name: Option<String>,
    pub bridge_name: Option<String>,
    pub vault_content: String,
    pub priority: u8,
}

impl NewQueueItem {
    /// Reject invalid input before any state is touched.
    pub fn validate(&self) -> Result<(), StowageError> {
        if self.function_name.trim().is_empty() {
            return Err(StowageError::Validation(
                "functionName must not be empty".to_string(),
            ));
        }
        if self.team_name.trim().is_empty() {
            return Err(StowageError::Validation(
                "teamName must not be empty".to_string(),
            ));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(StowageError::Validation(format!(
                "priority must be in {MIN_PRIORITY}..={MAX_PRIORITY}, got {}",
                self.priority
            )));
        }
        Ok(())
    }
}

/// Worker-reported outcome for an ACTIVE item.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    /// 0 completes the item; anything else fails it.
    pub exit_code: i32,
    pub error_message: Option<String>,
}

/// Filter for [`list`](crate::QueueService::list).
#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    pub status: Option<QueueStatus>,
    pub team_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(priority: u8) -> NewQueueItem {
        NewQueueItem {
            function_name: "deploy".to_string(),
            team_name: "core".to_string(),
            machine_name: None,
            bridge_name: None,
            vault_content: "{}".to_string(),
            priority,
        }
    }

    #[test]
    fn priority_bounds_are_enforced() {
        assert!(new_item(0).validate().is_err());
        assert!(new_item(1).validate().is_ok());
        assert!(new_item(5).validate().is_ok());
        assert!(new_item(6).validate().is_err());
    }

    #[test]
    fn empty_required_fields_are_rejected() {
        let mut item = new_item(3);
        item.function_name = "  ".to_string();
        assert!(item.validate().is_err());

        let mut item = new_item(3);
        item.team_name = String::new();
        assert!(item.validate().is_err());
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let item = QueueItem {
            task_id: TaskId::from("t-1"),
            function_name: "deploy".to_string(),
            team_name: "core".to_string(),
            machine_name: Some("kvm1".to_string()),
            bridge_name: None,
            vault_content: "{}".to_string(),
            priority: 3,
            status: QueueStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            exit_code: None,
            error_message: None,
            retry_count: 0,
            progress: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["taskId"], "t-1");
        assert_eq!(json["functionName"], "deploy");
        assert_eq!(json["machineName"], "kvm1");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["retryCount"], 0);
        // Absent optionals are omitted, not null.
        assert!(json.get("bridgeName").is_none());
        assert!(json.get("startedAt").is_none());
    }
}
