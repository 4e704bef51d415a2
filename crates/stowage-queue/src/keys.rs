// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status-prefixed key layout for queue items.
//!
//! Items live at `{prefix}/{status}/{task_id}.json`, so listing a status is
//! listing a prefix, and every transition is an atomic `move_object` between
//! prefixes. The status segment of the key is the authoritative state tag:
//! a blob body observed mid-transition may briefly carry the previous
//! status field, and readers resolve that in favor of the key.

use stowage_core::{QueueStatus, TaskId};

/// Key of the item `task_id` while in `status`.
pub fn item_key(prefix: &str, status: QueueStatus, task_id: &TaskId) -> String {
    format!("{prefix}/{status}/{task_id}.json")
}

/// Listing prefix for all items in `status` (with trailing slash).
pub fn status_prefix(prefix: &str, status: QueueStatus) -> String {
    format!("{prefix}/{status}/")
}
