// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job lifecycle state machine over status-prefixed object keys.
//!
//! Transition graph:
//!
//! ```text
//! PENDING --claim--> ACTIVE --complete(0)--> COMPLETED (terminal)
//!    |                  \--complete(!0)----> FAILED --retry--> PENDING
//!    \--cancel--> CANCELLED (terminal)
//! ```
//!
//! Every transition is an atomic `move_object` between status prefixes, so
//! claim() exclusivity holds without any read-then-write races: of N
//! concurrent claimers, the store lets exactly one move succeed, and the
//! losers are classified against the item's observed location. State
//! violations always fail loudly so a caller can tell "already handled by
//! someone else" from a programmer error.
//!
//! This service never retries internally, enforces no timeouts, and does not
//! monitor stuck ACTIVE items; cancellation is non-cooperative and only
//! reaches PENDING work.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use stowage_config::QueueConfig;
use stowage_core::{ObjectStore, ObjectStoreExt, QueueStatus, StowageError, TaskId};

use crate::item::{CompletionReport, NewQueueItem, QueueFilter, QueueItem};
use crate::keys;

/// Durable work queue with exclusive claim semantics.
pub struct QueueService {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl QueueService {
    pub fn new(store: Arc<dyn ObjectStore>, config: QueueConfig) -> Self {
        Self {
            store,
            prefix: config.key_prefix,
        }
    }

    /// Persist a new PENDING item and return its id.
    ///
    /// `vault_content` is accepted as an opaque, already-built string.
    pub async fn create(&self, spec: NewQueueItem) -> Result<TaskId, StowageError> {
        spec.validate()?;

        let task_id = TaskId(Uuid::new_v4().to_string());
        let item = QueueItem {
            task_id: task_id.clone(),
            function_name: spec.function_name,
            team_name: spec.team_name,
            machine_name: spec.machine_name,
            bridge_name: spec.bridge_name,
            vault_content: spec.vault_content,
            priority: spec.priority,
            status: QueueStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            exit_code: None,
            error_message: None,
            retry_count: 0,
            progress: None,
        };

        let key = keys::item_key(&self.prefix, QueueStatus::Pending, &task_id);
        self.store.put_json(&key, &item).await?;
        info!(task_id = %task_id, function = %item.function_name, priority = item.priority, "queue item created");
        Ok(task_id)
    }

    /// Exclusively take ownership of a PENDING item (PENDING -> ACTIVE).
    ///
    /// Of any number of concurrent claimers, exactly one succeeds; the rest
    /// observe [`StowageError::InvalidState`].
    pub async fn claim(&self, task_id: &TaskId) -> Result<QueueItem, StowageError> {
        let item = self
            .transition(task_id, QueueStatus::Pending, QueueStatus::Active, |item| {
                item.started_at = Some(Utc::now());
            })
            .await?;
        debug!(task_id = %task_id, "queue item claimed");
        Ok(item)
    }

    /// Record a worker-reported outcome (ACTIVE -> COMPLETED or FAILED).
    pub async fn complete(
        &self,
        task_id: &TaskId,
        report: CompletionReport,
    ) -> Result<QueueItem, StowageError> {
        let target = if report.exit_code == 0 {
            QueueStatus::Completed
        } else {
            QueueStatus::Failed
        };

        let item = self
            .transition(task_id, QueueStatus::Active, target, |item| {
                item.completed_at = Some(Utc::now());
                item.exit_code = Some(report.exit_code);
                item.error_message = report.error_message.clone();
            })
            .await?;
        info!(task_id = %task_id, status = %target, exit_code = report.exit_code, "queue item completed");
        Ok(item)
    }

    /// Withdraw a not-yet-claimed item (PENDING -> CANCELLED).
    ///
    /// Non-cooperative: once claimed, terminating in-flight work is the
    /// external worker's responsibility.
    pub async fn cancel(&self, task_id: &TaskId) -> Result<QueueItem, StowageError> {
        let item = self
            .transition(
                task_id,
                QueueStatus::Pending,
                QueueStatus::Cancelled,
                |_| {},
            )
            .await?;
        info!(task_id = %task_id, "queue item cancelled");
        Ok(item)
    }

    /// Requeue a failed item (FAILED -> PENDING), incrementing `retryCount`
    /// and clearing the previous attempt's outcome fields.
    pub async fn retry(&self, task_id: &TaskId) -> Result<QueueItem, StowageError> {
        let item = self
            .transition(task_id, QueueStatus::Failed, QueueStatus::Pending, |item| {
                item.retry_count += 1;
                item.started_at = None;
                item.completed_at = None;
                item.exit_code = None;
                item.error_message = None;
            })
            .await?;
        info!(task_id = %task_id, retry_count = item.retry_count, "queue item requeued");
        Ok(item)
    }

    /// Remove an item unconditionally, regardless of state. Irreversible.
    pub async fn delete(&self, task_id: &TaskId) -> Result<(), StowageError> {
        let (status, _) = self.locate(task_id).await?.ok_or_else(|| StowageError::NotFound {
            what: "queue item",
            id: task_id.to_string(),
        })?;

        let key = keys::item_key(&self.prefix, status, task_id);
        self.store.delete_object(&key).await?;
        info!(task_id = %task_id, status = %status, "queue item deleted");
        Ok(())
    }

    /// Read-only snapshot of an item, or `None` if it does not exist.
    pub async fn trace(&self, task_id: &TaskId) -> Result<Option<QueueItem>, StowageError> {
        Ok(self.locate(task_id).await?.map(|(_, item)| item))
    }

    /// List items, optionally filtered by status and team.
    ///
    /// Ordering is stable and documented: ascending `createdAt`, ties broken
    /// by task id.
    pub async fn list(&self, filter: &QueueFilter) -> Result<Vec<QueueItem>, StowageError> {
        let statuses: Vec<QueueStatus> = match filter.status {
            Some(status) => vec![status],
            None => QueueStatus::ALL.to_vec(),
        };

        let mut items = Vec::new();
        for status in statuses {
            let prefix = keys::status_prefix(&self.prefix, status);
            for key in self.store.list_keys(&prefix).await? {
                // An item moved concurrently between list and get simply
                // drops out of this snapshot.
                if let Some(mut item) = self.store.get_json::<QueueItem>(&key).await? {
                    item.status = status;
                    if let Some(team) = &filter.team_name {
                        if &item.team_name != team {
                            continue;
                        }
                    }
                    items.push(item);
                }
            }
        }

        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.as_str().cmp(b.task_id.as_str()))
        });
        Ok(items)
    }

    /// Atomically move `task_id` from `from` to `to`, then rewrite the blob
    /// with `mutate` applied and the status field synced to `to`.
    ///
    /// The `move_object` is the exclusivity gate. If it fails because the
    /// source key is gone, the item is probed across all status prefixes to
    /// report `InvalidState` (racing caller lost, or wrong lifecycle phase)
    /// versus `NotFound` (no such item at all).
    async fn transition(
        &self,
        task_id: &TaskId,
        from: QueueStatus,
        to: QueueStatus,
        mutate: impl FnOnce(&mut QueueItem),
    ) -> Result<QueueItem, StowageError> {
        let from_key = keys::item_key(&self.prefix, from, task_id);
        let to_key = keys::item_key(&self.prefix, to, task_id);

        if let Err(err) = self.store.move_object(&from_key, &to_key).await {
            return match err {
                StowageError::NotFound { .. } => match self.locate(task_id).await? {
                    Some((current, _)) => Err(StowageError::InvalidState {
                        task_id: task_id.to_string(),
                        current,
                        expected: from,
                    }),
                    None => Err(StowageError::NotFound {
                        what: "queue item",
                        id: task_id.to_string(),
                    }),
                },
                other => Err(other),
            };
        }

        // A racing transition may have moved the item on between our move
        // and this read; rewriting would recreate a stale copy under `to`,
        // so classify against the item's current location instead.
        let Some(mut item) = self.store.get_json::<QueueItem>(&to_key).await? else {
            warn!(task_id = %task_id, "queue item moved again before rewrite");
            return match self.locate(task_id).await? {
                Some((current, _)) => Err(StowageError::InvalidState {
                    task_id: task_id.to_string(),
                    current,
                    expected: from,
                }),
                None => Err(StowageError::NotFound {
                    what: "queue item",
                    id: task_id.to_string(),
                }),
            };
        };
        item.status = to;
        mutate(&mut item);
        self.store.put_json(&to_key, &item).await?;
        Ok(item)
    }

    /// Probe every status prefix for `task_id`.
    ///
    /// The status derived from the key location overrides whatever the blob
    /// body says (the key is authoritative, see `keys.rs`).
    async fn locate(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<(QueueStatus, QueueItem)>, StowageError> {
        for status in QueueStatus::ALL {
            let key = keys::item_key(&self.prefix, status, task_id);
            if let Some(mut item) = self.store.get_json::<QueueItem>(&key).await? {
                item.status = status;
                return Ok(Some((status, item)));
            }
        }
        Ok(None)
    }
}
