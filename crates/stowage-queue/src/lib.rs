// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable job queue over a flat object store.
//!
//! State lives in the object keys themselves (`{prefix}/{STATUS}/{id}.json`),
//! so lifecycle transitions are atomic key moves and claim() is exclusive
//! without any coordinator process.

pub mod item;
pub mod keys;
pub mod service;

pub use item::{CompletionReport, NewQueueItem, QueueFilter, QueueItem, MAX_PRIORITY, MIN_PRIORITY};
pub use service::QueueService;
