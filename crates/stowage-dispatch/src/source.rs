// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam to whatever owns the per-scope plaintext bundles.
//!
//! In production this is backed by the control-plane API; tests use canned
//! in-memory sources. A bundle may arrive pre-parsed or as a JSON string —
//! the aggregator normalizes both.

use async_trait::async_trait;
use serde_json::Value;

use stowage_core::StowageError;

/// Provider of decrypted per-scope secret bundles.
#[async_trait]
pub trait ScopeSource: Send + Sync {
    async fn company_vault(&self) -> Result<Option<Value>, StowageError>;
    async fn team_vault(&self, team: &str) -> Result<Option<Value>, StowageError>;
    async fn machine_vault(&self, machine: &str) -> Result<Option<Value>, StowageError>;
    async fn repository_vault(&self, guid: &str) -> Result<Option<Value>, StowageError>;
    async fn storage_vault(&self, name: &str) -> Result<Option<Value>, StowageError>;
    async fn bridge_vault(&self, name: &str) -> Result<Option<Value>, StowageError>;
}
