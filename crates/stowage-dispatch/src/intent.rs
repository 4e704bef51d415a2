// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde_json::{Map, Value};

/// A job submission request before any scope data has been fetched.
///
/// Names select which vaults the aggregator fetches; `params` is the
/// worker-facing parameter map and is carried into the composite vault
/// verbatim. Repository network id/mode/tag are control-plane metadata the
/// caller already holds, denormalized here so workers need no second lookup.
#[derive(Debug, Clone)]
pub struct JobIntent {
    pub function_name: String,
    pub team_name: String,
    pub machine_name: Option<String>,
    pub bridge_name: Option<String>,
    pub repository_guid: Option<String>,
    pub repository_network_id: Option<i64>,
    pub repository_network_mode: Option<String>,
    pub repository_tag: Option<String>,
    pub storage_name: Option<String>,
    pub params: Map<String, Value>,
    pub priority: u8,
}

impl JobIntent {
    pub fn new(function_name: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            team_name: team_name.into(),
            machine_name: None,
            bridge_name: None,
            repository_guid: None,
            repository_network_id: None,
            repository_network_mode: None,
            repository_tag: None,
            storage_name: None,
            params: Map::new(),
            priority: 3,
        }
    }
}
