// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composite job vault shape and the pure bundle-shaping helpers.
//!
//! The composite vault is the single opaque document a worker receives with
//! a claimed job. Its `contextData` folds the per-scope bundles together
//! under well-known keys; `schemaVersion` lets an older worker reject a
//! newer layout instead of silently misreading it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stowage_core::StowageError;

/// Current composite vault layout version.
pub const SCHEMA_VERSION: u32 = 1;

/// The assembled, not-yet-serialized job vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeJobVault {
    pub schema_version: u32,
    pub function: String,
    /// Empty string for machine-less jobs, matching the persisted format.
    pub machine: String,
    pub team: String,
    pub params: Map<String, Value>,
    pub context_data: Map<String, Value>,
}

/// Normalize a fetched bundle into a JSON object.
///
/// Bundles may arrive pre-parsed or as a JSON string; anything that is not
/// an object after parsing is treated as absent.
pub(crate) fn normalize_bundle(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// Connection fields of a machine bundle, uppercased for the worker.
///
/// Source bundles are inconsistent about casing; the lowercase spelling
/// wins when both are present.
pub(crate) fn machine_connection_fields(bundle: &Map<String, Value>) -> Map<String, Value> {
    const FIELDS: [(&str, [&str; 2]); 4] = [
        ("IP", ["ip", "IP"]),
        ("USER", ["user", "USER"]),
        ("DATASTORE", ["datastore", "DATASTORE"]),
        ("HOST_ENTRY", ["host_entry", "HOST_ENTRY"]),
    ];

    let mut out = Map::new();
    for (target, sources) in FIELDS {
        if let Some(value) = sources.iter().find_map(|s| bundle.get(*s)) {
            out.insert(target.to_string(), value.clone());
        }
    }
    out
}

/// Turn a storage bundle into the rclone-style env map workers export.
///
/// `provider` is mandatory; `folder` and `parameters` keep dedicated keys;
/// every other bundle field becomes `RCLONE_{PROVIDER}_{KEY}`.
pub(crate) fn storage_env_map(
    bundle: &Map<String, Value>,
) -> Result<Map<String, Value>, StowageError> {
    let provider = bundle
        .get("provider")
        .and_then(Value::as_str)
        .ok_or_else(|| StowageError::Vault("storage bundle has no provider".to_string()))?;

    let mut out = Map::new();
    out.insert(
        "RCLONE_STOWAGE_BACKEND".to_string(),
        Value::String(provider.to_string()),
    );
    if let Some(folder) = bundle.get("folder") {
        if !folder.is_null() {
            out.insert("RCLONE_STOWAGE_FOLDER".to_string(), folder.clone());
        }
    }
    if let Some(parameters) = bundle.get("parameters") {
        out.insert("RCLONE_PARAMETERS".to_string(), parameters.clone());
    }

    let prefix = format!("RCLONE_{}", provider.to_uppercase());
    for (key, value) in bundle {
        if matches!(key.as_str(), "provider" | "folder" | "parameters") {
            continue;
        }
        out.insert(format!("{prefix}_{}", key.to_uppercase()), value.clone());
    }
    Ok(out)
}

/// The subset of company-vault keys that travels with a job.
pub(crate) fn company_section(bundle: &Map<String, Value>) -> Map<String, Value> {
    const KEYS: [&str; 6] = [
        "UNIVERSAL_USER_ID",
        "UNIVERSAL_USER_NAME",
        "DOCKER_JSON_CONF",
        "LOG_FILE",
        "REPO_CREDENTIALS",
        "PLUGINS",
    ];
    let mut out = Map::new();
    for key in KEYS {
        if let Some(value) = bundle.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

/// SSH keys cross the queue base64-encoded; already-encoded values pass
/// through untouched.
pub(crate) fn ensure_base64(value: &str) -> String {
    if BASE64.decode(value).is_ok() {
        value.to_string()
    } else {
        BASE64.encode(value)
    }
}

/// String-valued parameter lookup.
pub(crate) fn param_str<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

/// Parameter that may be a string array or a single string.
pub(crate) fn param_list(params: &Map<String, Value>, key: &str) -> Vec<String> {
    match params.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(one)) => vec![one.clone()],
        _ => Vec::new(),
    }
}
