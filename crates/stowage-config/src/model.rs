// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Stowage core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Stowage configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StowageConfig {
    /// Password-based encryption (KDF) settings.
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Job queue key layout settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Scoped vault key layout settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Job-dispatch vault assembly settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Argon2id key-derivation parameters for the envelope cipher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

impl CryptoConfig {
    /// Parameters suitable for fast unit tests (well below the validated
    /// production minimums -- never use outside tests).
    pub fn fast_insecure_for_tests() -> Self {
        Self {
            kdf_memory_cost: 8,
            kdf_iterations: 1,
            kdf_parallelism: 1,
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Queue key layout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Key prefix under which queue items are stored, without trailing slash.
    /// Items live at `{key_prefix}/{status}/{task_id}.json`.
    #[serde(default = "default_queue_prefix")]
    pub key_prefix: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_queue_prefix(),
        }
    }
}

fn default_queue_prefix() -> String {
    "queue".to_string()
}

/// Vault key layout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Key prefix under which encrypted vault blobs are stored, without
    /// trailing slash. Blobs live at e.g. `{key_prefix}/team.json.enc`.
    #[serde(default = "default_vault_prefix")]
    pub key_prefix: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_vault_prefix(),
        }
    }
}

fn default_vault_prefix() -> String {
    "vaults".to_string()
}

/// Job-dispatch vault assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// API endpoint recorded in each composite vault's GENERAL_SETTINGS as
    /// provenance for the remote worker. Empty means "not configured".
    #[serde(default)]
    pub api_url: String,

    /// Schema version stamped into every composite job vault so older
    /// workers can detect and reject payloads they do not understand.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            schema_version: default_schema_version(),
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = StowageConfig::default();
        assert_eq!(config.crypto.kdf_memory_cost, 65536);
        assert_eq!(config.crypto.kdf_iterations, 3);
        assert_eq!(config.crypto.kdf_parallelism, 4);
        assert_eq!(config.queue.key_prefix, "queue");
        assert_eq!(config.vault.key_prefix, "vaults");
        assert_eq!(config.dispatch.schema_version, 1);
        assert!(config.dispatch.api_url.is_empty());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = StowageConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let back: StowageConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back.crypto.kdf_iterations, config.crypto.kdf_iterations);
        assert_eq!(back.queue.key_prefix, config.queue.key_prefix);
    }
}
