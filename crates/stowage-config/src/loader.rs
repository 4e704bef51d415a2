// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stowage.toml` > `~/.config/stowage/stowage.toml`
//! > `/etc/stowage/stowage.toml` with environment variable overrides via the
//! `STOWAGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StowageConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stowage/stowage.toml` (system-wide)
/// 3. `~/.config/stowage/stowage.toml` (user XDG config)
/// 4. `./stowage.toml` (local directory)
/// 5. `STOWAGE_*` environment variables
pub fn load_config() -> Result<StowageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::file("/etc/stowage/stowage.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("stowage/stowage.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("stowage.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StowageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StowageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StowageConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `STOWAGE_CRYPTO_KDF_MEMORY_COST` must map
/// to `crypto.kdf_memory_cost`, not `crypto.kdf.memory.cost`.
fn env_provider() -> Env {
    Env::prefixed("STOWAGE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: STOWAGE_CRYPTO_KDF_ITERATIONS -> "crypto_kdf_iterations"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("crypto_", "crypto.", 1)
            .replacen("queue_", "queue.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("dispatch_", "dispatch.", 1);
        mapped.into()
    })
}
