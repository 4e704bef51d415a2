// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as KDF parameter floors and non-empty key prefixes.

use crate::diagnostic::ConfigError;
use crate::model::StowageConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StowageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // KDF parameter floors.
    if config.crypto.kdf_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                config.crypto.kdf_memory_cost
            ),
        });
    }

    if config.crypto.kdf_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_iterations must be at least 2, got {}",
                config.crypto.kdf_iterations
            ),
        });
    }

    if config.crypto.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_parallelism must be at least 1, got {}",
                config.crypto.kdf_parallelism
            ),
        });
    }

    // Key prefixes must be non-empty and slash-free so the derived key
    // layout stays a flat two-segment hierarchy.
    for (name, prefix) in [
        ("queue.key_prefix", &config.queue.key_prefix),
        ("vault.key_prefix", &config.vault.key_prefix),
    ] {
        if prefix.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{name} must not be empty"),
            });
        } else if prefix.starts_with('/') || prefix.ends_with('/') {
            errors.push(ConfigError::Validation {
                message: format!("{name} must not start or end with `/`, got `{prefix}`"),
            });
        }
    }

    if config.dispatch.schema_version == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.schema_version must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = StowageConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn low_kdf_memory_fails_validation() {
        let mut config = StowageConfig::default();
        config.crypto.kdf_memory_cost = 1024;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("kdf_memory_cost"));
    }

    #[test]
    fn empty_prefix_fails_validation() {
        let mut config = StowageConfig::default();
        config.queue.key_prefix = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("queue.key_prefix"));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = StowageConfig::default();
        config.crypto.kdf_iterations = 0;
        config.vault.key_prefix = "/vaults".to_string();
        config.dispatch.schema_version = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
