// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Stowage queue-and-vault core.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and miette diagnostic rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use stowage_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("queue prefix: {}", config.queue.key_prefix);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CryptoConfig, DispatchConfig, QueueConfig, StowageConfig, VaultConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to miette diagnostics with typo suggestions
///
/// Returns either a valid `StowageConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<StowageConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<StowageConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_toml_loads_and_validates() {
        let config = load_and_validate_str(
            r#"
            [crypto]
            kdf_iterations = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.crypto.kdf_iterations, 4);
    }

    #[test]
    fn semantic_violation_surfaces_as_validation_error() {
        let errors = load_and_validate_str(
            r#"
            [crypto]
            kdf_iterations = 1
            "#,
        )
        .unwrap_err();
        assert!(errors[0].to_string().contains("kdf_iterations"));
    }
}
