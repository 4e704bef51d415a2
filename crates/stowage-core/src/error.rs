// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Stowage queue-and-vault core.

use thiserror::Error;

use crate::types::QueueStatus;

/// The primary error type used across all Stowage crates.
#[derive(Debug, Error)]
pub enum StowageError {
    /// A queue item or mandatory vault blob does not exist.
    ///
    /// Plain absence of an *optional* vault is not an error; lookups for
    /// optional blobs return `Ok(None)` instead.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// A queue operation was attempted from the wrong lifecycle state.
    ///
    /// Always names both the observed and the expected state so callers can
    /// distinguish "already handled by someone else" from a programmer error.
    #[error("queue item {task_id} is {current}, expected {expected}")]
    InvalidState {
        task_id: String,
        current: QueueStatus,
        expected: QueueStatus,
    },

    /// Optimistic-concurrency mismatch on a versioned vault update.
    #[error("vault version conflict: supplied {supplied}, found {found}")]
    Conflict { supplied: u64, found: u64 },

    /// Decryption failed: wrong password, tampered ciphertext, or a
    /// malformed envelope.
    ///
    /// Deliberately a single generic variant with no detail about which
    /// check failed, so the error cannot be used as a padding or
    /// authentication oracle.
    #[error("decryption failed")]
    Decryption,

    /// Decryption succeeded but the plaintext payload is invalid
    /// (not UTF-8, not JSON, or corrupted vault metadata).
    #[error("vault error: {0}")]
    Vault(String),

    /// Backing object-store errors (I/O, serialization, listing).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caller input rejected before any state was touched
    /// (priority out of range, empty required field).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid TOML, out-of-range KDF parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StowageError {
    /// Wrap an arbitrary error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_names_both_states() {
        let err = StowageError::InvalidState {
            task_id: "t-1".into(),
            current: QueueStatus::Active,
            expected: QueueStatus::Pending,
        };
        let msg = err.to_string();
        assert!(msg.contains("ACTIVE"));
        assert!(msg.contains("PENDING"));
    }

    #[test]
    fn conflict_reports_both_versions() {
        let err = StowageError::Conflict {
            supplied: 3,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn decryption_error_is_generic() {
        // The message must never reveal which check failed.
        assert_eq!(StowageError::Decryption.to_string(), "decryption failed");
    }
}
