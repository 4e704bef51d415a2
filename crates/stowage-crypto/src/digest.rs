// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic, salt-free hashing for password verification handshakes.
//!
//! Distinct from the encryption path and never a substitute for it: the same
//! input always yields the same output, which is exactly what a remote
//! verification handshake needs and exactly what an encryption envelope must
//! never do.

use ring::digest::{SHA256, digest};

/// Compute the lowercase-hex SHA-256 digest of `input`.
pub fn generate_hash(input: &str) -> String {
    hex::encode(digest(&SHA256, input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(generate_hash("handshake"), generate_hash("handshake"));
    }

    #[test]
    fn hash_differs_by_input() {
        assert_ne!(generate_hash("a"), generate_hash("b"));
    }

    #[test]
    fn hash_matches_known_vector() {
        // SHA-256 of the empty string.
        assert_eq!(
            generate_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
