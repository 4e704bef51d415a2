// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from a password.
//!
//! Derives a 32-byte key using Argon2id (Algorithm::Argon2id, Version::V0x13)
//! with parameters from CryptoConfig (OWASP-recommended defaults).

use ring::rand::{SecureRandom, SystemRandom};
use stowage_core::StowageError;
use zeroize::Zeroizing;

/// Salt length in bytes for the envelope KDF.
pub const SALT_LENGTH: usize = 16;

/// Derive a 32-byte key from a password using Argon2id.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop. Different passwords or different salts yield different keys.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_LENGTH],
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
) -> Result<Zeroizing<[u8; 32]>, StowageError> {
    let params = argon2::Params::new(memory_cost, iterations, parallelism, Some(32))
        .map_err(|e| StowageError::Config(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password, salt, output.as_mut())
        .map_err(|e| StowageError::Internal(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Generate a random 16-byte salt for Argon2id.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH], StowageError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LENGTH];
    rng.fill(&mut salt)
        .map_err(|_| StowageError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_produces_consistent_output() {
        let salt = [1u8; 16];
        let password = b"test password";

        // Use low cost for fast tests.
        let key1 = derive_key(password, &salt, 8, 1, 1).unwrap();
        let key2 = derive_key(password, &salt, 8, 1, 1).unwrap();

        assert_eq!(*key1, *key2);
    }

    #[test]
    fn derive_key_different_password_produces_different_output() {
        let salt = [2u8; 16];

        let key1 = derive_key(b"password one", &salt, 8, 1, 1).unwrap();
        let key2 = derive_key(b"password two", &salt, 8, 1, 1).unwrap();

        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_different_salt_produces_different_output() {
        let password = b"same password";

        let key1 = derive_key(password, &[1u8; 16], 8, 1, 1).unwrap();
        let key2 = derive_key(password, &[2u8; 16], 8, 1, 1).unwrap();

        assert_ne!(*key1, *key2);
    }

    #[test]
    fn generate_salt_produces_random_values() {
        let salt1 = generate_salt().unwrap();
        let salt2 = generate_salt().unwrap();

        assert_ne!(salt1, salt2);
    }
}
