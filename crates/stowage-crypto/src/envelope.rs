// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based self-describing encryption envelopes.
//!
//! An envelope is `base64(salt || nonce || ciphertext || tag)`: everything
//! needed to decrypt given only the password. Salt and nonce are drawn fresh
//! per call, so encrypting the same plaintext twice with the same password
//! yields different envelopes.
//!
//! There is no key-wrapping layer here: each envelope derives its own key
//! from (password, salt), because a blob must remain decryptable with
//! nothing but the password that protected it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use stowage_config::CryptoConfig;
use stowage_core::StowageError;
use zeroize::Zeroizing;

use crate::aead;
use crate::kdf;

/// Minimum decodable envelope: salt + nonce + empty ciphertext + tag.
const MIN_ENVELOPE_LEN: usize = kdf::SALT_LENGTH + aead::NONCE_LENGTH + aead::TAG_LENGTH;

/// Password-based authenticated encryption with configurable KDF cost.
#[derive(Debug, Clone)]
pub struct EnvelopeCipher {
    config: CryptoConfig,
}

impl EnvelopeCipher {
    pub fn new(config: CryptoConfig) -> Self {
        Self { config }
    }

    /// Encrypt `plaintext` under `password`.
    ///
    /// Draws a fresh random salt and nonce, derives the key via Argon2id over
    /// (password, salt), seals with AES-256-GCM, and returns
    /// `base64(salt || nonce || ciphertext || tag)`.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        password: &SecretString,
    ) -> Result<String, StowageError> {
        let salt = kdf::generate_salt()?;
        let key = self.derive_key(password, &salt)?;
        let (ciphertext, nonce) = aead::seal(&key, plaintext)?;

        let mut framed =
            Vec::with_capacity(kdf::SALT_LENGTH + aead::NONCE_LENGTH + ciphertext.len());
        framed.extend_from_slice(&salt);
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(framed))
    }

    /// Decrypt an envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// Any corruption -- wrong password, truncated envelope, a flipped byte,
    /// or invalid base64 -- fails with the generic
    /// [`StowageError::Decryption`]. Partial or unauthenticated plaintext is
    /// never returned.
    pub fn decrypt(
        &self,
        envelope: &str,
        password: &SecretString,
    ) -> Result<Vec<u8>, StowageError> {
        let framed = BASE64
            .decode(envelope.trim())
            .map_err(|_| StowageError::Decryption)?;
        if framed.len() < MIN_ENVELOPE_LEN {
            return Err(StowageError::Decryption);
        }

        let (salt_bytes, rest) = framed.split_at(kdf::SALT_LENGTH);
        let (nonce_bytes, ciphertext) = rest.split_at(aead::NONCE_LENGTH);

        // Infallible: split_at guarantees the lengths.
        let salt: [u8; kdf::SALT_LENGTH] =
            salt_bytes.try_into().map_err(|_| StowageError::Decryption)?;
        let nonce: [u8; aead::NONCE_LENGTH] =
            nonce_bytes.try_into().map_err(|_| StowageError::Decryption)?;

        let key = self.derive_key(password, &salt)?;
        aead::open(&key, &nonce, ciphertext)
    }

    /// Derive the 32-byte envelope key from (password, salt).
    ///
    /// Exposed so the KDF step is independently testable.
    pub fn derive_key(
        &self,
        password: &SecretString,
        salt: &[u8; kdf::SALT_LENGTH],
    ) -> Result<Zeroizing<[u8; 32]>, StowageError> {
        kdf::derive_key(
            password.expose_secret().as_bytes(),
            salt,
            self.config.kdf_memory_cost,
            self.config.kdf_iterations,
            self.config.kdf_parallelism,
        )
    }
}
