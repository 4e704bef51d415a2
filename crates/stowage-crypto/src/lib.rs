// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based cryptography for the Stowage vaults.
//!
//! Provides the envelope cipher used for encrypted-at-rest vault blobs
//! (Argon2id KDF + AES-256-GCM, self-describing base64 envelopes) and the
//! deterministic digest used for password verification handshakes.

pub mod aead;
pub mod digest;
pub mod envelope;
pub mod kdf;

pub use digest::generate_hash;
pub use envelope::EnvelopeCipher;
