// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped, versioned, encrypted-at-rest secret storage for Stowage.
//!
//! Secrets live as one encrypted JSON document per scope (team, machine,
//! organization, company) at scope-derived object keys. Encryption is the
//! password-based envelope from `stowage-crypto`; absence of a blob is a
//! normal state, and versioned updates use optimistic concurrency.

pub mod scope;
pub mod store;

pub use scope::VaultScope;
pub use store::VaultStore;
