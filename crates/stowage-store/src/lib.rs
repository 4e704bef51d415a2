// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process [`ObjectStore`](stowage_core::ObjectStore) implementation.
//!
//! Remote clients (S3-compatible buckets and friends) live outside this
//! workspace; every crate here is written against the trait and exercised
//! against [`MemoryObjectStore`].

pub mod memory;

pub use memory::MemoryObjectStore;
