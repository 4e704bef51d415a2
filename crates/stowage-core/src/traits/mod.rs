// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams between the Stowage core and its
//! external collaborators.

pub mod store;

pub use store::{ObjectStore, ObjectStoreExt};
