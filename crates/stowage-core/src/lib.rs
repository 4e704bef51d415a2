// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Stowage encrypted job-queue-and-vault subsystem.
//!
//! This crate provides the error taxonomy, shared types, and the
//! [`ObjectStore`] seam used throughout the Stowage workspace. The queue,
//! vault, and dispatch crates all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StowageError;
pub use traits::{ObjectStore, ObjectStoreExt};
pub use types::{QueueStatus, TaskId};
