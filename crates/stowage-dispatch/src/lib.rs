// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job dispatch: composite vault assembly and queue submission.
//!
//! A job intent names a function plus the resources it touches. The
//! aggregator looks up which secret scopes that function requires, fetches
//! each scope's plaintext bundle through the [`ScopeSource`] seam under an
//! explicit per-scope policy, folds everything into one schema-versioned
//! composite vault, and hands the serialized result to the queue.

pub mod aggregator;
pub mod composite;
pub mod intent;
pub mod policy;
pub mod requirements;
pub mod source;

pub use aggregator::VaultAggregator;
pub use composite::{CompositeJobVault, SCHEMA_VERSION};
pub use intent::JobIntent;
pub use policy::{OnError, PolicyTable, Scope, ScopePolicy};
pub use requirements::{requirements_for, FunctionRequirements};
pub use source::ScopeSource;
