// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope fetch policy.
//!
//! The aggregator never blanket-swallows fetch failures. Each scope carries
//! an explicit policy: an optional scope that fails is logged and omitted
//! (partial job context beats a blocked submission), while a required scope
//! that fails or yields nothing aborts assembly.

use crate::requirements::FunctionRequirements;

/// The fetchable secret scopes of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Company,
    Team,
    Machine,
    Repository,
    Storage,
    Bridge,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Company,
        Scope::Team,
        Scope::Machine,
        Scope::Repository,
        Scope::Storage,
        Scope::Bridge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scope::Company => "company",
            Scope::Team => "team",
            Scope::Machine => "machine",
            Scope::Repository => "repository",
            Scope::Storage => "storage",
            Scope::Bridge => "bridge",
        }
    }
}

/// What to do when a scope's fetch returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Log at warn and omit the scope from the composite vault.
    #[default]
    Ignore,
    /// Fail the whole assembly.
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopePolicy {
    /// A required scope must fetch successfully AND yield a bundle;
    /// absence is treated the same as a fetch failure.
    pub required: bool,
    pub on_error: OnError,
}

impl ScopePolicy {
    pub const fn required() -> Self {
        Self {
            required: true,
            on_error: OnError::Abort,
        }
    }

    pub const fn optional() -> Self {
        Self {
            required: false,
            on_error: OnError::Ignore,
        }
    }
}

/// Policy per scope, derived from the function's requirements and
/// overridable per call.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    company: ScopePolicy,
    team: ScopePolicy,
    machine: ScopePolicy,
    repository: ScopePolicy,
    storage: ScopePolicy,
    bridge: ScopePolicy,
}

impl PolicyTable {
    /// Default policies for a function: every scope the function declares
    /// is required, everything else is best-effort. The team vault is
    /// always fetched best-effort because general settings draw on it
    /// regardless of function.
    pub fn for_requirements(requirements: &FunctionRequirements) -> Self {
        let policy = |needed: bool| {
            if needed {
                ScopePolicy::required()
            } else {
                ScopePolicy::optional()
            }
        };
        Self {
            company: policy(requirements.company),
            team: ScopePolicy::optional(),
            machine: policy(requirements.machine),
            repository: policy(requirements.repository),
            storage: policy(requirements.storage),
            bridge: policy(requirements.bridge),
        }
    }

    pub fn get(&self, scope: Scope) -> ScopePolicy {
        match scope {
            Scope::Company => self.company,
            Scope::Team => self.team,
            Scope::Machine => self.machine,
            Scope::Repository => self.repository,
            Scope::Storage => self.storage,
            Scope::Bridge => self.bridge,
        }
    }

    /// Override one scope's policy.
    pub fn set(mut self, scope: Scope, policy: ScopePolicy) -> Self {
        match scope {
            Scope::Company => self.company = policy,
            Scope::Team => self.team = policy,
            Scope::Machine => self.machine = policy,
            Scope::Repository => self.repository = policy,
            Scope::Storage => self.storage = policy,
            Scope::Bridge => self.bridge = policy,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::requirements_for;

    #[test]
    fn required_scopes_abort_on_error() {
        let table = PolicyTable::for_requirements(&requirements_for("backup"));
        assert!(table.get(Scope::Storage).required);
        assert_eq!(table.get(Scope::Storage).on_error, OnError::Abort);
        assert!(!table.get(Scope::Bridge).required);
    }

    #[test]
    fn team_scope_is_always_best_effort() {
        let table = PolicyTable::for_requirements(&requirements_for("deploy"));
        assert!(!table.get(Scope::Team).required);
    }

    #[test]
    fn overrides_replace_derived_policy() {
        let table = PolicyTable::for_requirements(&requirements_for("deploy"))
            .set(Scope::Machine, ScopePolicy::optional());
        assert!(!table.get(Scope::Machine).required);
    }
}
