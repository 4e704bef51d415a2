// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault scopes and their object-key derivation.
//!
//! Team, organization, and company vaults are singletons; machine vaults are
//! keyed by machine name (one blob per machine).

use stowage_core::StowageError;

/// The resource dimension a vault blob is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VaultScope {
    /// The singleton team vault (SSH keys, shared team secrets).
    Team,
    /// A per-machine vault, keyed by machine name.
    Machine(String),
    /// The singleton organization vault.
    Organization,
    /// The singleton company vault (universal user, plugins, repo credentials).
    Company,
}

impl VaultScope {
    /// Create a machine scope, rejecting names that would escape the
    /// two-segment key layout.
    pub fn machine(name: impl Into<String>) -> Result<Self, StowageError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StowageError::Validation(
                "machine name must not be empty".to_string(),
            ));
        }
        if name.contains('/') {
            return Err(StowageError::Validation(format!(
                "machine name must not contain `/`, got `{name}`"
            )));
        }
        Ok(Self::Machine(name))
    }

    /// The object key this scope's blob lives at, under `prefix`.
    pub fn object_key(&self, prefix: &str) -> String {
        match self {
            Self::Team => format!("{prefix}/team.json.enc"),
            Self::Machine(name) => format!("{prefix}/machines/{name}.json.enc"),
            Self::Organization => format!("{prefix}/organization.json.enc"),
            Self::Company => format!("{prefix}/company.json.enc"),
        }
    }

    /// Human-readable scope label for errors and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Team => "team".to_string(),
            Self::Machine(name) => format!("machine/{name}"),
            Self::Organization => "organization".to_string(),
            Self::Company => "company".to_string(),
        }
    }
}

impl std::fmt::Display for VaultScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_follow_layout() {
        assert_eq!(VaultScope::Team.object_key("vaults"), "vaults/team.json.enc");
        assert_eq!(
            VaultScope::machine("kvm1").unwrap().object_key("vaults"),
            "vaults/machines/kvm1.json.enc"
        );
        assert_eq!(
            VaultScope::Organization.object_key("v"),
            "v/organization.json.enc"
        );
        assert_eq!(VaultScope::Company.object_key("v"), "v/company.json.enc");
    }

    #[test]
    fn machine_scope_rejects_bad_names() {
        assert!(VaultScope::machine("").is_err());
        assert!(VaultScope::machine("a/b").is_err());
        assert!(VaultScope::machine("web-1").is_ok());
    }
}
