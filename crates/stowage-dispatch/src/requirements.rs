// SPDX-FileCopyrightText: 2026 Stowage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static per-function scope requirements.
//!
//! Each dispatchable function declares up front which secret scopes its
//! worker-side implementation consumes. Unknown functions get empty
//! requirements rather than an error, so new worker functions can roll out
//! before this table learns about them.

/// Which scopes a function's composite vault must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionRequirements {
    pub company: bool,
    pub machine: bool,
    pub repository: bool,
    pub storage: bool,
    pub bridge: bool,
    /// Plugin definitions are read out of the company vault, not fetched
    /// as their own scope.
    pub plugin: bool,
}

impl FunctionRequirements {
    const fn new(
        company: bool,
        machine: bool,
        repository: bool,
        storage: bool,
        bridge: bool,
        plugin: bool,
    ) -> Self {
        Self {
            company,
            machine,
            repository,
            storage,
            bridge,
            plugin,
        }
    }
}

/// Look up the requirements for `function_name`.
pub fn requirements_for(function_name: &str) -> FunctionRequirements {
    //                                         company machine repo   storage bridge plugin
    match function_name {
        "deploy" => FunctionRequirements::new(true, true, true, false, false, false),
        "backup" => FunctionRequirements::new(true, true, true, true, false, false),
        "pull" => FunctionRequirements::new(true, true, true, true, false, false),
        "push" => FunctionRequirements::new(true, true, true, true, false, false),
        "list" => FunctionRequirements::new(true, true, false, true, false, false),
        "mount" => FunctionRequirements::new(true, true, true, false, false, true),
        "unmount" => FunctionRequirements::new(true, true, true, false, false, true),
        "new" => FunctionRequirements::new(true, true, true, false, false, true),
        "up" => FunctionRequirements::new(true, true, true, false, false, true),
        "down" => FunctionRequirements::new(true, true, true, false, false, false),
        "resize" => FunctionRequirements::new(true, true, true, false, false, false),
        "ssh_test" => FunctionRequirements::new(false, true, false, false, true, false),
        _ => FunctionRequirements::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_functions_declare_scopes() {
        assert!(requirements_for("deploy").machine);
        assert!(requirements_for("deploy").repository);
        assert!(!requirements_for("deploy").storage);

        assert!(requirements_for("backup").storage);
        assert!(requirements_for("mount").plugin);
        assert!(requirements_for("ssh_test").bridge);
        assert!(!requirements_for("ssh_test").company);
    }

    #[test]
    fn unknown_function_has_no_requirements() {
        assert_eq!(
            requirements_for("frobnicate"),
            FunctionRequirements::default()
        );
    }
}
