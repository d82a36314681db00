use serde::{Deserialize, Serialize};

/// A command-line argument passed by a scheme action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandLineArgument {
    pub value: String,
    pub enabled: bool,
}

impl CommandLineArgument {
    pub fn new(value: impl Into<String>, enabled: bool) -> Self {
        Self {
            value: value.into(),
            enabled,
        }
    }
}

/// An environment variable set by a scheme action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl EnvironmentVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled,
        }
    }

    /// Variables prepended when an action opts into default environment
    pub fn defaults() -> Vec<EnvironmentVariable> {
        vec![
            EnvironmentVariable::new("BUILD_WORKING_DIRECTORY", "$(BUILT_PRODUCTS_DIR)", true),
            EnvironmentVariable::new(
                "BUILD_WORKSPACE_DIRECTORY",
                "$(BUILD_WORKSPACE_DIRECTORY)",
                true,
            ),
        ]
    }
}

/// Prepends the default environment variables ahead of `variables`
pub fn prepend_default_environment(variables: &mut Vec<EnvironmentVariable>) {
    variables.splice(0..0, EnvironmentVariable::defaults());
}
