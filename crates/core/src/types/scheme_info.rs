use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::args_env::{CommandLineArgument, EnvironmentVariable};
use super::target::{BuildableReference, Target};

/// The scheme action an execution action attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Build,
    Test,
    Run,
    Profile,
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(ActionKind::Build),
            "test" => Ok(ActionKind::Test),
            "run" => Ok(ActionKind::Run),
            "profile" => Ok(ActionKind::Profile),
            other => Err(format!(
                "unknown action '{other}', expected one of: build, test, run, profile"
            )),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Build => "build",
            ActionKind::Test => "test",
            ActionKind::Run => "run",
            ActionKind::Profile => "profile",
        };
        f.write_str(name)
    }
}

/// A user supplied pre/post script attached to one scheme action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionAction<'a> {
    pub title: String,
    pub script_text: String,
    pub action: ActionKind,
    pub is_pre_action: bool,
    pub order: Option<i64>,
    /// Target whose build settings expand variables in `script_text`
    #[serde(serialize_with = "serialize_target_id")]
    pub target: &'a Target,
}

/// The target a run or profile action launches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchTarget<'a> {
    #[serde(serialize_with = "serialize_target_id")]
    pub primary: &'a Target,
    #[serde(serialize_with = "serialize_optional_target_id")]
    pub extension_host: Option<&'a Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestTarget<'a> {
    #[serde(serialize_with = "serialize_target_id")]
    pub target: &'a Target,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Test<'a> {
    #[serde(serialize_with = "serialize_target_ids")]
    pub build_targets: Vec<&'a Target>,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub enable_address_sanitizer: bool,
    pub enable_thread_sanitizer: bool,
    pub enable_ub_sanitizer: bool,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub test_targets: Vec<TestTarget<'a>>,
    pub use_run_args_and_env: bool,
    pub xcode_configuration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run<'a> {
    #[serde(serialize_with = "serialize_target_ids")]
    pub build_targets: Vec<&'a Target>,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub custom_working_directory: Option<String>,
    pub enable_address_sanitizer: bool,
    pub enable_thread_sanitizer: bool,
    pub enable_ub_sanitizer: bool,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub launch_target: Option<LaunchTarget<'a>>,
    pub transitive_preview_references: Vec<BuildableReference>,
    pub xcode_configuration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile<'a> {
    #[serde(serialize_with = "serialize_target_ids")]
    pub build_targets: Vec<&'a Target>,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub custom_working_directory: Option<String>,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub launch_target: Option<LaunchTarget<'a>>,
    pub use_run_args_and_env: bool,
    pub xcode_configuration: Option<String>,
}

/// A fully resolved custom scheme, ready to be planned and rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeInfo<'a> {
    pub name: String,
    pub test: Test<'a>,
    pub run: Run<'a>,
    pub profile: Profile<'a>,
    pub execution_actions: Vec<ExecutionAction<'a>>,
}

fn serialize_target_id<S>(target: &&Target, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    target.id.serialize(serializer)
}

fn serialize_optional_target_id<S>(
    target: &Option<&Target>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    target.map(|target| &target.id).serialize(serializer)
}

fn serialize_target_ids<S>(targets: &[&Target], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(targets.iter().map(|target| &target.id))
}
