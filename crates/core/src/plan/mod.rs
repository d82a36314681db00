//! Planning of the actions that make up one scheme
//!
//! A [`SchemePlan`] is the renderer-independent form of a scheme: every
//! target is reduced to its buildable reference, configurations are
//! resolved against the project default, and the generated support actions
//! are in place.

pub mod build_action;
pub mod execution_actions;
pub mod natural_order;

pub use build_action::{BuildActionEntries, BuildActionEntry, BuildFor};
pub use execution_actions::{
    ExecutionActionBuckets, PrePostActions, SchemeExecutionAction, SortedExecutionActions,
};
pub use natural_order::localized_standard_cmp;

use serde::Serialize;
use std::collections::HashMap;

use crate::config::ExtensionPointIdentifier;
use crate::error::{Error, Result};
use crate::types::{
    BuildableReference, CommandLineArgument, EnvironmentVariable, LaunchTarget, SchemeInfo,
    TargetId,
};

/// What a launch or profile action starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Runnable {
    Plain {
        buildable_reference: BuildableReference,
    },
    /// An extension launched through its host
    Hosted {
        buildable_reference: BuildableReference,
        host_buildable_reference: BuildableReference,
        debugging_mode: u32,
        remote_bundle_identifier: String,
    },
}

impl Runnable {
    pub fn buildable_reference(&self) -> &BuildableReference {
        match self {
            Runnable::Plain {
                buildable_reference,
            }
            | Runnable::Hosted {
                buildable_reference,
                ..
            } => buildable_reference,
        }
    }

    pub fn is_hosted(&self) -> bool {
        matches!(self, Runnable::Hosted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testable {
    pub buildable_reference: BuildableReference,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildAction {
    pub entries: Vec<BuildActionEntry>,
    pub pre_actions: Vec<SchemeExecutionAction>,
    pub post_actions: Vec<SchemeExecutionAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestAction {
    pub build_configuration: String,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub enable_address_sanitizer: bool,
    pub enable_thread_sanitizer: bool,
    pub enable_ub_sanitizer: bool,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub expand_variables_based_on: Option<BuildableReference>,
    pub pre_actions: Vec<SchemeExecutionAction>,
    pub post_actions: Vec<SchemeExecutionAction>,
    pub testables: Vec<Testable>,
    pub use_launch_scheme_args_env: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchAction {
    pub build_configuration: String,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub custom_working_directory: Option<String>,
    pub enable_address_sanitizer: bool,
    pub enable_thread_sanitizer: bool,
    pub enable_ub_sanitizer: bool,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub pre_actions: Vec<SchemeExecutionAction>,
    pub post_actions: Vec<SchemeExecutionAction>,
    pub runnable: Option<Runnable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAction {
    pub build_configuration: String,
    pub command_line_arguments: Vec<CommandLineArgument>,
    pub custom_working_directory: Option<String>,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub pre_actions: Vec<SchemeExecutionAction>,
    pub post_actions: Vec<SchemeExecutionAction>,
    pub use_launch_scheme_args_env: bool,
    pub runnable: Option<Runnable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeAction {
    pub build_configuration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveAction {
    pub build_configuration: String,
}

/// Everything needed to write one scheme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemePlan {
    pub name: String,
    pub build_action: BuildAction,
    pub test_action: TestAction,
    pub launch_action: LaunchAction,
    pub profile_action: ProfileAction,
    pub analyze_action: AnalyzeAction,
    pub archive_action: ArchiveAction,
    pub was_created_for_app_extension: bool,
}

/// Plans the actions for `scheme_info`.
///
/// Build entries are collected in this order, which decides the first
/// (icon deciding) entry: the run launch target and its host, run build
/// targets, the profile launch target and its host, profile build targets,
/// test build targets, test targets, and finally the preview references.
pub fn create_scheme_plan(
    default_xcode_configuration: &str,
    extension_point_identifiers: &HashMap<TargetId, ExtensionPointIdentifier>,
    scheme_info: &SchemeInfo<'_>,
) -> Result<SchemePlan> {
    let mut entries = BuildActionEntries::new();
    let configuration = |configured: &Option<String>| {
        configured
            .clone()
            .unwrap_or_else(|| default_xcode_configuration.to_string())
    };

    // Run
    let launch_runnable = match &scheme_info.run.launch_target {
        Some(launch_target) => {
            include_launch_target(
                &mut entries,
                launch_target,
                BuildFor::RUNNING | BuildFor::ANALYZING,
            );
            Some(runnable(launch_target, extension_point_identifiers)?)
        }
        None => None,
    };
    for target in &scheme_info.run.build_targets {
        entries.include(
            &target.buildable_reference,
            BuildFor::RUNNING | BuildFor::ANALYZING,
        );
    }

    // Profile
    let profile_runnable = match &scheme_info.profile.launch_target {
        Some(launch_target) => {
            include_launch_target(&mut entries, launch_target, BuildFor::PROFILING);
            Some(runnable(launch_target, extension_point_identifiers)?)
        }
        None => None,
    };
    for target in &scheme_info.profile.build_targets {
        entries.include(&target.buildable_reference, BuildFor::PROFILING);
    }

    // Test build targets go in before test targets, so a test bundle only
    // leads the scheme when nothing else is declared
    for target in &scheme_info.test.build_targets {
        entries.include(&target.buildable_reference, BuildFor::TESTING);
    }
    let testables: Vec<Testable> = scheme_info
        .test
        .test_targets
        .iter()
        .map(|test_target| {
            let buildable_reference = &test_target.target.buildable_reference;
            entries.include(buildable_reference, BuildFor::TESTING);
            Testable {
                buildable_reference: buildable_reference.clone(),
                skipped: !test_target.enabled,
            }
        })
        .collect();

    for reference in &scheme_info.run.transitive_preview_references {
        entries.include(reference, BuildFor::RUNNING);
    }

    let mut buckets = ExecutionActionBuckets::new();
    for action in &scheme_info.execution_actions {
        buckets.push(action);
    }
    let mut actions = buckets.into_sorted();

    if let Some(runnable) = &launch_runnable {
        actions.run.pre_actions.insert(
            0,
            SchemeExecutionAction::update_lldbinit_and_copy_dsyms(runnable.buildable_reference()),
        );
    }
    if let Some(runnable) = &profile_runnable {
        actions.profile.pre_actions.insert(
            0,
            SchemeExecutionAction::update_lldbinit_and_copy_dsyms(runnable.buildable_reference()),
        );
    }
    if let Some(testable) = testables.first() {
        actions.test.pre_actions.insert(
            0,
            SchemeExecutionAction::update_lldbinit_and_copy_dsyms(&testable.buildable_reference),
        );
    }

    let entries = entries.into_ordered();
    if let Some(first) = entries.first() {
        let reference = &first.buildable_reference;
        actions.build.pre_actions.splice(
            0..0,
            [
                SchemeExecutionAction::initialize_bazel_build_output_groups_file(reference),
                SchemeExecutionAction::prepare_bazel_dependencies(reference),
            ],
        );
    }

    let test = &scheme_info.test;
    let run = &scheme_info.run;
    let profile = &scheme_info.profile;
    let launch_configuration = configuration(&run.xcode_configuration);
    let was_created_for_app_extension = launch_runnable
        .as_ref()
        .is_some_and(Runnable::is_hosted);

    tracing::debug!(
        "Planned scheme \"{}\" with {} build entries and {} testables",
        scheme_info.name,
        entries.len(),
        testables.len()
    );

    Ok(SchemePlan {
        name: scheme_info.name.clone(),
        build_action: BuildAction {
            entries,
            pre_actions: actions.build.pre_actions,
            post_actions: actions.build.post_actions,
        },
        test_action: TestAction {
            build_configuration: configuration(&test.xcode_configuration),
            command_line_arguments: test.command_line_arguments.clone(),
            enable_address_sanitizer: test.enable_address_sanitizer,
            enable_thread_sanitizer: test.enable_thread_sanitizer,
            enable_ub_sanitizer: test.enable_ub_sanitizer,
            environment_variables: test.environment_variables.clone(),
            expand_variables_based_on: if test.use_run_args_and_env {
                None
            } else {
                testables
                    .first()
                    .map(|testable| testable.buildable_reference.clone())
            },
            pre_actions: actions.test.pre_actions,
            post_actions: actions.test.post_actions,
            testables,
            use_launch_scheme_args_env: test.use_run_args_and_env,
        },
        launch_action: LaunchAction {
            build_configuration: launch_configuration.clone(),
            command_line_arguments: run.command_line_arguments.clone(),
            custom_working_directory: run.custom_working_directory.clone(),
            enable_address_sanitizer: run.enable_address_sanitizer,
            enable_thread_sanitizer: run.enable_thread_sanitizer,
            enable_ub_sanitizer: run.enable_ub_sanitizer,
            environment_variables: run.environment_variables.clone(),
            pre_actions: actions.run.pre_actions,
            post_actions: actions.run.post_actions,
            runnable: launch_runnable,
        },
        profile_action: ProfileAction {
            build_configuration: configuration(&profile.xcode_configuration),
            command_line_arguments: profile.command_line_arguments.clone(),
            custom_working_directory: profile.custom_working_directory.clone(),
            environment_variables: profile.environment_variables.clone(),
            pre_actions: actions.profile.pre_actions,
            post_actions: actions.profile.post_actions,
            use_launch_scheme_args_env: profile.use_run_args_and_env,
            runnable: profile_runnable,
        },
        analyze_action: AnalyzeAction {
            build_configuration: launch_configuration.clone(),
        },
        archive_action: ArchiveAction {
            build_configuration: launch_configuration,
        },
        was_created_for_app_extension,
    })
}

fn include_launch_target(
    entries: &mut BuildActionEntries,
    launch_target: &LaunchTarget<'_>,
    build_for: BuildFor,
) {
    entries.include(&launch_target.primary.buildable_reference, build_for);
    if let Some(host) = launch_target.extension_host {
        entries.include(&host.buildable_reference, build_for);
    }
}

fn runnable(
    launch_target: &LaunchTarget<'_>,
    extension_point_identifiers: &HashMap<TargetId, ExtensionPointIdentifier>,
) -> Result<Runnable> {
    let buildable_reference = launch_target.primary.buildable_reference.clone();
    let Some(host) = launch_target.extension_host else {
        return Ok(Runnable::Plain {
            buildable_reference,
        });
    };

    let id = &launch_target.primary.id;
    let extension_point = extension_point_identifiers
        .get(id)
        .ok_or_else(|| Error::unknown_target("Extension Target ID", id))?;

    Ok(Runnable::Hosted {
        buildable_reference,
        host_buildable_reference: host.buildable_reference.clone(),
        debugging_mode: extension_point.debugging_mode,
        remote_bundle_identifier: extension_point.remote_bundle_identifier.clone(),
    })
}
