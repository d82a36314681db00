//! Assembly of resolved custom schemes from count-encoded input
//!
//! Schemes are processed in declaration order and, within a scheme, the
//! Test action before Run before Profile. Every flat array has its own
//! cursor; the args/env lines share one cursor across all three actions, so
//! scheme N+1 only lines up if scheme N consumed exactly its declared share.

pub mod launch_target;

pub use launch_target::resolve_launch_target;

use indexmap::IndexSet;
use std::collections::HashSet;

use crate::arguments::{CustomSchemesArguments, TargetArgsAndEnv};
use crate::config::Project;
use crate::decode::{
    Cursor, Lines, Positions, command_line_arguments, environment_variables, slice_for_scheme,
};
use crate::error::Result;
use crate::types::{
    BuildableReference, CommandLineArgument, EnvironmentVariable, Profile, Run, SchemeInfo, Target,
    TargetId, TargetLookup, TargetsById, Test, TestTarget, prepend_default_environment,
};

/// Resolves every custom scheme declared in `arguments`.
///
/// Both line files must already be read. Validation runs before any
/// slicing, and any failure aborts the whole run.
pub fn calculate_scheme_infos<'p>(
    arguments: &CustomSchemesArguments,
    args_env: &Lines,
    execution_action_lines: &Lines,
    target_args_env: &TargetArgsAndEnv,
    project: &'p Project,
) -> Result<Vec<SchemeInfo<'p>>> {
    arguments.validate()?;
    arguments.check_args_env_line_count(&args_env.description, args_env.lines.len())?;

    let execution_actions = arguments.execution_actions.calculate(
        &execution_action_lines.description,
        &execution_action_lines.lines,
        &project.targets_by_id,
    )?;
    for scheme_name in execution_actions.keys() {
        if !arguments.custom_schemes.contains(scheme_name) {
            tracing::warn!(
                "Execution actions reference undeclared scheme \"{}\"; ignoring them",
                scheme_name
            );
        }
    }

    let mut cursors = Cursors::default();
    let mut scheme_infos = Vec::with_capacity(arguments.scheme_count());

    for (index, name) in arguments.custom_schemes.iter().enumerate() {
        let context = SchemeContext {
            arguments,
            raw: &args_env.lines,
            target_args_env,
            project,
            index,
            name,
        };

        let (test, next) = test_action(&context, cursors)?;
        let (mut run, next) = run_action(&context, next)?;
        let (profile, next) = profile_action(&context, next)?;
        cursors = next;

        run.transitive_preview_references =
            transitive_preview_references(&test, &run, &profile, project);

        tracing::debug!(
            "Assembled scheme \"{}\": {} test targets, run launch target {:?}, profile launch target {:?}",
            name,
            test.test_targets.len(),
            run.launch_target.as_ref().map(|launch| &launch.primary.id),
            profile.launch_target.as_ref().map(|launch| &launch.primary.id),
        );

        scheme_infos.push(SchemeInfo {
            name: name.clone(),
            test,
            run,
            profile,
            execution_actions: execution_actions.get(name).cloned().unwrap_or_default(),
        });
    }

    debug_assert_eq!(cursors.lines.position(), args_env.lines.len());
    tracing::info!("Assembled {} custom schemes", scheme_infos.len());
    Ok(scheme_infos)
}

/// Positions into every flat array, threaded through the schemes in order
#[derive(Debug, Clone, Copy, Default)]
struct Cursors {
    lines: Cursor,
    test_build_targets: Cursor,
    test_arguments_enabled: Cursor,
    test_environment_enabled: Cursor,
    test_targets: Cursor,
    run_build_targets: Cursor,
    run_arguments_enabled: Cursor,
    run_environment_enabled: Cursor,
    profile_build_targets: Cursor,
    profile_arguments_enabled: Cursor,
    profile_environment_enabled: Cursor,
}

struct SchemeContext<'s, 'p> {
    arguments: &'s CustomSchemesArguments,
    raw: &'s [String],
    target_args_env: &'s TargetArgsAndEnv,
    project: &'p Project,
    index: usize,
    name: &'s str,
}

impl<'p> SchemeContext<'_, 'p> {
    fn targets(&self) -> &'p TargetsById {
        &self.project.targets_by_id
    }
}

fn test_action<'p>(ctx: &SchemeContext<'_, 'p>, cursors: Cursors) -> Result<(Test<'p>, Cursors)> {
    let arguments = ctx.arguments;
    let index = ctx.index;
    let mut next = cursors;

    let (build_targets, cursor) = targets_for_scheme(
        &arguments.test_build_targets,
        &arguments.test_build_target_counts,
        index,
        cursors.test_build_targets,
        ctx.targets(),
        "Test build only target",
    )?;
    next.test_build_targets = cursor;

    let (mut command_line_arguments, positions) = command_line_arguments(
        ctx.raw,
        &arguments.test_command_line_argument_counts,
        Some(arguments.test_command_line_argument_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.test_arguments_enabled,
        },
    );
    next.lines = positions.lines;
    next.test_arguments_enabled = positions.enabled;

    let (mut environment_variables, positions) = environment_variables(
        ctx.raw,
        &arguments.test_environment_variable_counts,
        Some(arguments.test_environment_variable_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.test_environment_enabled,
        },
    );
    next.lines = positions.lines;
    next.test_environment_enabled = positions.enabled;

    let (test_targets, cursor) = test_targets_for_scheme(ctx, cursors.test_targets)?;
    next.test_targets = cursor;

    // Without scheme level args/env, use what every test target agrees on
    if command_line_arguments.is_empty() {
        if let Some(inherited) = unanimous(&test_targets, |id| {
            ctx.target_args_env.arguments_for(id)
        }) {
            command_line_arguments = inherited;
        }
    }
    if environment_variables.is_empty() {
        if let Some(inherited) = unanimous(&test_targets, |id| {
            ctx.target_args_env.environment_for(id)
        }) {
            environment_variables = inherited;
        }
    }

    if arguments.test_environment_variables_include_defaults[index] {
        prepend_default_environment(&mut environment_variables);
    }

    let test = Test {
        build_targets,
        command_line_arguments,
        enable_address_sanitizer: arguments.test_address_sanitizer_enabled_states[index],
        enable_thread_sanitizer: arguments.test_thread_sanitizer_enabled_states[index],
        enable_ub_sanitizer: arguments.test_ub_sanitizer_enabled_states[index],
        environment_variables,
        test_targets,
        use_run_args_and_env: arguments.test_use_run_args_and_env_enabled_states[index],
        xcode_configuration: arguments.test_xcode_configurations[index].clone(),
    };
    Ok((test, next))
}

fn run_action<'p>(ctx: &SchemeContext<'_, 'p>, cursors: Cursors) -> Result<(Run<'p>, Cursors)> {
    let arguments = ctx.arguments;
    let index = ctx.index;
    let mut next = cursors;

    let (build_targets, cursor) = targets_for_scheme(
        &arguments.run_build_targets,
        &arguments.run_build_target_counts,
        index,
        cursors.run_build_targets,
        ctx.targets(),
        "Run build only target",
    )?;
    next.run_build_targets = cursor;

    let (mut command_line_arguments, positions) = command_line_arguments(
        ctx.raw,
        &arguments.run_command_line_argument_counts,
        Some(arguments.run_command_line_argument_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.run_arguments_enabled,
        },
    );
    next.lines = positions.lines;
    next.run_arguments_enabled = positions.enabled;

    let (mut environment_variables, positions) = environment_variables(
        ctx.raw,
        &arguments.run_environment_variable_counts,
        Some(arguments.run_environment_variable_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.run_environment_enabled,
        },
    );
    next.lines = positions.lines;
    next.run_environment_enabled = positions.enabled;

    let launch_target = match &arguments.run_launch_targets[index] {
        Some(id) => {
            let launch_target = resolve_launch_target(
                id,
                arguments.run_launch_extension_hosts[index].as_ref(),
                &ctx.project.extension_host_ids,
                ctx.targets(),
                &format!("Custom scheme \"{}\"'s run launch target", ctx.name),
            )?;
            inherit_from_launch_target(
                ctx,
                id,
                &mut command_line_arguments,
                &mut environment_variables,
            );
            Some(launch_target)
        }
        None => None,
    };

    if arguments.run_environment_variables_include_defaults[index] {
        prepend_default_environment(&mut environment_variables);
    }

    let run = Run {
        build_targets,
        command_line_arguments,
        custom_working_directory: arguments.run_working_directories[index].clone(),
        enable_address_sanitizer: arguments.run_address_sanitizer_enabled_states[index],
        enable_thread_sanitizer: arguments.run_thread_sanitizer_enabled_states[index],
        enable_ub_sanitizer: arguments.run_ub_sanitizer_enabled_states[index],
        environment_variables,
        launch_target,
        transitive_preview_references: Vec::new(),
        xcode_configuration: arguments.run_xcode_configurations[index].clone(),
    };
    Ok((run, next))
}

fn profile_action<'p>(
    ctx: &SchemeContext<'_, 'p>,
    cursors: Cursors,
) -> Result<(Profile<'p>, Cursors)> {
    let arguments = ctx.arguments;
    let index = ctx.index;
    let mut next = cursors;

    let (build_targets, cursor) = targets_for_scheme(
        &arguments.profile_build_targets,
        &arguments.profile_build_target_counts,
        index,
        cursors.profile_build_targets,
        ctx.targets(),
        "Profile build only target",
    )?;
    next.profile_build_targets = cursor;

    let (mut command_line_arguments, positions) = command_line_arguments(
        ctx.raw,
        &arguments.profile_command_line_argument_counts,
        Some(arguments.profile_command_line_argument_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.profile_arguments_enabled,
        },
    );
    next.lines = positions.lines;
    next.profile_arguments_enabled = positions.enabled;

    let (mut environment_variables, positions) = environment_variables(
        ctx.raw,
        &arguments.profile_environment_variable_counts,
        Some(arguments.profile_environment_variable_enabled_states.as_slice()),
        index,
        Positions {
            lines: next.lines,
            enabled: next.profile_environment_enabled,
        },
    );
    next.lines = positions.lines;
    next.profile_environment_enabled = positions.enabled;

    let launch_target = match &arguments.profile_launch_targets[index] {
        Some(id) => {
            let launch_target = resolve_launch_target(
                id,
                arguments.profile_launch_extension_hosts[index].as_ref(),
                &ctx.project.extension_host_ids,
                ctx.targets(),
                &format!("Custom scheme \"{}\"'s profile launch target", ctx.name),
            )?;
            inherit_from_launch_target(
                ctx,
                id,
                &mut command_line_arguments,
                &mut environment_variables,
            );
            Some(launch_target)
        }
        None => None,
    };

    if arguments.profile_environment_variables_include_defaults[index] {
        prepend_default_environment(&mut environment_variables);
    }

    let profile = Profile {
        build_targets,
        command_line_arguments,
        custom_working_directory: arguments.profile_working_directories[index].clone(),
        environment_variables,
        launch_target,
        use_run_args_and_env: arguments.profile_use_run_args_and_env_enabled_states[index],
        xcode_configuration: arguments.profile_xcode_configurations[index].clone(),
    };
    Ok((profile, next))
}

/// Only fills in what the scheme itself left empty
fn inherit_from_launch_target(
    ctx: &SchemeContext<'_, '_>,
    id: &TargetId,
    command_line_arguments: &mut Vec<CommandLineArgument>,
    environment_variables: &mut Vec<EnvironmentVariable>,
) {
    if command_line_arguments.is_empty() {
        if let Some(inherited) = ctx.target_args_env.arguments_for(id) {
            command_line_arguments.clone_from(inherited);
        }
    }
    if environment_variables.is_empty() {
        if let Some(inherited) = ctx.target_args_env.environment_for(id) {
            environment_variables.clone_from(inherited);
        }
    }
}

/// The list every test target declares identically, if there is one
fn unanimous<'t, T>(
    test_targets: &[TestTarget<'_>],
    lookup: impl Fn(&TargetId) -> Option<&'t Vec<T>>,
) -> Option<Vec<T>>
where
    T: PartialEq + Clone + 't,
{
    let first = lookup(&test_targets.first()?.target.id)?;
    test_targets
        .iter()
        .all(|test_target| lookup(&test_target.target.id) == Some(first))
        .then(|| first.clone())
}

fn targets_for_scheme<'p>(
    ids: &[TargetId],
    counts: &[usize],
    index: usize,
    cursor: Cursor,
    targets_by_id: &'p TargetsById,
    context: &str,
) -> Result<(Vec<&'p Target>, Cursor)> {
    let (ids, next) = slice_for_scheme(ids, counts, index, cursor);
    let targets = ids
        .iter()
        .map(|id| targets_by_id.value(id, context))
        .collect::<Result<Vec<_>>>()?;
    Ok((targets, next))
}

fn test_targets_for_scheme<'p>(
    ctx: &SchemeContext<'_, 'p>,
    cursor: Cursor,
) -> Result<(Vec<TestTarget<'p>>, Cursor)> {
    let arguments = ctx.arguments;

    // Enabled states are parallel to the test target IDs, so share the cursor
    let (ids, next) = slice_for_scheme(
        &arguments.test_targets,
        &arguments.test_target_counts,
        ctx.index,
        cursor,
    );
    let (enabled_states, _) = slice_for_scheme(
        &arguments.test_target_enabled_states,
        &arguments.test_target_counts,
        ctx.index,
        cursor,
    );

    let test_targets = ids
        .iter()
        .zip(enabled_states)
        .map(|(id, &enabled)| {
            Ok(TestTarget {
                target: ctx.targets().value(id, "Test target")?,
                enabled,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((test_targets, next))
}

/// Preview references of every target the scheme touches, deduplicated by
/// blueprint identifier in first-touch order
fn transitive_preview_references(
    test: &Test<'_>,
    run: &Run<'_>,
    profile: &Profile<'_>,
    project: &Project,
) -> Vec<BuildableReference> {
    if project.transitive_preview_references.is_empty() {
        return Vec::new();
    }

    let mut touched: IndexSet<&TargetId> = IndexSet::new();
    touched.extend(test.build_targets.iter().map(|target| &target.id));
    touched.extend(test.test_targets.iter().map(|test_target| &test_target.target.id));
    touched.extend(run.launch_target.iter().map(|launch| &launch.primary.id));
    touched.extend(run.build_targets.iter().map(|target| &target.id));
    touched.extend(profile.launch_target.iter().map(|launch| &launch.primary.id));
    touched.extend(profile.build_targets.iter().map(|target| &target.id));

    let mut seen = HashSet::new();
    touched
        .into_iter()
        .filter_map(|id| project.transitive_preview_references.get(id))
        .flatten()
        .filter(|reference| seen.insert(reference.blueprint_identifier.clone()))
        .cloned()
        .collect()
}
