use anyhow::{Context, Result};
use tracing::debug;

use schemegen_core::{FileLines, GeneratorInputs, Lines, Project};

use crate::cli::InputArgs;

/// Reads the project model and every line file named on the command line
pub fn load_inputs(inputs: InputArgs) -> Result<GeneratorInputs> {
    let project = Project::load_from_file(&inputs.project).with_context(|| {
        format!(
            "Failed to load project model from {}",
            inputs.project.display()
        )
    })?;

    let args_env = read_lines(&inputs.args_env_file)?;
    let execution_actions = read_lines(&inputs.execution_actions_file)?;

    inputs
        .target_args_env
        .validate()
        .context("Invalid target arguments and environment")?;
    let target_args_env = match &inputs.target_args_env_file {
        Some(path) => {
            let lines = read_lines(path)?;
            inputs
                .target_args_env
                .calculate(&lines.description, &lines.lines)
        }
        None => inputs
            .target_args_env
            .calculate("<no --target-args-env-file>", &[]),
    }
    .context("Failed to decode target arguments and environment")?;

    debug!(
        "Loaded {} targets and {} custom scheme names",
        project.targets_by_id.len(),
        inputs.schemes.scheme_count()
    );

    Ok(GeneratorInputs {
        project,
        arguments: inputs.schemes,
        target_args_env,
        args_env,
        execution_actions,
    })
}

fn read_lines(path: &std::path::Path) -> Result<Lines> {
    Lines::read(&FileLines::new(path))
        .with_context(|| format!("Failed to read {}", path.display()))
}
