use clap::Args;
use std::collections::HashMap;

use super::{args_env_line_count, check_counts_len, sum};
use crate::decode::{Positions, command_line_arguments, environment_variables};
use crate::error::{Error, Result};
use crate::types::{CommandLineArgument, EnvironmentVariable, TargetId};

/// Arguments and environment declared directly on targets
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ArgsAndEnvArguments {
    /// Target IDs for all targets that have command-line arguments
    #[arg(long, num_args = 1..)]
    pub args_targets: Vec<TargetId>,

    /// Number of command-line arguments per target in <args-targets>
    #[arg(long, num_args = 1..)]
    pub arg_counts: Vec<usize>,

    /// Target IDs for all targets that have environment variables
    #[arg(long, num_args = 1..)]
    pub env_targets: Vec<TargetId>,

    /// Number of environment variables per target in <env-targets>
    #[arg(long, num_args = 1..)]
    pub env_counts: Vec<usize>,
}

/// Side table of per-target arguments and environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetArgsAndEnv {
    pub command_line_arguments: HashMap<TargetId, Vec<CommandLineArgument>>,
    pub environment_variables: HashMap<TargetId, Vec<EnvironmentVariable>>,
}

impl TargetArgsAndEnv {
    pub fn arguments_for(&self, id: &TargetId) -> Option<&Vec<CommandLineArgument>> {
        self.command_line_arguments.get(id)
    }

    pub fn environment_for(&self, id: &TargetId) -> Option<&Vec<EnvironmentVariable>> {
        self.environment_variables.get(id)
    }
}

impl ArgsAndEnvArguments {
    pub fn validate(&self) -> Result<()> {
        check_counts_len("arg-counts", &self.arg_counts, "args-targets", self.args_targets.len())?;
        check_counts_len("env-counts", &self.env_counts, "env-targets", self.env_targets.len())
    }

    /// Decodes the side table from its line file: every target's arguments
    /// first, then every target's (key, value) pairs.
    pub fn calculate(&self, description: &str, raw: &[String]) -> Result<TargetArgsAndEnv> {
        let arg_counts_sum = sum("arg-counts", &self.arg_counts)?;
        let env_counts_sum = sum("env-counts", &self.env_counts)?;
        let expected = args_env_line_count(arg_counts_sum, env_counts_sum, "env-counts")?;
        if expected != raw.len() {
            return Err(Error::Precondition(format!(
                "Number of lines in \"{description}\" ({}) does not match what is specified with <arg-counts> ({arg_counts_sum}) and <env-counts> ({env_counts_sum}). It should equal {expected}.",
                raw.len()
            )));
        }

        let mut positions = Positions::default();
        let mut table = TargetArgsAndEnv::default();

        for (index, id) in self.args_targets.iter().enumerate() {
            let (arguments, next) =
                command_line_arguments(raw, &self.arg_counts, None, index, positions);
            positions = next;
            table.command_line_arguments.insert(id.clone(), arguments);
        }

        for (index, id) in self.env_targets.iter().enumerate() {
            let (variables, next) =
                environment_variables(raw, &self.env_counts, None, index, positions);
            positions = next;
            table.environment_variables.insert(id.clone(), variables);
        }

        tracing::debug!(
            "Decoded target args for {} targets and env for {} targets",
            table.command_line_arguments.len(),
            table.environment_variables.len()
        );
        Ok(table)
    }
}
