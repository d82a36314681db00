use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use schemegen_core::{ArgsAndEnvArguments, CustomSchemesArguments};

use crate::commands::{generate_command, resolve_command};

#[derive(Parser, Debug)]
#[command(name = "schemegen")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Files and count-encoded arrays describing the custom schemes
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the project model JSON file
    #[arg(long)]
    pub project: PathBuf,

    /// File with the test, run and profile arguments and environment
    /// variables of every custom scheme, one value per line
    #[arg(long)]
    pub args_env_file: PathBuf,

    /// File with a title line and a script line per execution action
    #[arg(long)]
    pub execution_actions_file: PathBuf,

    /// File with the arguments and environment variables declared on targets
    #[arg(long)]
    pub target_args_env_file: Option<PathBuf>,

    #[command(flatten)]
    pub target_args_env: ArgsAndEnvArguments,

    #[command(flatten)]
    pub schemes: CustomSchemesArguments,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a scheme file for every custom scheme
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory to write `<scheme>.json` files to (prints one JSON array
        /// to stdout if omitted)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Write single-line JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the resolved custom schemes as JSON without planning them
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Generate {
                inputs,
                output_dir,
                compact,
            } => generate_command(inputs, output_dir.as_deref(), compact),
            Commands::Resolve { inputs } => resolve_command(inputs),
        }
    }
}
