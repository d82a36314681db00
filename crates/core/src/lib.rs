//! schemegen - Generates Xcode custom schemes from count-encoded input
//!
//! This crate provides functionality to:
//! - Decode count-encoded flat arrays of per-scheme arguments, environment
//!   variables and execution actions
//! - Resolve launch targets, extension hosts and inherited defaults into
//!   [`SchemeInfo`]s
//! - Plan the build, test, launch, profile, analyze and archive actions of
//!   each scheme and render them
pub mod arguments;
pub mod assembly;
pub mod config;
pub mod decode;
pub mod error;
pub mod generator;
pub mod plan;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use arguments::{ArgsAndEnvArguments, CustomSchemesArguments, TargetArgsAndEnv};
pub use assembly::calculate_scheme_infos;
pub use config::{Project, ProjectModel};
pub use decode::{FileLines, LineSource, Lines};
pub use generator::{
    CustomSchemeInfos, Generator, GeneratorInputs, JsonSchemeRenderer, RenderedScheme,
    SchemeInfoSource, SchemeRenderer,
};
pub use plan::{SchemePlan, create_scheme_plan};
