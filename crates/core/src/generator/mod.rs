//! End-to-end scheme generation
//!
//! [`Generator`] wires the two replaceable steps together: a
//! [`SchemeInfoSource`] that resolves scheme infos from the decoded inputs,
//! and a [`SchemeRenderer`] that turns each planned scheme into text.

pub mod render;

pub use render::{JsonSchemeRenderer, SchemeRenderer};

use crate::arguments::{CustomSchemesArguments, TargetArgsAndEnv};
use crate::assembly::calculate_scheme_infos;
use crate::config::Project;
use crate::decode::Lines;
use crate::error::Result;
use crate::plan::create_scheme_plan;
use crate::types::SchemeInfo;

/// Everything read up front for one generation run
#[derive(Debug, Clone, Default)]
pub struct GeneratorInputs {
    pub project: Project,
    pub arguments: CustomSchemesArguments,
    pub target_args_env: TargetArgsAndEnv,
    pub args_env: Lines,
    pub execution_actions: Lines,
}

/// Produces the resolved scheme infos for a run
pub trait SchemeInfoSource {
    fn scheme_infos<'a>(&self, inputs: &'a GeneratorInputs) -> Result<Vec<SchemeInfo<'a>>>;
}

/// Resolves scheme infos from the count-encoded custom scheme arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomSchemeInfos;

impl SchemeInfoSource for CustomSchemeInfos {
    fn scheme_infos<'a>(&self, inputs: &'a GeneratorInputs) -> Result<Vec<SchemeInfo<'a>>> {
        calculate_scheme_infos(
            &inputs.arguments,
            &inputs.args_env,
            &inputs.execution_actions,
            &inputs.target_args_env,
            &inputs.project,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScheme {
    pub name: String,
    pub contents: String,
}

pub struct Generator {
    source: Box<dyn SchemeInfoSource>,
    renderer: Box<dyn SchemeRenderer>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Box::new(CustomSchemeInfos), Box::new(JsonSchemeRenderer::default()))
    }
}

impl Generator {
    pub fn new(source: Box<dyn SchemeInfoSource>, renderer: Box<dyn SchemeRenderer>) -> Self {
        Self { source, renderer }
    }

    /// Renders every scheme in declaration order. The first failure aborts
    /// the run and nothing is returned.
    pub fn generate(&self, inputs: &GeneratorInputs) -> Result<Vec<RenderedScheme>> {
        let scheme_infos = self.source.scheme_infos(inputs)?;
        let project = &inputs.project;

        let rendered = scheme_infos
            .iter()
            .map(|scheme_info| {
                let plan = create_scheme_plan(
                    &project.default_xcode_configuration,
                    &project.extension_point_identifiers,
                    scheme_info,
                )?;
                Ok(RenderedScheme {
                    name: plan.name.clone(),
                    contents: self.renderer.render(&plan)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Rendered {} schemes with the {} renderer",
            rendered.len(),
            self.renderer.name()
        );
        Ok(rendered)
    }
}
