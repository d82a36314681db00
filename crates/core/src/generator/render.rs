use crate::error::{Error, Result};
use crate::plan::SchemePlan;

/// Turns a planned scheme into the text written for it
pub trait SchemeRenderer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn render(&self, plan: &SchemePlan) -> Result<String>;

    /// File extension for rendered output, without the dot
    fn extension(&self) -> &'static str {
        "json"
    }
}

/// Renders scheme plans as JSON documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonSchemeRenderer {
    pub pretty: bool,
}

impl Default for JsonSchemeRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl SchemeRenderer for JsonSchemeRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, plan: &SchemePlan) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(plan)
        } else {
            serde_json::to_string(plan)
        };
        rendered.map_err(|e| Error::Render(format!("Failed to render scheme \"{}\": {e}", plan.name)))
    }
}
