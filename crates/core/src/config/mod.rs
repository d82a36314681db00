//! Project model configuration for schemegen

pub mod project;

// Re-export main types
pub use project::{
    DEFAULT_XCODE_CONFIGURATION, ExtensionPointIdentifier, Project, ProjectModel,
};
