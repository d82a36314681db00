use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{BuildableReference, Target, TargetId, TargetsById};

pub const DEFAULT_XCODE_CONFIGURATION: &str = "Debug";

fn default_xcode_configuration() -> String {
    DEFAULT_XCODE_CONFIGURATION.to_string()
}

/// How an extension is launched through its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtensionPointIdentifier {
    pub debugging_mode: u32,
    pub remote_bundle_identifier: String,
}

/// On-disk project model, as written by the build system integration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectModel {
    #[serde(default = "default_xcode_configuration")]
    pub default_xcode_configuration: String,
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Extension target ID -> target IDs allowed to host it
    #[serde(default)]
    pub extension_host_ids: HashMap<TargetId, Vec<TargetId>>,
    #[serde(default)]
    pub extension_point_identifiers: HashMap<TargetId, ExtensionPointIdentifier>,
    #[serde(default)]
    pub transitive_preview_references: HashMap<TargetId, Vec<BuildableReference>>,
}

impl ProjectModel {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading project model from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse project model: {e}")))
    }

    /// Indexes the targets by ID, rejecting duplicate IDs
    pub fn into_project(self) -> Result<Project> {
        let mut targets_by_id = TargetsById::with_capacity(self.targets.len());
        for target in self.targets {
            if let Some(existing) = targets_by_id.insert(target.id.clone(), target) {
                return Err(Error::Config(format!(
                    "Duplicate target ID in project model: {}",
                    existing.id
                )));
            }
        }

        tracing::debug!("Project model has {} targets", targets_by_id.len());
        Ok(Project {
            default_xcode_configuration: self.default_xcode_configuration,
            targets_by_id,
            extension_host_ids: self.extension_host_ids,
            extension_point_identifiers: self.extension_point_identifiers,
            transitive_preview_references: self.transitive_preview_references,
        })
    }
}

/// Project model with targets indexed for lookup
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub default_xcode_configuration: String,
    pub targets_by_id: TargetsById,
    pub extension_host_ids: HashMap<TargetId, Vec<TargetId>>,
    pub extension_point_identifiers: HashMap<TargetId, ExtensionPointIdentifier>,
    pub transitive_preview_references: HashMap<TargetId, Vec<BuildableReference>>,
}

impl Project {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        ProjectModel::load_from_file(path)?.into_project()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductType;
    use std::fs;
    use tempfile::TempDir;

    const MODEL: &str = r#"{
        "targets": [
            {
                "id": "//app:App",
                "label": "//app:App",
                "product_type": "com.apple.product-type.application",
                "buildable_reference": {
                    "blueprint_identifier": "A1",
                    "buildable_name": "App.app",
                    "blueprint_name": "App",
                    "referenced_container": "container:App.xcodeproj"
                }
            },
            {
                "id": "//app:Widget",
                "product_type": "com.apple.product-type.app-extension",
                "buildable_reference": {
                    "blueprint_identifier": "W1",
                    "buildable_name": "Widget.appex",
                    "blueprint_name": "Widget",
                    "referenced_container": "container:App.xcodeproj"
                }
            }
        ],
        "extension_host_ids": { "//app:Widget": ["//app:App"] },
        "extension_point_identifiers": {
            "//app:Widget": { "debugging_mode": 2, "remote_bundle_identifier": "com.apple.springboard" }
        }
    }"#;

    #[test]
    fn test_load_project_model() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.json");
        fs::write(&path, MODEL).unwrap();

        let project = Project::load_from_file(&path).unwrap();

        assert_eq!(project.default_xcode_configuration, "Debug");
        assert_eq!(project.targets_by_id.len(), 2);
        let widget = &project.targets_by_id[&TargetId::from("//app:Widget")];
        assert_eq!(widget.product_type, ProductType::AppExtension);
        assert!(widget.label.is_empty());
        assert_eq!(
            project.extension_host_ids[&TargetId::from("//app:Widget")],
            vec![TargetId::from("//app:App")]
        );
        assert!(project.transitive_preview_references.is_empty());
    }

    #[test]
    fn test_duplicate_target_ids_are_rejected() {
        let mut model = ProjectModel::from_json(MODEL).unwrap();
        let duplicate = model.targets[0].clone();
        model.targets.push(duplicate);

        let err = model.into_project().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ProjectModel::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Failed to parse project model"));
    }
}
