use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Opaque identifier of a build target
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for TargetId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Xcode product type identifier (`com.apple.product-type.*`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    Application,
    OnDemandInstallCapableApplication,
    Framework,
    StaticLibrary,
    DynamicLibrary,
    Tool,
    Bundle,
    UnitTestBundle,
    UiTestBundle,
    AppExtension,
    IntentsServiceExtension,
    MessagesExtension,
    TvExtension,
    ExtensionKitExtension,
    WatchApp,
    WatchKitExtension,
    Other(String),
}

const PRODUCT_TYPE_IDENTIFIERS: &[(&str, ProductType)] = &[
    ("com.apple.product-type.application", ProductType::Application),
    (
        "com.apple.product-type.application.on-demand-install-capable",
        ProductType::OnDemandInstallCapableApplication,
    ),
    ("com.apple.product-type.framework", ProductType::Framework),
    ("com.apple.product-type.library.static", ProductType::StaticLibrary),
    ("com.apple.product-type.library.dynamic", ProductType::DynamicLibrary),
    ("com.apple.product-type.tool", ProductType::Tool),
    ("com.apple.product-type.bundle", ProductType::Bundle),
    ("com.apple.product-type.bundle.unit-test", ProductType::UnitTestBundle),
    ("com.apple.product-type.bundle.ui-testing", ProductType::UiTestBundle),
    ("com.apple.product-type.app-extension", ProductType::AppExtension),
    (
        "com.apple.product-type.app-extension.intents-service",
        ProductType::IntentsServiceExtension,
    ),
    (
        "com.apple.product-type.app-extension.messages",
        ProductType::MessagesExtension,
    ),
    ("com.apple.product-type.tv-app-extension", ProductType::TvExtension),
    (
        "com.apple.product-type.extensionkit-extension",
        ProductType::ExtensionKitExtension,
    ),
    ("com.apple.product-type.application.watchapp2", ProductType::WatchApp),
    (
        "com.apple.product-type.watchkit2-extension",
        ProductType::WatchKitExtension,
    ),
];

impl ProductType {
    pub fn identifier(&self) -> &str {
        if let ProductType::Other(identifier) = self {
            return identifier;
        }
        PRODUCT_TYPE_IDENTIFIERS
            .iter()
            .find(|(_, product_type)| product_type == self)
            .map(|(identifier, _)| *identifier)
            .unwrap_or_default()
    }

    /// Whether a launch of this product has to go through an extension host
    pub fn needs_extension_host(&self) -> bool {
        matches!(
            self,
            ProductType::AppExtension
                | ProductType::IntentsServiceExtension
                | ProductType::MessagesExtension
                | ProductType::TvExtension
                | ProductType::ExtensionKitExtension
        )
    }
}

impl From<String> for ProductType {
    fn from(identifier: String) -> Self {
        PRODUCT_TYPE_IDENTIFIERS
            .iter()
            .find(|(known, _)| *known == identifier)
            .map(|(_, product_type)| product_type.clone())
            .unwrap_or(ProductType::Other(identifier))
    }
}

impl From<ProductType> for String {
    fn from(product_type: ProductType) -> Self {
        product_type.identifier().to_string()
    }
}

/// Handle identifying a target inside a scheme action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildableReference {
    pub blueprint_identifier: String,
    pub buildable_name: String,
    pub blueprint_name: String,
    pub referenced_container: String,
}

/// A node of the build graph, as supplied by the project model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Target {
    pub id: TargetId,
    #[serde(default)]
    pub label: String,
    pub product_type: ProductType,
    pub buildable_reference: BuildableReference,
}

impl Target {
    pub fn name(&self) -> &str {
        &self.buildable_reference.blueprint_name
    }
}

pub type TargetsById = HashMap<TargetId, Target>;

/// Lookup that reports which role a missing target id was expected to fill
pub trait TargetLookup {
    fn value(&self, id: &TargetId, context: &str) -> Result<&Target>;
}

impl TargetLookup for TargetsById {
    fn value(&self, id: &TargetId, context: &str) -> Result<&Target> {
        self.get(id).ok_or_else(|| Error::unknown_target(context, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_round_trips_identifiers() {
        let product_type = ProductType::from("com.apple.product-type.app-extension".to_string());
        assert_eq!(product_type, ProductType::AppExtension);
        assert_eq!(
            String::from(product_type),
            "com.apple.product-type.app-extension"
        );

        let unknown = ProductType::from("com.example.custom".to_string());
        assert_eq!(unknown, ProductType::Other("com.example.custom".to_string()));
        assert_eq!(unknown.identifier(), "com.example.custom");
    }

    #[test]
    fn test_needs_extension_host() {
        assert!(ProductType::AppExtension.needs_extension_host());
        assert!(ProductType::IntentsServiceExtension.needs_extension_host());
        assert!(ProductType::MessagesExtension.needs_extension_host());
        assert!(ProductType::TvExtension.needs_extension_host());
        assert!(ProductType::ExtensionKitExtension.needs_extension_host());
        assert!(!ProductType::Application.needs_extension_host());
        assert!(!ProductType::WatchKitExtension.needs_extension_host());
        assert!(!ProductType::Other("x".to_string()).needs_extension_host());
    }

    #[test]
    fn test_lookup_reports_context() {
        let targets = TargetsById::new();
        let err = targets
            .value(&TargetId::from("//app:App"), "Test target")
            .unwrap_err();
        assert_eq!(err.to_string(), "Test target (//app:App) not found in targets");
    }
}
