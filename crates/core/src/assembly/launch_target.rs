use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{LaunchTarget, TargetId, TargetLookup, TargetsById};

/// Resolves a run/profile launch target and its extension host.
///
/// Extension-style products can only be launched through a host, and the
/// host has to be one of the hosts registered for that extension.
pub fn resolve_launch_target<'a>(
    id: &TargetId,
    extension_host: Option<&TargetId>,
    extension_host_ids: &HashMap<TargetId, Vec<TargetId>>,
    targets_by_id: &'a TargetsById,
    context: &str,
) -> Result<LaunchTarget<'a>> {
    let primary = targets_by_id.value(id, context)?;

    if primary.product_type.needs_extension_host() && extension_host.is_none() {
        return Err(Error::MissingExtensionHost {
            context: context.to_string(),
            id: id.clone(),
        });
    }

    let extension_host = match extension_host {
        Some(host_id) => {
            let is_registered = extension_host_ids
                .get(id)
                .is_some_and(|hosts| hosts.contains(host_id));
            if !is_registered {
                return Err(Error::InvalidExtensionHost {
                    context: context.to_string(),
                    id: id.clone(),
                    host: host_id.clone(),
                });
            }
            Some(targets_by_id.value(host_id, &format!("{context} extension host"))?)
        }
        None => None,
    };

    tracing::debug!(
        "Resolved launch target {} (extension host: {:?})",
        id,
        extension_host.map(|host| &host.id)
    );
    Ok(LaunchTarget {
        primary,
        extension_host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildableReference, ProductType, Target};

    fn target(id: &str, product_type: ProductType) -> Target {
        Target {
            id: TargetId::from(id),
            label: id.to_string(),
            product_type,
            buildable_reference: BuildableReference {
                blueprint_identifier: format!("{id}-bp"),
                buildable_name: id.to_string(),
                blueprint_name: id.to_string(),
                referenced_container: "container:P.xcodeproj".to_string(),
            },
        }
    }

    fn fixture() -> (TargetsById, HashMap<TargetId, Vec<TargetId>>) {
        let targets = [
            target("App", ProductType::Application),
            target("OtherApp", ProductType::Application),
            target("Widget", ProductType::AppExtension),
        ]
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect();
        let hosts = HashMap::from([(TargetId::from("Widget"), vec![TargetId::from("App")])]);
        (targets, hosts)
    }

    #[test]
    fn test_plain_launch_target() {
        let (targets, hosts) = fixture();

        let launch = resolve_launch_target(&TargetId::from("App"), None, &hosts, &targets, "Run")
            .unwrap();

        assert_eq!(launch.primary.id, TargetId::from("App"));
        assert!(launch.extension_host.is_none());
    }

    #[test]
    fn test_hosted_launch_target() {
        let (targets, hosts) = fixture();

        let launch = resolve_launch_target(
            &TargetId::from("Widget"),
            Some(&TargetId::from("App")),
            &hosts,
            &targets,
            "Run",
        )
        .unwrap();

        assert_eq!(launch.extension_host.unwrap().id, TargetId::from("App"));
    }

    #[test]
    fn test_extension_without_host_fails() {
        let (targets, hosts) = fixture();

        let err = resolve_launch_target(&TargetId::from("Widget"), None, &hosts, &targets, "Run")
            .unwrap_err();

        assert!(matches!(err, Error::MissingExtensionHost { .. }));
        assert_eq!(
            err.to_string(),
            "Run (Widget) is an app extension and requires `extension_host` to be set"
        );
    }

    #[test]
    fn test_unregistered_host_fails() {
        let (targets, hosts) = fixture();

        let err = resolve_launch_target(
            &TargetId::from("Widget"),
            Some(&TargetId::from("OtherApp")),
            &hosts,
            &targets,
            "Run",
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidExtensionHost { .. }));
        assert_eq!(
            err.to_string(),
            "Run `extension_host` (OtherApp) does not host the extension (Widget)"
        );
    }

    #[test]
    fn test_unknown_primary_fails() {
        let (targets, hosts) = fixture();

        let err = resolve_launch_target(
            &TargetId::from("Missing"),
            None,
            &hosts,
            &targets,
            "Run launch target",
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownTarget { .. }));
    }
}
