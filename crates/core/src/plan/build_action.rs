use indexmap::IndexMap;
use serde::Serialize;
use std::ops::{BitOr, BitOrAssign};

use super::natural_order::localized_standard_cmp;
use crate::types::BuildableReference;

/// Which scheme actions a build action entry is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BuildFor {
    pub running: bool,
    pub testing: bool,
    pub profiling: bool,
    pub analyzing: bool,
}

impl BuildFor {
    pub const NONE: BuildFor = BuildFor {
        running: false,
        testing: false,
        profiling: false,
        analyzing: false,
    };

    pub const RUNNING: BuildFor = BuildFor {
        running: true,
        ..BuildFor::NONE
    };

    pub const TESTING: BuildFor = BuildFor {
        testing: true,
        ..BuildFor::NONE
    };

    pub const PROFILING: BuildFor = BuildFor {
        profiling: true,
        ..BuildFor::NONE
    };

    pub const ANALYZING: BuildFor = BuildFor {
        analyzing: true,
        ..BuildFor::NONE
    };

    pub fn union(self, other: BuildFor) -> BuildFor {
        BuildFor {
            running: self.running || other.running,
            testing: self.testing || other.testing,
            profiling: self.profiling || other.profiling,
            analyzing: self.analyzing || other.analyzing,
        }
    }

    pub fn is_empty(self) -> bool {
        self == BuildFor::NONE
    }
}

impl BitOr for BuildFor {
    type Output = BuildFor;

    fn bitor(self, rhs: BuildFor) -> BuildFor {
        self.union(rhs)
    }
}

impl BitOrAssign for BuildFor {
    fn bitor_assign(&mut self, rhs: BuildFor) {
        *self = self.union(rhs);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildActionEntry {
    pub buildable_reference: BuildableReference,
    pub build_for: BuildFor,
}

/// Build action entries keyed by blueprint identifier, in first-insertion
/// order
#[derive(Debug, Clone, Default)]
pub struct BuildActionEntries {
    entries: IndexMap<String, BuildActionEntry>,
}

impl BuildActionEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `build_for` to the entry for `reference`, creating it at the end
    /// if this is the first time the reference is seen
    pub fn include(&mut self, reference: &BuildableReference, build_for: BuildFor) {
        self.entries
            .entry(reference.blueprint_identifier.clone())
            .or_insert_with(|| BuildActionEntry {
                buildable_reference: reference.clone(),
                build_for: BuildFor::NONE,
            })
            .build_for |= build_for;
    }

    pub fn get(&self, blueprint_identifier: &str) -> Option<&BuildActionEntry> {
        self.entries.get(blueprint_identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the entries into their final order.
    ///
    /// The first inserted entry stays first, since it decides the icon Xcode
    /// shows for the scheme. The rest are sorted by blueprint name.
    pub fn into_ordered(self) -> Vec<BuildActionEntry> {
        let mut entries: Vec<BuildActionEntry> = self.entries.into_values().collect();
        if entries.len() > 1 {
            entries[1..].sort_by(|lhs, rhs| {
                localized_standard_cmp(
                    &lhs.buildable_reference.blueprint_name,
                    &rhs.buildable_reference.blueprint_name,
                )
            });
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str, name: &str) -> BuildableReference {
        BuildableReference {
            blueprint_identifier: id.to_string(),
            buildable_name: format!("{name}.app"),
            blueprint_name: name.to_string(),
            referenced_container: "container:App.xcodeproj".to_string(),
        }
    }

    #[test]
    fn test_build_for_union() {
        let build_for = BuildFor::RUNNING | BuildFor::ANALYZING;
        assert!(build_for.running && build_for.analyzing);
        assert!(!build_for.testing && !build_for.profiling);
        assert_eq!(build_for.union(BuildFor::NONE), build_for);
        assert!(BuildFor::NONE.is_empty());
    }

    #[test]
    fn test_include_unions_capabilities() {
        let mut entries = BuildActionEntries::new();
        let app = reference("A", "App");

        entries.include(&app, BuildFor::RUNNING | BuildFor::ANALYZING);
        entries.include(&app, BuildFor::PROFILING);

        assert_eq!(entries.len(), 1);
        let entry = entries.get("A").unwrap();
        assert_eq!(
            entry.build_for,
            BuildFor {
                running: true,
                testing: false,
                profiling: true,
                analyzing: true,
            }
        );
    }

    #[test]
    fn test_first_entry_stays_first() {
        let mut entries = BuildActionEntries::new();
        entries.include(&reference("Z", "Zeta"), BuildFor::RUNNING);
        entries.include(&reference("L10", "Lib10"), BuildFor::TESTING);
        entries.include(&reference("A", "alpha"), BuildFor::TESTING);
        entries.include(&reference("L2", "Lib2"), BuildFor::TESTING);

        let names: Vec<String> = entries
            .into_ordered()
            .into_iter()
            .map(|entry| entry.buildable_reference.blueprint_name)
            .collect();
        assert_eq!(names, vec!["Zeta", "alpha", "Lib2", "Lib10"]);
    }

    #[test]
    fn test_single_and_empty_entries() {
        assert!(BuildActionEntries::new().into_ordered().is_empty());

        let mut entries = BuildActionEntries::new();
        entries.include(&reference("A", "App"), BuildFor::RUNNING);
        assert_eq!(entries.into_ordered().len(), 1);
    }
}
