//! Property drift between declarations and discovered instances

use crate::kind::ResourceKind;
use crate::resource::{ResourceDeclaration, ResourceInstance};
use serde::{Deserialize, Serialize};

/// One managed property whose observed value does not satisfy the
/// declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDrift {
    pub property: String,
    pub desired: String,
    pub observed: String,
}

/// Rendering used when the remote reported nothing for a property
pub const ABSENT: &str = "absent";

/// Compare every declared property against the instance.
///
/// Both sides are munged and compared with the property type's comparator.
/// Undeclared properties are unmanaged and never drift.
pub fn compute_drift(
    kind: &ResourceKind,
    declaration: &ResourceDeclaration,
    instance: &ResourceInstance,
) -> Vec<PropertyDrift> {
    let mut drift = Vec::new();
    for (name, desired) in &declaration.properties {
        let Some(spec) = kind.attribute(name) else {
            continue;
        };
        let comparator = spec.comparator();
        let observed = instance.get(name).map(|v| spec.munge(v.clone()));
        let in_sync = match &observed {
            Some(observed) => spec.in_sync(desired, observed),
            None => comparator.in_sync_when_absent(desired),
        };
        if !in_sync {
            log::debug!(
                "{} {name}: desired {desired:?}, observed {observed:?}",
                declaration.label()
            );
            drift.push(PropertyDrift {
                property: name.clone(),
                desired: comparator.describe_desired(desired),
                observed: observed
                    .as_ref()
                    .map(|o| comparator.describe_observed(o))
                    .unwrap_or_else(|| ABSENT.to_string()),
            });
        }
    }
    drift
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Resources to create
    pub creations: usize,
    /// Resources to destroy
    pub destructions: usize,
    /// Existing resources with drifted properties
    pub drifted: usize,
    /// Existing resources already converged
    pub unchanged: usize,
    /// Declarations rejected by validation
    pub rejected: usize,
}

impl DiffSummary {
    /// Total number of changes the commit phase would make
    pub fn total(&self) -> usize {
        self.creations + self.destructions
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }

    pub fn merge(&mut self, other: &DiffSummary) {
        self.creations += other.creations;
        self.destructions += other.destructions;
        self.drifted += other.drifted;
        self.unchanged += other.unchanged;
        self.rejected += other.rejected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttrType, AttributeSpec};
    use crate::value::Value;
    use std::collections::BTreeMap;

    static DISK: ResourceKind = ResourceKind::new(
        "disk",
        &[
            AttributeSpec::identity("name", "Disk name"),
            AttributeSpec::property("reserve", AttrType::Percent, "Reserve"),
            AttributeSpec::property("options", AttrType::Map, "Options"),
            AttributeSpec::property("schedule", AttrType::ScheduleMap, "Schedule"),
        ],
    );

    #[test]
    fn test_no_drift_when_converged() {
        let decl = ResourceDeclaration::new("disk", "d1")
            .with_property("reserve", Value::Int(20))
            .with_property("schedule", Value::map([("minutes", "0"), ("hours", "6")]));
        let instance = ResourceInstance::new("d1")
            .with("reserve", "20")
            .with("schedule", Value::map([("minutes", " "), ("hours", "6"), ("days", "2")]));
        assert!(compute_drift(&DISK, &decl, &instance).is_empty());
    }

    #[test]
    fn test_reports_drift() {
        let decl = ResourceDeclaration::new("disk", "d1")
            .with_property("options", Value::map([("nosnap", "on")]));
        let instance = ResourceInstance::new("d1").with("options", Value::map([("nosnap", "off")]));

        let drift = compute_drift(&DISK, &decl, &instance);
        assert_eq!(
            drift,
            vec![PropertyDrift {
                property: "options".into(),
                desired: "{nosnap: \"on\"}".into(),
                observed: "{nosnap: \"off\"}".into(),
            }]
        );
    }

    #[test]
    fn test_missing_observed_value() {
        let decl = ResourceDeclaration::new("disk", "d1").with_property("reserve", Value::Int(5));
        let drift = compute_drift(&DISK, &decl, &ResourceInstance::new("d1"));
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].observed, ABSENT);

        let decl = ResourceDeclaration::new("disk", "d1")
            .with_property("options", Value::Map(BTreeMap::new()));
        assert!(compute_drift(&DISK, &decl, &ResourceInstance::new("d1")).is_empty());
    }
}
