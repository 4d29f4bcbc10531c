//! In-sync comparison strategies
//!
//! Each attribute type maps to one [`Comparator`]. Scalars compare strictly
//! (after the attribute has munged both sides). Structured maps compare only
//! the keys the declaration mentions, and each structured type carries its
//! own table of API echo quirks.

use crate::attribute::AttrType;
use crate::value::Value;

/// Decides whether an observed value satisfies a desired one
pub trait Comparator: Send + Sync {
    /// Whether `observed` satisfies `desired`
    fn in_sync(&self, desired: &Value, observed: &Value) -> bool;

    /// Whether `desired` is satisfied when the remote reports nothing at all
    fn in_sync_when_absent(&self, _desired: &Value) -> bool {
        false
    }

    /// Render the desired value for diffs
    fn describe_desired(&self, desired: &Value) -> String {
        desired.first().inspect()
    }

    /// Render the observed value for diffs
    fn describe_observed(&self, observed: &Value) -> String {
        observed.first().inspect()
    }
}

/// Strict equality, for scalars, symbols and booleans
pub struct ExactComparator;

impl Comparator for ExactComparator {
    fn in_sync(&self, desired: &Value, observed: &Value) -> bool {
        desired == observed
    }
}

/// Strict equality for namespace mount points.
///
/// An unmounted volume reports no junction path at all, which satisfies a
/// desired `false`.
pub struct JunctionComparator;

impl Comparator for JunctionComparator {
    fn in_sync(&self, desired: &Value, observed: &Value) -> bool {
        desired == observed
    }

    fn in_sync_when_absent(&self, desired: &Value) -> bool {
        match desired.first() {
            Value::Bool(false) => true,
            Value::Str(s) => s == "false",
            _ => false,
        }
    }
}

/// Key subset comparison with exact values.
///
/// Extra observed keys are ignored; a desired key missing from the
/// observed map is a mismatch.
pub struct MapComparator;

impl Comparator for MapComparator {
    fn in_sync(&self, desired: &Value, observed: &Value) -> bool {
        let (Some(should), Some(is)) = (desired.first().as_map(), observed.first().as_map()) else {
            return false;
        };
        should.iter().all(|(key, want)| is.get(key) == Some(want))
    }

    fn in_sync_when_absent(&self, desired: &Value) -> bool {
        desired.first().as_map().is_some_and(|m| m.is_empty())
    }
}

/// Key subset comparison for snapshot schedules.
///
/// The filer reports an unset schedule slot as a single space, so an
/// observed `" "` satisfies a desired `"0"`. Any other value must equal the
/// desired value's string form.
pub struct ScheduleComparator;

const UNSET_SLOT: &str = " ";

impl Comparator for ScheduleComparator {
    fn in_sync(&self, desired: &Value, observed: &Value) -> bool {
        let (Some(should), Some(is)) = (desired.first().as_map(), observed.first().as_map()) else {
            return false;
        };
        should.iter().all(|(key, want)| {
            let want = want.to_string();
            match is.get(key) {
                Some(Value::Str(slot)) if slot == UNSET_SLOT && want == "0" => true,
                Some(Value::Str(slot)) => *slot == want,
                _ => false,
            }
        })
    }

    fn in_sync_when_absent(&self, desired: &Value) -> bool {
        desired.first().as_map().is_some_and(|m| m.is_empty())
    }
}

/// Comparator registry keyed by attribute type
pub fn comparator_for(ty: &AttrType) -> &'static dyn Comparator {
    match ty {
        AttrType::Map => &MapComparator,
        AttrType::ScheduleMap => &ScheduleComparator,
        AttrType::JunctionPath => &JunctionComparator,
        AttrType::Name
        | AttrType::Size
        | AttrType::Percent
        | AttrType::Enum(_)
        | AttrType::Text => &ExactComparator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_unmounted_satisfies_false_junction() {
        assert!(JunctionComparator.in_sync_when_absent(&Value::Bool(false)));
        assert!(JunctionComparator.in_sync_when_absent(&Value::from("false")));
        assert!(!JunctionComparator.in_sync_when_absent(&Value::from("/vol1")));
        assert!(!ExactComparator.in_sync_when_absent(&Value::Bool(false)));
        assert!(JunctionComparator.in_sync(&Value::from("/vol1"), &Value::from("/vol1")));
        assert!(!JunctionComparator.in_sync(&Value::Bool(false), &Value::from("/vol1")));
    }

    #[test]
    fn test_map_ignores_extra_observed_keys() {
        let desired = Value::map([("a", 1_i64)]);
        let observed = Value::map([("a", 1_i64), ("b", 2_i64)]);
        assert!(MapComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_map_value_mismatch() {
        let desired = Value::map([("a", 1_i64)]);
        let observed = Value::map([("a", 2_i64)]);
        assert!(!MapComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_map_missing_observed_key() {
        let desired = Value::map([("a", "1"), ("c", "3")]);
        let observed = Value::map([("a", "1")]);
        assert!(!MapComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_map_empty_desired_always_in_sync() {
        let desired = Value::Map(BTreeMap::new());
        let observed = Value::map([("anything", "x")]);
        assert!(MapComparator.in_sync(&desired, &observed));
        assert!(MapComparator.in_sync_when_absent(&desired));
        assert!(!MapComparator.in_sync_when_absent(&Value::map([("a", "1")])));
    }

    #[test]
    fn test_map_uses_first_list_element() {
        let desired = Value::List(vec![Value::map([("a", "1")]), Value::map([("a", "9")])]);
        let observed = Value::map([("a", "1")]);
        assert!(MapComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_map_rejects_non_maps() {
        assert!(!MapComparator.in_sync(&Value::from("a"), &Value::map([("a", "1")])));
        assert!(!MapComparator.in_sync(&Value::map([("a", "1")]), &Value::from("a")));
    }

    #[test]
    fn test_schedule_blank_slot_equals_zero() {
        let desired = Value::map([("minutes", "0")]);
        let observed = Value::map([("minutes", " ")]);
        assert!(ScheduleComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_schedule_blank_slot_is_not_five() {
        let desired = Value::map([("minutes", "5")]);
        let observed = Value::map([("minutes", " ")]);
        assert!(!ScheduleComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_schedule_compares_string_form() {
        let desired = Value::map([("hours", Value::Int(6)), ("weeks", Value::Int(0))]);
        let observed = Value::map([("hours", "6"), ("weeks", " "), ("days", "2")]);
        assert!(ScheduleComparator.in_sync(&desired, &observed));

        let observed = Value::map([("hours", "8"), ("weeks", " ")]);
        assert!(!ScheduleComparator.in_sync(&desired, &observed));
    }

    #[test]
    fn test_exact() {
        assert!(ExactComparator.in_sync(&Value::from("online"), &Value::from("online")));
        assert!(!ExactComparator.in_sync(&Value::from("online"), &Value::from("offline")));
        assert!(!ExactComparator.in_sync(&Value::Int(5), &Value::from("5")));
        assert!(!ExactComparator.in_sync_when_absent(&Value::from("online")));
    }

    #[test]
    fn test_describe_uses_first_element() {
        let desired = Value::List(vec![Value::map([("a", "1")])]);
        assert_eq!(MapComparator.describe_desired(&desired), "{a: \"1\"}");
        assert_eq!(
            MapComparator.describe_observed(&Value::map([("a", "1"), ("b", "2")])),
            "{a: \"1\", b: \"2\"}"
        );
    }

    #[test]
    fn test_registry() {
        let desired = Value::map([("minutes", "0")]);
        let observed = Value::map([("minutes", " ")]);
        assert!(comparator_for(&AttrType::ScheduleMap).in_sync(&desired, &observed));
        assert!(!comparator_for(&AttrType::Map).in_sync(&desired, &observed));
    }
}
