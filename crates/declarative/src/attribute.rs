//! Attribute model
//!
//! Every resource kind is a static table of [`AttributeSpec`]s. Validation,
//! normalization ("munging") and comparison all dispatch on the attribute's
//! [`AttrType`] tag.

use crate::compare::{Comparator, comparator_for};
use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("name regex is valid"));

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[kmgt]$").expect("size regex is valid"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digits regex is valid"));

static SIGNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-0-9]+$").expect("signed number regex is valid"));

/// How an attribute participates in reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The unique key within the kind
    Identity,
    /// Set once at creation, never compared
    Parameter,
    /// Compared on every run
    Property,
}

/// Semantic type of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// Object name: ASCII letters, digits and underscore
    Name,
    /// Size with unit suffix, e.g. `20g`
    Size,
    /// Integer percentage in `0..=100`
    Percent,
    /// Absolute namespace path, or `false` for "not mounted"
    JunctionPath,
    /// One of a fixed set of symbols
    Enum(&'static [&'static str]),
    /// Free text
    Text,
    /// Structured key/value map, compared strictly per key
    Map,
    /// Snapshot schedule map, compared with the filer's blank-slot tolerance
    ScheduleMap,
}

/// One parameter or property definition
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub role: Role,
    pub ty: AttrType,
    /// Must be known (declared or discovered) before a create
    pub required: bool,
    pub description: &'static str,
}

impl AttributeSpec {
    pub const fn identity(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            role: Role::Identity,
            ty: AttrType::Name,
            required: true,
            description,
        }
    }

    pub const fn parameter(name: &'static str, ty: AttrType, description: &'static str) -> Self {
        Self {
            name,
            role: Role::Parameter,
            ty,
            required: false,
            description,
        }
    }

    pub const fn property(name: &'static str, ty: AttrType, description: &'static str) -> Self {
        Self {
            name,
            role: Role::Property,
            ty,
            required: false,
            description,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check a candidate value against the attribute's legal value space.
    ///
    /// Returns a message describing the rejection.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self.ty {
            AttrType::Name => match value.as_str() {
                Some(s) if NAME_RE.is_match(s) => Ok(()),
                _ => Err(format!("{} is not a valid {} name", value.inspect(), self.name)),
            },
            AttrType::Size => match value.as_str() {
                Some(s) if SIZE_RE.is_match(s) => Ok(()),
                _ => Err(format!(
                    "{} is not a valid size, expected digits followed by k, m, g or t",
                    value.inspect()
                )),
            },
            AttrType::Percent => {
                let digits = match value {
                    Value::Int(i) => i.to_string(),
                    Value::Str(s) => s.clone(),
                    _ => String::new(),
                };
                if !DIGITS_RE.is_match(&digits) {
                    return Err(format!("{} is not a valid {}", value.inspect(), self.name));
                }
                match digits.parse::<u64>() {
                    Ok(n) if n <= 100 => Ok(()),
                    _ => Err(format!("{} percentage must be between 0 and 100", self.name)),
                }
            }
            AttrType::JunctionPath => match value {
                Value::Bool(false) => Ok(()),
                Value::Str(s) if s == "false" || s.starts_with('/') => Ok(()),
                _ => Err(format!(
                    "{} is not a valid {}, expected an absolute path or false",
                    value.inspect(),
                    self.name
                )),
            },
            AttrType::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => Err(format!(
                    "{} is not a valid {}, expected one of: {}",
                    value.inspect(),
                    self.name,
                    allowed.join(", ")
                )),
            },
            AttrType::Text => match value {
                Value::Str(_) => Ok(()),
                _ => Err(format!("{} must be a string", self.name)),
            },
            AttrType::Map | AttrType::ScheduleMap => {
                let all_maps = match value {
                    Value::Map(_) => true,
                    Value::List(items) => {
                        !items.is_empty() && items.iter().all(|v| matches!(v, Value::Map(_)))
                    }
                    _ => false,
                };
                if all_maps {
                    Ok(())
                } else {
                    Err(format!("{} property must be a hash", self.name))
                }
            }
        }
    }

    /// Normalize a value. Only meaningful after [`validate`](Self::validate)
    /// accepted it; observed values go through the same path so both sides
    /// of a comparison share one representation.
    pub fn munge(&self, value: Value) -> Value {
        match (self.ty, value) {
            (AttrType::Percent, Value::Str(s)) if SIGNED_RE.is_match(&s) => match s.parse() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Str(s),
            },
            (AttrType::JunctionPath, Value::Str(s)) if s == "false" => Value::Bool(false),
            (_, other) => other,
        }
    }

    pub fn comparator(&self) -> &'static dyn Comparator {
        comparator_for(&self.ty)
    }

    /// Munge both sides and compare them with the type's comparator
    pub fn in_sync(&self, desired: &Value, observed: &Value) -> bool {
        self.comparator()
            .in_sync(&self.munge(desired.clone()), &self.munge(observed.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &[&str] = &["online", "offline", "restricted"];

    fn name() -> AttributeSpec {
        AttributeSpec::identity("name", "Volume name")
    }

    fn reserve() -> AttributeSpec {
        AttributeSpec::property("snapreserve", AttrType::Percent, "Snapshot reserve")
    }

    fn junction() -> AttributeSpec {
        AttributeSpec::property("junctionpath", AttrType::JunctionPath, "Mount point")
    }

    #[test]
    fn test_name_accepts_word_characters() {
        for candidate in ["vol1", "q_1", "A", "123", "x_Y_z9"] {
            assert!(name().validate(&Value::from(candidate)).is_ok(), "{candidate}");
        }
    }

    #[test]
    fn test_name_rejects_other_characters() {
        for candidate in ["", "vol-1", "vol 1", "a.b", "/vol", "q1!", "ü", "volé", "q١", "ｖｏｌ"] {
            assert!(name().validate(&Value::from(candidate)).is_err(), "{candidate}");
        }
        assert!(name().validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_size() {
        let size = AttributeSpec::property("initsize", AttrType::Size, "Initial size");
        for ok in ["1k", "20g", "500m", "2t"] {
            assert!(size.validate(&Value::from(ok)).is_ok(), "{ok}");
        }
        for bad in ["20", "g", "20G", "1.5g", "20gb", "١٢g", "２０g"] {
            assert!(size.validate(&Value::from(bad)).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_percent_range() {
        for n in 0..=100 {
            let candidate = Value::from(n.to_string());
            assert!(reserve().validate(&candidate).is_ok());
            assert_eq!(reserve().munge(candidate), Value::Int(n));
        }
        assert!(reserve().validate(&Value::from("101")).is_err());
        assert!(reserve().validate(&Value::from("-1")).is_err());
        assert!(reserve().validate(&Value::from("ten")).is_err());
        assert!(reserve().validate(&Value::from("٢٠")).is_err());
        assert!(reserve().validate(&Value::Int(20)).is_ok());
        assert!(reserve().validate(&Value::Int(-5)).is_err());
    }

    #[test]
    fn test_percent_munge_keeps_non_numeric() {
        assert_eq!(reserve().munge(Value::from("-3")), Value::Int(-3));
        assert_eq!(reserve().munge(Value::from("abc")), Value::from("abc"));
        assert_eq!(reserve().munge(Value::Int(7)), Value::Int(7));
    }

    #[test]
    fn test_junction_path() {
        assert!(junction().validate(&Value::from("/vol1")).is_ok());
        assert!(junction().validate(&Value::Bool(false)).is_ok());
        assert!(junction().validate(&Value::from("false")).is_ok());
        assert!(junction().validate(&Value::Bool(true)).is_err());
        assert!(junction().validate(&Value::from("vol1")).is_err());

        assert_eq!(junction().munge(Value::from("false")), Value::Bool(false));
        assert_eq!(junction().munge(Value::from("/vol1")), Value::from("/vol1"));
    }

    #[test]
    fn test_enum() {
        let state = AttributeSpec::property("state", AttrType::Enum(STATES), "State");
        assert!(state.validate(&Value::from("online")).is_ok());
        let err = state.validate(&Value::from("busy")).unwrap_err();
        assert!(err.contains("online, offline, restricted"));
    }

    #[test]
    fn test_map_shapes() {
        let options = AttributeSpec::property("options", AttrType::Map, "Options");
        assert!(options.validate(&Value::map([("a", "1")])).is_ok());
        assert!(
            options
                .validate(&Value::List(vec![Value::map([("a", "1")])]))
                .is_ok()
        );
        assert!(options.validate(&Value::from("a=1")).is_err());
        assert!(
            options
                .validate(&Value::List(vec![Value::from("a"), Value::from("b")]))
                .is_err()
        );
        assert!(options.validate(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_in_sync_munges_both_sides() {
        assert!(reserve().in_sync(&Value::from("20"), &Value::from("20")));
        assert!(reserve().in_sync(&Value::Int(20), &Value::from("20")));
        assert!(!reserve().in_sync(&Value::Int(20), &Value::from("5")));
        assert!(junction().in_sync(&Value::Bool(false), &Value::from("false")));
    }
}
