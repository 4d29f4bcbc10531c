//! Validation layer
//!
//! Runs once per declaration, after matching and before an action is
//! chosen. Produces a declaration whose values are all legal and munged.

use crate::attribute::{AttributeSpec, Role};
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::{Ensure, ResourceDeclaration, ResourceInstance};
use crate::value::Value;
use std::collections::BTreeMap;

/// Validate and normalize a declaration against its kind schema.
///
/// Required parameters are only enforced when the resource should be
/// present; they are satisfied either by the declaration itself or by the
/// matched instance.
pub fn validate_declaration(
    kind: &ResourceKind,
    declaration: &ResourceDeclaration,
    instance: Option<&ResourceInstance>,
) -> Result<ResourceDeclaration> {
    if declaration.kind != kind.name {
        return Err(Error::KindMismatch {
            expected: kind.name.to_string(),
            declared: declaration.kind.clone(),
            identity: declaration.identity.clone(),
        });
    }

    if let Some(identity) = kind.identity() {
        check(kind, declaration, identity, &Value::from(declaration.identity.as_str()))?;
    }

    let parameters = munge_all(kind, declaration, &declaration.parameters, Role::Parameter)?;
    let properties = munge_all(kind, declaration, &declaration.properties, Role::Property)?;

    if declaration.ensure == Ensure::Present {
        for spec in kind.parameters().filter(|a| a.required) {
            let known = parameters.contains_key(spec.name)
                || instance.is_some_and(|i| i.get(spec.name).is_some());
            if !known {
                return Err(Error::Validation {
                    kind: kind.name.to_string(),
                    identity: declaration.identity.clone(),
                    attribute: spec.name.to_string(),
                    value: String::new(),
                    message: format!("{} is required", spec.name),
                });
            }
        }
    }

    Ok(ResourceDeclaration {
        kind: declaration.kind.clone(),
        identity: declaration.identity.clone(),
        ensure: declaration.ensure,
        parameters,
        properties,
    })
}

fn munge_all(
    kind: &ResourceKind,
    declaration: &ResourceDeclaration,
    values: &BTreeMap<String, Value>,
    role: Role,
) -> Result<BTreeMap<String, Value>> {
    let mut munged = BTreeMap::new();
    for (name, value) in values {
        let spec = kind.attribute(name).ok_or_else(|| Error::UnknownAttribute {
            kind: kind.name.to_string(),
            identity: declaration.identity.clone(),
            attribute: name.clone(),
        })?;

        if spec.role != role {
            return Err(Error::Validation {
                kind: kind.name.to_string(),
                identity: declaration.identity.clone(),
                attribute: name.clone(),
                value: value.inspect(),
                message: format!("{name} is a {}, not a {}", role_name(spec.role), role_name(role)),
            });
        }

        check(kind, declaration, spec, value)?;
        munged.insert(name.clone(), spec.munge(value.clone()));
    }
    Ok(munged)
}

fn check(
    kind: &ResourceKind,
    declaration: &ResourceDeclaration,
    spec: &AttributeSpec,
    value: &Value,
) -> Result<()> {
    spec.validate(value).map_err(|message| Error::Validation {
        kind: kind.name.to_string(),
        identity: declaration.identity.clone(),
        attribute: spec.name.to_string(),
        value: value.inspect(),
        message,
    })
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Identity => "identity",
        Role::Parameter => "parameter",
        Role::Property => "property",
    }
}
