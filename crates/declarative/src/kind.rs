//! Resource kind schemas

use crate::attribute::{AttributeSpec, Role};

/// Static schema of one resource kind.
///
/// A kind has exactly one identity attribute; every other attribute is a
/// creation-time parameter or a property compared on every run.
#[derive(Debug)]
pub struct ResourceKind {
    pub name: &'static str,
    pub attributes: &'static [AttributeSpec],
}

impl ResourceKind {
    pub const fn new(name: &'static str, attributes: &'static [AttributeSpec]) -> Self {
        Self { name, attributes }
    }

    /// The identity attribute
    pub fn identity(&self) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|a| a.role == Role::Identity)
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &'static AttributeSpec> {
        self.attributes.iter().filter(|a| a.role == Role::Parameter)
    }

    pub fn properties(&self) -> impl Iterator<Item = &'static AttributeSpec> {
        self.attributes.iter().filter(|a| a.role == Role::Property)
    }

    /// Number of identity attributes; a well-formed kind has exactly one
    pub fn identity_count(&self) -> usize {
        self.attributes
            .iter()
            .filter(|a| a.role == Role::Identity)
            .count()
    }
}
