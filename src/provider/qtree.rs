//! Qtree kind and provider

use anyhow::{Context, Result};
use declarative::{
    AttrType, AttributeSpec, Provider, ResourceDeclaration, ResourceInstance, ResourceKind,
};
use filerkit::{Client, ObjectKind, ResponseTree};
use std::sync::Arc;

use super::{arg_value, copy_fields, discover};

pub static QTREE: ResourceKind = ResourceKind::new(
    "qtree",
    &[
        AttributeSpec::identity("name", "The name of the qtree"),
        AttributeSpec::parameter("volume", AttrType::Name, "The volume holding the qtree")
            .required(),
    ],
);

pub struct QtreeProvider {
    client: Arc<Client>,
}

impl QtreeProvider {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

/// Volume-level records have an empty qtree name and are not qtrees
fn parse(record: &ResponseTree) -> Option<ResourceInstance> {
    let name = record.child_string("qtree");
    if name.is_empty() {
        return None;
    }
    Some(copy_fields(
        ResourceInstance::new(name),
        record,
        &[("volume", "volume")],
    ))
}

/// The volume a qtree lives in, from the declaration or the discovered record
fn volume_of(
    declaration: &ResourceDeclaration,
    instance: Option<&ResourceInstance>,
) -> Result<String> {
    declaration
        .get("volume")
        .map(arg_value)
        .or_else(|| instance.and_then(|i| i.get_str("volume")).map(str::to_string))
        .with_context(|| format!("{} has no volume", declaration.label()))
}

impl Provider for QtreeProvider {
    fn kind(&self) -> &'static ResourceKind {
        &QTREE
    }

    fn instances(&self) -> Result<Vec<ResourceInstance>> {
        discover(&self.client, ObjectKind::Qtree, parse)
    }

    fn create(&self, declaration: &ResourceDeclaration) -> Result<()> {
        let args = vec![
            ("qtree".to_string(), declaration.identity.clone()),
            ("volume".to_string(), volume_of(declaration, None)?),
        ];
        self.client.create(ObjectKind::Qtree, &args)?;
        Ok(())
    }

    fn flush(&self, declaration: &ResourceDeclaration, instance: &ResourceInstance) -> Result<()> {
        let volume = volume_of(declaration, Some(instance))?;
        let path = format!("/vol/{volume}/{}", declaration.identity);
        self.client.delete(ObjectKind::Qtree, &path)?;
        Ok(())
    }
}
