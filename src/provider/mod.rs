//! Filer-backed providers for the qtree and volume kinds
//!
//! Both kinds share the same discovery shape: one list call, a collection
//! element of info records, and string leaves that are only meaningful
//! when non-empty.

pub mod qtree;
pub mod volume;

#[cfg(test)]
mod scenarios;

use declarative::{Reconciler, ResourceInstance, Value};
use filerkit::{Client, ObjectKind, ResponseTree};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Register every filer provider on a reconciler.
///
/// Volumes come first so a run can create a volume before the qtrees it
/// holds.
pub fn reconciler(client: Arc<Client>) -> Reconciler {
    Reconciler::new()
        .with_provider(Box::new(volume::VolumeProvider::new(Arc::clone(&client))))
        .with_provider(Box::new(qtree::QtreeProvider::new(client)))
}

/// Enumerate one kind and turn each record into an instance.
///
/// `parse` returns `None` for records that carry no identity; those are
/// skipped.
pub(crate) fn discover<F>(
    client: &Client,
    kind: ObjectKind,
    parse: F,
) -> anyhow::Result<Vec<ResourceInstance>>
where
    F: Fn(&ResponseTree) -> Option<ResourceInstance>,
{
    let records = client.list_records(kind)?;
    let mut instances = Vec::with_capacity(records.len());
    for record in &records {
        match parse(record) {
            Some(instance) => instances.push(instance),
            None => log::debug!("Skipping {kind} record without a name"),
        }
    }
    log::debug!("{}: {} records, {} instances", kind.list_api(), records.len(), instances.len());
    Ok(instances)
}

/// A leaf as a string value, or `None` when it is absent or empty
pub(crate) fn field(record: &ResponseTree, key: &str) -> Option<Value> {
    let value = record.child_string(key);
    (!value.is_empty()).then(|| Value::from(value))
}

/// Copy the non-empty leaves named in `fields` onto the instance
pub(crate) fn copy_fields(
    mut instance: ResourceInstance,
    record: &ResponseTree,
    fields: &[(&str, &str)],
) -> ResourceInstance {
    for (key, attribute) in fields {
        if let Some(value) = field(record, key) {
            instance.properties.insert((*attribute).to_string(), value);
        }
    }
    instance
}

/// A child list of `{name, value}` records as a map
pub(crate) fn pairs_map(record: &ResponseTree, child: &str) -> Option<Value> {
    let list = record.child(child)?;
    let map: BTreeMap<String, Value> = list
        .children()
        .iter()
        .filter(|pair| !pair.child_string("name").is_empty())
        .map(|pair| {
            (
                pair.child_string("name").to_string(),
                Value::from(pair.child_string("value")),
            )
        })
        .collect();
    Some(Value::Map(map))
}

/// A child element's leaves as a map, keeping blank values
pub(crate) fn leaves_map(record: &ResponseTree, child: &str) -> Option<Value> {
    let element = record.child(child)?;
    let map: BTreeMap<String, Value> = element
        .children()
        .iter()
        .map(|leaf| (leaf.name.clone(), Value::from(leaf.content())))
        .collect();
    Some(Value::Map(map))
}

/// String form of a declared value, for API arguments
pub(crate) fn arg_value(value: &Value) -> String {
    value.first().to_string()
}
