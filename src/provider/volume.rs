//! Volume kind and provider

use anyhow::{Context, Result};
use declarative::{
    AttrType, AttributeSpec, Provider, ResourceDeclaration, ResourceInstance, ResourceKind, Value,
};
use filerkit::{Client, ObjectKind, ResponseTree};
use std::sync::Arc;

use super::{arg_value, copy_fields, discover, leaves_map, pairs_map};

const STATES: &[&str] = &["online", "offline", "restricted"];
const AUTOSIZE_MODES: &[&str] = &["off", "grow", "grow_shrink"];
const SPACE_RESERVES: &[&str] = &["none", "file", "volume"];
const LANGUAGES: &[&str] = &[
    "C", "ar", "cs", "da", "de", "en", "en_US", "es", "fi", "fr", "he", "hr", "hu", "it", "ja",
    "ja_v1", "ko", "no", "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr", "zh", "zh_TW",
];

pub static VOLUME: ResourceKind = ResourceKind::new(
    "volume",
    &[
        AttributeSpec::identity("name", "The name of the volume"),
        AttributeSpec::parameter("aggregate", AttrType::Name, "The aggregate to create the volume in")
            .required(),
        AttributeSpec::parameter("languagecode", AttrType::Enum(LANGUAGES), "Volume language"),
        AttributeSpec::parameter("spaceres", AttrType::Enum(SPACE_RESERVES), "Space reservation mode"),
        AttributeSpec::property("state", AttrType::Enum(STATES), "Volume state"),
        AttributeSpec::property("initsize", AttrType::Size, "Initial size, e.g. 20g"),
        AttributeSpec::property("snapreserve", AttrType::Percent, "Snapshot reserve percentage"),
        AttributeSpec::property("junctionpath", AttrType::JunctionPath, "Namespace mount point, or false"),
        AttributeSpec::property("autosize", AttrType::Enum(AUTOSIZE_MODES), "Autosize mode"),
        AttributeSpec::property("exportpolicy", AttrType::Text, "Export policy name"),
        AttributeSpec::property("options", AttrType::Map, "Volume options"),
        AttributeSpec::property("snapschedule", AttrType::ScheduleMap, "Snapshot schedule"),
    ],
);

/// Remote leaf → attribute name
const FIELDS: &[(&str, &str)] = &[
    ("containing-aggregate", "aggregate"),
    ("language-code", "languagecode"),
    ("space-reserve", "spaceres"),
    ("state", "state"),
    ("size-total", "initsize"),
    ("snapshot-percent-reserved", "snapreserve"),
    ("junction-path", "junctionpath"),
    ("autosize-mode", "autosize"),
    ("export-policy", "exportpolicy"),
];

/// Optional create arguments: attribute → API argument, in call order
const CREATE_ARGS: &[(&str, &str)] = &[
    ("initsize", "size"),
    ("languagecode", "language-code"),
    ("spaceres", "space-reserve"),
    ("snapreserve", "percentage-snapshot-reserve"),
    ("junctionpath", "junction-path"),
    ("exportpolicy", "export-policy"),
    ("state", "volume-state"),
];

pub struct VolumeProvider {
    client: Arc<Client>,
}

impl VolumeProvider {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

fn parse(record: &ResponseTree) -> Option<ResourceInstance> {
    let name = record.child_string("name");
    if name.is_empty() {
        return None;
    }

    let mut instance = copy_fields(ResourceInstance::new(name), record, FIELDS);
    if let Some(options) = pairs_map(record, "options") {
        instance.properties.insert("options".to_string(), options);
    }
    if let Some(schedule) = leaves_map(record, "snapshot-schedule") {
        instance.properties.insert("snapschedule".to_string(), schedule);
    }
    Some(instance)
}

/// Ordered `volume-create` arguments for a declaration
fn create_args(declaration: &ResourceDeclaration) -> Result<Vec<(String, String)>> {
    let aggregate = declaration
        .get("aggregate")
        .map(arg_value)
        .with_context(|| format!("{} has no aggregate", declaration.label()))?;

    let mut args = vec![
        ("volume".to_string(), declaration.identity.clone()),
        ("containing-aggr-name".to_string(), aggregate),
    ];
    for (attribute, api_arg) in CREATE_ARGS {
        match declaration.get(attribute) {
            None | Some(Value::Bool(false)) => {}
            Some(value) => args.push(((*api_arg).to_string(), arg_value(value))),
        }
    }
    Ok(args)
}

impl Provider for VolumeProvider {
    fn kind(&self) -> &'static ResourceKind {
        &VOLUME
    }

    fn instances(&self) -> Result<Vec<ResourceInstance>> {
        discover(&self.client, ObjectKind::Volume, parse)
    }

    fn create(&self, declaration: &ResourceDeclaration) -> Result<()> {
        let args = create_args(declaration)?;
        self.client.create(ObjectKind::Volume, &args)?;
        Ok(())
    }

    fn flush(&self, declaration: &ResourceDeclaration, _instance: &ResourceInstance) -> Result<()> {
        self.client
            .delete(ObjectKind::Volume, &declaration.identity)?;
        Ok(())
    }
}
