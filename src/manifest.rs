//! Manifest loading
//!
//! A manifest is a TOML file of `[[qtree]]` and `[[volume]]` tables. Each
//! table carries a `name`, an optional `ensure` and the managed attributes
//! flattened alongside:
//!
//! ```toml
//! [[volume]]
//! name = "vol1"
//! aggregate = "aggr0"
//! snapreserve = 20
//! options = { nosnap = "off" }
//!
//! [[qtree]]
//! name = "q1"
//! volume = "vol1"
//! ```
//!
//! Attributes are split into parameters and properties by the kind schema.
//! Names the schema does not know are kept as properties so the validation
//! layer rejects them with a precise error.

use declarative::{Ensure, ResourceDeclaration, ResourceKind, Role, Value};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::provider::{qtree, volume};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Could not read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    #[serde(default)]
    ensure: Ensure,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    qtree: Vec<Entry>,
    #[serde(default)]
    volume: Vec<Entry>,
}

/// Parsed declarations, grouped by kind
#[derive(Debug, Default)]
pub struct Manifest {
    pub qtrees: Vec<ResourceDeclaration>,
    pub volumes: Vec<ResourceDeclaration>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(&content)?;
        log::debug!(
            "Loaded {} qtree and {} volume declarations from {}",
            manifest.qtrees.len(),
            manifest.volumes.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(content)?;
        Ok(Self {
            qtrees: declarations(&qtree::QTREE, raw.qtree),
            volumes: declarations(&volume::VOLUME, raw.volume),
        })
    }

    /// Declarations of one kind
    pub fn declarations(&self, kind: &str) -> &[ResourceDeclaration] {
        match kind {
            k if k == qtree::QTREE.name => &self.qtrees,
            k if k == volume::VOLUME.name => &self.volumes,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.qtrees.len() + self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn declarations(kind: &ResourceKind, entries: Vec<Entry>) -> Vec<ResourceDeclaration> {
    entries
        .into_iter()
        .map(|entry| {
            let mut declaration = ResourceDeclaration::new(kind.name, entry.name);
            declaration.ensure = entry.ensure;
            for (name, value) in entry.attributes {
                match kind.attribute(&name).map(|a| a.role) {
                    Some(Role::Parameter) => {
                        declaration.parameters.insert(name, value);
                    }
                    _ => {
                        declaration.properties.insert(name, value);
                    }
                }
            }
            declaration
        })
        .collect()
}
