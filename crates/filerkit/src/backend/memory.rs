//! In-memory filer.
//!
//! Emulates the list/create/delete API shapes of a 7-mode filer closely
//! enough to drive reconciliation end to end, including the volume-level
//! record with an empty qtree name that `qtree-list` returns for every
//! volume. Every call is recorded, and failures can be injected per call.

use super::{Backend, arg};
use crate::error::{Error, Result};
use crate::tree::ResponseTree;
use crate::types::{Call, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

const ERRNO_NO_VOLUME: u32 = 13040;
const ERRNO_VOLUME_BUSY: u32 = 13001;
const ERRNO_INJECTED: u32 = 13000;

/// Complete object state of an emulated filer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilerState {
    /// Volumes by name
    #[serde(default)]
    pub volumes: BTreeMap<String, VolumeRecord>,
    /// Qtrees, ordered by volume then name
    #[serde(default)]
    pub qtrees: BTreeSet<QtreeRecord>,
}

/// One qtree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QtreeRecord {
    /// Containing volume
    pub volume: String,
    /// Qtree name
    pub name: String,
}

impl QtreeRecord {
    /// Path used by `qtree-delete`.
    pub fn path(&self) -> String {
        format!("/vol/{}/{}", self.volume, self.name)
    }
}

/// One volume and the attributes `volume-list-info` reports for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecord {
    /// Containing aggregate
    pub aggregate: String,
    /// online, offline or restricted
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_reserve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_reserve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosize: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_policy: Option<String>,
    /// Volume options (`vol options`)
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Snapshot schedule slots; the filer reports unset slots as `" "`
    #[serde(default)]
    pub snapshot_schedule: BTreeMap<String, String>,
}

fn default_state() -> String {
    "online".to_string()
}

impl VolumeRecord {
    /// A new online volume in the given aggregate.
    pub fn new(aggregate: impl Into<String>) -> Self {
        Self {
            aggregate: aggregate.into(),
            state: default_state(),
            size: None,
            language: None,
            space_reserve: None,
            snapshot_reserve: None,
            junction_path: None,
            autosize: None,
            export_policy: None,
            options: BTreeMap::new(),
            snapshot_schedule: BTreeMap::new(),
        }
    }

    /// Builder-style option setter.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Builder-style schedule slot setter.
    pub fn with_schedule(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.snapshot_schedule.insert(key.into(), value.into());
        self
    }

    fn to_info(&self, name: &str) -> ResponseTree {
        let mut info = ResponseTree::new(ObjectKind::Volume.info_key())
            .with_leaf("name", name)
            .with_leaf("containing-aggregate", &self.aggregate)
            .with_leaf("state", &self.state);

        let optional = [
            ("size-total", &self.size),
            ("language-code", &self.language),
            ("space-reserve", &self.space_reserve),
            ("snapshot-percent-reserved", &self.snapshot_reserve),
            ("junction-path", &self.junction_path),
            ("autosize-mode", &self.autosize),
            ("export-policy", &self.export_policy),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                info.push(ResponseTree::leaf(key, value));
            }
        }

        if !self.options.is_empty() {
            let mut options = ResponseTree::new("options");
            for (name, value) in &self.options {
                options.push(
                    ResponseTree::new("volume-option-info")
                        .with_leaf("name", name)
                        .with_leaf("value", value),
                );
            }
            info.push(options);
        }

        if !self.snapshot_schedule.is_empty() {
            let mut schedule = ResponseTree::new("snapshot-schedule");
            for (slot, value) in &self.snapshot_schedule {
                schedule.push(ResponseTree::leaf(slot, value));
            }
            info.push(schedule);
        }

        info
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FailureRule {
    List(ObjectKind),
    Create(ObjectKind, String),
    Delete(ObjectKind, String),
}

#[derive(Debug, Default)]
struct Inner {
    state: FilerState,
    calls: Vec<Call>,
    failures: Vec<FailureRule>,
}

/// In-memory filer backend.
///
/// Clones share the same state, so a test can keep one handle for
/// inspection while the client owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    /// Create an empty filer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filer preloaded with state.
    pub fn with_state(state: FilerState) -> Self {
        let backend = Self::default();
        backend.lock().state = state;
        backend
    }

    /// Add or replace a volume.
    pub fn add_volume(&self, name: impl Into<String>, record: VolumeRecord) {
        self.lock().state.volumes.insert(name.into(), record);
    }

    /// Add a qtree. The volume is not checked.
    pub fn add_qtree(&self, volume: impl Into<String>, name: impl Into<String>) {
        self.lock().state.qtrees.insert(QtreeRecord {
            volume: volume.into(),
            name: name.into(),
        });
    }

    /// Snapshot of the current filer state.
    pub fn state(&self) -> FilerState {
        self.lock().state.clone()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Only the create and delete calls made so far.
    pub fn mutations(&self) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make every `list` of `kind` fail with a transport error.
    pub fn fail_list(&self, kind: ObjectKind) {
        self.lock().failures.push(FailureRule::List(kind));
    }

    /// Make creating the object named `name` fail.
    pub fn fail_create(&self, kind: ObjectKind, name: impl Into<String>) {
        self.lock()
            .failures
            .push(FailureRule::Create(kind, name.into()));
    }

    /// Make deleting `target` fail.
    pub fn fail_delete(&self, kind: ObjectKind, target: impl Into<String>) {
        self.lock()
            .failures
            .push(FailureRule::Delete(kind, target.into()));
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Backend for MemoryBackend {
    fn list(&self, kind: ObjectKind) -> Result<ResponseTree> {
        let mut inner = self.lock();
        inner.calls.push(Call::List(kind));

        if inner.failures.contains(&FailureRule::List(kind)) {
            return Err(Error::Transport {
                message: format!("{}: connection refused", kind.list_api()),
            });
        }

        let mut collection = ResponseTree::new(kind.list_key());
        match kind {
            ObjectKind::Qtree => {
                for volume in inner.state.volumes.keys() {
                    // The volume itself shows up as a qtree record with no name
                    collection.push(
                        ResponseTree::new(kind.info_key())
                            .with_leaf("qtree", "")
                            .with_leaf("volume", volume)
                            .with_leaf("status", "normal"),
                    );
                    for qtree in inner.state.qtrees.iter().filter(|q| &q.volume == volume) {
                        collection.push(
                            ResponseTree::new(kind.info_key())
                                .with_leaf("qtree", &qtree.name)
                                .with_leaf("volume", &qtree.volume)
                                .with_leaf("status", "normal")
                                .with_leaf("security-style", "unix"),
                        );
                    }
                }
            }
            ObjectKind::Volume => {
                for (name, record) in &inner.state.volumes {
                    collection.push(record.to_info(name));
                }
            }
        }

        Ok(ResponseTree::new("results").with_child(collection))
    }

    fn create(&self, kind: ObjectKind, args: &[(String, String)]) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::Create(kind, args.to_vec()));
        let api = kind.create_api();

        let name_key = match kind {
            ObjectKind::Qtree => "qtree",
            ObjectKind::Volume => "volume",
        };
        let name = arg(args, name_key).ok_or_else(|| Error::InvalidArgument {
            api: api.to_string(),
            message: format!("missing '{name_key}'"),
        })?;

        if inner
            .failures
            .contains(&FailureRule::Create(kind, name.to_string()))
        {
            return Err(Error::Api {
                api: api.to_string(),
                errno: ERRNO_INJECTED,
                reason: format!("cannot create {name}"),
            });
        }

        match kind {
            ObjectKind::Qtree => {
                let volume = arg(args, "volume").ok_or_else(|| Error::InvalidArgument {
                    api: api.to_string(),
                    message: "missing 'volume'".to_string(),
                })?;
                if !inner.state.volumes.contains_key(volume) {
                    return Err(Error::Api {
                        api: api.to_string(),
                        errno: ERRNO_NO_VOLUME,
                        reason: format!("No volume named {volume} exists"),
                    });
                }
                let record = QtreeRecord {
                    volume: volume.to_string(),
                    name: name.to_string(),
                };
                if inner.state.qtrees.contains(&record) {
                    return Err(Error::Duplicate {
                        what: record.path(),
                    });
                }
                inner.state.qtrees.insert(record);
            }
            ObjectKind::Volume => {
                if inner.state.volumes.contains_key(name) {
                    return Err(Error::Duplicate {
                        what: name.to_string(),
                    });
                }
                let aggregate =
                    arg(args, "containing-aggr-name").ok_or_else(|| Error::InvalidArgument {
                        api: api.to_string(),
                        message: "missing 'containing-aggr-name'".to_string(),
                    })?;

                let owned = |key: &str| arg(args, key).map(str::to_string);
                let mut record = VolumeRecord::new(aggregate);
                record.size = owned("size");
                record.language = owned("language-code");
                record.space_reserve = owned("space-reserve");
                record.snapshot_reserve = owned("percentage-snapshot-reserve");
                record.junction_path = owned("junction-path");
                record.export_policy = owned("export-policy");
                if let Some(state) = owned("volume-state") {
                    record.state = state;
                }
                inner.state.volumes.insert(name.to_string(), record);
            }
        }

        Ok(())
    }

    fn delete(&self, kind: ObjectKind, target: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(Call::Delete(kind, target.to_string()));
        let api = kind.delete_api();

        if inner
            .failures
            .contains(&FailureRule::Delete(kind, target.to_string()))
        {
            return Err(Error::Api {
                api: api.to_string(),
                errno: ERRNO_INJECTED,
                reason: format!("cannot delete {target}"),
            });
        }

        match kind {
            ObjectKind::Qtree => {
                let record = parse_qtree_path(target).ok_or_else(|| Error::InvalidArgument {
                    api: api.to_string(),
                    message: format!("'{target}' is not a /vol/<volume>/<qtree> path"),
                })?;
                if !inner.state.qtrees.remove(&record) {
                    return Err(Error::NotFound {
                        what: target.to_string(),
                    });
                }
            }
            ObjectKind::Volume => {
                if !inner.state.volumes.contains_key(target) {
                    return Err(Error::NotFound {
                        what: target.to_string(),
                    });
                }
                if inner.state.qtrees.iter().any(|q| q.volume == target) {
                    return Err(Error::Api {
                        api: api.to_string(),
                        errno: ERRNO_VOLUME_BUSY,
                        reason: format!("volume {target} still contains qtrees"),
                    });
                }
                inner.state.volumes.remove(target);
            }
        }

        Ok(())
    }
}

fn parse_qtree_path(path: &str) -> Option<QtreeRecord> {
    let rest = path.strip_prefix("/vol/")?;
    let (volume, name) = rest.split_once('/')?;
    if volume.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(QtreeRecord {
        volume: volume.to_string(),
        name: name.to_string(),
    })
}
