//! Fixtures shared by unit tests

use crate::attribute::{AttrType, AttributeSpec};
use crate::kind::ResourceKind;
use crate::provider::Provider;
use crate::resource::{ResourceDeclaration, ResourceInstance};
use anyhow::{Result, bail};
use std::collections::BTreeSet;
use std::sync::Mutex;

pub static SHARE: ResourceKind = ResourceKind::new(
    "share",
    &[
        AttributeSpec::identity("name", "Share name"),
        AttributeSpec::parameter("pool", AttrType::Name, "Owning pool").required(),
        AttributeSpec::property("reserve", AttrType::Percent, "Reserve"),
    ],
);

pub fn share(name: &str) -> ResourceDeclaration {
    ResourceDeclaration::new("share", name).with_parameter("pool", "p0")
}

/// Provider over an in-memory set of share names, recording every call
#[derive(Default)]
pub struct FakeShares {
    pub existing: Mutex<BTreeSet<String>>,
    pub calls: Mutex<Vec<String>>,
    pub failing: BTreeSet<String>,
    pub discovery_fails: bool,
}

impl FakeShares {
    pub fn with(names: &[&str]) -> Self {
        Self {
            existing: Mutex::new(names.iter().map(|n| (*n).to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.existing.lock().unwrap().iter().cloned().collect()
    }
}

impl Provider for FakeShares {
    fn kind(&self) -> &'static ResourceKind {
        &SHARE
    }

    fn instances(&self) -> Result<Vec<ResourceInstance>> {
        self.calls.lock().unwrap().push("list".to_string());
        if self.discovery_fails {
            bail!("connection refused");
        }
        Ok(self
            .existing
            .lock()
            .unwrap()
            .iter()
            .map(|n| ResourceInstance::new(n.as_str()).with("pool", "p0"))
            .collect())
    }

    fn create(&self, declaration: &ResourceDeclaration) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create {}", declaration.identity));
        if self.failing.contains(&declaration.identity) {
            bail!("pool is full");
        }
        self.existing
            .lock()
            .unwrap()
            .insert(declaration.identity.clone());
        Ok(())
    }

    fn flush(&self, declaration: &ResourceDeclaration, instance: &ResourceInstance) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("destroy {}", instance.identity));
        if self.failing.contains(&declaration.identity) {
            bail!("share is busy");
        }
        self.existing.lock().unwrap().remove(&instance.identity);
        Ok(())
    }
}
