//! Command implementations

pub mod apply;
pub mod plan;
pub mod status;
pub mod validate;

use anyhow::{Context as AnyhowContext, Result};
use declarative::{Reconciler, ResourceDeclaration};
use filerkit::Client;
use filerkit::backend::file::FileBackend;
use std::sync::Arc;

use crate::Context;
use crate::cli::TargetArgs;
use crate::config::Config;
use crate::manifest::Manifest;
use crate::provider;

/// Everything a filer-facing command needs
pub struct Session {
    pub config: Config,
    pub manifest: Manifest,
    pub reconciler: Reconciler,
}

/// Load config and manifest
pub fn load(ctx: &Context) -> Result<(Config, Manifest)> {
    let config = Config::load(ctx.config.as_deref())?;
    let manifest_path = config.manifest_path(ctx.manifest.as_deref())?;
    let manifest = Manifest::load(&manifest_path)?;
    Ok((config, manifest))
}

/// Load config and manifest, and connect to the filer
pub fn open(ctx: &Context) -> Result<Session> {
    let (config, manifest) = load(ctx)?;

    let state_file = config.state_file()?;
    let backend = FileBackend::open(&state_file)
        .with_context(|| format!("Could not open filer state {}", state_file.display()))?;
    let client = Client::with_backend(Box::new(backend)).with_retry(config.retry_config());

    Ok(Session {
        config,
        manifest,
        reconciler: provider::reconciler(Arc::new(client)),
    })
}

impl Session {
    /// Kinds selected by `--kind`, in reconciliation order
    pub fn kinds(&self, target: &TargetArgs) -> Vec<&'static str> {
        self.reconciler
            .kinds()
            .into_iter()
            .filter(|k| target.kind.is_none_or(|t| t.as_str() == *k))
            .collect()
    }

    /// Declarations of `kind` matching the name filter
    pub fn declarations(&self, kind: &str, target: &TargetArgs) -> Vec<ResourceDeclaration> {
        filter_declarations(self.manifest.declarations(kind), target.name.as_deref())
    }
}

fn filter_declarations(
    declarations: &[ResourceDeclaration],
    name: Option<&str>,
) -> Vec<ResourceDeclaration> {
    declarations
        .iter()
        .filter(|d| name.is_none_or(|n| d.identity.contains(n)))
        .cloned()
        .collect()
}
