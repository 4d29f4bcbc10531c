//! `validate` - check the manifest without contacting the filer

use anyhow::{Result, bail};

use crate::Context;
use crate::provider::{qtree::QTREE, volume::VOLUME};
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let (_config, manifest) = super::load(ctx)?;
    if manifest.is_empty() {
        ui::warn("Manifest declares no resources");
        return Ok(());
    }

    let mut invalid = 0;
    for kind in [&VOLUME, &QTREE] {
        for declaration in manifest.declarations(kind.name) {
            match declarative::validate_declaration(kind, declaration, None) {
                Ok(_) => {
                    if ctx.verbose > 0 {
                        ui::success(&declaration.label());
                    }
                }
                Err(e) => {
                    invalid += 1;
                    ui::error(&e.to_string());
                }
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} declarations are invalid", manifest.len());
    }
    if !ctx.quiet {
        ui::success(&format!("{} declarations are valid", manifest.len()));
    }
    Ok(())
}
