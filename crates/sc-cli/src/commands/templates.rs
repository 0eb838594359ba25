//! Templates command implementation

use anyhow::{Context, Result};
use sc_template::{builtin, template_tokens};
use std::path::Path;

use crate::cli::{GlobalArgs, TemplatesArgs};

/// Execute the templates command
pub async fn execute(args: &TemplatesArgs, global: &GlobalArgs) -> Result<()> {
    let Some(dir) = &args.export else {
        for name in builtin::names() {
            if global.verbose {
                let tokens = builtin::get(name).map(template_tokens).unwrap_or_default();
                println!("{}  {}", name, tokens.join(", "));
            } else {
                println!("{}", name);
            }
        }
        return Ok(());
    };

    let written = builtin::export(Path::new(dir), args.force)
        .with_context(|| format!("Failed to export templates to {dir}"))?;
    for name in &written {
        println!("  Wrote {}", Path::new(dir).join(name).display());
    }
    let kept = builtin::names().count() - written.len();
    if kept > 0 {
        println!("  Kept {} existing templates (use --force to overwrite)", kept);
    }
    println!("Exported {} templates to {}", written.len(), dir);
    Ok(())
}
