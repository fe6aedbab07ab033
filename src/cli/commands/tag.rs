//! The batch tagging command.

use anyhow::Context;
use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::processor::Processor;
use crate::scanner;

/// Tag a file or a directory of files.
///
/// Ctrl-C stops the run between awaits; the file in flight is abandoned with
/// its source untouched.
pub fn cmd_tag(rt: &Runtime, config: &Config, source: &Path) -> anyhow::Result<()> {
    let converting = config
        .conversion
        .format
        .as_deref()
        .is_some_and(|f| !f.trim().is_empty());
    let allowed = scanner::allowed_extensions(converting);
    let plan = scanner::plan(source, config.scan.recursive, &allowed)
        .with_context(|| format!("scanning {}", source.display()))?;

    let processor = Processor::new(config)?;

    rt.block_on(async {
        tokio::select! {
            result = processor.run(&plan) => {
                let summary = result?;
                tracing::info!(
                    total = summary.total(),
                    tagged = summary.tagged,
                    "Done"
                );
                Ok(())
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, stopping");
                anyhow::bail!("interrupted")
            }
        }
    })
}
