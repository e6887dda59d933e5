use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use liveset::migrate::migrate_tree;
use liveset::{AudioFormat, CommandTranscoder};

pub fn run(root: &Path, encoder: &str, format: AudioFormat) -> Result<()> {
    let transcoder = CommandTranscoder::new(encoder);
    debug!(
        "migrating projects under {} to {} with {}",
        root.display(),
        format,
        transcoder.program()
    );
    let report = migrate_tree(root, &transcoder, format)
        .with_context(|| format!("failed to scan {}", root.display()))?;

    println!(
        "{} project(s) scanned ({} unreadable), {} file(s) converted, {} failed",
        report.projects_scanned,
        report.projects_failed,
        report.files_converted,
        report.files_failed
    );
    Ok(())
}
