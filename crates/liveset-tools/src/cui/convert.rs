use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use liveset::{AudioFormat, CommandTranscoder, ConvertOptions, convert};

use crate::cui::diff::print_changes;

/// Convert the project in `source` and report what was written.
pub fn run(
    source: &Path,
    output: Option<PathBuf>,
    skip_audio: bool,
    encoder: &str,
    format: AudioFormat,
) -> Result<()> {
    let options = ConvertOptions {
        output_dir: output.unwrap_or_else(|| PathBuf::from(".")),
        skip_audio,
        target_format: format,
    };
    let transcoder = CommandTranscoder::new(encoder);
    debug!(
        "source {}, output {}, skip audio {}, encoder {}, format {}",
        source.display(),
        options.output_dir.display(),
        options.skip_audio,
        transcoder.program(),
        options.target_format
    );

    let report = convert(source, &options, &transcoder)
        .with_context(|| format!("failed to convert project in {}", source.display()))?;

    println!(
        "{}: {} track(s) written to {}",
        report.document.project,
        report.document.tracks.len(),
        report.json_path.display()
    );
    if report.document.tracks.is_empty() && !skip_audio {
        warn!("no track matched a bounced audio file; try --skip-audio");
    }
    if let Some(dir) = &report.staging_dir {
        println!("bounced tracks staged in {}/", dir.display());
    }
    if let Some(changes) = report.changes.filter(|c| !c.is_empty()) {
        print_changes(&changes);
    }
    Ok(())
}
