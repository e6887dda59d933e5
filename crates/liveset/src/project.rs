//! The conversion pipeline: project folder in, JSON and staged audio out.
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::container::decode_file;
use crate::diff::{TrackChanges, diff_projects};
use crate::error::{Error, Result};
use crate::model::{AudioFormat, ProjectDocument};
use crate::reconcile::{list_audio_files, reconcile, stage};
use crate::serialize::{PROJECT_JSON, read_json, write_json};
use crate::tracks::{extract_tempo, extract_tracks};
use crate::transcode::Transcoder;
use crate::tree::flatten;

/// Staging folder for matched audio, relative to the output folder.
pub const TRACKS_DIR: &str = "tracks";

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Where `ableton_project.json` and the staging folder are written.
    pub output_dir: PathBuf,
    /// Keep every parsed track and leave audio untouched.
    pub skip_audio: bool,
    pub target_format: AudioFormat,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            output_dir: PathBuf::from("."),
            skip_audio: false,
            target_format: AudioFormat::Flac,
        }
    }
}

/// What one `convert` run produced.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub document: ProjectDocument,
    pub json_path: PathBuf,
    /// `None` when audio reconciliation was skipped.
    pub staging_dir: Option<PathBuf>,
    /// Track changes against the JSON a previous run left in the output
    /// folder, if there was one.
    pub changes: Option<TrackChanges>,
}

/// The first `.als` file in `dir` by file name.
pub fn find_project_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let is_als = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.eq_ignore_ascii_case("als"));
        if is_als && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoProjectFile(dir.to_path_buf()))
}

/// Project name derived from the set's file name.
pub fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Decode a set and extract its tracks, without touching audio.
pub fn parse_project(path: &Path) -> Result<ProjectDocument> {
    let root = flatten(&decode_file(path)?);
    Ok(document_from_tree(project_name(path), &root))
}

/// Build the document from an already flattened root element.
pub fn document_from_tree(project: String, root: &Value) -> ProjectDocument {
    ProjectDocument {
        project,
        tempo: extract_tempo(root),
        tracks: extract_tracks(root),
    }
}

/// Run the whole pipeline on a project folder.
///
/// Nothing is written when the set cannot be found or decoded.
pub fn convert(
    source_dir: &Path,
    options: &ConvertOptions,
    transcoder: &dyn Transcoder,
) -> Result<ConvertReport> {
    let set_path = find_project_file(source_dir)?;
    let name = project_name(&set_path);
    info!("Parsing Ableton Project: {}.als", name);

    let parsed = parse_project(&set_path)?;
    info!("{} track(s) parsed, tempo {}", parsed.tracks.len(), parsed.tempo);

    fs::create_dir_all(&options.output_dir).map_err(|e| Error::io(&options.output_dir, e))?;

    let (document, staging_dir) = if options.skip_audio {
        (parsed, None)
    } else {
        let files = list_audio_files(source_dir)?;
        let matched = reconcile(&name, parsed.tracks, &files, options.target_format);
        let staging_dir = options.output_dir.join(TRACKS_DIR);
        let tracks = stage(source_dir, &staging_dir, matched, transcoder)?;
        info!("Bounced tracks saved in: {}", staging_dir.display());
        (
            ProjectDocument {
                tracks,
                ..parsed
            },
            Some(staging_dir),
        )
    };

    let json_path = options.output_dir.join(PROJECT_JSON);
    let changes = previous_changes(&json_path, &document)?;
    write_json(&document, &json_path)?;
    info!("Ableton project parsed and saved to {}", json_path.display());

    Ok(ConvertReport {
        document,
        json_path,
        staging_dir,
        changes,
    })
}

/// Diff `document` against the JSON at `path` if one exists. An unreadable
/// previous file is reported and otherwise ignored.
fn previous_changes(path: &Path, document: &ProjectDocument) -> Result<Option<TrackChanges>> {
    if !path.exists() {
        return Ok(None);
    }
    let previous = match read_json(path) {
        Ok(v) => v,
        Err(e) => {
            warn!("ignoring previous {}: {}", path.display(), e);
            return Ok(None);
        }
    };
    let changes = diff_projects(&previous, &serde_json::to_value(document)?);
    info!(
        "track changes since last run: {} added, {} modified, {} removed",
        changes.added.len(),
        changes.modified.len(),
        changes.removed.len()
    );
    Ok(Some(changes))
}
