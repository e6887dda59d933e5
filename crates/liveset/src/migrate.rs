//! Batch migration of previously converted projects to the target audio
//! format.
//!
//! Every immediate subfolder of a root that holds an `ableton_project.json`
//! and a `tracks/` folder is one project. Projects are processed one at a
//! time; a failed file is logged and skipped, there is no rollback.
//!
//! Outputs written before audio artifacts existed carry a bare `wav_file`
//! key on each track. Such tracks are rewritten to the `audio` object form.
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use crate::error::{Error, MigrateError, Result};
use crate::model::AudioFormat;
use crate::project::TRACKS_DIR;
use crate::reconcile::remove_partial;
use crate::serialize::{PROJECT_JSON, read_json, write_json};
use crate::transcode::Transcoder;
use crate::tree::Lookup;

const LEGACY_AUDIO_KEY: &str = "wav_file";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub projects_scanned: usize,
    pub projects_failed: usize,
    pub files_converted: usize,
    pub files_failed: usize,
}

/// Migrate every project folder under `root`.
pub fn migrate_tree(
    root: &Path,
    transcoder: &dyn Transcoder,
    target: AudioFormat,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();
    for dir in project_dirs(root)? {
        report.projects_scanned += 1;
        match migrate_project(&dir, transcoder, target) {
            Ok((converted, failed)) => {
                report.files_converted += converted;
                report.files_failed += failed;
            }
            Err(e) => {
                warn!("skipping project {}: {}", dir.display(), e);
                report.projects_failed += 1;
            }
        }
    }
    info!(
        "migration done: {} project(s), {} file(s) converted, {} failed",
        report.projects_scanned, report.files_converted, report.files_failed
    );
    Ok(report)
}

/// Migrate one project folder. Returns `(converted, failed)` file counts.
pub fn migrate_project(
    dir: &Path,
    transcoder: &dyn Transcoder,
    target: AudioFormat,
) -> Result<(usize, usize)> {
    let json_path = dir.join(PROJECT_JSON);
    let staging = dir.join(TRACKS_DIR);
    let document = read_json(&json_path)?;

    let mut converted = 0;
    let mut failed = 0;
    let mut changed = false;
    let mut tracks = Vec::new();
    for track in document.list_at(&["tracks"]) {
        let Some(audio) = staged_audio(track) else {
            tracks.push(track.clone());
            continue;
        };
        let legacy = track.at(&["audio"]).is_none();
        let migrated = match migrate_file(&staging, &audio, transcoder, target) {
            Ok(FileMigration::Converted(updated)) => {
                converted += 1;
                Some(updated)
            }
            Ok(FileMigration::Relabelled(updated)) => Some(updated),
            Ok(FileMigration::Unchanged) => legacy.then_some(audio),
            Err(e) => {
                warn!("{}: {}", dir.display(), e);
                failed += 1;
                legacy.then_some(audio)
            }
        };
        match migrated {
            Some(audio) => {
                changed = true;
                tracks.push(with_audio(track, audio));
            }
            None => tracks.push(track.clone()),
        }
    }

    if changed {
        let mut updated = document.as_object().cloned().unwrap_or_default();
        updated.insert("tracks".to_string(), Value::Array(tracks));
        write_json(&Value::Object(updated), &json_path)?;
        info!("{}: {} file(s) converted", dir.display(), converted);
    }
    Ok((converted, failed))
}

/// The audio entry of a track, normalised from either output form.
fn staged_audio(track: &Value) -> Option<Value> {
    if let Some(audio @ Value::Object(_)) = track.at(&["audio"]) {
        return Some(audio.clone());
    }
    let file = track.str_at(&[LEGACY_AUDIO_KEY])?;
    let format = Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)?;
    Some(json!({
        "original_file": file,
        "target_file": file,
        "format": format,
    }))
}

#[derive(Debug)]
enum FileMigration {
    /// Already recorded in the target format.
    Unchanged,
    /// The staged file already carries the target extension; only the
    /// recorded format was wrong.
    Relabelled(Value),
    Converted(Value),
}

/// Convert one staged file to `target`.
fn migrate_file(
    staging: &Path,
    audio: &Value,
    transcoder: &dyn Transcoder,
    target: AudioFormat,
) -> std::result::Result<FileMigration, MigrateError> {
    let format = audio.str_at(&["format"]).and_then(AudioFormat::from_extension);
    if format == Some(target) {
        return Ok(FileMigration::Unchanged);
    }
    let staged = audio
        .str_at(&["target_file"])
        .ok_or(MigrateError::NoTargetFile)?;
    let source = staging.join(staged);
    if !source.is_file() {
        return Err(MigrateError::MissingFile(source));
    }
    // Never encode a file onto itself.
    let staged_format = Path::new(staged)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension);
    if staged_format == Some(target) {
        debug!("{} is already {}, relabelling", staged, target);
        return Ok(FileMigration::Relabelled(updated_audio(
            audio,
            staged.to_string(),
            target,
        )));
    }
    let target_name = format!("{}.{}", file_stem(staged), target.extension());
    let destination = staging.join(&target_name);

    if let Err(source_err) = transcoder.transcode(&source, &destination) {
        remove_partial(&destination);
        return Err(MigrateError::Transcode {
            file: staged.to_string(),
            source: source_err,
        });
    }
    if let Err(e) = fs::remove_file(&source) {
        warn!("could not remove {}: {}", source.display(), e);
    }

    Ok(FileMigration::Converted(updated_audio(audio, target_name, target)))
}

fn updated_audio(audio: &Value, target_file: String, format: AudioFormat) -> Value {
    let mut updated = audio.as_object().cloned().unwrap_or_default();
    updated.insert("target_file".to_string(), Value::String(target_file));
    updated.insert("format".to_string(), json!(format));
    Value::Object(updated)
}

fn with_audio(track: &Value, audio: Value) -> Value {
    let mut fields: Map<String, Value> = track.as_object().cloned().unwrap_or_default();
    fields.remove(LEGACY_AUDIO_KEY);
    fields.insert("audio".to_string(), audio);
    Value::Object(fields)
}

fn project_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(root, e))?.path();
        if path.is_dir() && path.join(PROJECT_JSON).is_file() && path.join(TRACKS_DIR).is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn file_stem(file: &str) -> &str {
    Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}
