//! Matching tracks to bounced audio files and staging those files.
//!
//! A bounce of track `N` in project `P` is named `P N.<ext>`, optionally
//! followed by a suffix that starts with a non-alphanumeric character
//! (`P N (2).wav`, `P N-001.flac`). `P Kick2.wav` therefore belongs to
//! `Kick2`, never to `Kick`.
//!
//! Ties are resolved deterministically:
//! - a file that fits several tracks belongs to the one with the longest name;
//! - among a track's files, an exact `P N` stem wins, then the
//!   lexicographically first file name.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{AudioArtifact, AudioFormat, Track};
use crate::transcode::Transcoder;

/// Audio files (`.wav`/`.flac`) directly inside `dir`, sorted by name.
pub fn list_audio_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() || audio_format_of(&path).is_none() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

/// The expected file-name prefix for a track.
pub fn expected_prefix(project: &str, track_name: &str) -> String {
    format!("{} {}", project, track_name)
}

/// Compute the audio artifact for each track (same order as `tracks`).
///
/// `files` must be file names, already sorted.
pub fn match_audio(
    project: &str,
    tracks: &[Track],
    files: &[String],
    target: AudioFormat,
) -> Vec<Option<AudioArtifact>> {
    let prefixes: Vec<String> = tracks
        .iter()
        .map(|t| expected_prefix(project, &t.name))
        .collect();

    // For each file, the length of the longest prefix that claims it.
    let owner_len: Vec<Option<usize>> = files
        .iter()
        .map(|file| {
            prefixes
                .iter()
                .filter(|p| is_match(stem(file), p))
                .map(String::len)
                .max()
        })
        .collect();

    prefixes
        .iter()
        .map(|prefix| {
            let candidates: Vec<&String> = files
                .iter()
                .zip(&owner_len)
                .filter(|(file, owner)| {
                    is_match(stem(file), prefix) && **owner == Some(prefix.len())
                })
                .map(|(file, _)| file)
                .collect();
            let chosen = candidates
                .iter()
                .find(|f| stem(f) == prefix.as_str())
                .or_else(|| candidates.first())?;
            Some(AudioArtifact {
                original_file: chosen.to_string(),
                target_file: format!("{}.{}", stem(chosen), target.extension()),
                format: target,
            })
        })
        .collect()
}

/// Attach matched audio to each track and drop tracks without a match.
pub fn reconcile(
    project: &str,
    tracks: Vec<Track>,
    files: &[String],
    target: AudioFormat,
) -> Vec<Track> {
    let expected = tracks.len();
    let matches = match_audio(project, &tracks, files, target);
    let matched: Vec<Track> = tracks
        .into_iter()
        .zip(matches)
        .filter_map(|(track, audio)| match audio {
            Some(audio) => Some(track.with_audio(Some(audio))),
            None => {
                warn!(
                    "no audio file for track {} \"{}\" (expected \"{}.*\")",
                    track.id,
                    track.name,
                    expected_prefix(project, &track.name)
                );
                None
            }
        })
        .collect();
    info!("Expected Tracks: {}, Matched Tracks: {}", expected, matched.len());
    matched
}

/// Remove `dir` if present and create it empty.
pub fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Clear `staging_dir` and fill it with one file per matched track.
///
/// Files already in the target format are copied. Others go through the
/// transcoder; when it fails the original file is copied instead and the
/// track's artifact is downgraded to the original name and format.
pub fn stage(
    source_dir: &Path,
    staging_dir: &Path,
    tracks: Vec<Track>,
    transcoder: &dyn Transcoder,
) -> Result<Vec<Track>> {
    clear_dir(staging_dir)?;
    let mut staged_tracks = Vec::with_capacity(tracks.len());
    for track in tracks {
        let staged = match &track.audio {
            Some(audio) => Some(stage_file(source_dir, staging_dir, audio, transcoder)?),
            None => None,
        };
        staged_tracks.push(match staged {
            Some(audio) => track.with_audio(Some(audio)),
            None => track,
        });
    }
    Ok(staged_tracks)
}

fn stage_file(
    source_dir: &Path,
    staging_dir: &Path,
    audio: &AudioArtifact,
    transcoder: &dyn Transcoder,
) -> Result<AudioArtifact> {
    let source = source_dir.join(&audio.original_file);
    let source_format = audio_format_of(&source);
    let target = staging_dir.join(&audio.target_file);

    if source_format == Some(audio.format) {
        copy(&source, &target)?;
        return Ok(audio.clone());
    }

    match transcoder.transcode(&source, &target) {
        Ok(()) => Ok(audio.clone()),
        Err(e) => {
            warn!(
                "transcoding {} failed, copying original: {}",
                audio.original_file, e
            );
            remove_partial(&target);
            copy(&source, &staging_dir.join(&audio.original_file))?;
            Ok(AudioArtifact {
                original_file: audio.original_file.clone(),
                target_file: audio.original_file.clone(),
                format: source_format.unwrap_or(audio.format),
            })
        }
    }
}

/// Delete whatever partial output a failed encoder left at `path`.
pub(crate) fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed partial output {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove partial output {}: {}", path.display(), e),
    }
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| Error::io(from, e))?;
    Ok(())
}

fn audio_format_of(path: &Path) -> Option<AudioFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)
}

fn stem(file: &str) -> &str {
    Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}

fn is_match(stem: &str, prefix: &str) -> bool {
    match stem.strip_prefix(prefix) {
        Some(rest) => rest.chars().next().is_none_or(|c| !c.is_alphanumeric()),
        None => false,
    }
}
