use std::fs;
use std::path::Path;

use liveset::serialize::{PROJECT_JSON, read_json};
use liveset::{ConvertOptions, Error, convert};
use serde_json::Value;
use tempfile::TempDir;

use super::{FakeTranscoder, audio_clip, audio_track, live_set, midi_clip, midi_track, write_set};

fn three_track_set() -> String {
    live_set(
        &[
            audio_track("8", "Drums", &[audio_clip("0", "16", "Drums", "Samples/Drums.wav")]),
            midi_track(
                "9",
                "Lead",
                &[midi_clip("0", "10", "0", "4", &[("72", &[("0", "0.5")])])],
            ),
            midi_track("10", "Pad", &[]),
        ],
        "124",
    )
}

fn options(out: &Path, skip_audio: bool) -> ConvertOptions {
    ConvertOptions {
        output_dir: out.to_path_buf(),
        skip_audio,
        ..Default::default()
    }
}

#[test]
fn converts_matches_and_stages() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_set(source.path(), "Song", &three_track_set());
    fs::write(source.path().join("Song Drums.wav"), b"RIFF").unwrap();
    fs::write(source.path().join("Song Lead.flac"), b"fLaC").unwrap();
    fs::write(source.path().join("Other Pad.wav"), b"RIFF").unwrap();

    let transcoder = FakeTranscoder::default();
    let report = convert(source.path(), &options(out.path(), false), &transcoder).unwrap();

    assert_eq!(report.document.project, "Song");
    assert_eq!(report.document.tempo, "124");
    assert!(report.changes.is_none());

    let json = read_json(&out.path().join(PROJECT_JSON)).unwrap();
    assert_eq!(json["project"], "Song");
    assert_eq!(json["tempo"], "124");
    let tracks = json["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["type"], "AudioTrack");
    assert_eq!(tracks[0]["name"], "Drums");
    assert_eq!(tracks[0]["volumeMax"], "1.99526238");
    assert_eq!(tracks[0]["audio"]["original_file"], "Song Drums.wav");
    assert_eq!(tracks[0]["audio"]["target_file"], "Song Drums.flac");
    assert_eq!(tracks[0]["audio"]["format"], "flac");
    assert_eq!(tracks[0]["events"][0]["audio_file"], "Samples/Drums.wav");
    assert_eq!(tracks[1]["type"], "MidiTrack");
    assert_eq!(tracks[1]["events"].as_array().unwrap().len(), 3);

    let staging = out.path().join("tracks");
    assert!(staging.join("Song Drums.flac").is_file());
    assert!(staging.join("Song Lead.flac").is_file());
    assert_eq!(fs::read_dir(&staging).unwrap().count(), 2);
    assert_eq!(report.staging_dir.as_deref(), Some(staging.as_path()));
}

#[test]
fn skipping_audio_keeps_every_track() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_set(source.path(), "Song", &three_track_set());

    let transcoder = FakeTranscoder::default();
    let report = convert(source.path(), &options(out.path(), true), &transcoder).unwrap();

    assert!(report.staging_dir.is_none());
    assert!(!out.path().join("tracks").exists());
    assert!(transcoder.calls.borrow().is_empty());

    let json = read_json(&report.json_path).unwrap();
    let tracks = json["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 3);
    assert!(tracks.iter().all(|t| t.get("audio").is_none()));
}

#[test]
fn unmatched_run_writes_empty_track_list() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_set(source.path(), "Song", &three_track_set());

    let report = convert(
        source.path(),
        &options(out.path(), false),
        &FakeTranscoder::default(),
    )
    .unwrap();
    assert!(report.document.tracks.is_empty());
    assert!(out.path().join("tracks").is_dir());
}

#[test]
fn missing_project_file_writes_nothing() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let target = out.path().join("result");
    fs::write(source.path().join("Song Drums.wav"), b"RIFF").unwrap();

    let err = convert(source.path(), &options(&target, false), &FakeTranscoder::default())
        .unwrap_err();
    assert!(matches!(err, Error::NoProjectFile(_)));
    assert!(!target.exists());
}

#[test]
fn undecodable_project_writes_nothing() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(source.path().join("Song.als"), "<Ableton/>").unwrap();

    let err = convert(source.path(), &options(out.path(), true), &FakeTranscoder::default())
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(!out.path().join(PROJECT_JSON).exists());
}

#[test]
fn first_project_by_name_is_used() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_set(source.path(), "B Side", &live_set(&[], "90"));
    write_set(source.path(), "A Side", &live_set(&[], "100"));

    let report = convert(source.path(), &options(out.path(), true), &FakeTranscoder::default())
        .unwrap();
    assert_eq!(report.document.project, "A Side");
    assert_eq!(report.document.tempo, "100");
}

#[test]
fn rerun_reports_track_changes() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_set(source.path(), "Song", &three_track_set());
    convert(source.path(), &options(out.path(), true), &FakeTranscoder::default()).unwrap();

    let edited = live_set(
        &[
            audio_track("8", "Drums", &[audio_clip("0", "32", "Drums", "Samples/Drums.wav")]),
            midi_track("11", "Keys", &[]),
            midi_track("10", "Pad", &[]),
        ],
        "124",
    );
    write_set(source.path(), "Song", &edited);
    let report = convert(source.path(), &options(out.path(), true), &FakeTranscoder::default())
        .unwrap();

    let changes = report.changes.unwrap();
    let ids = |refs: &[liveset::diff::TrackRef]| -> Vec<String> {
        refs.iter().map(|r| r.id.clone()).collect()
    };
    assert_eq!(ids(&changes.added), ["11"]);
    assert_eq!(ids(&changes.modified), ["8"]);
    assert_eq!(ids(&changes.removed), ["9"]);

    let written: Value = read_json(&report.json_path).unwrap();
    assert_eq!(written["tracks"].as_array().unwrap().len(), 3);
}
