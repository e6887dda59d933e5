use std::fs;

use liveset::reconcile::{list_audio_files, match_audio, reconcile, stage};
use liveset::{AudioArtifact, AudioFormat, Track, TrackKind};
use tempfile::TempDir;

use super::FakeTranscoder;

fn track(id: &str, name: &str) -> Track {
    Track {
        kind: TrackKind::Audio,
        id: id.into(),
        name: name.into(),
        volume: "1".into(),
        volume_min: "0".into(),
        volume_max: "1".into(),
        events: Vec::new(),
        audio: None,
    }
}

fn files(names: &[&str]) -> Vec<String> {
    let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    v.sort();
    v
}

fn original(m: &Option<AudioArtifact>) -> Option<&str> {
    m.as_ref().map(|a| a.original_file.as_str())
}

#[test]
fn prefix_must_end_on_a_word_boundary() {
    let tracks = [track("1", "Kick"), track("2", "Kick2")];
    let m = match_audio("Song", &tracks, &files(&["Song Kick2.wav"]), AudioFormat::Flac);
    assert_eq!(original(&m[0]), None);
    assert_eq!(original(&m[1]), Some("Song Kick2.wav"));
}

#[test]
fn longest_track_name_claims_shared_files() {
    let tracks = [track("1", "Kick"), track("2", "Kick 2")];
    let m = match_audio(
        "Song",
        &tracks,
        &files(&["Song Kick 2.wav", "Song Kick.wav"]),
        AudioFormat::Flac,
    );
    assert_eq!(original(&m[0]), Some("Song Kick.wav"));
    assert_eq!(original(&m[1]), Some("Song Kick 2.wav"));

    // With only the longer bounce present the shorter name gets nothing.
    let m = match_audio("Song", &tracks, &files(&["Song Kick 2.wav"]), AudioFormat::Flac);
    assert_eq!(original(&m[0]), None);
}

#[test]
fn exact_name_beats_suffixed_bounces() {
    let tracks = [track("1", "Bass")];
    let m = match_audio(
        "Song",
        &tracks,
        &files(&["Song Bass (1).wav", "Song Bass-old.wav", "Song Bass.wav"]),
        AudioFormat::Flac,
    );
    assert_eq!(original(&m[0]), Some("Song Bass.wav"));
}

#[test]
fn lexicographic_order_breaks_remaining_ties() {
    let tracks = [track("1", "Bass")];
    let m = match_audio(
        "Song",
        &tracks,
        &files(&["Song Bass_take2.wav", "Song Bass (1).flac"]),
        AudioFormat::Flac,
    );
    assert_eq!(original(&m[0]), Some("Song Bass (1).flac"));
}

#[test]
fn target_name_uses_target_extension() {
    let tracks = [track("1", "Pad")];
    let m = match_audio("Song", &tracks, &files(&["Song Pad.WAV"]), AudioFormat::Flac);
    assert_eq!(
        m[0],
        Some(AudioArtifact {
            original_file: "Song Pad.WAV".into(),
            target_file: "Song Pad.flac".into(),
            format: AudioFormat::Flac,
        })
    );
}

#[test]
fn unmatched_tracks_are_dropped() {
    let tracks = vec![track("1", "Kick"), track("2", "Snare"), track("3", "Hat")];
    let kept = reconcile("Song", tracks, &files(&["Song Snare.wav"]), AudioFormat::Flac);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "2");
    assert!(kept[0].audio.is_some());
}

#[test]
fn listing_keeps_only_audio_files_sorted() {
    let dir = TempDir::new().unwrap();
    for name in ["b.wav", "a.FLAC", "c.mp3", "Song.als", "notes.txt"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::create_dir(dir.path().join("folder.wav")).unwrap();

    assert_eq!(list_audio_files(dir.path()).unwrap(), ["a.FLAC", "b.wav"]);
}

#[test]
fn staging_transcodes_copies_and_falls_back() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let staging = out.path().join("tracks");
    fs::create_dir(&staging).unwrap();
    fs::write(staging.join("stale.flac"), b"old").unwrap();
    fs::write(source.path().join("Song Kick.wav"), b"RIFF kick").unwrap();
    fs::write(source.path().join("Song Lead.flac"), b"fLaC lead").unwrap();

    let names = files(&["Song Kick.wav", "Song Lead.flac"]);
    let matched = reconcile(
        "Song",
        vec![track("1", "Kick"), track("2", "Lead")],
        &names,
        AudioFormat::Flac,
    );

    let transcoder = FakeTranscoder::default();
    let staged = stage(source.path(), &staging, matched.clone(), &transcoder).unwrap();

    assert!(!staging.join("stale.flac").exists());
    assert_eq!(fs::read(staging.join("Song Kick.flac")).unwrap(), b"fLaC");
    assert_eq!(fs::read(staging.join("Song Lead.flac")).unwrap(), b"fLaC lead");
    // Only the wav went through the encoder.
    assert_eq!(transcoder.calls.borrow().len(), 1);
    assert_eq!(staged, matched);

    let failing = FakeTranscoder::failing();
    let staged = stage(source.path(), &staging, matched, &failing).unwrap();
    let kick = staged[0].audio.as_ref().unwrap();
    assert_eq!(kick.target_file, "Song Kick.wav");
    assert_eq!(kick.format, AudioFormat::Wav);
    assert_eq!(fs::read(staging.join("Song Kick.wav")).unwrap(), b"RIFF kick");
    assert!(!staging.join("Song Kick.flac").exists());
    assert_eq!(staged[1].audio.as_ref().unwrap().format, AudioFormat::Flac);
}
