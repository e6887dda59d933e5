//! Track extraction from the flattened set.
use log::debug;
use serde_json::Value;

use crate::model::{Track, TrackKind};
use crate::timeline::build_events;
use crate::tree::{Lookup, UNKNOWN, as_list};

const TRACKS: &[&str] = &["LiveSet", "Tracks"];
const NAME: &[&str] = &["Name", "EffectiveName", "Value"];
const VOLUME: &[&str] = &["DeviceChain", "Mixer", "Volume", "Manual", "Value"];
const VOLUME_MIN: &[&str] = &[
    "DeviceChain",
    "Mixer",
    "Volume",
    "MidiControllerRange",
    "Min",
    "Value",
];
const VOLUME_MAX: &[&str] = &[
    "DeviceChain",
    "Mixer",
    "Volume",
    "MidiControllerRange",
    "Max",
    "Value",
];
const TEMPO: &[&str] = &["DeviceChain", "Mixer", "Tempo", "Manual", "Value"];

/// Extract every audio and MIDI track under `LiveSet/Tracks`.
///
/// `root` is the flattened root element (`<Ableton>`). Other entries in the
/// track collection (group and return tracks) are skipped silently. Tracks
/// are returned grouped by kind, in order of each kind's first appearance,
/// and in document order within a kind.
pub fn extract_tracks(root: &Value) -> Vec<Track> {
    let Some(Value::Object(collection)) = root.at(TRACKS) else {
        debug!("no track collection found");
        return Vec::new();
    };

    let mut tracks = Vec::new();
    for (tag, entries) in collection {
        let Some(kind) = TrackKind::from_tag(tag) else {
            debug!("skipping {} entries", tag);
            continue;
        };
        for entry in as_list(Some(entries)) {
            tracks.push(extract_track(kind, entry));
        }
    }
    tracks
}

/// Extract one track element of a known kind. Never fails: every missing
/// value becomes `"Unknown"` and malformed clips are dropped.
pub fn extract_track(kind: TrackKind, track: &Value) -> Track {
    Track {
        kind,
        id: track.str_or_unknown(&["Id"]),
        name: track.str_or_unknown(NAME),
        volume: track.str_or_unknown(VOLUME),
        volume_min: track.str_or_unknown(VOLUME_MIN),
        volume_max: track.str_or_unknown(VOLUME_MAX),
        events: build_events(kind, track),
        audio: None,
    }
}

/// Project tempo from the main track, falling back to the pre-Live 12
/// `MasterTrack` element.
pub fn extract_tempo(root: &Value) -> String {
    ["MainTrack", "MasterTrack"]
        .iter()
        .find_map(|main| {
            root.at(&["LiveSet", *main])
                .and_then(|track| track.str_at(TEMPO))
        })
        .unwrap_or(UNKNOWN)
        .to_string()
}
