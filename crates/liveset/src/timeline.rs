//! Event timeline construction and loop expansion.
//!
//! A MIDI clip in the arrangement plays its loop body (`LoopStart..LoopEnd`)
//! over and over until the clip ends. `tile` turns one clip into
//! consecutive spans: `floor(length / period)` full periods followed by one
//! partial tail when the division leaves a remainder. A clip that plays its
//! body exactly once stays a single span. The spans always tile
//! `[start, end)` with no gap and no overlap.
//!
//! Audio clips are never expanded; each raw clip becomes one event.
//!
//! Malformed clips are logged and skipped. They never abort the track.
use log::{debug, warn};
use serde_json::Value;

use crate::error::ClipError;
use crate::model::{Event, EventPayload, LoopDescriptor, NoteLane, NoteOccurrence, TrackKind};
use crate::ticks::Ticks;
use crate::tree::{Lookup, UNKNOWN};

/// Upper bound on full loop periods per clip.
pub const MAX_REPEATS: i64 = 100_000;

const MIDI_CLIPS: &[&str] = &[
    "DeviceChain",
    "MainSequencer",
    "ClipTimeable",
    "ArrangerAutomation",
    "Events",
    "MidiClip",
];
const AUDIO_CLIPS: &[&str] = &[
    "DeviceChain",
    "MainSequencer",
    "Sample",
    "ArrangerAutomation",
    "Events",
    "AudioClip",
];

const CURRENT_START: &[&str] = &["CurrentStart", "Value"];
const CURRENT_END: &[&str] = &["CurrentEnd", "Value"];
const LOOP_START: &[&str] = &["Loop", "LoopStart", "Value"];
const LOOP_END: &[&str] = &["Loop", "LoopEnd", "Value"];
const LOOP_ON: &[&str] = &["Loop", "LoopOn", "Value"];
const HIDDEN_LOOP_START: &[&str] = &["Loop", "HiddenLoopStart", "Value"];
const HIDDEN_LOOP_END: &[&str] = &["Loop", "HiddenLoopEnd", "Value"];

/// Build the event list of one flattened track element.
pub fn build_events(kind: TrackKind, track: &Value) -> Vec<Event> {
    let track_id = track.str_at(&["Id"]).unwrap_or(UNKNOWN);
    let (path, build): (&[&str], fn(&Value) -> Result<Vec<Event>, ClipError>) = match kind {
        TrackKind::Midi => (MIDI_CLIPS, midi_clip_events),
        TrackKind::Audio => (AUDIO_CLIPS, audio_clip_event),
    };

    let mut events = Vec::new();
    for (index, clip) in track.list_at(path).into_iter().enumerate() {
        match build(clip) {
            Ok(built) => {
                debug!(
                    "track {} clip #{}: {} event(s)",
                    track_id,
                    index,
                    built.len()
                );
                events.extend(built);
            }
            Err(e) => warn!("track {} clip #{} skipped: {}", track_id, index, e),
        }
    }
    events
}

/// Split `[start, end)` into loop periods.
///
/// Returns the single span `[start, end)` when the clip covers its loop
/// body exactly once, otherwise `repeats` full periods plus a final partial
/// span if the length is not a whole number of periods.
pub fn tile(
    start: Ticks,
    end: Ticks,
    loop_info: &LoopDescriptor,
) -> Result<Vec<(Ticks, Ticks)>, ClipError> {
    let period = loop_info.range();
    if !period.is_positive() {
        return Err(ClipError::InvalidLoop {
            start: loop_info.start,
            end: loop_info.end,
        });
    }
    if end < start {
        return Err(ClipError::InvalidSpan { start, end });
    }

    let (repeats, remainder) = (end - start).div_rem_floor(period);
    if repeats > MAX_REPEATS {
        return Err(ClipError::TooManyRepeats {
            repeats,
            limit: MAX_REPEATS,
        });
    }

    if repeats == 1 && remainder.is_zero() {
        return Ok(vec![(start, end)]);
    }

    let mut spans = Vec::with_capacity(repeats as usize + 1);
    for i in 0..repeats {
        spans.push((start + period * i, start + period * (i + 1)));
    }
    if remainder.is_positive() {
        let tail = start + period * repeats;
        spans.push((tail, tail + remainder));
    }
    Ok(spans)
}

/// Expand one clip into events sharing `payload` and `loop_info`.
pub fn expand_clip(
    start: Ticks,
    end: Ticks,
    loop_info: &LoopDescriptor,
    payload: &EventPayload,
) -> Result<Vec<Event>, ClipError> {
    Ok(tile(start, end, loop_info)?
        .into_iter()
        .map(|(s, e)| Event {
            start: s,
            end: e,
            loop_info: loop_info.clone(),
            payload: payload.clone(),
        })
        .collect())
}

fn midi_clip_events(clip: &Value) -> Result<Vec<Event>, ClipError> {
    let start = required_ticks(clip, CURRENT_START)?;
    let end = required_ticks(clip, CURRENT_END)?;
    let loop_info = loop_descriptor(clip)?;
    let payload = EventPayload::Midi {
        notes: note_lanes(clip),
    };
    expand_clip(start, end, &loop_info, &payload)
}

fn audio_clip_event(clip: &Value) -> Result<Vec<Event>, ClipError> {
    let start = required_ticks(clip, CURRENT_START)?;
    let end = required_ticks(clip, CURRENT_END)?;
    let loop_info = loop_descriptor(clip)?;
    Ok(vec![Event {
        start,
        end,
        loop_info,
        payload: EventPayload::Audio {
            audio_name: clip.str_or_unknown(&["Name", "Value"]),
            audio_file: clip.str_or_unknown(&["SampleRef", "FileRef", "RelativePath", "Value"]),
        },
    }])
}

fn loop_descriptor(clip: &Value) -> Result<LoopDescriptor, ClipError> {
    Ok(LoopDescriptor {
        start: required_ticks(clip, LOOP_START)?,
        end: required_ticks(clip, LOOP_END)?,
        on: clip.str_at(LOOP_ON).and_then(parse_bool).unwrap_or(false),
        hidden_start: clip.str_at(HIDDEN_LOOP_START).and_then(Ticks::parse),
        hidden_end: clip.str_at(HIDDEN_LOOP_END).and_then(Ticks::parse),
    })
}

fn note_lanes(clip: &Value) -> Vec<NoteLane> {
    clip.list_at(&["Notes", "KeyTracks", "KeyTrack"])
        .into_iter()
        .map(|lane| {
            let key = lane.str_or_unknown(&["MidiKey", "Value"]);
            let occurences = lane
                .list_at(&["Notes", "MidiNoteEvent"])
                .into_iter()
                .filter_map(|note| match note_occurrence(note) {
                    Ok(n) => Some(n),
                    Err(e) => {
                        warn!("key {}: note skipped: {}", key, e);
                        None
                    }
                })
                .collect();
            NoteLane::new(key, occurences)
        })
        .collect()
}

fn note_occurrence(note: &Value) -> Result<NoteOccurrence, ClipError> {
    Ok(NoteOccurrence {
        start: required_ticks(note, &["Time"])?,
        duration: required_ticks(note, &["Duration"])?,
        velocity: required_ticks(note, &["Velocity"])?,
        velocity_deviation: note
            .str_at(&["VelocityDeviation"])
            .and_then(Ticks::parse)
            .unwrap_or(Ticks::ZERO),
        enabled: note
            .str_at(&["IsEnabled"])
            .and_then(parse_bool)
            .unwrap_or(true),
    })
}

fn required_ticks(node: &Value, path: &[&str]) -> Result<Ticks, ClipError> {
    node.str_at(path)
        .and_then(Ticks::parse)
        .ok_or_else(|| ClipError::missing(path))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
