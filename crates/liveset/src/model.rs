//! Output data model.
//!
//! Every value here is built once by the extraction functions and then only
//! moved or replaced, never edited in place after another stage has read it.
//! Field names follow the JSON the converter has always produced.
use std::fmt;

use serde::Serialize;

use crate::ticks::Ticks;

/// The whole converted arrangement, as written to `ableton_project.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDocument {
    pub project: String,
    /// Tempo value as stored in the set, or `"Unknown"`.
    pub tempo: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrackKind {
    #[serde(rename = "AudioTrack")]
    Audio,
    #[serde(rename = "MidiTrack")]
    Midi,
}

impl TrackKind {
    /// Element tag of this track kind in the set.
    pub fn tag(self) -> &'static str {
        match self {
            TrackKind::Audio => "AudioTrack",
            TrackKind::Midi => "MidiTrack",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AudioTrack" => Some(TrackKind::Audio),
            "MidiTrack" => Some(TrackKind::Midi),
            _ => None,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub id: String,
    pub name: String,
    pub volume: String,
    #[serde(rename = "volumeMin")]
    pub volume_min: String,
    #[serde(rename = "volumeMax")]
    pub volume_max: String,
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioArtifact>,
}

impl Track {
    /// Same track with a (possibly different) audio artifact.
    pub fn with_audio(self, audio: Option<AudioArtifact>) -> Track {
        Track { audio, ..self }
    }
}

/// One post-expansion timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub start: Ticks,
    pub end: Ticks,
    #[serde(rename = "loop")]
    pub loop_info: LoopDescriptor,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    pub fn length(&self) -> Ticks {
        self.end - self.start
    }

    pub fn notes(&self) -> &[NoteLane] {
        match &self.payload {
            EventPayload::Midi { notes } => notes,
            EventPayload::Audio { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Midi {
        notes: Vec<NoteLane>,
    },
    Audio {
        audio_name: String,
        audio_file: String,
    },
}

/// Bounds and flag of a clip's repeating body. Sub-events produced by loop
/// expansion all carry their clip's descriptor unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopDescriptor {
    pub start: Ticks,
    pub end: Ticks,
    pub on: bool,
    #[serde(rename = "hiddenLoopStart", skip_serializing_if = "Option::is_none")]
    pub hidden_start: Option<Ticks>,
    #[serde(rename = "hiddenLoopEnd", skip_serializing_if = "Option::is_none")]
    pub hidden_end: Option<Ticks>,
}

impl LoopDescriptor {
    pub fn range(&self) -> Ticks {
        self.end - self.start
    }
}

/// All occurrences of one pitch within a MIDI clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteLane {
    pub key: String,
    pub num_occurences: usize,
    pub occurences: Vec<NoteOccurrence>,
}

impl NoteLane {
    pub fn new(key: String, occurences: Vec<NoteOccurrence>) -> Self {
        NoteLane {
            key,
            num_occurences: occurences.len(),
            occurences,
        }
    }
}

/// A note relative to the start of its clip's loop body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteOccurrence {
    pub start: Ticks,
    pub duration: Ticks,
    pub velocity: Ticks,
    pub velocity_deviation: Ticks,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Flac,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
        }
    }

    /// Case-insensitive match on a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("wav") {
            Some(AudioFormat::Wav)
        } else if ext.eq_ignore_ascii_case("flac") {
            Some(AudioFormat::Flac)
        } else {
            None
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioFormat::from_extension(s).ok_or_else(|| format!("unsupported audio format: {}", s))
    }
}

/// A bounced audio file matched to a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioArtifact {
    /// File name in the source folder.
    pub original_file: String,
    /// File name in the staging folder.
    pub target_file: String,
    pub format: AudioFormat,
}
