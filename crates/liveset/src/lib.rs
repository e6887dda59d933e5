#![doc = include_str!("../README.md")]
//! liveset: converter from Ableton Live sets to a flat JSON timeline
//!
//! A `.als` file is a gzip-compressed XML document. This crate decodes it,
//! flattens the XML into a generic key/value tree, extracts the audio and
//! MIDI tracks, and expands every MIDI clip into loop-period events. The
//! resulting `ProjectDocument` is reconciled with the bounced audio files
//! found next to the set and written out as `ableton_project.json`.
//!
//! Pipeline stages, leaves first:
//! - `container`: gzip + XML to an owned `Element` tree.
//! - `tree`: `Element` to `serde_json::Value`, plus the `Lookup` trait for
//!   defaulting, never-panicking navigation and 1-or-many normalisation.
//! - `tracks`: track identity and mixer values.
//! - `timeline`: per-track events, including loop expansion.
//! - `reconcile`: bounce matching and staging (copy or transcode).
//! - `serialize`: JSON output.
//!
//! `project::convert` runs all of them. `diff` compares two outputs track by
//! track, and `migrate` re-encodes the staged audio of earlier outputs.
//!
//! Example: expanding a looped clip
//!
//! ```rust
//! use liveset::container::parse_xml;
//! use liveset::tree::flatten;
//! use liveset::tracks::extract_tracks;
//!
//! let xml = r#"
//! <Ableton>
//!   <LiveSet>
//!     <Tracks>
//!       <MidiTrack Id="7">
//!         <Name><EffectiveName Value="Lead"/></Name>
//!         <DeviceChain><MainSequencer><ClipTimeable><ArrangerAutomation><Events>
//!           <MidiClip>
//!             <CurrentStart Value="0"/>
//!             <CurrentEnd Value="10"/>
//!             <Loop>
//!               <LoopStart Value="0"/>
//!               <LoopEnd Value="4"/>
//!               <LoopOn Value="true"/>
//!             </Loop>
//!           </MidiClip>
//!         </Events></ArrangerAutomation></ClipTimeable></MainSequencer></DeviceChain>
//!       </MidiTrack>
//!     </Tracks>
//!   </LiveSet>
//! </Ableton>"#;
//!
//! let root = flatten(&parse_xml(xml).unwrap());
//! let tracks = extract_tracks(&root);
//! let spans: Vec<String> = tracks[0]
//!     .events
//!     .iter()
//!     .map(|e| format!("{}..{}", e.start, e.end))
//!     .collect();
//! assert_eq!(spans, ["0..4", "4..8", "8..10"]);
//! assert_eq!(tracks[0].volume, "Unknown");
//! ```
pub mod container;
pub mod diff;
mod error;
pub mod migrate;
pub mod model;
pub mod project;
pub mod reconcile;
pub mod serialize;
mod ticks;
pub mod timeline;
pub mod tracks;
pub mod transcode;
pub mod tree;

pub use error::{ClipError, DecodeError, Error, MigrateError, Result, TranscodeError};
pub use model::{
    AudioArtifact, AudioFormat, Event, EventPayload, LoopDescriptor, NoteLane, NoteOccurrence,
    ProjectDocument, Track, TrackKind,
};
pub use project::{ConvertOptions, ConvertReport, convert, parse_project};
pub use ticks::Ticks;
pub use transcode::{CommandTranscoder, Transcoder};
