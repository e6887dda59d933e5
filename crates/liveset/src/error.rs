//! Error types for the conversion pipeline.
//!
//! Errors fall in two groups. `DecodeError`, `Error::NoProjectFile` and I/O
//! failures on the output side are fatal for a run and surface through
//! `Error`. `ClipError` and `TranscodeError` are recovered where they occur:
//! the owning clip is skipped, or the audio file is copied verbatim, and the
//! problem is logged.
use std::path::PathBuf;

use thiserror::Error;

use crate::ticks::Ticks;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for one conversion run.
#[derive(Debug, Error)]
pub enum Error {
    /// The project container could not be decoded.
    #[error("failed to decode project file: {0}")]
    Decode(#[from] DecodeError),

    /// The source folder holds no `.als` file.
    #[error("no Ableton project (.als) found in {}", .0.display())]
    NoProjectFile(PathBuf),

    /// Filesystem failure while reading the source folder or writing output.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to turn a project file into a markup tree. Always fatal.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The first two bytes are not the gzip magic (0x1f 0x8b).
    #[error("not a gzip stream")]
    NotGzip,

    #[error("gzip decompression failed: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("decompressed payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// A clip that cannot be turned into events. The clip is skipped and its
/// siblings are still processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    /// A required nested value is absent or unparseable. The payload is the
    /// slash-joined lookup path.
    #[error("missing or invalid field `{0}`")]
    MissingField(String),

    /// `LoopEnd - LoopStart` is zero or negative.
    #[error("invalid loop range [{start}, {end})")]
    InvalidLoop { start: Ticks, end: Ticks },

    /// `CurrentEnd` lies before `CurrentStart`.
    #[error("clip ends at {end} before it starts at {start}")]
    InvalidSpan { start: Ticks, end: Ticks },

    /// The loop body is so short relative to the clip that expansion would
    /// produce an unreasonable number of events.
    #[error("clip would expand to {repeats} repetitions (limit {limit})")]
    TooManyRepeats { repeats: i64, limit: i64 },
}

impl ClipError {
    pub(crate) fn missing(path: &[&str]) -> Self {
        ClipError::MissingField(path.join("/"))
    }
}

/// The external encoder could not produce the target file.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to launch encoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// One staged file that batch migration could not convert. The file is
/// left as it was and the project's other files are still processed.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("audio entry has no target_file")]
    NoTargetFile,

    #[error("{} is missing", .0.display())]
    MissingFile(PathBuf),

    #[error("transcoding {file} failed: {source}")]
    Transcode {
        file: String,
        #[source]
        source: TranscodeError,
    },
}
