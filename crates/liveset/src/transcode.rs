//! External audio encoder seam.
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::TranscodeError;

/// Converts one audio file into another format.
///
/// The target format is implied by the destination path's extension.
pub trait Transcoder {
    fn transcode(&self, source: &Path, target: &Path) -> Result<(), TranscodeError>;
}

/// Runs an external encoder as `<program> -y -loglevel error -i <source> <target>`
/// (the ffmpeg calling convention). Exit status 0 means success.
#[derive(Debug, Clone)]
pub struct CommandTranscoder {
    program: String,
}

impl CommandTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        CommandTranscoder {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandTranscoder {
    fn default() -> Self {
        CommandTranscoder::new("ffmpeg")
    }
}

impl Transcoder for CommandTranscoder {
    fn transcode(&self, source: &Path, target: &Path) -> Result<(), TranscodeError> {
        debug!(
            "{} {} -> {}",
            self.program,
            source.display(),
            target.display()
        );
        // `output()` waits for the child and closes its pipes before returning.
        let output = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(source)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
