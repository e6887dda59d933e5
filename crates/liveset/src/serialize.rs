//! JSON output.
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// Name of the document written into the output folder.
pub const PROJECT_JSON: &str = "ableton_project.json";

/// Pretty-print `value` with a four-space indent.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = to_json(value)?;
    fs::write(path, text).map_err(|e| Error::io(path, e))
}

pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
