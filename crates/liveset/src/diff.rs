//! Track-level comparison of two converted projects.
//!
//! Works on the JSON output rather than on `ProjectDocument`, so a freshly
//! converted project can be compared with one written by an earlier run.
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::tree::{Lookup, UNKNOWN};

/// Identity of a changed track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TrackRef {
    fn of(track: &Value) -> Self {
        TrackRef {
            id: track_id(track),
            name: track.str_or_unknown(&["name"]),
            kind: track.str_or_unknown(&["type"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackChanges {
    pub added: Vec<TrackRef>,
    pub modified: Vec<TrackRef>,
    pub removed: Vec<TrackRef>,
}

impl TrackChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Compare the `tracks` arrays of two project documents by track id.
///
/// A track present in both is modified when any of its fields differ.
/// `added` and `modified` follow the order of `new`, `removed` the order of
/// `old`. A missing `tracks` key counts as an empty list.
pub fn diff_projects(old: &Value, new: &Value) -> TrackChanges {
    let old_tracks = old.list_at(&["tracks"]);
    let new_tracks = new.list_at(&["tracks"]);

    let old_by_id: HashMap<String, &Value> =
        old_tracks.iter().map(|t| (track_id(t), *t)).collect();
    let new_by_id: HashMap<String, &Value> =
        new_tracks.iter().map(|t| (track_id(t), *t)).collect();

    let mut changes = TrackChanges::default();
    for track in &new_tracks {
        match old_by_id.get(&track_id(track)) {
            None => changes.added.push(TrackRef::of(track)),
            Some(previous) if *previous != *track => changes.modified.push(TrackRef::of(track)),
            Some(_) => {}
        }
    }
    for track in &old_tracks {
        if !new_by_id.contains_key(&track_id(track)) {
            changes.removed.push(TrackRef::of(track));
        }
    }
    changes
}

fn track_id(track: &Value) -> String {
    match track.at(&["id"]) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
