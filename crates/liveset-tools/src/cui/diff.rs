use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};

use liveset::diff::{TrackChanges, TrackRef, diff_projects};
use liveset::serialize::read_json;

pub fn run(old: &Path, new: &Path) -> Result<()> {
    let old_doc = read_json(old).with_context(|| format!("failed to read {}", old.display()))?;
    let new_doc = read_json(new).with_context(|| format!("failed to read {}", new.display()))?;

    let changes = diff_projects(&old_doc, &new_doc);
    if changes.is_empty() {
        println!("no track changes");
    } else {
        print_changes(&changes);
    }
    Ok(())
}

/// One row per changed track, grouped as added, modified, removed.
pub(crate) fn print_changes(changes: &TrackChanges) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Change"),
        Cell::new("Id"),
        Cell::new("Type"),
        Cell::new("Name"),
    ]);

    let groups: [(&str, &[TrackRef]); 3] = [
        ("added", &changes.added),
        ("modified", &changes.modified),
        ("removed", &changes.removed),
    ];
    for (label, tracks) in groups {
        for t in tracks {
            table.add_row(vec![label, t.id.as_str(), t.kind.as_str(), t.name.as_str()]);
        }
    }
    println!("{table}");
}
