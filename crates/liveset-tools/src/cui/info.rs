use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use log::debug;

use liveset::container::decode_file;
use liveset::parse_project;
use liveset::serialize::to_json;
use liveset::tree::flatten;

/// Print project name, tempo and a table of tracks.
pub fn run(file: &Path) -> Result<()> {
    let document =
        parse_project(file).with_context(|| format!("failed to parse {}", file.display()))?;

    println!("project: {}", document.project);
    println!("tempo:   {}", document.tempo);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Type"),
        Cell::new("Id"),
        Cell::new("Name"),
        Cell::new("Volume"),
        Cell::new("Range"),
        Cell::new("Events"),
    ]);
    for track in &document.tracks {
        table.add_row(vec![
            Cell::new(track.kind),
            Cell::new(&track.id),
            Cell::new(&track.name),
            Cell::new(&track.volume),
            Cell::new(format!("{} .. {}", track.volume_min, track.volume_max)),
            Cell::new(track.events.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Print the flattened tree of a set.
pub fn dump(file: &Path) -> Result<()> {
    let root = decode_file(file).with_context(|| format!("failed to decode {}", file.display()))?;
    debug!("root element <{}>, {} child(ren)", root.tag, root.children.len());
    println!("{}", to_json(&flatten(&root))?);
    Ok(())
}
