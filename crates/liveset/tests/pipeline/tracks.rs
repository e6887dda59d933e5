use liveset::container::parse_xml;
use liveset::tracks::{extract_tempo, extract_track, extract_tracks};
use liveset::tree::{UNKNOWN, flatten};
use liveset::TrackKind;

use super::{audio_clip, audio_track, live_set, midi_clip, midi_track};

fn root(xml: &str) -> serde_json::Value {
    flatten(&parse_xml(xml).unwrap())
}

#[test]
fn extracts_identity_and_mixer_values() {
    let xml = live_set(
        &[midi_track("12", "Lead", &[midi_clip("0", "4", "0", "4", &[])])],
        "128",
    );
    let tracks = extract_tracks(&root(&xml));

    assert_eq!(tracks.len(), 1);
    let t = &tracks[0];
    assert_eq!(t.kind, TrackKind::Midi);
    assert_eq!(t.id, "12");
    assert_eq!(t.name, "Lead");
    assert_eq!(t.volume, "0.7943282127");
    assert_eq!(t.volume_min, "0.0003162277571");
    assert_eq!(t.volume_max, "1.99526238");
    assert_eq!(t.events.len(), 1);
    assert_eq!(t.audio, None);
}

#[test]
fn minimal_track_defaults_to_unknown() {
    for fragment in [
        "<MidiTrack/>",
        r#"<MidiTrack Id="3"><DeviceChain/></MidiTrack>"#,
        r#"<MidiTrack><DeviceChain><Mixer><Volume><Manual Value="1"/></Volume></Mixer></DeviceChain></MidiTrack>"#,
        r#"<MidiTrack><Name Value="flat"/></MidiTrack>"#,
    ] {
        let track = extract_track(TrackKind::Midi, &root(fragment));
        assert_eq!(track.name, UNKNOWN);
        assert_eq!(track.volume_min, UNKNOWN);
        assert_eq!(track.volume_max, UNKNOWN);
        assert!(track.events.is_empty());
    }

    let track = extract_track(TrackKind::Audio, &root("<AudioTrack/>"));
    assert_eq!(track.id, UNKNOWN);
    assert_eq!(track.volume, UNKNOWN);
}

#[test]
fn non_track_entries_are_skipped() {
    let xml = live_set(
        &[
            r#"<GroupTrack Id="1"><Name><EffectiveName Value="Drums"/></Name></GroupTrack>"#.to_string(),
            audio_track("2", "Kick", &[audio_clip("0", "4", "Kick", "Kick.wav")]),
            midi_track("3", "Bass", &[]),
            r#"<ReturnTrack Id="4"/>"#.to_string(),
            audio_track("5", "Snare", &[]),
        ],
        "120",
    );
    let tracks = extract_tracks(&root(&xml));

    let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
    // Tracks come grouped by kind, in order of each kind's first appearance.
    assert_eq!(names, ["Kick", "Snare", "Bass"]);
    assert_eq!(tracks[0].kind, TrackKind::Audio);
    assert_eq!(tracks[2].kind, TrackKind::Midi);
}

#[test]
fn missing_track_collection_yields_nothing() {
    assert!(extract_tracks(&root("<Ableton><LiveSet/></Ableton>")).is_empty());
    assert!(extract_tracks(&root("<Ableton/>")).is_empty());
}

#[test]
fn tempo_from_main_or_master_track() {
    assert_eq!(extract_tempo(&root(&live_set(&[], "98.5"))), "98.5");

    let legacy = r#"<Ableton><LiveSet><MasterTrack><DeviceChain><Mixer><Tempo><Manual Value="140"/></Tempo></Mixer></DeviceChain></MasterTrack></LiveSet></Ableton>"#;
    assert_eq!(extract_tempo(&root(legacy)), "140");

    assert_eq!(extract_tempo(&root("<Ableton><LiveSet/></Ableton>")), UNKNOWN);
}
