//! Integration tests for MIDI to SMD/SWD conversion
//!
//! These tests build MIDI files in memory, convert them into a temporary
//! directory and verify the output with SmdReader/SmdJson and SwdReader

use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

use smdgen::bytes::encode_vlq;
use smdgen::config::PresetEntry;
use smdgen::container::{LinkBytes, Timestamp};
use smdgen::smd::writer::patch_chunk_lengths;
use smdgen::smd::{SmdCommand, SmdInfo, SmdJson, SmdReader, SmdTrack, SongInfo, TrackNote};
use smdgen::song::listing::{parse_listing, write_listing};
use smdgen::swd::{bank, Library, Preset, Sample, SwdReader};
use smdgen::{ConvertOptions, Converter, Error, PresetSelection};

// =============================================================================
// MIDI builders
// =============================================================================

fn mtrk(events: &[(u32, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (delta, bytes) in events {
        body.extend(encode_vlq(*delta));
        body.extend_from_slice(bytes);
    }
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    let mut chunk = b"MTrk".to_vec();
    chunk.extend_from_slice(&(body.len() as u32).to_be_bytes());
    chunk.extend(body);
    chunk
}

fn midi(format: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = b"MThd".to_vec();
    data.extend_from_slice(&6u32.to_be_bytes());
    data.extend_from_slice(&format.to_be_bytes());
    data.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    data.extend_from_slice(&48u16.to_be_bytes());
    for track in tracks {
        data.extend_from_slice(track);
    }
    data
}

fn single_track(events: &[(u32, &[u8])]) -> Vec<u8> {
    midi(0, &[mtrk(events)])
}

// =============================================================================
// Conversion helpers
// =============================================================================

struct Converted {
    info: SmdInfo,
    song: SongInfo,
    tracks: Vec<SmdTrack>,
    selection: PresetSelection,
    data: Vec<u8>,
}

fn options() -> ConvertOptions {
    let mut options = ConvertOptions::new(LinkBytes([0x1A, 0x2B]));
    options.name = "test".into();
    options.timestamp = Timestamp::from_bytes(&[0xE8, 0x07, 1, 2, 3, 4, 5, 0]);
    options
}

fn convert_with(options: ConvertOptions, midi: &[u8]) -> Converted {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("test.smd");

    let selection = Converter::new(options)
        .convert(midi, &output_path)
        .expect("Conversion failed");

    let data = std::fs::read(&output_path).expect("Failed to read output SMD");
    let mut reader = SmdReader::new(&data);
    let info = reader.parse_header().expect("Failed to parse header");
    let song = reader.parse_song().expect("Failed to parse song chunk");
    let tracks = reader.parse_tracks().expect("Failed to parse tracks");

    Converted {
        info,
        song,
        tracks,
        selection,
        data,
    }
}

fn convert(midi: &[u8]) -> Converted {
    convert_with(options(), midi)
}

fn track_on_channel(converted: &Converted, channel: u8) -> &SmdTrack {
    converted
        .tracks
        .iter()
        .find(|t| t.channel == channel)
        .expect("no track for channel")
}

fn has_command<F>(track: &SmdTrack, predicate: F) -> bool
where
    F: Fn(&SmdCommand) -> bool,
{
    track.commands().any(predicate)
}

// =============================================================================
// Sequence tests
// =============================================================================

#[test]
fn test_single_note() {
    let converted = convert(&single_track(&[(0, &[0x90, 60, 100]), (96, &[0x80, 60, 0])]));

    assert_eq!(converted.info.file_length as usize, converted.data.len());
    assert_eq!(converted.info.link, LinkBytes([0x1A, 0x2B]));
    assert_eq!(converted.info.name, "test");
    assert_eq!(converted.song.tpqn, 48);
    assert_eq!(converted.song.track_count, 1);
    assert_eq!(converted.song.channel_count, 1);

    assert_eq!(converted.tracks.len(), 1);
    let track = &converted.tracks[0];
    assert_eq!(track.track_id, 0);
    assert_eq!(track.channel, 0);
    assert_eq!(
        track.notes,
        vec![TrackNote {
            tick: 0,
            key: 60,
            velocity: 100,
            duration: Some(96)
        }]
    );
    assert_eq!(track.total_ticks(), 96);
    assert!(matches!(track.commands().last(), Some(SmdCommand::EndOfTrack)));
    assert!(converted.selection.presets.is_empty());
}

#[test]
fn test_repeated_gap_uses_repeat_pause() {
    let converted = convert(&single_track(&[
        (96, &[0x90, 60, 100]),
        (0, &[0x80, 60, 0]),
        (96, &[0x90, 60, 100]),
        (0, &[0x80, 60, 0]),
    ]));
    let track = &converted.tracks[0];
    let commands: Vec<SmdCommand> = track.commands().cloned().collect();
    assert_eq!(
        commands,
        vec![
            SmdCommand::Pause { ticks: 96 },
            SmdCommand::SetOctave { octave: 4 },
            SmdCommand::PlayNote {
                velocity: 100,
                note: 0,
                octave_shift: 0,
                duration: None
            },
            SmdCommand::RepeatLastPause,
            SmdCommand::PlayNote {
                velocity: 100,
                note: 0,
                octave_shift: 0,
                duration: None
            },
            SmdCommand::EndOfTrack,
        ]
    );
    let ticks: Vec<u64> = track.notes.iter().map(|n| n.tick).collect();
    assert_eq!(ticks, vec![96, 192]);
}

#[test]
fn test_bank_select_on_channel_three() {
    let converted = convert(&single_track(&[
        (5, &[0xB3, 0x00, 1]),
        (5, &[0xB3, 0x20, 5]),
        (0, &[0xC3, 7]),
        (0, &[0x93, 60, 100]),
        (48, &[0x83, 60, 0]),
    ]));

    assert_eq!(
        converted.selection.presets,
        vec![PresetEntry {
            bank: 133,
            program: 7,
            name: "bank133_prog7".into()
        }]
    );
    assert_eq!(converted.selection.link_byte, LinkBytes([0x1A, 0x2B]));

    let track = track_on_channel(&converted, 3);
    let program_events: Vec<(u64, SmdCommand)> = track
        .events
        .iter()
        .filter(|e| {
            matches!(
                e.command,
                SmdCommand::LinkByte { .. } | SmdCommand::SetProgram { .. }
            )
        })
        .map(|e| (e.tick, e.command.clone()))
        .collect();
    assert_eq!(
        program_events,
        vec![
            (10, SmdCommand::LinkByte { index: 0, value: 0x1A }),
            (10, SmdCommand::LinkByte { index: 1, value: 0x2B }),
            (10, SmdCommand::SetProgram { program: 0 }),
        ]
    );
}

#[test]
fn test_empty_channels_produce_no_chunk() {
    let data = midi(
        1,
        &[
            mtrk(&[(0, &[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20])]),
            mtrk(&[(0, &[0x90, 60, 100]), (96, &[0x80, 60, 0])]),
            mtrk(&[(0, &[0x95, 72, 90]), (48, &[0x85, 72, 0])]),
        ],
    );
    let converted = convert(&data);

    assert_eq!(converted.song.track_count, 3);
    assert_eq!(converted.song.channel_count, 2);
    let layout: Vec<(u8, u8)> = converted
        .tracks
        .iter()
        .map(|t| (t.track_id, t.channel))
        .collect();
    assert_eq!(layout, vec![(0, 0), (1, 0), (2, 5)]);

    // Tempo lands on the meta track, every track ends on the song's last tick
    assert!(has_command(&converted.tracks[0], |c| matches!(
        c,
        SmdCommand::SetTempo { bpm: 120 }
    )));
    assert!(converted.tracks.iter().all(|t| t.total_ticks() == 96));
}

#[test]
fn test_reused_preset_gets_one_id() {
    let converted = convert(&single_track(&[
        (0, &[0xC0, 5]),
        (0, &[0xC1, 5]),
        (0, &[0xC2, 10]),
        (0, &[0x90, 60, 100]),
        (0, &[0x91, 64, 100]),
        (0, &[0x92, 67, 100]),
        (48, &[0x80, 60, 0]),
        (0, &[0x81, 64, 0]),
        (0, &[0x82, 67, 0]),
    ]));

    let names: Vec<&str> = converted
        .selection
        .presets
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Harpsichord 1", "Music Box"]);

    let programs: Vec<Vec<u8>> = converted
        .tracks
        .iter()
        .map(|t| {
            t.commands()
                .filter_map(|c| match c {
                    SmdCommand::SetProgram { program } => Some(*program),
                    _ => None,
                })
                .collect()
        })
        .collect();
    assert_eq!(programs, vec![vec![0], vec![0], vec![1]]);
}

#[test]
fn test_controllers_and_pitch_bend() {
    let converted = convert(&single_track(&[
        (0, &[0xB0, 7, 100]),
        (0, &[0xB0, 10, 32]),
        (0, &[0xB0, 11, 90]),
        (0, &[0xB0, 64, 127]),
        (0, &[0xE0, 0x00, 0x50]),
        (0, &[0x90, 60, 100]),
        (48, &[0x80, 60, 0]),
    ]));
    let track = &converted.tracks[0];
    assert!(has_command(track, |c| *c == SmdCommand::SetVolume { volume: 100 }));
    assert!(has_command(track, |c| *c == SmdCommand::SetPan { pan: 32 }));
    assert!(has_command(track, |c| *c == SmdCommand::SetExpression { expression: 90 }));
    assert!(has_command(track, |c| *c == SmdCommand::PitchBend { lsb: 0, msb: 0x50 }));
    // Sustain pedal has no track event
    assert!(!has_command(track, |c| matches!(c, SmdCommand::Other { .. })));
}

#[test]
fn test_octave_round_trip() {
    let keys = [60u8, 72, 71, 24, 108, 127, 36, 37, 95];
    let mut events: Vec<(u32, Vec<u8>)> = Vec::new();
    for &key in &keys {
        events.push((0, vec![0x90, key, 80]));
        events.push((12, vec![0x80, key, 0]));
    }
    let borrowed: Vec<(u32, &[u8])> = events.iter().map(|(d, b)| (*d, b.as_slice())).collect();
    let converted = convert(&single_track(&borrowed));

    let decoded: Vec<u8> = converted.tracks[0].notes.iter().map(|n| n.key).collect();
    assert_eq!(decoded, keys.to_vec());
    let ticks: Vec<u64> = converted.tracks[0].notes.iter().map(|n| n.tick).collect();
    assert_eq!(ticks, (0..keys.len() as u64).map(|i| i * 12).collect::<Vec<_>>());
}

#[test]
fn test_long_waits_split() {
    let converted = convert(&single_track(&[
        (0, &[0x90, 60, 100]),
        (0x1_0000, &[0x80, 60, 0]),
    ]));
    let track = &converted.tracks[0];
    assert_eq!(track.total_ticks(), 0x1_0000);
    assert!(has_command(track, |c| *c == SmdCommand::Pause { ticks: 0x1_0000 }));
    assert_eq!(track.notes[0].duration, Some(0x1_0000));
}

#[test]
fn test_loop_point() {
    let mut options = options();
    options.loop_tick = Some(48);
    let converted = convert_with(
        options,
        &single_track(&[(0, &[0x90, 60, 100]), (96, &[0x80, 60, 0])]),
    );
    let track = &converted.tracks[0];
    let loop_ticks: Vec<u64> = track
        .events
        .iter()
        .filter(|e| e.command == SmdCommand::LoopPoint)
        .map(|e| e.tick)
        .collect();
    assert_eq!(loop_ticks, vec![48]);
}

#[test]
fn test_backpatch_is_idempotent() {
    let converted = convert(&single_track(&[
        (0, &[0xC0, 0]),
        (0, &[0x90, 60, 100]),
        (96, &[0x80, 60, 0]),
    ]));
    let mut cursor = Cursor::new(converted.data.clone());
    let total = patch_chunk_lengths(&mut cursor).unwrap();
    assert_eq!(total as usize, converted.data.len());
    assert_eq!(cursor.into_inner(), converted.data);

    // Zeroed lengths are restored by the patch pass
    let mut zeroed = converted.data.clone();
    zeroed[8..12].fill(0);
    zeroed[128 + 12..128 + 16].fill(0);
    let mut cursor = Cursor::new(zeroed);
    patch_chunk_lengths(&mut cursor).unwrap();
    assert_eq!(cursor.into_inner(), converted.data);
}

#[test]
fn test_json_dump() {
    let converted = convert(&single_track(&[
        (0, &[0xC0, 0]),
        (0, &[0x90, 60, 100]),
        (96, &[0x80, 60, 0]),
    ]));
    let json = SmdJson::new(&converted.info, &converted.song, &converted.tracks);
    let value = serde_json::to_value(&json).unwrap();
    assert_eq!(value["header"]["link_byte"], "1A2B");
    assert_eq!(value["header"]["name"], "test");
    assert_eq!(value["header"]["modified"], "2024-01-02 03:04:05");
    assert_eq!(value["song"]["tpqn"], 48);
    let events = value["tracks"][0]["events"].as_array().unwrap();
    assert!(events.iter().any(|e| e["cmd"] == "set_program"));
    assert!(events.iter().any(|e| e["cmd"] == "play_note" && e["duration"] == 96));
}

// =============================================================================
// Listing tests
// =============================================================================

#[test]
fn test_listing_round_trip() {
    let data = midi(
        1,
        &[
            mtrk(&[(0, &[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20])]),
            mtrk(&[(0, &[0xC0, 3]), (0, &[0x90, 60, 100]), (96, &[0x80, 60, 0])]),
        ],
    );
    let song = Converter::new(options()).load_song(&data).unwrap();
    let listing = write_listing(&song);
    assert!(listing.starts_with("ntrks 2\ntpqn 48\nsong_duration 96\n"));
    assert!(listing.contains("starttime 0, PlayNote, key_note 60, velocity 100, duration 96"));
    assert_eq!(parse_listing(&listing).unwrap(), song);
}

// =============================================================================
// Error tests
// =============================================================================

fn assert_no_output(dir: &Path) {
    assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
}

#[test]
fn test_hold_too_long_leaves_no_output() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("long.smd");
    let result = Converter::new(options()).convert(
        &single_track(&[(0, &[0x90, 60, 100]), (0x100_0000, &[0x80, 60, 0])]),
        &output_path,
    );
    assert!(matches!(result, Err(Error::HoldTooLong(0x100_0000))));
    assert_no_output(dir.path());
}

#[test]
fn test_bad_midi() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("bad.smd");
    let converter = Converter::new(options());

    assert!(converter.convert(b"RIFF0000", &output_path).is_err());

    let mut smpte = single_track(&[]);
    smpte[12..14].copy_from_slice(&0xE728u16.to_be_bytes());
    assert!(matches!(
        converter.convert(&smpte, &output_path),
        Err(Error::UnsupportedMidi(_))
    ));

    let bad_status = single_track(&[(0, &[0xF4])]);
    assert!(matches!(
        converter.convert(&bad_status, &output_path),
        Err(Error::UnknownStatus { status: 0xF4, .. })
    ));
    assert_no_output(dir.path());
}

// =============================================================================
// Instrument bank tests
// =============================================================================

fn preset_record(lfos: u8, samples: &[u16]) -> Vec<u8> {
    let mut data = vec![0u8; Preset::record_len(lfos as usize, samples.len())];
    data[0] = 0x55;
    data[2..4].copy_from_slice(&(samples.len() as u16).to_le_bytes());
    data[11] = lfos;
    let splits = 32 + 16 * lfos as usize;
    for (i, sample) in samples.iter().enumerate() {
        let at = splits + 48 * i + 18;
        data[at..at + 2].copy_from_slice(&sample.to_le_bytes());
    }
    data
}

fn sample_record(id: u16, loop_start: u32, loop_length: u32) -> Vec<u8> {
    let mut data = vec![0u8; 64];
    data[2..4].copy_from_slice(&id.to_le_bytes());
    data[40..44].copy_from_slice(&loop_start.to_le_bytes());
    data[44..48].copy_from_slice(&loop_length.to_le_bytes());
    data
}

#[test]
fn test_bank_from_converted_song() {
    let dir = tempdir().unwrap();
    let library = Library::new(dir.path().join("lib"));
    library
        .save_preset(
            "Harpsichord 1",
            &Preset::parse("Harpsichord 1", preset_record(4, &[620])).unwrap(),
        )
        .unwrap();
    library
        .save_preset(
            "Music Box",
            &Preset::parse("Music Box", preset_record(2, &[12, 620])).unwrap(),
        )
        .unwrap();
    for (id, start, len) in [(620u16, 100u32, 20u32), (12, 4, 4)] {
        library
            .save_sample(&Sample::parse(id, &sample_record(id, start, len)).unwrap())
            .unwrap();
    }

    let converted = convert(&single_track(&[
        (0, &[0xC0, 5]),
        (0, &[0xC1, 10]),
        (0, &[0x90, 60, 100]),
        (0, &[0x91, 64, 100]),
        (48, &[0x80, 60, 0]),
        (0, &[0x81, 64, 0]),
    ]));

    // Selection survives a trip through its JSON file
    let selection_path = dir.path().join("test.json");
    converted.selection.save(&selection_path).unwrap();
    let selection = PresetSelection::load(&selection_path).unwrap();

    let output_path = dir.path().join("test.swd");
    bank::generate(&selection, &library, &output_path, Timestamp::now()).unwrap();

    let data = std::fs::read(&output_path).unwrap();
    let reader = SwdReader::new(&data);
    let info = reader.parse_header().unwrap();
    assert_eq!(info.file_length as usize, data.len());
    assert_eq!(info.link, converted.info.link);
    assert_eq!(info.wavi_slots, 621);
    assert_eq!(info.prgi_slots, 128);

    let samples = reader.parse_samples(&info).unwrap();
    let placed: Vec<(u16, u32)> = samples.iter().map(|s| (s.id(), s.position())).collect();
    assert_eq!(placed, vec![(12, 0), (620, 32)]);

    let presets = reader.parse_presets(&info).unwrap();
    let ids: Vec<u16> = presets.iter().map(Preset::id).collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(presets[1].sample_ids(), vec![12, 620]);
}

#[test]
fn test_bank_with_missing_preset() {
    let dir = tempdir().unwrap();
    let library = Library::new(dir.path());
    let selection = PresetSelection {
        link_byte: LinkBytes([0, 0]),
        presets: vec![PresetEntry {
            bank: 0,
            program: 58,
            name: "Tuba".into(),
        }],
    };
    let output_path = dir.path().join("empty.swd");
    let generated = bank::generate(&selection, &library, &output_path, Timestamp::now()).unwrap();
    assert!(generated.presets[0].is_none());

    let data = std::fs::read(&output_path).unwrap();
    let reader = SwdReader::new(&data);
    let info = reader.parse_header().unwrap();
    assert_eq!(info.wavi_slots, 0);
    assert!(reader.parse_samples(&info).unwrap().is_empty());
    assert!(reader.parse_presets(&info).unwrap().is_empty());
}
