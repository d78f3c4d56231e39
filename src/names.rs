//! Instrument name tables for the engine's static banks
//!
//! Bank 0 holds the general instruments, bank 1 extended instruments, bank 2
//! the drum kit samples, bank 3 sound effects and bank 4 the multi-sample
//! instruments.

/// Canonical name of a preset, with a generated fallback
pub fn preset_name(bank: u16, program: u8) -> String {
    lookup(bank, program)
        .map(str::to_string)
        .unwrap_or_else(|| format!("bank{}_prog{}", bank, program))
}

/// Canonical name of a preset, if the bank defines one
pub fn lookup(bank: u16, program: u8) -> Option<&'static str> {
    let table: &[Option<&'static str>] = match bank {
        0 => &GENERAL,
        1 => &EXTENDED,
        2 => &DRUMS,
        3 => &EFFECTS,
        4 => &MULTI_SAMPLE,
        _ => return None,
    };
    table.get(program as usize).copied().flatten()
}

/// Name a preset found in `bgmNNNN.swd` should be stored under
pub fn harvest_name(file_number: u16, preset_id: u16) -> Option<&'static str> {
    HARVEST_TABLE
        .iter()
        .find(|(file, id, _)| *file == file_number && *id == preset_id)
        .map(|(_, _, name)| *name)
}

/// Bank 0
const GENERAL: [Option<&str>; 128] = [
    Some("Piano"),
    Some("Piano Bass"),
    Some("Electric Piano"),
    Some("Tine E-Piano"),
    Some("FM E-Piano"),
    Some("Harpsichord 1"),
    Some("Harpsichord 2"),
    Some("Celeste"),
    Some("Glockenspiel 1"),
    Some("Glockenspiel 2"),
    Some("Music Box"),
    Some("Vibraphone"),
    Some("Marimba"),
    Some("Tubular Bells"),
    Some("Fantasia 1"),
    Some("Fantasia 2"),
    Some("Synth Mallet"),
    Some("Percussive Organ"),
    Some("Synth Organ"),
    Some("Melodica"),
    Some("Finger Bass"),
    Some("Pick Bass"),
    Some("J-Bass"),
    Some("Slap Bass"),
    Some("Bass Harmonics"),
    Some("Synth Bass 1"),
    Some("Synth Bass 2"),
    Some("Synth Bass 3"),
    Some("Nylon Guitar"),
    Some("Steel Guitar"),
    Some("Mandolin"),
    Some("Overdriven Guitar"),
    Some("Distorted Guitar"),
    Some("Guitar Harmonics"),
    Some("Sitar"),
    Some("Banjo"),
    Some("Harp"),
    Some("Cello"),
    Some("Bass Section"),
    Some("Violin 1"),
    Some("Violin 2"),
    Some("Violins"),
    Some("Viola"),
    Some("Viola Section"),
    Some("String Section"),
    Some("Pizzicato Strings"),
    Some("Synth Strings 1"),
    Some("Synth Strings 2"),
    Some("Orchestral Hit"),
    Some("Choir Aahs"),
    Some("Solo Voice"),
    Some("Voice Tenor"),
    Some("Voice Oohs"),
    Some("Trumpet Section"),
    Some("Solo Trumpet 1"),
    Some("Solo Trumpet 2"),
    Some("Muted Trumpet"),
    Some("Trombone"),
    Some("Tuba"),
    Some("Saxophone"),
    Some("Brass Section"),
    Some("Brass 1"),
    Some("Brass 2"),
    Some("Brass 3"),
    Some("Brass 4"),
    Some("Horn Section"),
    Some("French Horn"),
    Some("French Horns 1"),
    Some("French Horns 2"),
    Some("English Horn"),
    Some("Horns"),
    Some("Bass & Horn"),
    Some("Bassoon 1"),
    Some("Bassoon 2"),
    Some("Flute 1"),
    Some("Flute 2"),
    Some("Oboe 1"),
    Some("Oboe 2"),
    Some("Clarinet"),
    Some("Hard Clarinet"),
    Some("Pan Flute"),
    Some("Recorder"),
    Some("Bagpipe"),
    Some("Ocarina"),
    Some("Synth Sine"),
    Some("Synth Triangle 1"),
    Some("Synth Triangle 2"),
    Some("Synth Saw"),
    Some("Synth Square"),
    Some("Synth Saw-Triangle"),
    Some("Synth Distorted"),
    Some("Synth 1"),
    Some("Synth 2"),
    Some("Synth 3"),
    Some("Synth 4"),
    Some("Unused Synth"),
    Some("Timpani 1"),
    Some("Timpani 2"),
    Some("Steel Drum"),
    Some("Wood Block"),
    Some("Drop Echo"),
    Some("Pitched Drum"),
    Some("Pitched Crash Cym"),
    Some("Pitched Cymbal"),
    Some("Pitched Tamburine"),
    Some("Pitched Shaker"),
    Some("Pitched Claves"),
    Some("FoggyForest Perc"),
    Some("BoulderQuarryPerc"),
    Some("B&H Horn"),
    Some("B&H Bass"),
    Some("Fantasia(bgm051)"),
    Some("Fantasia(bgm108)"),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("OrigPercPitch1"),
    Some("OrigPercPitch2"),
    None,
    None,
    None,
    Some("Drumkit(Guild)"),
    Some("Drumkit"),
    Some("Drumkit Panned"),
];

/// Bank 1
const EXTENDED: [Option<&str>; 11] = [
    Some("Record Scratch"),
    Some("String Pad2var."),
    Some("Sweeping Drum"),
    Some("E-Guitar Mix"),
    Some("Hard Pizzicato"),
    Some("Oboe All Samples"),
    Some("French Horn 1+2"),
    Some("Full Orchestra"),
    Some("Piano Extended"),
    Some("Superstrings"),
    Some("Bongo Conga"),
];

/// Bank 2
const DRUMS: [Option<&str>; 61] = [
    Some("BassDrum-S"),
    Some("Bongo"),
    Some("Clap"),
    Some("CongaHi"),
    Some("CongaLo"),
    Some("CongaMu"),
    Some("Cowbell"),
    Some("CrashCy1-S"),
    Some("CrashCy2-S"),
    Some("CrashCy3-S"),
    Some("Guiro"),
    Some("HiAgogo"),
    Some("HiHatClosed"),
    Some("HiHatOpen"),
    Some("HiHatPedal"),
    Some("Kick"),
    Some("RecScratch-1"),
    Some("RecScratch-2"),
    Some("Rim Hit 1"),
    Some("Rim Hit 2"),
    Some("Shaker"),
    Some("Shaker2"),
    Some("Shaker3"),
    Some("Snare-1"),
    Some("Snare-2"),
    Some("Snare-3"),
    Some("Snare-4"),
    Some("Snare-5"),
    Some("Snare-6"),
    Some("Snare-7"),
    Some("Timbale"),
    Some("Tom"),
    Some("TriangleMute"),
    Some("TriangleOpen"),
    Some("unknDrum-1"),
    Some("unknDrum-2"),
    Some("unknDrum-3"),
    Some("Taiko"),
    Some("unknDrum-5"),
    Some("unknDrum-6"),
    Some("unknDrum-S-1"),
    Some("unknDrum-S-2"),
    Some("unknDrum-S-3"),
    Some("unknDrum-S-4"),
    Some("Conga 2 hit 1"),
    Some("Conga 2 hit 2"),
    Some("Conga 2 mute 1"),
    Some("Conga 2 mute 2"),
    Some("Tamburine 1"),
    Some("unknHat-2"),
    Some("Tamburine 2"),
    Some("Tamburine 3"),
    Some("unknHat-S"),
    Some("unknKnock-1"),
    Some("Wood Block 1"),
    Some("Piccolo Snare"),
    Some("Slap 1"),
    Some("Slap 2"),
    Some("Wood Block 2"),
    Some("Clave"),
    Some("Whistle"),
];

/// Bank 3
const EFFECTS: [Option<&str>; 81] = [
    Some("SFX Bubble 1"),
    Some("SFX Bubble 2"),
    Some("SFX Bubble 3"),
    Some("SFX Clock"),
    Some("SFX Crack 1"),
    Some("SFX Crack 2"),
    Some("SFX Dojo"),
    Some("SFX DrkFtrChrd"),
    Some("SFX Droplet 1"),
    Some("SFX Droplet 2"),
    Some("SFX Eating"),
    Some("SFX Electro 1"),
    Some("SFX Electro 2"),
    Some("SFX Electro 3"),
    Some("SFX Electro 4"),
    Some("SFX Fire 1"),
    Some("SFX Fire 2"),
    Some("SFX Fire Pop"),
    Some("SFX Harpsichord"),
    Some("SFX Hiss"),
    Some("SFX Magic 1"),
    Some("SFX Magic 2"),
    Some("SFX Magic 3"),
    Some("SFX Magic 4"),
    Some("SFX Rustling"),
    Some("SFX Wind Gust"),
    Some("SFX Splash"),
    Some("SFX Swoosh"),
    Some("SFX Thunder"),
    Some("SFX Tremor 1"),
    Some("SFX Tremor 2"),
    Some("SFX Tremor 3"),
    Some("SFX Tremor 4"),
    Some("SFX Tremor 5"),
    Some("SFX WaterR 1"),
    Some("SFX WaterR 2"),
    Some("SFX WaterR 3"),
    Some("SFX WaterR 4"),
    Some("SFX WaterR 5"),
    Some("SFX WaterRSW 1"),
    Some("SFX WaterS 1"),
    Some("SFX WaterS 2"),
    Some("SFX WaterS 3"),
    Some("SFX WaterSR 1"),
    Some("SFX WaterSW 1"),
    Some("SFX WaterW 1"),
    Some("SFX Wave or Wind 1"),
    Some("SFX Wave or Wind 2"),
    Some("SFX Wave or Wind 3"),
    Some("SFX Wave or Wind 4"),
    Some("SFX Wind 1"),
    Some("SFX Wind 2"),
    Some("SFX Wind 3"),
    Some("SFX WindH 1"),
    Some("SFX WindH 2"),
    Some("SFX WindH 3"),
    Some("SFX WindH 4"),
    Some("SFX WindH 5"),
    Some("SFX WNoise 1"),
    Some("SFX WNoise 2"),
    Some("SFX Crack 3"),
    Some("SFX Electro 5"),
    Some("SFX Electro 6"),
    Some("SFX Explosion"),
    Some("SFX Magic 5"),
    Some("SFX Magic 6"),
    Some("SFX Ringing Noise"),
    Some("SFX Thunder Far"),
    Some("SFX Tremor 5"),
    Some("SFX Tremor 6"),
    Some("SFX TremOrFire 1"),
    Some("SFX TremOrFire 2"),
    Some("SFX unkn"),
    Some("SFX WaterRW 1"),
    Some("SFX WaterSR 2"),
    Some("SFX WaterSW 2"),
    Some("SFX WindH 1"),
    Some("SFX WindH 1-1"),
    Some("SFX WNoise 3"),
    Some("SFX WNoise 4"),
    Some("SFX Brass5th"),
];

/// Bank 4
const MULTI_SAMPLE: [Option<&str>; 105] = [
    Some("Bagpipe 1-C2"),
    Some("Bagpipe 2-C3"),
    Some("Bagpipe 3-C4"),
    Some("Bassoon 1 1-C1"),
    Some("Bassoon 1 2-C2"),
    Some("Bassoon 1 3-C3"),
    Some("Brass 2 1-C3"),
    Some("Brass 2 2-A4"),
    Some("Brass 2 3-F5"),
    Some("Brass 3 1-C4"),
    Some("Brass 3 2-C5"),
    Some("Choir Aahs 1-C3"),
    Some("Choir Aahs 2-G3"),
    Some("Choir Aahs 3-G4"),
    Some("Clarinet 1-C3"),
    Some("Clarinet 2-C4"),
    Some("Clarinet 3-C5"),
    Some("E-Piano 1-C4"),
    Some("E-Piano 2-C5"),
    Some("Fantasia 1 1-G2"),
    Some("Fantasia 1 2-C3"),
    Some("Fantasia 1 3-C4"),
    Some("Fantasia 1 4-C5"),
    Some("Fantasia 2 1-G2"),
    Some("Fantasia 2 2-G3"),
    Some("Fantasia 2 3-G4"),
    Some("Finger Bass 1-G0"),
    Some("Finger Bass 2-E1"),
    Some("Finger Bass 3-D2"),
    Some("Flute 1 1-G3"),
    Some("Flute 1 2-F4"),
    Some("Flute 1 3-D#5"),
    Some("Flute 2 1-G3"),
    Some("Flute 2 2-F4"),
    Some("Harp 1-C2"),
    Some("Harp 2-C4"),
    Some("Harpsichrd 1 1-C3"),
    Some("Harpsichrd 1 2-C4"),
    Some("Harpsichrd 1 3-C5"),
    Some("Harpsichrd 2 1-C3"),
    Some("Harpsichrd 2 2-C4"),
    Some("Harpsichrd 2 3-C5"),
    Some("Horns 1-B2"),
    Some("Horns 2-F3"),
    Some("Marimba 1-C4"),
    Some("Marimba 2-C5"),
    Some("Music Box 1-C3"),
    Some("Music Box 2-C4"),
    Some("Nylon Guitar 1-C2"),
    Some("Nylon Guitar 2-C4"),
    Some("Oboe 1 1-C#3"),
    Some("Oboe 1 2-E4"),
    Some("Oboe 2 1-C4"),
    Some("Oboe 2 2-C5"),
    Some("Pan Flute 1-C3"),
    Some("Pan Flute 2-C4"),
    Some("Pan Flute 3-C5"),
    Some("Piano 1-F#2"),
    Some("Piano 2-F#3"),
    Some("Piano 3-F#4"),
    Some("Pick Bass 1-D0"),
    Some("Pick Bass 2-D1"),
    Some("Pizz Strings 1-A1"),
    Some("Pizz Strings 2-F#"),
    Some("Pizz Strings 3-C3"),
    Some("Pizz Strings 4-C4"),
    Some("Sitar 1-D2"),
    Some("Sitar 2-D3"),
    Some("Steel Guitar 1-C2"),
    Some("Steel Guitar 1-D3"),
    Some("String Sec. 1-C2"),
    Some("String Sec. 2-C3"),
    Some("String Sec. 3-C4"),
    Some("Syn Mallet 1-C1"),
    Some("Syn Mallet 2-C4"),
    Some("Syn String 1 1-C1"),
    Some("Syn String 1 2-C2"),
    Some("Syn String 1 3-E3"),
    Some("Syn String 1 4-C4"),
    Some("Syn String 1 5-C5"),
    Some("Synth 1 1-C2"),
    Some("Synth 1 2-C3"),
    Some("Synth 2 1-C3"),
    Some("Synth 2 2-C4"),
    Some("Synth 2 3-C5"),
    Some("Trombone 1-G1"),
    Some("Trombone 2-E2"),
    Some("Trombone 3-F3"),
    Some("Tuba 1-A0"),
    Some("Tuba 2-G1"),
    Some("Tuba 3-C2"),
    Some("Tubular Bell 1-C3"),
    Some("Tubular Bell 2-C3"),
    Some("UnusedSynth 1-C1"),
    Some("UnusedSynth 2-C3"),
    Some("Vibraphone 1-C4"),
    Some("Vibraphone 2-C5"),
    Some("Violin 1 1-C#3"),
    Some("Violin 1 2-G3"),
    Some("Violin 1 3-G4"),
    Some("Violin 2 1-G3"),
    Some("Violin 2 2-G4"),
    Some("Voice Oohs 1-C2"),
    Some("Voice Oohs 3-A3"),
    Some("Voice Oohs 3-C3"),
];

/// (bgm file number, preset id) -> preset name
const HARVEST_TABLE: &[(u16, u16, &str)] = &[
    (0, 0x33, "SFX WaterR 1"),
    (0, 0x3B, "SFX WaterRSW 1"),
    (1, 0x33, "Flute 1"),
    (1, 0x35, "Clarinet"),
    (1, 0x36, "Bassoon 1"),
    (1, 0x3B, "Brass 1"),
    (1, 0x3E, "Trombone"),
    (1, 0x3F, "Tuba"),
    (1, 0x79, "Timpani 1"),
    (3, 0x01, "Electric Piano"),
    (3, 0x03, "SFX Dojo"),
    (3, 0x07, "Glockenspiel 1"),
    (3, 0x0E, "Harpsichord 1"),
    (3, 0x14, "Nylon Guitar"),
    (3, 0x61, "Synth Saw"),
    (4, 0x51, "Pan Flute"),
    (5, 0x19, "Synth Bass 1"),
    (5, 0x53, "Steel Drum"),
    (6, 0x04, "Glockenspiel 2"),
    (8, 0x7F, "Drumkit(Guild)"),
    (9, 0x17, "Steel Guitar"),
    (9, 0x2E, "Viola Section"),
    (9, 0x7B, "Pitched Drum"),
    (10, 0x1A, "Synth Bass 2"),
    (10, 0x1F, "String Section"),
    (10, 0x51, "Recorder"),
    (12, 0x0A, "Music Box"),
    (12, 0x4B, "Pizzicato Strings"),
    (12, 0x60, "Synth Square"),
    (13, 0x3D, "Brass 2"),
    (14, 0x23, "Choir Aahs"),
    (14, 0x65, "SFX Wind Gust"),
    (15, 0x5E, "Synth 3"),
    (16, 0x44, "Trumpet Section"),
    (16, 0x48, "Violin 1"),
    (16, 0x4A, "Bass Section"),
    (16, 0x5E, "Ocarina"),
    (16, 0x61, "Celeste"),
    (17, 0x43, "French Horns 1"),
    (18, 0x03, "SFX WNoise 1"),
    (21, 0x03, "Solo Voice"),
    (22, 0x06, "Vibraphone"),
    (22, 0x52, "Brass 3"),
    (23, 0x05, "Marimba"),
    (23, 0x54, "Sitar"),
    (24, 0x62, "Synth Sine"),
    (25, 0x2A, "Bagpipe"),
    (26, 0x41, "B&H Horn"),
    (29, 0x0D, "FoggyForest Perc"),
    (39, 0x0C, "Tubular Bells"),
    (41, 0x03, "Tine E-Piano"),
    (47, 0x1C, "Pick Bass"),
    (49, 0x03, "Piano Bass"),
    (50, 0x0F, "Fantasia 1"),
    (51, 0x10, "Fantasia(bgm051)"),
    (53, 0x7F, "Drumkit"),
    (56, 0x08, "Banjo"),
    (56, 0x10, "Solo Trumpet 1"),
    (58, 0x0B, "Harp"),
    (58, 0x5C, "Synth Saw-Triangle"),
    (64, 0x08, "Synth Organ"),
    (64, 0x10, "Drop Echo"),
    (69, 0x20, "Synth Strings 1"),
    (69, 0x24, "Voice Tenor"),
    (69, 0x34, "English Horn"),
    (69, 0x48, "Viola"),
    (71, 0x03, "Melodica"),
    (74, 0x01, "Synth Mallet"),
    (74, 0x03, "Fantasia 2"),
    (74, 0x0D, "Synth Strings 2"),
    (81, 0x2C, "Percussive Organ"),
    (81, 0x74, "SFX Electro 4"),
    (84, 0x0A, "Mandolin"),
    (85, 0x08, "J-Bass"),
    (85, 0x33, "Flute 2"),
    (85, 0x48, "Violins"),
    (86, 0x03, "FM E-Piano"),
    (90, 0x42, "Brass 4"),
    (96, 0x6C, "SFX WNoise 2"),
    (99, 0x16, "Overdriven Guitar"),
    (99, 0x7E, "Pitched Crash Cym"),
    (100, 0x00, "SFX Wave or Wind 1"),
    (100, 0x01, "SFX WaterS 1"),
    (100, 0x02, "SFX Wave or Wind 2"),
    (101, 0x00, "SFX Thunder"),
    (101, 0x02, "SFX WindH 3"),
    (103, 0x00, "SFX Tremor 1"),
    (103, 0x01, "SFX Tremor 2"),
    (104, 0x00, "SFX Tremor 5"),
    (105, 0x00, "SFX Tremor 3"),
    (105, 0x01, "SFX Tremor 4"),
    (106, 0x00, "SFX Bubble 1"),
    (106, 0x01, "SFX Bubble 2"),
    (107, 0x10, "Wood Block"),
    (107, 0x12, "SFX Clock"),
    (107, 0x3B, "SFX WindH 2"),
    (107, 0x3C, "SFX WindH 1"),
    (107, 0x3E, "SFX WindH 5"),
    (108, 0x11, "Fantasia(bgm108)"),
    (112, 0x00, "SFX Magic 1"),
    (112, 0x01, "SFX Electro 1"),
    (113, 0x00, "SFX Wave or Wind 3"),
    (113, 0x02, "SFX Swoosh"),
    (114, 0x01, "SFX Electro 2"),
    (114, 0x02, "SFX Electro 3"),
    (115, 0x01, "SFX Fire Pop"),
    (115, 0x02, "SFX Fire 1"),
    (116, 0x01, "SFX Fire 2"),
    (117, 0x00, "SFX Magic 3"),
    (117, 0x01, "SFX Magic 2"),
    (118, 0x00, "SFX Magic 4"),
    (123, 0x03, "Pitched Cymbal"),
    (123, 0x40, "Horn Section"),
    (125, 0x03, "SFX WaterW 1"),
    (125, 0x04, "SFX WaterSW 1"),
    (126, 0x03, "SFX Eating"),
    (127, 0x00, "SFX DrkFtrChrd"),
    (128, 0x00, "SFX WaterSR 1"),
    (135, 0x34, "Oboe 1"),
    (136, 0x1B, "Finger Bass"),
    (136, 0x7B, "Pitched Claves"),
    (136, 0x7C, "Pitched Tamburine"),
    (138, 0x52, "Synth 4"),
    (139, 0x6A, "BoulderQuarryPerc"),
    (140, 0x40, "French Horn"),
    (141, 0x11, "Pitched Shaker"),
    (142, 0x49, "Cello"),
    (156, 0x42, "French Horns 2"),
    (160, 0x1D, "Slap Bass"),
    (161, 0x5D, "Synth Distorted"),
    (162, 0x5C, "Synth 1"),
    (164, 0x04, "Piano"),
    (167, 0x41, "Bass & Horn"),
    (170, 0x41, "B&H Bass"),
    (173, 0x42, "Saxophone"),
    (175, 0x44, "Brass Section"),
    (178, 0x16, "Distorted Guitar"),
    (178, 0x63, "Synth Triangle 1"),
    (179, 0x00, "SFX Bubble 3"),
    (179, 0x01, "SFX Splash"),
    (181, 0x01, "SFX Wave or Wind 4"),
    (182, 0x02, "SFX Wind 2"),
    (183, 0x00, "SFX Wind 3"),
    (183, 0x01, "SFX Droplet 1"),
    (183, 0x03, "SFX Droplet 2"),
    (185, 0x02, "SFX WaterS 2"),
    (186, 0x01, "SFX WaterR 2"),
    (186, 0x02, "SFX WaterR 3"),
    (188, 0x02, "SFX Hiss"),
    (189, 0x00, "SFX Wind 1"),
    (190, 0x00, "SFX WaterR 5"),
    (190, 0x01, "SFX WaterR 4"),
    (190, 0x02, "SFX Rustling"),
    (191, 0x00, "SFX Crack 1"),
    (191, 0x01, "SFX Crack 2"),
    (193, 0x00, "Voice Oohs"),
];
