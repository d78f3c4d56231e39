//! Key groups: voice priority and polyphony limits

/// Size of one key group entry
pub const KEYGROUP_SIZE: usize = 8;

/// Filler after the key group table
pub const KEYGROUP_PAD: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keygroup {
    pub id: u16,
    /// Maximum simultaneous voices, 0xFF for unlimited
    pub polyphony: u8,
    pub priority: u8,
    pub voice_low: u8,
    pub voice_high: u8,
}

impl Keygroup {
    const fn new(id: u16, polyphony: u8, priority: u8, voice_low: u8, voice_high: u8) -> Self {
        Self {
            id,
            polyphony,
            priority,
            voice_low,
            voice_high,
        }
    }

    pub fn to_bytes(self) -> [u8; KEYGROUP_SIZE] {
        let id = self.id.to_le_bytes();
        [
            id[0],
            id[1],
            self.polyphony,
            self.priority,
            self.voice_low,
            self.voice_high,
            0,
            0,
        ]
    }
}

/// Groups written into every generated bank
pub const DEFAULT_KEYGROUPS: [Keygroup; 7] = [
    Keygroup::new(0, 0xFF, 0x08, 0x00, 0xFF),
    Keygroup::new(1, 0x02, 0x08, 0x00, 0x0F),
    Keygroup::new(2, 0x01, 0x08, 0x00, 0x0F),
    Keygroup::new(3, 0x01, 0x08, 0x00, 0x0F),
    Keygroup::new(4, 0x01, 0x08, 0x00, 0x0F),
    Keygroup::new(5, 0xFF, 0x07, 0x00, 0x0F),
    Keygroup::new(6, 0xFF, 0x0F, 0x00, 0x08),
];
