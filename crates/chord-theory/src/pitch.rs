use serde::{Deserialize, Serialize};

/// Symbol-free spellings used inside canonical keys.
const CATALOG_NAMES: [&str; 12] = [
    "C", "Csharp", "D", "Dsharp", "E", "F", "Fsharp", "G", "Gsharp", "A", "Asharp", "B",
];

/// Spellings shown back to the user.
const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Every accepted spelling per class: sharp and flat forms, ASCII and glyph.
const SPELLINGS: [&[&str]; 12] = [
    &["C"],
    &["C#", "Db", "C♯", "D♭"],
    &["D"],
    &["D#", "Eb", "D♯", "E♭"],
    &["E"],
    &["F"],
    &["F#", "Gb", "F♯", "G♭"],
    &["G"],
    &["G#", "Ab", "G♯", "A♭"],
    &["A"],
    &["A#", "Bb", "A♯", "B♭"],
    &["B"],
];

/// One of the 12 semitone identities within an octave.
///
/// Enharmonic spellings (C# vs Db) are aliases of a single class, never
/// separate identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const COUNT: u8 = 12;

    /// MIDI note number of class 0 in the sounding octave (middle C).
    pub const MIDDLE_C: u8 = 60;

    pub fn new(class: u8) -> Option<Self> {
        (class < Self::COUNT).then_some(Self(class))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Symbol-free spelling used in canonical keys: "Csharp", "A".
    pub fn catalog_name(self) -> &'static str {
        CATALOG_NAMES[self.0 as usize]
    }

    /// User-facing spelling: "C#", "A".
    pub fn display_name(self) -> &'static str {
        NOTE_NAMES_SHARP[self.0 as usize]
    }

    /// Accepted alias spellings of this class.
    pub fn spellings(self) -> &'static [&'static str] {
        SPELLINGS[self.0 as usize]
    }

    /// MIDI note number of this class in the sounding octave.
    pub fn midi_root(self) -> u8 {
        Self::MIDDLE_C + self.0
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
