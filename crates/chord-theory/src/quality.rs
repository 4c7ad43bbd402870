use serde::{Deserialize, Serialize};

/// A named interval pattern defining a chord's structure relative to its root.
///
/// Variant order matches [`QUALITIES`]; `def()` indexes by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Suspended4,
    Add9,
    HalfDiminished7,
    Dominant7Sharp9,
    Dominant7Flat5,
    Dominant7Flat9,
    Major6,
    Minor6,
}

/// A quality definition: canonical name (symbol-free, used in canonical
/// keys), display suffix, accepted alternate spellings, and semitone offsets
/// from the root.
pub struct QualityDef {
    pub quality: ChordQuality,
    pub name: &'static str,
    pub suffix: &'static str,
    pub spellings: &'static [&'static str],
    pub offsets: &'static [u8],
}

impl QualityDef {
    const fn new(
        quality: ChordQuality,
        name: &'static str,
        suffix: &'static str,
        spellings: &'static [&'static str],
        offsets: &'static [u8],
    ) -> Self {
        Self {
            quality,
            name,
            suffix,
            spellings,
            offsets,
        }
    }
}

/// All recognized qualities, in [`ChordQuality`] discriminant order.
///
/// Offsets must be strictly increasing, start at 0, and hold 3–5 members;
/// `ChordCatalog::build` rejects the table otherwise.
pub static QUALITIES: &[QualityDef] = &[
    QualityDef::new(ChordQuality::Major, "major", "", &["maj"], &[0, 4, 7]),
    QualityDef::new(ChordQuality::Minor, "minor", "m", &["min"], &[0, 3, 7]),
    QualityDef::new(ChordQuality::Dominant7, "7th", "7", &["dom7"], &[0, 4, 7, 10]),
    QualityDef::new(ChordQuality::Diminished, "dim", "dim", &["diminished"], &[0, 3, 6]),
    QualityDef::new(ChordQuality::Augmented, "aug", "aug", &["augmented"], &[0, 4, 8]),
    QualityDef::new(ChordQuality::Major7, "major7", "maj7", &["maj7"], &[0, 4, 7, 11]),
    QualityDef::new(ChordQuality::Minor7, "minor7", "m7", &["min7"], &[0, 3, 7, 10]),
    QualityDef::new(ChordQuality::Suspended4, "sus4", "sus4", &[], &[0, 5, 7]),
    QualityDef::new(ChordQuality::Add9, "add9", "add9", &[], &[0, 4, 7, 14]),
    QualityDef::new(
        ChordQuality::HalfDiminished7,
        "m7flat5",
        "m7b5",
        &["m7-5", "m7b5"],
        &[0, 3, 6, 10],
    ),
    QualityDef::new(
        ChordQuality::Dominant7Sharp9,
        "7sharp9",
        "7#9",
        &["7#9"],
        &[0, 4, 7, 10, 15],
    ),
    QualityDef::new(
        ChordQuality::Dominant7Flat5,
        "7flat5",
        "7b5",
        &["7-5", "7b5"],
        &[0, 4, 6, 10],
    ),
    QualityDef::new(
        ChordQuality::Dominant7Flat9,
        "7flat9",
        "7b9",
        &["7-9", "7b9"],
        &[0, 4, 7, 10, 13],
    ),
    QualityDef::new(ChordQuality::Major6, "6", "6", &["major6"], &[0, 4, 7, 9]),
    QualityDef::new(ChordQuality::Minor6, "m6", "m6", &["minor6"], &[0, 3, 7, 9]),
];

impl ChordQuality {
    pub fn all() -> impl Iterator<Item = ChordQuality> {
        QUALITIES.iter().map(|def| def.quality)
    }

    pub fn def(self) -> &'static QualityDef {
        &QUALITIES[self as usize]
    }

    /// Canonical name, as it appears in canonical keys: "minor7", "7th".
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Suffix for chord symbol display: "m7", "7".
    pub fn suffix(self) -> &'static str {
        self.def().suffix
    }

    /// Semitone offsets from the root.
    pub fn offsets(self) -> &'static [u8] {
        self.def().offsets
    }

    /// Accepted alternate spellings beyond the canonical name.
    pub fn spellings(self) -> &'static [&'static str] {
        self.def().spellings
    }
}
