use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::normalize;
use crate::pitch::PitchClass;
use crate::quality::{ChordQuality, QUALITIES};

/// The pair that actually identifies a chord. Every textual spelling is a
/// view onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordIdentity {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

/// The single authoritative text identifier for a chord identity.
///
/// Derived as catalog root name + quality name, no separators, no symbol
/// characters: `Cmajor`, `Csharpminor7`, `A7th`. The identity → key mapping
/// is a bijection over the catalog, checked at build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    fn derive(identity: ChordIdentity) -> Self {
        Self(format!(
            "{}{}",
            identity.root.catalog_name(),
            identity.quality.name()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One catalog chord: identity, canonical key, display spelling, and the
/// normalized forms grading accepts for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub identity: ChordIdentity,
    pub key: CanonicalKey,
    /// User-facing spelling: "C#m7".
    pub display: String,
    accepted: Vec<String>,
}

impl CatalogEntry {
    /// Whether a free-text submission names this chord.
    pub fn matches(&self, submission: &str) -> bool {
        let form = normalize(submission);
        self.accepted.iter().any(|accepted| accepted == &form)
    }

    pub fn accepted_forms(&self) -> &[String] {
        &self.accepted
    }
}

/// Catalog construction failures. All of these are programming errors in the
/// static tables: fatal at startup, never a request-time condition.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("quality table entry {index} ({name:?}) is out of enum order")]
    MisalignedQuality { index: usize, name: &'static str },

    #[error("quality {name:?} has malformed offsets {offsets:?}")]
    MalformedQuality {
        name: &'static str,
        offsets: &'static [u8],
    },

    #[error("canonical key {key:?} is shared by two catalog entries")]
    DuplicateKey { key: String },

    #[error("accepted spelling {form:?} of {key} already matches {other}")]
    AmbiguousSpelling {
        form: String,
        key: String,
        other: String,
    },
}

/// The full root × quality registry, built once at startup and immutable
/// thereafter. Safe to share behind an `Arc` across any number of rounds.
#[derive(Debug)]
pub struct ChordCatalog {
    entries: Vec<CatalogEntry>,
    by_key: HashMap<String, usize>,
}

impl ChordCatalog {
    /// Build and validate the catalog.
    ///
    /// Validates the quality table, the key bijection, and that no accepted
    /// spelling is claimed by two entries.
    pub fn build() -> Result<Self, CatalogError> {
        for (index, def) in QUALITIES.iter().enumerate() {
            if def.quality as usize != index {
                return Err(CatalogError::MisalignedQuality {
                    index,
                    name: def.name,
                });
            }
            let well_formed = (3..=5).contains(&def.offsets.len())
                && def.offsets.first() == Some(&0)
                && def.offsets.windows(2).all(|w| w[0] < w[1]);
            if !well_formed {
                return Err(CatalogError::MalformedQuality {
                    name: def.name,
                    offsets: def.offsets,
                });
            }
        }

        let mut entries = Vec::with_capacity(12 * QUALITIES.len());
        let mut by_key = HashMap::new();
        let mut claimed: HashMap<String, String> = HashMap::new();

        for root in PitchClass::all() {
            for def in QUALITIES {
                let identity = ChordIdentity {
                    root,
                    quality: def.quality,
                };
                let key = CanonicalKey::derive(identity);
                let display = format!("{}{}", root.display_name(), def.suffix);

                let mut accepted = Vec::new();
                let root_spellings =
                    std::iter::once(root.catalog_name()).chain(root.spellings().iter().copied());
                for root_spelling in root_spellings {
                    let quality_spellings =
                        std::iter::once(def.name).chain(def.spellings.iter().copied());
                    for quality_spelling in quality_spellings {
                        let form = normalize(&format!("{root_spelling}{quality_spelling}"));
                        if !accepted.contains(&form) {
                            accepted.push(form);
                        }
                    }
                }

                for form in &accepted {
                    if let Some(other) = claimed.insert(form.clone(), key.to_string()) {
                        return Err(CatalogError::AmbiguousSpelling {
                            form: form.clone(),
                            key: key.to_string(),
                            other,
                        });
                    }
                }

                if by_key.insert(key.as_str().to_string(), entries.len()).is_some() {
                    return Err(CatalogError::DuplicateKey {
                        key: key.to_string(),
                    });
                }
                entries.push(CatalogEntry {
                    identity,
                    key,
                    display,
                    accepted,
                });
            }
        }

        Ok(Self { entries, by_key })
    }

    pub fn lookup(&self, key: &str) -> Option<&CatalogEntry> {
        self.by_key.get(key).map(|&index| &self.entries[index])
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
