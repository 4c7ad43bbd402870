use chord_theory::{CatalogEntry, ChordCatalog, ChordQuality, QUALITIES};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Quiz difficulty. Each built-in tier's quality set nests inside the next:
/// easy ⊆ medium ⊆ hard = full quality set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

const EASY: &[ChordQuality] = &[ChordQuality::Major, ChordQuality::Minor];

const MEDIUM: &[ChordQuality] = &[
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Dominant7,
    ChordQuality::Minor7,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
    ChordQuality::Suspended4,
];

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }

    /// Built-in quality set for this tier.
    pub fn builtin_qualities(self) -> Vec<ChordQuality> {
        match self {
            DifficultyTier::Easy => EASY.to_vec(),
            DifficultyTier::Medium => MEDIUM.to_vec(),
            DifficultyTier::Hard => ChordQuality::all().collect(),
        }
    }
}

impl std::str::FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(DifficultyTier::Easy),
            "medium" => Ok(DifficultyTier::Medium),
            "hard" => Ok(DifficultyTier::Hard),
            other => Err(format!("unknown difficulty {other:?}")),
        }
    }
}

/// Resolved quality set per tier, after any configuration overrides.
#[derive(Debug, Clone)]
pub struct TierSet {
    easy: Vec<ChordQuality>,
    medium: Vec<ChordQuality>,
    hard: Vec<ChordQuality>,
}

impl TierSet {
    pub fn builtin() -> Self {
        Self {
            easy: DifficultyTier::Easy.builtin_qualities(),
            medium: DifficultyTier::Medium.builtin_qualities(),
            hard: DifficultyTier::Hard.builtin_qualities(),
        }
    }

    /// Apply configured overrides on top of the built-in sets.
    ///
    /// Unknown quality names are rejected up front; an override that filters
    /// to nothing is allowed here and surfaces as an empty pool at request
    /// time.
    pub fn from_config(overrides: &earcall_conf::TiersConfig) -> Result<Self, QuizError> {
        let mut tiers = Self::builtin();
        for (names, slot) in [
            (&overrides.easy, &mut tiers.easy),
            (&overrides.medium, &mut tiers.medium),
            (&overrides.hard, &mut tiers.hard),
        ] {
            if let Some(names) = names {
                *slot = names
                    .iter()
                    .map(|name| {
                        quality_by_name(name).ok_or_else(|| QuizError::UnknownQuality {
                            name: name.clone(),
                        })
                    })
                    .collect::<Result<_, _>>()?;
            }
        }
        Ok(tiers)
    }

    pub fn qualities(&self, tier: DifficultyTier) -> &[ChordQuality] {
        match tier {
            DifficultyTier::Easy => &self.easy,
            DifficultyTier::Medium => &self.medium,
            DifficultyTier::Hard => &self.hard,
        }
    }
}

fn quality_by_name(name: &str) -> Option<ChordQuality> {
    QUALITIES
        .iter()
        .find(|def| def.name == name)
        .map(|def| def.quality)
}

/// Catalog entries whose quality belongs to the given set.
pub fn pool<'a>(catalog: &'a ChordCatalog, qualities: &[ChordQuality]) -> Vec<&'a CatalogEntry> {
    catalog
        .entries()
        .filter(|entry| qualities.contains(&entry.identity.quality))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn catalog() -> ChordCatalog {
        ChordCatalog::build().unwrap()
    }

    fn keys(catalog: &ChordCatalog, tier: DifficultyTier) -> HashSet<String> {
        pool(catalog, &tier.builtin_qualities())
            .into_iter()
            .map(|entry| entry.key.as_str().to_string())
            .collect()
    }

    #[test]
    fn tiers_nest() {
        let catalog = catalog();
        let easy = keys(&catalog, DifficultyTier::Easy);
        let medium = keys(&catalog, DifficultyTier::Medium);
        let hard = keys(&catalog, DifficultyTier::Hard);
        let full: HashSet<_> = catalog
            .entries()
            .map(|e| e.key.as_str().to_string())
            .collect();

        assert!(easy.is_subset(&medium));
        assert!(medium.is_subset(&hard));
        assert!(hard.is_subset(&full));
        assert_eq!(hard, full);
    }

    #[test]
    fn builtin_pools_nonempty() {
        let catalog = catalog();
        for tier in DifficultyTier::ALL {
            assert!(!pool(&catalog, &tier.builtin_qualities()).is_empty(), "{}", tier.name());
        }
    }

    #[test]
    fn easy_is_triads_on_every_root() {
        let catalog = catalog();
        assert_eq!(pool(&catalog, &DifficultyTier::Easy.builtin_qualities()).len(), 24);
    }

    #[test]
    fn override_replaces_one_tier() {
        let overrides = earcall_conf::TiersConfig {
            easy: Some(vec!["sus4".to_string()]),
            ..Default::default()
        };
        let tiers = TierSet::from_config(&overrides).unwrap();
        assert_eq!(
            tiers.qualities(DifficultyTier::Easy).to_vec(),
            vec![ChordQuality::Suspended4]
        );
        // untouched tier keeps the builtin set
        assert_eq!(
            tiers.qualities(DifficultyTier::Medium).to_vec(),
            DifficultyTier::Medium.builtin_qualities()
        );
    }

    #[test]
    fn override_with_unknown_quality_rejected() {
        let overrides = earcall_conf::TiersConfig {
            hard: Some(vec!["superlocrian".to_string()]),
            ..Default::default()
        };
        let err = TierSet::from_config(&overrides).expect_err("unknown name");
        assert!(matches!(err, QuizError::UnknownQuality { name } if name == "superlocrian"));
    }

    #[test]
    fn empty_override_is_allowed_but_empty() {
        let overrides = earcall_conf::TiersConfig {
            easy: Some(vec![]),
            ..Default::default()
        };
        let tiers = TierSet::from_config(&overrides).unwrap();
        assert!(pool(&catalog(), tiers.qualities(DifficultyTier::Easy)).is_empty());
    }

    #[test]
    fn tier_parses_from_name() {
        for tier in DifficultyTier::ALL {
            assert_eq!(tier.name().parse::<DifficultyTier>().unwrap(), tier);
        }
        assert!("extreme".parse::<DifficultyTier>().is_err());
    }
}
