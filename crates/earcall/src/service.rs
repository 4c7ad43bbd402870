//! Quiz orchestration: draw a chord, hold the pending answer, grade the
//! submission.
//!
//! The catalog is immutable shared state; the only mutable state is the
//! per-round pending answer in [`RoundStore`]. All operations are
//! synchronous and complete in one call.

use std::sync::Arc;
use std::time::Duration;

use chord_score::{encode, ChordEvent, ScoreParams};
use chord_theory::{CanonicalKey, CatalogEntry, ChordCatalog};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::QuizError;
use crate::render::{AudioRef, ChordRenderer};
use crate::rounds::RoundStore;
use crate::tiers::{pool, DifficultyTier, TierSet};

/// One issued challenge: everything the request layer needs to hand the
/// score to the renderer and the round id back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Challenge {
    pub round_id: String,
    pub key: CanonicalKey,
    pub display: String,
    pub events: Vec<ChordEvent>,
}

/// Grading outcome. Always produced, even for garbled submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub correct: bool,
    /// Display spelling of the expected answer
    pub expected: String,
}

pub struct QuizService {
    catalog: Arc<ChordCatalog>,
    tiers: TierSet,
    params: ScoreParams,
    rounds: RoundStore,
}

impl QuizService {
    pub fn new(catalog: Arc<ChordCatalog>, tiers: TierSet, params: ScoreParams) -> Self {
        Self {
            catalog,
            tiers,
            params,
            rounds: RoundStore::new(),
        }
    }

    /// Build from configuration: tier overrides and score parameters.
    pub fn from_config(
        catalog: Arc<ChordCatalog>,
        config: &earcall_conf::EarcallConfig,
    ) -> Result<Self, QuizError> {
        let tiers = TierSet::from_config(&config.quiz.tiers)?;
        let params = ScoreParams {
            velocity: config.score.velocity,
            ticks_per_beat: config.score.ticks_per_beat,
            sustain_ticks: config.score.sustain_ticks,
            channel: 0,
        };
        Ok(Self::new(catalog, tiers, params))
    }

    pub fn catalog(&self) -> &ChordCatalog {
        &self.catalog
    }

    /// Canonical keys selectable at this tier.
    pub fn pool_keys(&self, tier: DifficultyTier) -> Vec<CanonicalKey> {
        pool(&self.catalog, self.tiers.qualities(tier))
            .into_iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Draw one chord uniformly at random from the tier's pool and record
    /// it as a pending round.
    pub fn issue_challenge(&self, tier: DifficultyTier) -> Result<Challenge, QuizError> {
        self.issue_challenge_with_rng(tier, &mut rand::thread_rng())
    }

    /// Like [`issue_challenge`](Self::issue_challenge), with a caller-supplied
    /// RNG for deterministic selection.
    pub fn issue_challenge_with_rng<R: Rng + ?Sized>(
        &self,
        tier: DifficultyTier,
        rng: &mut R,
    ) -> Result<Challenge, QuizError> {
        let pool = pool(&self.catalog, self.tiers.qualities(tier));
        let entry = pool.choose(rng).ok_or_else(|| QuizError::EmptyPool {
            tier: tier.name().to_string(),
        })?;
        Ok(self.issue_for_entry(entry, tier))
    }

    fn issue_for_entry(&self, entry: &CatalogEntry, tier: DifficultyTier) -> Challenge {
        let events = encode(entry.identity, &self.params);
        let round_id = self.rounds.issue(entry.key.clone());
        info!(round_id = %round_id, tier = tier.name(), "challenge issued");
        debug!(round_id = %round_id, key = %entry.key, "pending answer recorded");
        Challenge {
            round_id,
            key: entry.key.clone(),
            display: entry.display.clone(),
            events,
        }
    }

    /// Issue a challenge and hand its score to the rendering collaborator.
    ///
    /// A renderer failure withdraws the round and surfaces as
    /// [`QuizError::ChallengeUnavailable`]; the catalog is untouched.
    pub fn challenge_rendered(
        &self,
        tier: DifficultyTier,
        renderer: &dyn ChordRenderer,
    ) -> Result<(Challenge, AudioRef), QuizError> {
        let challenge = self.issue_challenge(tier)?;
        match renderer.render(&challenge.key, &challenge.events) {
            Ok(audio) => Ok((challenge, audio)),
            Err(source) => {
                self.rounds.take(&challenge.round_id);
                Err(QuizError::ChallengeUnavailable { source })
            }
        }
    }

    /// Grade a submission against a pending round, consuming the round.
    ///
    /// Always yields a verdict for any submission text; only a missing or
    /// already-graded round is an error.
    pub fn grade(&self, round_id: &str, submission: &str) -> Result<Verdict, QuizError> {
        let round = self
            .rounds
            .take(round_id)
            .ok_or_else(|| QuizError::UnknownRound {
                round_id: round_id.to_string(),
            })?;

        let entry = self
            .catalog
            .lookup(round.key.as_str())
            .ok_or_else(|| QuizError::UnknownRound {
                round_id: round_id.to_string(),
            })?;

        let correct = entry.matches(submission);
        info!(round_id, correct, "round graded");
        Ok(Verdict {
            correct,
            expected: entry.display.clone(),
        })
    }

    /// Number of rounds currently awaiting an answer.
    pub fn pending_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Drop rounds that have been pending longer than `max_idle`.
    pub fn cleanup(&self, max_idle: Duration) -> usize {
        self.rounds.cleanup(max_idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service() -> QuizService {
        QuizService::new(
            Arc::new(ChordCatalog::build().unwrap()),
            TierSet::builtin(),
            ScoreParams::default(),
        )
    }

    fn issue(service: &QuizService, key: &str) -> Challenge {
        let entry = service.catalog().lookup(key).expect("key exists");
        service.issue_for_entry(entry, DifficultyTier::Hard)
    }

    #[test]
    fn casual_spellings_of_c_major_grade_correct() {
        let service = service();
        for submission in ["C", "c major", "Cmajor", " C "] {
            let challenge = issue(&service, "Cmajor");
            let verdict = service.grade(&challenge.round_id, submission).unwrap();
            assert!(verdict.correct, "{submission:?}");
            assert_eq!(verdict.expected, "C");
        }

        let challenge = issue(&service, "Cmajor");
        let verdict = service.grade(&challenge.round_id, "Cm").unwrap();
        assert!(!verdict.correct);
    }

    #[test]
    fn a_minor7_spellings_grade_correct() {
        let service = service();
        for submission in ["Am7", "A minor7", "a_m_7"] {
            let challenge = issue(&service, "Aminor7");
            let verdict = service.grade(&challenge.round_id, submission).unwrap();
            assert!(verdict.correct, "{submission:?}");
        }

        let challenge = issue(&service, "Aminor7");
        let verdict = service.grade(&challenge.round_id, "A7").unwrap();
        assert!(!verdict.correct);
        assert_eq!(verdict.expected, "Am7");
    }

    #[test]
    fn garbled_submission_is_a_verdict_not_an_error() {
        let service = service();
        let challenge = issue(&service, "Gdim");
        let verdict = service.grade(&challenge.round_id, "!!! 日本語 ♭♭♭").unwrap();
        assert!(!verdict.correct);
    }

    #[test]
    fn round_is_single_use() {
        let service = service();
        let challenge = issue(&service, "Cmajor");
        service.grade(&challenge.round_id, "C").unwrap();

        let err = service.grade(&challenge.round_id, "C").expect_err("already graded");
        assert!(matches!(err, QuizError::UnknownRound { .. }));
    }

    #[test]
    fn unknown_round_is_an_error() {
        let service = service();
        let err = service.grade("no-such-round", "C").expect_err("unknown round");
        assert!(matches!(err, QuizError::UnknownRound { .. }));
    }

    #[test]
    fn concurrent_rounds_stay_isolated() {
        let service = service();
        let first = issue(&service, "Cmajor");
        let second = issue(&service, "Aminor7");

        // grading in reverse order, each against its own answer
        assert!(service.grade(&second.round_id, "Am7").unwrap().correct);
        assert!(service.grade(&first.round_id, "C").unwrap().correct);
    }

    #[test]
    fn submitting_the_other_rounds_answer_is_wrong() {
        let service = service();
        let first = issue(&service, "Cmajor");
        let second = issue(&service, "Aminor7");

        assert!(!service.grade(&first.round_id, "Am7").unwrap().correct);
        assert!(!service.grade(&second.round_id, "C").unwrap().correct);
    }

    #[test]
    fn challenge_draws_from_the_requested_tier() {
        let service = service();
        let easy_keys = service.pool_keys(DifficultyTier::Easy);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let challenge = service
                .issue_challenge_with_rng(DifficultyTier::Easy, &mut rng)
                .unwrap();
            assert!(easy_keys.contains(&challenge.key), "{}", challenge.key);
        }
    }

    #[test]
    fn challenge_carries_the_event_sequence() {
        let service = service();
        let challenge = issue(&service, "G7th");
        let offsets = service
            .catalog()
            .lookup("G7th")
            .unwrap()
            .identity
            .quality
            .offsets();
        assert_eq!(challenge.events.len(), offsets.len() * 2);
    }

    #[test]
    fn empty_tier_is_an_explicit_empty_pool() {
        let overrides = earcall_conf::TiersConfig {
            easy: Some(vec![]),
            ..Default::default()
        };
        let service = QuizService::new(
            Arc::new(ChordCatalog::build().unwrap()),
            TierSet::from_config(&overrides).unwrap(),
            ScoreParams::default(),
        );

        let err = service
            .issue_challenge(DifficultyTier::Easy)
            .expect_err("empty pool");
        assert!(matches!(err, QuizError::EmptyPool { tier } if tier == "easy"));
        // no fallback: other tiers still work
        assert!(service.issue_challenge(DifficultyTier::Medium).is_ok());
    }

    #[test]
    fn render_failure_withdraws_the_round() {
        struct FailingRenderer;
        impl ChordRenderer for FailingRenderer {
            fn render(
                &self,
                key: &CanonicalKey,
                _events: &[ChordEvent],
            ) -> Result<AudioRef, crate::error::RenderError> {
                Err(crate::error::RenderError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("synth offline"),
                })
            }
        }

        let service = service();
        let err = service
            .challenge_rendered(DifficultyTier::Easy, &FailingRenderer)
            .expect_err("renderer down");
        assert!(matches!(err, QuizError::ChallengeUnavailable { .. }));
        assert_eq!(service.pending_rounds(), 0);
    }

    #[test]
    fn rendered_challenge_names_asset_by_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = service();
        let renderer = crate::render::SmfDirRenderer::new(dir.path(), ScoreParams::default());

        let (challenge, audio) = service
            .challenge_rendered(DifficultyTier::Easy, &renderer)
            .unwrap();
        assert!(audio.0.ends_with(&format!("{}.mid", challenge.key)));
        assert_eq!(service.pending_rounds(), 1);
    }

    #[test]
    fn challenge_serializes_for_the_request_layer() {
        let service = service();
        let challenge = issue(&service, "Csharpminor7");
        let json = serde_json::to_value(&challenge).unwrap();
        assert_eq!(json["key"], "Csharpminor7");
        assert_eq!(json["display"], "C#m7");
        assert!(json["events"].as_array().is_some());
    }
}
