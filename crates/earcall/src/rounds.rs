//! Per-round pending-answer storage.
//!
//! Every issued challenge gets its own slot keyed by a generated round id,
//! so concurrent challenge/grade pairs can never read each other's answer.
//! Grading consumes the slot: a round is graded exactly once, and a second
//! attempt finds nothing.

use std::time::{Duration, Instant};

use chord_theory::CanonicalKey;
use dashmap::DashMap;
use uuid::Uuid;

/// One in-flight challenge, awaiting exactly one grading.
#[derive(Debug, Clone)]
pub struct PendingRound {
    pub key: CanonicalKey,
    pub issued_at: Instant,
}

#[derive(Debug, Default)]
pub struct RoundStore {
    rounds: DashMap<String, PendingRound>,
}

impl RoundStore {
    pub fn new() -> Self {
        Self {
            rounds: DashMap::new(),
        }
    }

    /// Record a new pending round and return its id.
    pub fn issue(&self, key: CanonicalKey) -> String {
        let id = Uuid::new_v4().to_string();
        self.rounds.insert(
            id.clone(),
            PendingRound {
                key,
                issued_at: Instant::now(),
            },
        );
        tracing::debug!(round_id = %id, "round issued");
        id
    }

    /// Consume a pending round. Each round can be taken exactly once.
    pub fn take(&self, round_id: &str) -> Option<PendingRound> {
        self.rounds.remove(round_id).map(|(_, round)| round)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Remove rounds that have been pending longer than `max_idle`.
    /// Returns the number of rounds removed.
    pub fn cleanup(&self, max_idle: Duration) -> usize {
        let mut to_remove = Vec::new();
        for entry in self.rounds.iter() {
            if entry.value().issued_at.elapsed() > max_idle {
                to_remove.push(entry.key().clone());
            }
        }

        let mut removed = 0;
        for id in to_remove {
            if self.rounds.remove(&id).is_some() {
                tracing::info!(round_id = %id, "removed stale round");
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, remaining = self.rounds.len(), "round cleanup completed");
        }

        removed
    }
}
