//! Ear-training chord quiz engine.
//!
//! Draws a chord from a difficulty-filtered pool, exposes its canonical key
//! and event sequence to the rendering collaborator, and later grades a
//! free-text answer against the same identity. The HTTP layer, audio
//! conversion, and file serving are external collaborators; this crate owns
//! the round lifecycle and nothing else mutable.

pub mod error;
pub mod render;
pub mod rounds;
pub mod service;
pub mod tiers;

pub use error::{QuizError, RenderError};
pub use render::{AudioRef, ChordRenderer, SmfDirRenderer};
pub use rounds::{PendingRound, RoundStore};
pub use service::{Challenge, QuizService, Verdict};
pub use tiers::{pool, DifficultyTier, TierSet};
