//! Symbolic chord scores.
//!
//! Converts a chord identity into an ordered, timed note-on/note-off event
//! sequence, and optionally into complete SMF bytes. No audio backend is
//! involved; turning the score into sound belongs to the rendering
//! collaborator.

pub mod events;
pub mod smf;

pub use events::{encode, ChordEvent, EventKind, ScoreParams};
pub use smf::{chord_to_midi, events_to_midi};
