use chord_theory::ChordIdentity;
use serde::{Deserialize, Serialize};

/// Parameters for score generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreParams {
    /// MIDI velocity for note-ons (1-127)
    pub velocity: u8,
    /// Ticks per quarter note (typically 480)
    pub ticks_per_beat: u16,
    /// How long the chord sounds, in ticks
    pub sustain_ticks: u32,
    /// MIDI channel (0-15)
    pub channel: u8,
}

impl Default for ScoreParams {
    fn default() -> Self {
        ScoreParams {
            velocity: 64,
            ticks_per_beat: 480,
            sustain_ticks: 960,
            channel: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// One timed note instruction. A chord's score is an ordered list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordEvent {
    pub kind: EventKind,
    pub note: u8,
    pub velocity: u8,
    /// Ticks since the previous event
    pub delta: u32,
}

/// Clamp a root-plus-offset note to the valid MIDI range.
fn offset_note(root: u8, offset: u8) -> u8 {
    (root as u16 + offset as u16).min(127) as u8
}

/// Encode a chord identity as a timed event sequence.
///
/// All note-ons fire at delta 0; the root's note-off carries the sustain
/// duration and the remaining note-offs follow at delta 0, so the whole
/// chord releases together once the root's hold elapses. Output is a pure
/// function of `(identity, params)`: exactly `2 × offsets` events, identical
/// across calls.
pub fn encode(identity: ChordIdentity, params: &ScoreParams) -> Vec<ChordEvent> {
    let root = identity.root.midi_root();
    let offsets = identity.quality.offsets();

    let mut events = Vec::with_capacity(offsets.len() * 2);

    for &offset in offsets {
        events.push(ChordEvent {
            kind: EventKind::NoteOn,
            note: offset_note(root, offset),
            velocity: params.velocity,
            delta: 0,
        });
    }

    for (index, &offset) in offsets.iter().enumerate() {
        events.push(ChordEvent {
            kind: EventKind::NoteOff,
            note: offset_note(root, offset),
            velocity: 0,
            delta: if index == 0 { params.sustain_ticks } else { 0 },
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chord_theory::{ChordQuality, PitchClass};
    use pretty_assertions::assert_eq;

    fn identity(class: u8, quality: ChordQuality) -> ChordIdentity {
        ChordIdentity {
            root: PitchClass::new(class).unwrap(),
            quality,
        }
    }

    #[test]
    fn c_major_event_layout() {
        let events = encode(identity(0, ChordQuality::Major), &ScoreParams::default());
        assert_eq!(events.len(), 6);

        // ons: C E G at delta 0
        assert_eq!(events[0], ChordEvent { kind: EventKind::NoteOn, note: 60, velocity: 64, delta: 0 });
        assert_eq!(events[1].note, 64);
        assert_eq!(events[2].note, 67);

        // root off carries the sustain, the rest release immediately after
        assert_eq!(events[3], ChordEvent { kind: EventKind::NoteOff, note: 60, velocity: 0, delta: 960 });
        assert_eq!(events[4].delta, 0);
        assert_eq!(events[5].delta, 0);
    }

    #[test]
    fn event_count_is_twice_offsets() {
        for quality in ChordQuality::all() {
            let events = encode(identity(9, quality), &ScoreParams::default());
            assert_eq!(events.len(), quality.offsets().len() * 2, "{:?}", quality);
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let id = identity(6, ChordQuality::Dominant7Sharp9);
        let params = ScoreParams::default();
        assert_eq!(encode(id, &params), encode(id, &params));
    }

    #[test]
    fn notes_stay_in_midi_range() {
        for class in 0..12 {
            for quality in ChordQuality::all() {
                for event in encode(identity(class, quality), &ScoreParams::default()) {
                    assert!(event.note <= 127);
                }
            }
        }
    }

    #[test]
    fn velocity_comes_from_params() {
        let params = ScoreParams {
            velocity: 100,
            ..ScoreParams::default()
        };
        let events = encode(identity(0, ChordQuality::Minor), &params);
        assert!(events
            .iter()
            .filter(|e| e.kind == EventKind::NoteOn)
            .all(|e| e.velocity == 100));
    }
}
