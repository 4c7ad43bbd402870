//! Standard MIDI File output for a single chord.
//!
//! Generates SMF format 0 (single track): tempo meta, the chord's event
//! sequence, end-of-track.

use chord_theory::ChordIdentity;

use crate::events::{encode, ChordEvent, EventKind, ScoreParams};

/// Default tempo when none is specified: 120 BPM.
const DEFAULT_TEMPO_USEC: u32 = 500_000;

/// Render a chord identity as complete SMF format-0 bytes.
///
/// Deterministic: the same identity and params always produce the same
/// bytes.
pub fn chord_to_midi(identity: ChordIdentity, params: &ScoreParams) -> Vec<u8> {
    events_to_midi(&encode(identity, params), params)
}

/// Render an already-encoded event sequence as SMF format-0 bytes.
pub fn events_to_midi(events: &[ChordEvent], params: &ScoreParams) -> Vec<u8> {
    let mut track = Vec::new();

    write_vlq(&mut track, 0);
    track.extend_from_slice(&[
        0xFF,
        0x51,
        0x03,
        (DEFAULT_TEMPO_USEC >> 16) as u8,
        (DEFAULT_TEMPO_USEC >> 8) as u8,
        DEFAULT_TEMPO_USEC as u8,
    ]);

    for event in events {
        write_vlq(&mut track, event.delta);
        let status = match event.kind {
            EventKind::NoteOn => 0x90,
            EventKind::NoteOff => 0x80,
        };
        track.push(status | (params.channel & 0x0F));
        track.push(event.note);
        track.push(event.velocity);
    }

    // End of track
    write_vlq(&mut track, 0);
    track.extend_from_slice(&[0xFF, 0x2F, 0x00]);

    let mut buf = Vec::with_capacity(track.len() + 22);

    // MThd header
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes()); // format 0
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&params.ticks_per_beat.to_be_bytes());

    // MTrk chunk
    buf.extend_from_slice(b"MTrk");
    buf.extend_from_slice(&(track.len() as u32).to_be_bytes());
    buf.extend_from_slice(&track);

    buf
}

/// Write a variable-length quantity to a byte buffer.
fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    if value == 0 {
        buf.push(0);
        return;
    }

    let mut bytes = Vec::new();
    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buf.extend_from_slice(&bytes);
}
