//! # Event Types
//!
//! The data that moves between pipeline stages.
//!
//! ```text
//! Vec<Symbol>   per track, absolute ticks       (front-ends produce these)
//!   └── RawEvent    pitch/octave/duration + onset  (extractor)
//!         └── FinalEvent  pitch/octave/duration + delay  (normalizer)
//! ```
//!
//! Front-ends agree on [`NoteKey`] as the identity of a sounding note so the
//! extractor never needs to know whether it is reading MIDI or tablature.

use serde::Serialize;

use crate::duration::DurationClass;
use crate::octave::Octave;
use crate::pitch::PitchClass;

/// Identity of a note while it sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    /// Chromatic offset 0..11, or `None` for a rest / unmappable symbol.
    pub pitch_class: Option<u8>,
    /// Absolute octave number, not yet banded.
    pub octave: i32,
}

impl NoteKey {
    /// Key for a MIDI note number (middle C = 60 = octave 4).
    pub fn from_midi(key: u8) -> Self {
        Self {
            pitch_class: Some(key % 12),
            octave: key as i32 / 12 - 1,
        }
    }

    pub fn silent(octave: i32) -> Self {
        Self {
            pitch_class: None,
            octave,
        }
    }
}

/// One time-stamped input symbol. `at` is absolute ticks within its track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    NoteOn { key: NoteKey, at: u64 },
    NoteOff { key: NoteKey, at: u64 },
    Tempo { us_per_beat: u32 },
}

/// A resolved note with its absolute onset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    pub pitch: PitchClass,
    pub octave: Octave,
    pub duration: DurationClass,
    pub onset_ticks: u64,
}

/// A note as the player stores it: delay is milliseconds since the previous
/// note's onset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalEvent {
    pub pitch: PitchClass,
    pub octave: Octave,
    pub duration: DurationClass,
    pub delay_ms: u32,
}
