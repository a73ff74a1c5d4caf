//! Octave bands supported by the player.

use serde::Serialize;

/// Player octave band, descending: `A8` is the highest.
///
/// Anything below the supported range lands in `A5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum Octave {
    A8 = 0,
    A7 = 1,
    A6 = 2,
    A5 = 3,
}

/// Map an absolute octave number to a band.
///
/// MIDI octaves are `key / 12 - 1` (middle C = 4), tablature octaves are the
/// metadata digit. Values above 5 clamp to `A8`, values below 3 to `A5`.
///
/// ```
/// use notetable::{map_octave, Octave};
///
/// assert_eq!(map_octave(4), Octave::A7);
/// assert_eq!(map_octave(-1), Octave::A5);
/// ```
pub fn map_octave(raw_octave: i32) -> Octave {
    if raw_octave >= 5 {
        Octave::A8
    } else if raw_octave >= 4 {
        Octave::A7
    } else if raw_octave >= 3 {
        Octave::A6
    } else {
        Octave::A5
    }
}

impl Octave {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn firmware_name(self) -> &'static str {
        match self {
            Octave::A8 => "A8",
            Octave::A7 => "A7",
            Octave::A6 => "A6",
            Octave::A5 => "A5",
        }
    }
}
