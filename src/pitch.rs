//! # Pitch Mapper
//!
//! Maps a chromatic offset (0 = C … 11 = B) to the player's note enumerator.
//!
//! The player firmware numbers its notes downward from C:
//!
//! ```text
//! NOTE_INVALID=0  NOTE_C=1  NOTE_B=2  NOTE_AS=3  NOTE_A=4  NOTE_GS=5  NOTE_G=6
//! NOTE_FS=7  NOTE_F=8  NOTE_E=9  NOTE_DS=10  NOTE_D=11  NOTE_CS=12
//! ```
//!
//! so the chromatic offset is never the enumerator value. `PitchClass` keeps
//! the firmware value as its discriminant and the mapping goes through
//! [`map_pitch`] only.

use serde::Serialize;

use crate::error::ConvertError;

/// A playable pitch, or the `Silence` sentinel for anything unmappable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PitchClass {
    Silence = 0,
    C = 1,
    B = 2,
    ASharp = 3,
    A = 4,
    GSharp = 5,
    G = 6,
    FSharp = 7,
    F = 8,
    E = 9,
    DSharp = 10,
    D = 11,
    CSharp = 12,
}

/// Chromatic offset → pitch, indexed by offset.
const CHROMATIC: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

/// Map a chromatic offset to its pitch.
///
/// # Example
/// ```
/// use notetable::{map_pitch, PitchClass};
///
/// assert_eq!(map_pitch(0).unwrap(), PitchClass::C);
/// assert_eq!(map_pitch(10).unwrap(), PitchClass::ASharp);
/// assert!(map_pitch(12).is_err());
/// ```
///
/// # Errors
/// [`ConvertError::InvalidPitchClass`] for offsets of 12 or more.
pub fn map_pitch(pitch_class: u8) -> Result<PitchClass, ConvertError> {
    CHROMATIC
        .get(pitch_class as usize)
        .copied()
        .ok_or(ConvertError::InvalidPitchClass(pitch_class))
}

impl PitchClass {
    /// Firmware enumerator value (`note_t`).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Firmware enumerator name, as written in the generated table.
    pub fn firmware_name(self) -> &'static str {
        match self {
            PitchClass::Silence => "NOTE_INVALID",
            PitchClass::C => "NOTE_C",
            PitchClass::B => "NOTE_B",
            PitchClass::ASharp => "NOTE_AS",
            PitchClass::A => "NOTE_A",
            PitchClass::GSharp => "NOTE_GS",
            PitchClass::G => "NOTE_G",
            PitchClass::FSharp => "NOTE_FS",
            PitchClass::F => "NOTE_F",
            PitchClass::E => "NOTE_E",
            PitchClass::DSharp => "NOTE_DS",
            PitchClass::D => "NOTE_D",
            PitchClass::CSharp => "NOTE_CS",
        }
    }

    /// Chromatic offset of a tablature letter.
    ///
    /// Upper case `A`-`G` are naturals, lower case `a`-`g` the flat one
    /// semitone below (`c` wraps round to B).
    pub fn tab_offset(letter: char) -> Option<u8> {
        let natural = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        if letter.is_ascii_lowercase() {
            Some((natural + 11) % 12)
        } else {
            Some(natural)
        }
    }
}
