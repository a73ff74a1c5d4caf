//! # Duration Quantizer
//!
//! Buckets a note length into one of the four durations the player knows.
//!
//! ## Beat thresholds
//! | beats          | class   |
//! |----------------|---------|
//! | `<= 0.5`       | Eighth  |
//! | `<= 1.0`       | Quarter |
//! | `<= 2.0`       | Half    |
//! | `>  2.0`       | Whole   |
//!
//! Upper edges are inclusive. Tablature does not measure beats; it counts
//! columns and goes through [`DurationClass::from_steps`] instead.

use serde::Serialize;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum DurationClass {
    Eighth = 0,
    Quarter = 1,
    Half = 2,
    Whole = 3,
}

/// Quantize `ticks` at the given timebase.
///
/// ```
/// use notetable::{quantize, DurationClass};
///
/// assert_eq!(quantize(240, 480).unwrap(), DurationClass::Eighth);
/// assert_eq!(quantize(960, 480).unwrap(), DurationClass::Half);
/// ```
///
/// # Errors
/// [`ConvertError::InvalidTimebase`] when `ticks_per_beat <= 0`.
pub fn quantize(ticks: u64, ticks_per_beat: i64) -> Result<DurationClass, ConvertError> {
    if ticks_per_beat <= 0 {
        return Err(ConvertError::InvalidTimebase(ticks_per_beat));
    }
    let beats = ticks as f64 / ticks_per_beat as f64;
    Ok(DurationClass::from_beats(beats))
}

impl DurationClass {
    pub fn from_beats(beats: f64) -> Self {
        if beats <= 0.5 {
            DurationClass::Eighth
        } else if beats <= 1.0 {
            DurationClass::Quarter
        } else if beats <= 2.0 {
            DurationClass::Half
        } else {
            DurationClass::Whole
        }
    }

    /// Integer duration table used by tablature: 1, 2, 3 columns are eighth,
    /// quarter, half; anything else is whole.
    pub fn from_steps(steps: u64) -> Self {
        match steps {
            1 => DurationClass::Eighth,
            2 => DurationClass::Quarter,
            3 => DurationClass::Half,
            _ => DurationClass::Whole,
        }
    }

    pub fn firmware_name(self) -> &'static str {
        match self {
            DurationClass::Eighth => "DURATION_EIGHTH",
            DurationClass::Quarter => "DURATION_QUARTER",
            DurationClass::Half => "DURATION_HALF",
            DurationClass::Whole => "DURATION_WHOLE",
        }
    }
}

/// How one extraction pass turns a tick length into a duration class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationScale {
    /// Ticks measured against a beat, as in MIDI.
    Beats { ticks_per_beat: i64 },
    /// Ticks are tablature columns, bucketed by the integer table.
    Steps,
}

impl DurationScale {
    pub fn classify(&self, ticks: u64) -> Result<DurationClass, ConvertError> {
        match *self {
            DurationScale::Beats { ticks_per_beat } => quantize(ticks, ticks_per_beat),
            DurationScale::Steps => Ok(DurationClass::from_steps(ticks)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPB: i64 = 480;

    #[test]
    fn test_boundaries_inclusive() {
        assert_eq!(quantize(240, TPB).unwrap(), DurationClass::Eighth);
        assert_eq!(quantize(241, TPB).unwrap(), DurationClass::Quarter);
        assert_eq!(quantize(480, TPB).unwrap(), DurationClass::Quarter);
        assert_eq!(quantize(481, TPB).unwrap(), DurationClass::Half);
        assert_eq!(quantize(960, TPB).unwrap(), DurationClass::Half);
        assert_eq!(quantize(961, TPB).unwrap(), DurationClass::Whole);
    }

    #[test]
    fn test_zero_length_is_eighth() {
        assert_eq!(quantize(0, TPB).unwrap(), DurationClass::Eighth);
    }

    #[test]
    fn test_fractional_beats() {
        assert_eq!(DurationClass::from_beats(0.5), DurationClass::Eighth);
        assert_eq!(DurationClass::from_beats(0.5 + f64::EPSILON), DurationClass::Quarter);
        assert_eq!(DurationClass::from_beats(2.0), DurationClass::Half);
        assert_eq!(DurationClass::from_beats(2.0 + 1e-9), DurationClass::Whole);
    }

    #[test]
    fn test_invalid_timebase() {
        assert_eq!(quantize(100, 0), Err(ConvertError::InvalidTimebase(0)));
        assert_eq!(quantize(100, -96), Err(ConvertError::InvalidTimebase(-96)));
    }

    #[test]
    fn test_step_table() {
        assert_eq!(DurationClass::from_steps(1), DurationClass::Eighth);
        assert_eq!(DurationClass::from_steps(2), DurationClass::Quarter);
        assert_eq!(DurationClass::from_steps(3), DurationClass::Half);
        assert_eq!(DurationClass::from_steps(4), DurationClass::Whole);
        assert_eq!(DurationClass::from_steps(0), DurationClass::Whole);
        assert_eq!(DurationClass::from_steps(17), DurationClass::Whole);
    }

    #[test]
    fn test_scale_dispatch() {
        let beats = DurationScale::Beats { ticks_per_beat: 96 };
        assert_eq!(beats.classify(96).unwrap(), DurationClass::Quarter);
        assert_eq!(DurationScale::Steps.classify(4).unwrap(), DurationClass::Whole);
    }
}
