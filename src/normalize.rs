//! # Delay Normalizer
//!
//! Replaces absolute onsets with the delay since the previous event.
//!
//! ## Tempo
//! One tempo covers the whole conversion: the first tempo symbol found in
//! any track, or [`DEFAULT_US_PER_BEAT`] (120 BPM). Later tempo changes are
//! not tracked.
//!
//! ## Delays
//! - the first event always has a delay of 0
//! - every later delay is `|onset[i] - onset[i-1]|` in milliseconds
//!
//! The absolute value matters when tracks are concatenated: the first note of
//! track 2 usually starts before the last note of track 1.

use crate::error::ConvertError;
use crate::event::{FinalEvent, RawEvent, Symbol};

/// 500 000 µs per beat, i.e. 120 BPM.
pub const DEFAULT_US_PER_BEAT: u32 = 500_000;

/// First tempo in track order, then stream order.
pub fn first_tempo(tracks: &[Vec<Symbol>]) -> Option<u32> {
    tracks.iter().flatten().find_map(|symbol| match symbol {
        Symbol::Tempo { us_per_beat } => Some(*us_per_beat),
        _ => None,
    })
}

/// Onset of `ticks` in milliseconds.
pub fn ticks_to_ms(ticks: u64, ticks_per_beat: i64, us_per_beat: u32) -> f64 {
    let ms_per_beat = us_per_beat as f64 / 1000.0;
    (ticks as f64 / ticks_per_beat as f64) * ms_per_beat
}

/// Convert raw events to final events, keeping their order.
///
/// # Errors
/// [`ConvertError::InvalidTimebase`] when `ticks_per_beat <= 0`.
pub fn normalize(
    events: Vec<RawEvent>,
    ticks_per_beat: i64,
    us_per_beat: u32,
) -> Result<Vec<FinalEvent>, ConvertError> {
    if ticks_per_beat <= 0 {
        return Err(ConvertError::InvalidTimebase(ticks_per_beat));
    }

    let mut previous_ms: Option<f64> = None;
    let finals = events
        .into_iter()
        .map(|event| {
            let onset_ms = ticks_to_ms(event.onset_ticks, ticks_per_beat, us_per_beat);
            let delay = match previous_ms {
                Some(prev) => (onset_ms - prev).abs(),
                None => 0.0,
            };
            previous_ms = Some(onset_ms);
            FinalEvent {
                pitch: event.pitch,
                octave: event.octave,
                duration: event.duration,
                delay_ms: delay.round() as u32,
            }
        })
        .collect();
    Ok(finals)
}
