//! # Event Extractor
//!
//! Walks symbol streams and pairs note-ons with note-offs.
//!
//! ## State
//! Every track gets its own [`ActiveNoteTable`] mapping a sounding
//! [`NoteKey`] to its onset tick. Many keys can be active at once.
//!
//! ## Rules
//! - note-on for an active key: ignored, the first onset stands
//! - note-off for an active key: emits a [`RawEvent`] stamped with its onset,
//!   unless the key has no pitch (rest) in which case nothing is emitted
//! - note-off for an inactive key: ignored
//! - keys still active at end of track: dropped
//!
//! Events come out in note-off order, not onset order. Multi-track input is
//! concatenated track after track with no merge by time.
//!
//! None of the anomalies above are errors; they are tallied in
//! [`ExtractStats`] and logged at debug level.

use std::collections::HashMap;

use tracing::debug;

use crate::duration::DurationScale;
use crate::error::ConvertError;
use crate::event::{NoteKey, RawEvent, Symbol};
use crate::octave::map_octave;
use crate::pitch::map_pitch;

/// Notes currently sounding in one track, keyed to their onset tick.
#[derive(Debug, Default)]
pub struct ActiveNoteTable {
    onsets: HashMap<NoteKey, u64>,
}

impl ActiveNoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a note. Returns `false` if the key was already sounding.
    pub fn start(&mut self, key: NoteKey, at: u64) -> bool {
        if self.onsets.contains_key(&key) {
            return false;
        }
        self.onsets.insert(key, at);
        true
    }

    /// Stop a note, returning its onset if it was sounding.
    pub fn stop(&mut self, key: &NoteKey) -> Option<u64> {
        self.onsets.remove(key)
    }

    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }
}

/// Counts of input anomalies absorbed during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub spurious_note_offs: usize,
    pub duplicate_note_ons: usize,
    pub unresolved_notes: usize,
    pub silenced_notes: usize,
}

impl ExtractStats {
    fn absorb(&mut self, other: ExtractStats) {
        self.spurious_note_offs += other.spurious_note_offs;
        self.duplicate_note_ons += other.duplicate_note_ons;
        self.unresolved_notes += other.unresolved_notes;
        self.silenced_notes += other.silenced_notes;
    }
}

/// Result of scanning one or more tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackExtraction {
    pub events: Vec<RawEvent>,
    pub stats: ExtractStats,
}

/// Extract the events of a single track.
///
/// The active-note table lives and dies inside this call.
pub fn extract_track(
    symbols: &[Symbol],
    scale: DurationScale,
) -> Result<TrackExtraction, ConvertError> {
    let mut active = ActiveNoteTable::new();
    let mut extraction = TrackExtraction::default();

    for symbol in symbols {
        match *symbol {
            Symbol::NoteOn { key, at } => {
                if !active.start(key, at) {
                    extraction.stats.duplicate_note_ons += 1;
                }
            }
            Symbol::NoteOff { key, at } => {
                let Some(onset) = active.stop(&key) else {
                    extraction.stats.spurious_note_offs += 1;
                    continue;
                };
                let Some(pitch_class) = key.pitch_class else {
                    extraction.stats.silenced_notes += 1;
                    continue;
                };
                extraction.events.push(RawEvent {
                    pitch: map_pitch(pitch_class)?,
                    octave: map_octave(key.octave),
                    duration: scale.classify(at.saturating_sub(onset))?,
                    onset_ticks: onset,
                });
            }
            Symbol::Tempo { .. } => {}
        }
    }

    extraction.stats.unresolved_notes = active.len();
    Ok(extraction)
}

/// Extract every track in order and concatenate the results.
pub fn extract_tracks(
    tracks: &[Vec<Symbol>],
    scale: DurationScale,
) -> Result<TrackExtraction, ConvertError> {
    let mut combined = TrackExtraction::default();
    for (index, symbols) in tracks.iter().enumerate() {
        let track = extract_track(symbols, scale)?;
        debug!(
            track = index,
            events = track.events.len(),
            stats = ?track.stats,
            "extracted track"
        );
        combined.events.extend(track.events);
        combined.stats.absorb(track.stats);
    }
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationClass;
    use crate::octave::Octave;
    use crate::pitch::PitchClass;

    const SCALE: DurationScale = DurationScale::Beats { ticks_per_beat: 480 };

    fn on(key: u8, at: u64) -> Symbol {
        Symbol::NoteOn { key: NoteKey::from_midi(key), at }
    }

    fn off(key: u8, at: u64) -> Symbol {
        Symbol::NoteOff { key: NoteKey::from_midi(key), at }
    }

    #[test]
    fn test_two_sequential_notes() {
        let symbols = vec![on(60, 0), off(60, 240), on(64, 480), off(64, 720)];
        let result = extract_track(&symbols, SCALE).unwrap();

        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].pitch, PitchClass::C);
        assert_eq!(result.events[0].octave, Octave::A7);
        assert_eq!(result.events[0].duration, DurationClass::Eighth);
        assert_eq!(result.events[0].onset_ticks, 0);
        assert_eq!(result.events[1].pitch, PitchClass::E);
        assert_eq!(result.events[1].onset_ticks, 480);
        assert_eq!(result.stats, ExtractStats::default());
    }

    #[test]
    fn test_spurious_note_off_is_ignored() {
        let symbols = vec![off(62, 100)];
        let result = extract_track(&symbols, SCALE).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(result.stats.spurious_note_offs, 1);
    }

    #[test]
    fn test_duplicate_note_on_keeps_first_onset() {
        let symbols = vec![on(60, 0), on(60, 100), off(60, 960)];
        let result = extract_track(&symbols, SCALE).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].onset_ticks, 0);
        assert_eq!(result.events[0].duration, DurationClass::Half);
        assert_eq!(result.stats.duplicate_note_ons, 1);
    }

    #[test]
    fn test_unresolved_notes_are_dropped() {
        let symbols = vec![on(60, 0), on(67, 10), off(67, 490)];
        let result = extract_track(&symbols, SCALE).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].pitch, PitchClass::G);
        assert_eq!(result.stats.unresolved_notes, 1);
    }

    #[test]
    fn test_emits_in_note_off_order() {
        // C starts first but ends last
        let symbols = vec![on(60, 0), on(64, 100), off(64, 200), off(60, 2000)];
        let result = extract_track(&symbols, SCALE).unwrap();
        let pitches: Vec<_> = result.events.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![PitchClass::E, PitchClass::C]);
        assert_eq!(result.events[1].duration, DurationClass::Whole);
    }

    #[test]
    fn test_silent_key_is_discarded() {
        let rest = NoteKey::silent(4);
        let symbols = vec![
            Symbol::NoteOn { key: rest, at: 0 },
            Symbol::NoteOff { key: rest, at: 2 },
            Symbol::NoteOn { key: NoteKey::from_midi(60), at: 2 },
            Symbol::NoteOff { key: NoteKey::from_midi(60), at: 3 },
        ];
        let result = extract_track(&symbols, DurationScale::Steps).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].onset_ticks, 2);
        assert_eq!(result.stats.silenced_notes, 1);
    }

    #[test]
    fn test_tracks_concatenate_without_merge() {
        let tracks = vec![
            vec![on(60, 960), off(60, 1440)],
            vec![on(62, 0), off(62, 480)],
        ];
        let result = extract_tracks(&tracks, SCALE).unwrap();
        let onsets: Vec<_> = result.events.iter().map(|e| e.onset_ticks).collect();
        assert_eq!(onsets, vec![960, 0]);
    }

    #[test]
    fn test_tracks_have_independent_tables() {
        // A note-on in track 0 is not closed by a note-off in track 1
        let tracks = vec![vec![on(60, 0)], vec![off(60, 480)]];
        let result = extract_tracks(&tracks, SCALE).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(result.stats.unresolved_notes, 1);
        assert_eq!(result.stats.spurious_note_offs, 1);
    }

    #[test]
    fn test_invalid_pitch_class_aborts() {
        let bad = NoteKey { pitch_class: Some(12), octave: 4 };
        let symbols = vec![
            Symbol::NoteOn { key: bad, at: 0 },
            Symbol::NoteOff { key: bad, at: 10 },
        ];
        let result = extract_track(&symbols, SCALE);
        assert_eq!(result, Err(ConvertError::InvalidPitchClass(12)));
    }

    #[test]
    fn test_invalid_timebase_aborts() {
        let symbols = vec![on(60, 0), off(60, 10)];
        let result = extract_track(&symbols, DurationScale::Beats { ticks_per_beat: 0 });
        assert_eq!(result, Err(ConvertError::InvalidTimebase(0)));
    }

    #[test]
    fn test_empty_stream() {
        let result = extract_tracks(&[], SCALE).unwrap();
        assert!(result.events.is_empty());
    }
}
