//! # MIDI Front-end
//!
//! Turns a Standard MIDI File into one symbol stream per track.
//!
//! - Delta times are accumulated into absolute ticks per track.
//! - `NoteOn` with velocity 0 counts as `NoteOff`.
//! - Channels are not distinguished; a track has one note table.
//! - `Tempo` meta events are kept as [`Symbol::Tempo`].
//!
//! Only metrical (ticks-per-beat) timing is supported.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::event::{NoteKey, Symbol};

/// Symbol streams read from a MIDI file.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiSource {
    pub ticks_per_beat: i64,
    pub tracks: Vec<Vec<Symbol>>,
}

/// Parse `bytes` as a Standard MIDI File.
///
/// `selection` restricts scanning to the listed track indices; they are still
/// read in file order.
///
/// # Errors
/// - [`ConvertError::MalformedInput`] for unparseable data or SMPTE timing
/// - [`ConvertError::InvalidTimebase`] for a zero ticks-per-beat header
pub fn read_midi(
    source_name: &str,
    bytes: &[u8],
    selection: Option<&[usize]>,
) -> Result<MidiSource, ConvertError> {
    let smf = Smf::parse(bytes).map_err(|e| ConvertError::malformed(source_name, e.to_string()))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => tpb.as_int() as i64,
        Timing::Timecode(fps, subframes) => {
            return Err(ConvertError::malformed(
                source_name,
                format!(
                    "SMPTE timing ({} fps, {} subframes) is not supported",
                    fps.as_int(),
                    subframes
                ),
            ));
        }
    };
    if ticks_per_beat <= 0 {
        return Err(ConvertError::InvalidTimebase(ticks_per_beat));
    }

    if let Some(selected) = selection {
        for index in selected.iter().filter(|&&i| i >= smf.tracks.len()) {
            warn!(
                track = index,
                available = smf.tracks.len(),
                "selected track does not exist"
            );
        }
    }

    let tracks: Vec<Vec<Symbol>> = smf
        .tracks
        .iter()
        .enumerate()
        .filter(|(index, _)| selection.map_or(true, |s| s.contains(index)))
        .map(|(_, track)| track_symbols(track))
        .collect();

    debug!(
        format = ?smf.header.format,
        ticks_per_beat,
        tracks = tracks.len(),
        "parsed MIDI file"
    );

    Ok(MidiSource {
        ticks_per_beat,
        tracks,
    })
}

fn track_symbols(track: &[TrackEvent<'_>]) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut now: u64 = 0;

    for event in track {
        now += event.delta.as_int() as u64;
        match event.kind {
            TrackEventKind::Midi { message, .. } => match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    symbols.push(Symbol::NoteOn {
                        key: NoteKey::from_midi(key.as_int()),
                        at: now,
                    });
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    symbols.push(Symbol::NoteOff {
                        key: NoteKey::from_midi(key.as_int()),
                        at: now,
                    });
                }
                _ => {}
            },
            TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                symbols.push(Symbol::Tempo {
                    us_per_beat: tempo.as_int(),
                });
            }
            _ => {}
        }
    }

    symbols
}
