//! # notetable
//!
//! Converts MIDI files and text tablature into the static note table an
//! 8-bit music player plays from.
//!
//! ## Pipeline
//! 1. Front-end (`midi` or `tablature`) reads the source into per-track
//!    symbol streams
//! 2. `extract` pairs note-ons with note-offs into raw events
//! 3. `normalize` turns onsets into inter-onset delays in milliseconds
//! 4. `render` writes the table (C array or YAML)
//!
//! ```rust
//! use notetable::{convert_tablature, ConvertConfig, PitchClass};
//!
//! let conversion = convert_tablature("tune.tab", "4|C-E-G---|", &ConvertConfig::default())?;
//! assert_eq!(conversion.events.len(), 3);
//! assert_eq!(conversion.events[1].pitch, PitchClass::E);
//! assert_eq!(conversion.events[1].delay_ms, 500);
//! # Ok::<(), notetable::ConvertError>(())
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod event;
pub mod extract;
pub mod midi;
pub mod normalize;
pub mod octave;
pub mod pitch;
pub mod render;
pub mod tablature;

pub use config::{ConvertConfig, OutputFormat};
pub use duration::{quantize, DurationClass, DurationScale};
pub use error::ConvertError;
pub use event::{FinalEvent, NoteKey, RawEvent, Symbol};
pub use extract::{extract_track, extract_tracks, ActiveNoteTable, ExtractStats, TrackExtraction};
pub use normalize::{first_tempo, normalize, DEFAULT_US_PER_BEAT};
pub use octave::{map_octave, Octave};
pub use pitch::{map_pitch, PitchClass};
pub use render::{render_events, CArrayRenderer, TrackRenderer, YamlRenderer};

use tracing::{info, warn};

/// Output of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub events: Vec<FinalEvent>,
    pub stats: ExtractStats,
    /// Tempo the delays were computed with.
    pub us_per_beat: u32,
    pub tracks_scanned: usize,
}

/// Convert a Standard MIDI File.
///
/// # Errors
/// Fatal [`ConvertError`]s for unreadable files; [`ConvertError::EmptyResult`]
/// when no note could be extracted.
pub fn convert_midi(
    source_name: &str,
    bytes: &[u8],
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    let source = midi::read_midi(source_name, bytes, config.tracks.as_deref())?;
    let us_per_beat = first_tempo(&source.tracks).unwrap_or(config.default_us_per_beat);
    let scale = DurationScale::Beats {
        ticks_per_beat: source.ticks_per_beat,
    };
    let extraction = extract_tracks(&source.tracks, scale)?;
    finish(
        source_name,
        extraction,
        source.ticks_per_beat,
        us_per_beat,
        source.tracks.len(),
    )
}

/// Convert tablature text.
///
/// The frontmatter tempo wins over `config.default_us_per_beat`.
pub fn convert_tablature(
    source_name: &str,
    text: &str,
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    let tab = tablature::read_tablature(source_name, text)?;
    let us_per_beat = tab.us_per_beat.unwrap_or(config.default_us_per_beat);
    let extraction = extract_track(&tab.symbols, DurationScale::Steps)?;
    finish(
        source_name,
        extraction,
        config.tab_steps_per_beat,
        us_per_beat,
        1,
    )
}

/// Convert either format, picking MIDI when the data starts with `MThd`.
pub fn convert(
    source_name: &str,
    bytes: &[u8],
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    if bytes.starts_with(b"MThd") {
        return convert_midi(source_name, bytes, config);
    }
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ConvertError::malformed(
            source_name,
            format!("neither a MIDI file nor UTF-8 tablature ({})", e),
        )
    })?;
    convert_tablature(source_name, text, config)
}

/// Convert and render in one step.
pub fn convert_and_render(
    source_name: &str,
    bytes: &[u8],
    config: &ConvertConfig,
) -> Result<String, ConvertError> {
    let conversion = convert(source_name, bytes, config)?;
    render_events(&conversion.events, config)
}

fn finish(
    source_name: &str,
    extraction: TrackExtraction,
    ticks_per_beat: i64,
    us_per_beat: u32,
    tracks_scanned: usize,
) -> Result<Conversion, ConvertError> {
    if extraction.events.is_empty() {
        warn!(source = source_name, stats = ?extraction.stats, "no events extracted");
        return Err(ConvertError::EmptyResult {
            file: source_name.to_string(),
        });
    }

    let events = normalize(extraction.events, ticks_per_beat, us_per_beat)?;
    info!(
        source = source_name,
        events = events.len(),
        tracks = tracks_scanned,
        us_per_beat,
        "converted"
    );

    Ok(Conversion {
        events,
        stats: extraction.stats,
        us_per_beat,
        tracks_scanned,
    })
}
