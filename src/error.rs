//! # Error Types
//!
//! All errors the conversion pipeline can report.
//!
//! Only structural problems surface here. Per-symbol anomalies in the input
//! (a note-off with no note-on, a repeated note-on, a note still sounding at
//! the end of a track, a rest) are absorbed by the extractor and only counted.
//!
//! ## Kinds
//! - `InvalidPitchClass` - chromatic offset outside 0..11
//! - `InvalidTimebase` - ticks-per-beat of zero or less
//! - `MalformedInput` - the source file could not be read as MIDI or tablature
//! - `EmptyResult` - the source parsed but produced no events (non-fatal)
//! - `Config` - invalid YAML configuration
//! - `Render` - output serialization failed
//!
//! ## Usage
//! ```rust
//! use notetable::{convert_tablature, ConvertConfig, ConvertError};
//!
//! match convert_tablature("song.tab", "4|C-D-|", &ConvertConfig::default()) {
//!     Ok(conversion) => println!("{} events", conversion.events.len()),
//!     Err(e) if !e.is_fatal() => eprintln!("warning: {}", e),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Chromatic pitch offset outside `0..=11`.
    ///
    /// # Example
    /// ```
    /// # use notetable::ConvertError;
    /// let err = ConvertError::InvalidPitchClass(12);
    /// assert_eq!(err.to_string(), "Invalid pitch class 12 (expected 0..=11)");
    /// ```
    #[error("Invalid pitch class {0} (expected 0..=11)")]
    InvalidPitchClass(u8),

    /// Ticks-per-beat of zero or less.
    #[error("Invalid timebase: {0} ticks per beat")]
    InvalidTimebase(i64),

    /// The source could not be parsed.
    ///
    /// # Example
    /// ```
    /// # use notetable::ConvertError;
    /// let err = ConvertError::MalformedInput {
    ///     file: "song.mid".to_string(),
    ///     message: "not a MIDI file".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed input in 'song.mid': not a MIDI file");
    /// ```
    #[error("Malformed input in '{file}': {message}")]
    MalformedInput { file: String, message: String },

    /// Parsing succeeded but no playable event came out.
    #[error("No events extracted from '{file}'")]
    EmptyResult { file: String },

    /// Invalid configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The renderer could not serialize the events.
    #[error("Render error: {0}")]
    Render(String),
}

impl ConvertError {
    pub(crate) fn malformed(file: &str, message: impl Into<String>) -> Self {
        ConvertError::MalformedInput {
            file: file.to_string(),
            message: message.into(),
        }
    }

    /// Whether the run should be treated as failed.
    ///
    /// `EmptyResult` is a warning condition: the input was readable but held
    /// nothing the player can use.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConvertError::EmptyResult { .. })
    }
}
