//! # Conversion Configuration
//!
//! Optional YAML file tuning a conversion. Every key may be omitted.
//!
//! ```yaml
//! track-name: apple
//! microseconds-per-beat: 500000   # fallback when the source has no tempo
//! tab-steps-per-beat: 2           # tablature columns per beat
//! tracks: [1, 2]                  # MIDI tracks to scan, file order
//! format: c                       # c | yaml
//! header: music.h
//! ```

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConvertError;
use crate::normalize::DEFAULT_US_PER_BEAT;

/// Output format for the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    C,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" => Ok(OutputFormat::C),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(ConvertError::Config(format!(
                "unknown output format '{}' (expected 'c' or 'yaml')",
                other
            ))),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub track_name: Option<String>,
    pub microseconds_per_beat: Option<u32>,
    pub tab_steps_per_beat: Option<i64>,
    pub tracks: Option<Vec<usize>>,
    pub format: Option<OutputFormat>,
    pub header: Option<String>,
}

/// Validated settings for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Name of the generated array.
    pub track_name: String,
    /// Tempo used when the source declares none.
    pub default_us_per_beat: u32,
    /// Tablature columns per beat.
    pub tab_steps_per_beat: i64,
    /// MIDI track indices to scan; `None` scans all.
    pub tracks: Option<Vec<usize>>,
    pub format: OutputFormat,
    /// Header named in the `#include` line of C output.
    pub header: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            track_name: "track".to_string(),
            default_us_per_beat: DEFAULT_US_PER_BEAT,
            tab_steps_per_beat: 2,
            tracks: None,
            format: OutputFormat::C,
            header: "music.h".to_string(),
        }
    }
}

impl ConvertConfig {
    /// Parse a YAML configuration, filling gaps with defaults.
    ///
    /// # Errors
    /// [`ConvertError::Config`] for invalid YAML, unknown keys, or
    /// non-positive timing values.
    pub fn from_yaml(content: &str) -> Result<Self, ConvertError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConvertError> {
        let defaults = Self::default();

        let default_us_per_beat = raw
            .microseconds_per_beat
            .unwrap_or(defaults.default_us_per_beat);
        if default_us_per_beat == 0 {
            return Err(ConvertError::Config(
                "microseconds-per-beat must be greater than 0".to_string(),
            ));
        }

        let tab_steps_per_beat = raw.tab_steps_per_beat.unwrap_or(defaults.tab_steps_per_beat);
        if tab_steps_per_beat <= 0 {
            return Err(ConvertError::Config(format!(
                "tab-steps-per-beat must be greater than 0, got {}",
                tab_steps_per_beat
            )));
        }

        let track_name = raw.track_name.unwrap_or(defaults.track_name);
        if !is_c_identifier(&track_name) {
            return Err(ConvertError::Config(format!(
                "track-name '{}' is not a valid C identifier",
                track_name
            )));
        }

        Ok(Self {
            track_name,
            default_us_per_beat,
            tab_steps_per_beat,
            tracks: raw.tracks,
            format: raw.format.unwrap_or(defaults.format),
            header: raw.header.unwrap_or(defaults.header),
        })
    }
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
