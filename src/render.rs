//! # Track Renderers
//!
//! Serialize a finished event list for the player build.
//!
//! The pipeline hands its [`FinalEvent`]s to a [`TrackRenderer`]; renderers
//! hold no pipeline logic.

use tracing::warn;

use crate::config::{ConvertConfig, OutputFormat};
use crate::error::ConvertError;
use crate::event::FinalEvent;

/// Largest value the firmware's `length` field holds.
pub const MAX_LENGTH: u32 = u8::MAX as u32;

pub trait TrackRenderer {
    fn render(&self, events: &[FinalEvent]) -> Result<String, ConvertError>;
}

/// Renders a `struct noteData` static array for the player firmware.
///
/// `.length` is the delay in milliseconds, unscaled. The firmware stores it
/// in a `uint8_t`, so delays above 255 ms wrap when the table is compiled;
/// each such entry is logged at warn level.
pub struct CArrayRenderer<'a> {
    pub track_name: &'a str,
    pub header: &'a str,
}

impl TrackRenderer for CArrayRenderer<'_> {
    fn render(&self, events: &[FinalEvent]) -> Result<String, ConvertError> {
        let mut c = String::new();

        c.push_str(&format!("#include \"{}\"\n\n", self.header));
        c.push_str(&format!("struct noteData {}[] = {{\n", self.track_name));
        for (index, event) in events.iter().enumerate() {
            if event.delay_ms > MAX_LENGTH {
                warn!(
                    index,
                    delay_ms = event.delay_ms,
                    "delay does not fit the 8-bit length field"
                );
            }
            c.push_str(&format!(
                "    {{ .note = {}, .octave = {}, .duration = {}, .length = {} }},\n",
                event.pitch.firmware_name(),
                event.octave.firmware_name(),
                event.duration.firmware_name(),
                event.delay_ms
            ));
        }
        c.push_str("};\n");

        Ok(c)
    }
}

/// Dumps the events as a YAML list.
pub struct YamlRenderer;

impl TrackRenderer for YamlRenderer {
    fn render(&self, events: &[FinalEvent]) -> Result<String, ConvertError> {
        serde_yaml::to_string(events).map_err(|e| ConvertError::Render(e.to_string()))
    }
}

/// Render with the renderer selected by `config.format`.
pub fn render_events(events: &[FinalEvent], config: &ConvertConfig) -> Result<String, ConvertError> {
    match config.format {
        OutputFormat::C => CArrayRenderer {
            track_name: &config.track_name,
            header: &config.header,
        }
        .render(events),
        OutputFormat::Yaml => YamlRenderer.render(events),
    }
}
