//! # Tablature Front-end
//!
//! Reads the line-oriented text tablature into a single symbol stream.
//!
//! ## Format
//! ```text
//! ---
//! title: Sakura
//! tempo: 120
//! ---
//! 4
//! |A-A-B---|
//! 5|c-C-|
//! ```
//! - optional YAML frontmatter between `---` lines (`title`, `tempo` in BPM)
//! - a line starting with an octave digit sets the octave; if it has no `|`
//!   it is a metadata line for the content lines after it
//! - digits outside `3`-`6` are kept as-is and clamp into the outer bands
//! - `|` splits a line into fields; the first must be empty or start with the
//!   octave digit, the second is the content
//! - blank lines and lines starting with `#` are skipped
//! - a leading byte order mark is ignored
//!
//! ## Content
//! - `A`-`G` start a natural note, `a`-`g` a flat one
//! - the run of `-` after a note lengthens it: `steps = run + 1`
//! - a run of `-` with no note before it is a rest: `steps = run`
//! - any other character is an unmappable note: it takes time like a letter
//!   but produces no event
//! - spaces take no time
//!
//! Time is counted in steps (columns) across all lines. Notes and rests both
//! become note-on/note-off pairs; rests carry no pitch and the extractor
//! drops them after they have advanced the clock.

use serde::Deserialize;
use tracing::debug;

use crate::error::ConvertError;
use crate::event::{NoteKey, Symbol};
use crate::pitch::PitchClass;

/// Octave used until the first metadata line.
pub const DEFAULT_TAB_OCTAVE: i32 = 4;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawFrontmatter {
    pub title: Option<String>,
    pub tempo: Option<f64>,
}

/// A parsed tablature: one track of step-timed symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Tablature {
    pub title: Option<String>,
    /// Tempo from the frontmatter, in µs per beat.
    pub us_per_beat: Option<u32>,
    pub symbols: Vec<Symbol>,
}

/// One note or rest found in a content field.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TabItem {
    pitch_class: Option<u8>,
    steps: u64,
}

/// Cursor over one content field.
struct ContentScanner {
    chars: Vec<char>,
    cursor: usize,
}

impl ContentScanner {
    fn new(field: &str) -> Self {
        Self {
            chars: field.chars().collect(),
            cursor: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        Some(c)
    }

    /// Consume a run of `-` and return its length.
    fn dash_run(&mut self) -> u64 {
        let mut run = 0;
        while self.peek() == Some('-') {
            self.advance();
            run += 1;
        }
        run
    }

    fn next_item(&mut self) -> Option<TabItem> {
        loop {
            let c = self.peek()?;
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            if c == '-' {
                let run = self.dash_run();
                return Some(TabItem {
                    pitch_class: None,
                    steps: run,
                });
            }
            self.advance();
            let run = self.dash_run();
            return Some(TabItem {
                pitch_class: PitchClass::tab_offset(c),
                steps: run + 1,
            });
        }
    }
}

impl Iterator for ContentScanner {
    type Item = TabItem;

    fn next(&mut self) -> Option<TabItem> {
        self.next_item()
    }
}

/// Parse tablature text.
///
/// # Errors
/// [`ConvertError::MalformedInput`] for a broken frontmatter block, a first
/// field that is not an octave digit, or a line that is neither metadata nor
/// content.
pub fn read_tablature(source_name: &str, text: &str) -> Result<Tablature, ConvertError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (frontmatter, body, body_line) = split_frontmatter(source_name, text)?;

    let meta: RawFrontmatter = match frontmatter {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)
            .map_err(|e| ConvertError::malformed(source_name, format!("frontmatter: {}", e)))?,
        _ => RawFrontmatter::default(),
    };
    let us_per_beat = match meta.tempo {
        Some(bpm) if bpm > 0.0 && bpm.is_finite() => Some((60_000_000.0 / bpm).round() as u32),
        Some(bpm) => {
            return Err(ConvertError::malformed(
                source_name,
                format!("tempo must be a positive BPM value, got {}", bpm),
            ));
        }
        None => None,
    };

    let mut symbols = Vec::new();
    let mut octave = DEFAULT_TAB_OCTAVE;
    let mut now: u64 = 0;

    for (offset, raw_line) in body.lines().enumerate() {
        let line_number = body_line + offset;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('|');
        let head = fields.next().unwrap_or("").trim();
        let content = fields.next();
        if let Some(digit) = head.chars().next().and_then(|c| c.to_digit(10)) {
            octave = digit as i32;
        } else if !head.is_empty() {
            let message = match content {
                Some(_) => format!(
                    "line {}: expected an octave digit before '|', got '{}'",
                    line_number, head
                ),
                None => format!(
                    "line {}: expected an octave digit or '|'-delimited content",
                    line_number
                ),
            };
            return Err(ConvertError::malformed(source_name, message));
        }

        let Some(content) = content else {
            continue;
        };

        for item in ContentScanner::new(content) {
            let key = NoteKey {
                pitch_class: item.pitch_class,
                octave,
            };
            symbols.push(Symbol::NoteOn { key, at: now });
            now += item.steps;
            symbols.push(Symbol::NoteOff { key, at: now });
        }
    }

    debug!(
        symbols = symbols.len(),
        steps = now,
        title = meta.title.as_deref().unwrap_or(""),
        "parsed tablature"
    );

    Ok(Tablature {
        title: meta.title,
        us_per_beat,
        symbols,
    })
}

/// Split off a leading `---` YAML block.
///
/// Returns the frontmatter, the body, and the 1-based line number the body
/// starts on.
fn split_frontmatter<'a>(
    source_name: &str,
    text: &'a str,
) -> Result<(Option<&'a str>, &'a str, usize), ConvertError> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, text, 1));
    };
    if first.trim_end() != "---" {
        return Ok((None, text, 1));
    }

    let start = first.len();
    let mut position = start;
    let mut line_number = 1;
    for line in lines {
        line_number += 1;
        if line.trim_end() == "---" {
            let yaml = &text[start..position];
            let body = &text[position + line.len()..];
            return Ok((Some(yaml), body, line_number + 1));
        }
        position += line.len();
    }

    Err(ConvertError::malformed(
        source_name,
        "frontmatter opened with '---' is never closed",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(field: &str) -> Vec<(Option<u8>, u64)> {
        ContentScanner::new(field)
            .map(|item| (item.pitch_class, item.steps))
            .collect()
    }

    #[test]
    fn test_trailing_run_lengthens_note() {
        assert_eq!(items("C---"), vec![(Some(0), 4)]);
        assert_eq!(items("C"), vec![(Some(0), 1)]);
        assert_eq!(items("CD-E--"), vec![(Some(0), 1), (Some(2), 2), (Some(4), 3)]);
    }

    #[test]
    fn test_standalone_run_is_rest() {
        assert_eq!(items("--C"), vec![(None, 2), (Some(0), 1)]);
        assert_eq!(items("C- --D"), vec![(Some(0), 2), (None, 2), (Some(2), 1)]);
    }

    #[test]
    fn test_flats_and_unknown_symbols() {
        assert_eq!(items("e-"), vec![(Some(3), 2)]);
        assert_eq!(items("x--"), vec![(None, 3)]);
    }

    #[test]
    fn test_single_line_with_octave() {
        let tab = read_tablature("song.tab", "4|C---|").unwrap();
        let key = NoteKey { pitch_class: Some(0), octave: 4 };
        assert_eq!(
            tab.symbols,
            vec![
                Symbol::NoteOn { key, at: 0 },
                Symbol::NoteOff { key, at: 4 },
            ]
        );
    }

    #[test]
    fn test_metadata_line_applies_to_following_content() {
        let tab = read_tablature("song.tab", "5\n|C-|\n|D|\n3\n|E|").unwrap();
        let octaves: Vec<i32> = tab
            .symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::NoteOn { key, .. } => Some(key.octave),
                _ => None,
            })
            .collect();
        assert_eq!(octaves, vec![5, 5, 3]);
    }

    #[test]
    fn test_time_runs_across_lines() {
        let tab = read_tablature("song.tab", "4|C-|\n4|D|").unwrap();
        assert_eq!(
            tab.symbols[2],
            Symbol::NoteOn { key: NoteKey { pitch_class: Some(2), octave: 4 }, at: 2 }
        );
    }

    #[test]
    fn test_default_octave_without_metadata() {
        let tab = read_tablature("song.tab", "|G|").unwrap();
        assert_eq!(
            tab.symbols[0],
            Symbol::NoteOn { key: NoteKey { pitch_class: Some(7), octave: DEFAULT_TAB_OCTAVE }, at: 0 }
        );
    }

    #[test]
    fn test_frontmatter() {
        let source = "---\ntitle: Sakura\ntempo: 60\n---\n4|A-|\n";
        let tab = read_tablature("sakura.tab", source).unwrap();
        assert_eq!(tab.title.as_deref(), Some("Sakura"));
        assert_eq!(tab.us_per_beat, Some(1_000_000));
        assert_eq!(tab.symbols.len(), 2);
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let result = read_tablature("bad.tab", "---\ntitle: x\n4|C|");
        assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
    }

    #[test]
    fn test_bad_tempo() {
        let result = read_tablature("bad.tab", "---\ntempo: 0\n---\n4|C|");
        assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
    }

    fn first_octave(tab: &Tablature) -> i32 {
        match tab.symbols[0] {
            Symbol::NoteOn { key, .. } => key.octave,
            other => panic!("expected NoteOn, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_octave_digit_is_kept() {
        let high = read_tablature("p.tab", "9|C|").unwrap();
        assert_eq!(first_octave(&high), 9);
        let low = read_tablature("p.tab", "2|C|").unwrap();
        assert_eq!(first_octave(&low), 2);
        let zero = read_tablature("p.tab", "0\n|C|").unwrap();
        assert_eq!(first_octave(&zero), 0);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let tab = read_tablature("bom.tab", "\u{feff}5|C|").unwrap();
        assert_eq!(first_octave(&tab), 5);

        let tab = read_tablature("bom.tab", "\u{feff}---\ntempo: 60\n---\n4|C|").unwrap();
        assert_eq!(tab.us_per_beat, Some(1_000_000));
        assert_eq!(first_octave(&tab), 4);
    }

    #[test]
    fn test_non_digit_first_field_reports_line() {
        let result = read_tablature("bad.tab", "4|C|\n\nx|D|");
        match result {
            Err(ConvertError::MalformedInput { file, message }) => {
                assert_eq!(file, "bad.tab");
                assert!(message.contains("line 3"), "message was: {}", message);
                assert!(message.contains("'x'"), "message was: {}", message);
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers_count_frontmatter() {
        let result = read_tablature("bad.tab", "---\ntempo: 90\n---\nC-D-");
        match result {
            Err(ConvertError::MalformedInput { message, .. }) => {
                assert!(message.contains("line 4"), "message was: {}", message);
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let tab = read_tablature("song.tab", "# intro\n\n4|C|\n").unwrap();
        assert_eq!(tab.symbols.len(), 2);
    }

    #[test]
    fn test_empty_text() {
        let tab = read_tablature("empty.tab", "").unwrap();
        assert!(tab.symbols.is_empty());
        assert_eq!(tab.us_per_beat, None);
    }
}
