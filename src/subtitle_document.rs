use std::fs;
use std::path::Path;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DocumentError;

// @module: Subtitle document model with SRT and ASS load/save

// @const: SRT timestamp regex
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @const: ASS override block, e.g. {\an8}{\pos(10,10)}
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

// @const: Drawing-mode switch inside an override block
static DRAWING_MODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\\p[1-9][^}]*\}").unwrap());

/// Event kind as stored in an ASS file; SRT documents only carry dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Dialogue,
    Comment,
}

/// On-disk formats the document model can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Ass,
}

// @struct: Single timed subtitle line
#[derive(Debug, Clone)]
pub struct SubtitleLine {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Style tag ("Default" for SRT)
    pub style: String,

    // @field: Line text with \N / \n continuation escapes preserved
    pub text: String,

    // @field: Dialogue or comment
    pub kind: LineKind,
}

impl SubtitleLine {
    pub fn new(start_ms: u64, end_ms: u64, style: &str, text: &str) -> Self {
        SubtitleLine {
            start_ms,
            end_ms,
            style: style.to_string(),
            text: text.to_string(),
            kind: LineKind::Dialogue,
        }
    }

    /// Text with override blocks stripped and continuation escapes spaced out
    pub fn plaintext(&self) -> String {
        let without_tags = OVERRIDE_BLOCK_REGEX.replace_all(&self.text, "");
        without_tags
            .replace(r"\N", " ")
            .replace(r"\n", " ")
            .replace(r"\h", " ")
    }

    /// Whether the line switches into ASS vector-drawing mode
    pub fn is_drawing(&self) -> bool {
        DRAWING_MODE_REGEX.is_match(&self.text)
    }
}

/// An ordered subtitle document. Line order is playback order and survives
/// every transformation; filtering may only remove lines, never reorder.
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Timed lines in playback order
    pub lines: Vec<SubtitleLine>,

    format: SubtitleFormat,
    // Raw ASS sections retained verbatim for round-trip
    script_info: Vec<String>,
    styles: Vec<String>,
}

impl SubtitleDocument {
    /// Build a document directly from lines (tests and synthetic inputs)
    pub fn from_lines(lines: Vec<SubtitleLine>) -> Self {
        SubtitleDocument {
            lines,
            format: SubtitleFormat::Srt,
            script_info: Vec::new(),
            styles: Vec::new(),
        }
    }

    /// Format the document was loaded from
    pub fn format(&self) -> SubtitleFormat {
        self.format
    }

    /// Load a subtitle document, dispatching on the file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| DocumentError::Io {
            file: display.clone(),
            message: e.to_string(),
        })?;

        match extension_of(path)?.as_str() {
            "srt" => Self::parse_srt(&content, &display),
            "ass" | "ssa" => Self::parse_ass(&content, &display),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Save the document, dispatching on the target file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = match extension_of(path)?.as_str() {
            "srt" => self.to_srt_string(),
            "ass" | "ssa" => self.to_ass_string(),
            other => return Err(DocumentError::UnsupportedFormat(other.to_string())),
        };

        fs::write(path, content).map_err(|e| DocumentError::Io {
            file: display,
            message: e.to_string(),
        })
    }

    /// Drop structurally empty and non-subtitle entries: comments, drawing
    /// events, and lines whose plaintext is blank.
    pub fn remove_miscellaneous_lines(&mut self) {
        self.lines.retain(|line| {
            line.kind == LineKind::Dialogue
                && !line.is_drawing()
                && !line.plaintext().trim().is_empty()
        });
    }

    // @parses: SRT content into dialogue lines, physical breaks joined as \N
    fn parse_srt(content: &str, file: &str) -> Result<Self, DocumentError> {
        let mut lines = Vec::new();

        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();
        let mut seen_timestamp = false;

        let flush =
            |times: &mut Option<(u64, u64)>, text: &mut String, lines: &mut Vec<SubtitleLine>| {
                if let Some((start_ms, end_ms)) = times.take() {
                    if !text.trim().is_empty() {
                        lines.push(SubtitleLine::new(start_ms, end_ms, "Default", text.trim()));
                    }
                }
                text.clear();
            };

        for raw_line in content.lines() {
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                flush(&mut current_times, &mut current_text, &mut lines);
                continue;
            }

            // A bare integer between blocks is a sequence number; discard it
            if current_times.is_none() && trimmed.parse::<u64>().is_ok() {
                continue;
            }

            if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
                flush(&mut current_times, &mut current_text, &mut lines);
                let start_ms = srt_caps_to_ms(&caps, 1);
                let end_ms = srt_caps_to_ms(&caps, 5);
                current_times = Some((start_ms, end_ms));
                seen_timestamp = true;
                continue;
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push_str(r"\N");
                }
                current_text.push_str(trimmed);
            }
        }
        flush(&mut current_times, &mut current_text, &mut lines);

        if !seen_timestamp && !content.trim().is_empty() {
            return Err(DocumentError::ParseFailed {
                file: file.to_string(),
                message: "no SRT timing lines found".to_string(),
            });
        }

        Ok(SubtitleDocument {
            lines,
            format: SubtitleFormat::Srt,
            script_info: Vec::new(),
            styles: Vec::new(),
        })
    }

    // @parses: ASS sections; Script Info and Styles kept verbatim
    fn parse_ass(content: &str, file: &str) -> Result<Self, DocumentError> {
        let mut lines = Vec::new();
        let mut script_info = Vec::new();
        let mut styles = Vec::new();

        let mut section = String::new();
        let mut saw_section = false;
        let mut event_format: Option<EventFormat> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = trimmed[1..trimmed.len() - 1].trim().to_ascii_lowercase();
                saw_section = true;
                continue;
            }

            match section.as_str() {
                "script info" => {
                    if !trimmed.is_empty() {
                        script_info.push(line.to_string());
                    }
                }
                "v4+ styles" | "v4 styles" => {
                    if !trimmed.is_empty() {
                        styles.push(line.to_string());
                    }
                }
                "events" => {
                    if let Some(rest) = trimmed.strip_prefix("Format:") {
                        event_format = Some(EventFormat::parse(rest, file)?);
                    } else if let Some(rest) = trimmed.strip_prefix("Dialogue:") {
                        push_event(&mut lines, &event_format, rest, LineKind::Dialogue, file)?;
                    } else if let Some(rest) = trimmed.strip_prefix("Comment:") {
                        push_event(&mut lines, &event_format, rest, LineKind::Comment, file)?;
                    }
                }
                _ => {}
            }
        }

        if !saw_section {
            return Err(DocumentError::ParseFailed {
                file: file.to_string(),
                message: "no ASS sections found".to_string(),
            });
        }

        Ok(SubtitleDocument {
            lines,
            format: SubtitleFormat::Ass,
            script_info,
            styles,
        })
    }

    fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&format!("{}\n", i + 1));
            out.push_str(&format!(
                "{} --> {}\n",
                format_srt_timestamp(line.start_ms),
                format_srt_timestamp(line.end_ms)
            ));
            out.push_str(&line.text.replace(r"\N", "\n").replace(r"\n", "\n"));
            out.push_str("\n\n");
        }
        out
    }

    fn to_ass_string(&self) -> String {
        let mut out = String::new();

        out.push_str("[Script Info]\n");
        if self.script_info.is_empty() {
            out.push_str("ScriptType: v4.00+\nWrapStyle: 0\nScaledBorderAndShadow: yes\n");
        } else {
            for line in &self.script_info {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('\n');

        out.push_str("[V4+ Styles]\n");
        if self.styles.is_empty() {
            out.push_str("Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n");
            out.push_str("Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1\n");
        } else {
            for line in &self.styles {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('\n');

        out.push_str("[Events]\n");
        out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
        for line in &self.lines {
            let keyword = match line.kind {
                LineKind::Dialogue => "Dialogue",
                LineKind::Comment => "Comment",
            };
            out.push_str(&format!(
                "{}: 0,{},{},{},,0,0,0,,{}\n",
                keyword,
                format_ass_timestamp(line.start_ms),
                format_ass_timestamp(line.end_ms),
                line.style,
                line.text
            ));
        }
        out
    }
}

/// Field positions extracted from an `[Events]` Format line
struct EventFormat {
    start: usize,
    end: usize,
    style: usize,
    text: usize,
    field_count: usize,
}

impl EventFormat {
    fn parse(rest: &str, file: &str) -> Result<Self, DocumentError> {
        let fields: Vec<String> = rest
            .split(',')
            .map(|f| f.trim().to_ascii_lowercase())
            .collect();

        let position = |name: &str| {
            fields
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| DocumentError::ParseFailed {
                    file: file.to_string(),
                    message: format!("event format line is missing the {} field", name),
                })
        };

        Ok(EventFormat {
            start: position("start")?,
            end: position("end")?,
            style: position("style")?,
            text: position("text")?,
            field_count: fields.len(),
        })
    }
}

fn push_event(
    lines: &mut Vec<SubtitleLine>,
    format: &Option<EventFormat>,
    rest: &str,
    kind: LineKind,
    file: &str,
) -> Result<(), DocumentError> {
    let Some(format) = format else {
        return Err(DocumentError::ParseFailed {
            file: file.to_string(),
            message: "event line appears before the Format line".to_string(),
        });
    };

    // Text is the last field and may itself contain commas
    let fields: Vec<&str> = rest.splitn(format.field_count, ',').collect();
    if fields.len() < format.field_count {
        warn!("Skipping malformed event line in {}: {}", file, rest.trim());
        return Ok(());
    }

    let (Some(start_ms), Some(end_ms)) = (
        parse_ass_timestamp(fields[format.start].trim()),
        parse_ass_timestamp(fields[format.end].trim()),
    ) else {
        warn!("Skipping event with bad timing in {}: {}", file, rest.trim());
        return Ok(());
    };

    lines.push(SubtitleLine {
        start_ms,
        end_ms,
        style: fields[format.style].trim().to_string(),
        text: fields[format.text].to_string(),
        kind,
    });
    Ok(())
}

fn extension_of(path: &Path) -> Result<String, DocumentError> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))
}

fn srt_caps_to_ms(caps: &regex::Captures, first_group: usize) -> u64 {
    let part = |i: usize| caps[first_group + i].parse::<u64>().unwrap_or(0);
    part(0) * 3_600_000 + part(1) * 60_000 + part(2) * 1_000 + part(3)
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_srt_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format a timestamp in milliseconds to ASS format (H:MM:SS.cc)
pub fn format_ass_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let centis = (ms % 1_000) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Parse an ASS H:MM:SS.cc timestamp to milliseconds
pub fn parse_ass_timestamp(timestamp: &str) -> Option<u64> {
    let (clock, centis) = timestamp.rsplit_once('.')?;
    let mut clock_parts = clock.split(':');

    let hours: u64 = clock_parts.next()?.parse().ok()?;
    let minutes: u64 = clock_parts.next()?.parse().ok()?;
    let seconds: u64 = clock_parts.next()?.parse().ok()?;
    if clock_parts.next().is_some() {
        return None;
    }
    let centis: u64 = centis.parse().ok()?;

    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + centis * 10)
}
