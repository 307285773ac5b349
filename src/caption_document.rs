use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::CorrectionError;
use crate::timecode::{FrameRate, Timecode};

// @module: SCC caption document model

// @const: Caption entry line: timecode, whitespace, payload
static CAPTION_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}[:;]\d{2})(\s+)(.*)$").unwrap()
});

// @struct: Timed caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRecord {
    // @field: Entry timecode
    pub timecode: Timecode,

    // @field: Whitespace between timecode and payload, kept verbatim
    pub spacing: String,

    // @field: Opaque caption data
    pub payload: String,
}

impl CaptionRecord {
    /// Same spacing and payload under a new timecode
    pub fn with_timecode(&self, timecode: Timecode) -> Self {
        Self {
            timecode,
            spacing: self.spacing.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl fmt::Display for CaptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.timecode, self.spacing, self.payload)
    }
}

/// One line of an SCC file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionLine {
    /// Whitespace-only separator line
    Blank(String),
    /// Timecode-prefixed caption entry
    Caption(CaptionRecord),
    /// Anything else (header, comments), passed through unchanged
    Other(String),
}

impl fmt::Display for CaptionLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CaptionLine::Blank(text) | CaptionLine::Other(text) => write!(f, "{}", text),
            CaptionLine::Caption(record) => write!(f, "{}", record),
        }
    }
}

/// Line terminator used by a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A parsed SCC file whose timecodes share one rate and drop-frame mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionDocument {
    /// Lines in file order
    pub lines: Vec<CaptionLine>,

    /// Rate every caption timecode is expressed at
    pub frame_rate: FrameRate,

    /// Drop-frame mode of every caption timecode
    pub drop_frame: bool,

    line_ending: LineEnding,
    trailing_newline: bool,
}

impl CaptionDocument {
    /// Parse SCC text with its timecodes read at `frame_rate`.
    ///
    /// Every caption line must use the separator matching `drop_frame`.
    pub fn parse(text: &str, frame_rate: FrameRate, drop_frame: bool) -> Result<Self, CorrectionError> {
        let drop_frame = drop_frame && frame_rate.supports_drop_frame();
        let mut lines = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                lines.push(CaptionLine::Blank(line.to_string()));
                continue;
            }

            let Some(caps) = CAPTION_LINE_REGEX.captures(line) else {
                lines.push(CaptionLine::Other(line.to_string()));
                continue;
            };

            let timecode = Timecode::parse(&caps[1], frame_rate).map_err(|e| match e {
                CorrectionError::Format(msg) => {
                    CorrectionError::Format(format!("line {}: {}", index + 1, msg))
                }
                other => other,
            })?;

            if timecode.is_drop_frame() != drop_frame {
                return Err(CorrectionError::Format(format!(
                    "line {}: {} does not match the file's {} timecode",
                    index + 1,
                    &caps[1],
                    if drop_frame { "drop-frame" } else { "non-drop-frame" }
                )));
            }

            lines.push(CaptionLine::Caption(CaptionRecord {
                timecode,
                spacing: caps[2].to_string(),
                payload: caps[3].to_string(),
            }));
        }

        Ok(Self {
            lines,
            frame_rate,
            drop_frame,
            line_ending: if text.contains("\r\n") { LineEnding::CrLf } else { LineEnding::Lf },
            trailing_newline: text.ends_with('\n'),
        })
    }

    /// New document with the same layout conventions but different content
    pub fn derive(&self, lines: Vec<CaptionLine>, frame_rate: FrameRate, drop_frame: bool) -> Self {
        Self {
            lines,
            frame_rate,
            drop_frame: drop_frame && frame_rate.supports_drop_frame(),
            line_ending: self.line_ending,
            trailing_newline: self.trailing_newline,
        }
    }

    /// Rewrite every caption timecode, leaving other lines untouched
    pub fn map_timecodes<F>(&self, frame_rate: FrameRate, drop_frame: bool, mut convert: F) -> Result<Self, CorrectionError>
    where
        F: FnMut(&Timecode) -> Result<Timecode, CorrectionError>,
    {
        let lines = self
            .lines
            .iter()
            .map(|line| match line {
                CaptionLine::Caption(record) => {
                    Ok(CaptionLine::Caption(record.with_timecode(convert(&record.timecode)?)))
                }
                other => Ok(other.clone()),
            })
            .collect::<Result<Vec<_>, CorrectionError>>()?;

        Ok(self.derive(lines, frame_rate, drop_frame))
    }

    /// Caption entries in file order
    pub fn records(&self) -> impl Iterator<Item = &CaptionRecord> {
        self.lines.iter().filter_map(|line| match line {
            CaptionLine::Caption(record) => Some(record),
            _ => None,
        })
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Whether caption timecodes never go backwards
    pub fn is_chronological(&self) -> bool {
        let timecodes: Vec<u64> = self.records().map(|r| r.timecode.to_frames()).collect();
        timecodes.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Serialize back to SCC text
    pub fn to_text(&self) -> String {
        let separator = self.line_ending.as_str();
        let mut text = self
            .lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join(separator);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(separator);
        }
        text
    }
}

impl fmt::Display for CaptionDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Timecode prefixing a caption line, read before any rate is known
pub fn leading_timecode(line: &str) -> Option<&str> {
    CAPTION_LINE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Raw timecode strings of every caption line
pub fn scan_timecodes(text: &str) -> Vec<&str> {
    text.lines().filter_map(leading_timecode).collect()
}
