//! Heading Extractor
//!
//! Scans raw Markdown for headings and yields them in document order.
//! ATX headings (`#` through `######`) and setext headings (a paragraph line
//! after a blank line, underlined with `=` or `-`) are recognized. A leading
//! YAML frontmatter block and fenced code blocks are skipped.
//! Marker runs longer than six, or markers without text, are reported as
//! malformed headings and otherwise treated as plain content.

use serde_yaml::Mapping;
use std::iter::Peekable;
use std::str::SplitInclusive;

use crate::constants::heading::{MAX_INDENT, MAX_LEVEL};
use crate::constants::template::FRONTMATTER_FENCE;
use crate::types::{Diagnostic, HeadingRecord, Position};

/// One item produced while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Heading(HeadingRecord),
    Malformed(Diagnostic),
}

/// Collected extraction result
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub headings: Vec<HeadingRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Restartable heading scanner over a borrowed document
#[derive(Debug, Clone, Copy)]
pub struct HeadingExtractor<'a> {
    text: &'a str,
    /// Byte offset and line count of the body after any frontmatter
    body_start: usize,
    body_line: usize,
}

impl<'a> HeadingExtractor<'a> {
    pub fn new(text: &'a str) -> Self {
        let body_start = leading_frontmatter(text).map_or(0, |fm| fm.end);
        let body_line = text[..body_start].matches('\n').count();
        Self {
            text,
            body_start,
            body_line,
        }
    }

    /// Byte offset where the body starts, past a leading frontmatter block
    pub fn body_start(&self) -> usize {
        self.body_start
    }

    /// Start a fresh scan from the beginning of the body
    pub fn iter(&self) -> Headings<'a> {
        Headings {
            lines: self.text[self.body_start..].split_inclusive('\n').peekable(),
            offset: self.body_start,
            line: self.body_line,
            fence: None,
            prev_blank: true,
        }
    }

    /// Headings only, dropping malformed-line reports
    pub fn headings(&self) -> impl Iterator<Item = HeadingRecord> + 'a {
        self.iter().filter_map(|event| match event {
            ScanEvent::Heading(heading) => Some(heading),
            ScanEvent::Malformed(_) => None,
        })
    }

    pub fn extract(&self) -> Extraction {
        let mut extraction = Extraction::default();
        for event in self.iter() {
            match event {
                ScanEvent::Heading(heading) => extraction.headings.push(heading),
                ScanEvent::Malformed(diag) => {
                    tracing::warn!("Line {}: {}", diag.line, diag.message);
                    extraction.diagnostics.push(diag);
                }
            }
        }
        tracing::debug!(
            "Extracted {} headings ({} malformed)",
            extraction.headings.len(),
            extraction.diagnostics.len()
        );
        extraction
    }
}

/// Convenience wrapper around [`HeadingExtractor::extract`]
pub fn extract(text: &str) -> Extraction {
    HeadingExtractor::new(text).extract()
}

// =============================================================================
// Frontmatter
// =============================================================================

/// A leading `---` fenced YAML mapping
#[derive(Debug, Clone)]
pub(crate) struct LeadingFrontmatter {
    pub mapping: Mapping,
    /// Byte offset just past the closing fence line
    pub end: usize,
}

/// Detect a frontmatter block at the very start of `text`.
///
/// The block runs to the first closing fence; one whose content is not a
/// YAML mapping is not frontmatter.
pub(crate) fn leading_frontmatter(text: &str) -> Option<LeadingFrontmatter> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != FRONTMATTER_FENCE {
        return None;
    }

    let mut end = first.len();
    for line in lines {
        let yaml_end = end;
        end += line.len();
        if line.trim_end() == FRONTMATTER_FENCE {
            let mapping = serde_yaml::from_str::<Mapping>(&text[first.len()..yaml_end]).ok()?;
            return Some(LeadingFrontmatter { mapping, end });
        }
    }
    None
}

/// Open code fence: marker character and run length
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Detect an opening fence on an already de-indented line
    pub(crate) fn open(rest: &str) -> Option<Self> {
        let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = rest.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    /// Whether `rest` closes this fence
    pub(crate) fn closes(&self, rest: &str) -> bool {
        let len = rest.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && rest[len * self.marker.len_utf8()..].trim().is_empty()
    }

    pub(crate) fn closing_line(&self) -> String {
        self.marker.to_string().repeat(self.len)
    }
}

/// Tracks fenced code blocks across a line-by-line scan
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    /// Feed one line; returns true if the line is inside (or delimits) a code block
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let rest = line.trim_start_matches(' ');
        if line.len() - rest.len() > MAX_INDENT && self.open.is_none() {
            return false;
        }
        match self.open {
            Some(fence) => {
                if fence.closes(rest) {
                    self.open = None;
                }
                true
            }
            None => match Fence::open(rest) {
                Some(fence) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }

    pub(crate) fn unclosed(&self) -> Option<Fence> {
        self.open
    }
}

/// Lazy heading iterator; see [`HeadingExtractor::iter`]
#[derive(Debug, Clone)]
pub struct Headings<'a> {
    lines: Peekable<SplitInclusive<'a, char>>,
    offset: usize,
    line: usize,
    fence: Option<Fence>,
    prev_blank: bool,
}

impl Iterator for Headings<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            let position = Position {
                line: self.line + 1,
                offset: self.offset,
            };
            self.line += 1;
            self.offset += raw.len();

            let line = raw.trim_end_matches(['\n', '\r']);
            let rest = line.trim_start_matches(' ');
            let indent = line.len() - rest.len();
            let prev_blank = std::mem::replace(&mut self.prev_blank, line.trim().is_empty());

            if let Some(fence) = self.fence {
                if fence.closes(rest) {
                    self.fence = None;
                }
                continue;
            }
            if indent > MAX_INDENT {
                continue;
            }
            if let Some(fence) = Fence::open(rest) {
                self.fence = Some(fence);
                continue;
            }

            if let Some(event) = scan_line(rest, line, position) {
                return Some(event);
            }

            if prev_blank
                && is_paragraph_line(line)
                && let Some(level) = self
                    .lines
                    .peek()
                    .and_then(|next| setext_level(next.trim_end_matches(['\n', '\r'])))
            {
                if let Some(underline) = self.lines.next() {
                    self.line += 1;
                    self.offset += underline.len();
                }
                self.prev_blank = false;
                return Some(ScanEvent::Heading(HeadingRecord::new(
                    level,
                    line.trim(),
                    position,
                )));
            }
        }
    }
}

/// Classify a single de-indented line
fn scan_line(rest: &str, literal: &str, position: Position) -> Option<ScanEvent> {
    let markers = rest.chars().take_while(|c| *c == '#').count();
    if markers == 0 {
        return None;
    }

    let after = &rest[markers..];
    let literal = literal.trim_end();

    if after.trim().is_empty() {
        return Some(ScanEvent::Malformed(Diagnostic::malformed_heading(
            position.line,
            literal,
            "marker is not followed by text",
        )));
    }

    // `#tag` style text is plain content
    if !after.starts_with([' ', '\t']) {
        return None;
    }

    if markers > MAX_LEVEL {
        return Some(ScanEvent::Malformed(Diagnostic::malformed_heading(
            position.line,
            literal,
            &format!("{} markers (maximum is {})", markers, MAX_LEVEL),
        )));
    }

    let text = strip_closing_sequence(after.trim());
    if text.is_empty() {
        return Some(ScanEvent::Malformed(Diagnostic::malformed_heading(
            position.line,
            literal,
            "marker is not followed by text",
        )));
    }

    Some(ScanEvent::Heading(HeadingRecord::new(
        markers as u8,
        text,
        position,
    )))
}

/// Remove an optional closing `#` run (`## Title ##`)
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

/// Parse a single line as a heading, ignoring code-fence context
pub fn parse_heading_line(line: &str) -> Option<(u8, &str)> {
    let rest = line.trim_end_matches(['\n', '\r']).trim_start_matches(' ');
    if line.len() - rest.len() > MAX_INDENT {
        return None;
    }
    let markers = rest.chars().take_while(|c| *c == '#').count();
    if markers == 0 || markers > MAX_LEVEL {
        return None;
    }
    let after = &rest[markers..];
    if !after.starts_with([' ', '\t']) {
        return None;
    }
    let text = strip_closing_sequence(after.trim());
    (!text.is_empty()).then_some((markers as u8, text))
}

/// Setext underline level: `=` for 1, `-` for 2, at least two markers
pub(crate) fn setext_level(line: &str) -> Option<u8> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > MAX_INDENT {
        return None;
    }
    let rest = rest.trim_end();
    let marker = rest.chars().next()?;
    let level = match marker {
        '=' => 1,
        '-' => 2,
        _ => return None,
    };
    (rest.len() >= 2 && rest.chars().all(|c| c == marker)).then_some(level)
}

/// Plain paragraph text that a setext underline may turn into a heading
pub(crate) fn is_paragraph_line(line: &str) -> bool {
    let rest = line.trim_start_matches(' ');
    if rest.trim().is_empty() || line.len() - rest.len() > MAX_INDENT {
        return false;
    }
    let starts_block = rest.starts_with(['#', '>', '|', '-', '*', '+', '<', '`', '~', '='])
        || rest.starts_with("!!!");
    let ordered_item = {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && rest[digits..].starts_with(['.', ')'])
    };
    !starts_block && !ordered_item
}
