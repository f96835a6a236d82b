//! Line lexing shared by the reader and the decoder
//!
//! Both strategies look at the input one physical line at a time:
//!
//! - [`Line`] pairs a line's text with its 1-based number and measures indentation
//! - [`line_classification`] tells marker, blank, comment and directive lines apart
//! - [`line_scanner`] finds out whether a line leaves a quoted scalar open or
//!   introduces a block scalar

pub mod line_classification;
pub mod line_scanner;

pub use line_classification::{classify_line, LineKind};
pub use line_scanner::{scan_line, QuoteStyle, ScanOutcome};

/// A physical line of input, without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the whole input
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Number of leading spaces. Tabs never count as indentation.
    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    /// Text after the indentation
    pub fn content(&self) -> &'a str {
        &self.text[self.indent()..]
    }

    /// Whether the line holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn kind(&self) -> LineKind {
        classify_line(self.text)
    }
}

/// Split text into numbered lines, starting at `first_number`.
///
/// Accepts `\n` and `\r\n` terminators; a trailing terminator does not produce an extra line.
pub fn lines_from(text: &str, first_number: usize) -> impl Iterator<Item = Line<'_>> {
    text.lines()
        .enumerate()
        .map(move |(index, line)| Line::new(first_number + index, line))
}

/// Split text into numbered lines starting at line 1
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    lines_from(text, 1)
}

/// Remove a trailing `\n` or `\r\n`
pub fn strip_line_terminator(raw: &str) -> &str {
    let raw = raw.strip_suffix('\n').unwrap_or(raw);
    raw.strip_suffix('\r').unwrap_or(raw)
}
