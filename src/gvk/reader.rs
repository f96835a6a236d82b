//! Boundary-aware document reader
//!
//! Splits a multi-document stream into the raw text of each document without
//! parsing it. A `---` line is a true boundary only when the reader is not inside a
//! scalar that started on an earlier line:
//!
//! ```yaml
//! apiVersion: test
//! kind: test
//! string: |
//!    ---          <- block scalar content, not a boundary
//! ---             <- boundary
//! apiVersion: yup
//! kind: aha
//! note: "foo
//! ---             <- inside a double-quoted scalar, not a boundary
//! bar"
//! ```
//!
//! # State
//!
//! The reader keeps one [`Region`] between lines:
//!
//! - `Plain`: a marker line is a boundary; other lines are scanned with
//!   [`scan_line`] and may open one of the regions below.
//! - `BlockScalar { threshold }`: opened by a line ending in `|` or `>`. The
//!   threshold is the column of the node owning the scalar: the key, after any
//!   `- ` indicators, so `- script: |` at indentation 0 has threshold 2. Blank lines
//!   and lines indented deeper than the threshold belong to the scalar; the first
//!   other line closes the region and is then processed as a plain line.
//! - `PlainScalar { owner }`: opened by a line ending inside a plain value. Deeper
//!   content lines continue the value and are not scanned for quotes; a comment
//!   ends it. Any other line closes the region and is processed as a plain line.
//! - `Quoted(style)`: opened by a quote left unterminated at the end of a line.
//!   Following lines are scanned from inside the quote until it closes.
//!
//! The reader never fails on odd text: an unterminated quote simply runs to the end
//! of the input, and the decode step reports it.

use crate::gvk::error::{ParseError, ScanError};
use crate::gvk::header::DocumentHeader;
use crate::gvk::lexing::line_scanner::has_comment;
use crate::gvk::lexing::{
    classify_line, lines_from, scan_line, strip_line_terminator, Line, LineKind, QuoteStyle,
    ScanOutcome,
};
use std::io::BufRead;
use tracing::{debug, trace};

/// Scanner state carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Plain,
    BlockScalar { threshold: usize },
    PlainScalar { owner: usize },
    Quoted(QuoteStyle),
}

/// Text of one document, as found between two true boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    start_line: usize,
    text: String,
}

impl RawDocument {
    pub fn new(start_line: usize, text: impl Into<String>) -> Self {
        Self {
            start_line,
            text: text.into(),
        }
    }

    /// Line number of the document's first line in the whole input
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// No bytes at all, e.g. between two adjacent boundaries
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Nothing but blank lines, comments and directives
    pub fn is_blank(&self) -> bool {
        lines_from(&self.text, self.start_line).all(|line| line.kind().is_ignorable())
    }

    /// Decode the minimal header. Blank documents give an empty header.
    pub fn header(&self) -> Result<DocumentHeader, ParseError> {
        DocumentHeader::from_raw(self)
    }

    fn push_line(&mut self, raw_line: &str) {
        self.text.push_str(raw_line);
    }
}

/// Lazily yields one [`RawDocument`] per true boundary
///
/// Works on any buffered source; [`DocumentReader::from_text`] covers in-memory input.
pub struct DocumentReader<R> {
    source: R,
    region: Region,
    line_number: usize,
    boundary_seen: bool,
    finished: bool,
    line: String,
}

impl<'a> DocumentReader<&'a [u8]> {
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> DocumentReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            region: Region::Plain,
            line_number: 0,
            boundary_seen: false,
            finished: false,
            line: String::new(),
        }
    }

    /// Read the next document.
    ///
    /// Returns `Ok(None)` once the input is exhausted. Every boundary closes a
    /// document, so adjacent boundaries produce an empty one. After an error the
    /// reader is finished.
    pub fn read(&mut self) -> Result<Option<RawDocument>, ScanError> {
        if self.finished {
            return Ok(None);
        }

        let mut document = RawDocument::new(self.line_number + 1, String::new());
        loop {
            self.line.clear();
            let read = match self.source.read_line(&mut self.line) {
                Ok(read) => read,
                Err(source) => {
                    self.finished = true;
                    return Err(ScanError::Io {
                        line: self.line_number + 1,
                        source,
                    });
                }
            };

            if read == 0 {
                self.finished = true;
                if document.is_empty() && !self.boundary_seen {
                    return Ok(None);
                }
                debug!(
                    start_line = document.start_line,
                    bytes = document.text.len(),
                    "final document"
                );
                return Ok(Some(document));
            }

            self.line_number += 1;
            let raw_line = std::mem::take(&mut self.line);
            let is_boundary = self.advance(strip_line_terminator(&raw_line));
            if is_boundary {
                self.boundary_seen = true;
                debug!(
                    start_line = document.start_line,
                    boundary_line = self.line_number,
                    bytes = document.text.len(),
                    "document"
                );
                self.line = raw_line;
                return Ok(Some(document));
            }
            document.push_line(&raw_line);
            self.line = raw_line;
        }
    }

    /// Update the region for one line; returns whether the line is a true boundary
    fn advance(&mut self, text: &str) -> bool {
        let line = Line::new(self.line_number, text);

        match self.region {
            Region::BlockScalar { threshold } => {
                if line.is_blank() || line.indent() > threshold {
                    return false;
                }
                trace!(line = line.number, "block scalar closed");
                self.region = Region::Plain;
            }
            Region::PlainScalar { owner } => {
                if line.is_blank() {
                    return false;
                }
                if line.kind() == LineKind::Content && line.indent() > owner {
                    if has_comment(line.content()) {
                        self.region = Region::Plain;
                    }
                    return false;
                }
                trace!(line = line.number, "plain scalar closed");
                self.region = Region::Plain;
            }
            _ => {}
        }

        // owner columns are relative to the scanned text
        let (outcome, base) = match self.region {
            Region::Quoted(style) => (scan_line(text, Some(style)), 0),
            _ => {
                if classify_line(text) == LineKind::DocumentMarker {
                    return true;
                }
                (scan_line(line.content(), None), line.indent())
            }
        };

        let next = match outcome {
            ScanOutcome::Closed => Region::Plain,
            ScanOutcome::OpenQuote(style) => Region::Quoted(style),
            ScanOutcome::BlockScalar { owner } => Region::BlockScalar {
                threshold: base + owner,
            },
            ScanOutcome::PlainScalar { owner } => Region::PlainScalar {
                owner: base + owner,
            },
        };
        if next != self.region {
            trace!(line = line.number, region = ?next, "region changed");
        }
        self.region = next;
        false
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = Result<RawDocument, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};

    fn read_all(text: &str) -> Vec<String> {
        DocumentReader::from_text(text)
            .map(|doc| doc.unwrap().into_string())
            .collect()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn test_single_document_without_boundary() {
        assert_eq!(read_all("a: 1\nb: 2"), vec!["a: 1\nb: 2"]);
    }

    #[test]
    fn test_splits_on_marker_lines() {
        assert_eq!(
            read_all("a: 1\n---\nb: 2\n--- # trailing comment\nc: 3\n"),
            vec!["a: 1\n", "b: 2\n", "c: 3\n"]
        );
    }

    #[test]
    fn test_adjacent_and_edge_boundaries_yield_empty_documents() {
        assert_eq!(read_all("---\na: 1\n---\n---\n"), vec!["", "a: 1\n", "", ""]);
    }

    #[test]
    fn test_marker_inside_block_scalar() {
        let text = "kind: test\nstring: |\n   ---\n---\nkind: next\n";
        assert_eq!(
            read_all(text),
            vec!["kind: test\nstring: |\n   ---\n", "kind: next\n"]
        );
    }

    #[test]
    fn test_block_scalar_keeps_blank_lines() {
        let text = "s: >\n  a\n\n  ---\n---\nk: v\n";
        assert_eq!(read_all(text), vec!["s: >\n  a\n\n  ---\n", "k: v\n"]);
    }

    #[test]
    fn test_block_scalar_closes_on_dedent() {
        // the nested block scalar closes at `other:`, so the marker is a boundary
        let text = "spec:\n  script: |\n    echo\n  other: 1\n---\nk: v\n";
        assert_eq!(read_all(text).len(), 2);
    }

    #[test]
    fn test_block_scalar_in_compact_entry_closes_at_sibling_key() {
        let text = "items:\n- script: |\n    foo\n  note: \"a\n---\nb\"\n---\nk: v\n";
        assert_eq!(
            read_all(text),
            vec![
                "items:\n- script: |\n    foo\n  note: \"a\n---\nb\"\n",
                "k: v\n"
            ]
        );
    }

    #[test]
    fn test_quote_opening_a_plain_continuation_is_text() {
        let text = "note: a\n  \"b\n---\nk: v\n";
        assert_eq!(read_all(text), vec!["note: a\n  \"b\n", "k: v\n"]);
    }

    #[test]
    fn test_commented_continuation_ends_plain_scalar() {
        // after the comment the quote starts a new value and hides the marker
        let text = "a: x\n  y # c\nb: \"q\n---\nq\"\n";
        assert_eq!(read_all(text), vec![text]);
    }

    #[test]
    fn test_marker_inside_double_quoted_scalar() {
        let text = "kind: test\nstring: \"foo\n---\nbar\"\n---\nkind: aha";
        assert_eq!(
            read_all(text),
            vec!["kind: test\nstring: \"foo\n---\nbar\"\n", "kind: aha"]
        );
    }

    #[test]
    fn test_marker_inside_single_quoted_scalar() {
        let text = "s: 'it''s\n---\nstill'\n---\nk: v\n";
        assert_eq!(read_all(text).len(), 2);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let text = "s: \"open\n---\nk: v\n";
        assert_eq!(read_all(text), vec![text]);
    }

    #[test]
    fn test_start_lines() {
        let docs: Vec<_> = DocumentReader::from_text("a: 1\n---\nb: 2\nc: 3\n---\nd: 4\n")
            .map(|doc| doc.unwrap().start_line())
            .collect();
        assert_eq!(docs, vec![1, 3, 6]);
    }

    #[test]
    fn test_blank_documents() {
        assert!(RawDocument::new(1, "").is_blank());
        assert!(RawDocument::new(1, "# only a comment\n\n%YAML 1.2\n").is_blank());
        assert!(!RawDocument::new(1, "a: 1\n").is_blank());
    }

    #[test]
    fn test_blank_document_has_default_header() {
        let header = RawDocument::new(1, "  \n").header().unwrap();
        assert_eq!(header, DocumentHeader::default());
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_io_failure_is_an_error_then_end() {
        let mut reader = DocumentReader::new(io::BufReader::new(FailingSource));
        assert!(matches!(reader.read(), Err(ScanError::Io { line: 1, .. })));
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_a_scan_error() {
        let bytes: &[u8] = b"a: 1\n\xff\xfe\n";
        let mut reader = DocumentReader::new(bytes);
        assert!(matches!(reader.read(), Err(ScanError::Io { line: 2, .. })));
    }
}
