//! Error types for scanning, decoding and extraction
//!
//! - [`ScanError`]: the boundary-aware reader could not read its input
//! - [`ParseError`]: a document could not be interpreted structurally
//! - [`ExtractionError`]: what a whole-input pipeline run reports; wraps the two above
//!
//! Every error aborts processing of the whole input. Nothing is retried.

use std::fmt;
use std::io;

/// Errors raised by [`DocumentReader`](crate::gvk::reader::DocumentReader)
#[derive(Debug)]
pub enum ScanError {
    /// The underlying source failed, or produced bytes that are not UTF-8
    Io { line: usize, source: io::Error },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io { line, source } => {
                write!(f, "I/O error while reading line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io { source, .. } => Some(source),
        }
    }
}

/// Errors raised while decoding document structure
///
/// Every variant carries the 1-based line of the input where the problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The top-level node of a document is a scalar or a sequence
    NotAMapping { line: usize },
    /// A quoted scalar is still open at the end of the input
    UnterminatedQuote { line: usize },
    /// A flow collection is still open at the end of the input or at a document marker
    UnterminatedFlow { line: usize },
    /// Unknown or malformed escape sequence in a double-quoted scalar
    InvalidEscape { line: usize, escape: String },
    /// A line is indented deeper than the structure around it allows
    BadIndentation { line: usize },
    /// A line is indented with tab characters
    TabIndentation { line: usize },
    /// Content that fits neither the current collection nor the preceding scalar
    UnexpectedContent { line: usize },
    /// A `---` marker followed by inline content
    MarkerContent { line: usize },
    /// Syntax outside the supported subset
    Unsupported { line: usize, feature: &'static str },
    /// The same key appears twice in one mapping
    DuplicateKey { line: usize, key: String },
    /// `apiVersion` or `kind` is bound to a collection or an alias
    InvalidHeaderField { line: usize, key: String },
}

impl ParseError {
    /// Line the error points at
    pub fn line(&self) -> usize {
        match self {
            ParseError::NotAMapping { line }
            | ParseError::UnterminatedQuote { line }
            | ParseError::UnterminatedFlow { line }
            | ParseError::InvalidEscape { line, .. }
            | ParseError::BadIndentation { line }
            | ParseError::TabIndentation { line }
            | ParseError::UnexpectedContent { line }
            | ParseError::MarkerContent { line }
            | ParseError::Unsupported { line, .. }
            | ParseError::DuplicateKey { line, .. }
            | ParseError::InvalidHeaderField { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotAMapping { line } => {
                write!(f, "line {}: document is not a mapping", line)
            }
            ParseError::UnterminatedQuote { line } => {
                write!(f, "line {}: quoted scalar is never closed", line)
            }
            ParseError::UnterminatedFlow { line } => {
                write!(f, "line {}: flow collection is never closed", line)
            }
            ParseError::InvalidEscape { line, escape } => {
                write!(f, "line {}: invalid escape sequence '{}'", line, escape)
            }
            ParseError::BadIndentation { line } => write!(f, "line {}: bad indentation", line),
            ParseError::TabIndentation { line } => {
                write!(f, "line {}: tabs are not allowed for indentation", line)
            }
            ParseError::UnexpectedContent { line } => {
                write!(f, "line {}: unexpected content", line)
            }
            ParseError::MarkerContent { line } => write!(
                f,
                "line {}: content on the document marker line is not supported",
                line
            ),
            ParseError::Unsupported { line, feature } => {
                write!(f, "line {}: {} are not supported", line, feature)
            }
            ParseError::DuplicateKey { line, key } => {
                write!(f, "line {}: duplicate mapping key '{}'", line, key)
            }
            ParseError::InvalidHeaderField { line, key } => {
                write!(f, "line {}: '{}' must be a scalar", line, key)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors from a whole-input extraction run
#[derive(Debug)]
pub enum ExtractionError {
    Scan(ScanError),
    Parse(ParseError),
    /// The reader and decoder strategies produced different results
    Disagreement { reader: String, decoder: String },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Scan(err) => write!(f, "Scan failed: {}", err),
            ExtractionError::Parse(err) => write!(f, "Parse failed: {}", err),
            ExtractionError::Disagreement { reader, decoder } => write!(
                f,
                "Strategies disagree: reader gave {}, decoder gave {}",
                reader, decoder
            ),
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Scan(err) => Some(err),
            ExtractionError::Parse(err) => Some(err),
            ExtractionError::Disagreement { .. } => None,
        }
    }
}

impl From<ScanError> for ExtractionError {
    fn from(err: ScanError) -> Self {
        ExtractionError::Scan(err)
    }
}

impl From<ParseError> for ExtractionError {
    fn from(err: ParseError) -> Self {
        ExtractionError::Parse(err)
    }
}
