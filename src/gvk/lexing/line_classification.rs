//! Line Classification
//!
//! Classifies a physical line without any knowledge of the lines around it.
//! Whether a `DocumentMarker` line really separates documents depends on scanner
//! state and is decided by the callers.

use once_cell::sync::Lazy;
use regex::Regex;

/// `---` alone on a line, optionally followed by whitespace and a comment
static DOCUMENT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^---(?:[ \t]+(?:#.*)?)?$").unwrap());

/// `---` followed by whitespace and something other than a comment
static MARKER_WITH_CONTENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^---[ \t]+[^ \t#]").unwrap());

/// Type of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Only whitespace
    Blank,
    /// First non-space character is `#`
    Comment,
    /// `%` in column 0, e.g. `%YAML 1.2`
    Directive,
    /// `---` in column 0, nothing else but whitespace or a comment
    DocumentMarker,
    /// `---` in column 0 followed by inline content, e.g. `--- !tag`
    MarkerWithContent,
    /// Anything else
    Content,
}

impl LineKind {
    /// Lines that never contribute structure outside of scalars
    pub fn is_ignorable(self) -> bool {
        matches!(self, LineKind::Blank | LineKind::Comment | LineKind::Directive)
    }
}

/// Determine the type of a line.
///
/// Classification order:
/// 1. Blank lines
/// 2. Document markers (with or without inline content)
/// 3. Directives
/// 4. Comments
/// 5. Default to content
pub fn classify_line(text: &str) -> LineKind {
    if text.trim().is_empty() {
        return LineKind::Blank;
    }

    if text.starts_with("---") {
        if DOCUMENT_MARKER.is_match(text) {
            return LineKind::DocumentMarker;
        }
        if MARKER_WITH_CONTENT.is_match(text) {
            return LineKind::MarkerWithContent;
        }
    }

    if text.starts_with('%') {
        return LineKind::Directive;
    }

    if text.trim_start().starts_with('#') {
        return LineKind::Comment;
    }

    LineKind::Content
}
