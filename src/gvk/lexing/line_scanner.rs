//! Single-line scalar scanner
//!
//! Reports what a line leaves open for the lines after it. The reader calls this for
//! every line outside a block scalar to decide whether a following `---` line can
//! be a document boundary.
//!
//! # Rules
//!
//! - A quote opens a quoted scalar only at a scalar start: line start, after a `- `,
//!   `? ` or `: ` indicator, or after `[`, `{` or `,` inside a flow collection. An
//!   apostrophe inside a plain scalar (`don't`) is just text.
//! - Double-quoted scalars honour `\` escapes, single-quoted scalars honour `''`.
//! - `#` starts a comment at line start or after whitespace, outside quotes.
//! - A block scalar indicator (`|` or `>` with optional chomping and indentation
//!   indicators) at a scalar start, followed by nothing but whitespace or a comment,
//!   opens a block scalar on the following lines. Tag and anchor properties may
//!   precede it.
//! - A line ending inside an uncommented plain value may continue on deeper lines.
//!
//! Block and plain outcomes carry the column of the node that owns the value: the
//! key of a `key:` entry, after any `- ` indicators, or the last `- ` of a sequence
//! item. Only lines indented deeper than that column continue the value.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block scalar header: style, then chomping and indentation indicators in either order
pub(crate) static BLOCK_SCALAR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[|>](?:[1-9][+-]?|[+-][1-9]?)?$").unwrap());

/// Quote character of a quoted scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Double,
    Single,
}

impl QuoteStyle {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(QuoteStyle::Double),
            '\'' => Some(QuoteStyle::Single),
            _ => None,
        }
    }
}

/// What a scanned line leaves open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing continues onto the next line
    Closed,
    /// A quoted scalar continues onto the next line
    OpenQuote(QuoteStyle),
    /// The line ends with a block scalar header
    BlockScalar { owner: usize },
    /// The line ends inside a plain value of a block collection
    PlainScalar { owner: usize },
}

/// Scan one line.
///
/// `text` is the line without its indentation, and owner columns are relative to
/// it. When `open_quote` is set the line starts inside a quoted scalar continued
/// from an earlier line, and `text` should be the full line (indentation is part of
/// the scalar).
pub fn scan_line(text: &str, open_quote: Option<QuoteStyle>) -> ScanOutcome {
    let bytes = text.as_bytes();
    let mut i = 0;

    if let Some(style) = open_quote {
        match quoted_end(bytes, 0, style) {
            Some(end) => i = end,
            None => return ScanOutcome::OpenQuote(style),
        }
    }

    let mut at_scalar_start = open_quote.is_none();
    let mut at_node_start = open_quote.is_none();
    let mut node_column = 0;
    let mut owner = None;
    let mut in_plain = false;
    let mut after_blank = true;
    let mut flow_depth = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b' ' || b == b'\t' {
            after_blank = true;
            i += 1;
            continue;
        }
        if at_node_start && !(b == b'-' && is_separated(bytes, i + 1)) {
            node_column = i;
            at_node_start = false;
        }

        match b {
            b'#' if after_blank => return ScanOutcome::Closed,
            b'"' | b'\'' if at_scalar_start => {
                let style = if b == b'"' {
                    QuoteStyle::Double
                } else {
                    QuoteStyle::Single
                };
                match quoted_end(bytes, i + 1, style) {
                    Some(end) => {
                        i = end;
                        at_scalar_start = false;
                        in_plain = false;
                    }
                    None => return ScanOutcome::OpenQuote(style),
                }
            }
            b'|' | b'>' if at_scalar_start && flow_depth == 0 => {
                let end = token_end(bytes, i);
                let rest = text[end..].trim_start();
                if BLOCK_SCALAR_HEADER.is_match(&text[i..end])
                    && (rest.is_empty() || rest.starts_with('#'))
                {
                    return ScanOutcome::BlockScalar {
                        owner: owner.unwrap_or(0),
                    };
                }
                i = end;
                at_scalar_start = false;
                in_plain = true;
            }
            // Node properties keep us at the scalar start
            b'!' | b'&' if at_scalar_start => i = token_end(bytes, i),
            b'[' | b'{' if at_scalar_start || flow_depth > 0 => {
                flow_depth += 1;
                at_scalar_start = true;
                in_plain = false;
                i += 1;
            }
            b']' | b'}' if flow_depth > 0 => {
                flow_depth -= 1;
                at_scalar_start = false;
                in_plain = false;
                i += 1;
            }
            b',' if flow_depth > 0 => {
                at_scalar_start = true;
                i += 1;
            }
            b'-' | b'?' if at_scalar_start && is_separated(bytes, i + 1) => {
                if b == b'-' && at_node_start {
                    owner = Some(i);
                }
                i += 1;
            }
            b':' if is_separated(bytes, i + 1) => {
                if flow_depth == 0 {
                    owner = Some(node_column);
                }
                at_scalar_start = true;
                in_plain = false;
                i += 1;
            }
            _ => {
                at_scalar_start = false;
                in_plain = true;
                i += 1;
            }
        }
        after_blank = false;
    }

    match owner {
        Some(owner) if in_plain && flow_depth == 0 => ScanOutcome::PlainScalar { owner },
        _ => ScanOutcome::Closed,
    }
}

/// Whether plain text holds a ` #` comment
pub(crate) fn has_comment(text: &str) -> bool {
    let bytes = text.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return true;
        }
    }
    false
}

/// Index just past the closing quote, or `None` when the quote stays open
fn quoted_end(bytes: &[u8], start: usize, style: QuoteStyle) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match (style, bytes[i]) {
            (QuoteStyle::Double, b'\\') => i += 2,
            (QuoteStyle::Double, b'"') => return Some(i + 1),
            (QuoteStyle::Single, b'\'') => {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                } else {
                    return Some(i + 1);
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// End of the whitespace-delimited token starting at `start`
fn token_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| *b == b' ' || *b == b'\t')
        .map_or(bytes.len(), |offset| start + offset)
}

/// Whether position `i` is whitespace or the end of the line
fn is_separated(bytes: &[u8], i: usize) -> bool {
    bytes.get(i).map_or(true, |b| *b == b' ' || *b == b'\t')
}
