//! Scalar decoding helpers
//!
//! Quoted scalars are decoded segment by segment so the parser can feed them one
//! physical line at a time. Block scalars are collected by the parser and folded
//! or kept literal here. The remaining helpers cut plain text into keys, values
//! and comments.

use crate::gvk::decoding::node::Node;
use crate::gvk::error::ParseError;
use crate::gvk::lexing::line_scanner::BLOCK_SCALAR_HEADER;
use crate::gvk::lexing::QuoteStyle;

/// Incremental decoder for a single- or double-quoted scalar
///
/// Line breaks between segments are folded: a single break becomes a space, each
/// empty line becomes a newline, and a `\` at the end of a double-quoted line joins
/// the lines without any separator.
pub(crate) struct QuotedScalar {
    style: QuoteStyle,
    value: String,
    /// Length of `value` that trailing-whitespace trimming must not cut into
    protected: usize,
    segments: usize,
    empty_lines: usize,
    escaped_break: bool,
}

impl QuotedScalar {
    pub fn new(style: QuoteStyle) -> Self {
        Self {
            style,
            value: String::new(),
            protected: 0,
            segments: 0,
            empty_lines: 0,
            escaped_break: false,
        }
    }

    /// Feed the next segment: the text after the opening quote first, then each
    /// non-empty continuation line in full.
    ///
    /// Returns the number of bytes of `segment` consumed up to and including the
    /// closing quote, or `None` when the scalar continues on the next line.
    pub fn feed(&mut self, segment: &str, line: usize) -> Result<Option<usize>, ParseError> {
        let mut offset = 0;
        let mut text = segment;
        if self.segments > 0 {
            text = segment.trim_start_matches([' ', '\t']);
            offset = segment.len() - text.len();
            if self.empty_lines > 0 {
                for _ in 0..self.empty_lines {
                    self.value.push('\n');
                }
            } else if !self.escaped_break {
                self.value.push(' ');
            }
            self.empty_lines = 0;
            self.escaped_break = false;
        }
        self.segments += 1;

        let mut chars = text.char_indices().peekable();
        while let Some((i, ch)) = chars.next() {
            match (self.style, ch) {
                (QuoteStyle::Double, '"') => return Ok(Some(offset + i + 1)),
                (QuoteStyle::Double, '\\') => match chars.next() {
                    None => {
                        self.escaped_break = true;
                        self.protected = self.value.len();
                        return Ok(None);
                    }
                    Some((_, escape)) => {
                        let decoded = decode_escape(escape, &mut chars, line)?;
                        self.value.push(decoded);
                        self.protected = self.value.len();
                    }
                },
                (QuoteStyle::Single, '\'') => {
                    if matches!(chars.peek(), Some((_, '\''))) {
                        chars.next();
                        self.value.push('\'');
                        self.protected = self.value.len();
                    } else {
                        return Ok(Some(offset + i + 1));
                    }
                }
                _ => self.value.push(ch),
            }
        }

        // White space before a folded line break is not content
        let keep = self
            .value
            .trim_end_matches([' ', '\t'])
            .len()
            .max(self.protected);
        self.value.truncate(keep);
        Ok(None)
    }

    /// Record an empty continuation line
    pub fn feed_empty_line(&mut self) {
        self.empty_lines += 1;
    }

    pub fn finish(self) -> String {
        self.value
    }
}

fn decode_escape(
    escape: char,
    chars: &mut impl Iterator<Item = (usize, char)>,
    line: usize,
) -> Result<char, ParseError> {
    let decoded = match escape {
        '0' => '\0',
        'a' => '\x07',
        'b' => '\x08',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\x0b',
        'f' => '\x0c',
        'r' => '\r',
        'e' => '\x1b',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{a0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        'x' => return decode_hex(escape, 2, chars, line),
        'u' => return decode_hex(escape, 4, chars, line),
        'U' => return decode_hex(escape, 8, chars, line),
        other => {
            return Err(ParseError::InvalidEscape {
                line,
                escape: format!("\\{}", other),
            })
        }
    };
    Ok(decoded)
}

fn decode_hex(
    escape: char,
    digits: usize,
    chars: &mut impl Iterator<Item = (usize, char)>,
    line: usize,
) -> Result<char, ParseError> {
    let hex: String = chars.take(digits).map(|(_, ch)| ch).collect();
    let invalid = || ParseError::InvalidEscape {
        line,
        escape: format!("\\{}{}", escape, hex),
    };
    if hex.len() != digits || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}

/// Trailing line break handling of a block scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chomping {
    Strip,
    Clip,
    Keep,
}

/// Parsed `|` / `>` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockScalarHeader {
    pub folded: bool,
    pub chomping: Chomping,
    /// Explicit indentation indicator
    pub indent: Option<usize>,
}

impl BlockScalarHeader {
    pub fn parse(token: &str) -> Option<Self> {
        if !BLOCK_SCALAR_HEADER.is_match(token) {
            return None;
        }
        let mut header = BlockScalarHeader {
            folded: token.starts_with('>'),
            chomping: Chomping::Clip,
            indent: None,
        };
        for ch in token.chars().skip(1) {
            match ch {
                '-' => header.chomping = Chomping::Strip,
                '+' => header.chomping = Chomping::Keep,
                digit => header.indent = digit.to_digit(10).map(|d| d as usize),
            }
        }
        Some(header)
    }
}

/// Build a block scalar from its content lines, indentation removed and blank
/// lines given as empty strings.
pub(crate) fn block_scalar_value(header: &BlockScalarHeader, lines: &[&str]) -> String {
    let trailing = lines.iter().rev().take_while(|line| line.is_empty()).count();
    let body = &lines[..lines.len() - trailing];

    if body.is_empty() {
        return match header.chomping {
            Chomping::Keep => "\n".repeat(trailing),
            _ => String::new(),
        };
    }

    let mut value = if header.folded {
        fold_lines(body)
    } else {
        body.join("\n")
    };
    match header.chomping {
        Chomping::Strip => {}
        Chomping::Clip => value.push('\n'),
        Chomping::Keep => {
            value.push('\n');
            value.push_str(&"\n".repeat(trailing));
        }
    }
    value
}

/// Folding for `>` scalars. Breaks between two regular lines become spaces; breaks
/// next to more-indented lines and empty lines are kept.
fn fold_lines(lines: &[&str]) -> String {
    let mut value = String::new();
    let mut previous: Option<&str> = None;
    let mut empty = 0;

    for line in lines {
        if line.is_empty() {
            empty += 1;
            continue;
        }
        if let Some(previous) = previous {
            let more_indented =
                previous.starts_with([' ', '\t']) || line.starts_with([' ', '\t']);
            if empty == 0 {
                value.push(if more_indented { '\n' } else { ' ' });
            } else {
                if more_indented {
                    value.push('\n');
                }
                value.push_str(&"\n".repeat(empty));
            }
        } else {
            value.push_str(&"\n".repeat(empty));
        }
        empty = 0;
        value.push_str(line);
        previous = Some(line);
    }
    value
}

/// `- ` sequence entry indicator at the start of `content`
pub(crate) fn is_sequence_entry(content: &str) -> bool {
    content == "-" || content.starts_with("- ") || content.starts_with("-\t")
}

/// `? ` complex key indicator at the start of `content`
pub(crate) fn is_complex_key(content: &str) -> bool {
    content == "?" || content.starts_with("? ") || content.starts_with("?\t")
}

/// Whether only whitespace or a comment is left
pub(crate) fn is_rest_blank(text: &str) -> bool {
    let text = text.trim_start_matches([' ', '\t']);
    text.is_empty() || text.starts_with('#')
}

/// Cut a ` # comment` off plain text
pub(crate) fn strip_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return &text[..i];
        }
    }
    text
}

/// Skip leading tag and anchor properties
pub(crate) fn skip_properties(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim_start_matches([' ', '\t']);
        if !trimmed.starts_with(['!', '&']) {
            return trimmed;
        }
        let end = trimmed.find([' ', '\t']).unwrap_or(trimmed.len());
        text = &trimmed[end..];
    }
}

/// Node for a plain scalar; `null`, `~` and the empty string resolve to null
pub(crate) fn plain_node(text: &str) -> Node {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => Node::Null,
        _ => Node::scalar(text),
    }
}

/// Split `key: value` into the decoded key and the text after the colon.
///
/// Keys may be plain or quoted on a single line. Returns `None` when the line holds
/// no mapping entry.
pub(crate) fn split_mapping_entry(
    content: &str,
    line: usize,
) -> Result<Option<(String, &str)>, ParseError> {
    if let Some(style) = content.chars().next().and_then(QuoteStyle::from_char) {
        let mut key = QuotedScalar::new(style);
        let closed = match key.feed(&content[1..], line)? {
            Some(consumed) => 1 + consumed,
            None => return Ok(None),
        };
        let after = content[closed..].trim_start_matches([' ', '\t']);
        let entry = after
            .strip_prefix(':')
            .filter(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
            .map(|rest| (key.finish(), rest));
        return Ok(entry);
    }

    if content.starts_with(['[', '{', '#']) {
        return Ok(None);
    }

    let bytes = content.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'#' if i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') => return Ok(None),
            b':' if bytes.get(i + 1).map_or(true, |b| *b == b' ' || *b == b'\t') => {
                let key = skip_properties(content[..i].trim_end());
                return Ok(Some((key.to_string(), &content[i + 1..])));
            }
            _ => {}
        }
    }
    Ok(None)
}
