//! Block structure parser
//!
//! A recursive descent over lines. Each block node is parsed knowing the
//! indentation of the collection that owns it; a line indented at or below the
//! owner ends the node. Scalars are delegated to [`scalars`](super::scalars), flow
//! collections to [`flow`](super::flow).

use std::collections::HashSet;

use super::cursor::{LineCursor, Slot};
use super::node::Node;
use super::scalars::{
    block_scalar_value, is_complex_key, is_rest_blank, is_sequence_entry, plain_node,
    skip_properties, split_mapping_entry, strip_comment, BlockScalarHeader, QuotedScalar,
};
use crate::gvk::error::ParseError;
use crate::gvk::lexing::{LineKind, QuoteStyle};

pub(crate) struct Parser<'a> {
    pub(super) cursor: LineCursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, first_number: usize) -> Self {
        Self {
            cursor: LineCursor::new(text, first_number),
        }
    }

    /// Parse the next document that has a root node.
    ///
    /// Documents without one (nothing but blank lines, comments and directives
    /// between two markers) are skipped. Returns the line of the root node with
    /// the node itself.
    pub fn next_document(&mut self) -> Result<Option<(usize, Node)>, ParseError> {
        loop {
            match self.peek_structural()? {
                Some(slot) => {
                    let node = self.parse_node(slot, None)?;
                    if let Some(extra) = self.peek_structural()? {
                        return Err(if extra.indent > 0 {
                            ParseError::BadIndentation { line: extra.number }
                        } else {
                            ParseError::UnexpectedContent { line: extra.number }
                        });
                    }
                    self.skip_marker();
                    return Ok(Some((slot.number, node)));
                }
                None => {
                    if !self.skip_marker() {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Skip blank, comment and directive lines.
    ///
    /// Returns the next structural line, or `None` at the end of input or at a
    /// document marker.
    fn peek_structural(&mut self) -> Result<Option<Slot<'a>>, ParseError> {
        while let Some(slot) = self.cursor.current() {
            if slot.is_virtual {
                return Ok(Some(slot));
            }
            let kind = self.cursor.line().map_or(LineKind::Blank, |line| line.kind());
            match kind {
                kind if kind.is_ignorable() => self.cursor.advance(),
                LineKind::DocumentMarker => return Ok(None),
                LineKind::MarkerWithContent => {
                    return Err(ParseError::MarkerContent { line: slot.number })
                }
                _ if slot.content.starts_with('\t') => {
                    return Err(ParseError::TabIndentation { line: slot.number })
                }
                _ => return Ok(Some(slot)),
            }
        }
        Ok(None)
    }

    /// Consume a document marker under the cursor
    fn skip_marker(&mut self) -> bool {
        match self.cursor.current() {
            Some(slot)
                if !slot.is_virtual
                    && self.cursor.line().map(|line| line.kind())
                        == Some(LineKind::DocumentMarker) =>
            {
                self.cursor.advance();
                true
            }
            _ => false,
        }
    }

    /// Parse the block node starting at `slot`, owned by a collection at `owner`
    fn parse_node(&mut self, slot: Slot<'a>, owner: Option<usize>) -> Result<Node, ParseError> {
        if is_sequence_entry(slot.content) {
            return self.parse_sequence(slot.indent);
        }
        if is_complex_key(slot.content) {
            return Err(ParseError::Unsupported {
                line: slot.number,
                feature: "complex mapping keys",
            });
        }
        if split_mapping_entry(slot.content, slot.number)?.is_some() {
            return self.parse_mapping(slot.indent);
        }
        self.parse_value(slot.content, owner, slot.number, false)
    }

    /// Node on the lines after the current one, nested under `owner`
    ///
    /// A mapping value may be a sequence at the key's own indentation.
    fn parse_nested(
        &mut self,
        owner: Option<usize>,
        sequence_at_owner: bool,
    ) -> Result<Node, ParseError> {
        let Some(slot) = self.peek_structural()? else {
            return Ok(Node::Null);
        };
        if owner.map_or(true, |owner| slot.indent > owner) {
            return self.parse_node(slot, owner);
        }
        if sequence_at_owner && Some(slot.indent) == owner && is_sequence_entry(slot.content) {
            return self.parse_sequence(slot.indent);
        }
        Ok(Node::Null)
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node, ParseError> {
        let mut entries = Vec::new();
        let mut keys = HashSet::new();

        while let Some(slot) = self.peek_structural()? {
            if slot.indent < indent {
                break;
            }
            if slot.indent > indent {
                return Err(ParseError::BadIndentation { line: slot.number });
            }
            if is_complex_key(slot.content) {
                return Err(ParseError::Unsupported {
                    line: slot.number,
                    feature: "complex mapping keys",
                });
            }
            if is_sequence_entry(slot.content) {
                return Err(ParseError::UnexpectedContent { line: slot.number });
            }
            let Some((key, value_text)) = split_mapping_entry(slot.content, slot.number)? else {
                return Err(ParseError::UnexpectedContent { line: slot.number });
            };
            if !keys.insert(key.clone()) {
                return Err(ParseError::DuplicateKey {
                    line: slot.number,
                    key,
                });
            }
            let value = self.parse_value(value_text, Some(indent), slot.number, true)?;
            entries.push((key, value));
        }

        Ok(Node::Mapping(entries))
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node, ParseError> {
        let mut items = Vec::new();

        while let Some(slot) = self.peek_structural()? {
            if slot.indent < indent {
                break;
            }
            if slot.indent > indent {
                return Err(ParseError::BadIndentation { line: slot.number });
            }
            if !is_sequence_entry(slot.content) {
                break;
            }

            let after_dash = &slot.content[1..];
            let item_text = after_dash.trim_start_matches([' ', '\t']);
            let column = slot.indent + 1 + (after_dash.len() - item_text.len());

            let item = if is_rest_blank(item_text) {
                self.cursor.advance();
                self.parse_nested(Some(indent), false)?
            } else if is_sequence_entry(item_text)
                || is_complex_key(item_text)
                || split_mapping_entry(item_text, slot.number)?.is_some()
            {
                // compact collection: `- - a` or `- key: value`
                self.cursor.replace_current(column, item_text);
                match self.cursor.current() {
                    Some(nested) => self.parse_node(nested, Some(indent))?,
                    None => Node::Null,
                }
            } else {
                self.parse_value(item_text, Some(indent), slot.number, false)?
            };
            items.push(item);
        }

        Ok(Node::Sequence(items))
    }

    /// Parse the value starting at `text` on `line`, then move past it.
    ///
    /// `owner` is the indentation of the collection holding the value; continuation
    /// lines of the value must be indented deeper.
    fn parse_value(
        &mut self,
        text: &'a str,
        owner: Option<usize>,
        line: usize,
        in_mapping: bool,
    ) -> Result<Node, ParseError> {
        let text = skip_properties(text);
        if is_rest_blank(text) {
            self.cursor.advance();
            return self.parse_nested(owner, in_mapping);
        }

        let token_end = text.find([' ', '\t']).unwrap_or(text.len());
        let (token, rest) = text.split_at(token_end);

        match text.as_bytes()[0] {
            b'*' => {
                if !is_rest_blank(rest) {
                    return Err(ParseError::UnexpectedContent { line });
                }
                self.cursor.advance();
                Ok(Node::Alias(token[1..].to_string()))
            }
            b'"' | b'\'' => {
                let style = if text.starts_with('"') {
                    QuoteStyle::Double
                } else {
                    QuoteStyle::Single
                };
                let (value, rest, end_line) = self.read_quoted(text, style, line)?;
                if !is_rest_blank(rest) {
                    return Err(ParseError::UnexpectedContent { line: end_line });
                }
                self.cursor.advance();
                Ok(Node::Scalar(value))
            }
            b'[' | b'{' => self.parse_flow_value(text, line),
            b'|' | b'>' if is_rest_blank(rest) => match BlockScalarHeader::parse(token) {
                Some(header) => self.parse_block_scalar(header, owner),
                None => self.parse_plain(text, owner),
            },
            _ => self.parse_plain(text, owner),
        }
    }

    /// Decode a quoted scalar whose opening quote starts `text`, following it
    /// across lines.
    ///
    /// Returns the value, the text after the closing quote and the line holding
    /// the closing quote. The cursor is left on that line.
    pub(super) fn read_quoted(
        &mut self,
        text: &'a str,
        style: QuoteStyle,
        line: usize,
    ) -> Result<(String, &'a str, usize), ParseError> {
        let mut scalar = QuotedScalar::new(style);
        let mut segment = &text[1..];
        let mut current = line;

        loop {
            if let Some(consumed) = scalar.feed(segment, current)? {
                return Ok((scalar.finish(), &segment[consumed..], current));
            }
            loop {
                self.cursor.advance();
                let next = self
                    .cursor
                    .line()
                    .ok_or(ParseError::UnterminatedQuote { line })?;
                if next.is_blank() {
                    scalar.feed_empty_line();
                    continue;
                }
                segment = next.text;
                current = next.number;
                break;
            }
        }
    }

    fn parse_block_scalar(
        &mut self,
        header: BlockScalarHeader,
        owner: Option<usize>,
    ) -> Result<Node, ParseError> {
        self.cursor.advance();

        let mut content_indent = header.indent.map(|k| owner.unwrap_or(0) + k);
        let mut lines: Vec<&'a str> = Vec::new();

        while let Some(line) = self.cursor.line() {
            if line.is_blank() {
                lines.push("");
                self.cursor.advance();
                continue;
            }
            let indent = line.indent();
            let ends = match owner {
                Some(owner) => indent <= owner,
                None => matches!(
                    line.kind(),
                    LineKind::DocumentMarker | LineKind::MarkerWithContent
                ),
            };
            if ends {
                break;
            }
            let required = *content_indent.get_or_insert(indent);
            if indent < required {
                break;
            }
            lines.push(&line.text[required..]);
            self.cursor.advance();
        }

        Ok(Node::Scalar(block_scalar_value(&header, &lines)))
    }

    /// Plain scalar, possibly continued on more-indented lines
    fn parse_plain(&mut self, text: &'a str, owner: Option<usize>) -> Result<Node, ParseError> {
        let first = strip_comment(text).trim_end();
        let commented = first.len() != text.trim_end().len();
        self.cursor.advance();
        if commented {
            return Ok(plain_node(first));
        }

        let mut value = first.to_string();
        let mut empty_lines = 0;
        while let Some(line) = self.cursor.peek_line(empty_lines) {
            if line.is_blank() {
                empty_lines += 1;
                continue;
            }
            let continues = line.kind() == LineKind::Content
                && owner.map_or(true, |owner| line.indent() > owner);
            if !continues {
                break;
            }
            for _ in 0..=empty_lines {
                self.cursor.advance();
            }

            let content = line.text.trim_start_matches([' ', '\t']);
            // a mapping entry cannot continue a plain scalar
            if split_mapping_entry(content, line.number)?.is_some() {
                return Err(if line.indent() > 0 {
                    ParseError::BadIndentation { line: line.number }
                } else {
                    ParseError::UnexpectedContent { line: line.number }
                });
            }
            let part = strip_comment(content).trim_end();
            if empty_lines == 0 {
                value.push(' ');
            } else {
                value.push_str(&"\n".repeat(empty_lines));
            }
            empty_lines = 0;
            value.push_str(part);

            if part.len() != content.trim_end().len() {
                break;
            }
        }

        Ok(plain_node(&value))
    }
}
