//! Flow collections: `[a, b]` and `{k: v}`
//!
//! Flow collections may span several lines; they end at their closing bracket.
//! A document marker or the end of input before that is an error.

use std::collections::HashSet;

use super::node::Node;
use super::parser::Parser;
use super::scalars::{is_rest_blank, plain_node};
use crate::gvk::error::ParseError;
use crate::gvk::lexing::{LineKind, QuoteStyle};

/// Read position inside a flow collection
struct FlowInput<'a> {
    rest: &'a str,
    line: usize,
    /// Line of the opening bracket
    start_line: usize,
}

impl<'a> Parser<'a> {
    /// Parse a flow collection starting at `text`, then move past its last line
    pub(super) fn parse_flow_value(&mut self, text: &'a str, line: usize) -> Result<Node, ParseError> {
        let mut input = FlowInput {
            rest: text,
            line,
            start_line: line,
        };
        let node = self.parse_flow_node(&mut input)?;
        if !is_rest_blank(input.rest) {
            return Err(ParseError::UnexpectedContent { line: input.line });
        }
        self.cursor.advance();
        Ok(node)
    }

    fn parse_flow_node(&mut self, input: &mut FlowInput<'a>) -> Result<Node, ParseError> {
        self.skip_flow_space(input)?;
        while input.rest.starts_with(['!', '&']) {
            let end = input
                .rest
                .find([' ', '\t', ',', ']', '}'])
                .unwrap_or(input.rest.len());
            input.rest = &input.rest[end..];
            self.skip_flow_space(input)?;
        }

        match input.rest.as_bytes()[0] {
            b'[' => {
                input.rest = &input.rest[1..];
                self.parse_flow_sequence(input)
            }
            b'{' => {
                input.rest = &input.rest[1..];
                self.parse_flow_mapping(input)
            }
            b'"' | b'\'' => {
                let style = if input.rest.starts_with('"') {
                    QuoteStyle::Double
                } else {
                    QuoteStyle::Single
                };
                let (value, rest, line) = self.read_quoted(input.rest, style, input.line)?;
                input.rest = rest;
                input.line = line;
                Ok(Node::Scalar(value))
            }
            b'*' => {
                let end = input
                    .rest
                    .find([' ', '\t', ',', ']', '}'])
                    .unwrap_or(input.rest.len());
                let name = &input.rest[1..end];
                input.rest = &input.rest[end..];
                Ok(Node::Alias(name.to_string()))
            }
            _ => Ok(plain_node(take_flow_plain(input))),
        }
    }

    fn parse_flow_sequence(&mut self, input: &mut FlowInput<'a>) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_flow_space(input)?;
            if let Some(rest) = input.rest.strip_prefix(']') {
                input.rest = rest;
                return Ok(Node::Sequence(items));
            }

            let key_line = input.line;
            let mut item = self.parse_flow_node(input)?;
            self.skip_flow_space(input)?;
            // single pair mapping: `[a: 1]`
            if let Some(rest) = strip_value_indicator(input.rest) {
                input.rest = rest;
                let value = self.parse_flow_node(input)?;
                self.skip_flow_space(input)?;
                item = Node::Mapping(vec![(flow_key(item, key_line)?, value)]);
            }
            items.push(item);

            if let Some(rest) = input.rest.strip_prefix(',') {
                input.rest = rest;
            } else if !input.rest.starts_with(']') {
                return Err(ParseError::UnexpectedContent { line: input.line });
            }
        }
    }

    fn parse_flow_mapping(&mut self, input: &mut FlowInput<'a>) -> Result<Node, ParseError> {
        let mut entries = Vec::new();
        let mut keys = HashSet::new();
        loop {
            self.skip_flow_space(input)?;
            if let Some(rest) = input.rest.strip_prefix('}') {
                input.rest = rest;
                return Ok(Node::Mapping(entries));
            }

            let key_line = input.line;
            let key = self.parse_flow_node(input)?;
            self.skip_flow_space(input)?;
            let value = match strip_value_indicator(input.rest) {
                Some(rest) => {
                    input.rest = rest;
                    let value = self.parse_flow_node(input)?;
                    self.skip_flow_space(input)?;
                    value
                }
                None => Node::Null,
            };

            let key = flow_key(key, key_line)?;
            if !keys.insert(key.clone()) {
                return Err(ParseError::DuplicateKey {
                    line: key_line,
                    key,
                });
            }
            entries.push((key, value));

            if let Some(rest) = input.rest.strip_prefix(',') {
                input.rest = rest;
            } else if !input.rest.starts_with('}') {
                return Err(ParseError::UnexpectedContent { line: input.line });
            }
        }
    }

    /// Skip whitespace and comments, moving on to following lines as needed
    fn skip_flow_space(&mut self, input: &mut FlowInput<'a>) -> Result<(), ParseError> {
        loop {
            input.rest = input.rest.trim_start_matches([' ', '\t']);
            if input.rest.starts_with('#') {
                input.rest = "";
            }
            if !input.rest.is_empty() {
                return Ok(());
            }

            self.cursor.advance();
            match self.cursor.line() {
                Some(line)
                    if !matches!(
                        line.kind(),
                        LineKind::DocumentMarker | LineKind::MarkerWithContent
                    ) =>
                {
                    input.rest = line.text;
                    input.line = line.number;
                }
                _ => {
                    return Err(ParseError::UnterminatedFlow {
                        line: input.start_line,
                    })
                }
            }
        }
    }
}

/// Take a plain scalar up to the next flow indicator
fn take_flow_plain<'a>(input: &mut FlowInput<'a>) -> &'a str {
    let bytes = input.rest.as_bytes();
    let mut end = bytes.len();
    for i in 0..bytes.len() {
        let stop = match bytes[i] {
            b',' | b'[' | b']' | b'{' | b'}' => true,
            b':' => matches!(
                bytes.get(i + 1),
                None | Some(b' ' | b'\t' | b',' | b']' | b'}')
            ),
            b'#' => i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t'),
            _ => false,
        };
        if stop {
            end = i;
            break;
        }
    }
    let text = input.rest[..end].trim_end();
    input.rest = &input.rest[end..];
    text
}

/// Text after a `:` value indicator
fn strip_value_indicator(rest: &str) -> Option<&str> {
    let after = rest.strip_prefix(':')?;
    match after.as_bytes().first() {
        None | Some(b' ' | b'\t' | b',' | b']' | b'}') => Some(after),
        _ => None,
    }
}

fn flow_key(node: Node, line: usize) -> Result<String, ParseError> {
    match node {
        Node::Scalar(text) => Ok(text),
        Node::Null => Ok(String::new()),
        _ => Err(ParseError::Unsupported {
            line,
            feature: "collection and alias mapping keys",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(text: &str) -> Result<Node, ParseError> {
        let mut parser = Parser::new(text, 1);
        parser.parse_flow_value(text.lines().next().unwrap_or(""), 1)
    }

    #[test]
    fn test_flow_sequence() {
        assert_eq!(
            flow("[a, 'b', \"c\", ~]").unwrap(),
            Node::Sequence(vec![
                Node::scalar("a"),
                Node::scalar("b"),
                Node::scalar("c"),
                Node::Null,
            ])
        );
    }

    #[test]
    fn test_flow_mapping() {
        assert_eq!(
            flow("{apiVersion: v1, kind: Pod, extra}").unwrap(),
            Node::Mapping(vec![
                ("apiVersion".to_string(), Node::scalar("v1")),
                ("kind".to_string(), Node::scalar("Pod")),
                ("extra".to_string(), Node::Null),
            ])
        );
    }

    #[test]
    fn test_url_inside_flow() {
        assert_eq!(
            flow("[http://example.com]").unwrap(),
            Node::Sequence(vec![Node::scalar("http://example.com")])
        );
    }

    #[test]
    fn test_flow_across_lines() {
        let text = "{a: [1,\n  2], # comment\n b: c}";
        assert_eq!(
            flow(text).unwrap(),
            Node::Mapping(vec![
                (
                    "a".to_string(),
                    Node::Sequence(vec![Node::scalar("1"), Node::scalar("2")])
                ),
                ("b".to_string(), Node::scalar("c")),
            ])
        );
    }

    #[test]
    fn test_single_pair_in_sequence() {
        assert_eq!(
            flow("[a: 1]").unwrap(),
            Node::Sequence(vec![Node::Mapping(vec![(
                "a".to_string(),
                Node::scalar("1")
            )])])
        );
    }

    #[test]
    fn test_unterminated_at_marker() {
        assert_eq!(
            flow("[a,\n---\nb]").unwrap_err(),
            ParseError::UnterminatedFlow { line: 1 }
        );
        assert_eq!(
            flow("{a: 1").unwrap_err(),
            ParseError::UnterminatedFlow { line: 1 }
        );
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            flow("{a: 1 b: 2}").unwrap_err(),
            ParseError::UnexpectedContent { line: 1 }
        );
    }

    #[test]
    fn test_trailing_content() {
        assert_eq!(
            flow("[a] b").unwrap_err(),
            ParseError::UnexpectedContent { line: 1 }
        );
    }
}
