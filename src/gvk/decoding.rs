//! Structural decoder
//!
//! Parses the whole stream as YAML and yields the minimal header of each document.
//! Boundaries fall out of the parse: a `---` line inside a block or quoted scalar is
//! consumed as scalar content before the parser ever looks for a marker.
//!
//! The decoder covers the block and flow subset used by configuration manifests:
//! mappings, sequences (including compact `- key: value` entries), plain, quoted and
//! block scalars, comments, tags and anchors. Aliases are kept unresolved. Complex
//! `?` keys and the `...` end marker are rejected with a [`ParseError`].
//!
//! Documents with no root node are skipped. Documents whose root is `null` yield an
//! empty header.

mod cursor;
mod flow;
pub mod node;
mod parser;
mod scalars;

pub use node::Node;

use crate::gvk::error::ParseError;
use crate::gvk::header::DocumentHeader;
use parser::Parser;
use tracing::debug;

/// Decodes one document after another from a single text
pub struct DocumentDecoder<'a> {
    parser: Parser<'a>,
    failed: bool,
}

impl<'a> DocumentDecoder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::starting_at(text, 1)
    }

    /// Decoder for text that starts on line `first_line` of a larger input, so
    /// errors point into that input
    pub fn starting_at(text: &'a str, first_line: usize) -> Self {
        Self {
            parser: Parser::new(text, first_line),
            failed: false,
        }
    }

    /// Decode the next document to its full node tree.
    ///
    /// After an error the decoder yields nothing more.
    pub fn next_document(&mut self) -> Result<Option<Node>, ParseError> {
        Ok(self.next_located()?.map(|(_, node)| node))
    }

    /// Decode the next document's header.
    ///
    /// Returns `Ok(None)` at the end of input. After an error the decoder yields
    /// nothing more.
    pub fn decode_next(&mut self) -> Result<Option<DocumentHeader>, ParseError> {
        let Some((line, node)) = self.next_located()? else {
            return Ok(None);
        };
        match DocumentHeader::from_node(&node, line) {
            Ok(header) => {
                debug!(
                    line,
                    api_version = %header.api_version,
                    kind = %header.kind,
                    "decoded document"
                );
                Ok(Some(header))
            }
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    /// Next document's root node with the line it starts on
    pub(crate) fn next_located(&mut self) -> Result<Option<(usize, Node)>, ParseError> {
        if self.failed {
            return Ok(None);
        }
        self.parser.next_document().map_err(|err| {
            debug!(error = %err, "decoding stopped");
            self.failed = true;
            err
        })
    }
}

impl Iterator for DocumentDecoder<'_> {
    type Item = Result<DocumentHeader, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_next().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(text: &str) -> Result<Vec<DocumentHeader>, ParseError> {
        DocumentDecoder::new(text).collect()
    }

    #[test]
    fn test_decodes_each_document() {
        let text = "apiVersion: v1\nkind: A\n---\napiVersion: apps/v1\nkind: B\n";
        assert_eq!(
            headers(text).unwrap(),
            vec![
                DocumentHeader::new("v1", "A"),
                DocumentHeader::new("apps/v1", "B"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(headers("").unwrap().is_empty());
        assert!(headers("---\n---\n# nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_null_document_has_empty_header() {
        assert_eq!(headers("~\n").unwrap(), vec![DocumentHeader::default()]);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        assert_eq!(
            headers("metadata:\n  name: x\n").unwrap(),
            vec![DocumentHeader::default()]
        );
    }

    #[test]
    fn test_not_a_mapping() {
        assert_eq!(
            headers("a: 1\n---\n- item\n").unwrap_err(),
            ParseError::NotAMapping { line: 3 }
        );
    }

    #[test]
    fn test_fused_after_error() {
        let mut decoder = DocumentDecoder::new("a: \"open\n");
        assert!(decoder.decode_next().is_err());
        assert_eq!(decoder.decode_next(), Ok(None));
    }

    #[test]
    fn test_line_offset() {
        let mut decoder = DocumentDecoder::starting_at("kind: [a\n", 10);
        assert_eq!(
            decoder.decode_next(),
            Err(ParseError::UnterminatedFlow { line: 10 })
        );
    }

    #[test]
    fn test_next_document_returns_tree() {
        let mut decoder = DocumentDecoder::new("kind: K\nspec: {replicas: 2}\n");
        let node = decoder.next_document().unwrap().unwrap();
        assert_eq!(
            node.get("spec").and_then(|spec| spec.get("replicas")),
            Some(&Node::scalar("2"))
        );
        assert_eq!(decoder.next_document(), Ok(None));
    }
}
