//! The two fields every document is inspected for
//!
//! Only `apiVersion` and `kind` matter; every other field is decoded and dropped.
//! A missing or `null` field reads as the empty string.

use crate::gvk::decoding::{DocumentDecoder, Node};
use crate::gvk::error::ParseError;
use crate::gvk::reader::RawDocument;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHeader {
    pub api_version: String,
    pub kind: String,
}

impl DocumentHeader {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Read the header from a decoded root node found at `line`
    pub fn from_node(node: &Node, line: usize) -> Result<Self, ParseError> {
        match node {
            Node::Mapping(_) => Ok(Self {
                api_version: header_field(node, "apiVersion", line)?,
                kind: header_field(node, "kind", line)?,
            }),
            Node::Null => Ok(Self::default()),
            _ => Err(ParseError::NotAMapping { line }),
        }
    }

    /// Decode the header of a document found by the reader.
    ///
    /// Blank documents give an empty header. Errors point at lines of the whole input.
    /// The text must hold a single document; a second root node is reported as
    /// unexpected content at its line.
    pub fn from_raw(raw: &RawDocument) -> Result<Self, ParseError> {
        if raw.is_blank() {
            return Ok(Self::default());
        }
        let mut decoder = DocumentDecoder::starting_at(raw.text(), raw.start_line());
        let header = decoder.decode_next()?.unwrap_or_default();
        if let Some((line, _)) = decoder.next_located()? {
            return Err(ParseError::UnexpectedContent { line });
        }
        Ok(header)
    }
}

fn header_field(node: &Node, key: &str, line: usize) -> Result<String, ParseError> {
    match node.get(key) {
        None | Some(Node::Null) => Ok(String::new()),
        Some(Node::Scalar(text)) => Ok(text.clone()),
        Some(_) => Err(ParseError::InvalidHeaderField {
            line,
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_node() {
        let node = Node::Mapping(vec![
            ("kind".to_string(), Node::scalar("Service")),
            ("apiVersion".to_string(), Node::scalar("v1")),
            ("spec".to_string(), Node::Sequence(vec![])),
        ]);
        assert_eq!(
            DocumentHeader::from_node(&node, 1).unwrap(),
            DocumentHeader::new("v1", "Service")
        );
    }

    #[test]
    fn test_null_fields() {
        let node = Node::Mapping(vec![("kind".to_string(), Node::Null)]);
        assert_eq!(
            DocumentHeader::from_node(&node, 1).unwrap(),
            DocumentHeader::default()
        );
    }

    #[test]
    fn test_collection_field_is_invalid() {
        let node = Node::Mapping(vec![(
            "kind".to_string(),
            Node::Sequence(vec![Node::scalar("a")]),
        )]);
        assert_eq!(
            DocumentHeader::from_node(&node, 4).unwrap_err(),
            ParseError::InvalidHeaderField {
                line: 4,
                key: "kind".to_string()
            }
        );
    }

    #[test]
    fn test_scalar_root_is_not_a_mapping() {
        assert_eq!(
            DocumentHeader::from_node(&Node::scalar("text"), 2).unwrap_err(),
            ParseError::NotAMapping { line: 2 }
        );
    }

    #[test]
    fn test_from_raw_rejects_a_second_document() {
        let raw = RawDocument::new(3, "kind: A\n---\nkind: B\n");
        assert_eq!(
            DocumentHeader::from_raw(&raw).unwrap_err(),
            ParseError::UnexpectedContent { line: 5 }
        );
    }

    #[test]
    fn test_from_raw_allows_trailing_empty_document() {
        let raw = RawDocument::new(1, "kind: A\n---\n# nothing\n");
        assert_eq!(
            DocumentHeader::from_raw(&raw).unwrap(),
            DocumentHeader::new("", "A")
        );
    }

    #[test]
    fn test_from_raw_uses_absolute_lines() {
        let raw = RawDocument::new(5, "kind: a\nkind: b\n");
        assert_eq!(
            DocumentHeader::from_raw(&raw).unwrap_err(),
            ParseError::DuplicateKey {
                line: 6,
                key: "kind".to_string()
            }
        );
    }
}
