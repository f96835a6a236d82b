//! Decoded document values

/// A decoded YAML node
///
/// Scalars keep their text; no type resolution beyond `null` happens. Anchors and
/// tags are dropped during decoding and aliases are kept unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Scalar(String),
    Alias(String),
    Sequence(Vec<Node>),
    /// Entries in document order
    Mapping(Vec<(String, Node)>),
}

impl Node {
    pub fn scalar(text: impl Into<String>) -> Self {
        Node::Scalar(text.into())
    }

    /// Look up a key when this node is a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }
}
