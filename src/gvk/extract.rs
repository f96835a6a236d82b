//! Identifier extraction
//!
//! Turns a [`DocumentHeader`] into an [`Identifier`] by splitting `apiVersion` on its
//! first `/`:
//!
//! | apiVersion | group   | version |
//! |------------|---------|---------|
//! | `v1`       | (empty) | `v1`    |
//! | `apps/v1`  | `apps`  | `v1`    |
//! | `a/b/c`    | `a`     | `b/c`   |
//! | (empty)    | (empty) | (empty) |
//!
//! Every string splits, so extraction cannot fail.

use std::fmt;

use serde::Serialize;

use crate::gvk::header::DocumentHeader;

/// Group, version and kind of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    group: String,
    version: String,
    kind: String,
}

impl Identifier {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `group/version`, or just `version` for the core group.
    ///
    /// An empty group never keeps its slash: `/v1` and `v1` split the same way and
    /// both come back as `v1`.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

impl From<DocumentHeader> for Identifier {
    fn from(header: DocumentHeader) -> Self {
        extract(&header)
    }
}

pub fn extract(header: &DocumentHeader) -> Identifier {
    let (group, version) = split_api_version(&header.api_version);
    Identifier::new(group, version, header.kind.as_str())
}

/// Split on the first `/`; without one the group is empty
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    api_version.split_once('/').unwrap_or(("", api_version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_group() {
        let id = extract(&DocumentHeader::new("v1", "Pod"));
        assert_eq!(id, Identifier::new("", "v1", "Pod"));
    }

    #[test]
    fn test_named_group() {
        let id = extract(&DocumentHeader::new("apps/v1", "Deployment"));
        assert_eq!(id.group(), "apps");
        assert_eq!(id.version(), "v1");
        assert_eq!(id.kind(), "Deployment");
    }

    #[test]
    fn test_only_first_slash_splits() {
        assert_eq!(split_api_version("a/b/c"), ("a", "b/c"));
        assert_eq!(split_api_version("/v1"), ("", "v1"));
        assert_eq!(split_api_version("g/"), ("g", ""));
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(Identifier::from(DocumentHeader::default()), Identifier::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Identifier::new("apps", "v1", "Deployment").to_string(),
            "apps/v1, Kind=Deployment"
        );
        assert_eq!(Identifier::new("", "foo", "bar").to_string(), "/foo, Kind=bar");
    }

    #[test]
    fn test_api_version_rejoins() {
        assert_eq!(Identifier::new("", "v1", "K").api_version(), "v1");
        assert_eq!(Identifier::new("apps", "v1", "K").api_version(), "apps/v1");
    }

    #[test]
    fn test_api_version_drops_empty_group_slash() {
        let id = extract(&DocumentHeader::new("/v1", "K"));
        assert_eq!(id, extract(&DocumentHeader::new("v1", "K")));
        assert_eq!(id.api_version(), "v1");
    }

    #[test]
    fn test_serializes_field_names() {
        let json = serde_json::to_string(&Identifier::new("g", "v", "k")).unwrap();
        assert_eq!(json, r#"{"group":"g","version":"v","kind":"k"}"#);
    }
}
