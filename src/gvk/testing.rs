//! Shared test fixtures
//!
//! [`SAMPLE`] is the built-in demonstration input used by the CLI when no file is
//! given. [`SCENARIOS`] is the table every strategy is tested against; both
//! strategies must produce the expected outcome for each entry.

use crate::gvk::extract::Identifier;

/// Three documents; the middle one holds `---` inside a literal block scalar
pub const SAMPLE: &str = "apiVersion: foo
kind: bar
---
apiVersion: test
kind: test
string: |
   ---
---
apiVersion: yup
kind: aha
";

/// Expected outcome of a scenario
#[derive(Debug, Clone, Copy)]
pub enum Expected {
    /// `(group, version, kind)` per document, in order
    Identifiers(&'static [(&'static str, &'static str, &'static str)]),
    /// Extraction must fail
    Failure,
}

impl Expected {
    pub fn identifiers(&self) -> Option<Vec<Identifier>> {
        match self {
            Expected::Identifiers(ids) => Some(
                ids.iter()
                    .map(|(group, version, kind)| Identifier::new(*group, *version, *kind))
                    .collect(),
            ),
            Expected::Failure => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub input: &'static str,
    pub expected: Expected,
}

const FOO_TEST_YUP: &[(&str, &str, &str)] =
    &[("", "foo", "bar"), ("", "test", "test"), ("", "yup", "aha")];

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "basic",
        input: "apiVersion: foo
kind: bar
---
apiVersion: test
kind: test
string: |
    ---
---
apiVersion: yup
kind: aha
",
        expected: Expected::Identifiers(FOO_TEST_YUP),
    },
    Scenario {
        name: "delimiter in string",
        input: "apiVersion: foo
kind: bar
---
apiVersion: test
kind: test
string: \"foo
---
bar\"
---
apiVersion: yup
kind: aha",
        expected: Expected::Identifiers(FOO_TEST_YUP),
    },
    Scenario {
        name: "empty input",
        input: "",
        expected: Expected::Identifiers(&[]),
    },
    Scenario {
        name: "no trailing boundary",
        input: "apiVersion: v1\nkind: ConfigMap",
        expected: Expected::Identifiers(&[("", "v1", "ConfigMap")]),
    },
    Scenario {
        name: "group and version",
        input: "apiVersion: apps/v1
kind: Deployment
---
apiVersion: rbac.authorization.k8s.io/v1
kind: Role
",
        expected: Expected::Identifiers(&[
            ("apps", "v1", "Deployment"),
            ("rbac.authorization.k8s.io", "v1", "Role"),
        ]),
    },
    Scenario {
        name: "comment-only documents",
        input: "# leading comment
---
apiVersion: v1
kind: A
---
# trailing comment
",
        expected: Expected::Identifiers(&[("", "v1", "A")]),
    },
    Scenario {
        name: "single-quoted marker",
        input: "apiVersion: v1
kind: 'Quoted'
note: 'it''s
---
fine'
---
apiVersion: v2
kind: B
",
        expected: Expected::Identifiers(&[("", "v1", "Quoted"), ("", "v2", "B")]),
    },
    Scenario {
        name: "nested structure",
        input: "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  labels: {app: web}
spec:
  template:
    spec:
      containers:
      - name: app
        args:
        - |
          ---
          not a boundary
        command: [\"sh\", \"-c\"]
---
apiVersion: v1
kind: Service
",
        expected: Expected::Identifiers(&[("apps", "v1", "Deployment"), ("", "v1", "Service")]),
    },
    Scenario {
        name: "block scalar indicators",
        input: "apiVersion: v1
kind: ConfigMap
data:
  script: >-
    echo one
    ---
  other: |+

---
apiVersion: v1
kind: Secret
",
        expected: Expected::Identifiers(&[("", "v1", "ConfigMap"), ("", "v1", "Secret")]),
    },
    Scenario {
        name: "block scalar in sequence entry",
        input: "apiVersion: v1
kind: A
items:
- script: |
    foo
  note: \"a
---
b\"
---
apiVersion: v2
kind: B
",
        expected: Expected::Identifiers(&[("", "v1", "A"), ("", "v2", "B")]),
    },
    Scenario {
        name: "quote in plain continuation",
        input: "apiVersion: v1
kind: A
note: a
  \"b
---
apiVersion: v2
kind: B
",
        expected: Expected::Identifiers(&[("", "v1", "A"), ("", "v2", "B")]),
    },
    Scenario {
        name: "crlf and marker comment",
        input: "apiVersion: v1\r\nkind: A\r\n--- # next\r\napiVersion: v1\r\nkind: B\r\n",
        expected: Expected::Identifiers(&[("", "v1", "A"), ("", "v1", "B")]),
    },
    Scenario {
        name: "unterminated quote",
        input: "apiVersion: v1
kind: A
note: \"never closed
---
apiVersion: v1
kind: B
",
        expected: Expected::Failure,
    },
    Scenario {
        name: "content on marker line",
        input: "apiVersion: v1\nkind: A\n--- kind: B\n",
        expected: Expected::Failure,
    },
    Scenario {
        name: "sequence document",
        input: "apiVersion: v1\nkind: A\n---\n- a\n- b\n",
        expected: Expected::Failure,
    },
];

/// Look up a scenario by name
pub fn scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}
