//! Line cursor for the structural parser
//!
//! The parser consumes physical lines front to back. A compact collection such as
//! `- name: x` is handled by replacing the current line with a *virtual* line that
//! starts at the nested node's column (`name: x` at indentation 2), so the block
//! parser can treat it like any other line.

use crate::gvk::lexing::{lines_from, Line};

/// The line under the cursor, possibly virtual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot<'a> {
    pub number: usize,
    pub indent: usize,
    /// Text after the indentation
    pub content: &'a str,
    /// Whether this is the remainder of a physical line
    pub is_virtual: bool,
}

pub(crate) struct LineCursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    replacement: Option<Slot<'a>>,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str, first_number: usize) -> Self {
        Self {
            lines: lines_from(text, first_number).collect(),
            pos: 0,
            replacement: None,
        }
    }

    /// The physical line under the cursor, ignoring any virtual replacement
    pub fn line(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    pub fn current(&self) -> Option<Slot<'a>> {
        if let Some(slot) = self.replacement {
            return Some(slot);
        }
        self.line().map(|line| Slot {
            number: line.number,
            indent: line.indent(),
            content: line.content(),
            is_virtual: false,
        })
    }

    /// Replace the current line with its remainder starting at `indent`
    pub fn replace_current(&mut self, indent: usize, content: &'a str) {
        if let Some(line) = self.line() {
            self.replacement = Some(Slot {
                number: line.number,
                indent,
                content,
                is_virtual: true,
            });
        }
    }

    pub fn advance(&mut self) {
        self.replacement = None;
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    /// Physical line `offset` lines after the current one
    pub fn peek_line(&self, offset: usize) -> Option<Line<'a>> {
        self.lines.get(self.pos + offset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_replacement_is_cleared_on_advance() {
        let mut cursor = LineCursor::new("- a: 1\nb: 2\n", 1);
        cursor.replace_current(2, "a: 1");
        let slot = cursor.current().unwrap();
        assert_eq!((slot.indent, slot.content, slot.is_virtual), (2, "a: 1", true));

        cursor.advance();
        let slot = cursor.current().unwrap();
        assert_eq!((slot.number, slot.content, slot.is_virtual), (2, "b: 2", false));

        cursor.advance();
        assert_eq!(cursor.line(), None);
        assert_eq!(cursor.current(), None);
    }
}
