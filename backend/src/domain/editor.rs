//! Plain-text editor key handling.
//!
//! The editor is a `(text, selection)` buffer. Key presses that the editor
//! handles produce a new buffer; every other key leaves the text alone and is
//! left to the client's default behaviour.
//!
//! Offsets are UTF-8 byte offsets and must sit on character boundaries. Only
//! ASCII tabs, spaces, newlines and comment tokens are inserted or removed, so
//! adjusted offsets stay on boundaries.

use serde::{Deserialize, Serialize};

use super::Language;

const TAB: &str = "\t";
const TWO_SPACES: &str = "  ";

/// Errors raised when constructing a buffer with an invalid selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// The selection extends past the end of the text.
    #[error("selection {start}..{end} exceeds text length {len}")]
    OutOfBounds {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
        /// Text length in bytes.
        len: usize,
    },
    /// The selection start lies after its end.
    #[error("selection start {start} is after end {end}")]
    Reversed {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// An offset splits a multi-byte character.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Offending offset.
        offset: usize,
    },
}

/// A key press as reported by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    /// `KeyboardEvent.key` value, e.g. `Tab`, `Enter` or `/`.
    pub key: String,
    /// Shift held.
    #[serde(default)]
    pub shift: bool,
    /// Control held.
    #[serde(default)]
    pub ctrl: bool,
    /// Command (meta) held.
    #[serde(default)]
    pub meta: bool,
}

/// Editing command derived from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// `Tab`
    Indent,
    /// `Shift+Tab`
    Outdent,
    /// `Enter`
    Newline,
    /// `Ctrl+/` or `Cmd+/`
    ToggleComment,
}

impl EditorCommand {
    /// Map a key press onto a command, if the editor handles it.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{EditorCommand, KeyPress};
    ///
    /// let press = KeyPress { key: "/".into(), meta: true, ..Default::default() };
    /// assert_eq!(EditorCommand::from_key(&press), Some(EditorCommand::ToggleComment));
    /// let plain = KeyPress { key: "a".into(), ..Default::default() };
    /// assert_eq!(EditorCommand::from_key(&plain), None);
    /// ```
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        match press.key.as_str() {
            "Tab" if press.shift => Some(Self::Outdent),
            "Tab" => Some(Self::Indent),
            "Enter" => Some(Self::Newline),
            "/" if press.ctrl || press.meta => Some(Self::ToggleComment),
            _ => None,
        }
    }
}

/// Text plus selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorBuffer {
    text: String,
    selection_start: usize,
    selection_end: usize,
}

impl EditorBuffer {
    /// Validate and construct a buffer.
    pub fn new(
        text: impl Into<String>,
        selection_start: usize,
        selection_end: usize,
    ) -> Result<Self, EditorError> {
        let text = text.into();
        if selection_start > selection_end {
            return Err(EditorError::Reversed {
                start: selection_start,
                end: selection_end,
            });
        }
        if selection_end > text.len() {
            return Err(EditorError::OutOfBounds {
                start: selection_start,
                end: selection_end,
                len: text.len(),
            });
        }
        for offset in [selection_start, selection_end] {
            if !text.is_char_boundary(offset) {
                return Err(EditorError::NotCharBoundary { offset });
            }
        }
        Ok(Self {
            text,
            selection_start,
            selection_end,
        })
    }

    /// Buffer text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selection start offset.
    pub const fn selection_start(&self) -> usize {
        self.selection_start
    }

    /// Selection end offset.
    pub const fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Apply a key press; `None` when the key is not handled.
    pub fn apply_key(&self, press: &KeyPress, language: Language) -> Option<Self> {
        EditorCommand::from_key(press).map(|command| self.apply(command, language))
    }

    /// Apply an editing command.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{EditorBuffer, EditorCommand, Language};
    ///
    /// let buffer = EditorBuffer::new("x = 1", 0, 5).unwrap();
    /// let edited = buffer.apply(EditorCommand::ToggleComment, Language::Python);
    /// assert_eq!(edited.text(), "# x = 1");
    /// ```
    #[must_use]
    pub fn apply(&self, command: EditorCommand, language: Language) -> Self {
        match command {
            EditorCommand::Indent if self.spans_lines() => self.indent_block(),
            EditorCommand::Outdent if self.spans_lines() => self.outdent_block(),
            EditorCommand::Indent => self.insert_tab(),
            EditorCommand::Outdent => self.outdent_line(),
            EditorCommand::Newline => self.newline(),
            EditorCommand::ToggleComment => self.toggle_comment(language.comment_token()),
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        self.text
            .get(..pos)
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |index| index + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.text
            .get(pos..)
            .and_then(|after| after.find('\n'))
            .map_or(self.text.len(), |index| pos + index)
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.text.get(start..end).unwrap_or_default()
    }

    /// Bounds of the lines touched by the selection.
    fn block(&self) -> (usize, usize) {
        (
            self.line_start(self.selection_start),
            self.line_end(self.selection_end),
        )
    }

    fn spans_lines(&self) -> bool {
        let (start, end) = self.block();
        self.selection_start != self.selection_end && self.slice(start, end).contains('\n')
    }

    fn splice(&self, start: usize, end: usize, replacement: &str) -> String {
        let mut text = String::with_capacity(self.text.len() + replacement.len());
        text.push_str(self.slice(0, start));
        text.push_str(replacement);
        text.push_str(self.slice(end, self.text.len()));
        text
    }

    fn with(text: String, selection_start: usize, selection_end: usize) -> Self {
        let selection_start = floor_boundary(&text, selection_start);
        let selection_end = floor_boundary(&text, selection_end.max(selection_start));
        Self {
            text,
            selection_start,
            selection_end,
        }
    }

    fn indent_block(&self) -> Self {
        let (start, end) = self.block();
        let lines: Vec<&str> = self.slice(start, end).split('\n').collect();
        let indented = lines
            .iter()
            .map(|line| format!("{TAB}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self::with(
            self.splice(start, end, &indented),
            self.selection_start + TAB.len(),
            self.selection_end + lines.len() * TAB.len(),
        )
    }

    fn outdent_block(&self) -> Self {
        let (start, end) = self.block();
        let lines: Vec<&str> = self.slice(start, end).split('\n').collect();
        let removed: usize = lines.iter().map(|line| outdent_width(line)).sum();
        let outdented = lines
            .iter()
            .map(|line| line.get(outdent_width(line)..).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        let start_shift = if self.selection_start > start {
            outdent_width(self.slice(start, self.selection_start))
        } else {
            0
        };
        Self::with(
            self.splice(start, end, &outdented),
            self.selection_start - start_shift,
            self.selection_end.saturating_sub(removed),
        )
    }

    fn insert_tab(&self) -> Self {
        let caret = self.selection_start + TAB.len();
        Self::with(
            self.splice(self.selection_start, self.selection_end, TAB),
            caret,
            caret,
        )
    }

    fn outdent_line(&self) -> Self {
        let line_start = self.line_start(self.selection_start);
        let width = outdent_width(self.slice(line_start, self.text.len()));
        if width == 0 {
            return self.clone();
        }
        Self::with(
            self.splice(line_start, line_start + width, ""),
            self.selection_start.saturating_sub(width).max(line_start),
            self.selection_end.saturating_sub(width).max(line_start),
        )
    }

    fn newline(&self) -> Self {
        let line_start = self.line_start(self.selection_start);
        let before_caret = self.slice(line_start, self.selection_start);
        let indent_len = before_caret
            .find(|c: char| c != '\t' && c != ' ')
            .unwrap_or(before_caret.len());
        let insertion = format!("\n{}", before_caret.get(..indent_len).unwrap_or_default());
        let caret = self.selection_start + insertion.len();
        Self::with(
            self.splice(self.selection_start, self.selection_end, &insertion),
            caret,
            caret,
        )
    }

    fn toggle_comment(&self, token: &str) -> Self {
        let (start, end) = self.block();
        let lines: Vec<&str> = self.slice(start, end).split('\n').collect();
        let all_commented = lines.iter().all(|line| line.trim().starts_with(token));
        let toggled = lines
            .iter()
            .map(|line| {
                let (indent, rest) = split_leading_whitespace(line);
                if all_commented {
                    rest.strip_prefix(token).map_or_else(
                        || (*line).to_owned(),
                        |after| format!("{indent}{}", strip_one_whitespace(after)),
                    )
                } else {
                    format!("{indent}{token} {rest}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let selection_end = start + toggled.len();
        Self::with(self.splice(start, end, &toggled), start, selection_end)
    }
}

/// Width of the indent removed by an outdent: one tab, else two spaces.
fn outdent_width(line: &str) -> usize {
    if line.starts_with(TAB) {
        TAB.len()
    } else if line.starts_with(TWO_SPACES) {
        TWO_SPACES.len()
    } else {
        0
    }
}

fn split_leading_whitespace(line: &str) -> (&str, &str) {
    let split = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    line.split_at(split)
}

fn strip_one_whitespace(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => text,
    }
}

fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
