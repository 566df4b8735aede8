//! Undoable edit commands
//!
//! An [`Action`] wraps one edit on a [`TextBuffer`]. It records where the
//! edit happened and where the caret was, executes against the buffer, and
//! keeps whatever it needs to undo itself. Actions that change nothing come
//! out of `exec` ineffective and never reach the undo stack.

mod log;

use std::time::Instant;

pub use log::ActionLog;

use crate::text::{
    Coord, FileFormat, LineChange, LineRange, PointDelta, SeekType, TextBuffer, TextPoint,
    TextRange, TextUnit,
};
use crate::util::text::make_indent;

/// Leading whitespace of one line before and after a re-indent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentChange {
    pub line: Coord,
    pub old: String,
    pub new: String,
}

/// The edit an action performs, plus the state its undo needs
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    InsertChar {
        c: char,
    },
    InsertString {
        text: String,
    },
    InsertText {
        text: String,
        /// Point past the inserted text, set by exec
        end: TextPoint,
    },
    /// Delete by seek from the action point. `range` is filled on first exec
    /// and reused on redo.
    Delete {
        unit: TextUnit,
        seek_type: SeekType,
        range: Option<TextRange>,
        text: String,
    },
    DeleteRange {
        range: TextRange,
        text: String,
    },
    IncreaseIndent {
        lines: LineRange,
        changes: Vec<IndentChange>,
    },
    DecreaseIndent {
        lines: LineRange,
        changes: Vec<IndentChange>,
    },
    AutoIndentLine {
        line: Coord,
        changes: Vec<IndentChange>,
    },
    AutoIndentRange {
        lines: LineRange,
        changes: Vec<IndentChange>,
    },
    SetFileFormat {
        format: FileFormat,
        old: FileFormat,
    },
    /// Transaction boundary marker
    Group,
}

#[derive(Debug, Clone)]
pub struct Action {
    kind: ActionKind,
    point: TextPoint,
    caret_point: TextPoint,
    delta_point: PointDelta,
    effective: bool,
    grouped: bool,
    timestamp: Instant,
}

impl Action {
    pub fn new(kind: ActionKind, point: TextPoint, caret_point: TextPoint) -> Self {
        Self {
            kind,
            point,
            caret_point,
            delta_point: PointDelta::default(),
            effective: false,
            grouped: false,
            timestamp: Instant::now(),
        }
    }

    pub fn insert_char(point: TextPoint, c: char) -> Self {
        Self::new(ActionKind::InsertChar { c }, point, point)
    }

    pub fn insert_string(point: TextPoint, text: impl Into<String>) -> Self {
        Self::new(ActionKind::InsertString { text: text.into() }, point, point)
    }

    pub fn insert_text(point: TextPoint, text: impl Into<String>) -> Self {
        let kind = ActionKind::InsertText {
            text: text.into(),
            end: point,
        };
        Self::new(kind, point, point)
    }

    /// Delete from `point` by `unit` in `seek_type` direction
    pub fn delete(point: TextPoint, unit: TextUnit, seek_type: SeekType) -> Self {
        let kind = ActionKind::Delete {
            unit,
            seek_type,
            range: None,
            text: String::new(),
        };
        Self::new(kind, point, point)
    }

    pub fn delete_range(range: TextRange, caret: TextPoint) -> Self {
        let kind = ActionKind::DeleteRange {
            range,
            text: String::new(),
        };
        Self::new(kind, range.begin(), caret)
    }

    pub fn increase_indent(lines: LineRange, caret: TextPoint) -> Self {
        let kind = ActionKind::IncreaseIndent {
            lines,
            changes: Vec::new(),
        };
        Self::new(kind, TextPoint::new(0, lines.first()), caret)
    }

    pub fn decrease_indent(lines: LineRange, caret: TextPoint) -> Self {
        let kind = ActionKind::DecreaseIndent {
            lines,
            changes: Vec::new(),
        };
        Self::new(kind, TextPoint::new(0, lines.first()), caret)
    }

    pub fn auto_indent_line(line: Coord, caret: TextPoint) -> Self {
        let kind = ActionKind::AutoIndentLine {
            line,
            changes: Vec::new(),
        };
        Self::new(kind, TextPoint::new(0, line), caret)
    }

    pub fn auto_indent_range(lines: LineRange, caret: TextPoint) -> Self {
        let kind = ActionKind::AutoIndentRange {
            lines,
            changes: Vec::new(),
        };
        Self::new(kind, TextPoint::new(0, lines.first()), caret)
    }

    pub fn set_file_format(format: FileFormat, caret: TextPoint) -> Self {
        let kind = ActionKind::SetFileFormat {
            format,
            old: format,
        };
        Self::new(kind, caret, caret)
    }

    pub(crate) fn group_marker() -> Self {
        let mut action = Self::new(ActionKind::Group, TextPoint::default(), TextPoint::default());
        action.grouped = true;
        action.effective = true;
        action
    }

    /// An action that already ran, e.g. one built from merged keystrokes
    pub(crate) fn executed(
        kind: ActionKind,
        point: TextPoint,
        caret_point: TextPoint,
        caret_after: TextPoint,
        timestamp: Instant,
    ) -> Self {
        let mut action = Self::new(kind, point, caret_point);
        action.effective = true;
        action.timestamp = timestamp;
        action.set_caret_after(caret_after);
        action
    }

    /// Override the creation time, e.g. to replay recorded edits
    pub fn with_timestamp(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn point(&self) -> TextPoint {
        self.point
    }

    /// Caret before execution
    pub fn caret_point(&self) -> TextPoint {
        self.caret_point
    }

    pub fn delta_point(&self) -> PointDelta {
        self.delta_point
    }

    /// Caret after execution
    pub fn caret_after(&self) -> TextPoint {
        self.caret_point.offset(self.delta_point)
    }

    pub fn is_effective(&self) -> bool {
        self.effective
    }

    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    fn set_caret_after(&mut self, caret: TextPoint) {
        self.delta_point = PointDelta::between(self.caret_point, caret);
    }

    /// Apply the edit to `buffer`, setting `effective` and the caret delta
    pub fn exec(&mut self, buffer: &mut TextBuffer) {
        let point = self.point;
        let caret = self.caret_point;
        let (effective, caret_after) = match &mut self.kind {
            ActionKind::InsertChar { c } => {
                let delta = buffer.insert_char(point, *c);
                (true, point.offset(delta))
            }
            ActionKind::InsertString { text } => {
                buffer.insert_string(point, text);
                let len = text.chars().count();
                (len > 0, TextPoint::new(point.x + len, point.y))
            }
            ActionKind::InsertText { text, end } => {
                *end = buffer.insert_text(point, text);
                (!text.is_empty(), *end)
            }
            ActionKind::Delete {
                unit,
                seek_type,
                range,
                text,
            } => {
                let target = match range {
                    Some(range) => *range,
                    None => buffer.seek_range(point, *unit, *seek_type),
                };
                *range = Some(target);
                *text = buffer.delete_text(target);
                (!text.is_empty(), target.begin())
            }
            ActionKind::DeleteRange { range, text } => {
                *text = buffer.delete_text(*range);
                (!text.is_empty(), range.begin())
            }
            ActionKind::IncreaseIndent { lines, changes } => {
                let shift = buffer.options().shift_width;
                *changes = reindent(buffer, *lines, |buffer, ln| {
                    (!buffer.line(ln).is_blank()).then(|| buffer.get_indent(ln) + shift)
                });
                (!changes.is_empty(), caret_after_reindent(caret, changes))
            }
            ActionKind::DecreaseIndent { lines, changes } => {
                let shift = buffer.options().shift_width;
                *changes = reindent(buffer, *lines, |buffer, ln| {
                    Some(buffer.get_indent(ln).saturating_sub(shift))
                });
                (!changes.is_empty(), caret_after_reindent(caret, changes))
            }
            ActionKind::AutoIndentLine { line, changes } => {
                *changes = reindent(buffer, LineRange::single(*line), |buffer, ln| {
                    Some(buffer.expected_indent(ln))
                });
                (!changes.is_empty(), caret_after_reindent(caret, changes))
            }
            ActionKind::AutoIndentRange { lines, changes } => {
                *changes = reindent(buffer, *lines, |buffer, ln| {
                    (!buffer.line(ln).is_blank()).then(|| buffer.expected_indent(ln))
                });
                (!changes.is_empty(), caret_after_reindent(caret, changes))
            }
            ActionKind::SetFileFormat { format, old } => {
                *old = buffer.file_format();
                buffer.set_file_format(*format);
                (*old != *format, caret)
            }
            ActionKind::Group => (true, caret),
        };
        self.effective = effective;
        self.set_caret_after(caret_after);
    }

    /// Revert the edit. Returns the caret to restore.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> TextPoint {
        let point = self.point;
        match &self.kind {
            ActionKind::InsertChar { .. } => {
                buffer.delete_char(point);
            }
            ActionKind::InsertString { text } => {
                buffer.delete_string(point, text.chars().count(), false);
            }
            ActionKind::InsertText { end, .. } => {
                buffer.delete_text(TextRange::new(point, *end));
            }
            ActionKind::Delete { range, text, .. } => {
                let begin = range.map_or(point, |r| r.begin());
                buffer.insert_text(begin, text);
            }
            ActionKind::DeleteRange { range, text } => {
                buffer.insert_text(range.begin(), text);
            }
            ActionKind::IncreaseIndent { changes, .. }
            | ActionKind::DecreaseIndent { changes, .. }
            | ActionKind::AutoIndentLine { changes, .. }
            | ActionKind::AutoIndentRange { changes, .. } => {
                restore_indent(buffer, changes);
            }
            ActionKind::SetFileFormat { old, .. } => buffer.set_file_format(*old),
            ActionKind::Group => {}
        }
        self.caret_point
    }

    /// Merge a following delete into this one. Both must be deletes of the
    /// same unit and direction, the second starting where the first left
    /// the caret.
    pub(crate) fn try_merge_delete(&mut self, next: &Action, interval: std::time::Duration) -> bool {
        let ActionKind::Delete {
            unit,
            seek_type,
            range: Some(range),
            text,
        } = &mut self.kind
        else {
            return false;
        };
        let ActionKind::Delete {
            unit: next_unit,
            seek_type: next_seek,
            range: Some(next_range),
            text: next_text,
        } = &next.kind
        else {
            return false;
        };
        let caret_after = self.caret_point.offset(self.delta_point);
        if *unit != *next_unit
            || *seek_type != *next_seek
            || next.caret_point != caret_after
            || next.timestamp.saturating_duration_since(self.timestamp) > interval
        {
            return false;
        }

        // The second span must sit right against the first
        let contiguous = if seek_type.is_backward() {
            next_range.end() == range.begin()
        } else {
            next_range.begin() == range.begin()
        };
        if !contiguous {
            return false;
        }

        let begin = if seek_type.is_backward() {
            text.insert_str(0, next_text);
            next_range.begin()
        } else {
            text.push_str(next_text);
            range.begin()
        };
        *range = TextRange::new(begin, end_of_inserted(begin, text));
        self.point = begin;
        self.timestamp = next.timestamp;
        let merged_caret = next.caret_after();
        self.set_caret_after(merged_caret);
        true
    }
}

/// Point just past `text` if it were inserted at `begin`
fn end_of_inserted(begin: TextPoint, text: &str) -> TextPoint {
    match text.rsplit_once('\n') {
        Some((head, tail)) => TextPoint::new(
            tail.chars().count(),
            begin.y + head.matches('\n').count() + 1,
        ),
        None => TextPoint::new(begin.x + text.chars().count(), begin.y),
    }
}

/// Rewrite the leading whitespace of each line in `lines` to the width
/// `target` returns (`None` leaves the line alone). Lines are handled in
/// order so each target sees the lines above already re-indented.
fn reindent(
    buffer: &mut TextBuffer,
    lines: LineRange,
    target: impl Fn(&TextBuffer, Coord) -> Option<Coord>,
) -> Vec<IndentChange> {
    let options = buffer.options().clone();
    let mut changes = Vec::new();
    let line_count = buffer.line_count();
    buffer.freeze_notify();
    for ln in lines.iter().filter(|ln| *ln <= line_count) {
        let Some(width) = target(buffer, ln) else {
            continue;
        };
        let new = make_indent(width, options.tab_stop, options.expand_tab);
        let old = replace_indent(buffer, ln, &new);
        if old != new {
            // Later targets read the lexer state of this line
            buffer.scan_lex_on_line_updated(LineRange::single(ln));
            changes.push(IndentChange { line: ln, old, new });
        }
    }
    buffer.thaw_notify();
    notify_changed_lines(buffer, &changes);
    changes
}

fn restore_indent(buffer: &mut TextBuffer, changes: &[IndentChange]) {
    buffer.freeze_notify();
    for change in changes.iter().rev() {
        replace_indent(buffer, change.line, &change.old);
    }
    buffer.thaw_notify();
    notify_changed_lines(buffer, changes);
}

fn notify_changed_lines(buffer: &mut TextBuffer, changes: &[IndentChange]) {
    let first = changes.iter().map(|c| c.line).min();
    let last = changes.iter().map(|c| c.line).max();
    if let (Some(first), Some(last)) = (first, last) {
        buffer.notify_line(LineChange::Updated, LineRange::new(first, last));
    }
}

/// Swap the leading whitespace of line `ln` for `indent`, returning the old
/// one
fn replace_indent(buffer: &mut TextBuffer, ln: Coord, indent: &str) -> String {
    let start = TextPoint::new(0, ln);
    let old_len = buffer.line(ln).indent_len();
    let old = buffer.delete_string(start, old_len, true).unwrap_or_default();
    buffer.insert_string(start, indent);
    old
}

fn caret_after_reindent(caret: TextPoint, changes: &[IndentChange]) -> TextPoint {
    match changes.iter().find(|c| c.line == caret.y) {
        Some(change) => {
            let old_len = change.old.chars().count();
            let new_len = change.new.chars().count();
            let x = if caret.x <= old_len {
                new_len
            } else {
                caret.x - old_len + new_len
            };
            TextPoint::new(x, caret.y)
        }
        None => caret,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_type::FileType;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_text(text, FileType::PlainText)
    }

    #[test]
    fn test_exec_undo_insert_text() {
        let mut buffer = buffer("ab");
        let mut action = Action::insert_text(TextPoint::new(1, 1), "x\ny");
        action.exec(&mut buffer);
        assert!(action.is_effective());
        assert_eq!(buffer.text(), "ax\nyb");
        assert_eq!(action.caret_after(), TextPoint::new(1, 2));
        assert_eq!(action.undo(&mut buffer), TextPoint::new(1, 1));
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_delete_at_buffer_start_is_ineffective() {
        let mut buffer = buffer("ab");
        let mut action = Action::delete(TextPoint::new(0, 1), TextUnit::Char, SeekType::Prev);
        action.exec(&mut buffer);
        assert!(!action.is_effective());
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_indent_actions_round_trip() {
        let mut buffer = buffer("a\n\n  b");
        let lines = LineRange::new(1, 3);
        let mut indent = Action::increase_indent(lines, TextPoint::new(1, 3));
        indent.exec(&mut buffer);
        assert_eq!(buffer.text(), "    a\n\n      b");
        assert_eq!(indent.caret_after(), TextPoint::new(6, 3));

        let mut dedent = Action::decrease_indent(lines, TextPoint::new(0, 1));
        dedent.exec(&mut buffer);
        assert_eq!(buffer.text(), "a\n\n  b");
        dedent.undo(&mut buffer);
        assert_eq!(buffer.text(), "    a\n\n      b");
        indent.undo(&mut buffer);
        assert_eq!(buffer.text(), "a\n\n  b");
    }

    #[test]
    fn test_set_file_format() {
        let mut buffer = buffer("a");
        let mut action = Action::set_file_format(FileFormat::Win, TextPoint::default());
        action.exec(&mut buffer);
        assert!(action.is_effective());
        assert_eq!(buffer.file_format(), FileFormat::Win);
        action.undo(&mut buffer);
        assert_eq!(buffer.file_format(), FileFormat::Unix);
    }

    #[test]
    fn test_end_of_inserted() {
        assert_eq!(end_of_inserted(TextPoint::new(2, 3), "ab"), TextPoint::new(4, 3));
        assert_eq!(end_of_inserted(TextPoint::new(2, 3), "ab\ncd\ne"), TextPoint::new(1, 5));
    }
}
