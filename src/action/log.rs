//! Undo/redo history of a buffer

use std::collections::VecDeque;
use std::time::Duration;

use crate::text::{BufferChange, TextBuffer, TextPoint, TextRange};

use super::{Action, ActionKind};

/// Undo and redo stacks plus the saved partition.
///
/// `saved` and `undo` form one history: `saved` holds what was on the undo
/// stack at the last save and `undo` what came after. The history position is
/// the number of actions ever pushed minus those undone, so it can be compared
/// against the position recorded at save time.
#[derive(Debug)]
pub struct ActionLog {
    undo: VecDeque<Action>,
    redo: Vec<Action>,
    saved: VecDeque<Action>,
    /// Executed InsertChar actions awaiting a merge into words
    pending: Vec<Action>,
    max_undo: usize,
    /// Actions dropped off the front of the history
    base: usize,
    save_point: Option<usize>,
    group_depth: usize,
    group_opened: bool,
}

impl ActionLog {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            saved: VecDeque::new(),
            pending: Vec::new(),
            max_undo: max_undo.max(1),
            base: 0,
            save_point: Some(0),
            group_depth: 0,
            group_opened: false,
        }
    }

    pub fn set_max_undo(&mut self, max_undo: usize) {
        self.max_undo = max_undo.max(1);
        self.trim();
    }

    pub fn can_undo(&self) -> bool {
        !self.pending.is_empty() || !self.undo.is_empty() || !self.saved.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_empty() && !self.redo.is_empty()
    }

    /// Actions reachable by undo, not counting group markers
    pub fn undo_count(&self) -> usize {
        self.saved
            .iter()
            .chain(self.undo.iter())
            .filter(|a| a.kind != ActionKind::Group)
            .count()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.iter().filter(|a| a.kind != ActionKind::Group).count()
    }

    /// Actions in the saved partition
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    pub fn is_modified(&self) -> bool {
        !self.pending.is_empty() || self.save_point != Some(self.position())
    }

    pub fn in_group(&self) -> bool {
        self.group_depth > 0
    }

    fn position(&self) -> usize {
        self.base + self.saved.len() + self.undo.len()
    }

    /// New history is about to replace whatever could be redone
    fn clear_redo(&mut self) {
        if self.redo.is_empty() {
            return;
        }
        if self.save_point.is_some_and(|p| p > self.position()) {
            self.save_point = None;
        }
        self.redo.clear();
    }

    /// Push an executed, effective action. Deletes may merge into the top.
    fn push(&mut self, action: Action, merge_interval: Duration) {
        self.clear_redo();
        // Merging at the save point would change saved content in place,
        // and the top of the stack lies outside a group not yet opened
        let at_save_point = self.save_point == Some(self.position());
        let top_in_scope = self.group_depth == 0 || self.group_opened;
        if !at_save_point && top_in_scope {
            if let Some(top) = self.undo.back_mut() {
                if top.try_merge_delete(&action, merge_interval) {
                    return;
                }
            }
        }
        if self.group_depth > 0 && !self.group_opened {
            self.undo.push_back(Action::group_marker());
            self.group_opened = true;
        }
        self.undo.push_back(action);
        self.trim();
    }

    /// Drop the oldest history beyond `max_undo`, a whole group at a time
    fn trim(&mut self) {
        if self.group_depth > 0 {
            return;
        }
        while self.saved.len() + self.undo.len() > self.max_undo {
            let Some(oldest) = self.pop_oldest() else {
                break;
            };
            if oldest.kind == ActionKind::Group {
                while let Some(next) = self.pop_oldest() {
                    if next.kind == ActionKind::Group {
                        break;
                    }
                }
            }
        }
        if self.save_point.is_some_and(|p| p < self.base) {
            self.save_point = None;
        }
    }

    fn pop_oldest(&mut self) -> Option<Action> {
        let action = self.saved.pop_front().or_else(|| self.undo.pop_front())?;
        self.base += 1;
        Some(action)
    }

    fn pop_undo(&mut self) -> Option<Action> {
        self.undo.pop_back().or_else(|| self.saved.pop_back())
    }

    fn take_pending(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending)
    }

    /// Move the undo stack into the saved partition and record a save point
    pub fn save(&mut self) {
        self.saved.extend(self.undo.drain(..));
        self.save_point = Some(self.position());
    }
}

/// Fold contiguous keystrokes into word-sized InsertString actions. A word is
/// a run of non-space chars plus the spaces after it; line breaks stay single.
fn merge_keystrokes(pending: Vec<Action>) -> Vec<Action> {
    struct Run {
        first: Action,
        text: String,
        caret_after: TextPoint,
        timestamp: std::time::Instant,
    }

    fn finish(run: Run, out: &mut Vec<Action>) {
        if run.text.chars().count() == 1 {
            out.push(run.first);
            return;
        }
        out.push(Action::executed(
            ActionKind::InsertString { text: run.text },
            run.first.point,
            run.first.caret_point,
            run.caret_after,
            run.timestamp,
        ));
    }

    let mut out = Vec::new();
    let mut run: Option<Run> = None;
    for action in pending {
        let ActionKind::InsertChar { c } = action.kind else {
            continue;
        };
        if c == '\n' {
            if let Some(run) = run.take() {
                finish(run, &mut out);
            }
            out.push(action);
            continue;
        }
        match &mut run {
            Some(current) if !starts_new_word(&current.text, c) => {
                current.text.push(c);
                current.caret_after = action.caret_after();
                current.timestamp = action.timestamp;
            }
            _ => {
                if let Some(done) = run.take() {
                    finish(done, &mut out);
                }
                run = Some(Run {
                    text: c.to_string(),
                    caret_after: action.caret_after(),
                    timestamp: action.timestamp,
                    first: action,
                });
            }
        }
    }
    if let Some(run) = run {
        finish(run, &mut out);
    }
    out
}

fn starts_new_word(word: &str, c: char) -> bool {
    let trailing_space = word.ends_with([' ', '\t']);
    trailing_space && c != ' ' && c != '\t'
}

impl TextBuffer {
    fn merge_interval(&self) -> Duration {
        self.options().undo_merge_interval
    }

    fn emit_modified_if_changed(&mut self, was_modified: bool) {
        if self.log.is_modified() != was_modified {
            self.notify_buffer(BufferChange::Modified);
        }
    }

    fn flush_pending(&mut self) {
        let interval = self.merge_interval();
        for action in merge_keystrokes(self.log.take_pending()) {
            self.log.push(action, interval);
        }
    }

    /// Execute `action` and record it. Returns the caret after execution, or
    /// `None` when the action changed nothing and was dropped.
    pub fn add_action(&mut self, mut action: Action) -> Option<TextPoint> {
        let was_modified = self.log.is_modified();

        if let ActionKind::InsertChar { .. } = action.kind {
            let contiguous = self
                .log
                .pending
                .last()
                .map_or(true, |last| last.caret_after() == action.point);
            if !contiguous {
                self.flush_pending();
            }
            action.exec(self);
            self.log.clear_redo();
            let caret = action.caret_after();
            self.log.pending.push(action);
            self.emit_modified_if_changed(was_modified);
            return Some(caret);
        }

        self.flush_pending();
        action.exec(self);
        if !action.is_effective() {
            tracing::trace!("Dropped ineffective {:?}", action.kind);
            self.emit_modified_if_changed(was_modified);
            return None;
        }
        let caret = action.caret_after();
        let interval = self.merge_interval();
        self.log.push(action, interval);
        self.emit_modified_if_changed(was_modified);
        Some(caret)
    }

    /// Undo the last action, or the last group as a whole. Returns the caret
    /// to restore.
    pub fn undo(&mut self) -> Option<TextPoint> {
        let was_modified = self.log.is_modified();
        self.flush_pending();

        let mut action = self.log.pop_undo()?;
        let mut caret = action.undo(self);
        if action.is_grouped() {
            self.log.redo.push(action);
            while let Some(mut inner) = self.log.pop_undo() {
                let done = inner.is_grouped();
                if !done {
                    caret = inner.undo(self);
                }
                self.log.redo.push(inner);
                if done {
                    break;
                }
            }
        } else {
            self.log.redo.push(action);
        }

        tracing::debug!("Undo, {} left", self.log.undo_count());
        self.emit_modified_if_changed(was_modified);
        Some(caret)
    }

    /// Redo the last undone action or group. Returns the caret after it.
    pub fn redo(&mut self) -> Option<TextPoint> {
        if !self.log.can_redo() {
            return None;
        }
        let was_modified = self.log.is_modified();

        let mut action = self.log.redo.pop()?;
        let mut caret = action.caret_after();
        if action.is_grouped() {
            self.log.undo.push_back(action);
            while let Some(mut inner) = self.log.redo.pop() {
                let done = inner.is_grouped();
                if !done {
                    inner.exec(self);
                    caret = inner.caret_after();
                }
                self.log.undo.push_back(inner);
                if done {
                    break;
                }
            }
        } else {
            action.exec(self);
            caret = action.caret_after();
            self.log.undo.push_back(action);
        }

        tracing::debug!("Redo, {} left", self.log.redo_count());
        self.emit_modified_if_changed(was_modified);
        Some(caret)
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Start a transaction: everything added until the matching
    /// [`TextBuffer::end_group`] undoes as one step. Groups nest.
    pub fn begin_group(&mut self) {
        if self.log.group_depth == 0 {
            self.flush_pending();
            self.log.group_opened = false;
        }
        self.log.group_depth += 1;
    }

    pub fn end_group(&mut self) {
        debug_assert!(self.log.group_depth > 0, "end_group without begin_group");
        if self.log.group_depth == 0 {
            return;
        }
        if self.log.group_depth == 1 {
            self.flush_pending();
        }
        self.log.group_depth -= 1;
        if self.log.group_depth == 0 && self.log.group_opened {
            self.log.undo.push_back(Action::group_marker());
            self.log.group_opened = false;
            self.log.trim();
        }
    }

    /// Replace `range` with `text` as one undo step. Returns the caret after
    /// the inserted text.
    pub fn replace(&mut self, range: TextRange, text: &str, caret: TextPoint) -> Option<TextPoint> {
        self.begin_group();
        let mut after = self.add_action(Action::delete_range(range, caret));
        if !text.is_empty() {
            after = self.add_action(Action::insert_text(range.begin(), text)).or(after);
        }
        self.end_group();
        after
    }

    /// Keep the undo history across a save and mark the buffer unmodified
    pub fn save_undo_actions(&mut self) {
        let was_modified = self.log.is_modified();
        self.flush_pending();
        self.log.save();
        self.emit_modified_if_changed(was_modified);
    }

    pub fn is_modified(&self) -> bool {
        self.log.is_modified()
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }
}
