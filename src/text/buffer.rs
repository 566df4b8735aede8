//! The text buffer: ordered lines, edit primitives and re-lexing
//!
//! All mutation funnels through a handful of private helpers so that the
//! length histogram and line ids stay consistent. Every primitive emits a
//! line notification unless notifications are frozen; the buffer re-lexes
//! the affected lines before forwarding the notification to listeners.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};

use crate::action::ActionLog;
use crate::config::EditorConfig;
use crate::file_type::FileType;
use crate::indent::{self, IndentFn};
use crate::lex::{defs, Lexer, ScanState};
use crate::util::text::indent_width;

use super::file_io::FileFormat;
use super::line::{Line, LineId};
use super::listener::{BufferChange, BufferListener, LineChange, ListenerId};
use super::point::{Coord, LineRange, PointDelta, TextPoint, TextRange};

/// Per-buffer editing options
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub tab_stop: usize,
    pub shift_width: usize,
    pub expand_tab: bool,
    /// Consecutive deletes closer than this merge into one undo step
    pub undo_merge_interval: Duration,
    /// Undo stack bound; the oldest actions are dropped first
    pub max_undo: usize,
    /// Line ending for buffers whose text has none to detect
    pub file_format: FileFormat,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            shift_width: 4,
            expand_tab: true,
            undo_merge_interval: Duration::from_millis(1000),
            max_undo: 1000,
            file_format: FileFormat::default(),
        }
    }
}

impl From<&EditorConfig> for TextOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            tab_stop: config.tab_stop.max(1),
            shift_width: config.shift_width.max(1),
            expand_tab: config.expand_tab,
            undo_merge_interval: Duration::from_millis(config.undo_merge_interval_ms),
            max_undo: config.max_undo,
            file_format: config.file_format(),
        }
    }
}

pub struct TextBuffer {
    lines: Vec<Line>,
    next_line_id: u64,

    /// `length_counts[n]` is the number of lines with `n` chars
    length_counts: Vec<usize>,
    longest: usize,

    file_type: FileType,
    lexer: Arc<Lexer>,
    indent_fn: IndentFn,
    options: TextOptions,

    path: Option<PathBuf>,
    encoding: &'static Encoding,
    bom: bool,
    file_format: FileFormat,

    listeners: Vec<(ListenerId, Box<dyn BufferListener>)>,
    next_listener_id: u64,
    freeze: usize,

    pub(crate) log: ActionLog,
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.lines.len())
            .field("file_type", &self.file_type)
            .field("path", &self.path)
            .field("encoding", &self.encoding.name())
            .field("file_format", &self.file_format)
            .finish_non_exhaustive()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// An empty plain-text buffer with one empty line
    pub fn new() -> Self {
        Self::with_options(FileType::PlainText, TextOptions::default())
    }

    pub fn with_options(file_type: FileType, options: TextOptions) -> Self {
        let log = ActionLog::new(options.max_undo);
        let file_format = options.file_format;
        let mut buffer = Self {
            lines: Vec::new(),
            next_line_id: 1,
            length_counts: Vec::new(),
            longest: 0,
            file_type,
            lexer: Arc::new(defs::builtin(file_type)),
            indent_fn: indent::default_for(file_type),
            options,
            path: None,
            encoding: UTF_8,
            bom: false,
            file_format,
            listeners: Vec::new(),
            next_listener_id: 1,
            freeze: 0,
            log,
        };
        buffer.push_line(Vec::new());
        buffer
    }

    /// Build a buffer from text whose lines are separated by `\n`
    pub fn from_text(text: &str, file_type: FileType) -> Self {
        let mut buffer = Self::with_options(file_type, TextOptions::default());
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content without notifications or undo history
    pub(crate) fn set_text(&mut self, text: &str) {
        self.lines.clear();
        self.length_counts.clear();
        self.longest = 0;
        for line in text.split('\n') {
            self.push_line(line.chars().collect());
        }
        self.scan_lex_all();
    }

    fn push_line(&mut self, data: Vec<char>) {
        let index = self.lines.len();
        self.insert_line(index, data);
    }

    // === Structure helpers ===

    fn alloc_id(&mut self) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        id
    }

    fn count_len(&mut self, len: usize) {
        if len >= self.length_counts.len() {
            self.length_counts.resize(len + 1, 0);
        }
        self.length_counts[len] += 1;
        self.longest = self.longest.max(len);
    }

    fn uncount_len(&mut self, len: usize) {
        self.length_counts[len] -= 1;
        if len == self.longest && self.length_counts[len] == 0 {
            self.longest = (0..len)
                .rev()
                .find(|n| self.length_counts[*n] > 0)
                .unwrap_or(0);
            self.length_counts.truncate(self.longest + 1);
        }
    }

    /// Insert a line at 0-based `index`
    fn insert_line(&mut self, index: usize, data: Vec<char>) {
        let id = self.alloc_id();
        self.count_len(data.len());
        self.lines.insert(index, Line::new(id, data));
    }

    /// Remove the line at 0-based `index`
    fn remove_line(&mut self, index: usize) -> Line {
        let line = self.lines.remove(index);
        self.uncount_len(line.len());
        line
    }

    /// Mutate the content of line `ln`, keeping the histogram in sync
    fn edit_line<R>(&mut self, ln: Coord, f: impl FnOnce(&mut Line) -> R) -> R {
        let index = self.index(ln);
        let old_len = self.lines[index].len();
        let result = f(&mut self.lines[index]);
        let new_len = self.lines[index].len();
        if new_len != old_len {
            self.count_len(new_len);
            self.uncount_len(old_len);
        }
        result
    }

    fn index(&self, ln: Coord) -> usize {
        assert!(
            ln >= 1 && ln <= self.lines.len(),
            "line {ln} out of range 1..={}",
            self.lines.len()
        );
        ln - 1
    }

    fn check_point(&self, point: TextPoint) {
        let len = self.line_length(point.y);
        assert!(point.x <= len, "column {} out of range on line {} (length {len})", point.x, point.y);
    }

    // === Read queries ===

    pub fn line_count(&self) -> Coord {
        self.lines.len()
    }

    pub fn line(&self, ln: Coord) -> &Line {
        &self.lines[self.index(ln)]
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn line_data(&self, ln: Coord) -> &[char] {
        self.line(ln).data()
    }

    pub fn line_length(&self, ln: Coord) -> Coord {
        self.line(ln).len()
    }

    pub fn line_text(&self, ln: Coord) -> String {
        self.line(ln).text()
    }

    pub fn char_at(&self, point: TextPoint) -> Option<char> {
        self.line(point.y).char_at(point.x)
    }

    /// Whole content with lines joined by `\n`
    pub fn text(&self) -> String {
        let mut text = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.extend(line.data());
        }
        text
    }

    /// Text inside `range`, lines joined by `\n`
    pub fn get_text(&self, range: TextRange) -> String {
        let begin = self.clamp_point(range.begin());
        let end = self.clamp_point(range.end());
        if begin.y == end.y {
            return self.line_data(begin.y)[begin.x..end.x].iter().collect();
        }
        let mut text: String = self.line_data(begin.y)[begin.x..].iter().collect();
        for ln in begin.y + 1..end.y {
            text.push('\n');
            text.extend(self.line_data(ln));
        }
        text.push('\n');
        text.extend(&self.line_data(end.y)[..end.x]);
        text
    }

    /// Point just past the last char of the buffer
    pub fn end_point(&self) -> TextPoint {
        let last = self.line_count();
        TextPoint::new(self.line_length(last), last)
    }

    /// Resolve the `END` column sentinel and clip columns past the line end
    pub fn clamp_point(&self, point: TextPoint) -> TextPoint {
        let len = self.line_length(point.y);
        TextPoint::new(point.x.min(len), point.y)
    }

    pub fn line_id(&self, ln: Coord) -> LineId {
        self.line(ln).id()
    }

    /// Current line number of the line with `id`, searching outward from
    /// `hint` (a previous line number of that line)
    pub fn line_nr_from_id(&self, id: LineId, hint: Coord) -> Option<Coord> {
        let count = self.lines.len();
        let hint = hint.clamp(1, count) - 1;
        let max_distance = hint.max(count - 1 - hint);
        (0..=max_distance).find_map(|d| {
            let below = hint + d;
            if below < count && self.lines[below].id() == id {
                return Some(below + 1);
            }
            let above = hint.checked_sub(d)?;
            (self.lines[above].id() == id).then_some(above + 1)
        })
    }

    /// Length of the longest line, in chars
    pub fn longest_line_length(&self) -> Coord {
        self.longest
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    // === Metadata ===

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Switch file type: lexer and indent function follow
    pub fn set_file_type(&mut self, file_type: FileType, lexer: Arc<Lexer>) {
        self.file_type = file_type;
        self.indent_fn = indent::default_for(file_type);
        self.set_lexer(lexer);
    }

    pub fn lexer(&self) -> &Arc<Lexer> {
        &self.lexer
    }

    pub fn set_lexer(&mut self, lexer: Arc<Lexer>) {
        self.lexer = lexer;
        self.scan_lex_all();
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TextOptions) {
        self.log.set_max_undo(options.max_undo);
        self.options = options;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.path.as_ref() != Some(&path) {
            self.path = Some(path);
            self.notify_buffer(BufferChange::FileName);
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding, bom: bool) {
        if self.encoding != encoding || self.bom != bom {
            self.encoding = encoding;
            self.bom = bom;
            self.notify_buffer(BufferChange::Encoding);
        }
    }

    pub fn file_format(&self) -> FileFormat {
        self.file_format
    }

    /// Set the line ending used on save. Not undoable; see
    /// `ActionKind::SetFileFormat` for the undoable form.
    pub fn set_file_format(&mut self, format: FileFormat) {
        if self.file_format != format {
            self.file_format = format;
            self.notify_buffer(BufferChange::FileFormat);
        }
    }

    // === Indent queries ===

    /// Expected indent of line `ln` in columns, from the indent slot
    pub fn expected_indent(&self, ln: Coord) -> Coord {
        (self.indent_fn)(self, ln)
    }

    pub fn indent_fn(&self) -> IndentFn {
        self.indent_fn
    }

    /// Replace the indent function for this buffer
    pub fn set_indent_fn(&mut self, indent_fn: IndentFn) {
        self.indent_fn = indent_fn;
    }

    /// Indent of line `ln` in columns, tabs expanded
    pub fn get_indent(&self, ln: Coord) -> Coord {
        indent_width(self.line_data(ln), self.options.tab_stop)
    }

    /// Nearest line before `ln` that is not blank, optionally also skipping
    /// lines holding only comments
    pub fn prev_non_empty_line(&self, ln: Coord, skip_comments: bool) -> Option<Coord> {
        self.prev_line_matching(ln, |line| {
            !line.is_blank() && !(skip_comments && line.is_comment_only())
        })
    }

    /// Nearest line before `ln` satisfying `predicate`
    pub fn prev_line_matching(&self, ln: Coord, predicate: impl Fn(&Line) -> bool) -> Option<Coord> {
        (1..ln.min(self.lines.len() + 1))
            .rev()
            .find(|prev| predicate(&self.lines[prev - 1]))
    }

    pub fn is_comment_or_string(&self, point: TextPoint) -> bool {
        self.line(point.y).is_comment_or_string(point.x)
    }

    /// Line text after its indent starts with `s`
    pub fn line_starts_with(&self, ln: Coord, s: &str) -> bool {
        self.line(ln).starts_with(s)
    }

    /// Line code, ignoring trailing spaces and comments, ends with `s`
    pub fn line_ends_with(&self, ln: Coord, s: &str) -> bool {
        self.line(ln).ends_with(s)
    }

    // === Edit primitives ===

    /// Insert one char. A `'\n'` splits the line at `point.x`.
    pub fn insert_char(&mut self, point: TextPoint, c: char) -> PointDelta {
        self.check_point(point);
        if c == '\n' {
            let tail = self.edit_line(point.y, |line| line.split_off(point.x));
            self.insert_line(point.y, tail);
            self.notify_line(LineChange::Updated, LineRange::single(point.y));
            self.notify_line(LineChange::Added, LineRange::single(point.y + 1));
            PointDelta::new(-(point.x as isize), 1)
        } else {
            self.edit_line(point.y, |line| line.insert_char(point.x, c));
            self.notify_line(LineChange::Updated, LineRange::single(point.y));
            PointDelta::new(1, 0)
        }
    }

    /// Delete the char at `point`; at the end of a line the next line is
    /// joined and `'\n'` returned. `None` at the end of the buffer.
    pub fn delete_char(&mut self, point: TextPoint) -> Option<char> {
        self.check_point(point);
        if point.x < self.line_length(point.y) {
            let c = self.edit_line(point.y, |line| line.remove_char(point.x));
            self.notify_line(LineChange::Updated, LineRange::single(point.y));
            Some(c)
        } else if point.y < self.line_count() {
            let next = self.remove_line(point.y);
            self.edit_line(point.y, |line| line.append(next.data()));
            self.notify_line(LineChange::Updated, LineRange::single(point.y));
            self.notify_line(LineChange::Deleted, LineRange::single(point.y + 1));
            Some('\n')
        } else {
            None
        }
    }

    /// Insert a string without line breaks
    pub fn insert_string(&mut self, point: TextPoint, s: &str) {
        self.check_point(point);
        assert!(!s.contains('\n'), "insert_string given a line break");
        if s.is_empty() {
            return;
        }
        let chars: Vec<char> = s.chars().collect();
        self.edit_line(point.y, |line| line.insert_chars(point.x, &chars));
        self.notify_line(LineChange::Updated, LineRange::single(point.y));
    }

    /// Delete up to `count` chars on one line, returning them if
    /// `want_text`
    pub fn delete_string(&mut self, point: TextPoint, count: Coord, want_text: bool) -> Option<String> {
        self.check_point(point);
        let count = count.min(self.line_length(point.y) - point.x);
        if count == 0 {
            return want_text.then(String::new);
        }
        let removed = self.edit_line(point.y, |line| line.remove_chars(point.x, count));
        self.notify_line(LineChange::Updated, LineRange::single(point.y));
        want_text.then(|| removed.into_iter().collect())
    }

    /// Insert text that may contain line breaks. Returns the point just
    /// past the inserted text.
    pub fn insert_text(&mut self, point: TextPoint, text: &str) -> TextPoint {
        self.check_point(point);
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            self.insert_string(point, first);
            return TextPoint::new(point.x + first.chars().count(), point.y);
        }

        self.freeze_notify();
        let tail = self.edit_line(point.y, |line| line.split_off(point.x));
        let first_chars: Vec<char> = first.chars().collect();
        self.edit_line(point.y, |line| line.append(&first_chars));
        let mut y = point.y;
        let mut end_x = 0;
        for (i, segment) in rest.iter().enumerate() {
            let mut data: Vec<char> = segment.chars().collect();
            if i + 1 == rest.len() {
                end_x = data.len();
                data.extend_from_slice(&tail);
            }
            self.insert_line(y, data);
            y += 1;
        }
        self.thaw_notify();

        self.notify_line(LineChange::Updated, LineRange::single(point.y));
        self.notify_line(LineChange::Added, LineRange::new(point.y + 1, y));
        TextPoint::new(end_x, y)
    }

    /// Delete the text in `range`, returning it with `\n` line breaks
    pub fn delete_text(&mut self, range: TextRange) -> String {
        let begin = self.clamp_point(range.begin());
        let end = self.clamp_point(range.end());
        if begin.y == end.y {
            return self
                .delete_string(begin, end.x - begin.x, true)
                .unwrap_or_default();
        }

        let text = self.get_text(TextRange::new(begin, end));
        self.freeze_notify();
        let tail: Vec<char> = self.line_data(end.y)[end.x..].to_vec();
        for _ in begin.y..end.y {
            self.remove_line(begin.y);
        }
        self.edit_line(begin.y, |line| {
            line.split_off(begin.x);
            line.append(&tail);
        });
        self.thaw_notify();

        self.notify_line(LineChange::Updated, LineRange::single(begin.y));
        self.notify_line(LineChange::Deleted, LineRange::new(begin.y + 1, end.y));
        text
    }

    // === Notifications ===

    pub fn attach_listener(&mut self, listener: Box<dyn BufferListener>) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn detach_listener(&mut self, id: ListenerId) -> Option<Box<dyn BufferListener>> {
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(index).1)
    }

    /// Suppress line notifications (and re-lexing) until the matching
    /// [`TextBuffer::thaw_notify`]. Calls nest.
    pub fn freeze_notify(&mut self) {
        self.freeze += 1;
    }

    pub fn thaw_notify(&mut self) {
        debug_assert!(self.freeze > 0, "thaw_notify without freeze_notify");
        self.freeze = self.freeze.saturating_sub(1);
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze > 0
    }

    /// Re-lex the affected lines, then forward to listeners
    pub(crate) fn notify_line(&mut self, change: LineChange, range: LineRange) {
        if self.freeze > 0 {
            return;
        }
        match change {
            LineChange::Added => self.scan_lex_on_line_added(range),
            LineChange::Updated => self.scan_lex_on_line_updated(range),
            LineChange::Deleted => self.scan_lex_on_line_deleted(range),
        }
        tracing::trace!("{:?} {}", change, range);
        for (_, listener) in &mut self.listeners {
            listener.on_line_change(change, range);
        }
    }

    pub(crate) fn notify_buffer(&mut self, change: BufferChange) {
        tracing::debug!("Buffer change: {:?}", change);
        for (_, listener) in &mut self.listeners {
            listener.on_buffer_change(change);
        }
    }

    // === Incremental lexing ===

    pub fn scan_lex_on_line_updated(&mut self, range: LineRange) {
        self.scan_lex(range.first(), range.last());
    }

    pub fn scan_lex_on_line_added(&mut self, range: LineRange) {
        self.scan_lex(range.first(), range.last());
    }

    /// `range` names the removed lines in pre-deletion numbering; only
    /// lines after the gap whose input state changed are re-scanned.
    pub fn scan_lex_on_line_deleted(&mut self, range: LineRange) {
        self.scan_lex(range.first(), range.first() - 1);
    }

    fn scan_lex_all(&mut self) {
        self.scan_lex(1, self.lines.len());
    }

    /// Re-scan lines `first..=last` unconditionally, then keep going while
    /// the state handed to the next line differs from what it was scanned
    /// with.
    fn scan_lex(&mut self, first: Coord, last: Coord) {
        let count = self.lines.len();
        if first > count {
            return;
        }
        let mut state = if first > 1 {
            self.lines[first - 2].state_out().clone()
        } else {
            ScanState::NoQuote
        };
        let mut scanned = 0;
        for ln in first..=count {
            let line = &mut self.lines[ln - 1];
            if ln > last && *line.state_in() == state {
                break;
            }
            let lex = self.lexer.scan_line(line.data(), state.clone());
            let next = lex.state_out.clone();
            line.set_lex(state, lex);
            state = next;
            scanned += 1;
        }
        tracing::trace!("Re-lexed {} line(s) from line {}", scanned, first);
    }
}
