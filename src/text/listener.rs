//! Change notifications emitted by a buffer

use super::point::LineRange;

/// Line-level change kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineChange {
    Added,
    Updated,
    Deleted,
}

/// Buffer-level change kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferChange {
    Encoding,
    FileFormat,
    FileName,
    Modified,
}

/// Subscriber to buffer changes.
///
/// Line notifications arrive after the buffer has re-lexed the affected
/// lines. Listeners only observe; they get no access to the buffer.
pub trait BufferListener {
    fn on_line_change(&mut self, change: LineChange, range: LineRange);

    fn on_buffer_change(&mut self, _change: BufferChange) {}
}

/// Handle returned by `TextBuffer::attach_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Notification recorded by [`ChangeRecorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Line(LineChange, LineRange),
    Buffer(BufferChange),
}

/// Listener that appends every notification to a shared log.
/// Useful for tests and for callers batching UI refreshes.
#[derive(Debug, Clone, Default)]
pub struct ChangeRecorder {
    log: std::rc::Rc<std::cell::RefCell<Vec<Notification>>>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain what was recorded so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl BufferListener for ChangeRecorder {
    fn on_line_change(&mut self, change: LineChange, range: LineRange) {
        self.log.borrow_mut().push(Notification::Line(change, range));
    }

    fn on_buffer_change(&mut self, change: BufferChange) {
        self.log.borrow_mut().push(Notification::Buffer(change));
    }
}
