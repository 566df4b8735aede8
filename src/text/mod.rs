//! Line-oriented text storage
//!
//! A [`TextBuffer`] owns an ordered list of [`Line`]s, each carrying its
//! characters and the lexical analysis of the last scan. Edits go through
//! the buffer's primitives, which re-lex what they touch and notify
//! attached [`BufferListener`]s.

pub mod bracket;
pub mod buffer;
pub mod file_io;
pub mod line;
pub mod listener;
pub mod point;
pub mod search;
pub mod seek;

pub use bracket::BRACKET_PAIRS;
pub use buffer::{TextBuffer, TextOptions};
pub use file_io::{Decoded, FileError, FileFormat};
pub use line::{Line, LineId};
pub use listener::{
    BufferChange, BufferListener, ChangeRecorder, LineChange, ListenerId, Notification,
};
pub use point::{Coord, LineRange, PointDelta, TextPoint, TextRange};
pub use search::{FindError, FindOptions, Finder};
pub use seek::{SeekType, TextUnit};
