//! linewise - a line-oriented text document engine
//!
//! The crate provides a text buffer with incremental lexing, grouped and
//! merged undo/redo, language-aware auto-indent and a cancellable search
//! across many files. There is no rendering here; front ends attach a
//! listener to a buffer and redraw what it reports.

pub mod action;
pub mod config;
pub mod config_paths;
pub mod file_type;
pub mod indent;
pub mod lex;
pub mod search;
pub mod text;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use action::{Action, ActionKind, ActionLog};
pub use config::{EditorConfig, LexConfig};
pub use file_type::FileType;
pub use lex::{Lex, Lexer};
pub use search::{BatchSearch, SearchMessage};
pub use text::{TextBuffer, TextOptions, TextPoint, TextRange};
