//! Lexical analysis
//!
//! Two matchers cooperate here: quotes (delimited regions that may span
//! lines) and the lite [`Pattern`] engine used for single-line rules. The
//! [`Lexer`] holds the rules of one file type and scans a line at a time,
//! threading a [`ScanState`] from each line to the next.

pub mod defs;
pub mod lexer;
pub mod pattern;
pub mod quote;
pub mod scan;
pub mod tag;

use std::sync::Arc;

pub use lexer::Lexer;
pub use pattern::{Pattern, PatternError, PatternMatch};
pub use quote::{Quote, QuoteFlags, RegexQuote};
pub use scan::{LexElem, LineLex, QuoteElem, QuotePart, ScanState};
pub use tag::{Lex, LexMajor, LexMinor};

use crate::config::LexConfig;
use crate::file_type::FileType;

/// Built-in rules for `file_type` plus the user's YAML overrides, if any
pub fn lexer_for(file_type: FileType) -> Arc<Lexer> {
    let mut lexer = defs::builtin(file_type);
    if let Some(overrides) = LexConfig::load(file_type) {
        overrides.apply(&mut lexer);
    }
    Arc::new(lexer)
}
