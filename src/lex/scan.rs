//! Output of scanning one line, and the state carried between lines

use std::sync::Arc;

use super::quote::Quote;
use super::tag::Lex;

/// Quote state carried from one line to the next
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    NoQuote,
    /// Inside an unterminated quote
    InQuote(Arc<Quote>),
}

impl ScanState {
    pub fn quote(&self) -> Option<&Arc<Quote>> {
        match self {
            ScanState::NoQuote => None,
            ScanState::InQuote(quote) => Some(quote),
        }
    }

    pub fn is_in_quote(&self) -> bool {
        matches!(self, ScanState::InQuote(_))
    }
}

/// A tagged span of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexElem {
    pub offset: usize,
    pub len: usize,
    pub lex: Lex,
}

impl LexElem {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.end()
    }
}

/// Which part of a quoted region intersects a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotePart {
    /// The quote starts here and runs to the end of the line
    Start,
    /// The whole line is inside the quote
    Body,
    /// The quote ends here
    End,
    /// The quote starts and ends on this line
    Whole,
}

/// A quoted region intersecting a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteElem {
    pub quote: Arc<Quote>,
    pub offset: usize,
    pub len: usize,
    pub part: QuotePart,
}

/// Scan result for one line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineLex {
    pub elems: Vec<LexElem>,
    pub quote_elems: Vec<QuoteElem>,
    /// State the next line starts with
    pub state_out: ScanState,
}

impl LineLex {
    /// Append a span, merging it with the previous one when they touch and
    /// carry the same tag
    pub fn push_lex(&mut self, offset: usize, len: usize, lex: Lex) {
        if len == 0 {
            return;
        }
        if let Some(last) = self.elems.last_mut() {
            debug_assert!(last.end() <= offset, "lex elements out of order");
            if last.end() == offset && last.lex == lex {
                last.len += len;
                return;
            }
        }
        self.elems.push(LexElem { offset, len, lex });
    }

    pub fn push_quote(&mut self, quote: Arc<Quote>, offset: usize, len: usize, part: QuotePart) {
        self.quote_elems.push(QuoteElem {
            quote,
            offset,
            len,
            part,
        });
    }

    /// Tag at `offset`, [`Lex::NONE`] when untagged
    pub fn lex_at(&self, offset: usize) -> Lex {
        self.elems
            .iter()
            .take_while(|elem| elem.offset <= offset)
            .find(|elem| elem.contains(offset))
            .map(|elem| elem.lex)
            .unwrap_or(Lex::NONE)
    }
}
