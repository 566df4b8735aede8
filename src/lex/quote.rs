//! Quotes: delimited lexical regions such as comments and strings
//!
//! A [`Quote`] has literal start and end tokens. A [`RegexQuote`] starts with
//! a lite pattern and builds its end token from the captured start text, e.g.
//! Lua long brackets where `[==[` must be closed by `]==]`.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;

use super::pattern::{Pattern, PatternError, PatternMatch};
use super::tag::Lex;

/// Escape character honored by quotes with [`QuoteFlags::ESCAPE`] or
/// [`QuoteFlags::ESCAPE_EOL`]
pub const ESCAPE_CHAR: char = '\\';

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QuoteFlags: u8 {
        /// The quote may span several lines
        const MULTI_LINE = 0b0000_0001;
        /// A trailing escape char continues the quote on the next line
        const ESCAPE_EOL = 0b0000_0010;
        /// An escape char hides the following end token
        const ESCAPE     = 0b0000_0100;
    }
}

/// Immutable quote descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quote {
    lex: Lex,
    start: Vec<char>,
    end: Vec<char>,
    flags: QuoteFlags,
}

impl Quote {
    pub fn new(lex: Lex, start: &str, end: &str, flags: QuoteFlags) -> Self {
        assert!(!start.is_empty(), "quote start token must not be empty");
        Self {
            lex,
            start: start.chars().collect(),
            end: end.chars().collect(),
            flags,
        }
    }

    pub fn lex(&self) -> Lex {
        self.lex
    }

    pub fn start(&self) -> String {
        self.start.iter().collect()
    }

    pub fn end(&self) -> String {
        self.end.iter().collect()
    }

    pub fn flags(&self) -> QuoteFlags {
        self.flags
    }

    pub fn has_end(&self) -> bool {
        !self.end.is_empty()
    }

    pub fn is_multi_line(&self) -> bool {
        self.flags.contains(QuoteFlags::MULTI_LINE)
    }

    /// Length of the start token if it matches at `offset`
    pub fn match_start(&self, text: &[char], offset: usize) -> Option<usize> {
        text[offset..]
            .starts_with(&self.start)
            .then_some(self.start.len())
    }

    /// Search for the end token at or after `from`.
    /// Returns the offset just past the end token.
    pub fn find_end(&self, text: &[char], from: usize) -> Option<usize> {
        if self.end.is_empty() {
            return None;
        }

        let escapable = self.flags.contains(QuoteFlags::ESCAPE);
        let mut i = from;
        while i + self.end.len() <= text.len() {
            if escapable && text[i] == ESCAPE_CHAR {
                i += 2;
                continue;
            }
            if text[i..].starts_with(&self.end) {
                return Some(i + self.end.len());
            }
            i += 1;
        }
        None
    }

    /// Whether the quote, still open at the end of `text`, carries on to the
    /// next line
    pub fn continues_after(&self, text: &[char]) -> bool {
        if self.has_end() && self.is_multi_line() {
            return true;
        }
        self.flags.contains(QuoteFlags::ESCAPE_EOL) && ends_with_escape(text)
    }
}

/// True when the line ends with an odd run of escape chars
fn ends_with_escape(text: &[char]) -> bool {
    let run = text.iter().rev().take_while(|c| **c == ESCAPE_CHAR).count();
    run % 2 == 1
}

/// A quote whose start token is a lite pattern and whose end token is
/// derived from the captured start text
#[derive(Debug)]
pub struct RegexQuote {
    lex: Lex,
    start: Pattern,
    end_template: String,
    flags: QuoteFlags,
    concrete: Mutex<Vec<Arc<Quote>>>,
}

impl RegexQuote {
    /// `end_template` may refer to groups of `start` with `\1`..`\9`
    pub fn new(
        lex: Lex,
        start: &str,
        end_template: &str,
        flags: QuoteFlags,
        ignore_case: bool,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            lex,
            start: Pattern::compile_with(start, ignore_case)?,
            end_template: end_template.to_string(),
            flags,
            concrete: Mutex::new(Vec::new()),
        })
    }

    pub fn lex(&self) -> Lex {
        self.lex
    }

    pub fn start_pattern(&self) -> &Pattern {
        &self.start
    }

    /// Match the start pattern at `offset`; on success returns the start
    /// length and the concrete quote to continue with
    pub fn match_start(&self, text: &[char], offset: usize) -> Option<(usize, Arc<Quote>)> {
        let m = self.start.match_at(text, offset)?;
        if m.is_empty() {
            return None;
        }
        let start: String = text[m.start()..m.end()].iter().collect();
        let end = self.expand_end(text, &m);
        Some((m.len(), self.concrete_quote(&start, &end)))
    }

    /// Number of concrete quotes synthesized so far
    pub fn concrete_count(&self) -> usize {
        self.concrete
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn expand_end(&self, text: &[char], m: &PatternMatch) -> String {
        let mut end = String::new();
        let mut chars = self.end_template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\\' {
                end.push(c);
                continue;
            }
            match chars.next() {
                Some(d) if d.is_ascii_digit() => {
                    let group = d.to_digit(10).unwrap_or(0) as usize;
                    if let Some(span) = m.group(group) {
                        end.extend(&text[span]);
                    }
                }
                Some(other) => end.push(other),
                None => end.push('\\'),
            }
        }
        end
    }

    fn concrete_quote(&self, start: &str, end: &str) -> Arc<Quote> {
        let quote = Quote::new(self.lex, start, end, self.flags);
        let mut concrete = self
            .concrete
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = concrete.iter().find(|q| ***q == quote) {
            return Arc::clone(existing);
        }
        let quote = Arc::new(quote);
        concrete.push(Arc::clone(&quote));
        quote
    }
}

/// A registered quote rule
#[derive(Debug)]
pub enum QuoteRule {
    Literal(Arc<Quote>),
    Regex(RegexQuote),
}

impl QuoteRule {
    pub fn is_regex(&self) -> bool {
        matches!(self, QuoteRule::Regex(_))
    }

    pub fn match_start(&self, text: &[char], offset: usize) -> Option<(usize, Arc<Quote>)> {
        match self {
            QuoteRule::Literal(quote) => quote
                .match_start(text, offset)
                .map(|len| (len, Arc::clone(quote))),
            QuoteRule::Regex(quote) => quote.match_start(text, offset),
        }
    }
}
