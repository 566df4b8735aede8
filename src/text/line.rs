//! A single line of text plus its lexical annotations

use std::fmt;

use crate::lex::{Lex, LexElem, LineLex, QuoteElem, ScanState};
use crate::util::text::is_space;

/// Stable line identity, unique within a buffer and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One line of a buffer. Never contains a line break.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    data: Vec<char>,
    /// State this line was last scanned with
    state_in: ScanState,
    lex: LineLex,
}

impl Line {
    pub fn new(id: LineId, data: Vec<char>) -> Self {
        debug_assert!(!data.contains(&'\n'), "line data contains a line break");
        Self {
            id,
            data,
            state_in: ScanState::NoQuote,
            lex: LineLex::default(),
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn data(&self) -> &[char] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn text(&self) -> String {
        self.data.iter().collect()
    }

    pub fn char_at(&self, x: usize) -> Option<char> {
        self.data.get(x).copied()
    }

    // === Mutation (buffer only) ===

    pub(crate) fn insert_char(&mut self, x: usize, c: char) {
        self.data.insert(x, c);
    }

    pub(crate) fn remove_char(&mut self, x: usize) -> char {
        self.data.remove(x)
    }

    pub(crate) fn insert_chars(&mut self, x: usize, chars: &[char]) {
        self.data.splice(x..x, chars.iter().copied());
    }

    pub(crate) fn remove_chars(&mut self, x: usize, count: usize) -> Vec<char> {
        self.data.drain(x..x + count).collect()
    }

    pub(crate) fn split_off(&mut self, x: usize) -> Vec<char> {
        self.data.split_off(x)
    }

    pub(crate) fn append(&mut self, chars: &[char]) {
        self.data.extend_from_slice(chars);
    }

    pub(crate) fn set_lex(&mut self, state_in: ScanState, lex: LineLex) {
        self.state_in = state_in;
        self.lex = lex;
    }

    // === Lexical annotations ===

    pub fn lex_elems(&self) -> &[LexElem] {
        &self.lex.elems
    }

    pub fn quote_elems(&self) -> &[QuoteElem] {
        &self.lex.quote_elems
    }

    pub fn state_in(&self) -> &ScanState {
        &self.state_in
    }

    /// Scan state the next line starts with
    pub fn state_out(&self) -> &ScanState {
        &self.lex.state_out
    }

    pub fn lex_at(&self, x: usize) -> Lex {
        self.lex.lex_at(x)
    }

    pub fn is_comment_or_string(&self, x: usize) -> bool {
        let lex = self.lex_at(x);
        lex.is_comment() || lex.is_string()
    }

    // === Queries ===

    /// Number of leading space/tab chars
    pub fn indent_len(&self) -> usize {
        self.data.iter().take_while(|c| is_space(**c)).count()
    }

    /// True if the line is empty or only spaces/tabs
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|c| is_space(*c))
    }

    pub fn first_non_space(&self) -> Option<usize> {
        self.data.iter().position(|c| !is_space(*c))
    }

    pub fn last_non_space(&self) -> Option<usize> {
        self.data.iter().rposition(|c| !is_space(*c))
    }

    /// Last non-space char that is not part of a comment
    pub fn last_code_char(&self) -> Option<(usize, char)> {
        (0..self.data.len())
            .rev()
            .find(|x| !is_space(self.data[*x]) && !self.lex_at(*x).is_comment())
            .map(|x| (x, self.data[x]))
    }

    /// True if every non-space char is inside a comment
    pub fn is_comment_only(&self) -> bool {
        !self.is_blank()
            && (0..self.data.len())
                .filter(|x| !is_space(self.data[*x]))
                .all(|x| self.lex_at(x).is_comment())
    }

    /// Whether the text after the indent starts with `s`
    pub fn starts_with(&self, s: &str) -> bool {
        let start = self.first_non_space().unwrap_or(self.data.len());
        chars_start_with(&self.data[start..], s)
    }

    /// Whether the code before trailing spaces and comments ends with `s`
    pub fn ends_with(&self, s: &str) -> bool {
        match self.last_code_char() {
            Some((x, _)) => chars_end_with(&self.data[..=x], s),
            None => false,
        }
    }

    /// Like [`Line::starts_with`], and `word` must be followed by a non-word
    /// char or the end of the line
    pub fn starts_with_word(&self, word: &str) -> bool {
        if !self.starts_with(word) {
            return false;
        }
        let start = self.first_non_space().unwrap_or(0);
        let after = start + word.chars().count();
        self.data
            .get(after)
            .map_or(true, |c| !(c.is_alphanumeric() || *c == '_'))
    }
}

fn chars_start_with(chars: &[char], s: &str) -> bool {
    let mut it = chars.iter();
    s.chars().all(|c| it.next() == Some(&c))
}

fn chars_end_with(chars: &[char], s: &str) -> bool {
    let mut it = chars.iter().rev();
    s.chars().rev().all(|c| it.next() == Some(&c))
}
