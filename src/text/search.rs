//! Plain and regex search over a buffer range
//!
//! Matches never span lines. Plain needles are escaped and run through the
//! same `regex` machinery so case folding behaves identically in both modes.

use regex::{Regex, RegexBuilder};

use crate::util::text::is_word_boundary;

use super::buffer::TextBuffer;
use super::point::{Coord, TextPoint, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindOptions {
    /// Treat the needle as a regular expression
    pub regex: bool,
    pub ignore_case: bool,
    /// Both match edges must sit on a delimiter, a space or a line edge
    pub whole_word: bool,
    /// `find_string` returns the last match instead of the first
    pub reverse: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum FindError {
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A compiled search
#[derive(Debug, Clone)]
pub struct Finder {
    regex: Option<Regex>,
    options: FindOptions,
}

impl Finder {
    pub fn new(needle: &str, options: FindOptions) -> Result<Self, FindError> {
        if needle.is_empty() || needle.contains('\n') {
            return Ok(Self { regex: None, options });
        }
        let source = if options.regex {
            needle.to_string()
        } else {
            regex::escape(needle)
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.ignore_case)
            .build()?;
        Ok(Self {
            regex: Some(regex),
            options,
        })
    }

    pub fn options(&self) -> FindOptions {
        self.options
    }

    /// Matches on line `ln` between columns `from..to`, in order
    fn line_matches(&self, buffer: &TextBuffer, ln: Coord, from: Coord, to: Coord) -> Vec<TextRange> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        let data = buffer.line_data(ln);
        let text: String = data[..to].iter().collect();
        let byte_of = |col: Coord| text.char_indices().nth(col).map_or(text.len(), |(b, _)| b);
        let delimiters = buffer.lexer().delimiters();
        let is_edge = |col: Coord| {
            col == 0 || col >= data.len() || is_word_boundary(data[col - 1], delimiters) || is_word_boundary(data[col], delimiters)
        };

        let mut matches = Vec::new();
        let mut pos = byte_of(from);
        while pos <= text.len() {
            let Some(m) = regex.find_at(&text, pos) else {
                break;
            };
            let begin = text[..m.start()].chars().count();
            let end = begin + m.as_str().chars().count();
            if m.start() == m.end() {
                // Empty matches are not useful as ranges
                pos = next_char_boundary(&text, m.end());
                continue;
            }
            let word_ok = !self.options.whole_word || (is_edge(begin) && is_edge(end));
            if word_ok {
                matches.push(TextRange::new(TextPoint::new(begin, ln), TextPoint::new(end, ln)));
                pos = m.end();
            } else {
                pos = next_char_boundary(&text, m.start());
            }
        }
        matches
    }
}

fn next_char_boundary(text: &str, byte: usize) -> usize {
    text[byte..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| byte + c.len_utf8())
}

impl TextBuffer {
    /// First match of `needle` in `range` (last with `options.reverse`)
    pub fn find_string(
        &self,
        needle: &str,
        range: TextRange,
        options: FindOptions,
    ) -> Result<Option<TextRange>, FindError> {
        let finder = Finder::new(needle, options)?;
        Ok(self.find_with(&finder, range))
    }

    /// All non-overlapping matches of `needle` in `range`, in order
    pub fn find_string_all(
        &self,
        needle: &str,
        range: TextRange,
        options: FindOptions,
    ) -> Result<Vec<TextRange>, FindError> {
        let finder = Finder::new(needle, options)?;
        Ok(self.find_all_with(&finder, range))
    }

    pub fn find_with(&self, finder: &Finder, range: TextRange) -> Option<TextRange> {
        let (begin, end) = (self.clamp_point(range.begin()), self.clamp_point(range.end()));
        if finder.options.reverse {
            (begin.y..=end.y).rev().find_map(|ln| {
                let (from, to) = self.line_bounds(ln, begin, end);
                finder.line_matches(self, ln, from, to).pop()
            })
        } else {
            (begin.y..=end.y).find_map(|ln| {
                let (from, to) = self.line_bounds(ln, begin, end);
                finder.line_matches(self, ln, from, to).into_iter().next()
            })
        }
    }

    pub fn find_all_with(&self, finder: &Finder, range: TextRange) -> Vec<TextRange> {
        let (begin, end) = (self.clamp_point(range.begin()), self.clamp_point(range.end()));
        (begin.y..=end.y)
            .flat_map(|ln| {
                let (from, to) = self.line_bounds(ln, begin, end);
                finder.line_matches(self, ln, from, to)
            })
            .collect()
    }

    /// Whole buffer as a search range
    pub fn whole_range(&self) -> TextRange {
        TextRange::new(TextPoint::new(0, 1), self.end_point())
    }

    fn line_bounds(&self, ln: Coord, begin: TextPoint, end: TextPoint) -> (Coord, Coord) {
        let from = if ln == begin.y { begin.x } else { 0 };
        let to = if ln == end.y { end.x } else { self.line_length(ln) };
        (from, to.max(from))
    }
}
