//! Per-file-type lexical rules and the single-line scanner
//!
//! A [`Lexer`] is configured once (built-in definitions plus optional YAML
//! overrides) and then shared read-only between buffers. Scanning is a pure
//! function of a line's characters and the incoming [`ScanState`].

use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::{Pattern, PatternError};
use super::quote::{Quote, QuoteFlags, QuoteRule, RegexQuote};
use super::scan::{LineLex, QuotePart, ScanState};
use super::tag::Lex;

/// Characters that end a word, besides whitespace
pub const DEFAULT_DELIMITERS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^`{|}~";

/// Characters tagged as operators
pub const DEFAULT_OPERATORS: &str = "!%&*+-/:<=>?^|~";

/// Lexical rules for one file type
#[derive(Debug)]
pub struct Lexer {
    quotes: Vec<QuoteRule>,
    regexes: Vec<(Lex, Pattern)>,
    anyofs: HashMap<String, Lex>,
    prefixes: Vec<(String, Lex)>,
    suffixes: Vec<(String, Lex)>,
    prevs: Vec<(String, Lex)>,
    nexts: Vec<(char, Lex)>,
    ignore_case: bool,
    delimiters: String,
    operators: String,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// A lexer with default delimiters/operators and no rules
    pub fn new() -> Self {
        Self {
            quotes: Vec::new(),
            regexes: Vec::new(),
            anyofs: HashMap::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            prevs: Vec::new(),
            nexts: Vec::new(),
            ignore_case: false,
            delimiters: DEFAULT_DELIMITERS.to_string(),
            operators: DEFAULT_OPERATORS.to_string(),
        }
    }

    /// Shared lexer with no rules, used for plain text
    pub fn plain() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // === Rule surface ===

    pub fn add_quote(&mut self, quote: Quote) {
        self.quotes.push(QuoteRule::Literal(Arc::new(quote)));
    }

    pub fn add_regex_quote(
        &mut self,
        lex: Lex,
        start: &str,
        end_template: &str,
        flags: QuoteFlags,
    ) -> Result<(), PatternError> {
        let quote = RegexQuote::new(lex, start, end_template, flags, self.ignore_case)?;
        self.quotes.push(QuoteRule::Regex(quote));
        Ok(())
    }

    pub fn add_regex(&mut self, lex: Lex, pattern: &str) -> Result<(), PatternError> {
        let pattern = Pattern::compile_with(pattern, self.ignore_case)?;
        self.regexes.push((lex, pattern));
        Ok(())
    }

    /// Exact-match words, e.g. keywords
    pub fn add_anyof<'a>(&mut self, lex: Lex, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            self.anyofs.insert(self.fold_case(word), lex);
        }
    }

    /// Words starting with `prefix`
    pub fn add_prefix(&mut self, lex: Lex, prefix: &str) {
        self.prefixes.push((prefix.to_string(), lex));
    }

    /// Words ending with `suffix`
    pub fn add_suffix(&mut self, lex: Lex, suffix: &str) {
        self.suffixes.push((suffix.to_string(), lex));
    }

    /// The word following `prev` gets `lex`, e.g. the name after `class`
    pub fn add_prev(&mut self, lex: Lex, prev: &str) {
        self.prevs.push((prev.to_string(), lex));
    }

    /// An otherwise untagged word directly followed by `next` gets `lex`,
    /// e.g. a function name before `(`
    pub fn add_next(&mut self, lex: Lex, next: char) {
        self.nexts.push((next, lex));
    }

    /// Toggle case-insensitive keyword and pattern matching.
    /// Regex rules already added are recompiled; regex quotes keep the
    /// setting they were added with.
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        if self.ignore_case == ignore_case {
            return;
        }
        self.ignore_case = ignore_case;
        self.regexes = std::mem::take(&mut self.regexes)
            .into_iter()
            .filter_map(|(lex, pattern)| {
                Pattern::compile_with(pattern.source(), ignore_case)
                    .ok()
                    .map(|pattern| (lex, pattern))
            })
            .collect();
        self.anyofs = std::mem::take(&mut self.anyofs)
            .into_iter()
            .map(|(word, lex)| (self.fold_case(&word), lex))
            .collect();
    }

    pub fn set_delimiters(&mut self, delimiters: &str) {
        self.delimiters = delimiters.to_string();
    }

    pub fn set_operators(&mut self, operators: &str) {
        self.operators = operators.to_string();
    }

    // === Queries ===

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn delimiters(&self) -> &str {
        &self.delimiters
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        c.is_whitespace() || self.delimiters.contains(c)
    }

    pub fn is_operator(&self, c: char) -> bool {
        self.operators.contains(c)
    }

    fn fold_case(&self, word: &str) -> String {
        if self.ignore_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }

    fn starts_with(&self, word: &str, prefix: &str) -> bool {
        if self.ignore_case {
            word.to_lowercase().starts_with(&prefix.to_lowercase())
        } else {
            word.starts_with(prefix)
        }
    }

    fn ends_with(&self, word: &str, suffix: &str) -> bool {
        if self.ignore_case {
            word.to_lowercase().ends_with(&suffix.to_lowercase())
        } else {
            word.ends_with(suffix)
        }
    }

    // === Scanning ===

    /// First quote whose start matches at `offset`. Regex quotes are tried
    /// before literal ones; within each kind registration order wins.
    fn match_quote_start(&self, text: &[char], offset: usize) -> Option<(usize, Arc<Quote>)> {
        self.quotes
            .iter()
            .filter(|rule| rule.is_regex())
            .chain(self.quotes.iter().filter(|rule| !rule.is_regex()))
            .find_map(|rule| rule.match_start(text, offset))
    }

    /// First regex rule matching at `offset`. Anchored rules also match
    /// from the line start when `offset` is the first non-space column.
    /// Returns the tag and the end of the match.
    fn match_regex(&self, text: &[char], offset: usize, first_non_space: usize) -> Option<(Lex, usize)> {
        let at_line_start = offset <= first_non_space;
        self.regexes.iter().find_map(|(lex, pattern)| {
            let start = if pattern.is_anchored() && at_line_start { 0 } else { offset };
            pattern
                .match_at(text, start)
                .filter(|m| m.end() > offset)
                .map(|m| (*lex, m.end()))
        })
    }

    fn classify_word(&self, word: &str, prev_word: Option<&str>) -> Option<Lex> {
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(Lex::NUMBER);
        }
        if let Some(lex) = self.anyofs.get(&self.fold_case(word)) {
            return Some(*lex);
        }
        if let Some((_, lex)) = self.prefixes.iter().find(|(p, _)| self.starts_with(word, p)) {
            return Some(*lex);
        }
        if let Some((_, lex)) = self.suffixes.iter().find(|(s, _)| self.ends_with(word, s)) {
            return Some(*lex);
        }
        let prev_word = prev_word?;
        self.prevs
            .iter()
            .find(|(prev, _)| self.fold_case(prev) == self.fold_case(prev_word))
            .map(|(_, lex)| *lex)
    }

    fn next_rule(&self, c: char) -> Option<Lex> {
        self.nexts.iter().find(|(next, _)| *next == c).map(|(_, lex)| *lex)
    }

    /// Scan one line given the state left by the previous line
    pub fn scan_line(&self, text: &[char], state: ScanState) -> LineLex {
        let len = text.len();
        let mut out = LineLex::default();
        let mut i = 0;

        if let ScanState::InQuote(quote) = state {
            match quote.find_end(text, 0) {
                Some(end) => {
                    out.push_lex(0, end, quote.lex());
                    out.push_quote(quote, 0, end, QuotePart::End);
                    i = end;
                }
                None => {
                    out.push_lex(0, len, quote.lex());
                    out.push_quote(Arc::clone(&quote), 0, len, QuotePart::Body);
                    if quote.continues_after(text) {
                        out.state_out = ScanState::InQuote(quote);
                    }
                    return out;
                }
            }
        }

        let first_non_space = text.iter().position(|c| !c.is_whitespace()).unwrap_or(len);

        // Untagged word waiting for a "next" rule, and the previous word for
        // "prev" rules
        let mut pending_word: Option<(usize, usize)> = None;
        let mut prev_word: Option<(usize, usize)> = None;

        while i < len {
            let c = text[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }

            if let Some((start_len, quote)) = self.match_quote_start(text, i) {
                match quote.find_end(text, i + start_len) {
                    Some(end) => {
                        out.push_lex(i, end - i, quote.lex());
                        out.push_quote(quote, i, end - i, QuotePart::Whole);
                        i = end;
                    }
                    None => {
                        out.push_lex(i, len - i, quote.lex());
                        if quote.continues_after(text) {
                            out.state_out = ScanState::InQuote(Arc::clone(&quote));
                        }
                        out.push_quote(quote, i, len - i, QuotePart::Start);
                        return out;
                    }
                }
                pending_word = None;
                prev_word = None;
                continue;
            }

            if let Some((lex, end)) = self.match_regex(text, i, first_non_space) {
                out.push_lex(i, end - i, lex);
                i = end;
                pending_word = None;
                prev_word = None;
                continue;
            }

            if self.is_delimiter(c) {
                if let Some((offset, n)) = pending_word.take() {
                    if let Some(lex) = self.next_rule(c) {
                        out.push_lex(offset, n, lex);
                    }
                }
                if self.is_operator(c) {
                    let start = i;
                    i += 1;
                    while i < len
                        && self.is_operator(text[i])
                        && self.match_quote_start(text, i).is_none()
                    {
                        i += 1;
                    }
                    out.push_lex(start, i - start, Lex::OPERATOR);
                } else {
                    i += 1;
                }
                prev_word = None;
                continue;
            }

            let start = i;
            let numeric = c.is_ascii_digit();
            while i < len {
                let ch = text[i];
                if !self.is_delimiter(ch) {
                    i += 1;
                } else if numeric && ch == '.' && text.get(i + 1).is_some_and(|d| d.is_ascii_digit()) {
                    i += 1;
                } else {
                    break;
                }
            }

            let word: String = text[start..i].iter().collect();
            let prev: Option<String> = prev_word.map(|(s, e)| text[s..e].iter().collect());
            pending_word = None;
            match self.classify_word(&word, prev.as_deref()) {
                Some(lex) => out.push_lex(start, i - start, lex),
                None => pending_word = Some((start, i - start)),
            }
            prev_word = Some((start, i));
        }

        out
    }

    /// Scan consecutive lines from the no-quote state
    pub fn scan_lines<'a>(&self, lines: impl IntoIterator<Item = &'a [char]>) -> Vec<LineLex> {
        let mut state = ScanState::NoQuote;
        lines
            .into_iter()
            .map(|text| {
                let lex = self.scan_line(text, state.clone());
                state = lex.state_out.clone();
                lex
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::scan::LexElem;
    use crate::lex::tag::{LexMajor, LexMinor};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn c_lexer() -> Lexer {
        let mut lexer = Lexer::new();
        lexer.add_quote(Quote::new(Lex::COMMENT, "/*", "*/", QuoteFlags::MULTI_LINE));
        lexer.add_quote(Quote::new(Lex::COMMENT, "//", "", QuoteFlags::ESCAPE_EOL));
        lexer.add_quote(Quote::new(
            Lex::STRING,
            "\"",
            "\"",
            QuoteFlags::ESCAPE | QuoteFlags::ESCAPE_EOL,
        ));
        lexer.add_anyof(Lex::major(LexMajor::Type), ["int", "char"]);
        lexer.add_anyof(Lex::major(LexMajor::Statement), ["return", "if"]);
        lexer
            .add_regex(Lex::major(LexMajor::PreProc), r"#\s*include\b")
            .unwrap();
        lexer.add_next(Lex::new(LexMajor::Identifier, LexMinor::Function), '(');
        lexer.add_prev(Lex::major(LexMajor::Type), "struct");
        lexer.add_suffix(Lex::major(LexMajor::Type), "_t");
        lexer
    }

    #[test]
    fn test_block_comment_across_lines() {
        let lexer = c_lexer();
        let line1 = chars("/* start");
        let line2 = chars("end */ int i;");

        let first = lexer.scan_line(&line1, ScanState::NoQuote);
        assert!(first.state_out.is_in_quote());
        assert_eq!(first.elems, vec![LexElem { offset: 0, len: 8, lex: Lex::COMMENT }]);
        assert_eq!(first.quote_elems[0].part, QuotePart::Start);

        let second = lexer.scan_line(&line2, first.state_out.clone());
        assert_eq!(second.state_out, ScanState::NoQuote);
        assert_eq!(second.elems[0], LexElem { offset: 0, len: 6, lex: Lex::COMMENT });
        assert_eq!(second.quote_elems[0].part, QuotePart::End);
        assert_eq!(second.lex_at(7), Lex::major(LexMajor::Type));
        assert_eq!(second.lex_at(11), Lex::NONE);
        assert_eq!(second.lex_at(12), Lex::NONE);
    }

    #[test]
    fn test_line_comment_continues_after_escape() {
        let lexer = c_lexer();
        let lexes = lexer.scan_lines([
            chars(r"// first \").as_slice(),
            chars("still comment").as_slice(),
            chars("int x;").as_slice(),
        ]);
        assert!(lexes[0].state_out.is_in_quote());
        assert_eq!(lexes[1].lex_at(0), Lex::COMMENT);
        assert_eq!(lexes[1].state_out, ScanState::NoQuote);
        assert_eq!(lexes[2].lex_at(0), Lex::major(LexMajor::Type));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let lexer = c_lexer();
        let lex = lexer.scan_line(&chars(r#"s = "a\"b"; x"#), ScanState::NoQuote);
        assert_eq!(lex.lex_at(4), Lex::STRING);
        assert_eq!(lex.lex_at(9), Lex::STRING);
        assert_eq!(lex.lex_at(10), Lex::NONE);
        assert_eq!(lex.quote_elems[0].part, QuotePart::Whole);
    }

    #[test]
    fn test_regex_rule_and_operators() {
        let lexer = c_lexer();
        let lex = lexer.scan_line(&chars("#include <a.h>"), ScanState::NoQuote);
        assert_eq!(lex.elems[0], LexElem {
            offset: 0,
            len: 8,
            lex: Lex::major(LexMajor::PreProc)
        });
        assert_eq!(lex.lex_at(9), Lex::OPERATOR);
    }

    #[test]
    fn test_anchored_regex_only_at_first_word() {
        let mut lexer = Lexer::new();
        lexer.add_regex(Lex::major(LexMajor::PreProc), r"^\s*#\s*define\b").unwrap();

        let lex = lexer.scan_line(&chars("   # define X"), ScanState::NoQuote);
        assert_eq!(lex.lex_at(3), Lex::major(LexMajor::PreProc));
        assert_eq!(lex.lex_at(8), Lex::major(LexMajor::PreProc));

        let lex = lexer.scan_line(&chars("x #define Y"), ScanState::NoQuote);
        assert_ne!(lex.lex_at(2), Lex::major(LexMajor::PreProc));
    }

    #[test]
    fn test_operator_run_stops_at_quote_start() {
        let lexer = c_lexer();
        let lex = lexer.scan_line(&chars("a=/* c */1"), ScanState::NoQuote);
        assert_eq!(lex.lex_at(1), Lex::OPERATOR);
        assert_eq!(lex.lex_at(2), Lex::COMMENT);
        assert_eq!(lex.lex_at(9), Lex::NUMBER);
    }

    #[test]
    fn test_look_back_rules() {
        let lexer = c_lexer();
        let lex = lexer.scan_line(&chars("struct point p = make (1.5);"), ScanState::NoQuote);
        assert_eq!(lex.lex_at(7), Lex::major(LexMajor::Type));
        assert_eq!(lex.lex_at(13), Lex::NONE);
        assert_eq!(
            lex.lex_at(17),
            Lex::new(LexMajor::Identifier, LexMinor::Function)
        );
        let number = lex.elems.iter().find(|e| e.lex == Lex::NUMBER).unwrap();
        assert_eq!((number.offset, number.len), (23, 3));

        let lex = lexer.scan_line(&chars("size_t n;"), ScanState::NoQuote);
        assert_eq!(lex.lex_at(0), Lex::major(LexMajor::Type));
    }

    #[test]
    fn test_ignore_case_keywords() {
        let mut lexer = Lexer::new();
        lexer.add_anyof(Lex::major(LexMajor::Statement), ["select"]);
        lexer.set_ignore_case(true);
        let lex = lexer.scan_line(&chars("SELECT x"), ScanState::NoQuote);
        assert_eq!(lex.lex_at(0), Lex::major(LexMajor::Statement));
    }

    #[test]
    fn test_regex_quote_precedes_literal_quote() {
        let mut lexer = Lexer::new();
        lexer.add_quote(Quote::new(Lex::COMMENT, "--", "", QuoteFlags::empty()));
        lexer
            .add_regex_quote(
                Lex::new(LexMajor::Comment, LexMinor::Doc),
                r"--\[(=*)\[",
                r"]\1]",
                QuoteFlags::MULTI_LINE,
            )
            .unwrap();

        let lexes = lexer.scan_lines([
            chars("--[=[ long").as_slice(),
            chars("]] still ]=] x").as_slice(),
        ]);
        assert!(lexes[0].state_out.is_in_quote());
        let doc = Lex::new(LexMajor::Comment, LexMinor::Doc);
        assert_eq!(lexes[1].elems[0], LexElem { offset: 0, len: 12, lex: doc });
        assert_eq!(lexes[1].state_out, ScanState::NoQuote);
    }
}
