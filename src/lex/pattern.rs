//! Lite patterns: a small, single-line pattern language used for token
//! recognition where a full regex engine would be overkill.
//!
//! Supported syntax:
//!
//! | Syntax            | Meaning                                             |
//! |-------------------|-----------------------------------------------------|
//! | `abc`             | literal characters                                  |
//! | `.`               | any character                                       |
//! | `\s` `\d` `\w`    | space/tab, ASCII digit, word character              |
//! | `\b`              | word boundary (zero width)                          |
//! | `\x`              | literal `x` for any non-alphanumeric `x`            |
//! | `[abc]` `[a-z]`   | character class, `[^...]` negates                   |
//! | `(...)`           | capture group                                       |
//! | `?` `*` `+`       | repetition of the preceding atom                    |
//! | `^` / `$`         | start / end of line (first / last position only)   |
//!
//! Matching is left to right. Only repeated atoms backtrack: they try their
//! longest run first and give characters back one at a time until the rest
//! of the pattern matches.

use std::ops::Range;

/// Characters that separate words for `\b`
pub const BOUNDARY_DELIMITERS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^`{|}~";

/// Reasons a pattern fails to compile
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unbalanced group at offset {0}")]
    UnbalancedGroup(usize),
    #[error("'$' is only allowed at the end of a pattern (offset {0})")]
    MisplacedEnd(usize),
    #[error("'^' is only allowed at the start of a pattern (offset {0})")]
    MisplacedStart(usize),
    #[error("'{0}' at offset {1} does not follow a repeatable atom")]
    DanglingRepeat(char, usize),
    #[error("unsupported character class at offset {0}")]
    BadClass(usize),
    #[error("unknown escape '\\{0}'")]
    UnknownEscape(char),
    #[error("pattern ends with a lone '\\'")]
    TrailingEscape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
    Space,
    Digit,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Char(char),
    Any,
    Space,
    Digit,
    Word,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    One,
    Optional,
    Star,
    Plus,
}

impl Repeat {
    fn bounds(self) -> (usize, usize) {
        match self {
            Repeat::One => (1, 1),
            Repeat::Optional => (0, 1),
            Repeat::Star => (0, usize::MAX),
            Repeat::Plus => (1, usize::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Atom(Atom, Repeat),
    GroupStart(usize),
    GroupEnd(usize),
    Boundary,
    LineEnd,
}

/// Whether `c` is part of a word for `\b` and `\w`
pub fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !BOUNDARY_DELIMITERS.contains(c)
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_boundary(text: &[char], pos: usize) -> bool {
    let before = pos > 0 && is_word_char(text[pos - 1]);
    let after = pos < text.len() && is_word_char(text[pos]);
    before != after
}

fn chars_equal(a: char, b: char, ignore_case: bool) -> bool {
    a == b || (ignore_case && a.to_lowercase().eq(b.to_lowercase()))
}

/// A successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    start: usize,
    end: usize,
    groups: Vec<Option<Range<usize>>>,
}

impl PatternMatch {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Span of group `n`; group 0 is the whole match, explicit groups start at 1
    pub fn group(&self, n: usize) -> Option<Range<usize>> {
        if n == 0 {
            Some(self.start..self.end)
        } else {
            self.groups.get(n - 1).cloned().flatten()
        }
    }
}

#[derive(Debug, Clone)]
struct Captures {
    starts: Vec<usize>,
    spans: Vec<Option<Range<usize>>>,
}

/// A compiled lite pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    nodes: Vec<Node>,
    anchored: bool,
    group_count: usize,
    ignore_case: bool,
}

impl Pattern {
    /// Compile a case-sensitive pattern
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        Self::compile_with(source, false)
    }

    /// Compile a pattern, optionally matching letters case-insensitively
    pub fn compile_with(source: &str, ignore_case: bool) -> Result<Self, PatternError> {
        let chars: Vec<char> = source.chars().collect();
        if chars.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut nodes = Vec::new();
        let mut open_groups: Vec<(usize, usize)> = Vec::new();
        let mut group_count = 0;
        let mut anchored = false;
        let mut i = 0;

        if chars[0] == '^' {
            anchored = true;
            i = 1;
        }

        while i < chars.len() {
            let c = chars[i];
            match c {
                '\\' => {
                    let Some(&escaped) = chars.get(i + 1) else {
                        return Err(PatternError::TrailingEscape);
                    };
                    let node = match escaped {
                        's' => Node::Atom(Atom::Space, Repeat::One),
                        'd' => Node::Atom(Atom::Digit, Repeat::One),
                        'w' => Node::Atom(Atom::Word, Repeat::One),
                        'b' => Node::Boundary,
                        't' => Node::Atom(Atom::Char('\t'), Repeat::One),
                        other if other.is_alphanumeric() => {
                            return Err(PatternError::UnknownEscape(other));
                        }
                        other => Node::Atom(Atom::Char(other), Repeat::One),
                    };
                    nodes.push(node);
                    i += 2;
                }
                '.' => {
                    nodes.push(Node::Atom(Atom::Any, Repeat::One));
                    i += 1;
                }
                '(' => {
                    open_groups.push((group_count, i));
                    nodes.push(Node::GroupStart(group_count));
                    group_count += 1;
                    i += 1;
                }
                ')' => {
                    let (group, _) = open_groups.pop().ok_or(PatternError::UnbalancedGroup(i))?;
                    nodes.push(Node::GroupEnd(group));
                    i += 1;
                }
                '[' => {
                    let (atom, next) = parse_class(&chars, i)?;
                    nodes.push(Node::Atom(atom, Repeat::One));
                    i = next;
                }
                '?' | '*' | '+' => {
                    let repeat = match c {
                        '?' => Repeat::Optional,
                        '*' => Repeat::Star,
                        _ => Repeat::Plus,
                    };
                    match nodes.last_mut() {
                        Some(Node::Atom(_, slot @ Repeat::One)) => *slot = repeat,
                        _ => return Err(PatternError::DanglingRepeat(c, i)),
                    }
                    i += 1;
                }
                '$' => {
                    if i + 1 != chars.len() {
                        return Err(PatternError::MisplacedEnd(i));
                    }
                    nodes.push(Node::LineEnd);
                    i += 1;
                }
                '^' => return Err(PatternError::MisplacedStart(i)),
                _ => {
                    nodes.push(Node::Atom(Atom::Char(c), Repeat::One));
                    i += 1;
                }
            }
        }

        if let Some((_, offset)) = open_groups.pop() {
            return Err(PatternError::UnbalancedGroup(offset));
        }

        Ok(Self {
            source: source.to_string(),
            nodes,
            anchored,
            group_count,
            ignore_case,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Match starting exactly at `offset`
    pub fn match_at(&self, text: &[char], offset: usize) -> Option<PatternMatch> {
        if offset > text.len() || (self.anchored && offset != 0) {
            return None;
        }

        let mut caps = Captures {
            starts: vec![offset; self.group_count],
            spans: vec![None; self.group_count],
        };
        let end = self.run(0, text, offset, &mut caps)?;
        Some(PatternMatch {
            start: offset,
            end,
            groups: caps.spans,
        })
    }

    /// Find the first match at or after `from`
    pub fn find(&self, text: &[char], from: usize) -> Option<PatternMatch> {
        if self.anchored {
            return if from == 0 { self.match_at(text, 0) } else { None };
        }
        (from..=text.len()).find_map(|offset| self.match_at(text, offset))
    }

    /// Convenience for matching a `&str` from its start
    pub fn match_str(&self, text: &str) -> Option<PatternMatch> {
        let chars: Vec<char> = text.chars().collect();
        self.match_at(&chars, 0)
    }

    fn run(&self, mut idx: usize, text: &[char], mut pos: usize, caps: &mut Captures) -> Option<usize> {
        while idx < self.nodes.len() {
            match &self.nodes[idx] {
                Node::Atom(atom, Repeat::One) => {
                    if pos < text.len() && self.atom_matches(atom, text[pos]) {
                        pos += 1;
                    } else {
                        return None;
                    }
                }
                Node::Atom(atom, repeat) => {
                    let (min, max) = repeat.bounds();
                    let mut count = 0;
                    while count < max
                        && pos + count < text.len()
                        && self.atom_matches(atom, text[pos + count])
                    {
                        count += 1;
                    }
                    if count < min {
                        return None;
                    }
                    for taken in (min..=count).rev() {
                        let mut trial = caps.clone();
                        if let Some(end) = self.run(idx + 1, text, pos + taken, &mut trial) {
                            *caps = trial;
                            return Some(end);
                        }
                    }
                    return None;
                }
                Node::GroupStart(group) => caps.starts[*group] = pos,
                Node::GroupEnd(group) => caps.spans[*group] = Some(caps.starts[*group]..pos),
                Node::Boundary => {
                    if !is_boundary(text, pos) {
                        return None;
                    }
                }
                Node::LineEnd => {
                    if pos != text.len() {
                        return None;
                    }
                }
            }
            idx += 1;
        }
        Some(pos)
    }

    fn atom_matches(&self, atom: &Atom, c: char) -> bool {
        match atom {
            Atom::Char(expected) => chars_equal(*expected, c, self.ignore_case),
            Atom::Any => true,
            Atom::Space => is_space(c),
            Atom::Digit => c.is_ascii_digit(),
            Atom::Word => is_word_char(c),
            Atom::Class { negated, items } => {
                let hit = items.iter().any(|item| self.class_item_matches(item, c));
                hit != *negated
            }
        }
    }

    fn class_item_matches(&self, item: &ClassItem, c: char) -> bool {
        match item {
            ClassItem::Char(expected) => chars_equal(*expected, c, self.ignore_case),
            ClassItem::Range(lo, hi) => {
                let in_range = |ch: char| *lo <= ch && ch <= *hi;
                in_range(c)
                    || (self.ignore_case
                        && (c.to_lowercase().any(in_range) || c.to_uppercase().any(in_range)))
            }
            ClassItem::Space => is_space(c),
            ClassItem::Digit => c.is_ascii_digit(),
            ClassItem::Word => is_word_char(c),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.ignore_case == other.ignore_case
    }
}

/// Parse `[...]` starting at `open`; returns the atom and the index after `]`
fn parse_class(chars: &[char], open: usize) -> Result<(Atom, usize), PatternError> {
    let mut i = open + 1;
    let mut negated = false;
    if chars.get(i) == Some(&'^') {
        negated = true;
        i += 1;
    }

    let mut items = Vec::new();
    loop {
        let Some(&c) = chars.get(i) else {
            return Err(PatternError::BadClass(open));
        };
        match c {
            ']' => {
                if items.is_empty() {
                    return Err(PatternError::BadClass(open));
                }
                return Ok((Atom::Class { negated, items }, i + 1));
            }
            '\\' => {
                let Some(&escaped) = chars.get(i + 1) else {
                    return Err(PatternError::BadClass(open));
                };
                let item = match escaped {
                    's' => ClassItem::Space,
                    'd' => ClassItem::Digit,
                    'w' => ClassItem::Word,
                    't' => ClassItem::Char('\t'),
                    other if other.is_alphanumeric() => return Err(PatternError::BadClass(open)),
                    other => ClassItem::Char(other),
                };
                items.push(item);
                i += 2;
            }
            '[' => return Err(PatternError::BadClass(open)),
            _ => {
                let is_range = chars.get(i + 1) == Some(&'-')
                    && chars.get(i + 2).is_some_and(|next| *next != ']');
                if is_range {
                    let hi = chars[i + 2];
                    if hi < c || hi == '\\' {
                        return Err(PatternError::BadClass(open));
                    }
                    items.push(ClassItem::Range(c, hi));
                    i += 3;
                } else {
                    items.push(ClassItem::Char(c));
                    i += 1;
                }
            }
        }
    }
}
