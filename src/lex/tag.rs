//! Lexical tags attached to spans of a line

use std::fmt;
use std::str::FromStr;

/// Broad lexical class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum LexMajor {
    #[default]
    None,
    Comment,
    Constant,
    Identifier,
    Statement,
    Package,
    PreProc,
    Type,
    Special,
    Operator,
    Error,
}

/// Refinement of a [`LexMajor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum LexMinor {
    #[default]
    None,
    String,
    Char,
    Number,
    Bool,
    Null,
    Doc,
    Function,
    Keyword,
}

const MAJOR_NAMES: &[(&str, LexMajor)] = &[
    ("none", LexMajor::None),
    ("comment", LexMajor::Comment),
    ("constant", LexMajor::Constant),
    ("identifier", LexMajor::Identifier),
    ("statement", LexMajor::Statement),
    ("package", LexMajor::Package),
    ("preproc", LexMajor::PreProc),
    ("type", LexMajor::Type),
    ("special", LexMajor::Special),
    ("operator", LexMajor::Operator),
    ("error", LexMajor::Error),
];

const MINOR_NAMES: &[(&str, LexMinor)] = &[
    ("none", LexMinor::None),
    ("string", LexMinor::String),
    ("char", LexMinor::Char),
    ("number", LexMinor::Number),
    ("bool", LexMinor::Bool),
    ("null", LexMinor::Null),
    ("doc", LexMinor::Doc),
    ("function", LexMinor::Function),
    ("keyword", LexMinor::Keyword),
];

/// A lexical tag, e.g. `constant.string` or `comment`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Lex {
    pub major: LexMajor,
    pub minor: LexMinor,
}

impl Lex {
    pub const NONE: Lex = Lex::new(LexMajor::None, LexMinor::None);
    pub const COMMENT: Lex = Lex::new(LexMajor::Comment, LexMinor::None);
    pub const STRING: Lex = Lex::new(LexMajor::Constant, LexMinor::String);
    pub const CHAR: Lex = Lex::new(LexMajor::Constant, LexMinor::Char);
    pub const NUMBER: Lex = Lex::new(LexMajor::Constant, LexMinor::Number);
    pub const OPERATOR: Lex = Lex::new(LexMajor::Operator, LexMinor::None);

    pub const fn new(major: LexMajor, minor: LexMinor) -> Self {
        Self { major, minor }
    }

    pub const fn major(major: LexMajor) -> Self {
        Self::new(major, LexMinor::None)
    }

    pub fn is_none(&self) -> bool {
        self.major == LexMajor::None
    }

    pub fn is_comment(&self) -> bool {
        self.major == LexMajor::Comment
    }

    /// String or char constant
    pub fn is_string(&self) -> bool {
        self.major == LexMajor::Constant
            && matches!(self.minor, LexMinor::String | LexMinor::Char)
    }
}

/// Error returned when parsing a lex name fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lex name: {0}")]
pub struct UnknownLex(pub String);

impl FromStr for Lex {
    type Err = UnknownLex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (major_name, minor_name) = match lower.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (lower.as_str(), None),
        };

        let major = MAJOR_NAMES
            .iter()
            .find(|(name, _)| *name == major_name)
            .map(|(_, major)| *major)
            .ok_or_else(|| UnknownLex(s.to_string()))?;

        let minor = match minor_name {
            Some(minor_name) => MINOR_NAMES
                .iter()
                .find(|(name, _)| *name == minor_name)
                .map(|(_, minor)| *minor)
                .ok_or_else(|| UnknownLex(s.to_string()))?,
            None => LexMinor::None,
        };

        Ok(Lex::new(major, minor))
    }
}

impl fmt::Display for Lex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = MAJOR_NAMES
            .iter()
            .find(|(_, major)| *major == self.major)
            .map(|(name, _)| *name)
            .unwrap_or("none");
        if self.minor == LexMinor::None {
            write!(f, "{major}")
        } else {
            let minor = MINOR_NAMES
                .iter()
                .find(|(_, minor)| *minor == self.minor)
                .map(|(name, _)| *name)
                .unwrap_or("none");
            write!(f, "{major}.{minor}")
        }
    }
}
