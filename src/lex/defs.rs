//! Built-in lexical definitions per file type

use crate::file_type::FileType;

use super::lexer::Lexer;
use super::pattern::PatternError;
use super::quote::{Quote, QuoteFlags};
use super::tag::{Lex, LexMajor, LexMinor};

const STATEMENT: Lex = Lex::major(LexMajor::Statement);
const TYPE: Lex = Lex::major(LexMajor::Type);
const PREPROC: Lex = Lex::major(LexMajor::PreProc);
const PACKAGE: Lex = Lex::major(LexMajor::Package);
const SPECIAL: Lex = Lex::major(LexMajor::Special);
const BOOL: Lex = Lex::new(LexMajor::Constant, LexMinor::Bool);
const NULL: Lex = Lex::new(LexMajor::Constant, LexMinor::Null);
const DOC: Lex = Lex::new(LexMajor::Comment, LexMinor::Doc);
const FUNCTION: Lex = Lex::new(LexMajor::Identifier, LexMinor::Function);

/// Build the lexer for a file type, without user overrides
pub fn builtin(file_type: FileType) -> Lexer {
    let mut lexer = Lexer::new();
    match file_type {
        FileType::PlainText => {}
        FileType::C => c_like(&mut lexer, C_KEYWORDS, C_TYPES),
        FileType::Cpp => {
            c_like(&mut lexer, C_KEYWORDS, C_TYPES);
            lexer.add_anyof(STATEMENT, CPP_KEYWORDS.iter().copied());
            lexer.add_prev(TYPE, "class");
            lexer.add_prev(TYPE, "namespace");
        }
        FileType::Java => {
            slash_comments(&mut lexer);
            string_quotes(&mut lexer);
            lexer.add_anyof(STATEMENT, JAVA_KEYWORDS.iter().copied());
            lexer.add_anyof(TYPE, JAVA_TYPES.iter().copied());
            add_regex(&mut lexer, PREPROC, r"@\w+");
            lexer.add_prev(TYPE, "class");
            lexer.add_prev(TYPE, "interface");
            common_constants(&mut lexer, &["true", "false"], &["null"]);
            lexer.add_next(FUNCTION, '(');
        }
        FileType::CSharp => {
            slash_comments(&mut lexer);
            string_quotes(&mut lexer);
            lexer.add_quote(Quote::new(Lex::STRING, "@\"", "\"", QuoteFlags::MULTI_LINE));
            lexer.add_anyof(STATEMENT, CSHARP_KEYWORDS.iter().copied());
            lexer.add_anyof(TYPE, CSHARP_TYPES.iter().copied());
            lexer.add_prev(TYPE, "class");
            common_constants(&mut lexer, &["true", "false"], &["null"]);
            add_regex(&mut lexer, PREPROC, r"^\s*#\s*\w+");
            lexer.add_next(FUNCTION, '(');
        }
        FileType::JavaScript => {
            slash_comments(&mut lexer);
            string_quotes(&mut lexer);
            lexer.add_quote(Quote::new(
                Lex::STRING,
                "`",
                "`",
                QuoteFlags::MULTI_LINE | QuoteFlags::ESCAPE,
            ));
            lexer.add_anyof(STATEMENT, JS_KEYWORDS.iter().copied());
            lexer.add_prev(TYPE, "class");
            lexer.add_prev(FUNCTION, "function");
            common_constants(&mut lexer, &["true", "false"], &["null", "undefined"]);
            lexer.add_next(FUNCTION, '(');
        }
        FileType::Go => {
            slash_comments(&mut lexer);
            string_quotes(&mut lexer);
            lexer.add_quote(Quote::new(Lex::STRING, "`", "`", QuoteFlags::MULTI_LINE));
            lexer.add_anyof(STATEMENT, GO_KEYWORDS.iter().copied());
            lexer.add_anyof(TYPE, GO_TYPES.iter().copied());
            lexer.add_prev(PACKAGE, "package");
            lexer.add_prev(FUNCTION, "func");
            common_constants(&mut lexer, &["true", "false"], &["nil"]);
            lexer.add_next(FUNCTION, '(');
        }
        FileType::Rust => {
            add_regex_quote(&mut lexer, Lex::STRING, r#"r(#*)""#, r#""\1"#, QuoteFlags::MULTI_LINE);
            lexer.add_quote(Quote::new(DOC, "///", "", QuoteFlags::empty()));
            slash_comments(&mut lexer);
            lexer.add_quote(Quote::new(
                Lex::STRING,
                "\"",
                "\"",
                QuoteFlags::MULTI_LINE | QuoteFlags::ESCAPE,
            ));
            add_regex(&mut lexer, Lex::CHAR, r"'\\?.'");
            lexer.add_anyof(STATEMENT, RUST_KEYWORDS.iter().copied());
            lexer.add_anyof(TYPE, RUST_TYPES.iter().copied());
            lexer.add_prev(FUNCTION, "fn");
            lexer.add_prev(TYPE, "struct");
            lexer.add_prev(TYPE, "enum");
            lexer.add_prev(TYPE, "trait");
            common_constants(&mut lexer, &["true", "false"], &[]);
            add_regex(&mut lexer, PREPROC, r"#!?\[");
            add_regex(&mut lexer, SPECIAL, r"\w+!");
            lexer.add_next(FUNCTION, '(');
        }
        FileType::Css => {
            lexer.add_quote(Quote::new(Lex::COMMENT, "/*", "*/", QuoteFlags::MULTI_LINE));
            string_quotes(&mut lexer);
            lexer.set_delimiters("!\"$%&'()*+,./:;<=>?@[\\]^`{|}~");
            add_regex(&mut lexer, PREPROC, r"@\w+");
            lexer.add_prefix(SPECIAL, "#");
            lexer.add_suffix(TYPE, "-color");
        }
        FileType::Python => {
            lexer.add_quote(Quote::new(DOC, "\"\"\"", "\"\"\"", QuoteFlags::MULTI_LINE));
            lexer.add_quote(Quote::new(DOC, "'''", "'''", QuoteFlags::MULTI_LINE));
            lexer.add_quote(Quote::new(Lex::COMMENT, "#", "", QuoteFlags::empty()));
            string_quotes(&mut lexer);
            lexer.add_anyof(STATEMENT, PYTHON_KEYWORDS.iter().copied());
            lexer.add_prev(FUNCTION, "def");
            lexer.add_prev(TYPE, "class");
            add_regex(&mut lexer, PREPROC, r"@\w+");
            common_constants(&mut lexer, &["True", "False"], &["None"]);
            lexer.add_next(FUNCTION, '(');
        }
        FileType::Lua => {
            add_regex_quote(&mut lexer, DOC, r"--\[(=*)\[", r"]\1]", QuoteFlags::MULTI_LINE);
            add_regex_quote(&mut lexer, Lex::STRING, r"\[(=*)\[", r"]\1]", QuoteFlags::MULTI_LINE);
            lexer.add_quote(Quote::new(Lex::COMMENT, "--", "", QuoteFlags::empty()));
            string_quotes(&mut lexer);
            lexer.add_anyof(STATEMENT, LUA_KEYWORDS.iter().copied());
            lexer.add_prev(FUNCTION, "function");
            common_constants(&mut lexer, &["true", "false"], &["nil"]);
            lexer.set_operators("+-*/%^#=~<>:.");
            lexer.add_next(FUNCTION, '(');
        }
        FileType::Yaml => {
            lexer.add_quote(Quote::new(Lex::COMMENT, "#", "", QuoteFlags::empty()));
            string_quotes(&mut lexer);
            add_regex(&mut lexer, Lex::major(LexMajor::Identifier), r"^\s*-?\s*[\w.]+\s*:");
            common_constants(&mut lexer, &["true", "false", "yes", "no"], &["null"]);
        }
    }
    lexer
}

fn slash_comments(lexer: &mut Lexer) {
    lexer.add_quote(Quote::new(Lex::COMMENT, "/*", "*/", QuoteFlags::MULTI_LINE));
    lexer.add_quote(Quote::new(Lex::COMMENT, "//", "", QuoteFlags::empty()));
}

fn string_quotes(lexer: &mut Lexer) {
    lexer.add_quote(Quote::new(Lex::STRING, "\"", "\"", QuoteFlags::ESCAPE));
    lexer.add_quote(Quote::new(Lex::CHAR, "'", "'", QuoteFlags::ESCAPE));
}

fn common_constants(lexer: &mut Lexer, bools: &[&str], nulls: &[&str]) {
    lexer.add_anyof(BOOL, bools.iter().copied());
    lexer.add_anyof(NULL, nulls.iter().copied());
}

fn c_like(lexer: &mut Lexer, keywords: &[&str], types: &[&str]) {
    slash_comments(lexer);
    lexer.add_quote(Quote::new(
        Lex::STRING,
        "\"",
        "\"",
        QuoteFlags::ESCAPE | QuoteFlags::ESCAPE_EOL,
    ));
    lexer.add_quote(Quote::new(Lex::CHAR, "'", "'", QuoteFlags::ESCAPE));
    add_regex(lexer, PREPROC, r"#\s*elif\s+!?\s*defined\b");
    add_regex(lexer, PREPROC, r"^\s*#\s*\w+");
    lexer.add_anyof(STATEMENT, keywords.iter().copied());
    lexer.add_anyof(TYPE, types.iter().copied());
    lexer.add_suffix(TYPE, "_t");
    lexer.add_prev(TYPE, "struct");
    lexer.add_prev(TYPE, "union");
    lexer.add_prev(TYPE, "enum");
    common_constants(lexer, &["true", "false"], &["NULL", "nullptr"]);
    lexer.add_next(FUNCTION, '(');
}

fn add_regex(lexer: &mut Lexer, lex: Lex, pattern: &str) {
    if let Err(e) = lexer.add_regex(lex, pattern) {
        report(pattern, &e);
    }
}

fn add_regex_quote(lexer: &mut Lexer, lex: Lex, start: &str, end: &str, flags: QuoteFlags) {
    if let Err(e) = lexer.add_regex_quote(lex, start, end, flags) {
        report(start, &e);
    }
}

fn report(pattern: &str, error: &PatternError) {
    tracing::warn!("Skipping built-in lex pattern {:?}: {}", pattern, error);
}

const C_KEYWORDS: &[&str] = &[
    "break", "case", "continue", "default", "do", "else", "for", "goto", "if", "return",
    "sizeof", "switch", "while", "typedef", "extern", "static", "inline", "const", "volatile",
    "register",
];

const C_TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "struct", "union", "enum",
];

const CPP_KEYWORDS: &[&str] = &[
    "class", "namespace", "template", "typename", "public", "private", "protected", "virtual",
    "override", "new", "delete", "this", "throw", "try", "catch", "using", "operator", "friend",
    "constexpr", "auto",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "break", "case", "catch", "class", "continue", "default", "do", "else",
    "extends", "final", "finally", "for", "if", "implements", "import", "instanceof",
    "interface", "new", "package", "private", "protected", "public", "return", "static",
    "super", "switch", "synchronized", "this", "throw", "throws", "try", "while",
];

const JAVA_TYPES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void", "String",
];

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "break", "case", "catch", "class", "continue", "default", "do", "else", "enum",
    "finally", "for", "foreach", "if", "in", "interface", "internal", "namespace", "new",
    "override", "private", "protected", "public", "return", "sealed", "static", "struct",
    "switch", "this", "throw", "try", "using", "var", "virtual", "while",
];

const CSHARP_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object", "short",
    "string", "uint", "ulong", "void",
];

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
    "delete", "do", "else", "export", "extends", "finally", "for", "function", "if", "import",
    "in", "instanceof", "let", "new", "of", "return", "switch", "this", "throw", "try",
    "typeof", "var", "while", "yield",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const GO_TYPES: &[&str] = &[
    "bool", "byte", "error", "float32", "float64", "int", "int8", "int16", "int32", "int64",
    "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "type",
    "unsafe", "use", "where", "while",
];

const RUST_TYPES: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
    "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Option", "Result", "Box",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
    "yield",
];

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "for", "function", "goto", "if", "in",
    "local", "not", "or", "repeat", "return", "then", "until", "while",
];
