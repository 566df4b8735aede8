//! Character classes and tab arithmetic shared by seek, search and indent

/// Character type for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Characters that are part of a word
    WordChar,
    /// Delimiters of the current file type
    Punctuation,
}

/// Get the character type against a file type's delimiter set
pub fn char_type(ch: char, delimiters: &str) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if delimiters.contains(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Check if a character ends a word (delimiter or whitespace)
pub fn is_word_boundary(ch: char, delimiters: &str) -> bool {
    char_type(ch, delimiters) != CharType::WordChar
}

pub fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Width of the leading whitespace in columns, tabs expanded to `tab_stop`
pub fn indent_width(text: &[char], tab_stop: usize) -> usize {
    let spaces = text.iter().take_while(|c| is_space(**c)).count();
    char_col_to_visual_col(text, spaces, tab_stop)
}

/// Convert a character column to visual column (screen position).
/// Accounts for tab expansion when converting character index to screen position.
pub fn char_col_to_visual_col(text: &[char], char_col: usize, tab_stop: usize) -> usize {
    let mut visual_col = 0;

    for (i, ch) in text.iter().enumerate() {
        if i >= char_col {
            break;
        }

        if *ch == '\t' {
            let tab_width = tab_stop - (visual_col % tab_stop);
            visual_col += tab_width;
        } else {
            visual_col += 1;
        }
    }

    visual_col
}

/// Leading whitespace for an indent of `width` columns
pub fn make_indent(width: usize, tab_stop: usize, expand_tab: bool) -> String {
    if expand_tab || tab_stop == 0 {
        " ".repeat(width)
    } else {
        let mut indent = "\t".repeat(width / tab_stop);
        indent.push_str(&" ".repeat(width % tab_stop));
        indent
    }
}
