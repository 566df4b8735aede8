//! Utility modules

pub mod file_validation;
pub mod text;

pub use text::{char_type, is_word_boundary, CharType};

pub use file_validation::{is_likely_binary, validate_file_for_opening, FileOpenError, MAX_FILE_SIZE};
