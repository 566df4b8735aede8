//! Pre-flight checks before a file is loaded into a buffer
//!
//! Batch search walks arbitrary paths, so it validates each candidate first:
//! - File existence and permissions
//! - File size limits
//! - Binary content detection

use std::fs;
use std::path::Path;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Number of leading bytes inspected by [`is_likely_binary`]
const SNIFF_LEN: usize = 8192;

/// Reasons a path is not opened
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileOpenError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("is a directory")]
    IsDirectory,
    #[error("binary file")]
    BinaryFile,
    #[error("file too large ({size_mb:.1} MB)")]
    TooLarge { size_mb: f64 },
    #[error("{0}")]
    IoError(String),
}

/// Validate a file before attempting to open it
///
/// Does NOT check for binary content (use `is_likely_binary` on the bytes)
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound,
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied,
        _ => FileOpenError::IoError(e.to_string()),
    })?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Check if raw file content is likely binary by scanning for null bytes.
///
/// Content starting with a UTF-16 byte order mark is text even though it is
/// full of null bytes.
pub fn is_likely_binary(bytes: &[u8]) -> bool {
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return false;
    }
    bytes[..bytes.len().min(SNIFF_LEN)].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_detection() {
        assert!(!is_likely_binary(b"plain text\n"));
        assert!(is_likely_binary(b"ELF\0\x01\x02"));
        assert!(!is_likely_binary(&[0xFF, 0xFE, b'a', 0]));
    }

    #[test]
    fn test_validate_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            validate_file_for_opening(&dir.path().join("missing.txt")),
            Err(FileOpenError::NotFound)
        );
        assert_eq!(
            validate_file_for_opening(dir.path()),
            Err(FileOpenError::IsDirectory)
        );

        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        assert_eq!(validate_file_for_opening(&file), Ok(()));
    }
}
