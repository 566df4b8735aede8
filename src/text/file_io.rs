//! Loading and saving buffers: encodings and line endings
//!
//! Loading sniffs a byte order mark, then tries UTF-8, then asks `chardetng`
//! for a guess; `encoding_rs` does the decoding. Saving re-encodes with the
//! buffer's encoding and falls back to UTF-8 (no BOM) when the content
//! cannot be represented.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::file_type::FileType;
use crate::lex;

use super::buffer::{TextBuffer, TextOptions};

/// Line ending convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    /// `\r\n`
    Win,
    /// `\n`
    #[default]
    Unix,
    /// `\r`
    Mac,
}

impl FileFormat {
    pub fn line_ending(&self) -> &'static str {
        match self {
            FileFormat::Win => "\r\n",
            FileFormat::Unix => "\n",
            FileFormat::Mac => "\r",
        }
    }

    /// Convention of the first line break in `text`
    pub fn detect(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let pos = bytes.iter().position(|b| *b == b'\r' || *b == b'\n')?;
        Some(match (bytes[pos], bytes.get(pos + 1)) {
            (b'\r', Some(b'\n')) => FileFormat::Win,
            (b'\r', _) => FileFormat::Mac,
            _ => FileFormat::Unix,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Win => "win",
            FileFormat::Unix => "unix",
            FileFormat::Mac => "mac",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "win" | "windows" | "crlf" | "dos" => Some(FileFormat::Win),
            "unix" | "lf" => Some(FileFormat::Unix),
            "mac" | "cr" => Some(FileFormat::Mac),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from loading or saving a file
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is empty")]
    EmptyFile(PathBuf),
    #[error("cannot decode {path} as {encoding}")]
    Encoding { path: PathBuf, encoding: &'static str },
}

/// Decoded file content
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    pub bom: bool,
}

/// Decode raw bytes. A `declared` encoding skips detection, though a BOM
/// still wins.
pub fn decode(bytes: &[u8], declared: Option<&'static Encoding>, path: &Path) -> Result<Decoded, FileError> {
    if bytes.is_empty() {
        return Err(FileError::EmptyFile(path.to_path_buf()));
    }

    let (encoding, bom_len) = match Encoding::for_bom(bytes) {
        Some((encoding, len)) => (encoding, len),
        None => (declared.unwrap_or_else(|| detect_encoding(bytes)), 0),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(FileError::Encoding {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }
    tracing::debug!(
        "Decoded {} as {}{}",
        path.display(),
        encoding.name(),
        if bom_len > 0 { " with BOM" } else { "" }
    );
    Ok(Decoded {
        text: text.into_owned(),
        encoding,
        bom: bom_len > 0,
    })
}

/// UTF-8 if the bytes are valid UTF-8, otherwise `chardetng`'s guess
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Encode `text`. Returns the bytes and the encoding actually used, which
/// is UTF-8 without BOM when `encoding` cannot represent the text.
pub fn encode(text: &str, encoding: &'static Encoding, bom: bool) -> (Vec<u8>, &'static Encoding, bool) {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        let little = encoding == UTF_16LE;
        let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
        if bom {
            bytes.extend_from_slice(if little { &[0xFFu8, 0xFE] } else { &[0xFEu8, 0xFF] });
        }
        for unit in text.encode_utf16() {
            let pair = if little { unit.to_le_bytes() } else { unit.to_be_bytes() };
            bytes.extend_from_slice(&pair);
        }
        return (bytes, encoding, bom);
    }

    if encoding == UTF_8 {
        let mut bytes = Vec::with_capacity(text.len() + 3);
        if bom {
            bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        }
        bytes.extend_from_slice(text.as_bytes());
        return (bytes, UTF_8, bom);
    }

    let (bytes, used, had_unmappable) = encoding.encode(text);
    if had_unmappable || used != encoding {
        tracing::warn!(
            "Content not representable in {}, falling back to UTF-8",
            encoding.name()
        );
        return (text.as_bytes().to_vec(), UTF_8, false);
    }
    (bytes.into_owned(), encoding, false)
}

/// Replace `\r\n` and lone `\r` with `\n`
fn normalize_line_breaks(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

impl TextBuffer {
    /// Load a file; the file type follows the extension and the user's lex
    /// overrides apply
    pub fn load_file(path: &Path, declared: Option<&'static Encoding>) -> Result<Self, FileError> {
        Self::load_file_with(path, declared, TextOptions::default())
    }

    pub fn load_file_with(
        path: &Path,
        declared: Option<&'static Encoding>,
        options: TextOptions,
    ) -> Result<Self, FileError> {
        let bytes = fs::read(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = decode(&bytes, declared, path)?;
        let file_type = FileType::from_path(path);

        let mut buffer = TextBuffer::with_options(file_type, options);
        buffer.set_lexer(lex::lexer_for(file_type));
        buffer.load_decoded(decoded);
        buffer.set_path(path);
        tracing::info!(
            "Loaded {} ({} lines, {}, {})",
            path.display(),
            buffer.line_count(),
            buffer.encoding().name(),
            buffer.file_format()
        );
        Ok(buffer)
    }

    /// Replace the content with decoded text; metadata follows it
    pub(crate) fn load_decoded(&mut self, decoded: Decoded) {
        if let Some(format) = FileFormat::detect(&decoded.text) {
            self.set_file_format(format);
        }
        self.set_encoding(decoded.encoding, decoded.bom);
        self.set_text(&normalize_line_breaks(&decoded.text));
    }

    /// Content joined with the buffer's line ending
    pub fn text_for_save(&self) -> String {
        let ending = self.file_format().line_ending();
        self.lines()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join(ending)
    }

    /// Save to `path`, or to the buffer's own path. On success the undo
    /// history moves to the saved partition.
    pub fn save_file(&mut self, path: Option<&Path>) -> Result<(), FileError> {
        let path = match path.or(self.path()) {
            Some(path) => path.to_path_buf(),
            None => {
                return Err(FileError::Io {
                    path: PathBuf::new(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "buffer has no path"),
                })
            }
        };

        let text = self.text_for_save();
        let (bytes, used, bom) = encode(&text, self.encoding(), self.has_bom());
        fs::write(&path, &bytes).map_err(|source| FileError::Io {
            path: path.clone(),
            source,
        })?;

        if used != self.encoding() || bom != self.has_bom() {
            self.set_encoding(used, bom);
        }
        self.set_path(&path);
        self.save_undo_actions();
        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

    #[test]
    fn test_detect_file_format() {
        assert_eq!(FileFormat::detect("a\r\nb\nc"), Some(FileFormat::Win));
        assert_eq!(FileFormat::detect("a\nb\r\n"), Some(FileFormat::Unix));
        assert_eq!(FileFormat::detect("a\rb"), Some(FileFormat::Mac));
        assert_eq!(FileFormat::detect("single"), None);
    }

    #[test]
    fn test_decode_bom_and_fallbacks() {
        let path = Path::new("t.txt");
        let decoded = decode(b"\xEF\xBB\xBFhi", None, path).unwrap();
        assert_eq!(decoded.text, "hi");
        assert_eq!(decoded.encoding, UTF_8);
        assert!(decoded.bom);

        let decoded = decode(&[0xFF, 0xFE, b'h', 0, b'i', 0], None, path).unwrap();
        assert_eq!(decoded.text, "hi");
        assert_eq!(decoded.encoding, UTF_16LE);

        let decoded = decode(b"caf\xE9", Some(WINDOWS_1252), path).unwrap();
        assert_eq!(decoded.text, "café");

        assert!(matches!(decode(b"", None, path), Err(FileError::EmptyFile(_))));
        assert!(matches!(
            decode(b"\xFF\xFF\xFE", Some(UTF_8), path),
            Err(FileError::Encoding { .. })
        ));
    }

    #[test]
    fn test_encode_falls_back_to_utf8() {
        let (bytes, used, bom) = encode("café", WINDOWS_1252, false);
        assert_eq!(bytes, b"caf\xE9");
        assert_eq!(used, WINDOWS_1252);
        assert!(!bom);

        let (bytes, used, bom) = encode("漢字 café", WINDOWS_1252, false);
        assert_eq!(used, UTF_8);
        assert!(!bom);
        assert_eq!(bytes, "漢字 café".as_bytes());

        let (_, used, _) = encode("漢字", SHIFT_JIS, false);
        assert_eq!(used, SHIFT_JIS);
    }

    #[test]
    fn test_encode_utf16_with_bom() {
        let (bytes, used, bom) = encode("hi", UTF_16BE, true);
        assert_eq!(bytes, vec![0xFE, 0xFF, 0, b'h', 0, b'i']);
        assert_eq!(used, UTF_16BE);
        assert!(bom);
    }
}
