//! File type identification
//!
//! Maps file extensions to file types. The file type picks the built-in
//! lexical rules, the default indent function and the name of the YAML
//! override file under `<config dir>/lex/`.

use std::fmt;
use std::path::Path;

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    #[default]
    PlainText,
    // C family
    C,
    Cpp,
    Java,
    CSharp,
    JavaScript,
    Go,
    Rust,
    Css,
    // Others
    Python,
    Lua,
    Yaml,
}

impl FileType {
    pub const ALL: &'static [FileType] = &[
        FileType::PlainText,
        FileType::C,
        FileType::Cpp,
        FileType::Java,
        FileType::CSharp,
        FileType::JavaScript,
        FileType::Go,
        FileType::Rust,
        FileType::Css,
        FileType::Python,
        FileType::Lua,
        FileType::Yaml,
    ];

    /// Detect file type from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "c" | "h" => FileType::C,
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => FileType::Cpp,
            "java" => FileType::Java,
            "cs" => FileType::CSharp,
            "js" | "mjs" | "cjs" => FileType::JavaScript,
            "go" => FileType::Go,
            "rs" => FileType::Rust,
            "css" => FileType::Css,
            "py" | "pyw" => FileType::Python,
            "lua" => FileType::Lua,
            "yaml" | "yml" => FileType::Yaml,
            _ => FileType::PlainText,
        }
    }

    /// Detect file type from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::PlainText)
    }

    /// Parse the short name used in config files and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.iter().copied().find(|ft| ft.name() == name)
    }

    /// Short lowercase name, also the stem of the lex override file
    pub fn name(&self) -> &'static str {
        match self {
            FileType::PlainText => "text",
            FileType::C => "c",
            FileType::Cpp => "cpp",
            FileType::Java => "java",
            FileType::CSharp => "csharp",
            FileType::JavaScript => "javascript",
            FileType::Go => "go",
            FileType::Rust => "rust",
            FileType::Css => "css",
            FileType::Python => "python",
            FileType::Lua => "lua",
            FileType::Yaml => "yaml",
        }
    }

    /// Get display name for the file type
    pub fn display_name(&self) -> &'static str {
        match self {
            FileType::PlainText => "Plain Text",
            FileType::C => "C",
            FileType::Cpp => "C++",
            FileType::Java => "Java",
            FileType::CSharp => "C#",
            FileType::JavaScript => "JavaScript",
            FileType::Go => "Go",
            FileType::Rust => "Rust",
            FileType::Css => "CSS",
            FileType::Python => "Python",
            FileType::Lua => "Lua",
            FileType::Yaml => "YAML",
        }
    }

    /// Brace-structured languages sharing the C-family indent heuristic
    pub fn is_c_family(&self) -> bool {
        matches!(
            self,
            FileType::C
                | FileType::Cpp
                | FileType::Java
                | FileType::CSharp
                | FileType::JavaScript
                | FileType::Go
                | FileType::Rust
                | FileType::Css
        )
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("c"), FileType::C);
        assert_eq!(FileType::from_extension("HPP"), FileType::Cpp);
        assert_eq!(FileType::from_extension("lua"), FileType::Lua);
        assert_eq!(FileType::from_extension("yml"), FileType::Yaml);
        assert_eq!(FileType::from_extension("txt"), FileType::PlainText);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path(Path::new("/src/main.rs")), FileType::Rust);
        assert_eq!(FileType::from_path(Path::new("setup.py")), FileType::Python);
        assert_eq!(
            FileType::from_path(Path::new("Makefile")),
            FileType::PlainText
        );
    }

    #[test]
    fn test_names_round_trip() {
        for ft in FileType::ALL {
            assert_eq!(FileType::from_name(ft.name()), Some(*ft));
        }
        assert_eq!(FileType::from_name("cobol"), None);
    }
}
