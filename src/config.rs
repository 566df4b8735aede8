//! Configuration persistence
//!
//! Editing preferences live in `~/.config/linewise/config.yaml`; per file
//! type lexical overrides in `~/.config/linewise/lex/<file-type>.yaml`.
//! Missing or broken files fall back to defaults with a warning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::file_type::FileType;
use crate::lex::{Lex, Lexer, Quote, QuoteFlags};
use crate::text::FileFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Editing preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_stop: usize,
    pub shift_width: usize,
    /// Indent with spaces instead of tabs
    pub expand_tab: bool,
    /// `unix`, `win` or `mac`; used when a buffer has no line break to detect
    pub line_ending: String,
    /// Consecutive deletes closer than this merge into one undo step
    pub undo_merge_interval_ms: u64,
    pub max_undo: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            shift_width: 4,
            expand_tab: true,
            line_ending: FileFormat::default().name().to_string(),
            undo_merge_interval_ms: 1000,
            max_undo: 1000,
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }
        read_yaml(path).unwrap_or_default()
    }

    /// Save config to disk, creating the config directory if needed
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Configured line ending; unknown names mean unix
    pub fn file_format(&self) -> FileFormat {
        FileFormat::from_name(&self.line_ending).unwrap_or_else(|| {
            tracing::warn!("Unknown line ending '{}', using unix", self.line_ending);
            FileFormat::Unix
        })
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(value) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config at {}: {}", path.display(), e);
            None
        }
    }
}

// =============================================================================
// Lexical overrides
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRuleConfig {
    /// Dotted lex name, e.g. `comment` or `constant.string`
    pub lex: String,
    pub start: String,
    /// End token; for regex quotes a template with `\1`..`\9`
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub multi_line: bool,
    #[serde(default)]
    pub escape_eol: bool,
    #[serde(default)]
    pub escape: bool,
}

impl QuoteRuleConfig {
    fn flags(&self) -> QuoteFlags {
        let mut flags = QuoteFlags::empty();
        flags.set(QuoteFlags::MULTI_LINE, self.multi_line);
        flags.set(QuoteFlags::ESCAPE_EOL, self.escape_eol);
        flags.set(QuoteFlags::ESCAPE, self.escape);
        flags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexRuleConfig {
    pub lex: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordsRuleConfig {
    pub lex: String,
    pub words: Vec<String>,
}

/// Rules added on top of a file type's built-in lexer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexConfig {
    pub ignore_case: Option<bool>,
    pub delimiters: Option<String>,
    pub operators: Option<String>,
    pub quotes: Vec<QuoteRuleConfig>,
    pub regex_quotes: Vec<QuoteRuleConfig>,
    pub regexes: Vec<RegexRuleConfig>,
    pub anyofs: Vec<WordsRuleConfig>,
    pub prefixes: Vec<WordsRuleConfig>,
    pub suffixes: Vec<WordsRuleConfig>,
    pub prevs: Vec<WordsRuleConfig>,
    /// Each word is a single char
    pub nexts: Vec<WordsRuleConfig>,
}

impl LexConfig {
    /// Overrides for `file_type`, if the user has any
    pub fn load(file_type: FileType) -> Option<Self> {
        let path = crate::config_paths::lex_file(file_type)?;
        if !path.exists() {
            return None;
        }
        read_yaml(&path)
    }

    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Add the rules to `lexer`. Rules with an unknown lex name or a bad
    /// pattern are skipped with a warning.
    pub fn apply(&self, lexer: &mut Lexer) {
        if let Some(ignore_case) = self.ignore_case {
            lexer.set_ignore_case(ignore_case);
        }
        if let Some(delimiters) = &self.delimiters {
            lexer.set_delimiters(delimiters);
        }
        if let Some(operators) = &self.operators {
            lexer.set_operators(operators);
        }

        for rule in &self.quotes {
            if rule.start.is_empty() {
                tracing::warn!("Skipping quote rule for '{}': empty start token", rule.lex);
                continue;
            }
            if let Some(lex) = parse_lex(&rule.lex) {
                lexer.add_quote(Quote::new(lex, &rule.start, &rule.end, rule.flags()));
            }
        }
        for rule in &self.regex_quotes {
            let Some(lex) = parse_lex(&rule.lex) else {
                continue;
            };
            if let Err(e) = lexer.add_regex_quote(lex, &rule.start, &rule.end, rule.flags()) {
                tracing::warn!("Skipping regex quote '{}': {}", rule.start, e);
            }
        }
        for rule in &self.regexes {
            let Some(lex) = parse_lex(&rule.lex) else {
                continue;
            };
            if let Err(e) = lexer.add_regex(lex, &rule.pattern) {
                tracing::warn!("Skipping regex '{}': {}", rule.pattern, e);
            }
        }
        for rule in &self.anyofs {
            if let Some(lex) = parse_lex(&rule.lex) {
                lexer.add_anyof(lex, rule.words.iter().map(String::as_str));
            }
        }
        let word_rules: [(&Vec<WordsRuleConfig>, fn(&mut Lexer, Lex, &str)); 3] = [
            (&self.prefixes, Lexer::add_prefix),
            (&self.suffixes, Lexer::add_suffix),
            (&self.prevs, Lexer::add_prev),
        ];
        for (rules, add) in word_rules {
            for rule in rules {
                if let Some(lex) = parse_lex(&rule.lex) {
                    for word in &rule.words {
                        add(lexer, lex, word);
                    }
                }
            }
        }
        for rule in &self.nexts {
            let Some(lex) = parse_lex(&rule.lex) else {
                continue;
            };
            for word in &rule.words {
                let mut chars = word.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => lexer.add_next(lex, c),
                    _ => tracing::warn!("Skipping next rule '{}': expected one char", word),
                }
            }
        }
    }
}

fn parse_lex(name: &str) -> Option<Lex> {
    match name.parse() {
        Ok(lex) => Some(lex),
        Err(e) => {
            tracing::warn!("Skipping lex rule: {}", e);
            None
        }
    }
}
