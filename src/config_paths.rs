//! Centralized configuration paths for linewise
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/linewise/`
//! - Windows: `%APPDATA%\linewise\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::file_type::FileType;

const APP_DIR: &str = "linewise";
const LOG_FILE_PREFIX: &str = "linewise.log";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/linewise`
///   - Else: `~/.config/linewise`
///
/// Windows:
///   - `%APPDATA%\linewise`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/linewise/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/linewise/lex/`
pub fn lex_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("lex"))
}

/// `~/.config/linewise/lex/<file-type>.yaml`
pub fn lex_file(file_type: FileType) -> Option<PathBuf> {
    lex_dir().map(|dir| dir.join(format!("{}.yaml", file_type.name())))
}

/// `~/.config/linewise/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

pub(crate) fn log_file_prefix() -> &'static str {
    LOG_FILE_PREFIX
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_config_dir() {
        let Some(dir) = config_dir() else {
            return;
        };
        assert!(dir.ends_with(APP_DIR));
        assert_eq!(config_file(), Some(dir.join("config.yaml")));
        assert_eq!(lex_file(FileType::Cpp), Some(dir.join("lex").join("cpp.yaml")));
        assert_eq!(logs_dir(), Some(dir.join("logs")));
    }
}
