//! Tracing setup and buffer state snapshots for diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=linewise::action=debug` - module-level filtering
//! - `RUST_LOG=linewise::text::buffer=trace` - every line notification
//!
//! # Log Files
//!
//! Logs are written to `~/.config/linewise/logs/linewise.log` with daily
//! rotation. File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::text::TextBuffer;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes
/// to the logs directory with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so command output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::log_file_prefix());
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of buffer state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSnapshot {
    pub line_count: usize,
    pub longest_line: usize,
    pub modified: bool,
    pub undo_count: usize,
    pub redo_count: usize,
    pub encoding: &'static str,
    pub file_format: &'static str,
}

impl BufferSnapshot {
    pub fn of(buffer: &TextBuffer) -> Self {
        Self {
            line_count: buffer.line_count(),
            longest_line: buffer.longest_line_length(),
            modified: buffer.is_modified(),
            undo_count: buffer.action_log().undo_count(),
            redo_count: buffer.action_log().redo_count(),
            encoding: buffer.encoding().name(),
            file_format: buffer.file_format().name(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &BufferSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.line_count != other.line_count {
            changes.push(format!("lines: {} → {}", self.line_count, other.line_count));
        }
        if self.longest_line != other.longest_line {
            changes.push(format!("longest: {} → {}", self.longest_line, other.longest_line));
        }
        if self.modified != other.modified {
            let status = if other.modified { "modified" } else { "clean" };
            changes.push(status.to_string());
        }
        if self.undo_count != other.undo_count || self.redo_count != other.redo_count {
            changes.push(format!(
                "undo/redo: {}/{} → {}/{}",
                self.undo_count, self.redo_count, other.undo_count, other.redo_count
            ));
        }
        if self.encoding != other.encoding {
            changes.push(format!("encoding: {} → {}", self.encoding, other.encoding));
        }
        if self.file_format != other.file_format {
            changes.push(format!("format: {} → {}", self.file_format, other.file_format));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
