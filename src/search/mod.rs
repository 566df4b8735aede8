//! Cancellable search across many files
//!
//! A [`BatchSearch`] runs on its own thread. It loads each candidate into a
//! buffer it owns, runs the buffer's synchronous search and posts one
//! [`SearchMessage::File`] per file, then a final [`SearchMessage::Finished`].
//! Cancellation is checked between files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::file_type::FileType;
use crate::text::file_io::{self, FileError};
use crate::text::{FindError, FindOptions, Finder, TextBuffer, TextOptions, TextRange};
use crate::util::file_validation::{is_likely_binary, validate_file_for_opening, FileOpenError};

/// One match inside a searched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    pub range: TextRange,
    /// Full text of the line holding the match
    pub line_text: String,
}

/// Why a file could not be searched
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Open(#[from] FileOpenError),
    #[error(transparent)]
    Load(#[from] FileError),
}

#[derive(Debug)]
pub enum SearchMessage {
    /// A file was processed
    File {
        path: PathBuf,
        result: Result<Vec<FileMatch>, SearchError>,
    },
    /// Always the last message
    Finished { searched: usize, cancelled: bool },
}

/// Handle to a running search
pub struct BatchSearch {
    cancel: Arc<AtomicBool>,
    rx: Receiver<SearchMessage>,
    handle: Option<JoinHandle<()>>,
}

impl BatchSearch {
    /// Start searching `paths` (files or directories) for `needle`. The
    /// needle is compiled up front so a bad pattern fails here.
    pub fn start(needle: &str, options: FindOptions, paths: Vec<PathBuf>) -> Result<Self, FindError> {
        let finder = Finder::new(needle, options)?;
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker_cancel = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || {
            run(&finder, paths, &worker_cancel, &tx);
        });

        Ok(Self {
            cancel,
            rx,
            handle: Some(handle),
        })
    }

    /// Ask the worker to stop after the file it is on
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Messages posted so far (non-blocking)
    pub fn poll(&self) -> Vec<SearchMessage> {
        self.rx.try_iter().collect()
    }

    /// Block until the next message. `None` once the worker is gone.
    pub fn recv(&self) -> Option<SearchMessage> {
        self.rx.recv().ok()
    }

    /// Blocking iterator over the remaining messages, ending after
    /// [`SearchMessage::Finished`]
    pub fn messages(&self) -> impl Iterator<Item = SearchMessage> + '_ {
        self.rx.iter()
    }

    /// Wait for the worker thread to exit
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Batch search worker panicked");
            }
        }
    }
}

impl Drop for BatchSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(finder: &Finder, paths: Vec<PathBuf>, cancel: &AtomicBool, tx: &Sender<SearchMessage>) {
    let files = collect_candidates(&paths);
    tracing::info!("Batch search over {} file(s)", files.len());

    let mut searched = 0;
    let mut cancelled = false;
    for path in files {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }
        let result = search_file(finder, &path);
        if let Err(e) = &result {
            tracing::debug!("Skipping {}: {}", path.display(), e);
        }
        searched += 1;
        if tx.send(SearchMessage::File { path, result }).is_err() {
            // Receiver dropped
            return;
        }
    }

    tracing::info!("Batch search finished: {} searched, cancelled={}", searched, cancelled);
    let _ = tx.send(SearchMessage::Finished { searched, cancelled });
}

/// Search one file in a private buffer
pub fn search_file(finder: &Finder, path: &Path) -> Result<Vec<FileMatch>, SearchError> {
    validate_file_for_opening(path)?;
    let bytes = fs::read(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if is_likely_binary(&bytes) {
        return Err(FileOpenError::BinaryFile.into());
    }
    let decoded = match file_io::decode(&bytes, None, path) {
        Ok(decoded) => decoded,
        Err(FileError::EmptyFile(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut buffer = TextBuffer::with_options(FileType::from_path(path), TextOptions::default());
    buffer.load_decoded(decoded);
    let matches = buffer
        .find_all_with(finder, buffer.whole_range())
        .into_iter()
        .map(|range| FileMatch {
            range,
            line_text: buffer.line_text(range.begin().y),
        })
        .collect();
    Ok(matches)
}

/// Expand directories recursively into sorted file lists, skipping hidden
/// entries and build output
pub fn collect_candidates(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut files);
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| !should_ignore(path))
        .collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk_dir(&path, files);
        } else {
            files.push(path);
        }
    }
}

/// Hidden files, VCS metadata and build artifacts
fn should_ignore(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    name.starts_with('.')
        || matches!(
            name.as_ref(),
            "target" | "node_modules" | "__pycache__" | "Thumbs.db"
        )
}
