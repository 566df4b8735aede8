//! linewise command-line front end

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

use linewise::config::EditorConfig;
use linewise::file_type::FileType;
use linewise::lex;
use linewise::search::{BatchSearch, SearchMessage};
use linewise::text::{FindOptions, LineRange, TextBuffer, TextOptions, TextPoint};
use linewise::tracing::BufferSnapshot;
use linewise::Action;

mod cli;

use cli::{CliArgs, Task};

#[derive(Serialize)]
struct LexSpan {
    offset: usize,
    len: usize,
    lex: String,
}

#[derive(Serialize)]
struct LineDump {
    line: usize,
    text: String,
    spans: Vec<LexSpan>,
    /// Set when the line ends inside a multi-line quote
    open_quote: bool,
}

fn main() -> Result<()> {
    linewise::tracing::init();

    let args = CliArgs::parse();
    let mut config = EditorConfig::load();
    if let Some(width) = args.shift_width {
        config.shift_width = width;
    }
    if args.tabs {
        config.expand_tab = false;
    }
    let options = TextOptions::from(&config);

    let task = match args.into_task() {
        Ok(task) => task,
        Err(e) => bail!(e),
    };
    tracing::debug!("Running {:?}", task);

    match task {
        Task::Lex {
            path,
            file_type,
            json,
        } => run_lex(&path, file_type, json, options),
        Task::Indent {
            path,
            file_type,
            lines,
            write,
        } => run_indent(&path, file_type, lines, write, options),
        Task::Find {
            needle,
            paths,
            options: find_options,
        } => run_find(&needle, find_options, paths),
        Task::Info { path } => run_info(&path, options),
    }
}

fn open(path: &Path, file_type: Option<FileType>, options: TextOptions) -> Result<TextBuffer> {
    let mut buffer = TextBuffer::load_file_with(path, None, options)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if let Some(file_type) = file_type {
        buffer.set_file_type(file_type, lex::lexer_for(file_type));
    }
    Ok(buffer)
}

fn run_lex(path: &Path, file_type: Option<FileType>, json: bool, options: TextOptions) -> Result<()> {
    let buffer = open(path, file_type, options)?;
    let dump: Vec<LineDump> = buffer
        .lines()
        .enumerate()
        .map(|(i, line)| LineDump {
            line: i + 1,
            text: line.text(),
            spans: line
                .lex_elems()
                .iter()
                .map(|elem| LexSpan {
                    offset: elem.offset,
                    len: elem.len,
                    lex: elem.lex.to_string(),
                })
                .collect(),
            open_quote: line.state_out().is_in_quote(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }
    for line in dump {
        let spans: Vec<String> = line
            .spans
            .iter()
            .map(|span| format!("{}+{}:{}", span.offset, span.len, span.lex))
            .collect();
        let marker = if line.open_quote { " ..." } else { "" };
        println!("{:>5} {}{}", line.line, spans.join(" "), marker);
    }
    Ok(())
}

fn run_indent(
    path: &Path,
    file_type: Option<FileType>,
    lines: Option<LineRange>,
    write: bool,
    options: TextOptions,
) -> Result<()> {
    let mut buffer = open(path, file_type, options)?;
    let line_count = buffer.line_count();
    let lines = match lines {
        Some(range) if range.first() > line_count => {
            bail!("Line {} is past the end ({} lines)", range.first(), line_count)
        }
        Some(range) => LineRange::new(range.first(), range.last().min(line_count)),
        None => LineRange::new(1, line_count),
    };

    let before = BufferSnapshot::of(&buffer);
    buffer.add_action(Action::auto_indent_range(lines, TextPoint::new(0, lines.first())));
    let after = BufferSnapshot::of(&buffer);
    match before.diff(&after) {
        Some(diff) => tracing::info!("Indent {} lines {}: {}", path.display(), lines, diff),
        None => tracing::info!("Indent {} lines {}: no change", path.display(), lines),
    }

    if write {
        if buffer.is_modified() {
            buffer
                .save_file(None)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }
    } else {
        println!("{}", buffer.text());
    }
    Ok(())
}

fn run_find(needle: &str, options: FindOptions, paths: Vec<std::path::PathBuf>) -> Result<()> {
    let search = BatchSearch::start(needle, options, paths)?;
    let mut total = 0;
    for message in search.messages() {
        match message {
            SearchMessage::File { path, result } => match result {
                Ok(matches) => {
                    for m in &matches {
                        let begin = m.range.begin();
                        println!("{}:{}:{}: {}", path.display(), begin.y, begin.x + 1, m.line_text);
                    }
                    total += matches.len();
                }
                Err(e) => tracing::warn!("Skipped {}: {}", path.display(), e),
            },
            SearchMessage::Finished { searched, cancelled } => {
                tracing::info!(
                    "{} match(es) in {} file(s){}",
                    total,
                    searched,
                    if cancelled { ", cancelled" } else { "" }
                );
                break;
            }
        }
    }
    search.join();
    Ok(())
}

fn run_info(path: &Path, options: TextOptions) -> Result<()> {
    let buffer = open(path, None, options)?;
    println!("path:         {}", path.display());
    println!("type:         {}", buffer.file_type().display_name());
    println!(
        "encoding:     {}{}",
        buffer.encoding().name(),
        if buffer.has_bom() { " (BOM)" } else { "" }
    );
    println!("line ending:  {}", buffer.file_format());
    println!("lines:        {}", buffer.line_count());
    println!("longest line: {}", buffer.longest_line_length());
    Ok(())
}
