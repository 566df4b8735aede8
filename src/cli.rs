//! Command-line argument parsing
//!
//! Supports:
//! - Dumping the lexical analysis of a file
//! - Re-indenting a file or a line range
//! - Searching many files at once
//! - Showing buffer metadata

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use linewise::file_type::FileType;
use linewise::text::{FindOptions, LineRange};

/// A line-oriented text document engine
#[derive(Parser, Debug)]
#[command(name = "linewise", version, about = "A line-oriented text document engine")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Override the configured indent width
    #[arg(long, global = true, value_name = "N")]
    pub shift_width: Option<usize>,

    /// Indent with tabs instead of spaces
    #[arg(long, global = true)]
    pub tabs: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print the lexical tags of every line
    Lex {
        path: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        file_type: FileTypeArg,
    },
    /// Re-indent a file
    Indent {
        path: PathBuf,

        /// Only these lines, as FIRST:LAST (1-based, inclusive)
        #[arg(long, value_name = "FIRST:LAST")]
        lines: Option<String>,

        /// Write the result back instead of printing it
        #[arg(short = 'w', long)]
        write: bool,

        #[command(flatten)]
        file_type: FileTypeArg,
    },
    /// Search files and directories for a string or pattern
    Find {
        needle: String,

        /// Files or directories to search
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,

        /// Treat the needle as a regular expression
        #[arg(short = 'r', long)]
        regex: bool,

        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Only match whole words
        #[arg(short = 'W', long)]
        whole_word: bool,
    },
    /// Show encoding, line ending and size of a file
    Info { path: PathBuf },
}

#[derive(Args, Debug, Default)]
pub struct FileTypeArg {
    /// File type name (e.g. `cpp`, `python`); defaults to the extension
    #[arg(long = "type", value_name = "NAME")]
    pub name: Option<String>,
}

/// Validated work to do
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Lex {
        path: PathBuf,
        file_type: Option<FileType>,
        json: bool,
    },
    Indent {
        path: PathBuf,
        file_type: Option<FileType>,
        lines: Option<LineRange>,
        write: bool,
    },
    Find {
        needle: String,
        paths: Vec<PathBuf>,
        options: FindOptions,
    },
    Info {
        path: PathBuf,
    },
}

impl FileTypeArg {
    fn resolve(&self) -> Result<Option<FileType>, String> {
        match &self.name {
            None => Ok(None),
            Some(name) => FileType::from_name(name)
                .map(Some)
                .ok_or_else(|| format!("Unknown file type '{}'", name)),
        }
    }
}

impl CliArgs {
    /// Convert parsed args into a task, validating what clap cannot
    pub fn into_task(self) -> Result<Task, String> {
        let task = match self.command {
            CliCommand::Lex {
                path,
                json,
                file_type,
            } => Task::Lex {
                path,
                file_type: file_type.resolve()?,
                json,
            },
            CliCommand::Indent {
                path,
                lines,
                write,
                file_type,
            } => Task::Indent {
                path,
                file_type: file_type.resolve()?,
                lines: lines.as_deref().map(parse_line_range).transpose()?,
                write,
            },
            CliCommand::Find {
                needle,
                paths,
                regex,
                ignore_case,
                whole_word,
            } => {
                if needle.is_empty() {
                    return Err("Search needle cannot be empty".to_string());
                }
                Task::Find {
                    needle,
                    paths,
                    options: FindOptions {
                        regex,
                        ignore_case,
                        whole_word,
                        reverse: false,
                    },
                }
            }
            CliCommand::Info { path } => Task::Info { path },
        };
        Ok(task)
    }
}

/// Parse `FIRST:LAST` or a single line number
fn parse_line_range(s: &str) -> Result<LineRange, String> {
    let parse = |part: &str| -> Result<usize, String> {
        match part.trim().parse::<usize>() {
            Ok(0) => Err("Line numbers start at 1".to_string()),
            Ok(n) => Ok(n),
            Err(_) => Err(format!("Invalid line number '{}'", part)),
        }
    };
    let (first, last) = match s.split_once(':') {
        Some((first, last)) => (parse(first)?, parse(last)?),
        None => {
            let line = parse(s)?;
            (line, line)
        }
    };
    if first > last {
        return Err(format!("Line range {} is reversed", s));
    }
    Ok(LineRange::new(first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(args: &[&str]) -> Result<Task, String> {
        let mut argv = vec!["linewise"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).map_err(|e| e.to_string())?.into_task()
    }

    #[test]
    fn test_lex_with_type_override() {
        let task = task(&["lex", "a.txt", "--json", "--type", "cpp"]).unwrap();
        assert_eq!(
            task,
            Task::Lex {
                path: PathBuf::from("a.txt"),
                file_type: Some(FileType::Cpp),
                json: true,
            }
        );
    }

    #[test]
    fn test_unknown_file_type() {
        assert!(task(&["lex", "a.txt", "--type", "cobol"]).is_err());
    }

    #[test]
    fn test_indent_line_range() {
        let Task::Indent { lines, write, .. } = task(&["indent", "a.c", "--lines", "3:7", "-w"]).unwrap()
        else {
            panic!("Expected indent task");
        };
        assert_eq!(lines, Some(LineRange::new(3, 7)));
        assert!(write);

        let Task::Indent { lines, .. } = task(&["indent", "a.c", "--lines", "4"]).unwrap() else {
            panic!("Expected indent task");
        };
        assert_eq!(lines, Some(LineRange::single(4)));
    }

    #[test]
    fn test_bad_line_ranges() {
        assert!(parse_line_range("0:3").is_err());
        assert!(parse_line_range("5:2").is_err());
        assert!(parse_line_range("x").is_err());
    }

    #[test]
    fn test_find_options() {
        let Task::Find { options, paths, .. } = task(&["find", "foo", "src", "tests", "-r", "-i"]).unwrap()
        else {
            panic!("Expected find task");
        };
        assert!(options.regex && options.ignore_case && !options.whole_word);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_find_requires_paths_and_needle() {
        assert!(task(&["find", "foo"]).is_err());
        assert!(task(&["find", "", "src"]).is_err());
    }

    #[test]
    fn test_global_indent_flags() {
        let args = CliArgs::try_parse_from(["linewise", "indent", "a.py", "--shift-width", "2", "--tabs"]).unwrap();
        assert_eq!(args.shift_width, Some(2));
        assert!(args.tabs);
    }
}
