//! Background search across files

use std::fs;
use std::path::{Path, PathBuf};

use linewise::search::{BatchSearch, FileMatch, SearchError, SearchMessage};
use linewise::text::{FindOptions, TextPoint, TextRange};
use tempfile::{tempdir, TempDir};

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("src/lib.rs"), "fn foo() {}\n\nfn bar() { foo(); }\n").unwrap();
    fs::write(root.join("src/notes.txt"), "Nothing here\n").unwrap();
    fs::write(root.join("README"), "FOO and foo\r\n").unwrap();
    fs::write(root.join("blob.bin"), [0u8, 0, 0, b'f', b'o', b'o']).unwrap();
    fs::write(root.join(".git/HEAD"), "foo").unwrap();
    dir
}

/// Drain a search into (relative path, outcome) pairs plus the summary
fn collect(search: &BatchSearch, root: &Path) -> (Vec<(PathBuf, Result<Vec<FileMatch>, SearchError>)>, usize, bool) {
    let mut files = Vec::new();
    for message in search.messages() {
        match message {
            SearchMessage::File { path, result } => {
                files.push((path.strip_prefix(root).unwrap().to_path_buf(), result));
            }
            SearchMessage::Finished { searched, cancelled } => return (files, searched, cancelled),
        }
    }
    panic!("search ended without a Finished message");
}

#[test]
fn test_search_walks_files_in_order() {
    let dir = fixture();
    let search = BatchSearch::start("foo", FindOptions::default(), vec![dir.path().to_path_buf()]).unwrap();
    let (files, searched, cancelled) = collect(&search, dir.path());
    search.join();

    assert!(!cancelled);
    assert_eq!(searched, files.len());
    let names: Vec<&Path> = files.iter().map(|(path, _)| path.as_path()).collect();
    assert_eq!(
        names,
        vec![
            Path::new("README"),
            Path::new("blob.bin"),
            Path::new("src/lib.rs"),
            Path::new("src/notes.txt"),
        ]
    );

    let readme = files[0].1.as_ref().unwrap();
    assert_eq!(readme.len(), 1);
    assert_eq!(readme[0].line_text, "FOO and foo");

    assert!(files[1].1.is_err());

    let lib = files[2].1.as_ref().unwrap();
    assert_eq!(
        lib.iter().map(|m| m.range).collect::<Vec<_>>(),
        vec![
            TextRange::new(TextPoint::new(3, 1), TextPoint::new(6, 1)),
            TextRange::new(TextPoint::new(11, 3), TextPoint::new(14, 3)),
        ]
    );

    assert!(files[3].1.as_ref().unwrap().is_empty());
}

#[test]
fn test_ignore_case_and_whole_word() {
    let dir = fixture();
    let options = FindOptions {
        ignore_case: true,
        whole_word: true,
        ..Default::default()
    };
    let search = BatchSearch::start("foo", options, vec![dir.path().join("README")]).unwrap();
    let (files, searched, _) = collect(&search, dir.path());
    assert_eq!(searched, 1);
    assert_eq!(files[0].1.as_ref().unwrap().len(), 2);
}

#[test]
fn test_bad_regex_fails_up_front() {
    let options = FindOptions {
        regex: true,
        ..Default::default()
    };
    assert!(BatchSearch::start("(unclosed", options, vec![PathBuf::from(".")]).is_err());
}

#[test]
fn test_cancel_still_reports_finished() {
    let dir = fixture();
    let search = BatchSearch::start("foo", FindOptions::default(), vec![dir.path().to_path_buf()]).unwrap();
    search.cancel();
    assert!(search.is_cancelled());

    // The worker may finish before the flag is seen; either way the
    // sentinel counts exactly the files it reported
    let (files, searched, _) = collect(&search, dir.path());
    assert_eq!(searched, files.len());
    assert!(searched <= 4);
}

#[test]
fn test_missing_file_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.txt");
    let search = BatchSearch::start("x", FindOptions::default(), vec![missing]).unwrap();
    let (files, searched, _) = collect(&search, dir.path());
    assert_eq!(searched, 1);
    assert!(matches!(files[0].1, Err(SearchError::Open(_))));
}
