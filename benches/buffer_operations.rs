//! Benchmarks for text buffer edits and the action log
//!
//! Run with: cargo bench --bench buffer_operations

use linewise::file_type::FileType;
use linewise::text::{FindOptions, LineRange, SeekType, TextBuffer, TextPoint, TextUnit};
use linewise::Action;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn plain(line_count: usize) -> TextBuffer {
    TextBuffer::from_text(
        &"The quick brown fox jumps over the lazy dog.\n".repeat(line_count),
        FileType::PlainText,
    )
}

// ============================================================================
// Edit primitives
// ============================================================================

#[divan::bench(args = [1_000, 10_000])]
fn insert_text_middle(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| plain(line_count))
        .bench_local_values(|mut buffer| {
            let mid = TextPoint::new(10, line_count / 2);
            buffer.insert_text(mid, divan::black_box("inserted\ntext\n"));
            buffer
        });
}

#[divan::bench(args = [1_000, 10_000])]
fn delete_text_block(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| plain(line_count))
        .bench_local_values(|mut buffer| {
            let begin = TextPoint::new(4, line_count / 2);
            let end = TextPoint::new(4, line_count / 2 + 100);
            divan::black_box(buffer.delete_text(linewise::text::TextRange::new(begin, end)));
            buffer
        });
}

#[divan::bench]
fn longest_line_after_edits(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| plain(10_000))
        .bench_local_values(|mut buffer| {
            for ln in 1..100 {
                buffer.delete_string(TextPoint::new(0, ln), 10, false);
            }
            divan::black_box(buffer.longest_line_length());
            buffer
        });
}

// ============================================================================
// Action log (realistic typing pattern)
// ============================================================================

#[divan::bench]
fn type_words_then_undo(bencher: divan::Bencher) {
    bencher.with_inputs(|| plain(1_000)).bench_local_values(|mut buffer| {
        let mut caret = TextPoint::new(0, 500);
        for c in "let answer = compute(41) + 1;".chars() {
            if let Some(next) = buffer.add_action(Action::insert_char(caret, c)) {
                caret = next;
            }
        }
        while buffer.can_undo() {
            buffer.undo();
        }
        buffer
    });
}

#[divan::bench]
fn backspace_merge(bencher: divan::Bencher) {
    bencher.with_inputs(|| plain(1_000)).bench_local_values(|mut buffer| {
        let mut caret = TextPoint::new(40, 500);
        for _ in 0..40 {
            if let Some(next) = buffer.add_action(Action::delete(caret, TextUnit::Char, SeekType::Prev)) {
                caret = next;
            }
        }
        buffer
    });
}

// ============================================================================
// Queries
// ============================================================================

#[divan::bench(args = [1_000, 10_000])]
fn find_all_plain(bencher: divan::Bencher, line_count: usize) {
    let buffer = plain(line_count);
    bencher.bench_local(|| {
        buffer
            .find_string_all(divan::black_box("lazy"), buffer.whole_range(), FindOptions::default())
            .map(|found| found.len())
    });
}

#[divan::bench]
fn auto_indent_c_file(bencher: divan::Bencher) {
    let source = "int f(int a) {\nif (a) {\nreturn g(a,\nb);\n}\nreturn 0;\n}\n".repeat(200);
    bencher
        .with_inputs(|| TextBuffer::from_text(&source, FileType::C))
        .bench_local_values(|mut buffer| {
            let lines = LineRange::new(1, buffer.line_count());
            buffer.add_action(Action::auto_indent_range(lines, TextPoint::new(0, 1)));
            buffer
        });
}
