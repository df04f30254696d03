//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout.
//!
//! ## Publish (tree)
//!
//! ```text
//! Published 3 documents as .html → public
//!     SYS.html
//!     REQ.html
//!     TST.html
//! Index → index.html
//! ```
//!
//! ## Publish (document)
//!
//! ```text
//! Published 1 document as .md → out/REQ.md
//! ```

use crate::publish::PublishReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// File name relative to `root` when possible, for compact listings.
fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn format_publish_output(report: &PublishReport, destination: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Published {} as {} → {}",
        plural(report.files.len(), "document"),
        report.format,
        destination.display()
    )];

    // A single file published directly is already named in the header.
    let is_directory = report.files.iter().any(|f| f != destination);
    if is_directory {
        for file in &report.files {
            lines.push(format!("{}{}", indent(1), relative_to(file, destination)));
        }
    }
    if let Some(index) = &report.index {
        lines.push(format!("Index → {}", relative_to(index, destination)));
    }
    lines
}

pub fn print_publish_output(report: &PublishReport, destination: &Path) {
    for line in format_publish_output(report, destination) {
        println!("{}", line);
    }
}

pub fn format_index_output(index: Option<&Path>, directory: &Path) -> Vec<String> {
    match index {
        Some(path) => vec![format!("Index → {}", path.display())],
        None => vec![format!(
            "No published files in {}, index not written",
            directory.display()
        )],
    }
}

pub fn print_index_output(index: Option<&Path>, directory: &Path) {
    for line in format_index_output(index, directory) {
        println!("{}", line);
    }
}
