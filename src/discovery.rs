//! File discovery and traversal for the batch CLI entry points.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions the CLI treats as text documents to cluster.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "rst", "csv", "json"];

/// Finds candidate text files under `root`, respecting `.gitignore` rules.
#[must_use]
pub fn find_text_files(root: &Path) -> Vec<PathBuf> {
    WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        })
        .map(ignore::DirEntry::into_path)
        .collect()
}
