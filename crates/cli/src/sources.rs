//! Finding listing exports to analyze.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All `*.csv` files under `dir`, sorted, without descending into `skip`.
pub fn csv_exports(dir: &Path, skip: Option<&Path>) -> Vec<PathBuf> {
    let skip = skip.map(|p| p.canonicalize().unwrap_or_else(|_| p.to_path_buf()));
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| match &skip {
            Some(skip) => !same_path(e.path(), skip),
            None => true,
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn same_path(path: &Path, other: &Path) -> bool {
    path.canonicalize()
        .map(|p| p == other)
        .unwrap_or_else(|_| path == other)
}
