//! Dataset tree traversal.
//!
//! [`DatasetWalker`] is a lazy iterator over the annotation files below a
//! root directory. It uses `walkdir`'s explicit directory stack, so tree depth
//! is bounded by memory rather than the call stack, and a consumer can stop
//! between any two files.
//!
//! Traversal errors (permission denied, vanished entries, symlink loops) are
//! logged and the affected subtree is skipped; they never end the walk.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::class_names::is_class_names_file;
use crate::parse::FormatTag;

/// Directory names that never hold dataset annotations.
pub const EXCLUDED_DIRS: [&str; 2] = ["__pycache__", "node_modules"];

/// An annotation file found during traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub format: FormatTag,
}

/// Lazy, error-tolerant walk over the annotation files under a root.
pub struct DatasetWalker {
    inner: walkdir::FilterEntry<walkdir::IntoIter, Box<dyn FnMut(&DirEntry) -> bool + Send>>,
    skipped: usize,
}

impl DatasetWalker {
    /// Walk `root` with the default exclusion set.
    pub fn new(root: &Path) -> Self {
        Self::with_exclusions(root, &[])
    }

    /// Walk `root`, additionally pruning directories named in `extra`.
    pub fn with_exclusions(root: &Path, extra: &[String]) -> Self {
        let extra = extra.to_vec();
        let prune: Box<dyn FnMut(&DirEntry) -> bool + Send> =
            Box::new(move |entry| !is_pruned_dir(entry, &extra));

        let inner = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(prune);

        Self { inner, skipped: 0 }
    }

    /// Number of entries that could not be read so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for DatasetWalker {
    type Item = DiscoveredFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.skipped += 1;
                    report_walk_error(&err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if is_class_names_file(path) {
                debug!("skipping class list {}", path.display());
                continue;
            }

            if let Some(format) = FormatTag::from_path(path) {
                return Some(DiscoveredFile {
                    path: entry.into_path(),
                    format,
                });
            }
        }
    }
}

/// True for directories below the root that are hidden or excluded by name.
fn is_pruned_dir(entry: &DirEntry, extra: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name();
    if name.as_encoded_bytes().first() == Some(&b'.') {
        return true;
    }

    name.to_str().is_some_and(|name| {
        is_excluded_dir_name(name) || extra.iter().any(|excluded| excluded == name)
    })
}

/// True for hidden directory names and the fixed exclusion set.
pub fn is_excluded_dir_name(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

fn report_walk_error(err: &walkdir::Error) {
    let location = err
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string());

    if err.loop_ancestor().is_some() {
        warn!("Skipping symlink loop at {location}");
        return;
    }

    match err.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::PermissionDenied) => {
            warn!("Permission denied: {location}");
        }
        _ => warn!("Error traversing {location}: {err}"),
    }
}
