//! Companion class-list lookup for YOLO label files.
//!
//! YOLO rows only carry an integer class index. Datasets usually ship a
//! plain-text list next to (or a few levels above) the label files, one class
//! name per line, where the line position is the index.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CensusError;
use crate::parse::text_lines;

/// Conventional class-list filenames, in lookup priority order.
pub const CLASS_NAME_FILES: [&str; 4] = ["classes.txt", "obj.names", "class.names", "labels.txt"];

/// How many directories are searched: the start directory plus three
/// ancestors.
const SEARCH_LEVELS: usize = 4;

/// True if `path` is named like a class-list companion file.
pub fn is_class_names_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| CLASS_NAME_FILES.contains(&name))
}

/// Search `directory` and up to three of its ancestors for a class-list file.
///
/// Within one directory the filenames are tried in [`CLASS_NAME_FILES`]
/// order. Returns `None` when nothing is found; that is not an error.
pub fn find_class_names_file(directory: &Path) -> Option<PathBuf> {
    directory
        .ancestors()
        .take(SEARCH_LEVELS)
        .flat_map(|dir| CLASS_NAME_FILES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Load one class name per non-blank line, trimmed, in file order.
pub fn load_class_names(path: &Path) -> Result<Vec<String>, CensusError> {
    let content = fs::read_to_string(path).map_err(|source| CensusError::ClassNamesRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(text_lines(&content)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}

/// A class list together with the file it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedClassNames {
    pub source: PathBuf,
    pub names: Vec<String>,
}

/// Find and load the class list that applies to `dir`, if any.
pub fn resolve_class_names(dir: &Path) -> Result<Option<ResolvedClassNames>, CensusError> {
    let Some(source) = find_class_names_file(dir) else {
        return Ok(None);
    };
    let names = load_class_names(&source)?;
    Ok(Some(ResolvedClassNames { source, names }))
}
