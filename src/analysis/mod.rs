//! Dataset analysis.
//!
//! [`analyze`] walks a directory tree, parses every annotation file it
//! recognises, and folds the results into per-class statistics. Individual
//! files and subtrees that fail are logged and skipped; only an invalid root
//! fails the whole call.

mod report;
mod stats;

pub use report::{AnalysisReport, ClassSummary, ExportRow};
pub use stats::{ClassStatistics, ClassStatsTable, ParsedFile};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::class_names::{resolve_class_names, ResolvedClassNames};
use crate::error::CensusError;
use crate::parse::{parse_file, AnnotationMap, FormatTag};
use crate::walk::{DatasetWalker, DiscoveredFile};

/// Where YOLO class names come from during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClassNameMode {
    /// Keep indices as `class_<id>` labels.
    #[default]
    Raw,
    /// Use this list for every YOLO file.
    Fixed(Vec<String>),
    /// Look for a class-list file next to each label file or up to three
    /// directories above it.
    NearestFile,
}

/// Options for a dataset analysis run.
#[derive(Clone, Debug, Default)]
pub struct AnalyzeOptions {
    pub class_names: ClassNameMode,
    /// Directory names to prune in addition to hidden and cache directories.
    pub extra_excluded_dirs: Vec<String>,
    /// Parse files on the rayon thread pool.
    pub parallel: bool,
}

/// Analyse the dataset tree rooted at `root`.
///
/// # Errors
/// Returns [`CensusError::InvalidRoot`] if `root` does not exist or is not a
/// directory. Nothing else is fatal.
pub fn analyze(root: &Path, opts: &AnalyzeOptions) -> Result<AnalysisReport, CensusError> {
    let root = check_root(root)?;
    info!("Analysing {}", root.display());

    let walker = DatasetWalker::with_exclusions(&root, &opts.extra_excluded_dirs);
    let mut class_names = ClassNameSource::new(&opts.class_names);

    let table = if opts.parallel {
        let jobs: Vec<(DiscoveredFile, Option<Arc<[String]>>)> = walker
            .map(|file| {
                let names = class_names.names_for(&file);
                (file, names)
            })
            .collect();
        debug!("Parsing {} file(s) in parallel", jobs.len());

        jobs.par_iter()
            .map(|(file, names)| parse_discovered(file, names.as_deref()))
            .fold(ClassStatsTable::new, |mut table, parsed| {
                table.record(&parsed);
                table
            })
            .reduce(ClassStatsTable::new, ClassStatsTable::merge)
    } else {
        let mut table = ClassStatsTable::new();
        for file in walker {
            let names = class_names.names_for(&file);
            table.record(&parse_discovered(&file, names.as_deref()));
        }
        table
    };

    let report = table.into_report(&root);
    info!(
        "Found {} class(es), {} annotation(s) in {} file(s)",
        report.total_classes, report.total_annotations, report.total_files
    );
    Ok(report)
}

/// Validate the root and make it absolute.
fn check_root(root: &Path) -> Result<PathBuf, CensusError> {
    if !root.exists() {
        return Err(CensusError::InvalidRoot {
            path: root.to_path_buf(),
            message: "path does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(CensusError::InvalidRoot {
            path: root.to_path_buf(),
            message: "path is not a directory".to_string(),
        });
    }

    fs::canonicalize(root).map_err(|source| CensusError::InvalidRoot {
        path: root.to_path_buf(),
        message: source.to_string(),
    })
}

/// Parse one discovered file. Failures become an empty map plus a warning.
fn parse_discovered(file: &DiscoveredFile, class_names: Option<&[String]>) -> ParsedFile {
    let annotations = match parse_file(&file.path, file.format, class_names) {
        Ok(annotations) => {
            debug!(
                "{}: {} annotation(s) in {} class(es)",
                file.path.display(),
                annotations.total_boxes(),
                annotations.class_count()
            );
            annotations
        }
        Err(err) => {
            warn!("Error parsing {} file {}: {}", file.format, file.path.display(), err);
            AnnotationMap::new()
        }
    };

    let mut parsed = ParsedFile::new(file.path.clone(), file.format, annotations);
    if let Ok(location) = fs::canonicalize(&parsed.location) {
        parsed.location = location;
    }
    parsed
}

/// Resolves the class list for each YOLO file according to the run's mode.
struct ClassNameSource {
    mode: SourceMode,
}

enum SourceMode {
    Raw,
    Fixed(Arc<[String]>),
    NearestFile(HashMap<PathBuf, Option<Arc<[String]>>>),
}

impl ClassNameSource {
    fn new(mode: &ClassNameMode) -> Self {
        let mode = match mode {
            ClassNameMode::Raw => SourceMode::Raw,
            ClassNameMode::Fixed(names) => SourceMode::Fixed(names.as_slice().into()),
            ClassNameMode::NearestFile => SourceMode::NearestFile(HashMap::new()),
        };
        Self { mode }
    }

    /// Class list for `file`. Only YOLO label files ever get one.
    fn names_for(&mut self, file: &DiscoveredFile) -> Option<Arc<[String]>> {
        if file.format != FormatTag::Txt {
            return None;
        }

        match &mut self.mode {
            SourceMode::Raw => None,
            SourceMode::Fixed(names) => Some(Arc::clone(names)),
            SourceMode::NearestFile(cache) => {
                let directory = file.path.parent()?;
                if let Some(cached) = cache.get(directory) {
                    return cached.clone();
                }

                let names = lookup_class_names(directory);
                cache.insert(directory.to_path_buf(), names.clone());
                names
            }
        }
    }
}

fn lookup_class_names(directory: &Path) -> Option<Arc<[String]>> {
    match resolve_class_names(directory) {
        Ok(Some(ResolvedClassNames { source, names })) => {
            debug!(
                "Using {} class name(s) from {} for {}",
                names.len(),
                source.display(),
                directory.display()
            );
            Some(names.into())
        }
        Ok(None) => None,
        Err(err) => {
            warn!("{err}");
            None
        }
    }
}
