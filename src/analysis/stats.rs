//! Per-class statistics accumulated over one analysis run.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::report::{AnalysisReport, ClassSummary};
use crate::parse::{AnnotationMap, FormatTag};

/// One parsed annotation file, ready to be folded into the statistics.
#[derive(Clone, Debug)]
pub struct ParsedFile {
    /// Absolute path of the annotation file.
    pub path: PathBuf,
    /// Absolute directory the file lives in.
    pub location: PathBuf,
    pub format: FormatTag,
    pub annotations: AnnotationMap,
}

impl ParsedFile {
    /// Build a parsed file whose location is the path's parent directory.
    pub fn new(path: impl Into<PathBuf>, format: FormatTag, annotations: AnnotationMap) -> Self {
        let path = path.into();
        let location = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path,
            location,
            format,
            annotations,
        }
    }
}

/// Running totals for a single class name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassStatistics {
    pub count: usize,
    pub files: BTreeSet<PathBuf>,
    pub locations: BTreeSet<PathBuf>,
    pub types: BTreeSet<FormatTag>,
}

impl ClassStatistics {
    fn absorb(&mut self, other: ClassStatistics) {
        self.count += other.count;
        self.files.extend(other.files);
        self.locations.extend(other.locations);
        self.types.extend(other.types);
    }
}

/// Class name to statistics, owned by exactly one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassStatsTable {
    classes: BTreeMap<String, ClassStatistics>,
}

impl ClassStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for `class_name`, created empty on first sighting.
    pub fn get_or_insert(&mut self, class_name: &str) -> &mut ClassStatistics {
        match self.classes.entry(class_name.to_string()) {
            btree_map::Entry::Occupied(entry) => entry.into_mut(),
            btree_map::Entry::Vacant(entry) => entry.insert(ClassStatistics::default()),
        }
    }

    /// Fold one file's annotations into the table.
    ///
    /// Files that produced no annotations leave the table untouched.
    pub fn record(&mut self, file: &ParsedFile) {
        for (class_name, boxes) in file.annotations.iter() {
            let stats = self.get_or_insert(class_name);
            stats.count += boxes.len();
            stats.files.insert(file.path.clone());
            stats.locations.insert(file.location.clone());
            stats.types.insert(file.format);
        }
    }

    /// Combine two partial tables. The result does not depend on which side
    /// each file was recorded in.
    pub fn merge(mut self, other: ClassStatsTable) -> ClassStatsTable {
        for (class_name, stats) in other.classes {
            match self.classes.entry(class_name) {
                btree_map::Entry::Occupied(mut entry) => entry.get_mut().absorb(stats),
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(stats);
                }
            }
        }
        self
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassStatistics> {
        self.classes.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Render the final report. Classes, locations and types come out sorted.
    pub fn into_report(self, root: &Path) -> AnalysisReport {
        let total_annotations = self.classes.values().map(|stats| stats.count).sum();
        let total_files = self
            .classes
            .values()
            .flat_map(|stats| stats.files.iter())
            .collect::<BTreeSet<_>>()
            .len();

        let classes: Vec<ClassSummary> = self
            .classes
            .into_iter()
            .map(|(class_name, stats)| {
                let mut locations: Vec<String> = stats
                    .locations
                    .iter()
                    .map(|location| location.to_string_lossy().into_owned())
                    .collect();
                locations.sort();

                ClassSummary {
                    class_name,
                    annotations: stats.count,
                    files: stats.files.len(),
                    locations,
                    types: stats.types.into_iter().collect(),
                }
            })
            .collect();

        AnalysisReport {
            root_path: root.to_string_lossy().into_owned(),
            total_classes: classes.len(),
            total_annotations,
            total_files,
            classes,
        }
    }
}
