//! Analysis report types and terminal formatting.
//!
//! The report is the only thing that leaves an analysis run. It carries
//! counts and locations, never box geometry.

use serde::Serialize;
use std::fmt;

use crate::parse::FormatTag;

/// The result of analysing one dataset tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Canonical path of the analysed root.
    pub root_path: String,
    /// Number of distinct class names.
    pub total_classes: usize,
    /// Annotation instances across all classes.
    pub total_annotations: usize,
    /// Distinct files that contributed at least one annotation.
    pub total_files: usize,
    /// Per-class summaries, sorted by class name.
    pub classes: Vec<ClassSummary>,
}

/// Summary of a single class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub class_name: String,
    /// Annotation instances of this class.
    pub annotations: usize,
    /// Number of files containing this class.
    pub files: usize,
    /// Sorted directories containing those files.
    pub locations: Vec<String>,
    /// Sorted format tags the class was seen in.
    pub types: Vec<FormatTag>,
}

/// One row of the tabular export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Class Name")]
    pub class_name: String,
    #[serde(rename = "Annotations")]
    pub annotations: usize,
    #[serde(rename = "Files")]
    pub files: usize,
    /// Sorted locations joined with newlines.
    #[serde(rename = "Locations")]
    pub locations: String,
}

impl AnalysisReport {
    /// An empty report for `root_path`.
    pub fn empty(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            total_classes: 0,
            total_annotations: 0,
            total_files: 0,
            classes: Vec::new(),
        }
    }

    /// Look up one class summary by name.
    pub fn class(&self, class_name: &str) -> Option<&ClassSummary> {
        self.classes
            .binary_search_by(|summary| summary.class_name.as_str().cmp(class_name))
            .ok()
            .map(|index| &self.classes[index])
    }

    /// Rows for spreadsheet-style consumers, in class-name order.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.classes
            .iter()
            .map(|summary| ExportRow {
                class_name: summary.class_name.clone(),
                annotations: summary.annotations,
                files: summary.files,
                locations: summary.locations.join("\n"),
            })
            .collect()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "╭─────────────────────────────────────────────────────────────╮"
        )?;
        writeln!(
            f,
            "│                📊  Dataset Analysis Report                  │"
        )?;
        writeln!(
            f,
            "╰─────────────────────────────────────────────────────────────╯"
        )?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_classes(f)
    }
}

impl AnalysisReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary")?;
        writeln!(f, "───────")?;
        writeln!(f, "  Root:         {}", self.root_path)?;
        writeln!(f, "  Classes:      {}", self.total_classes)?;
        writeln!(f, "  Annotations:  {}", self.total_annotations)?;
        writeln!(f, "  Files:        {}", self.total_files)
    }

    fn fmt_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Classes")?;
        writeln!(f, "───────")?;

        if self.classes.is_empty() {
            return writeln!(f, "  (no annotations found)");
        }

        let name_width = self
            .classes
            .iter()
            .map(|summary| summary.class_name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(5, 40);

        writeln!(
            f,
            "  {:<name_width$}  {:>11}  {:>6}  Types",
            "Class", "Annotations", "Files"
        )?;

        for summary in &self.classes {
            let types: Vec<&str> = summary.types.iter().map(|tag| tag.as_str()).collect();
            writeln!(
                f,
                "  {:<name_width$}  {:>11}  {:>6}  {}",
                summary.class_name,
                summary.annotations,
                summary.files,
                types.join(", ")
            )?;
            for location in &summary.locations {
                writeln!(f, "  {:<name_width$}    └─ {}", "", location)?;
            }
        }

        Ok(())
    }
}
