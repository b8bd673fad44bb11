//! Format-specific annotation parsers.
//!
//! Each parser turns the content of one annotation file into an
//! [`AnnotationMap`]: class name to the boxes found for it, in file order.
//! Parsers never merge files and never log; they return a
//! [`CensusError`](crate::CensusError) and let the caller decide whether the
//! failure is fatal.
//!
//! # Supported families
//!
//! - [`voc_xml`]: Pascal VOC, one `<object>` per instance.
//! - [`json`]: full COCO, single-image COCO, and LabelMe.
//! - [`yolo_txt`]: YOLO label rows `class_id cx cy w h`.

mod bbox;
mod format;
pub mod json;
pub mod voc_xml;
pub mod yolo_txt;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::Path;

pub use bbox::BoxText;
pub use format::FormatTag;
pub use json::JsonVariant;

use crate::error::CensusError;

/// Boxes found in a single file, bucketed by class name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationMap {
    buckets: BTreeMap<String, Vec<BoxText>>,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a box to the bucket for `class_name`, creating the bucket on
    /// first sighting.
    pub fn push(&mut self, class_name: impl Into<String>, bbox: BoxText) {
        self.bucket_mut(class_name.into()).push(bbox);
    }

    fn bucket_mut(&mut self, class_name: String) -> &mut Vec<BoxText> {
        match self.buckets.entry(class_name) {
            btree_map::Entry::Occupied(entry) => entry.into_mut(),
            btree_map::Entry::Vacant(entry) => entry.insert(Vec::new()),
        }
    }

    /// Boxes recorded for one class, in file order.
    pub fn boxes(&self, class_name: &str) -> Option<&[BoxText]> {
        self.buckets.get(class_name).map(Vec::as_slice)
    }

    /// Iterate `(class_name, boxes)` in class-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BoxText])> {
        self.buckets
            .iter()
            .map(|(name, boxes)| (name.as_str(), boxes.as_slice()))
    }

    pub fn class_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of annotation instances across all classes.
    pub fn total_boxes(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Read and parse one annotation file according to its format tag.
///
/// `class_names` only affects YOLO files; indices outside the list fall back
/// to `class_<id>`.
pub fn parse_file(
    path: &Path,
    format: FormatTag,
    class_names: Option<&[String]>,
) -> Result<AnnotationMap, CensusError> {
    match format {
        FormatTag::Xml => voc_xml::read_voc_xml(path),
        FormatTag::Json => json::read_annotation_json(path),
        FormatTag::Txt => yolo_txt::read_yolo_txt(path, class_names),
    }
}

/// Read a file's raw bytes, keeping the path in the error.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, CensusError> {
    std::fs::read(path).map_err(|source| CensusError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file as UTF-8 text, keeping the path in the error.
pub(crate) fn read_text(path: &Path) -> Result<String, CensusError> {
    String::from_utf8(read_bytes(path)?).map_err(|_| CensusError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// A `\r\n` pair yields an extra empty line; callers skip blank lines anyway.
pub(crate) fn text_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split(|c: char| c == '\n' || c == '\r')
}
