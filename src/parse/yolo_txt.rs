//! YOLO label file parser.
//!
//! One object per line: `<class_id> <x_center> <y_center> <width> <height>`.
//! Extra tokens (segmentation points, confidences) are ignored. Rows that do
//! not fit are skipped without failing the file, since label dumps routinely
//! carry stray lines.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use super::{read_text, text_lines, AnnotationMap, BoxText};
use crate::error::CensusError;

/// Parse a YOLO label file from disk.
pub fn read_yolo_txt(
    path: &Path,
    class_names: Option<&[String]>,
) -> Result<AnnotationMap, CensusError> {
    let content = read_text(path)?;
    Ok(from_yolo_str(&content, class_names))
}

/// Parse YOLO label rows from a string.
pub fn from_yolo_str(content: &str, class_names: Option<&[String]>) -> AnnotationMap {
    let mut annotations = AnnotationMap::new();

    for line in text_lines(content) {
        let Some(row) = parse_label_line(line) else {
            continue;
        };

        let class_name = resolve_class_name(&row.class_id, class_names);
        annotations.push(class_name, row.bbox);
    }

    annotations
}

/// The integer class id of a YOLO row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassId {
    Index(i64),
    /// Integer too large for `i64`, kept as normalised decimal text
    /// (no `+`, no leading zeros, no `_` separators).
    Oversized(String),
}

impl ClassId {
    /// Parse an integer token. Accepts an optional sign and `_` between
    /// digit groups (`1_000`).
    pub fn parse(token: &str) -> Option<Self> {
        if let Ok(index) = token.parse::<i64>() {
            return Some(Self::Index(index));
        }

        let (sign, digits) = match token.as_bytes().first()? {
            b'-' => ("-", &token[1..]),
            b'+' => ("", &token[1..]),
            _ => ("", token),
        };
        let well_formed = digits
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()));
        if !well_formed {
            return None;
        }

        let digits: String = digits.chars().filter(|c| *c != '_').collect();
        if let Ok(index) = format!("{sign}{digits}").parse::<i64>() {
            return Some(Self::Index(index));
        }

        let significant = digits.trim_start_matches('0');
        Some(Self::Oversized(format!("{sign}{significant}")))
    }

    fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => usize::try_from(*index).ok(),
            Self::Oversized(_) => None,
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Oversized(digits) => f.write_str(digits),
        }
    }
}

/// A single eligible YOLO row.
#[derive(Debug, PartialEq)]
pub struct YoloLabelRow {
    pub class_id: ClassId,
    pub bbox: BoxText,
}

/// Parse one label line. Returns `None` for blank rows, rows with fewer than
/// five tokens, and rows whose first token is not an integer.
pub fn parse_label_line(line: &str) -> Option<YoloLabelRow> {
    let mut tokens = line.split_whitespace();

    let class_token = tokens.next()?;
    let geometry = [tokens.next()?, tokens.next()?, tokens.next()?, tokens.next()?];
    let class_id = ClassId::parse(class_token)?;

    Some(YoloLabelRow {
        class_id,
        bbox: BoxText::from_components(geometry),
    })
}

/// Map a class id to a name, falling back to `class_<id>` when no list is
/// supplied or the id is outside it.
pub fn resolve_class_name<'a>(
    class_id: &ClassId,
    class_names: Option<&'a [String]>,
) -> Cow<'a, str> {
    let named = class_names
        .zip(class_id.as_index())
        .and_then(|(names, index)| names.get(index));

    match named {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Owned(format!("class_{class_id}")),
    }
}

/// Fuzz-only entrypoint for YOLO single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Option<YoloLabelRow> {
    parse_label_line(input)
}
