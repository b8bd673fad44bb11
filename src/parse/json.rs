//! JSON annotation parser for COCO, single-image COCO, and LabelMe files.
//!
//! A JSON file does not say which convention it follows, so the document is
//! first classified by its top-level keys ([`JsonVariant::classify`]) and then
//! handed to exactly one variant parser. The checks run in a fixed priority
//! order because a document can satisfy more than one shape:
//!
//! 1. `categories` + `annotations` → [`JsonVariant::FullCoco`]
//! 2. `shapes` → [`JsonVariant::LabelMe`]
//! 3. `image` or `annotations` → [`JsonVariant::SingleCoco`]
//! 4. anything else → [`JsonVariant::Unrecognized`]
//!
//! Box components are rendered the way they appear in the document: integers
//! stay integers, floats keep their decimal point, strings are inserted as-is.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use super::{read_text, AnnotationMap, BoxText};
use crate::error::CensusError;

const UNKNOWN_CLASS: &str = "unknown";

type JsonObject = Map<String, Value>;

/// The JSON sub-format a document was recognised as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonVariant {
    /// Dataset-wide COCO with shared `categories` and `annotations` arrays.
    FullCoco,
    /// Single-image COCO-like document carrying inline class names.
    SingleCoco,
    /// LabelMe document with a `shapes` array.
    LabelMe,
    /// None of the above; contributes nothing.
    Unrecognized,
}

impl JsonVariant {
    /// Decide which variant parser handles `document`.
    pub fn classify(document: &Value) -> Self {
        let Some(object) = document.as_object() else {
            return Self::Unrecognized;
        };

        if object.contains_key("categories") && object.contains_key("annotations") {
            Self::FullCoco
        } else if object.contains_key("shapes") {
            Self::LabelMe
        } else if object.contains_key("image") || object.contains_key("annotations") {
            Self::SingleCoco
        } else {
            Self::Unrecognized
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullCoco => "coco",
            Self::SingleCoco => "coco-single-image",
            Self::LabelMe => "labelme",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for JsonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a JSON annotation file from disk.
pub fn read_annotation_json(path: &Path) -> Result<AnnotationMap, CensusError> {
    let json = read_text(path)?;
    parse_json_str(&json, path)
}

/// Parse a JSON annotation document from a string.
pub fn from_json_str(json: &str) -> Result<AnnotationMap, CensusError> {
    parse_json_str(json, Path::new("<memory>"))
}

/// Parse a JSON annotation document from bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<AnnotationMap, CensusError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|source| CensusError::JsonParse {
            path: PathBuf::from("<memory>"),
            source,
        })?;
    parse_document(&document, Path::new("<memory>"))
}

/// Classify a JSON file on disk without extracting annotations.
pub fn detect_json_variant(path: &Path) -> Result<JsonVariant, CensusError> {
    let json = read_text(path)?;
    let document: Value = serde_json::from_str(&json).map_err(|source| CensusError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(JsonVariant::classify(&document))
}

fn parse_json_str(json: &str, path: &Path) -> Result<AnnotationMap, CensusError> {
    let document: Value = serde_json::from_str(json).map_err(|source| CensusError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&document, path)
}

fn parse_document(document: &Value, path: &Path) -> Result<AnnotationMap, CensusError> {
    let Some(object) = document.as_object() else {
        return Ok(AnnotationMap::new());
    };

    match JsonVariant::classify(document) {
        JsonVariant::FullCoco => parse_full_coco(object, path),
        JsonVariant::LabelMe => parse_labelme(object, path),
        JsonVariant::SingleCoco => parse_single_coco(object, path),
        JsonVariant::Unrecognized => Ok(AnnotationMap::new()),
    }
}

// ============================================================================
// Variant parsers
// ============================================================================

fn parse_full_coco(object: &JsonObject, path: &Path) -> Result<AnnotationMap, CensusError> {
    let mut category_names: HashMap<IdKey, String> = HashMap::new();
    for category in array_field(object, "categories", path)? {
        let id = category
            .get("id")
            .ok_or_else(|| shape_error(path, "category entry without \"id\""))?;
        let name = category
            .get("name")
            .and_then(scalar_text)
            .ok_or_else(|| shape_error(path, "category entry without \"name\""))?;

        if let Some(key) = IdKey::from_value(id) {
            category_names.insert(key, name);
        }
    }

    let mut annotations = AnnotationMap::new();
    for annotation in array_field(object, "annotations", path)? {
        let Some(class_name) = annotation
            .get("category_id")
            .and_then(IdKey::from_value)
            .and_then(|key| category_names.get(&key))
        else {
            continue;
        };

        if class_name.is_empty() {
            continue;
        }
        annotations.push(class_name.clone(), coco_bbox(annotation));
    }

    Ok(annotations)
}

fn parse_single_coco(object: &JsonObject, path: &Path) -> Result<AnnotationMap, CensusError> {
    let mut annotations = AnnotationMap::new();

    let entries = match object.get("annotations") {
        Some(_) => array_field(object, "annotations", path)?,
        None => return Ok(annotations),
    };

    for annotation in entries {
        let class_name = annotation
            .get("category")
            .and_then(scalar_text)
            .or_else(|| annotation.get("label").and_then(scalar_text))
            .unwrap_or_else(|| UNKNOWN_CLASS.to_string());

        if class_name.is_empty() {
            continue;
        }
        annotations.push(class_name, coco_bbox(annotation));
    }

    Ok(annotations)
}

fn parse_labelme(object: &JsonObject, path: &Path) -> Result<AnnotationMap, CensusError> {
    let mut annotations = AnnotationMap::new();

    for shape in array_field(object, "shapes", path)? {
        let class_name = shape
            .get("label")
            .and_then(scalar_text)
            .unwrap_or_else(|| UNKNOWN_CLASS.to_string());

        if class_name.is_empty() {
            continue;
        }

        let bbox = match shape.get("points").and_then(Value::as_array) {
            Some(points) if points.len() >= 2 => points_bbox(points, path)?,
            _ => BoxText::empty(),
        };

        annotations.push(class_name, bbox);
    }

    Ok(annotations)
}

// ============================================================================
// Helpers
// ============================================================================

/// Lookup key for COCO category ids.
///
/// `1` and `1.0` refer to the same category; the string `"1"` does not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum IdKey {
    Int(i128),
    Float(u64),
    Text(String),
}

impl IdKey {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self::from_number(number)),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }

    fn from_number(number: &Number) -> Self {
        if let Some(int) = number.as_i64() {
            return Self::Int(int.into());
        }
        if let Some(uint) = number.as_u64() {
            return Self::Int(uint.into());
        }

        // Every integral float below 2^127 converts to i128 exactly.
        let float = number.as_f64().unwrap_or(f64::NAN);
        if float.is_finite() && float.fract() == 0.0 && float.abs() < i128::MAX as f64 {
            Self::Int(float as i128)
        } else {
            Self::Float(float.to_bits())
        }
    }
}

fn array_field<'a>(
    object: &'a JsonObject,
    key: &str,
    path: &Path,
) -> Result<&'a Vec<Value>, CensusError> {
    object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error(path, &format!("\"{key}\" is not an array")))
}

fn shape_error(path: &Path, message: &str) -> CensusError {
    CensusError::JsonShape {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Text of a name-like field. Numbers are accepted and rendered; other
/// values are treated as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// One box component as it should appear in a [`BoxText`].
fn component_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn coco_bbox(annotation: &Value) -> BoxText {
    match annotation.get("bbox").and_then(Value::as_array) {
        Some(bbox) if bbox.len() >= 4 => BoxText::from_components([
            component_text(&bbox[0]),
            component_text(&bbox[1]),
            component_text(&bbox[2]),
            component_text(&bbox[3]),
        ]),
        _ => BoxText::empty(),
    }
}

/// Axis-aligned box over all points, as `min_x,min_y,max_x,max_y`.
fn points_bbox(points: &[Value], path: &Path) -> Result<BoxText, CensusError> {
    let mut xs = Extent::default();
    let mut ys = Extent::default();

    for point in points {
        let (x, y) = point
            .as_array()
            .filter(|coords| coords.len() >= 2)
            .and_then(|coords| Some((coords[0].as_number()?, coords[1].as_number()?)))
            .ok_or_else(|| shape_error(path, "shape point is not a numeric [x, y] pair"))?;
        xs.include(x);
        ys.include(y);
    }

    match (xs.bounds(), ys.bounds()) {
        (Some((min_x, max_x)), Some((min_y, max_y))) => Ok(BoxText::from_components([
            min_x.to_string(),
            min_y.to_string(),
            max_x.to_string(),
            max_y.to_string(),
        ])),
        _ => Ok(BoxText::empty()),
    }
}

/// Running min/max that keeps the first number seen for each bound, so the
/// original spelling (`10` vs `10.0`) survives.
#[derive(Default)]
struct Extent<'a> {
    min: Option<(f64, &'a Number)>,
    max: Option<(f64, &'a Number)>,
}

impl<'a> Extent<'a> {
    fn include(&mut self, number: &'a Number) {
        let value = number.as_f64().unwrap_or(f64::NAN);
        if self.min.map_or(true, |(min, _)| value < min) {
            self.min = Some((value, number));
        }
        if self.max.map_or(true, |(max, _)| value > max) {
            self.max = Some((value, number));
        }
    }

    fn bounds(&self) -> Option<(&'a Number, &'a Number)> {
        Some((self.min?.1, self.max?.1))
    }
}
