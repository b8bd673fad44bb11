//! Opaque textual bounding boxes.
//!
//! Boxes are kept in the coordinate convention of the file they came from
//! (corner pair for VOC/COCO/LabelMe, center+size for YOLO). Nothing
//! downstream of the parsers looks inside them; they only get counted.

use std::fmt;

/// A bounding box rendered as four comma-joined components.
///
/// An empty `BoxText` is a placeholder for an annotation whose geometry was
/// missing or incomplete. It still counts as one annotation instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoxText(String);

impl BoxText {
    /// Placeholder for an annotation without usable geometry.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Join four components in the given order.
    pub fn from_components<S: AsRef<str>>(components: [S; 4]) -> Self {
        let [a, b, c, d] = components;
        Self(format!(
            "{},{},{},{}",
            a.as_ref(),
            b.as_ref(),
            c.as_ref(),
            d.as_ref()
        ))
    }

    /// True when the box carries no geometry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoxText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
