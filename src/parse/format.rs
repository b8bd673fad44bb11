//! Extension-based format detection.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// The annotation format family a file belongs to.
///
/// Detection looks at the extension only. JSON and XML files are further
/// disambiguated by their parsers once the content is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormatTag {
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "TXT")]
    Txt,
    #[serde(rename = "XML")]
    Xml,
}

impl FormatTag {
    /// Classify a path by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("txt") {
            Some(Self::Txt)
        } else {
            None
        }
    }

    /// The tag as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "XML",
            Self::Json => "JSON",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
