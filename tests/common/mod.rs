#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const SAMPLE_DATASET: &str = "tests/fixtures/sample_dataset";

pub fn sample_dataset() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SAMPLE_DATASET)
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
}

/// A VOC document with one `<object>` per name.
pub fn voc_xml(names: &[&str]) -> String {
    let mut xml = String::from("<annotation>\n  <filename>img.jpg</filename>\n");
    for name in names {
        xml.push_str(&format!("  <object>\n    <name>{name}</name>\n"));
        xml.push_str("    <bndbox><xmin>1</xmin><ymin>2</ymin>");
        xml.push_str("<xmax>3</xmax><ymax>4</ymax></bndbox>\n");
        xml.push_str("  </object>\n");
    }
    xml.push_str("</annotation>\n");
    xml
}
