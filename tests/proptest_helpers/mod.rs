#![allow(dead_code)]

use labelcensus::analysis::ParsedFile;
use labelcensus::parse::{AnnotationMap, BoxText, FormatTag};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Class names safe to embed in XML and JSON without escaping.
pub fn arb_class_name() -> BoxedStrategy<String> {
    "[a-z][a-z0-9_]{0,10}".boxed()
}

fn arb_coordinate() -> BoxedStrategy<String> {
    (0u32..10_000).prop_map(|n| format!("{}", n as f64 / 10_000.0)).boxed()
}

/// A well-formed YOLO row: integer class id plus four coordinates.
pub fn arb_valid_yolo_line() -> BoxedStrategy<(i64, String)> {
    (0i64..20, prop::collection::vec(arb_coordinate(), 4))
        .prop_map(|(id, coords)| (id, format!("{id} {}", coords.join(" "))))
        .boxed()
}

/// A YOLO row that must be ignored: too few tokens, or a class id that is not
/// an integer.
pub fn arb_invalid_yolo_line() -> BoxedStrategy<String> {
    let too_short = (0i64..20, prop::collection::vec(arb_coordinate(), 0..4))
        .prop_map(|(id, coords)| {
            let mut tokens = vec![id.to_string()];
            tokens.extend(coords);
            tokens.join(" ")
        });
    let non_integer_id = (
        prop_oneof![
            "[a-z]{1,6}".boxed(),
            (0u32..100).prop_map(|n| format!("{n}.5")).boxed(),
        ],
        prop::collection::vec(arb_coordinate(), 4),
    )
        .prop_map(|(id, coords)| format!("{id} {}", coords.join(" ")));

    prop_oneof![too_short, non_integer_id, Just(String::new()), Just("   ".to_string())].boxed()
}

/// A parsed file with a handful of classes, used to exercise the fold.
pub fn arb_parsed_file() -> BoxedStrategy<ParsedFile> {
    (
        0usize..4,
        0usize..50,
        prop_oneof![Just(FormatTag::Json), Just(FormatTag::Txt), Just(FormatTag::Xml)],
        prop::collection::vec(("[a-d]", 1usize..4), 0..4),
    )
        .prop_map(|(dir, file, format, classes)| {
            let mut annotations = AnnotationMap::new();
            for (name, count) in classes {
                for _ in 0..count {
                    annotations.push(name.clone(), BoxText::empty());
                }
            }
            let path = format!("/dataset/dir{dir}/file{file}.{}", format.as_str().to_lowercase());
            ParsedFile::new(path, format, annotations)
        })
        .boxed()
}
