use std::fs;
use std::path::Path;

use labelcensus::analysis::{analyze, AnalysisReport, AnalyzeOptions, ClassNameMode};
use labelcensus::parse::FormatTag;
use labelcensus::CensusError;

mod common;

fn counts(report: &AnalysisReport) -> Vec<(&str, usize)> {
    report
        .classes
        .iter()
        .map(|summary| (summary.class_name.as_str(), summary.annotations))
        .collect()
}

#[test]
fn mixed_xml_and_yolo_directory() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(&temp.path().join("a.xml"), &common::voc_xml(&["cat", "dog"]));
    common::write_file(
        &temp.path().join("b.txt"),
        "0 0.5 0.5 0.2 0.2\n1 0.3 0.3 0.1 0.1\n",
    );

    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");

    assert_eq!(
        counts(&report),
        vec![("cat", 1), ("class_0", 1), ("class_1", 1), ("dog", 1)]
    );
    assert_eq!(report.total_classes, 4);
    assert_eq!(report.total_annotations, 4);
    assert_eq!(report.total_files, 2);

    let root = fs::canonicalize(temp.path()).expect("canonicalize");
    let root = root.to_string_lossy();
    for summary in &report.classes {
        assert_eq!(summary.files, 1);
        assert_eq!(summary.locations, vec![root.to_string()]);
    }
    assert_eq!(report.class("cat").expect("cat").types, vec![FormatTag::Xml]);
    assert_eq!(report.class("class_0").expect("class_0").types, vec![FormatTag::Txt]);
}

#[test]
fn empty_directory_gives_empty_report() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");

    assert_eq!(report.total_classes, 0);
    assert_eq!(report.total_annotations, 0);
    assert_eq!(report.total_files, 0);
    assert!(report.classes.is_empty());
}

#[test]
fn nonexistent_root_is_an_error() {
    let err = analyze(Path::new("/definitely/not/here"), &AnalyzeOptions::default())
        .expect_err("missing root must fail");
    assert!(matches!(err, CensusError::InvalidRoot { .. }));
}

#[test]
fn sample_dataset_raw_class_names() {
    let report = analyze(&common::sample_dataset(), &AnalyzeOptions::default()).expect("analyze");

    assert_eq!(
        counts(&report),
        vec![
            ("car", 1),
            ("cat", 2),
            ("class_0", 2),
            ("class_1", 1),
            ("dog", 2),
            ("person", 1),
        ]
    );
    assert_eq!(report.total_annotations, 9);
    assert_eq!(report.total_files, 4);

    let dog = report.class("dog").expect("dog");
    assert_eq!(dog.files, 2);
    assert_eq!(dog.locations.len(), 2);
    assert_eq!(dog.types, vec![FormatTag::Json, FormatTag::Xml]);
}

#[test]
fn sample_dataset_with_nearest_class_list() {
    let opts = AnalyzeOptions {
        class_names: ClassNameMode::NearestFile,
        ..Default::default()
    };
    let report = analyze(&common::sample_dataset(), &opts).expect("analyze");

    assert_eq!(
        counts(&report),
        vec![("car", 2), ("cat", 2), ("dog", 2), ("person", 3)]
    );
    assert_eq!(report.total_annotations, 9);

    let person = report.class("person").expect("person");
    assert_eq!(person.types, vec![FormatTag::Json, FormatTag::Txt]);
}

#[test]
fn unknown_coco_category_ids_contribute_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(
        &temp.path().join("coco.json"),
        r#"{
            "categories": [{"id": 1, "name": "cat"}],
            "annotations": [
                {"category_id": 1, "bbox": [1, 2, 3, 4]},
                {"category_id": 7, "bbox": [1, 2, 3, 4]}
            ]
        }"#,
    );

    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");
    assert_eq!(counts(&report), vec![("cat", 1)]);
}

#[test]
fn labelme_points_become_one_car_box() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(
        &temp.path().join("shot.json"),
        r#"{"shapes": [{"label": "car", "points": [[10, 20], [30, 40]]}]}"#,
    );

    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");
    assert_eq!(counts(&report), vec![("car", 1)]);
    assert_eq!(report.total_files, 1);
}

#[test]
fn malformed_files_do_not_abort_the_run() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(&temp.path().join("broken.xml"), "<annotation><object><name>x");
    common::write_file(&temp.path().join("broken.json"), "[1, 2");
    fs::write(temp.path().join("binary.txt"), [0xff, 0xfe, 0x00]).expect("write binary");
    common::write_file(&temp.path().join("ok/good.xml"), &common::voc_xml(&["tree"]));

    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");
    assert_eq!(counts(&report), vec![("tree", 1)]);
    assert_eq!(report.total_files, 1);
}

#[test]
fn hidden_and_excluded_directories_are_pruned() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(&temp.path().join(".git/a.xml"), &common::voc_xml(&["ghost"]));
    common::write_file(
        &temp.path().join("__pycache__/b.xml"),
        &common::voc_xml(&["ghost"]),
    );
    common::write_file(
        &temp.path().join("node_modules/c.xml"),
        &common::voc_xml(&["ghost"]),
    );
    common::write_file(&temp.path().join("runs/d.xml"), &common::voc_xml(&["run"]));
    common::write_file(&temp.path().join("train/e.xml"), &common::voc_xml(&["real"]));

    let opts = AnalyzeOptions {
        extra_excluded_dirs: vec!["runs".to_string()],
        ..Default::default()
    };
    let report = analyze(temp.path(), &opts).expect("analyze");
    assert_eq!(counts(&report), vec![("real", 1)]);
}

#[test]
fn analysis_is_idempotent() {
    let root = common::sample_dataset();
    let first = analyze(&root, &AnalyzeOptions::default()).expect("first run");
    let second = analyze(&root, &AnalyzeOptions::default()).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn parallel_and_sequential_runs_agree_on_sample_dataset() {
    let root = common::sample_dataset();
    for mode in [ClassNameMode::Raw, ClassNameMode::NearestFile] {
        let sequential = analyze(
            &root,
            &AnalyzeOptions {
                class_names: mode.clone(),
                ..Default::default()
            },
        )
        .expect("sequential");
        let parallel = analyze(
            &root,
            &AnalyzeOptions {
                class_names: mode,
                parallel: true,
                ..Default::default()
            },
        )
        .expect("parallel");
        assert_eq!(sequential, parallel);
    }
}

#[cfg(unix)]
#[test]
fn symlink_loops_are_skipped() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_file(&temp.path().join("data/a.xml"), &common::voc_xml(&["cat"]));
    std::os::unix::fs::symlink(temp.path(), temp.path().join("data/loop"))
        .expect("create symlink");

    let report = analyze(temp.path(), &AnalyzeOptions::default()).expect("analyze");
    assert_eq!(counts(&report), vec![("cat", 1)]);
    assert_eq!(report.total_files, 1);
}
