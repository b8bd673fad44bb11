//! Tabular export of an analysis report.
//!
//! One row per class with the header `Class Name,Annotations,Files,Locations`.
//! The locations cell holds the class's sorted directories joined with
//! newlines, so spreadsheet tools show one directory per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::AnalysisReport;
use crate::error::CensusError;

/// Write `report` as CSV to `path`, replacing any existing file.
///
/// # Errors
/// Returns [`CensusError::CsvExport`] if the file cannot be created or written.
pub fn write_csv(report: &AnalysisReport, path: &Path) -> Result<(), CensusError> {
    let export_error = |source: csv::Error| CensusError::CsvExport {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|err| export_error(err.into()))?;
    let mut writer = write_rows(BufWriter::new(file), report).map_err(export_error)?;
    writer.flush().map_err(|err| export_error(err.into()))?;

    Ok(())
}

/// Write `report` as CSV into memory.
pub fn to_csv_bytes(report: &AnalysisReport) -> Result<Vec<u8>, CensusError> {
    write_rows(Vec::new(), report).map_err(|source| CensusError::CsvExport {
        path: "<memory>".into(),
        source,
    })
}

fn write_rows<W: Write>(sink: W, report: &AnalysisReport) -> Result<W, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(sink);

    // An empty report still gets a header row.
    if report.classes.is_empty() {
        csv_writer.write_record(["Class Name", "Annotations", "Files", "Locations"])?;
    }
    for row in report.export_rows() {
        csv_writer.serialize(&row)?;
    }

    csv_writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
