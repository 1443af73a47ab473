//! Tabular report sink for disallowed-color findings.
//!
//! One CSV artifact per input file, written next to it with the same base
//! name and a `.csv` extension. Rows are collected per file and flushed in
//! one pass; the collection is cleared by going out of scope with the file's
//! translation state.

use std::path::{Path, PathBuf};

use log::info;

use stormport_core::shape::ShapeId;

use crate::ImportError;

/// A shape that still carried a disallowed color after legacy migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadColorShape {
    page: String,
    shape_id: ShapeId,
    label: String,
    color: String,
}

impl BadColorShape {
    pub fn new(
        page: impl Into<String>,
        shape_id: ShapeId,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            page: page.into(),
            shape_id,
            label: label.into(),
            color: color.into(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Derive the report artifact path for an input diagram file.
pub fn report_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// Write one file's findings as a CSV artifact.
pub fn write_report(path: &Path, rows: &[BadColorShape]) -> Result<(), ImportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["page", "shape_id", "shape_text", "color"])?;
    for row in rows {
        writer.write_record([row.page(), row.shape_id().as_str(), row.label(), row.color()])?;
    }
    writer.flush().map_err(csv::Error::from)?;

    info!(path = path.display().to_string(), rows = rows.len(); "Color report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn report_path_swaps_extension() {
        assert_eq!(
            report_path(Path::new("input/orders.storm.json")),
            PathBuf::from("input/orders.storm.csv")
        );
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.storm.csv");

        let rows = vec![
            BadColorShape::new("Checkout", ShapeId::from("4"), "Pay order", "#123456"),
            BadColorShape::new("Checkout", ShapeId::from("9"), "Ship order", "#abcdef"),
        ];
        write_report(&path, &rows).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("page,shape_id,shape_text,color"));
        assert_eq!(lines.next(), Some("Checkout,4,Pay order,#123456"));
        assert_eq!(lines.next(), Some("Checkout,9,Ship order,#abcdef"));
        assert_eq!(lines.next(), None);
    }
}
