//! CSV export of the passing subset

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::ExportError;
use crate::models::{CellValue, Column, CompanyRecord};

pub const DEFAULT_EXPORT_FILE: &str = "graham_stocks_sbf120.csv";

/// Passing records projected onto the chosen export columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ExportTable {
    /// `None` for an empty record set, so an empty file can never be produced
    pub fn from_records(records: &[CompanyRecord], columns: &[Column]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| record.cell(*c)).collect())
            .collect();

        Some(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// UTF-8 CSV with a header row and no index column
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(self.columns.iter().map(Column::header))?;
        for row in &self.rows {
            writer.write_record(row.iter().map(csv_field))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Buffer(e.to_string()))
    }
}

/// Absent values are empty fields; floats keep a decimal point
pub fn csv_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.clone(),
        CellValue::Number(Some(value)) => format!("{:?}", value),
        CellValue::Number(None) | CellValue::Flag(None) => String::new(),
        CellValue::Flag(Some(true)) => "True".to_string(),
        CellValue::Flag(Some(false)) => "False".to_string(),
        CellValue::Score(score) => score.to_string(),
    }
}

pub fn write_csv(table: &ExportTable, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let bytes = table.to_csv_bytes()?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(
        "💾 Exported {} rows to {}",
        table.rows.len(),
        path.as_ref().display()
    );
    Ok(())
}
