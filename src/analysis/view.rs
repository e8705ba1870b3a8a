//! Sorted table views and export projection

use serde::Serialize;
use std::cmp::Ordering;

use crate::export::ExportTable;
use crate::models::{CellValue, Column, CompanyRecord};

/// Sort column and direction, passed explicitly on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub column: Column,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: Column::GrahamScore,
            ascending: false,
        }
    }
}

/// A displayed row; `highlight` marks records meeting every criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub record: CompanyRecord,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    pub sort: SortSpec,
    pub full_table: Vec<ViewRow>,
    pub passing: Vec<CompanyRecord>,
    /// `None` when no record passes: there is nothing to export
    pub export: Option<ExportTable>,
}

/// Stable sort on one column. Absent values go last in either direction.
pub fn sort_records(records: &mut [CompanyRecord], sort: &SortSpec) {
    records.sort_by(|a, b| {
        let left = a.cell(sort.column);
        let right = b.cell(sort.column);

        match (left.is_absent(), right.is_absent()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare_present(&left, &right);
                if sort.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        }
    });
}

fn compare_present(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        (CellValue::Number(Some(a)), CellValue::Number(Some(b))) => a.total_cmp(b),
        (CellValue::Flag(Some(a)), CellValue::Flag(Some(b))) => a.cmp(b),
        (CellValue::Score(a), CellValue::Score(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Sort scored records, split out the passing subset and project it onto
/// the export columns. An empty column list means the default export set.
pub fn build_view(
    mut scored: Vec<CompanyRecord>,
    sort: &SortSpec,
    export_columns: &[Column],
) -> ScreenView {
    sort_records(&mut scored, sort);

    let passing: Vec<CompanyRecord> = scored.iter().filter(|r| r.graham_pass).cloned().collect();

    let columns = if export_columns.is_empty() {
        Column::default_export()
    } else {
        export_columns.to_vec()
    };
    let export = ExportTable::from_records(&passing, &columns);

    let full_table = scored
        .into_iter()
        .map(|record| ViewRow {
            highlight: record.graham_pass,
            record,
        })
        .collect();

    ScreenView {
        sort: *sort,
        full_table,
        passing,
        export,
    }
}
