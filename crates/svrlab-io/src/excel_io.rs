use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use svrlab_core::{Cell, Column, Dataset, Result, SvrError};

use crate::csv_io::{header_name, parse_cell};

/// Half-open `f64` range exactly representable as `i64`.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Read the first worksheet of an xlsx/xls workbook (first row = header).
pub fn read_excel(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SvrError::unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SvrError::unreadable("the workbook has no worksheets"))?
        .map_err(|e| SvrError::unreadable(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .enumerate()
            .map(|(j, cell)| match cell {
                Data::Empty => header_name("", j),
                other => header_name(&other.to_string(), j),
            })
            .collect(),
        None => return Err(SvrError::unreadable("the worksheet is empty")),
    };

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row.iter()) {
            column.push(to_cell(value));
        }
    }

    Dataset::new(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    )
}

/// Spreadsheets store every number as a float; whole values that fit in
/// `i64` are read back as integers, the way dataframe readers do.
fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Int(v) => Cell::Integer(*v),
        Data::Float(v) if v.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(v) => {
            Cell::Integer(*v as i64)
        }
        Data::Float(v) if v.is_finite() => Cell::Number(*v),
        Data::Float(_) | Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => parse_cell(s),
        other => Cell::Text(other.to_string()),
    }
}
