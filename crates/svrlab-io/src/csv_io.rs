use svrlab_core::{Cell, Column, Dataset, Result, SvrError};

/// Tokens read as a missing value, in addition to the empty string.
const MISSING_MARKERS: [&str; 14] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
    "#NA", "-1.#IND",
];

/// Interpret one raw text field.
///
/// An optionally signed run of digits that fits in `i64` becomes `Integer`;
/// any other finite number (`1.0`, `1e20`) becomes `Number`. Missing markers
/// become `Missing`, and anything else (including `inf`) stays text.
pub fn parse_cell(raw: &str) -> Cell {
    let field = raw.trim();
    if field.is_empty() || MISSING_MARKERS.contains(&field) {
        return Cell::Missing;
    }
    if is_integer_token(field) {
        if let Ok(v) = field.parse::<i64>() {
            return Cell::Integer(v);
        }
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        Ok(v) if v.is_nan() => Cell::Missing,
        _ => Cell::Text(field.to_string()),
    }
}

fn is_integer_token(field: &str) -> bool {
    let digits = field.strip_prefix(&['+', '-'][..]).unwrap_or(field);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Read delimited text (first row = header) into a typed [`Dataset`].
///
/// Rows with a different field count than the header are rejected.
pub fn read_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| SvrError::unreadable(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(j, h)| header_name(h, j))
        .collect();

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result.map_err(|e| SvrError::unreadable(e.to_string()))?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(parse_cell(field));
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

pub(crate) fn header_name(raw: &str, index: usize) -> String {
    let name = raw.trim();
    if name.is_empty() {
        format!("Unnamed: {}", index)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svrlab_core::ColumnKind;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" 3.5 "), Cell::Number(3.5));
        assert_eq!(parse_cell("-12"), Cell::Integer(-12));
        assert_eq!(parse_cell("+7"), Cell::Integer(7));
        assert_eq!(parse_cell("1.0"), Cell::Number(1.0));
        assert_eq!(parse_cell("1e3"), Cell::Number(1000.0));
        // beyond i64: kept as a float rather than wrapped or saturated
        assert_eq!(parse_cell("99999999999999999999"), Cell::Number(1e20));
        assert_eq!(parse_cell(""), Cell::Missing);
        assert_eq!(parse_cell("NaN"), Cell::Missing);
        assert_eq!(parse_cell("NA"), Cell::Missing);
        assert_eq!(parse_cell("inf"), Cell::Text("inf".into()));
        assert_eq!(parse_cell("red"), Cell::Text("red".into()));
    }

    #[test]
    fn test_read_csv_types_and_missing() {
        let data = b"x1,x2,color,y\n1,0.5,red,2\n2,,blue,4\n3,1.5,red,\n";
        let ds = read_csv(data).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column_names(), vec!["x1", "x2", "color", "y"]);
        assert_eq!(ds.column("x1").unwrap().kind(), ColumnKind::Integer);
        assert_eq!(ds.column("x2").unwrap().kind(), ColumnKind::Float);
        assert_eq!(ds.column("x2").unwrap().missing_count(), 1);
        assert_eq!(ds.column("color").unwrap().kind(), ColumnKind::Text);
        assert_eq!(ds.column("y").unwrap().dtype_name(), "float64");
    }

    #[test]
    fn test_dtype_follows_how_values_are_written() {
        let ds = read_csv(b"i,f,big\n1,1.0,1e20\n2,2.0,2e20\n").unwrap();
        assert_eq!(ds.column("i").unwrap().dtype_name(), "int64");
        assert_eq!(ds.column("f").unwrap().dtype_name(), "float64");
        assert_eq!(ds.column("big").unwrap().dtype_name(), "float64");
        assert_eq!(ds.column("big").unwrap().cells()[0], Cell::Number(1e20));
    }

    #[test]
    fn test_read_csv_rejects_ragged_rows() {
        let err = read_csv(b"a,b\n1,2\n3\n").unwrap_err();
        assert_eq!(err.kind(), "UnreadableDataError");
    }

    #[test]
    fn test_read_csv_rejects_empty() {
        assert!(read_csv(b"").is_err());
        assert!(read_csv(b"a,b\n").is_err());
    }

    #[test]
    fn test_blank_header_is_named() {
        let ds = read_csv(b",v\n0,1\n1,2\n").unwrap();
        assert_eq!(ds.column_names(), vec!["Unnamed: 0", "v"]);
    }
}
