use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use svrlab_core::{Cell, Column, Dataset};

/// Rows included in [`DatasetInfo::preview`].
pub const PREVIEW_ROWS: usize = 5;

/// Summary of an uploaded table. Every map follows the column order of the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub filename: String,
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub dtypes: IndexMap<String, String>,
    pub missing_values: IndexMap<String, usize>,
    pub preview: Vec<IndexMap<String, Value>>,
}

/// Describe a dataset: shape, column types, missing counts and the first rows.
pub fn describe(filename: &str, dataset: &Dataset) -> DatasetInfo {
    let columns = dataset.columns();

    let preview = (0..dataset.n_rows().min(PREVIEW_ROWS))
        .map(|i| {
            columns
                .iter()
                .map(|c| (c.name().to_string(), preview_value(c, i)))
                .collect()
        })
        .collect();

    DatasetInfo {
        filename: filename.to_string(),
        shape: (dataset.n_rows(), dataset.n_cols()),
        columns: dataset.column_names(),
        dtypes: columns
            .iter()
            .map(|c| (c.name().to_string(), c.dtype_name().to_string()))
            .collect(),
        missing_values: columns
            .iter()
            .map(|c| (c.name().to_string(), c.missing_count()))
            .collect(),
        preview,
    }
}

/// JSON form of one cell. Integers in a `float64` column render as floats.
fn preview_value(column: &Column, row: usize) -> Value {
    match &column.cells()[row] {
        Cell::Missing => Value::String(String::new()),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Integer(v) if column.dtype_name() == "int64" => Value::from(*v),
        Cell::Integer(v) => float_value(*v as f64),
        Cell::Number(v) => float_value(*v),
    }
}

fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::integer("x", &[1, 2, 3, 4, 5, 6]),
            Column::new(
                "z",
                vec![
                    Cell::Number(0.5),
                    Cell::Missing,
                    Cell::Number(1.5),
                    Cell::Number(2.0),
                    Cell::Number(2.5),
                    Cell::Number(3.0),
                ],
            ),
            Column::new(
                "label",
                ["a", "b", "c", "d", "e", "f"]
                    .iter()
                    .map(|s| Cell::Text(s.to_string()))
                    .collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_describe() {
        let info = describe("data.csv", &dataset());
        assert_eq!(info.shape, (6, 3));
        assert_eq!(info.columns, vec!["x", "z", "label"]);
        assert_eq!(info.dtypes["x"], "int64");
        assert_eq!(info.dtypes["z"], "float64");
        assert_eq!(info.dtypes["label"], "object");
        assert_eq!(info.missing_values["z"], 1);
        assert_eq!(info.preview.len(), PREVIEW_ROWS);
    }

    #[test]
    fn test_serialized_shape_and_order() {
        let value = serde_json::to_value(describe("data.csv", &dataset())).unwrap();
        assert_eq!(value["shape"], json!([6, 3]));
        assert_eq!(value["preview"][1], json!({"x": 2, "z": "", "label": "b"}));
        assert_eq!(value["preview"][0]["z"], json!(0.5));

        let keys: Vec<&String> = value["dtypes"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["x", "z", "label"]);
    }

    #[test]
    fn test_preview_keeps_large_and_whole_floats() {
        let ds = Dataset::new(vec![
            Column::numeric("f", &[1.0, 2.0]),
            Column::numeric("big", &[1e20, 2e20]),
            Column::new("gappy", vec![Cell::Integer(3), Cell::Missing]),
        ])
        .unwrap();
        let info = describe("wide.csv", &ds);
        assert_eq!(info.dtypes["f"], "float64");
        assert_eq!(info.dtypes["big"], "float64");
        assert_eq!(info.dtypes["gappy"], "float64");

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["preview"][0]["big"], json!(1e20));
        assert_eq!(value["preview"][0]["f"], json!(1.0));
        assert!(value["preview"][0]["f"].is_f64());
        assert_eq!(value["preview"][0]["gappy"], json!(3.0));
        assert!(value["preview"][0]["gappy"].is_f64());
    }
}
