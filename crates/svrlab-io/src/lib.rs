pub mod csv_io;
pub mod excel_io;

use std::path::Path;

use svrlab_core::{Dataset, Result, SvrError};

pub use csv_io::{parse_cell, read_csv};
pub use excel_io::read_excel;

/// Upload formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub const ALLOWED_EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Detect the format from the file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }
}

/// Parse an uploaded payload into a [`Dataset`], dispatching on the file name.
pub fn read_table(filename: &str, bytes: &[u8]) -> Result<Dataset> {
    match FileFormat::from_filename(filename) {
        Some(FileFormat::Csv) => read_csv(bytes),
        Some(FileFormat::Xlsx | FileFormat::Xls) => read_excel(bytes),
        None => Err(SvrError::unreadable(format!(
            "Unsupported file format: '{}'",
            filename
        ))),
    }
}

/// Read a table from disk.
pub fn read_path(path: &Path) -> Result<Dataset> {
    let bytes = std::fs::read(path)
        .map_err(|e| SvrError::unreadable(format!("{}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_table(&filename, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_filename("data.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_filename("book.v2.xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_filename("old.xls"), Some(FileFormat::Xls));
        assert_eq!(FileFormat::from_filename("notes.txt"), None);
        assert_eq!(FileFormat::from_filename("csv"), None);
    }

    #[test]
    fn test_read_table_rejects_unknown_extension() {
        let err = read_table("data.json", b"{}").unwrap_err();
        assert_eq!(err.kind(), "UnreadableDataError");
    }
}
