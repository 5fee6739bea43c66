//! `datalens-io`: loads delimited text and spreadsheets into a [`Table`].
//!
//! Delimited files go through encoding recovery (BOM, detector, fallback
//! chain, lossy last resort); spreadsheets are read with calamine.

pub mod csv;
pub mod encoding;
pub mod error;
pub mod infer;
pub mod options;
pub mod xlsx;

use std::fmt;
use std::path::Path;

use datalens_engine::Table;
use log::info;
use serde::Serialize;

pub use encoding::DecodePath;
pub use error::LoadError;
pub use options::LoadOptions;

/// Source format, chosen by extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Tsv,
    Xls,
    Xlsx,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(LoadError::UnsupportedExtension(ext)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xls | Self::Xlsx)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file was read. Encoding fields are `None` for spreadsheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub format: Format,
    pub encoding: Option<&'static str>,
    pub decode_path: Option<DecodePath>,
    pub delimiter: Option<char>,
    pub sheet: Option<String>,
}

pub fn load(path: &Path) -> Result<Table, LoadError> {
    load_with(path, &LoadOptions::default())
}

pub fn load_with(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    load_with_report(path, options).map(|(table, _)| table)
}

pub fn load_with_report(path: &Path, options: &LoadOptions) -> Result<(Table, LoadReport), LoadError> {
    let format = Format::from_path(path)?;

    let (table, report) = match format {
        Format::Csv | Format::Tsv => {
            let default_delimiter = (format == Format::Tsv).then_some(b'\t');
            let import = csv::import(path, default_delimiter, options)?;
            let report = LoadReport {
                format,
                encoding: Some(import.encoding),
                decode_path: Some(import.decode_path),
                delimiter: Some(import.delimiter as char),
                sheet: None,
            };
            (import.table, report)
        }
        Format::Xls | Format::Xlsx => {
            let import = xlsx::import(path, options)?;
            let report = LoadReport {
                format,
                encoding: None,
                decode_path: None,
                delimiter: None,
                sheet: Some(import.sheet),
            };
            (import.table, report)
        }
    };

    info!(
        "loaded {} ({format}): {} rows x {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("x.tsv")).unwrap(), Format::Tsv);
        assert_eq!(Format::from_path(Path::new("x.Xlsx")).unwrap(), Format::Xlsx);
        assert_eq!(Format::from_path(Path::new("x.xls")).unwrap(), Format::Xls);

        let err = Format::from_path(Path::new("notes.txt")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: .txt");
        let err = Format::from_path(Path::new("README")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: no extension");
    }
}
