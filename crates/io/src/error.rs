use std::fmt;
use std::io;

use datalens_engine::TableError;

/// Anything that stops a file from becoming a table. No partial table is
/// ever returned alongside one of these.
#[derive(Debug)]
pub enum LoadError {
    /// File could not be opened or read.
    Io(io::Error),
    /// Extension is not one of csv, tsv, xls, xlsx.
    UnsupportedExtension(String),
    /// Structurally unparseable input. `line` is 1-based when known.
    Malformed { line: Option<u64>, message: String },
    /// Spreadsheet container could not be opened or a sheet could not be read.
    Spreadsheet(String),
    /// Parsed columns did not form a valid table.
    Table(TableError),
}

impl LoadError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            line: None,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_at(line: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::UnsupportedExtension(ext) if ext.is_empty() => {
                write!(f, "unsupported file type: no extension")
            }
            Self::UnsupportedExtension(ext) => write!(f, "unsupported file type: .{ext}"),
            Self::Malformed {
                line: Some(line),
                message,
            } => write!(f, "malformed input at line {line}: {message}"),
            Self::Malformed { line: None, message } => write!(f, "malformed input: {message}"),
            Self::Spreadsheet(msg) => write!(f, "spreadsheet error: {msg}"),
            Self::Table(e) => write!(f, "invalid table: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TableError> for LoadError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

impl From<calamine::Error> for LoadError {
    fn from(e: calamine::Error) -> Self {
        Self::Spreadsheet(e.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        Self::Malformed {
            line: e.position().map(|p| p.line()),
            message: e.to_string(),
        }
    }
}
