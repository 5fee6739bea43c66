use std::fmt;

/// Errors raised while assembling a [`crate::table::Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// Two columns share a name.
    DuplicateColumn(String),
    /// A column's length differs from the first column's.
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate column name '{name}'"),
            Self::LengthMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column '{column}' has {actual} rows, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for TableError {}
