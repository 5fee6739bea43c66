// Typed, column-major table produced by the loader and read by every analysis.

use std::collections::HashSet;
use std::fmt;
use std::mem::size_of;

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Serialize, Serializer};

use crate::error::TableError;

/// ISO-8601 layout used whenever a datetime leaves the engine as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Elementary storage type of a column, as inferred at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Integer,
    Float,
    Boolean,
    Datetime,
    Text,
}

impl StorageType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Text => "text",
        }
    }

    /// Integer and float columns feed statistics, correlation and histograms.
    /// Booleans do not.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column storage. `None` is an explicit null.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Datetime(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Datetime(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::Integer(_) => StorageType::Integer,
            Self::Float(_) => StorageType::Float,
            Self::Boolean(_) => StorageType::Boolean,
            Self::Datetime(_) => StorageType::Datetime,
            Self::Text(_) => StorageType::Text,
        }
    }
}

/// A single cell detached from its column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(NaiveDateTime),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Datetime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Float(_) => serializer.serialize_none(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Datetime(dt) => serializer.collect_str(&dt.format(DATETIME_FORMAT)),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn storage_type(&self) -> StorageType {
        self.data.storage_type()
    }

    pub fn is_numeric(&self) -> bool {
        self.storage_type().is_numeric()
    }

    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Datetime(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Cell at `row`; out-of-range rows read as null.
    pub fn value(&self, row: usize) -> Value {
        match &self.data {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Integer),
            ColumnData::Float(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Float),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Boolean),
            ColumnData::Datetime(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Datetime),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|s| s.clone())
                .map_or(Value::Null, Value::Text),
        }
    }

    /// Numeric view keeping nulls in place, or `None` for a non-numeric column.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        match &self.data {
            ColumnData::Integer(v) => Some(v.iter().map(|x| x.map(|n| n as f64)).collect()),
            ColumnData::Float(v) => Some(
                v.iter()
                    .map(|x| x.filter(|n| !n.is_nan()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The clean series: non-null numeric values in row order.
    pub fn clean_numeric(&self) -> Option<Vec<f64>> {
        self.numeric_values()
            .map(|values| values.into_iter().flatten().collect())
    }

    /// Number of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            ColumnData::Float(v) => v
                .iter()
                .flatten()
                .map(|n| OrderedFloat(*n))
                .collect::<HashSet<_>>()
                .len(),
            ColumnData::Boolean(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            ColumnData::Datetime(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            ColumnData::Text(v) => v
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    /// Approximate resident size: the value vector plus text heap bytes and the name.
    pub fn approx_memory_bytes(&self) -> usize {
        let values = match &self.data {
            ColumnData::Integer(v) => v.len() * size_of::<Option<i64>>(),
            ColumnData::Float(v) => v.len() * size_of::<Option<f64>>(),
            ColumnData::Boolean(v) => v.len() * size_of::<Option<bool>>(),
            ColumnData::Datetime(v) => v.len() * size_of::<Option<NaiveDateTime>>(),
            ColumnData::Text(v) => {
                v.len() * size_of::<Option<String>>()
                    + v.iter().flatten().map(String::capacity).sum::<usize>()
            }
        };
        values + self.name.capacity()
    }
}

/// Ordered set of equal-length, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(TableError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Integer and float columns, in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn approx_memory_bytes(&self) -> usize {
        self.columns.iter().map(Column::approx_memory_bytes).sum()
    }
}
