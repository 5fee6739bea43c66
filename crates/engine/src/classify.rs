// Semantic column typing: numeric, date, categorical or free text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stat::round_to;
use crate::table::{Column, StorageType, Table};

/// Classifier output tag, distinct from the storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Numeric,
    Date,
    Categorical,
    Text,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds for the categorical branch. Both comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// A column is categorical only when distinct/rows is below this ratio...
    pub categorical_ratio: f64,
    /// ...and the table has more rows than this.
    pub categorical_min_rows: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            categorical_ratio: 0.05,
            categorical_min_rows: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub storage_type: &'static str,
    pub missing_count: usize,
    pub missing_percent: f64,
}

/// Classification of every column, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnTypes(Vec<ColumnInfo>);

impl ColumnTypes {
    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.0.iter().find(|info| info.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ColumnInfo> {
        self.0
    }
}

pub fn classify(table: &Table) -> ColumnTypes {
    classify_with(table, &ClassifierOptions::default())
}

pub fn classify_with(table: &Table, options: &ClassifierOptions) -> ColumnTypes {
    let row_count = table.row_count();
    ColumnTypes(
        table
            .columns()
            .iter()
            .map(|column| classify_column(column, row_count, options))
            .collect(),
    )
}

/// Classify one column from its own values only.
pub fn classify_column(column: &Column, row_count: usize, options: &ClassifierOptions) -> ColumnInfo {
    let missing_count = column.null_count();
    let missing_percent = if row_count == 0 {
        0.0
    } else {
        round_to(missing_count as f64 / row_count as f64 * 100.0, 2)
    };

    ColumnInfo {
        name: column.name().to_string(),
        semantic_type: semantic_type(column, row_count, options),
        storage_type: column.storage_type().label(),
        missing_count,
        missing_percent,
    }
}

fn semantic_type(column: &Column, row_count: usize, options: &ClassifierOptions) -> SemanticType {
    match column.storage_type() {
        StorageType::Integer | StorageType::Float => return SemanticType::Numeric,
        StorageType::Datetime => return SemanticType::Date,
        StorageType::Boolean | StorageType::Text => {}
    }

    // Zero rows: ratio undefined, fall through to text.
    if row_count == 0 {
        return SemanticType::Text;
    }

    let distinct_ratio = column.distinct_count() as f64 / row_count as f64;
    if distinct_ratio < options.categorical_ratio && row_count > options.categorical_min_rows {
        SemanticType::Categorical
    } else {
        SemanticType::Text
    }
}
