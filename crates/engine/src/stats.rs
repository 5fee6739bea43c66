// Descriptive statistics over numeric columns.

use std::fmt;

use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::series;
use crate::stat::Stat;
use crate::table::{Column, Table};

/// Decimal places for every reported float.
pub const STAT_DECIMALS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Count,
    Mean,
    Std,
    Min,
    Q1,
    Median,
    Q3,
    Max,
    Variance,
    Skewness,
    Kurtosis,
}

impl StatName {
    /// Summary block followed by the extended rows, in report order.
    pub const ALL: [StatName; 11] = [
        StatName::Count,
        StatName::Mean,
        StatName::Std,
        StatName::Min,
        StatName::Q1,
        StatName::Median,
        StatName::Q3,
        StatName::Max,
        StatName::Variance,
        StatName::Skewness,
        StatName::Kurtosis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Min => "min",
            Self::Q1 => "q1",
            Self::Median => "median",
            Self::Q3 => "q3",
            Self::Max => "max",
            Self::Variance => "variance",
            Self::Skewness => "skewness",
            Self::Kurtosis => "kurtosis",
        }
    }

    /// Compute this statistic over an ascending clean series. Unrounded.
    fn compute(&self, sorted: &[f64]) -> Stat {
        let value = match self {
            Self::Count => Some(sorted.len() as f64),
            Self::Mean => series::mean(sorted),
            Self::Std => series::sample_std(sorted),
            Self::Min => sorted.first().copied(),
            Self::Q1 => series::quantile_sorted(sorted, 0.25),
            Self::Median => series::quantile_sorted(sorted, 0.5),
            Self::Q3 => series::quantile_sorted(sorted, 0.75),
            Self::Max => sorted.last().copied(),
            Self::Variance => series::sample_variance(sorted),
            Self::Skewness => series::skewness(sorted),
            Self::Kurtosis => series::kurtosis(sorted),
        };
        Stat::from_option(value)
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statistic across every numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub stat: StatName,
    pub values: Vec<Stat>,
}

/// Numeric column × statistic grid, every cell rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    columns: Vec<String>,
    rows: Vec<StatRow>,
}

impl DescriptiveStats {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn get(&self, column: &str, stat: StatName) -> Option<Stat> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|row| row.stat == stat)
            .and_then(|row| row.values.get(idx).copied())
    }
}

/// Serialised as `{ column: { stat: value|null } }`.
impl Serialize for DescriptiveStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct ColumnCells<'a> {
            stats: &'a DescriptiveStats,
            index: usize,
        }

        impl Serialize for ColumnCells<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.stats.rows.len()))?;
                for row in &self.stats.rows {
                    map.serialize_entry(row.stat.as_str(), &row.values[self.index])?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (index, column) in self.columns.iter().enumerate() {
            map.serialize_entry(column, &ColumnCells { stats: self, index })?;
        }
        map.end()
    }
}

/// Single-column report. Counts are exact; every float is rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Stat,
    pub median: Stat,
    pub mode: Stat,
    pub std: Stat,
    pub variance: Stat,
    pub min: Stat,
    pub max: Stat,
    pub q1: Stat,
    pub q3: Stat,
    pub iqr: Stat,
    pub range: Stat,
    pub skewness: Stat,
    pub kurtosis: Stat,
}

/// Statistics for every numeric column, or `None` when the table has none.
pub fn table_stats(table: &Table) -> Option<DescriptiveStats> {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    if numeric.is_empty() {
        debug!("table stats unavailable: no numeric columns");
        return None;
    }

    let series: Vec<Vec<f64>> = numeric.iter().map(|c| sorted_clean(c)).collect();
    let rows = StatName::ALL
        .iter()
        .map(|stat| StatRow {
            stat: *stat,
            values: series
                .iter()
                .map(|s| stat.compute(s).rounded(STAT_DECIMALS))
                .collect(),
        })
        .collect();

    Some(DescriptiveStats {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        rows,
    })
}

/// Statistics for one numeric column, or `None` when the column is missing,
/// not numeric, or has no non-null values.
pub fn column_stats(table: &Table, name: &str) -> Option<ColumnStats> {
    let Some(column) = table.column(name) else {
        debug!("column stats unavailable: no column '{name}'");
        return None;
    };
    if !column.is_numeric() {
        debug!("column stats unavailable: '{name}' is {}", column.storage_type());
        return None;
    }

    let sorted = sorted_clean(column);
    if sorted.is_empty() {
        debug!("column stats unavailable: '{name}' has no values");
        return None;
    }

    let q1 = StatName::Q1.compute(&sorted);
    let q3 = StatName::Q3.compute(&sorted);
    let min = StatName::Min.compute(&sorted);
    let max = StatName::Max.compute(&sorted);

    Some(ColumnStats {
        column: name.to_string(),
        count: sorted.len(),
        missing: column.null_count(),
        mean: StatName::Mean.compute(&sorted).rounded(STAT_DECIMALS),
        median: StatName::Median.compute(&sorted).rounded(STAT_DECIMALS),
        mode: Stat::from_option(series::mode(&sorted)).rounded(STAT_DECIMALS),
        std: StatName::Std.compute(&sorted).rounded(STAT_DECIMALS),
        variance: StatName::Variance.compute(&sorted).rounded(STAT_DECIMALS),
        min: min.rounded(STAT_DECIMALS),
        max: max.rounded(STAT_DECIMALS),
        q1: q1.rounded(STAT_DECIMALS),
        q3: q3.rounded(STAT_DECIMALS),
        iqr: difference(q3, q1).rounded(STAT_DECIMALS),
        range: difference(max, min).rounded(STAT_DECIMALS),
        skewness: StatName::Skewness.compute(&sorted).rounded(STAT_DECIMALS),
        kurtosis: StatName::Kurtosis.compute(&sorted).rounded(STAT_DECIMALS),
    })
}

fn difference(a: Stat, b: Stat) -> Stat {
    match (a, b) {
        (Stat::Value(a), Stat::Value(b)) => Stat::from_f64(a - b),
        _ => Stat::Unavailable,
    }
}

fn sorted_clean(column: &Column) -> Vec<f64> {
    let mut values = column.clean_numeric().unwrap_or_default();
    values.sort_by(f64::total_cmp);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnData;

    fn table() -> Table {
        Table::new(vec![
            Column::new("a", ColumnData::Integer(vec![Some(1), Some(2), Some(3), Some(4), None])),
            Column::new("flat", ColumnData::Float(vec![Some(2.5); 5])),
            Column::new("name", ColumnData::Text(vec![Some("x".into()); 5])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_stats_covers_numeric_columns_only() {
        let stats = table_stats(&table()).unwrap();
        assert_eq!(stats.columns(), &["a".to_string(), "flat".to_string()]);
        assert_eq!(stats.rows().len(), 11);
        assert_eq!(stats.get("a", StatName::Count), Some(Stat::Value(4.0)));
        assert_eq!(stats.get("a", StatName::Mean), Some(Stat::Value(2.5)));
        assert_eq!(stats.get("a", StatName::Std), Some(Stat::Value(1.291)));
        assert_eq!(stats.get("a", StatName::Q1), Some(Stat::Value(1.75)));
        assert_eq!(stats.get("a", StatName::Variance), Some(Stat::Value(1.667)));
        assert_eq!(stats.get("name", StatName::Count), None);
    }

    #[test]
    fn test_degenerate_cells_do_not_abort_the_table() {
        let stats = table_stats(&table()).unwrap();
        assert_eq!(stats.get("flat", StatName::Skewness), Some(Stat::Unavailable));
        assert_eq!(stats.get("flat", StatName::Kurtosis), Some(Stat::Unavailable));
        assert_eq!(stats.get("flat", StatName::Variance), Some(Stat::Value(0.0)));
        assert_eq!(stats.get("flat", StatName::Mean), Some(Stat::Value(2.5)));
        // Other columns stay fully populated.
        assert_eq!(stats.get("a", StatName::Skewness), Some(Stat::Value(0.0)));
        assert_eq!(stats.get("a", StatName::Kurtosis), Some(Stat::Value(-1.2)));
    }

    #[test]
    fn test_all_null_numeric_column_keeps_zero_count() {
        let table = Table::new(vec![Column::new("empty", ColumnData::Float(vec![None; 3]))]).unwrap();
        let stats = table_stats(&table).unwrap();
        assert_eq!(stats.get("empty", StatName::Count), Some(Stat::Value(0.0)));
        assert_eq!(stats.get("empty", StatName::Mean), Some(Stat::Unavailable));
        assert_eq!(stats.get("empty", StatName::Max), Some(Stat::Unavailable));
    }

    #[test]
    fn test_no_numeric_columns_is_unavailable() {
        let table = Table::new(vec![Column::new("t", ColumnData::Text(vec![Some("a".into())]))]).unwrap();
        assert!(table_stats(&table).is_none());
    }

    #[test]
    fn test_table_stats_is_idempotent() {
        let t = table();
        assert_eq!(table_stats(&t), table_stats(&t));
    }

    #[test]
    fn test_column_stats() {
        let table = Table::new(vec![Column::new(
            "v",
            ColumnData::Float(vec![Some(1.0), Some(2.0), Some(2.0), None, Some(3.0), Some(10.0)]),
        )])
        .unwrap();
        let stats = column_stats(&table, "v").unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.mean, Stat::Value(3.6));
        assert_eq!(stats.median, Stat::Value(2.0));
        assert_eq!(stats.mode, Stat::Value(2.0));
        assert_eq!(stats.min, Stat::Value(1.0));
        assert_eq!(stats.max, Stat::Value(10.0));
        assert_eq!(stats.q1, Stat::Value(2.0));
        assert_eq!(stats.q3, Stat::Value(3.0));
        assert_eq!(stats.iqr, Stat::Value(1.0));
        assert_eq!(stats.range, Stat::Value(9.0));
        assert!(stats.skewness.is_available());
        assert!(stats.kurtosis.is_available());
    }

    #[test]
    fn test_column_stats_without_repeats_has_no_mode() {
        let table = Table::new(vec![Column::new("v", ColumnData::Integer(vec![Some(3), Some(1), Some(2)]))]).unwrap();
        let stats = column_stats(&table, "v").unwrap();
        assert_eq!(stats.mode, Stat::Unavailable);
        assert_eq!(stats.kurtosis, Stat::Unavailable);
    }

    #[test]
    fn test_column_stats_unavailable_cases() {
        let t = table();
        assert!(column_stats(&t, "missing").is_none());
        assert!(column_stats(&t, "name").is_none());

        let nulls = Table::new(vec![Column::new("n", ColumnData::Float(vec![None, None]))]).unwrap();
        assert!(column_stats(&nulls, "n").is_none());
    }

    #[test]
    fn test_descriptive_stats_json_shape() {
        let json = serde_json::to_value(table_stats(&table()).unwrap()).unwrap();
        assert_eq!(json["a"]["count"], 4.0);
        assert_eq!(json["a"]["median"], 2.5);
        assert!(json["flat"]["skewness"].is_null());
        let keys: Vec<&String> = json["a"].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 11);
    }
}
