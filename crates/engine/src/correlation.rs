// Pairwise Pearson correlation and significant-pair extraction.

use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::series;
use crate::stat::Stat;
use crate::table::{Column, Table};

pub const CORRELATION_DECIMALS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationOptions {
    /// Minimum |r| for a pair to be reported.
    pub threshold: f64,
    /// |r| at or above this is "strong".
    pub strong: f64,
    /// |r| at or above this (and below `strong`) is "moderate".
    pub moderate: f64,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            strong: 0.7,
            moderate: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Only a strictly positive coefficient is positive; 0.0 reads as negative.
    pub fn of(correlation: f64) -> Self {
        if correlation > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    pub correlation: f64,
    pub strength: Strength,
    pub direction: Direction,
}

/// Symmetric matrix over the numeric columns, diagonal fixed at 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    cells: Vec<Vec<Stat>>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cell by position.
    pub fn at(&self, i: usize, j: usize) -> Stat {
        self.cells
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(Stat::Unavailable)
    }

    /// Cell by column names.
    pub fn get(&self, a: &str, b: &str) -> Option<Stat> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.at(i, j))
    }

    /// Significant pairs, strongest first. Ties keep (i, j) enumeration order.
    pub fn pairs(&self, options: &CorrelationOptions) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let Stat::Value(r) = self.at(i, j) else {
                    continue;
                };
                if r.abs() < options.threshold {
                    continue;
                }
                pairs.push(CorrelationPair {
                    column_a: self.columns[i].clone(),
                    column_b: self.columns[j].clone(),
                    correlation: r,
                    strength: strength_of(r, options),
                    direction: Direction::of(r),
                });
            }
        }
        // sort_by is stable: equal magnitudes stay in enumeration order.
        pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
        pairs
    }
}

/// Serialised as `{ column: { column: value|null } }`.
impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a> {
            columns: &'a [String],
            cells: &'a [Stat],
        }

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for (name, cell) in self.columns.iter().zip(self.cells) {
                    map.serialize_entry(name, cell)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cells) in self.columns.iter().zip(&self.cells) {
            map.serialize_entry(
                name,
                &Row {
                    columns: &self.columns,
                    cells,
                },
            )?;
        }
        map.end()
    }
}

pub fn strength_of(correlation: f64, options: &CorrelationOptions) -> Strength {
    let magnitude = correlation.abs();
    if magnitude >= options.strong {
        Strength::Strong
    } else if magnitude >= options.moderate {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

/// Correlation matrix, or `None` with fewer than two numeric columns.
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    if numeric.len() < 2 {
        debug!(
            "correlation unavailable: {} numeric column(s), need 2",
            numeric.len()
        );
        return None;
    }

    let values: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|c| c.numeric_values().unwrap_or_default())
        .collect();

    let n = numeric.len();
    let mut cells = vec![vec![Stat::Unavailable; n]; n];
    for i in 0..n {
        cells[i][i] = Stat::Value(1.0);
        for j in (i + 1)..n {
            let r = pairwise_pearson(&values[i], &values[j]).rounded(CORRELATION_DECIMALS);
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        cells,
    })
}

/// Pairs with |r| >= `threshold`, using default strength cut-offs.
pub fn correlation_pairs(table: &Table, threshold: f64) -> Vec<CorrelationPair> {
    let options = CorrelationOptions {
        threshold,
        ..CorrelationOptions::default()
    };
    correlation_pairs_with(table, &options)
}

pub fn correlation_pairs_with(table: &Table, options: &CorrelationOptions) -> Vec<CorrelationPair> {
    correlation_matrix(table)
        .map(|matrix| matrix.pairs(options))
        .unwrap_or_default()
}

/// Pearson over rows where both sides are non-null.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Stat {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    Stat::from_option(series::pearson(&xs, &ys))
}
