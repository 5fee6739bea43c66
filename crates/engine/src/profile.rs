// One-shot report bundling every table-level analysis.

use serde::Serialize;

use crate::classify::{classify_with, ClassifierOptions, ColumnTypes};
use crate::correlation::{correlation_matrix, CorrelationMatrix, CorrelationOptions, CorrelationPair};
use crate::overview::{basic_info, BasicInfo};
use crate::stats::{table_stats, DescriptiveStats};
use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileOptions {
    pub classifier: ClassifierOptions,
    pub correlation: CorrelationOptions,
}

/// `None` sections serialise as `null`: there was nothing numeric to analyse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub info: BasicInfo,
    pub column_types: ColumnTypes,
    pub statistics: Option<DescriptiveStats>,
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub correlation_pairs: Vec<CorrelationPair>,
}

pub fn profile(table: &Table) -> Profile {
    profile_with(table, &ProfileOptions::default())
}

pub fn profile_with(table: &Table, options: &ProfileOptions) -> Profile {
    let matrix = correlation_matrix(table);
    let pairs = matrix
        .as_ref()
        .map(|m| m.pairs(&options.correlation))
        .unwrap_or_default();

    Profile {
        info: basic_info(table),
        column_types: classify_with(table, &options.classifier),
        statistics: table_stats(table),
        correlation_matrix: matrix,
        correlation_pairs: pairs,
    }
}
