//! `datalens-engine`: typed tables and the analyses run over them.
//!
//! Pure engine crate: receives a loaded [`Table`], returns classification,
//! statistics and correlation results. No file or rendering dependencies.

pub mod classify;
pub mod correlation;
pub mod error;
pub mod overview;
pub mod profile;
pub mod series;
pub mod stat;
pub mod stats;
pub mod table;

pub use classify::{classify, classify_with, ClassifierOptions, ColumnInfo, ColumnTypes, SemanticType};
pub use correlation::{
    correlation_matrix, correlation_pairs, correlation_pairs_with, CorrelationMatrix,
    CorrelationOptions, CorrelationPair, Direction, Strength,
};
pub use error::TableError;
pub use overview::{basic_info, preview, BasicInfo, Preview, PreviewRow};
pub use profile::{profile, profile_with, Profile, ProfileOptions};
pub use stat::Stat;
pub use stats::{column_stats, table_stats, ColumnStats, DescriptiveStats, StatName};
pub use table::{Column, ColumnData, StorageType, Table, Value};
