//! `datalens-render`: SVG charts for profiled tables.
//!
//! Each chart is drawn on a fresh per-call surface and returned as a
//! [`ChartArtifact`]: a base64 SVG document plus its dimensions. Charts that
//! do not apply to the given data come back as `Ok(None)`.

pub mod artifact;
pub mod bar;
pub mod error;
pub mod heatmap;
pub mod histogram;
pub mod options;

mod surface;

pub use artifact::{ChartArtifact, SVG_MIME};
pub use bar::{bar_chart, bar_chart_with, category_counts, CategoryCount, OTHER_LABEL};
pub use error::RenderError;
pub use heatmap::{heatmap, heatmap_with};
pub use histogram::{histogram, histogram_with, MAX_BINS};
pub use options::ChartOptions;
