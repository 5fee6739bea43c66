// Chart defaults. Deserialised from the `charts` section of the settings file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Histogram bucket count.
    pub bins: usize,
    /// Bar chart category limit, including the synthetic "Other" bar.
    pub max_categories: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bins: 30,
            max_categories: 20,
            width: 800,
            height: 500,
        }
    }
}
