// Loader knobs. Deserialised from the `loader` section of the settings file.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_BYTES: usize = 10 * 1024;

pub const DEFAULT_FALLBACK_ENCODINGS: &[&str] = &[
    "utf-8",
    "windows-1252",
    "iso-8859-15",
    "windows-1250",
    "windows-1251",
    "shift_jis",
    "gbk",
];

pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Bytes handed to the charset detector.
    pub sample_bytes: usize,
    /// Detector confidence must exceed this for its guess to be tried.
    pub confidence_threshold: f32,
    /// WHATWG labels tried in order when detection fails.
    pub fallback_encodings: Vec<String>,
    /// Cell strings (compared after trimming) read as null.
    pub null_tokens: Vec<String>,
    /// Field delimiter for delimited text; sniffed when unset.
    pub delimiter: Option<char>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sample_bytes: DEFAULT_SAMPLE_BYTES,
            confidence_threshold: 0.7,
            fallback_encodings: DEFAULT_FALLBACK_ENCODINGS.iter().map(|s| s.to_string()).collect(),
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
            delimiter: None,
        }
    }
}

impl LoadOptions {
    pub fn is_null_token(&self, cell: &str) -> bool {
        let trimmed = cell.trim();
        self.null_tokens.iter().any(|t| t == trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_tokens_are_trimmed_and_case_sensitive() {
        let opts = LoadOptions::default();
        assert!(opts.is_null_token("  NA "));
        assert!(opts.is_null_token(""));
        assert!(opts.is_null_token("#N/A N/A"));
        assert!(!opts.is_null_token("Na"));
        assert!(!opts.is_null_token("none"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts: LoadOptions = serde_json::from_str(r#"{"delimiter": ";"}"#).unwrap();
        assert_eq!(opts.delimiter, Some(';'));
        assert_eq!(opts.sample_bytes, DEFAULT_SAMPLE_BYTES);
        assert_eq!(opts.fallback_encodings.len(), 7);
    }
}
