// Application settings
// Loaded from ~/.config/datalens/settings.json

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use datalens_engine::{ClassifierOptions, CorrelationOptions, ProfileOptions};
use datalens_io::LoadOptions;
use datalens_render::ChartOptions;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "invalid settings in {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub loader: LoadOptions,
    pub classifier: ClassifierOptions,
    pub correlation: CorrelationOptions,
    pub charts: ChartOptions,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("datalens");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::from_path(&Self::config_path()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no settings file at {}; using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Engine options for a full profile.
    pub fn profile_options(&self) -> ProfileOptions {
        ProfileOptions {
            classifier: self.classifier.clone(),
            correlation: self.correlation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let settings = Settings::from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_with_comments() {
        let json = r#"{
    // Analysis
    "correlation": { "threshold": 0.3 },

    // Charts
    "charts": { "bins": 12 },
    "loader": { "delimiter": ";" }
}"#;
        let settings = Settings::parse(json).unwrap();
        assert_eq!(settings.correlation.threshold, 0.3);
        assert_eq!(settings.correlation.strong, 0.7);
        assert_eq!(settings.charts.bins, 12);
        assert_eq!(settings.charts.max_categories, 20);
        assert_eq!(settings.loader.delimiter, Some(';'));
        assert_eq!(settings.classifier, ClassifierOptions::default());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ \"charts\": { \"bins\": \"many\" } }").unwrap();

        let err = Settings::from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.classifier.categorical_min_rows = 50;
        settings.loader.null_tokens = vec!["?".into()];
        settings.save(&path).unwrap();

        let loaded = Settings::from_path(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.profile_options().classifier.categorical_min_rows, 50);
    }

    #[test]
    fn test_config_path_location() {
        let path = Settings::config_path();
        assert!(path.ends_with("datalens/settings.json"));
    }
}
