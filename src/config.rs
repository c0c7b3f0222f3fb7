//! Tunable parameters for matching and layout.
//!
//! Values come from an optional TOML file, then `FPG_*` environment
//! variables, and are validated before they reach the engines.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::confidence::ConfidenceWeights;
use crate::layout::{Language, LayoutOptions};
use crate::matching::DEFAULT_REVIEW_THRESHOLD;

pub const CONFIG_FILE_NAME: &str = "fotoprotokoll.toml";
const ENV_PREFIX: &str = "FPG_";
const DEFAULT_PROJECT_DIR: &str = "./data";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub match_confidence_threshold: f64,
    pub temporal_weight: f64,
    pub semantic_weight: f64,
    pub max_photos_per_page: usize,
    pub language: Language,
    pub section_dividers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let weights = ConfidenceWeights::default();
        let layout = LayoutOptions::default();
        Self {
            project_dir: PathBuf::from(DEFAULT_PROJECT_DIR),
            match_confidence_threshold: DEFAULT_REVIEW_THRESHOLD,
            temporal_weight: weights.temporal,
            semantic_weight: weights.semantic,
            max_photos_per_page: layout.max_photos_per_page,
            language: layout.language,
            section_dividers: layout.section_dividers,
        }
    }
}

impl Settings {
    /// Loads `config` if given, else `<project_dir>/fotoprotokoll.toml` when present,
    /// applies environment overrides and validates the result.
    pub fn load(project_dir: Option<&Path>, config: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(project_dir, config, |key| {
            std::env::var(format!("{ENV_PREFIX}{key}")).ok()
        })
    }

    /// `load` with `FPG_*` values looked up through `env` (key without prefix).
    ///
    /// The project directory comes from the argument, then `FPG_PROJECT_DIR`,
    /// then the settings file, then the default.
    pub fn load_with<F>(
        project_dir: Option<&Path>,
        config: Option<&Path>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_dir = project_dir
            .map(Path::to_path_buf)
            .or_else(|| env("PROJECT_DIR").map(PathBuf::from));

        let config_path = config.map(Path::to_path_buf).unwrap_or_else(|| {
            explicit_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR))
                .join(CONFIG_FILE_NAME)
        });

        let mut settings = if config.is_some() || config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };
        if let Some(dir) = explicit_dir {
            settings.project_dir = dir;
        }
        settings.apply_overrides(env)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies `FPG_*` overrides looked up through `lookup` (key without prefix).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MATCH_CONFIDENCE_THRESHOLD") {
            self.match_confidence_threshold = parse_env("MATCH_CONFIDENCE_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("TEMPORAL_WEIGHT") {
            self.temporal_weight = parse_env("TEMPORAL_WEIGHT", &v)?;
        }
        if let Some(v) = lookup("SEMANTIC_WEIGHT") {
            self.semantic_weight = parse_env("SEMANTIC_WEIGHT", &v)?;
        }
        if let Some(v) = lookup("MAX_PHOTOS_PER_PAGE") {
            self.max_photos_per_page = parse_env("MAX_PHOTOS_PER_PAGE", &v)?;
        }
        if let Some(v) = lookup("SECTION_DIVIDERS") {
            self.section_dividers = parse_env("SECTION_DIVIDERS", &v)?;
        }
        if let Some(v) = lookup("LANGUAGE") {
            self.language = match v.trim().to_lowercase().as_str() {
                "de" => Language::De,
                "en" => Language::En,
                _ => return Err(invalid_env("LANGUAGE", &v)),
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.match_confidence_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "match_confidence_threshold",
                expected: "between 0.0 and 1.0",
                value: self.match_confidence_threshold.to_string(),
            });
        }
        for (field, weight) in [
            ("temporal_weight", self.temporal_weight),
            ("semantic_weight", self.semantic_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::OutOfRange {
                    field,
                    expected: "between 0.0 and 1.0",
                    value: weight.to_string(),
                });
            }
        }
        let sum = self.temporal_weight + self.semantic_weight;
        if sum > 1.0 + 1e-9 {
            return Err(ConfigError::OutOfRange {
                field: "temporal_weight + semantic_weight",
                expected: "at most 1.0",
                value: sum.to_string(),
            });
        }
        if self.max_photos_per_page < 1 {
            return Err(ConfigError::OutOfRange {
                field: "max_photos_per_page",
                expected: "at least 1",
                value: self.max_photos_per_page.to_string(),
            });
        }
        Ok(())
    }

    pub fn weights(&self) -> ConfidenceWeights {
        ConfidenceWeights::new(self.temporal_weight, self.semantic_weight)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            max_photos_per_page: self.max_photos_per_page,
            section_dividers: self.section_dividers,
            language: self.language,
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join(".cache")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join("output")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid_env(key, value))
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: format!("{ENV_PREFIX}{key}"),
        value: value.to_string(),
    }
}
