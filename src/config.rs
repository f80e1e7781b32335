//! Configuration loading from TOML.
//!
//! Reads `testkit.toml` and deserializes into strongly-typed structs.
//! Every field has a default, so a partial file (or no file at all via
//! `TestkitConfig::default()`) gives the stock exclusion lists and the
//! mldata.org endpoint.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Top-level testkit configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TestkitConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub mldata: MldataConfig,
}

/// Registry scan settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Name of the root estimator marker; never reported by a scan.
    pub root_name: String,
    /// Module path segment that marks a test module.
    pub test_segment: String,
    /// Estimators that need another estimator to be constructed.
    pub meta_estimators: Vec<String>,
    /// Estimators with no sensible default construction.
    pub other: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root_name: "BaseEstimator".to_string(),
            test_segment: "tests".to_string(),
            meta_estimators: [
                "OneVsOneClassifier",
                "OutputCodeClassifier",
                "OneVsRestClassifier",
                "RFE",
                "RFECV",
                "BaseEnsemble",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            other: ["Pipeline", "FeatureUnion", "GridSearchCV", "RandomizedSearchCV"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DiscoveryConfig {
    pub fn is_meta(&self, name: &str) -> bool {
        self.meta_estimators.iter().any(|m| m == name)
    }

    pub fn is_other(&self, name: &str) -> bool {
        self.other.iter().any(|o| o == name)
    }
}

/// Dataset repository settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MldataConfig {
    /// Download URL prefix; the normalized dataset name is appended.
    pub base_url: String,
    /// Cache directory. Payloads land in `<data_home>/mldata/`.
    pub data_home: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for MldataConfig {
    fn default() -> Self {
        Self {
            base_url: "http://mldata.org/repository/data/download/matlab/".to_string(),
            data_home: None,
            timeout_secs: 30,
        }
    }
}

impl TestkitConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: TestkitConfig =
            toml::from_str(contents).context("Invalid testkit configuration")?;
        Ok(config)
    }
}
