use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [crate::PerftestEtl] run.
///
/// Can be built in code or loaded from a TOML file:
///
/// ```toml
/// output = "/tmp/perftest/output.json"
/// metrics = ["firstPaint"]
/// exclude = ["loadtime"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Path the processed series are written to
    pub output: PathBuf,
    /// Only keep metrics whose subtest contains one of these. Keeps everything when empty.
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Drop metrics whose subtest contains one of these
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl EtlConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    /// Builds an [`EtlConfig`] with the specified metrics to include.
    pub fn metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds an [`EtlConfig`] with the specified metrics to exclude.
    pub fn exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Load the configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Could not parse config file: {}", path.display()))
    }
}
