use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use swbm::Parameters;

/// Top-level run configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SwbmConfig {
    #[serde(default)]
    pub io: IoConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub evaluate: EvaluateToml,

    #[serde(default)]
    pub sweep: SweepToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Raw input table (CSV).
    pub input: Option<PathBuf>,
    /// Simulated trajectory (CSV).
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Number of days to simulate; whole series when absent.
    pub n_days: Option<usize>,
    /// Inline parameters; take precedence over `parameter_file`.
    pub params: Option<Parameters>,
    /// TOML file with named parameter sets.
    pub parameter_file: Option<PathBuf>,
    /// Set to pick from `parameter_file`; empty selects `[default]`.
    #[serde(default)]
    pub parameter_set: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EvaluateToml {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SweepToml {
    #[serde(default)]
    pub parameter_sets: Vec<Parameters>,
}

impl SwbmConfig {
    /// Load a config file. Relative paths inside it are taken relative to
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: SwbmConfig = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.io.input = config.io.input.map(|p| base.join(p));
        config.io.output = config.io.output.map(|p| base.join(p));
        config.model.parameter_file = config.model.parameter_file.map(|p| base.join(p));
        Ok(config)
    }
}

impl ModelConfig {
    pub fn parameters(&self) -> Result<Parameters> {
        if let Some(params) = self.params {
            return Ok(params);
        }
        match &self.parameter_file {
            Some(file) => Parameters::from_toml_file(file, &self.parameter_set)
                .with_context(|| format!("loading parameters from {}", file.display())),
            None => bail!("config has neither [model.params] nor model.parameter_file"),
        }
    }
}
