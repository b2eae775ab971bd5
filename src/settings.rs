use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::parser::PatternConfig;

const ENV_PREFIX: &str = "NEWSBUNDLE";
const CONFIG_NAME: &str = "newsbundle";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database holding ingested documents.
    pub db_path: PathBuf,
    /// Directory `print` picks bundles from.
    pub pdf_dir: PathBuf,
    pub patterns: PatternConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("data/newsbundle.sqlite"),
            pdf_dir: PathBuf::from("data/pdf"),
            patterns: PatternConfig::default(),
        }
    }
}

impl Settings {
    /// `newsbundle.toml` in the working directory (optional), then
    /// `NEWSBUNDLE_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::build(File::with_name(CONFIG_NAME).required(false))
    }

    /// Same as [`Settings::load`] with an explicit config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(File::from(path).required(true))
            .with_context(|| format!("Failed to load settings from {:?}", path))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
