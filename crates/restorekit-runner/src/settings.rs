use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scheduler::SchedulerOptions;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "restorekit.toml";
pub const DEFAULT_LOCK_FILE_NAME: &str = "project.lock.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreSettings {
    #[serde(default)]
    pub packages_path: Option<PathBuf>,
    #[serde(default)]
    pub locked_mode: bool,
    #[serde(default = "default_lock_file_name")]
    pub lock_file_name: String,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            packages_path: None,
            locked_mode: false,
            lock_file_name: default_lock_file_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    pub name: String,
    pub location: String,
    #[serde(default = "source_enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreConfig {
    #[serde(default)]
    pub settings: RestoreSettings,
    #[serde(default)]
    pub sources: Vec<PackageSource>,
    #[serde(default)]
    pub disable_parallel: bool,
    #[serde(default)]
    pub max_parallelism: Option<usize>,
}

impl RestoreConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse restore config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading restore config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed parsing restore config: {}", path.display()))
    }

    pub fn enabled_sources(&self) -> Vec<PackageSource> {
        self.sources
            .iter()
            .filter(|source| source.enabled)
            .cloned()
            .collect()
    }

    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions::new(self.disable_parallel, self.max_parallelism)
    }

    fn validate(&self) -> Result<()> {
        if self.max_parallelism == Some(0) {
            anyhow::bail!("max_parallelism must be at least 1");
        }
        if self.settings.lock_file_name.trim().is_empty() {
            anyhow::bail!("lock_file_name must not be empty");
        }

        let mut seen_names: HashSet<&str> = HashSet::with_capacity(self.sources.len());
        for source in &self.sources {
            if source.name.trim().is_empty() {
                anyhow::bail!("package source name must not be empty");
            }
            if !seen_names.insert(source.name.as_str()) {
                anyhow::bail!(
                    "duplicate package source name '{}': remove or rename one entry",
                    source.name
                );
            }
        }
        Ok(())
    }
}

fn default_lock_file_name() -> String {
    DEFAULT_LOCK_FILE_NAME.to_string()
}

fn source_enabled_default() -> bool {
    true
}
