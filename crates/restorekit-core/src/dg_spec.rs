use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::spec::ProjectGraphSpec;

const DG_SPEC_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraphSpec {
    #[serde(default = "dg_spec_format_version")]
    pub version: u32,
    #[serde(default)]
    pub restore: Vec<String>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectGraphSpec>,
}

impl Default for DependencyGraphSpec {
    fn default() -> Self {
        Self {
            version: dg_spec_format_version(),
            restore: Vec::new(),
            projects: BTreeMap::new(),
        }
    }
}

impl DependencyGraphSpec {
    pub fn add_restore(&mut self, spec: ProjectGraphSpec) {
        let key = spec.unique_name().to_string();
        if !self.restore.contains(&key) {
            self.restore.push(key.clone());
        }
        self.projects.insert(key, spec);
    }

    pub fn restore_specs(&self) -> Result<Vec<&ProjectGraphSpec>> {
        self.restore
            .iter()
            .map(|name| {
                self.projects.get(name).ok_or_else(|| {
                    anyhow!("dependency graph lists '{name}' for restore but has no spec for it")
                })
            })
            .collect()
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let spec: Self =
            serde_json::from_str(input).context("failed to parse dependency graph spec")?;
        if spec.version != DG_SPEC_FORMAT_VERSION {
            anyhow::bail!(
                "unsupported dependency graph spec version {} (expected {})",
                spec.version,
                DG_SPEC_FORMAT_VERSION
            );
        }
        Ok(spec)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading dependency graph: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed parsing dependency graph: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)
            .with_context(|| format!("failed serializing dependency graph: {}", path.display()))?;
        fs::write(path, content)
            .with_context(|| format!("failed writing dependency graph: {}", path.display()))
    }
}

fn dg_spec_format_version() -> u32 {
    DG_SPEC_FORMAT_VERSION
}
