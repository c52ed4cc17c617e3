use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::frontend::{ProjectFrontend, TargetFrameworkDescriptor};

pub const MANIFEST_FILE_NAME: &str = "restore.toml";

/// On-disk project description: project-level properties shared by every
/// target, plus one `[[targets]]` table per target framework.
///
/// ```toml
/// project = "App.csproj"
///
/// [properties]
/// TargetFrameworks = "net45;netstandard1.6"
///
/// [[targets]]
/// moniker = "net45"
///
/// [[targets.package_references]]
/// include = "Newtonsoft.Json"
/// metadata = { Version = "[9.0.1, )" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub project: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub targets: Vec<TargetFrameworkDescriptor>,
}

impl ProjectManifest {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(input).context("failed to parse project manifest")?;
        for target in &manifest.targets {
            if target.moniker.trim().is_empty() {
                return Err(anyhow!("project manifest target moniker must not be empty"));
            }
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading project manifest: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed parsing project manifest: {}", path.display()))
    }

    pub fn into_frontend(self, manifest_path: &Path) -> Result<ProjectFrontend<TargetFrameworkDescriptor>> {
        let manifest_path = absolute_path(manifest_path)?;
        let manifest_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("project manifest has no parent directory: {}", manifest_path.display()))?;
        let project_path = match &self.project {
            Some(project) => manifest_dir.join(project).clean(),
            None => manifest_path.clone(),
        };

        let target_frameworks = self
            .targets
            .into_iter()
            .map(|mut target| {
                for (name, value) in &self.properties {
                    let declared = target
                        .properties
                        .keys()
                        .any(|key| key.eq_ignore_ascii_case(name));
                    if !declared {
                        target.properties.insert(name.clone(), value.clone());
                    }
                }
                target
            })
            .collect();

        Ok(ProjectFrontend {
            project_path,
            target_frameworks,
        })
    }
}

pub fn locate_manifest(input: &Path) -> Option<PathBuf> {
    if input.is_file() {
        let is_manifest = input
            .file_name()
            .map(|name| name == MANIFEST_FILE_NAME)
            .unwrap_or(false);
        return is_manifest.then(|| input.to_path_buf());
    }
    if input.is_dir() {
        let candidate = input.join(MANIFEST_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.clean());
    }
    let cwd = env::current_dir().context("failed resolving current directory")?;
    Ok(cwd.join(path).clean())
}
