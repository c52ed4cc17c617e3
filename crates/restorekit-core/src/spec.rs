use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assets::AssetVisibility;
use crate::framework::{Framework, FrameworkIdentity};
use crate::runtime::RuntimeGraph;
use crate::version::{PackageVersion, VersionRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryTarget {
    Package,
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDependency {
    pub name: String,
    pub version_range: VersionRange,
    pub assets: AssetVisibility,
    pub target: LibraryTarget,
}

impl LibraryDependency {
    pub fn package(name: impl Into<String>, version_range: VersionRange) -> Self {
        Self {
            name: name.into(),
            version_range,
            assets: AssetVisibility::default(),
            target: LibraryTarget::Package,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    pub project_path: PathBuf,
    pub project_unique_name: String,
    pub assets: AssetVisibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFrameworkInfo {
    pub framework: FrameworkIdentity,
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreMetadataFrameworkInfo {
    pub framework: Framework,
    #[serde(default)]
    pub project_references: Vec<ProjectReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    PackageReference,
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreMetadata {
    pub project_name: String,
    pub project_unique_name: String,
    pub project_path: PathBuf,
    pub output_path: PathBuf,
    pub output_kind: OutputKind,
    #[serde(default)]
    pub target_frameworks: Vec<RestoreMetadataFrameworkInfo>,
    #[serde(default)]
    pub original_target_frameworks: Vec<String>,
    #[serde(default)]
    pub cross_targeting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraphSpec {
    pub name: String,
    pub short_name: String,
    pub file_path: PathBuf,
    pub version: PackageVersion,
    #[serde(default)]
    pub target_frameworks: Vec<TargetFrameworkInfo>,
    pub restore_metadata: RestoreMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_graph: Option<RuntimeGraph>,
}

impl ProjectGraphSpec {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse project graph spec")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| {
            format!(
                "failed serializing project graph spec for '{}'",
                self.restore_metadata.project_unique_name
            )
        })
    }

    pub fn content_hash(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self).with_context(|| {
            format!(
                "failed hashing project graph spec for '{}'",
                self.restore_metadata.project_unique_name
            )
        })?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    pub fn unique_name(&self) -> &str {
        &self.restore_metadata.project_unique_name
    }

    pub fn target_framework(&self, short_name: &str) -> Option<&TargetFrameworkInfo> {
        self.target_frameworks
            .iter()
            .find(|info| info.framework.short_folder_name() == short_name)
    }
}
