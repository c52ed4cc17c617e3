use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyLookupError {
    #[error("property '{0}' was not found")]
    NotFound(String),
    #[error("failed evaluating property '{name}': {reason}")]
    Evaluation { name: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub include: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ReferenceItem {
    pub fn new(include: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata_value(&self, key: &str) -> &str {
        self.metadata
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

pub trait TargetFrameworkSource {
    fn moniker(&self) -> &str;

    fn property(&self, name: &str) -> Result<String, PropertyLookupError>;

    fn package_references(&self) -> &[ReferenceItem];

    fn project_references(&self) -> &[ReferenceItem];
}

#[derive(Debug, Clone)]
pub struct ProjectFrontend<T> {
    pub project_path: PathBuf,
    pub target_frameworks: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFrameworkDescriptor {
    pub moniker: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub package_references: Vec<ReferenceItem>,
    #[serde(default)]
    pub project_references: Vec<ReferenceItem>,
}

impl TargetFrameworkDescriptor {
    pub fn new(moniker: impl Into<String>) -> Self {
        Self {
            moniker: moniker.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_package(mut self, item: ReferenceItem) -> Self {
        self.package_references.push(item);
        self
    }

    pub fn with_project(mut self, item: ReferenceItem) -> Self {
        self.project_references.push(item);
        self
    }
}

impl TargetFrameworkSource for TargetFrameworkDescriptor {
    fn moniker(&self) -> &str {
        &self.moniker
    }

    fn property(&self, name: &str) -> Result<String, PropertyLookupError> {
        self.properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| PropertyLookupError::NotFound(name.to_string()))
    }

    fn package_references(&self) -> &[ReferenceItem] {
        &self.package_references
    }

    fn project_references(&self) -> &[ReferenceItem] {
        &self.project_references
    }
}
