use std::path::Path;

use anyhow::{Context, Result};
use restorekit_assembler::{assemble_project_spec, locate_manifest, ProjectManifest};
use restorekit_core::{DependencyGraphSpec, ProjectGraphSpec};

use crate::request::{RestoreContext, RestoreRequest};

pub const GRAPH_FILE_SUFFIX: &str = ".dg.json";

pub trait PreloadedRequestProvider: Send + Sync {
    fn name(&self) -> &str;

    fn create_requests(&self, context: &RestoreContext) -> Result<Vec<RestoreRequest>>;
}

pub trait PathRequestProvider: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, input: &Path) -> bool;

    fn create_requests(&self, input: &Path, context: &RestoreContext) -> Result<Vec<RestoreRequest>>;
}

pub enum RequestProvider {
    Preloaded(Box<dyn PreloadedRequestProvider>),
    Path(Box<dyn PathRequestProvider>),
}

impl RequestProvider {
    pub fn preloaded(provider: impl PreloadedRequestProvider + 'static) -> Self {
        Self::Preloaded(Box::new(provider))
    }

    pub fn path(provider: impl PathRequestProvider + 'static) -> Self {
        Self::Path(Box::new(provider))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Preloaded(provider) => provider.name(),
            Self::Path(provider) => provider.name(),
        }
    }
}

pub fn default_path_providers() -> Vec<RequestProvider> {
    vec![
        RequestProvider::path(GraphFileRequestProvider),
        RequestProvider::path(ManifestRequestProvider),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestRequestProvider;

impl PathRequestProvider for ManifestRequestProvider {
    fn name(&self) -> &str {
        "manifest"
    }

    fn supports(&self, input: &Path) -> bool {
        locate_manifest(input).is_some()
    }

    fn create_requests(&self, input: &Path, context: &RestoreContext) -> Result<Vec<RestoreRequest>> {
        let manifest_path = locate_manifest(input)
            .with_context(|| format!("no project manifest found for {}", input.display()))?;
        let frontend = ProjectManifest::load(&manifest_path)?.into_frontend(&manifest_path)?;
        let spec = assemble_project_spec(&frontend)
            .with_context(|| format!("failed assembling graph spec from {}", manifest_path.display()))?;
        Ok(vec![RestoreRequest::new(input.to_path_buf(), spec, context)])
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphFileRequestProvider;

impl PathRequestProvider for GraphFileRequestProvider {
    fn name(&self) -> &str {
        "dependency-graph"
    }

    fn supports(&self, input: &Path) -> bool {
        input.is_file()
            && input
                .file_name()
                .map(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(GRAPH_FILE_SUFFIX))
                .unwrap_or(false)
    }

    fn create_requests(&self, input: &Path, context: &RestoreContext) -> Result<Vec<RestoreRequest>> {
        let graph = DependencyGraphSpec::load(input)?;
        let specs = graph
            .restore_specs()
            .with_context(|| format!("invalid dependency graph: {}", input.display()))?;
        Ok(specs
            .into_iter()
            .map(|spec| RestoreRequest::new(input.to_path_buf(), spec.clone(), context))
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestProvider {
    specs: Vec<ProjectGraphSpec>,
    with_lock_files: bool,
}

impl InMemoryRequestProvider {
    pub fn new(specs: Vec<ProjectGraphSpec>) -> Self {
        Self {
            specs,
            with_lock_files: true,
        }
    }

    pub fn without_lock_files(mut self) -> Self {
        self.with_lock_files = false;
        self
    }
}

impl PreloadedRequestProvider for InMemoryRequestProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn create_requests(&self, context: &RestoreContext) -> Result<Vec<RestoreRequest>> {
        Ok(self
            .specs
            .iter()
            .map(|spec| {
                let request = RestoreRequest::new(spec.file_path.clone(), spec.clone(), context);
                if self.with_lock_files {
                    request
                } else {
                    request.without_lock_file()
                }
            })
            .collect())
    }
}
