use std::path::PathBuf;
use std::sync::Arc;

use restorekit_core::ProjectGraphSpec;

use crate::logger::CollectorLogger;
use crate::settings::{PackageSource, RestoreSettings};

#[derive(Debug, Clone)]
pub struct RestoreContext {
    pub working_dir: PathBuf,
    pub settings: Arc<RestoreSettings>,
    pub sources: Vec<PackageSource>,
    pub log: Arc<CollectorLogger>,
}

impl RestoreContext {
    pub fn new(working_dir: PathBuf, settings: RestoreSettings, sources: Vec<PackageSource>) -> Self {
        Self {
            working_dir,
            settings: Arc::new(settings),
            sources,
            log: Arc::new(CollectorLogger::new("restore")),
        }
    }
}

#[derive(Debug)]
pub struct RestoreRequest {
    pub input_path: PathBuf,
    pub lock_file_path: Option<PathBuf>,
    pub settings: Arc<RestoreSettings>,
    pub sources: Vec<PackageSource>,
    pub logger: CollectorLogger,
    pub spec: ProjectGraphSpec,
}

impl RestoreRequest {
    pub fn new(input_path: PathBuf, spec: ProjectGraphSpec, context: &RestoreContext) -> Self {
        let lock_file_path = spec
            .restore_metadata
            .output_path
            .join(&context.settings.lock_file_name);
        Self {
            input_path,
            lock_file_path: Some(lock_file_path),
            settings: Arc::clone(&context.settings),
            sources: context.sources.clone(),
            logger: CollectorLogger::new(spec.unique_name()),
            spec,
        }
    }

    pub fn without_lock_file(mut self) -> Self {
        self.lock_file_path = None;
        self
    }

    pub fn project_name(&self) -> &str {
        &self.spec.name
    }
}
