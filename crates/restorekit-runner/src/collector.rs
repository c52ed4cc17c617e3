use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{RestoreError, UnsupportedInputKind};
use crate::providers::{PathRequestProvider, RequestProvider};
use crate::request::{RestoreContext, RestoreRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathComparison {
    CaseSensitive,
    CaseInsensitive,
}

impl PathComparison {
    pub fn platform_default() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::CaseInsensitive
        } else {
            Self::CaseSensitive
        }
    }

    pub fn key(self, path: &Path) -> String {
        let raw = path.to_string_lossy();
        match self {
            Self::CaseSensitive => raw.into_owned(),
            Self::CaseInsensitive => raw.to_lowercase(),
        }
    }
}

impl Default for PathComparison {
    fn default() -> Self {
        Self::platform_default()
    }
}

pub struct RequestCollector {
    providers: Vec<RequestProvider>,
    comparison: PathComparison,
}

impl RequestCollector {
    pub fn new(providers: Vec<RequestProvider>) -> Self {
        Self {
            providers,
            comparison: PathComparison::platform_default(),
        }
    }

    pub fn with_path_comparison(mut self, comparison: PathComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn collect(
        &self,
        inputs: &[PathBuf],
        context: &RestoreContext,
    ) -> Result<Vec<RestoreRequest>, RestoreError> {
        let has_preloaded = self
            .providers
            .iter()
            .any(|provider| matches!(provider, RequestProvider::Preloaded(_)));
        let inputs = if inputs.is_empty() && !has_preloaded {
            vec![context.working_dir.clone()]
        } else {
            inputs.to_vec()
        };

        let mut seen: HashSet<Option<String>> = HashSet::new();
        let mut requests = Vec::new();

        for provider in &self.providers {
            let RequestProvider::Preloaded(provider) = provider else {
                continue;
            };
            let created = provider
                .create_requests(context)
                .map_err(|source| RestoreError::Provider {
                    provider: provider.name().to_string(),
                    input: context.working_dir.clone(),
                    source,
                })?;
            for request in created {
                let keep = match request.lock_file_path.as_deref() {
                    None => true,
                    Some(path) => seen.insert(Some(self.comparison.key(path))),
                };
                self.keep_or_skip(keep, request, &mut requests);
            }
        }

        for input in &inputs {
            let Some(provider) = self.path_providers().find(|provider| provider.supports(input)) else {
                return Err(unsupported_input(input));
            };

            let created = provider
                .create_requests(input, context)
                .map_err(|source| RestoreError::Provider {
                    provider: provider.name().to_string(),
                    input: input.clone(),
                    source,
                })?;
            if created.is_empty() {
                warn!(input = %input.display(), provider = provider.name(), "no restore requests created");
                context.log.warning(format!(
                    "nothing to restore for '{}': provider '{}' produced no requests",
                    input.display(),
                    provider.name()
                ));
                continue;
            }

            for request in created {
                let key = request
                    .lock_file_path
                    .as_deref()
                    .map(|path| self.comparison.key(path));
                let keep = seen.insert(key);
                self.keep_or_skip(keep, request, &mut requests);
            }
        }

        debug!(count = requests.len(), "collected restore requests");
        Ok(requests)
    }

    fn path_providers(&self) -> impl Iterator<Item = &(dyn PathRequestProvider + 'static)> {
        self.providers.iter().filter_map(|provider| match provider {
            RequestProvider::Path(provider) => Some(provider.as_ref()),
            RequestProvider::Preloaded(_) => None,
        })
    }

    fn keep_or_skip(&self, keep: bool, request: RestoreRequest, requests: &mut Vec<RestoreRequest>) {
        if keep {
            requests.push(request);
        } else {
            debug!(
                project = request.spec.unique_name(),
                lock_file = ?request.lock_file_path,
                "skipping duplicate restore request"
            );
        }
    }
}

fn unsupported_input(input: &Path) -> RestoreError {
    if input.exists() {
        RestoreError::UnsupportedInput {
            path: input.to_path_buf(),
            kind: UnsupportedInputKind::for_path(input),
        }
    } else {
        RestoreError::InputNotFound {
            path: input.to_path_buf(),
        }
    }
}
