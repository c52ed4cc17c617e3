use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDescription {
    pub runtime_identifier: String,
    #[serde(default)]
    pub inherited_runtimes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityProfile {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeGraph {
    #[serde(default)]
    pub runtimes: BTreeMap<String, RuntimeDescription>,
    #[serde(default)]
    pub supports: BTreeMap<String, CompatibilityProfile>,
}

impl RuntimeGraph {
    pub fn from_tokens<R, P>(runtime_identifiers: R, profiles: P) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut graph = Self::default();
        for rid in runtime_identifiers {
            graph.add_runtime(rid.as_ref());
        }
        for profile in profiles {
            graph.add_profile(profile.as_ref());
        }
        graph
    }

    pub fn add_runtime(&mut self, runtime_identifier: &str) {
        let runtime_identifier = runtime_identifier.trim();
        if runtime_identifier.is_empty() {
            return;
        }
        self.runtimes
            .entry(runtime_identifier.to_string())
            .or_insert_with(|| RuntimeDescription {
                runtime_identifier: runtime_identifier.to_string(),
                inherited_runtimes: Vec::new(),
            });
    }

    pub fn add_profile(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.supports
            .entry(name.to_string())
            .or_insert_with(|| CompatibilityProfile {
                name: name.to_string(),
            });
    }

    pub fn runtime_identifiers(&self) -> impl Iterator<Item = &str> {
        self.runtimes.keys().map(String::as_str)
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.supports.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty() && self.supports.is_empty()
    }
}
