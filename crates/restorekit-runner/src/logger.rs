use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    Information,
    Minimal,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Information => "information",
            Self::Minimal => "minimal",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreLogMessage {
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for RestoreLogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.as_str(), self.message)
    }
}

#[derive(Debug, Default)]
pub struct CollectorLogger {
    scope: String,
    entries: Mutex<Vec<RestoreLogMessage>>,
}

impl CollectorLogger {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let scope = self.scope.as_str();
        match level {
            LogLevel::Verbose => tracing::trace!(scope, "{message}"),
            LogLevel::Information => tracing::debug!(scope, "{message}"),
            LogLevel::Minimal => tracing::info!(scope, "{message}"),
            LogLevel::Warning => tracing::warn!(scope, "{message}"),
            LogLevel::Error => tracing::error!(scope, "{message}"),
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RestoreLogMessage { level, message });
    }

    pub fn verbose(&self, message: impl Into<String>) {
        self.log(LogLevel::Verbose, message);
    }

    pub fn information(&self, message: impl Into<String>) {
        self.log(LogLevel::Information, message);
    }

    pub fn minimal(&self, message: impl Into<String>) {
        self.log(LogLevel::Minimal, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn entries(&self) -> Vec<RestoreLogMessage> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn entries_at(&self, level: LogLevel) -> Vec<RestoreLogMessage> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    pub fn errors(&self) -> Vec<RestoreLogMessage> {
        self.entries_at(LogLevel::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|entry| entry.level == LogLevel::Error)
    }
}
