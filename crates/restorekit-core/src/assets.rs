use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown asset flag '{token}' in '{input}'")]
pub struct AssetFlagsError {
    pub token: String,
    pub input: String,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IncludeFlags: u16 {
        const RUNTIME = 1 << 0;
        const COMPILE = 1 << 1;
        const BUILD = 1 << 2;
        const NATIVE = 1 << 3;
        const CONTENT_FILES = 1 << 4;
        const ANALYZERS = 1 << 5;
        const BUILD_TRANSITIVE = 1 << 6;
        const ALL = Self::RUNTIME.bits()
            | Self::COMPILE.bits()
            | Self::BUILD.bits()
            | Self::NATIVE.bits()
            | Self::CONTENT_FILES.bits()
            | Self::ANALYZERS.bits()
            | Self::BUILD_TRANSITIVE.bits();
    }
}

const FLAG_TOKENS: &[(&str, IncludeFlags)] = &[
    ("runtime", IncludeFlags::RUNTIME),
    ("compile", IncludeFlags::COMPILE),
    ("build", IncludeFlags::BUILD),
    ("native", IncludeFlags::NATIVE),
    ("contentfiles", IncludeFlags::CONTENT_FILES),
    ("analyzers", IncludeFlags::ANALYZERS),
    ("buildtransitive", IncludeFlags::BUILD_TRANSITIVE),
];

impl IncludeFlags {
    pub const DEFAULT_SUPPRESS_PARENT: Self = Self::CONTENT_FILES
        .union(Self::ANALYZERS)
        .union(Self::BUILD);

    pub fn parse_tokens(input: &str) -> Result<Option<Self>, AssetFlagsError> {
        let mut flags = Self::empty();
        let mut any = false;
        for token in input.split(';').map(str::trim).filter(|token| !token.is_empty()) {
            any = true;
            let lower = token.to_ascii_lowercase();
            match lower.as_str() {
                "all" => flags |= Self::ALL,
                "none" => {}
                _ => {
                    let (_, flag) = FLAG_TOKENS
                        .iter()
                        .find(|(name, _)| *name == lower)
                        .ok_or_else(|| AssetFlagsError {
                            token: token.to_string(),
                            input: input.to_string(),
                        })?;
                    flags |= *flag;
                }
            }
        }
        Ok(any.then_some(flags))
    }
}

impl fmt::Display for IncludeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        if self.contains(Self::ALL) {
            return f.write_str("all");
        }
        let names = FLAG_TOKENS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        f.write_str(&names.join(";"))
    }
}

impl Serialize for IncludeFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IncludeFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_tokens(&raw)
            .map(|flags| flags.unwrap_or(Self::empty()))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetVisibility {
    pub include: IncludeFlags,
    pub exclude: IncludeFlags,
    pub private: IncludeFlags,
}

impl AssetVisibility {
    pub fn from_declared(
        include_assets: &str,
        exclude_assets: &str,
        private_assets: &str,
    ) -> Result<Self, AssetFlagsError> {
        let defaults = Self::default();
        Ok(Self {
            include: IncludeFlags::parse_tokens(include_assets)?.unwrap_or(defaults.include),
            exclude: IncludeFlags::parse_tokens(exclude_assets)?.unwrap_or(defaults.exclude),
            private: IncludeFlags::parse_tokens(private_assets)?.unwrap_or(defaults.private),
        })
    }

    pub fn effective_include(&self) -> IncludeFlags {
        self.include & !self.exclude
    }

    pub fn suppress_parent(&self) -> IncludeFlags {
        self.private
    }
}

impl Default for AssetVisibility {
    fn default() -> Self {
        Self {
            include: IncludeFlags::ALL,
            exclude: IncludeFlags::empty(),
            private: IncludeFlags::DEFAULT_SUPPRESS_PARENT,
        }
    }
}
