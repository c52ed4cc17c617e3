use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkParseError {
    #[error("target framework moniker must not be empty")]
    Empty,
    #[error("unknown target framework identifier in '{0}'")]
    UnknownIdentifier(String),
    #[error("invalid target framework version in '{0}'")]
    InvalidVersion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionStyle {
    Compact,
    Dotted,
}

struct KnownFramework {
    short: &'static str,
    identifier: &'static str,
    style: VersionStyle,
}

const NET_FRAMEWORK: &str = ".NETFramework";
const NET_CORE_APP: &str = ".NETCoreApp";

const KNOWN_FRAMEWORKS: &[KnownFramework] = &[
    KnownFramework {
        short: "net",
        identifier: NET_FRAMEWORK,
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "netstandard",
        identifier: ".NETStandard",
        style: VersionStyle::Dotted,
    },
    KnownFramework {
        short: "netcoreapp",
        identifier: NET_CORE_APP,
        style: VersionStyle::Dotted,
    },
    KnownFramework {
        short: "netcore",
        identifier: ".NETCore",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "dnxcore",
        identifier: "DNXCore",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "dnx",
        identifier: "DNX",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "dotnet",
        identifier: ".NETPlatform",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "uap",
        identifier: "UAP",
        style: VersionStyle::Dotted,
    },
    KnownFramework {
        short: "win",
        identifier: "Windows",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "wp",
        identifier: "WindowsPhone",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "wpa",
        identifier: "WindowsPhoneApp",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "sl",
        identifier: "Silverlight",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "native",
        identifier: "native",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "monoandroid",
        identifier: "MonoAndroid",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "monotouch",
        identifier: "MonoTouch",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "xamarinios",
        identifier: "Xamarin.iOS",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "xamarinmac",
        identifier: "Xamarin.Mac",
        style: VersionStyle::Compact,
    },
    KnownFramework {
        short: "tizen",
        identifier: "Tizen",
        style: VersionStyle::Dotted,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Framework {
    identifier: String,
    version: [u32; 4],
    profile: Option<String>,
}

impl Framework {
    pub fn parse(input: &str) -> Result<Self, FrameworkParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FrameworkParseError::Empty);
        }

        if trimmed.contains(',') {
            return parse_full_name(trimmed);
        }
        parse_short_name(trimmed)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn version(&self) -> [u32; 4] {
        self.version
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn full_name(&self) -> String {
        let version = trimmed_components(&self.version)
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        match &self.profile {
            Some(profile) => format!(
                "{},Version=v{version},Profile={profile}",
                self.identifier
            ),
            None => format!("{},Version=v{version}", self.identifier),
        }
    }

    pub fn short_folder_name(&self) -> String {
        let is_modern_net = self.identifier == NET_CORE_APP && self.version[0] >= 5;
        let known = KNOWN_FRAMEWORKS
            .iter()
            .find(|known| known.identifier == self.identifier);

        let (short, style) = match known {
            _ if is_modern_net => ("net".to_string(), VersionStyle::Dotted),
            Some(known) => (known.short.to_string(), known.style),
            None => (
                self.identifier.to_ascii_lowercase().replace('.', ""),
                VersionStyle::Dotted,
            ),
        };

        let mut name = short;
        if self.version.iter().any(|part| *part != 0) {
            let parts = trimmed_components(&self.version);
            let compact = style == VersionStyle::Compact && parts.iter().all(|part| *part < 10);
            if compact {
                for part in parts {
                    name.push_str(&part.to_string());
                }
            } else {
                name.push_str(
                    &parts
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join("."),
                );
            }
        }
        if let Some(profile) = &self.profile {
            name.push('-');
            name.push_str(profile);
        }
        name
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_folder_name())
    }
}

impl FromStr for Framework {
    type Err = FrameworkParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl TryFrom<String> for Framework {
    type Error = FrameworkParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Framework> for String {
    fn from(value: Framework) -> Self {
        value.short_folder_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackFramework {
    pub base: Framework,
    pub imports: Vec<Framework>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameworkIdentity {
    Plain(Framework),
    Fallback(FallbackFramework),
}

impl FrameworkIdentity {
    pub fn with_imports(base: Framework, imports: Vec<Framework>) -> Self {
        if imports.is_empty() {
            Self::Plain(base)
        } else {
            Self::Fallback(FallbackFramework { base, imports })
        }
    }

    pub fn base(&self) -> &Framework {
        match self {
            Self::Plain(framework) => framework,
            Self::Fallback(fallback) => &fallback.base,
        }
    }

    pub fn imports(&self) -> &[Framework] {
        match self {
            Self::Plain(_) => &[],
            Self::Fallback(fallback) => &fallback.imports,
        }
    }

    pub fn short_folder_name(&self) -> String {
        self.base().short_folder_name()
    }
}

fn parse_short_name(input: &str) -> Result<Framework, FrameworkParseError> {
    let (name, profile) = match input.split_once('-') {
        Some((name, profile)) if !profile.is_empty() => (name, Some(profile.to_string())),
        Some(_) => return Err(FrameworkParseError::InvalidVersion(input.to_string())),
        None => (input, None),
    };
    let name = name.to_ascii_lowercase();

    let known = KNOWN_FRAMEWORKS
        .iter()
        .filter(|known| {
            name.strip_prefix(known.short)
                .map(|rest| rest.is_empty() || rest.starts_with(|ch: char| ch.is_ascii_digit()))
                .unwrap_or(false)
        })
        .max_by_key(|known| known.short.len())
        .ok_or_else(|| FrameworkParseError::UnknownIdentifier(input.to_string()))?;

    let digits = &name[known.short.len()..];
    let version = parse_version_digits(digits)
        .ok_or_else(|| FrameworkParseError::InvalidVersion(input.to_string()))?;

    Ok(Framework {
        identifier: canonical_identifier(known.identifier, &version).to_string(),
        version,
        profile,
    })
}

fn parse_full_name(input: &str) -> Result<Framework, FrameworkParseError> {
    let mut parts = input.split(',').map(str::trim);
    let identifier = parts.next().unwrap_or_default();
    if identifier.is_empty() {
        return Err(FrameworkParseError::UnknownIdentifier(input.to_string()));
    }
    let known = KNOWN_FRAMEWORKS
        .iter()
        .find(|known| known.identifier.eq_ignore_ascii_case(identifier))
        .ok_or_else(|| FrameworkParseError::UnknownIdentifier(input.to_string()))?;

    let mut version = None;
    let mut profile = None;
    for part in parts {
        let Some((key, value)) = part.split_once('=') else {
            return Err(FrameworkParseError::InvalidVersion(input.to_string()));
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "version" => {
                let value = value.trim();
                let value = value
                    .strip_prefix('v')
                    .or_else(|| value.strip_prefix('V'))
                    .unwrap_or(value);
                if !value.contains('.') {
                    return Err(FrameworkParseError::InvalidVersion(input.to_string()));
                }
                version = Some(
                    parse_version_digits(value)
                        .ok_or_else(|| FrameworkParseError::InvalidVersion(input.to_string()))?,
                );
            }
            "profile" => {
                let value = value.trim();
                if !value.is_empty() {
                    profile = Some(value.to_string());
                }
            }
            _ => return Err(FrameworkParseError::InvalidVersion(input.to_string())),
        }
    }

    let version =
        version.ok_or_else(|| FrameworkParseError::InvalidVersion(input.to_string()))?;
    Ok(Framework {
        identifier: canonical_identifier(known.identifier, &version).to_string(),
        version,
        profile,
    })
}

fn canonical_identifier(identifier: &'static str, version: &[u32; 4]) -> &'static str {
    if identifier == NET_FRAMEWORK && version[0] >= 5 {
        NET_CORE_APP
    } else {
        identifier
    }
}

fn parse_version_digits(digits: &str) -> Option<[u32; 4]> {
    let mut version = [0_u32; 4];
    if digits.is_empty() {
        return Some(version);
    }

    if digits.contains('.') {
        let parts = digits.split('.').collect::<Vec<_>>();
        if parts.len() > 4 {
            return None;
        }
        for (slot, part) in version.iter_mut().zip(parts) {
            if part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }
        return Some(version);
    }

    if digits.len() > 4 {
        return None;
    }
    for (slot, ch) in version.iter_mut().zip(digits.chars()) {
        *slot = ch.to_digit(10)?;
    }
    Some(version)
}

fn trimmed_components(version: &[u32; 4]) -> Vec<u32> {
    let mut parts = version.to_vec();
    while parts.len() > 2 && parts.last() == Some(&0) {
        parts.pop();
    }
    parts
}
