use std::path::PathBuf;

use restorekit_core::{AssetFlagsError, FrameworkParseError, VersionParseError};
use thiserror::Error;

use crate::frontend::PropertyLookupError;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("project path must be absolute: {}", .0.display())]
    RelativeProjectPath(PathBuf),
    #[error("project '{project}' declares no target frameworks")]
    NoTargetFrameworks { project: String },
    #[error("project '{project}' has invalid target framework '{moniker}'")]
    Framework {
        project: String,
        moniker: String,
        #[source]
        source: FrameworkParseError,
    },
    #[error("project '{project}' declares target framework '{framework}' more than once")]
    DuplicateFramework { project: String, framework: String },
    #[error("project '{project}' has invalid version '{value}' for '{name}'")]
    Version {
        project: String,
        name: String,
        value: String,
        #[source]
        source: VersionParseError,
    },
    #[error("project '{project}' has invalid asset flags on reference '{reference}'")]
    Assets {
        project: String,
        reference: String,
        #[source]
        source: AssetFlagsError,
    },
    #[error("project '{project}' has a reference with an empty include")]
    EmptyReference { project: String },
    #[error("project '{project}' failed reading property '{name}'")]
    Property {
        project: String,
        name: String,
        #[source]
        source: PropertyLookupError,
    },
}
