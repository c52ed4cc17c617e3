mod assets;
mod dg_spec;
mod framework;
mod runtime;
mod spec;
mod version;

pub use assets::{AssetFlagsError, AssetVisibility, IncludeFlags};
pub use dg_spec::DependencyGraphSpec;
pub use framework::{FallbackFramework, Framework, FrameworkIdentity, FrameworkParseError};
pub use runtime::{CompatibilityProfile, RuntimeDescription, RuntimeGraph};
pub use spec::{
    LibraryDependency, LibraryTarget, OutputKind, ProjectGraphSpec, ProjectReference,
    RestoreMetadata, RestoreMetadataFrameworkInfo, TargetFrameworkInfo,
};
pub use version::{PackageVersion, VersionParseError, VersionRange};

#[cfg(test)]
mod tests;
