mod assemble;
mod error;
mod frontend;
mod manifest;

pub use assemble::{
    assemble_project_spec, OUTPUT_PATH_PROPERTY, PACKAGE_TARGET_FALLBACK_PROPERTY,
    PACKAGE_VERSION_PROPERTY, PROJECT_NAME_PROPERTY, RUNTIME_IDENTIFIERS_PROPERTY,
    RUNTIME_IDENTIFIER_PROPERTY, RUNTIME_SUPPORTS_PROPERTY, TARGET_FRAMEWORKS_PROPERTY,
    VERSION_PROPERTY,
};
pub use error::AssemblyError;
pub use frontend::{
    ProjectFrontend, PropertyLookupError, ReferenceItem, TargetFrameworkDescriptor,
    TargetFrameworkSource,
};
pub use manifest::{locate_manifest, ProjectManifest, MANIFEST_FILE_NAME};
