use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use restorekit_core::{
    AssetVisibility, Framework, FrameworkIdentity, LibraryDependency, LibraryTarget, OutputKind,
    PackageVersion, ProjectGraphSpec, ProjectReference, RestoreMetadata,
    RestoreMetadataFrameworkInfo, RuntimeGraph, TargetFrameworkInfo, VersionRange,
};
use tracing::debug;

use crate::error::AssemblyError;
use crate::frontend::{ProjectFrontend, PropertyLookupError, ReferenceItem, TargetFrameworkSource};

pub const TARGET_FRAMEWORKS_PROPERTY: &str = "TargetFrameworks";
pub const PACKAGE_TARGET_FALLBACK_PROPERTY: &str = "PackageTargetFallback";
pub const RUNTIME_IDENTIFIER_PROPERTY: &str = "RuntimeIdentifier";
pub const RUNTIME_IDENTIFIERS_PROPERTY: &str = "RuntimeIdentifiers";
pub const RUNTIME_SUPPORTS_PROPERTY: &str = "RuntimeSupports";
pub const PROJECT_NAME_PROPERTY: &str = "ProjectName";
pub const OUTPUT_PATH_PROPERTY: &str = "BaseIntermediateOutputPath";
pub const PACKAGE_VERSION_PROPERTY: &str = "PackageVersion";
pub const VERSION_PROPERTY: &str = "Version";

const VERSION_METADATA: &str = "Version";
const INCLUDE_ASSETS_METADATA: &str = "IncludeAssets";
const EXCLUDE_ASSETS_METADATA: &str = "ExcludeAssets";
const PRIVATE_ASSETS_METADATA: &str = "PrivateAssets";
const DEFAULT_OUTPUT_DIR: &str = "obj";

struct ParsedTarget<'a, T> {
    source: &'a T,
    identity: FrameworkIdentity,
}

pub fn assemble_project_spec<T: TargetFrameworkSource>(
    frontend: &ProjectFrontend<T>,
) -> Result<ProjectGraphSpec, AssemblyError> {
    let project_path = frontend.project_path.clean();
    if !project_path.is_absolute() {
        return Err(AssemblyError::RelativeProjectPath(project_path));
    }
    let project = project_path.display().to_string();
    let project_dir = project_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_path.clone());

    if frontend.target_frameworks.is_empty() {
        return Err(AssemblyError::NoTargetFrameworks { project });
    }

    let mut targets = frontend
        .target_frameworks
        .iter()
        .map(|source| parse_target(&project, source))
        .collect::<Result<Vec<_>, _>>()?;
    targets.sort_by_key(|target| target.identity.short_folder_name());

    let mut seen = BTreeSet::new();
    for target in &targets {
        if !seen.insert(target.identity.base().clone()) {
            return Err(AssemblyError::DuplicateFramework {
                project,
                framework: target.identity.short_folder_name(),
            });
        }
    }

    let authored_frameworks =
        first_property(&project, &targets, TARGET_FRAMEWORKS_PROPERTY)?.map(|raw| split_tokens(&raw));
    let (original_target_frameworks, cross_targeting) = match authored_frameworks {
        Some(authored) => (authored, true),
        None => {
            let inferred = targets
                .iter()
                .map(|target| target.identity.short_folder_name())
                .collect::<Vec<_>>();
            let cross_targeting = inferred.len() > 1;
            (inferred, cross_targeting)
        }
    };

    let mut target_frameworks = Vec::with_capacity(targets.len());
    let mut metadata_frameworks = Vec::with_capacity(targets.len());
    for target in &targets {
        target_frameworks.push(TargetFrameworkInfo {
            framework: target.identity.clone(),
            dependencies: package_dependencies(&project, target.source)?,
        });
        metadata_frameworks.push(RestoreMetadataFrameworkInfo {
            framework: target.identity.base().clone(),
            project_references: project_references(&project, &project_dir, target.source)?,
        });
    }

    let runtime_graph = runtime_graph(&project, &targets)?;

    let short_name = project_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.clone());
    let project_name =
        first_property(&project, &targets, PROJECT_NAME_PROPERTY)?.unwrap_or_else(|| short_name.clone());
    let output_path = first_property(&project, &targets, OUTPUT_PATH_PROPERTY)?
        .map(|raw| project_dir.join(normalize_separators(&raw)).clean())
        .unwrap_or_else(|| project_dir.join(DEFAULT_OUTPUT_DIR));
    let version = project_version(&project, &targets)?;

    debug!(
        project = %project,
        frameworks = ?original_target_frameworks,
        cross_targeting,
        "assembled project graph spec"
    );

    Ok(ProjectGraphSpec {
        name: project_name.clone(),
        short_name,
        file_path: project_path.clone(),
        version,
        target_frameworks,
        restore_metadata: RestoreMetadata {
            project_name,
            project_unique_name: project.clone(),
            project_path,
            output_path,
            output_kind: OutputKind::PackageReference,
            target_frameworks: metadata_frameworks,
            original_target_frameworks,
            cross_targeting,
        },
        runtime_graph,
    })
}

fn parse_target<'a, T: TargetFrameworkSource>(
    project: &str,
    source: &'a T,
) -> Result<ParsedTarget<'a, T>, AssemblyError> {
    let base = parse_framework(project, source.moniker())?;

    let imports = match read_property(project, source, PACKAGE_TARGET_FALLBACK_PROPERTY)? {
        Some(raw) => split_tokens(&raw)
            .iter()
            .map(|moniker| parse_framework(project, moniker))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(ParsedTarget {
        source,
        identity: FrameworkIdentity::with_imports(base, imports),
    })
}

fn parse_framework(project: &str, moniker: &str) -> Result<Framework, AssemblyError> {
    Framework::parse(moniker).map_err(|source| AssemblyError::Framework {
        project: project.to_string(),
        moniker: moniker.to_string(),
        source,
    })
}

fn package_dependencies<T: TargetFrameworkSource>(
    project: &str,
    source: &T,
) -> Result<Vec<LibraryDependency>, AssemblyError> {
    source
        .package_references()
        .iter()
        .map(|item| {
            let name = reference_include(project, item)?;
            let declared = item.metadata_value(VERSION_METADATA);
            let version_range =
                VersionRange::parse(declared).map_err(|source| AssemblyError::Version {
                    project: project.to_string(),
                    name: name.clone(),
                    value: declared.to_string(),
                    source,
                })?;
            Ok(LibraryDependency {
                assets: asset_visibility(project, &name, item)?,
                name,
                version_range,
                target: LibraryTarget::Package,
            })
        })
        .collect()
}

fn project_references<T: TargetFrameworkSource>(
    project: &str,
    project_dir: &Path,
    source: &T,
) -> Result<Vec<ProjectReference>, AssemblyError> {
    source
        .project_references()
        .iter()
        .map(|item| {
            let include = reference_include(project, item)?;
            let project_path = project_dir.join(normalize_separators(&include)).clean();
            Ok(ProjectReference {
                assets: asset_visibility(project, &include, item)?,
                project_unique_name: project_path.display().to_string(),
                project_path,
            })
        })
        .collect()
}

fn runtime_graph<T: TargetFrameworkSource>(
    project: &str,
    targets: &[ParsedTarget<'_, T>],
) -> Result<Option<RuntimeGraph>, AssemblyError> {
    let mut graph = RuntimeGraph::default();
    for target in targets {
        for name in [RUNTIME_IDENTIFIER_PROPERTY, RUNTIME_IDENTIFIERS_PROPERTY] {
            if let Some(raw) = read_property(project, target.source, name)? {
                for rid in split_tokens(&raw) {
                    graph.add_runtime(&rid);
                }
            }
        }
        if let Some(raw) = read_property(project, target.source, RUNTIME_SUPPORTS_PROPERTY)? {
            for profile in split_tokens(&raw) {
                graph.add_profile(&profile);
            }
        }
    }
    Ok((!graph.is_empty()).then_some(graph))
}

fn project_version<T: TargetFrameworkSource>(
    project: &str,
    targets: &[ParsedTarget<'_, T>],
) -> Result<PackageVersion, AssemblyError> {
    for name in [PACKAGE_VERSION_PROPERTY, VERSION_PROPERTY] {
        if let Some(raw) = first_property(project, targets, name)? {
            return PackageVersion::parse(&raw).map_err(|source| AssemblyError::Version {
                project: project.to_string(),
                name: name.to_string(),
                value: raw,
                source,
            });
        }
    }
    Ok(PackageVersion::new(1, 0, 0))
}

fn asset_visibility(
    project: &str,
    reference: &str,
    item: &ReferenceItem,
) -> Result<AssetVisibility, AssemblyError> {
    AssetVisibility::from_declared(
        item.metadata_value(INCLUDE_ASSETS_METADATA),
        item.metadata_value(EXCLUDE_ASSETS_METADATA),
        item.metadata_value(PRIVATE_ASSETS_METADATA),
    )
    .map_err(|source| AssemblyError::Assets {
        project: project.to_string(),
        reference: reference.to_string(),
        source,
    })
}

fn reference_include(project: &str, item: &ReferenceItem) -> Result<String, AssemblyError> {
    let include = item.include.trim();
    if include.is_empty() {
        return Err(AssemblyError::EmptyReference {
            project: project.to_string(),
        });
    }
    Ok(include.to_string())
}

fn read_property<T: TargetFrameworkSource>(
    project: &str,
    source: &T,
    name: &str,
) -> Result<Option<String>, AssemblyError> {
    match source.property(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(PropertyLookupError::NotFound(_)) => Ok(None),
        Err(source) => Err(AssemblyError::Property {
            project: project.to_string(),
            name: name.to_string(),
            source,
        }),
    }
}

fn first_property<T: TargetFrameworkSource>(
    project: &str,
    targets: &[ParsedTarget<'_, T>],
    name: &str,
) -> Result<Option<String>, AssemblyError> {
    for target in targets {
        if let Some(value) = read_property(project, target.source, name)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_separators(raw: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('\\', "/"))
    }
}
