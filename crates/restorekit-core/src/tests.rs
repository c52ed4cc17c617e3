use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;

fn framework(input: &str) -> Framework {
    Framework::parse(input).expect("framework should parse")
}

fn version(input: &str) -> PackageVersion {
    PackageVersion::parse(input).expect("version should parse")
}

fn sample_spec(name: &str) -> ProjectGraphSpec {
    let project_path = PathBuf::from(format!("/src/{name}/{name}.csproj"));
    ProjectGraphSpec {
        name: name.to_string(),
        short_name: name.to_string(),
        file_path: project_path.clone(),
        version: PackageVersion::new(1, 0, 0),
        target_frameworks: vec![TargetFrameworkInfo {
            framework: FrameworkIdentity::Plain(framework("netstandard2.0")),
            dependencies: vec![LibraryDependency::package(
                "Newtonsoft.Json",
                VersionRange::parse("[13.0.1, )").expect("range should parse"),
            )],
        }],
        restore_metadata: RestoreMetadata {
            project_name: name.to_string(),
            project_unique_name: project_path.display().to_string(),
            project_path: project_path.clone(),
            output_path: PathBuf::from(format!("/src/{name}/obj")),
            output_kind: OutputKind::PackageReference,
            target_frameworks: vec![RestoreMetadataFrameworkInfo {
                framework: framework("netstandard2.0"),
                project_references: Vec::new(),
            }],
            original_target_frameworks: vec!["netstandard2.0".to_string()],
            cross_targeting: false,
        },
        runtime_graph: None,
    }
}

#[test]
fn parse_compact_framework_short_names() {
    let net45 = framework("net45");
    assert_eq!(net45.identifier(), ".NETFramework");
    assert_eq!(net45.version(), [4, 5, 0, 0]);
    assert_eq!(net45.short_folder_name(), "net45");

    let net451 = framework("net451");
    assert_eq!(net451.version(), [4, 5, 1, 0]);
    assert_eq!(net451.short_folder_name(), "net451");

    let dnx = framework("dnxcore50");
    assert_eq!(dnx.identifier(), "DNXCore");
    assert_eq!(dnx.short_folder_name(), "dnxcore50");
}

#[test]
fn parse_dotted_framework_short_names() {
    let standard = framework("netstandard2.0");
    assert_eq!(standard.identifier(), ".NETStandard");
    assert_eq!(standard.short_folder_name(), "netstandard2.0");

    let core = framework("NetCoreApp3.1");
    assert_eq!(core.identifier(), ".NETCoreApp");
    assert_eq!(core.short_folder_name(), "netcoreapp3.1");
}

#[test]
fn parse_modern_net_maps_to_core_app() {
    let net8 = framework("net8.0");
    assert_eq!(net8.identifier(), ".NETCoreApp");
    assert_eq!(net8.version(), [8, 0, 0, 0]);
    assert_eq!(net8.short_folder_name(), "net8.0");
}

#[test]
fn parse_framework_prefers_longest_identifier() {
    assert_eq!(framework("netcore45").identifier(), ".NETCore");
    assert_eq!(framework("wpa81").identifier(), "WindowsPhoneApp");
    assert_eq!(framework("wp8").identifier(), "WindowsPhone");
}

#[test]
fn parse_framework_with_profile() {
    let client = framework("net40-client");
    assert_eq!(client.profile(), Some("client"));
    assert_eq!(client.short_folder_name(), "net40-client");
}

#[test]
fn parse_full_framework_name() {
    let parsed = framework(".NETFramework,Version=v4.5,Profile=Client");
    assert_eq!(parsed.identifier(), ".NETFramework");
    assert_eq!(parsed.version(), [4, 5, 0, 0]);
    assert_eq!(parsed.profile(), Some("Client"));
    assert_eq!(parsed.full_name(), ".NETFramework,Version=v4.5,Profile=Client");
    assert_eq!(framework(".netframework,version=v4.5"), framework("net45"));
}

#[test]
fn framework_json_round_trips_profiles_and_full_names() {
    for input in [
        "net45-Client",
        ".NETFramework,Version=v4.0,Profile=Client",
        ".NETFramework,Version=v10.0",
        ".NETStandard,Version=v2.1",
        "net4.10",
        "win10.0",
        "netcoreapp3.1",
        "net8.0",
    ] {
        let parsed = framework(input);
        let json = serde_json::to_string(&parsed).expect("framework should serialize");
        let back: Framework = serde_json::from_str(&json).expect("framework should deserialize");
        assert_eq!(back, parsed, "round trip of {input} through {json}");
    }

    let full = framework(".NETFramework,Version=v10.0");
    assert_eq!(full.identifier(), ".NETCoreApp");
    assert_eq!(full, framework("net10.0"));
    assert_eq!(framework("net45-Client").profile(), Some("Client"));
}

#[test]
fn parse_full_name_rejects_unknown_identifier() {
    assert!(matches!(
        Framework::parse("Foo,Version=v1.0"),
        Err(FrameworkParseError::UnknownIdentifier(_))
    ));
    assert!(serde_json::from_str::<Framework>("\"foo1.0\"").is_err());
}

#[test]
fn parse_framework_rejects_malformed_monikers() {
    assert_eq!(Framework::parse("  "), Err(FrameworkParseError::Empty));
    assert!(matches!(
        Framework::parse("bogus1.0"),
        Err(FrameworkParseError::UnknownIdentifier(_))
    ));
    assert!(matches!(
        Framework::parse("net4x"),
        Err(FrameworkParseError::InvalidVersion(_))
    ));
    assert!(matches!(
        Framework::parse("netstandard1.2.3.4.5"),
        Err(FrameworkParseError::InvalidVersion(_))
    ));
    assert!(matches!(
        Framework::parse(".NETFramework,Version=v4x.5"),
        Err(FrameworkParseError::InvalidVersion(_))
    ));
}

#[test]
fn fallback_identity_wraps_only_with_imports() {
    let plain = FrameworkIdentity::with_imports(framework("netstandard1.6"), Vec::new());
    assert_eq!(plain, FrameworkIdentity::Plain(framework("netstandard1.6")));
    assert!(plain.imports().is_empty());

    let wrapped = FrameworkIdentity::with_imports(
        framework("netstandard1.6"),
        vec![framework("net45"), framework("dnxcore50")],
    );
    assert_eq!(wrapped.base(), &framework("netstandard1.6"));
    assert_eq!(wrapped.imports(), &[framework("net45"), framework("dnxcore50")]);
    assert_eq!(wrapped.short_folder_name(), "netstandard1.6");
}

#[test]
fn package_version_normalizes_and_orders() {
    assert_eq!(version("1.0").to_string(), "1.0.0");
    assert_eq!(version("1.2.3.4").to_string(), "1.2.3.4");
    assert_eq!(version("1.2.3.0").to_string(), "1.2.3");
    assert_eq!(version("2.0.0-beta.1+sha.abc").to_string(), "2.0.0-beta.1+sha.abc");

    assert!(version("1.0.0-beta") < version("1.0.0"));
    assert!(version("1.0.0") < version("1.0.0.1"));
    assert_eq!(version("1.0.0+a"), version("1.0.0+b"));
}

#[test]
fn package_version_rejects_garbage() {
    assert_eq!(PackageVersion::parse(""), Err(VersionParseError::Empty));
    assert!(PackageVersion::parse("1..0").is_err());
    assert!(PackageVersion::parse("1.0.0.0.0").is_err());
    assert!(PackageVersion::parse("one").is_err());
    assert!(PackageVersion::parse("1.0.0-").is_err());
    assert!(PackageVersion::parse("1.0.0+").is_err());
    assert!(PackageVersion::parse("1.0.0-beta+").is_err());
}

#[test]
fn empty_version_range_accepts_any_version() {
    let range = VersionRange::parse("").expect("empty range should parse");
    assert!(range.is_all());
    assert_eq!(range, VersionRange::all());
    assert!(range.satisfies(&version("0.0.1-alpha")));
    assert!(range.satisfies(&version("999.0.0")));
    assert_eq!(range.to_string(), "(, )");
}

#[test]
fn bracketed_version_range_parses_interval() {
    let range = VersionRange::parse("[1.0.0,2.0.0)").expect("range should parse");
    assert_eq!(range.min(), Some(&version("1.0.0")));
    assert!(range.is_min_inclusive());
    assert_eq!(range.max(), Some(&version("2.0.0")));
    assert!(!range.is_max_inclusive());
    assert!(range.satisfies(&version("1.0.0")));
    assert!(range.satisfies(&version("1.9.9")));
    assert!(!range.satisfies(&version("2.0.0")));
    assert_eq!(range.to_string(), "[1.0.0, 2.0.0)");
    assert_eq!(
        VersionRange::parse(&range.to_string()).expect("normalized range should parse"),
        range
    );
}

#[test]
fn bare_and_exact_version_ranges() {
    let bare = VersionRange::parse("1.2").expect("bare version should parse");
    assert_eq!(bare, VersionRange::at_least(version("1.2.0")));
    assert_eq!(bare.to_string(), "[1.2.0, )");

    let exact = VersionRange::parse("[3.1.4]").expect("exact version should parse");
    assert!(exact.satisfies(&version("3.1.4")));
    assert!(!exact.satisfies(&version("3.1.5")));
    assert_eq!(exact.to_string(), "[3.1.4]");

    let upper = VersionRange::parse("(,2.0]").expect("upper bound should parse");
    assert!(upper.satisfies(&version("2.0.0")));
    assert!(!upper.satisfies(&version("2.0.1")));
}

#[test]
fn version_range_rejects_invalid_intervals() {
    for input in ["[2.0,1.0]", "(1.0)", "[1.0,1.0)", "[1.0", "[1.0,2.0,3.0]", "[abc,)"] {
        assert!(
            matches!(VersionRange::parse(input), Err(VersionParseError::InvalidRange(_))),
            "expected '{input}' to be rejected"
        );
    }
}

#[test]
fn asset_flags_parse_tokens_case_insensitively() {
    let flags = IncludeFlags::parse_tokens("Runtime; compile;;ContentFiles")
        .expect("tokens should parse")
        .expect("tokens should be present");
    assert_eq!(
        flags,
        IncludeFlags::RUNTIME | IncludeFlags::COMPILE | IncludeFlags::CONTENT_FILES
    );
    assert_eq!(flags.to_string(), "runtime;compile;contentfiles");

    assert_eq!(
        IncludeFlags::parse_tokens("all").expect("all should parse"),
        Some(IncludeFlags::ALL)
    );
    assert_eq!(
        IncludeFlags::parse_tokens("none").expect("none should parse"),
        Some(IncludeFlags::empty())
    );
    assert_eq!(IncludeFlags::parse_tokens(" ; ").expect("blank should parse"), None);
}

#[test]
fn asset_flags_reject_unknown_token() {
    let err = IncludeFlags::parse_tokens("runtime;frobnicate").expect_err("must reject token");
    assert_eq!(err.token, "frobnicate");
}

#[test]
fn asset_visibility_applies_defaults_for_missing_lists() {
    let defaults = AssetVisibility::from_declared("", "", "").expect("defaults should apply");
    assert_eq!(defaults, AssetVisibility::default());
    assert_eq!(defaults.effective_include(), IncludeFlags::ALL);
    assert_eq!(
        defaults.suppress_parent(),
        IncludeFlags::CONTENT_FILES | IncludeFlags::ANALYZERS | IncludeFlags::BUILD
    );

    let declared =
        AssetVisibility::from_declared("all", "build;analyzers", "none").expect("must parse");
    assert_eq!(
        declared.effective_include(),
        IncludeFlags::ALL - IncludeFlags::BUILD - IncludeFlags::ANALYZERS
    );
    assert_eq!(declared.suppress_parent(), IncludeFlags::empty());
}

#[test]
fn runtime_graph_dedupes_ordinally_and_drops_blanks() {
    let graph = RuntimeGraph::from_tokens(["win", "win", " ", "linux", "Win"], ["", "net46.app"]);
    let rids = graph.runtime_identifiers().collect::<Vec<_>>();
    assert_eq!(rids, vec!["Win", "linux", "win"]);
    assert_eq!(graph.profile_names().collect::<Vec<_>>(), vec!["net46.app"]);
    assert!(!graph.is_empty());
    assert!(RuntimeGraph::from_tokens(["", " "], [""; 0]).is_empty());
}

#[test]
fn project_graph_spec_json_and_hash_are_stable() {
    let spec = sample_spec("alpha");
    let json = spec.to_json_pretty().expect("spec should serialize");
    assert!(json.contains("\"netstandard2.0\""));
    assert!(json.contains("\"[13.0.1, )\""));

    let parsed = ProjectGraphSpec::from_json_str(&json).expect("spec should parse");
    assert_eq!(parsed, spec);
    assert_eq!(
        parsed.content_hash().expect("hash"),
        spec.content_hash().expect("hash")
    );

    let mut changed = spec.clone();
    changed.target_frameworks[0].dependencies.clear();
    assert_ne!(
        changed.content_hash().expect("hash"),
        spec.content_hash().expect("hash")
    );
}

#[test]
fn fallback_framework_round_trips_through_json() {
    let mut spec = sample_spec("beta");
    spec.target_frameworks[0].framework = FrameworkIdentity::with_imports(
        framework("netstandard1.6"),
        vec![framework("net45"), framework("dnxcore50")],
    );
    let json = spec.to_json_pretty().expect("spec should serialize");
    let parsed = ProjectGraphSpec::from_json_str(&json).expect("spec should parse");
    assert_eq!(parsed.target_frameworks[0].framework, spec.target_frameworks[0].framework);
}

#[test]
fn dependency_graph_spec_save_and_load() {
    let dir = tempfile::tempdir().expect("must create temp dir");
    let path = dir.path().join("nested").join("solution.dg.json");

    let mut graph = DependencyGraphSpec::default();
    graph.add_restore(sample_spec("alpha"));
    graph.add_restore(sample_spec("beta"));
    graph.add_restore(sample_spec("alpha"));
    graph.save(&path).expect("must save graph");

    let loaded = DependencyGraphSpec::load(&path).expect("must load graph");
    assert_eq!(loaded, graph);
    let names = loaded
        .restore_specs()
        .expect("restore specs should resolve")
        .iter()
        .map(|spec| spec.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn dependency_graph_spec_rejects_unknown_restore_entry() {
    let graph = DependencyGraphSpec {
        restore: vec!["/missing.csproj".to_string()],
        ..DependencyGraphSpec::default()
    };
    let err = graph.restore_specs().expect_err("missing project must fail");
    assert!(err.to_string().contains("/missing.csproj"));
}

#[test]
fn dependency_graph_spec_rejects_unsupported_version() {
    let err = DependencyGraphSpec::from_json_str(r#"{"version": 7, "restore": [], "projects": {}}"#)
        .expect_err("version 7 must be rejected");
    assert!(err.to_string().contains("unsupported dependency graph spec version 7"));
}
