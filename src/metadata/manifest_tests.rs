use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn package_json_supplies_name_description_and_dependencies() {
    let info = parse_package_json(
        r#"{"name":"shop","description":"Storefront","dependencies":{"react":"^18","next":"14"},"devDependencies":{"jest":"29"}}"#,
    )
    .unwrap();
    assert_eq!(info.name.as_deref(), Some("shop"));
    assert_eq!(info.description.as_deref(), Some("Storefront"));
    let mut deps = info.dependencies;
    deps.sort();
    assert_eq!(deps, vec!["next", "react"]);
}

#[test]
fn package_json_with_wrong_types_is_tolerated() {
    let info = parse_package_json(r#"{"name":42,"dependencies":[]}"#).unwrap();
    assert_eq!(info, ManifestInfo::default());
    assert!(parse_package_json("{ not json").is_none());
}

#[test]
fn cargo_toml_reads_package_and_dependency_keys() {
    let info = parse_cargo_toml(
        r#"
[package]
name = "tool"
description = "A tool"

[dependencies]
serde = "1"
clap = { version = "4" }
"#,
    )
    .unwrap();
    assert_eq!(info.name.as_deref(), Some("tool"));
    assert_eq!(info.description.as_deref(), Some("A tool"));
    assert_eq!(info.dependencies.len(), 2);
    assert!(info.dependencies.contains(&"clap".to_string()));
}

#[test]
fn cargo_workspace_without_package_has_no_name() {
    let info = parse_cargo_toml("[workspace]\nmembers = [\"a\"]\n").unwrap();
    assert_eq!(info.name, None);
}

#[test]
fn pyproject_reads_pep621_requirements() {
    let info = parse_pyproject(
        r#"
[project]
name = "svc"
description = "Service"
dependencies = ["requests>=2.31", "pydantic[email] ~= 2.0", "uvicorn; python_version > '3.8'"]
"#,
    )
    .unwrap();
    assert_eq!(info.name.as_deref(), Some("svc"));
    assert_eq!(info.dependencies, vec!["requests", "pydantic", "uvicorn"]);
}

#[test]
fn pyproject_falls_back_to_poetry() {
    let info = parse_pyproject(
        r#"
[tool.poetry]
name = "legacy"
description = "Old style"

[tool.poetry.dependencies]
python = "^3.10"
flask = "^3"
"#,
    )
    .unwrap();
    assert_eq!(info.name.as_deref(), Some("legacy"));
    assert_eq!(info.dependencies, vec!["flask"]);
}

#[test]
fn pyproject_without_metadata_tables_is_none() {
    assert!(parse_pyproject("[build-system]\nrequires = []\n").is_none());
}

#[test]
fn composer_json_uses_require_keys() {
    let info = parse_composer_json(
        r#"{"name":"acme/blog","description":"Blog","require":{"php":">=8.1","laravel/framework":"^10"}}"#,
    )
    .unwrap();
    assert_eq!(info.name.as_deref(), Some("acme/blog"));
    let mut deps = info.dependencies;
    deps.sort();
    assert_eq!(deps, vec!["laravel/framework", "php"]);
}

#[test]
fn requirements_skip_comments_and_blanks() {
    let info = parse_requirements("# pinned\nrequests==2.31\n\n  flask  \n#django\n").unwrap();
    assert_eq!(info.dependencies, vec!["requests==2.31", "flask"]);
    assert_eq!(info.name, None);
}

#[test]
fn read_manifests_follows_lookup_order_and_skips_broken_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
    fs::write(dir.path().join("package.json"), "{ broken").unwrap();
    fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"crate\"\n",
    )
    .unwrap();

    let manifests = read_manifests(dir.path());
    assert_eq!(manifests.len(), 2);
    assert_eq!(manifests[0].name.as_deref(), Some("crate"));
    assert_eq!(manifests[1].dependencies, vec!["numpy"]);
}
