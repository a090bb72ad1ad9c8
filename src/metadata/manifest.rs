//! Package manifest parsing. Every reader is best-effort: a missing or
//! malformed manifest yields `None` and never blocks the others.

use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use toml::Value as TomlValue;
use tracing::debug;

/// What one manifest contributes to a project record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

type Reader = fn(&str) -> Option<ManifestInfo>;

/// Manifests in lookup order; the first that supplies a name wins.
const MANIFESTS: &[(&str, Reader)] = &[
    ("package.json", parse_package_json),
    ("Cargo.toml", parse_cargo_toml),
    ("pyproject.toml", parse_pyproject),
    ("composer.json", parse_composer_json),
    ("requirements.txt", parse_requirements),
];

/// Read every known manifest present in `dir`, in lookup order.
#[must_use]
pub fn read_manifests(dir: &Path) -> Vec<ManifestInfo> {
    MANIFESTS
        .iter()
        .filter_map(|(file, reader)| {
            let path = dir.join(file);
            let content = fs::read_to_string(&path).ok()?;
            let parsed = reader(&content);
            if parsed.is_none() {
                debug!(path = %path.display(), "ignoring unparseable manifest");
            }
            parsed
        })
        .collect()
}

#[must_use]
pub fn parse_package_json(content: &str) -> Option<ManifestInfo> {
    let json: JsonValue = serde_json::from_str(content).ok()?;
    Some(ManifestInfo {
        name: json_string(&json, "name"),
        description: json_string(&json, "description"),
        dependencies: json_keys(&json, "dependencies"),
    })
}

#[must_use]
pub fn parse_composer_json(content: &str) -> Option<ManifestInfo> {
    let json: JsonValue = serde_json::from_str(content).ok()?;
    Some(ManifestInfo {
        name: json_string(&json, "name"),
        description: json_string(&json, "description"),
        dependencies: json_keys(&json, "require"),
    })
}

#[must_use]
pub fn parse_cargo_toml(content: &str) -> Option<ManifestInfo> {
    let toml: TomlValue = toml::from_str(content).ok()?;
    let package = toml.get("package");
    Some(ManifestInfo {
        name: package.and_then(|p| toml_string(p, "name")),
        description: package.and_then(|p| toml_string(p, "description")),
        dependencies: toml_keys(&toml, "dependencies"),
    })
}

/// PEP 621 `[project]`, falling back to `[tool.poetry]`.
#[must_use]
pub fn parse_pyproject(content: &str) -> Option<ManifestInfo> {
    let toml: TomlValue = toml::from_str(content).ok()?;

    if let Some(project) = toml.get("project") {
        let dependencies = project
            .get("dependencies")
            .and_then(TomlValue::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(TomlValue::as_str)
                    .filter_map(requirement_name)
                    .collect()
            })
            .unwrap_or_default();
        return Some(ManifestInfo {
            name: toml_string(project, "name"),
            description: toml_string(project, "description"),
            dependencies,
        });
    }

    let poetry = toml.get("tool").and_then(|t| t.get("poetry"))?;
    Some(ManifestInfo {
        name: toml_string(poetry, "name"),
        description: toml_string(poetry, "description"),
        dependencies: toml_keys(poetry, "dependencies")
            .into_iter()
            .filter(|dep| dep != "python")
            .collect(),
    })
}

/// Non-blank lines that are not comments, verbatim apart from trimming.
#[must_use]
pub fn parse_requirements(content: &str) -> Option<ManifestInfo> {
    Some(ManifestInfo {
        dependencies: content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect(),
        ..ManifestInfo::default()
    })
}

/// Distribution name of a PEP 508 requirement (`requests>=2; python_version>"3"`).
fn requirement_name(requirement: &str) -> Option<String> {
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    let name = requirement[..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn json_string(json: &JsonValue, key: &str) -> Option<String> {
    json.get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn json_keys(json: &JsonValue, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(JsonValue::as_object)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}

fn toml_string(table: &TomlValue, key: &str) -> Option<String> {
    table
        .get(key)
        .and_then(TomlValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn toml_keys(table: &TomlValue, key: &str) -> Vec<String> {
    table
        .get(key)
        .and_then(TomlValue::as_table)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
