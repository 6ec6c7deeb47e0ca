//! Node manifest loading
//!
//! A manifest describes a node set. The format follows the file extension;
//! anything unrecognised (and stdin, `-`) is read as plain text with one
//! `name: dep1, dep2` node per line.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Node, NodeParseError};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Invalid node at line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: NodeParseError,
    },

    #[error("Failed to parse {format} manifest: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Yaml,
    Json,
    JsonLines,
    Text,
}

impl ManifestFormat {
    /// Picks the format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => ManifestFormat::Toml,
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            Some("json") => ManifestFormat::Json,
            Some("jsonl") => ManifestFormat::JsonLines,
            _ => ManifestFormat::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Toml => "toml",
            ManifestFormat::Yaml => "yaml",
            ManifestFormat::Json => "json",
            ManifestFormat::JsonLines => "jsonl",
            ManifestFormat::Text => "text",
        }
    }
}

/// `[[node]]` tables
#[derive(Deserialize)]
struct TomlManifest {
    #[serde(default)]
    node: Vec<Node>,
}

/// Either `{nodes: [...]}` or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum ListManifest {
    Wrapped { nodes: Vec<Node> },
    Bare(Vec<Node>),
}

impl ListManifest {
    fn into_nodes(self) -> Vec<Node> {
        match self {
            ListManifest::Wrapped { nodes } | ListManifest::Bare(nodes) => nodes,
        }
    }
}

/// Parses manifest content in the given format
pub fn parse(content: &str, format: ManifestFormat) -> Result<Vec<Node>, ManifestError> {
    let parse_err = |message: String| ManifestError::Parse {
        format: format.as_str(),
        message,
    };

    match format {
        ManifestFormat::Toml => toml::from_str::<TomlManifest>(content)
            .map(|m| m.node)
            .map_err(|e| parse_err(e.to_string())),
        ManifestFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(vec![]);
            }
            serde_yaml::from_str::<ListManifest>(content)
                .map(ListManifest::into_nodes)
                .map_err(|e| parse_err(e.to_string()))
        }
        ManifestFormat::Json => serde_json::from_str::<ListManifest>(content)
            .map(ListManifest::into_nodes)
            .map_err(|e| parse_err(e.to_string())),
        ManifestFormat::JsonLines => {
            let mut nodes = Vec::new();
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let node: Node = serde_json::from_str(line)
                    .map_err(|e| parse_err(format!("line {}: {}", line_num + 1, e)))?;
                nodes.push(node);
            }
            Ok(nodes)
        }
        ManifestFormat::Text => parse_text(content),
    }
}

fn parse_text(content: &str) -> Result<Vec<Node>, ManifestError> {
    let mut nodes = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let node = line.parse::<Node>().map_err(|source| ManifestError::Line {
            line: line_num + 1,
            source,
        })?;
        nodes.push(node);
    }

    Ok(nodes)
}

/// Loads nodes from a manifest file, or from stdin for `-`
pub fn load(path: &Path) -> Result<Vec<Node>> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read nodes from stdin")?;
        return parse(&content, ManifestFormat::Text).context("Failed to parse nodes from stdin");
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

    let format = ManifestFormat::from_path(path);
    let nodes = parse(&content, format)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

    tracing::debug!(path = %path.display(), format = format.as_str(), count = nodes.len(), "loaded manifest");
    Ok(nodes)
}

/// Loads and concatenates several manifests in order
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    for path in paths {
        nodes.extend(load(path.as_ref())?);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn expected() -> Vec<Node> {
        vec![Node::leaf("A"), Node::new("B", ["A"])]
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("a.toml")), ManifestFormat::Toml);
        assert_eq!(ManifestFormat::from_path(Path::new("a.yml")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("a.yaml")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("a.json")), ManifestFormat::Json);
        assert_eq!(ManifestFormat::from_path(Path::new("a.jsonl")), ManifestFormat::JsonLines);
        assert_eq!(ManifestFormat::from_path(Path::new("nodes")), ManifestFormat::Text);
    }

    #[test]
    fn parse_toml() {
        let content = r#"
[[node]]
name = "A"

[[node]]
name = "B"
dependencies = ["A"]
"#;
        assert_eq!(parse(content, ManifestFormat::Toml).unwrap(), expected());
    }

    #[test]
    fn parse_yaml_wrapped_and_bare() {
        let wrapped = "nodes:\n  - name: A\n  - name: B\n    depends_on: [A]\n";
        assert_eq!(parse(wrapped, ManifestFormat::Yaml).unwrap(), expected());

        let bare = "- name: A\n- name: B\n  dependencies:\n    - A\n";
        assert_eq!(parse(bare, ManifestFormat::Yaml).unwrap(), expected());
    }

    #[test]
    fn parse_json_wrapped_and_bare() {
        let wrapped = r#"{"nodes": [{"name": "A"}, {"name": "B", "dependencies": ["A"]}]}"#;
        assert_eq!(parse(wrapped, ManifestFormat::Json).unwrap(), expected());

        let bare = r#"[{"name": "A", "dependencies": []}, {"name": "B", "dependencies": ["A"]}]"#;
        assert_eq!(parse(bare, ManifestFormat::Json).unwrap(), expected());
    }

    #[test]
    fn parse_json_lines() {
        let content = "{\"name\": \"A\"}\n\n{\"name\": \"B\", \"dependencies\": [\"A\"]}\n";
        assert_eq!(parse(content, ManifestFormat::JsonLines).unwrap(), expected());
    }

    #[test]
    fn parse_text_with_comments() {
        let content = "# build order\nA\n\nB: A   # needs A\n";
        assert_eq!(parse(content, ManifestFormat::Text).unwrap(), expected());
    }

    #[test]
    fn text_error_reports_line() {
        let err = parse("A\n: B\n", ManifestFormat::Text).unwrap_err();
        assert!(matches!(err, ManifestError::Line { line: 2, .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse("{not json", ManifestFormat::Json).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { format: "json", .. }));
    }

    #[test]
    fn load_all_concatenates() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.json");
        fs::write(&first, "A\n").unwrap();
        fs::write(&second, r#"[{"name": "B", "dependencies": ["A"]}]"#).unwrap();

        assert_eq!(load_all(&[first, second]).unwrap(), expected());
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nope.toml")).is_err());
    }
}
