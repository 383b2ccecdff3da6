//! Structured flows file provider.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::registry::provider::FlowProvider;
use crate::registry::{EnvMap, Flow, RegistryError};

/// On-disk shape of the flows file.
#[derive(Debug, Deserialize)]
struct FlowsFile {
    #[serde(default)]
    flows: Vec<FlowEntry>,
}

#[derive(Debug, Deserialize)]
struct FlowEntry {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    flow_url: String,
    launch_key: String,
}

/// Loads flows from a TOML file with `${NAME}` environment substitution.
///
/// The file is re-read on every resolve. A missing file falls through to the
/// next provider; a malformed file is a hard error.
pub struct FlowsFileProvider {
    path: PathBuf,
    env: EnvMap,
}

impl FlowsFileProvider {
    pub fn new(path: PathBuf, env: EnvMap) -> Self {
        Self { path, env }
    }

    /// Substitute a whole-value `${NAME}` reference from the environment
    /// snapshot. Undefined names leave the value literal.
    fn expand(&self, value: &str) -> String {
        if let Some(name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
            if let Some(resolved) = self.env.get(name) {
                return resolved.clone();
            }
        }
        value.to_string()
    }
}

impl FlowProvider for FlowsFileProvider {
    fn name(&self) -> &'static str {
        "flows-file"
    }

    fn resolve(&self) -> Result<Option<Vec<Flow>>, RegistryError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        let parsed: FlowsFile =
            toml::from_str(&content).map_err(|source| RegistryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if parsed.flows.is_empty() {
            return Ok(None);
        }

        let mut flows = Vec::with_capacity(parsed.flows.len());
        for entry in parsed.flows {
            let raw_url = self.expand(&entry.flow_url);
            let flow_url = Url::parse(&raw_url).map_err(|source| RegistryError::InvalidUrl {
                id: entry.id.clone(),
                source,
            })?;
            flows.push(Flow {
                id: self.expand(&entry.id),
                title: self.expand(&entry.title),
                description: self.expand(&entry.description),
                flow_url,
                launch_key: self.expand(&entry.launch_key),
            });
        }
        Ok(Some(flows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(content: &str, env: &[(&str, &str)]) -> (tempfile::TempDir, FlowsFileProvider) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows.toml");
        fs::write(&path, content).unwrap();
        let env = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        (dir, FlowsFileProvider::new(path, env))
    }

    const ONE_FLOW: &str = r#"
[[flows]]
id = "deploy"
title = "Deploy"
description = "Deploy to production"
flow_url = "https://hooks.example.com/deploy"
launch_key = "${DEPLOY_KEY}"
"#;

    #[test]
    fn substitutes_defined_variables() {
        let (_dir, p) = provider(ONE_FLOW, &[("DEPLOY_KEY", "bar")]);
        let flows = p.resolve().unwrap().unwrap();
        assert_eq!(flows[0].launch_key, "bar");
    }

    #[test]
    fn undefined_reference_stays_literal() {
        let (_dir, p) = provider(ONE_FLOW, &[]);
        let flows = p.resolve().unwrap().unwrap();
        assert_eq!(flows[0].launch_key, "${DEPLOY_KEY}");
    }

    #[test]
    fn missing_file_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let p = FlowsFileProvider::new(dir.path().join("absent.toml"), EnvMap::new());
        assert!(p.resolve().unwrap().is_none());
    }

    #[test]
    fn empty_flow_list_falls_through() {
        let (_dir, p) = provider("flows = []\n", &[]);
        assert!(p.resolve().unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, p) = provider("[[flows]]\nid = 42\n", &[]);
        assert!(matches!(p.resolve(), Err(RegistryError::Parse { .. })));
    }

    #[test]
    fn invalid_url_is_an_error() {
        let (_dir, p) = provider(
            r#"
[[flows]]
id = "bad"
title = "Bad"
flow_url = "not a url"
launch_key = "k"
"#,
            &[],
        );
        assert!(matches!(p.resolve(), Err(RegistryError::InvalidUrl { .. })));
    }
}
