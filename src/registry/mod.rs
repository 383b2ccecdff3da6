//! Flow registry subsystem.
//!
//! # Data Flow
//! ```text
//! resolve() walks an ordered provider chain, first non-empty source wins:
//!     file.rs   (structured flows file, ${VAR} substitution)
//!     → env.rs  (FLOW_<N>_* variable groups)
//!     → legacy.rs (single FLOW_URL / LAUNCH_KEY pair)
//! ```
//!
//! # Design Decisions
//! - Providers are explicit and named; the selected provider is logged
//! - The environment is snapshotted at construction so tests can inject one
//! - The flows file is re-read on every resolve; flows carry no cache

pub mod env;
pub mod file;
pub mod legacy;
pub mod provider;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::config::RegistryConfig;
use self::env::EnvGroupProvider;
use self::file::FlowsFileProvider;
use self::legacy::LegacyPairProvider;
use self::provider::FlowProvider;

/// Snapshot of environment variables consulted by the providers.
pub type EnvMap = HashMap<String, String>;

/// A triggerable external automation flow.
#[derive(Debug, Clone)]
pub struct Flow {
    /// Unique, stable identifier.
    pub id: String,

    /// Human-facing title.
    pub title: String,

    /// Human-facing description.
    pub description: String,

    /// Target URL the trigger call is issued against.
    pub flow_url: Url,

    /// Shared access code required to trigger this flow.
    pub launch_key: String,
}

/// Errors that can occur while resolving flows.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read flows file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse flows file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("flow '{id}' has an invalid URL: {source}")]
    InvalidUrl {
        id: String,
        source: url::ParseError,
    },
}

/// Resolves the list of triggerable flows from an ordered provider chain.
pub struct FlowRegistry {
    providers: Vec<Box<dyn FlowProvider>>,
}

impl FlowRegistry {
    /// Create a registry with an explicit provider chain.
    pub fn new(providers: Vec<Box<dyn FlowProvider>>) -> Self {
        Self { providers }
    }

    /// Standard chain (file → env groups → legacy pair) over a given
    /// environment snapshot.
    pub fn from_env_snapshot(config: &RegistryConfig, env: EnvMap) -> Self {
        Self::new(vec![
            Box::new(FlowsFileProvider::new(
                config.flows_file.clone(),
                env.clone(),
            )),
            Box::new(EnvGroupProvider::new(env.clone())),
            Box::new(LegacyPairProvider::new(env)),
        ])
    }

    /// Standard chain over the process environment.
    pub fn from_process_env(config: &RegistryConfig) -> Self {
        Self::from_env_snapshot(config, std::env::vars().collect())
    }

    /// Resolve the ordered flow list. First provider reporting a non-empty
    /// set wins; an empty registry is not an error.
    pub fn resolve(&self) -> Result<Vec<Flow>, RegistryError> {
        for provider in &self.providers {
            if let Some(flows) = provider.resolve()? {
                tracing::debug!(
                    provider = provider.name(),
                    flows = flows.len(),
                    "Flow registry resolved"
                );
                return Ok(flows);
            }
        }
        tracing::debug!("No flow source configured, registry is empty");
        Ok(Vec::new())
    }

    /// Look up one flow by id. Unknown ids are an absent value, not an error.
    pub fn find(&self, id: &str) -> Result<Option<Flow>, RegistryError> {
        Ok(self.resolve()?.into_iter().find(|f| f.id == id))
    }
}
