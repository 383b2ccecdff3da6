//! Legacy single-flow provider.

use url::Url;

use crate::registry::provider::FlowProvider;
use crate::registry::{EnvMap, Flow, RegistryError};

/// Builds a single flow from the original `FLOW_URL` / `LAUNCH_KEY` pair.
///
/// Kept so deployments predating the multi-flow registry keep working
/// unchanged.
pub struct LegacyPairProvider {
    env: EnvMap,
}

impl LegacyPairProvider {
    pub fn new(env: EnvMap) -> Self {
        Self { env }
    }
}

impl FlowProvider for LegacyPairProvider {
    fn name(&self) -> &'static str {
        "legacy-pair"
    }

    fn resolve(&self) -> Result<Option<Vec<Flow>>, RegistryError> {
        let (Some(raw_url), Some(key)) = (self.env.get("FLOW_URL"), self.env.get("LAUNCH_KEY"))
        else {
            return Ok(None);
        };

        let flow_url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(error) => {
                tracing::debug!(%error, "Ignoring legacy FLOW_URL with invalid URL");
                return Ok(None);
            }
        };

        Ok(Some(vec![Flow {
            id: "default".to_string(),
            title: "Default flow".to_string(),
            description: String::new(),
            flow_url,
            launch_key: key.clone(),
        }]))
    }
}
