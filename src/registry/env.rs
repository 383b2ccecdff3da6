//! Grouped environment variable provider.

use url::Url;

use crate::registry::provider::FlowProvider;
use crate::registry::{EnvMap, Flow, RegistryError};

/// Loads flows from `FLOW_<N>_<FIELD>` variable groups.
///
/// A group is accepted only when all five fields (ID, URL, KEY, TITLE, DESC)
/// are present; incomplete groups are dropped. Groups are ordered by their
/// numeric suffix.
pub struct EnvGroupProvider {
    env: EnvMap,
}

impl EnvGroupProvider {
    pub fn new(env: EnvMap) -> Self {
        Self { env }
    }

    fn field(&self, n: u32, field: &str) -> Option<&String> {
        self.env.get(&format!("FLOW_{n}_{field}"))
    }

    fn group(&self, n: u32) -> Option<Flow> {
        let id = self.field(n, "ID")?;
        let raw_url = self.field(n, "URL")?;
        let key = self.field(n, "KEY")?;
        let title = self.field(n, "TITLE")?;
        let desc = self.field(n, "DESC")?;

        let flow_url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(error) => {
                tracing::debug!(group = n, %error, "Dropping flow group with invalid URL");
                return None;
            }
        };

        Some(Flow {
            id: id.clone(),
            title: title.clone(),
            description: desc.clone(),
            flow_url,
            launch_key: key.clone(),
        })
    }
}

impl FlowProvider for EnvGroupProvider {
    fn name(&self) -> &'static str {
        "env-groups"
    }

    fn resolve(&self) -> Result<Option<Vec<Flow>>, RegistryError> {
        let mut suffixes: Vec<u32> = self
            .env
            .keys()
            .filter_map(|k| k.strip_prefix("FLOW_")?.strip_suffix("_ID")?.parse().ok())
            .collect();
        suffixes.sort_unstable();
        suffixes.dedup();

        let mut flows = Vec::new();
        for n in suffixes {
            match self.group(n) {
                Some(flow) => flows.push(flow),
                None => {
                    tracing::debug!(group = n, "Dropping incomplete flow group");
                }
            }
        }

        if flows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(flows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn groups_are_ordered_by_suffix() {
        let p = EnvGroupProvider::new(env(&[
            ("FLOW_2_ID", "b"),
            ("FLOW_2_URL", "https://example.com/b"),
            ("FLOW_2_KEY", "kb"),
            ("FLOW_2_TITLE", "B"),
            ("FLOW_2_DESC", "flow b"),
            ("FLOW_1_ID", "a"),
            ("FLOW_1_URL", "https://example.com/a"),
            ("FLOW_1_KEY", "ka"),
            ("FLOW_1_TITLE", "A"),
            ("FLOW_1_DESC", "flow a"),
        ]));
        let flows = p.resolve().unwrap().unwrap();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].id, "a");
        assert_eq!(flows[1].id, "b");
    }

    #[test]
    fn incomplete_group_is_dropped() {
        // FLOW_2 lacks DESC and must not appear.
        let p = EnvGroupProvider::new(env(&[
            ("FLOW_1_ID", "a"),
            ("FLOW_1_URL", "https://example.com/a"),
            ("FLOW_1_KEY", "ka"),
            ("FLOW_1_TITLE", "A"),
            ("FLOW_1_DESC", "flow a"),
            ("FLOW_2_ID", "b"),
            ("FLOW_2_URL", "https://example.com/b"),
            ("FLOW_2_KEY", "kb"),
            ("FLOW_2_TITLE", "B"),
        ]));
        let flows = p.resolve().unwrap().unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].id, "a");
    }

    #[test]
    fn all_groups_incomplete_falls_through() {
        let p = EnvGroupProvider::new(env(&[("FLOW_1_ID", "a")]));
        assert!(p.resolve().unwrap().is_none());
    }
}
