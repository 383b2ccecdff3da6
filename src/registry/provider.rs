//! Flow provider trait.

use crate::registry::{Flow, RegistryError};

/// One named source of flow definitions.
///
/// `Ok(None)` means the source is not configured or empty and resolution
/// should fall through to the next provider. `Ok(Some(_))` always carries at
/// least one flow.
pub trait FlowProvider: Send + Sync {
    /// Stable name used in logs when this provider is selected.
    fn name(&self) -> &'static str;

    fn resolve(&self) -> Result<Option<Vec<Flow>>, RegistryError>;
}
