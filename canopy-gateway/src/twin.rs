use canopy_core::{RESERVED_TWIN_KEYS, TwinMessage};
use serde_json::Value;
use tracing::debug;

/// Applies cloud-desired twin property changes to device-reported state.
///
/// A message carrying both `desired` and `reported` is an echo of the
/// device's own prior report and is ignored entirely, which breaks the
/// update loop between the two property sets.
pub struct TwinSynchronizer;

impl TwinSynchronizer {
    /// Return one discrete reported-property update per non-reserved key of
    /// a cloud-originated desired diff. Per-key granularity keeps each
    /// property's audit trail and failure isolation independent.
    pub fn apply_update(&self, msg: &TwinMessage) -> Vec<(String, Value)> {
        if msg.reported.is_some() {
            debug!("twin echo suppressed");
            return Vec::new();
        }

        let Some(desired) = msg.desired.as_ref() else {
            debug!("twin message without desired properties, nothing to apply");
            return Vec::new();
        };

        desired
            .iter()
            .filter(|(key, _)| !RESERVED_TWIN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
