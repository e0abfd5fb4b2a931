use canopy_core::{TelemetryPayload, cycle_timestamp};
use rand::Rng;
use tracing::warn;

use crate::registry::DeviceRegistry;
use crate::telemetry::{DeviceProfile, GatewayHeartbeat, Telemetry};

/// Build one telemetry batch: the gateway payload first, then one payload
/// per registered device in registration order, all sharing a single
/// timestamp.
///
/// A device whose (type, model) pair has no registered generator is omitted
/// with a diagnostic; batch construction continues for the rest of the
/// fleet.
pub fn build_batch<R: Rng>(
    registry: &DeviceRegistry,
    now: jiff::Timestamp,
    rng: &mut R,
) -> Vec<TelemetryPayload> {
    let time = cycle_timestamp(now);

    let mut batch = Vec::with_capacity(registry.len() + 1);
    batch.push(TelemetryPayload {
        unique_id: registry.gateway_id().clone(),
        time: time.clone(),
        data: GatewayHeartbeat.generate(now, rng),
    });

    for device in registry.devices() {
        let Some(profile) = DeviceProfile::resolve(device.device_type, &device.model) else {
            warn!(
                device_id = %device.unique_id,
                device_type = ?device.device_type,
                model = %device.model,
                "no telemetry profile for device, omitting from batch"
            );
            continue;
        };

        batch.push(TelemetryPayload {
            unique_id: device.unique_id.clone(),
            time: time.clone(),
            data: profile.generate(now, rng),
        });
    }

    batch
}
