use std::time::Duration;

use canopy_core::BatchId;
use canopy_link::TelemetryBatch;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use ulid::Ulid;

use crate::batch::build_batch;
use crate::cloud::CloudTransport;
use crate::registry::DeviceRegistry;
use crate::state::GatewayState;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Drives the periodic telemetry cycle: build a batch, upload it, sleep.
///
/// An upload failure is never fatal: the loop logs, waits a short fixed
/// backoff and resumes. Missed cycles are not replayed; every attempt
/// uploads freshly generated data. The loop stops only when the
/// cancellation token fires.
pub struct Scheduler {
    interval: Duration,
    backoff: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration, backoff: Duration) -> Self {
        Self { interval, backoff }
    }

    pub async fn run<T: CloudTransport>(
        &self,
        transport: &T,
        registry: &DeviceRegistry,
        state: &GatewayState,
        cancel: CancellationToken,
    ) {
        let mut rng = StdRng::from_os_rng();

        info!(
            interval_secs = self.interval.as_secs(),
            backoff_secs = self.backoff.as_secs(),
            device_count = registry.len(),
            "telemetry scheduler started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let now = jiff::Timestamp::now();
            let payloads = build_batch(registry, now, &mut rng);
            let batch = TelemetryBatch {
                id: BatchId(Ulid::new()),
                payloads: payloads.into_boxed_slice(),
            };
            let batch_id = batch.id;
            let payload_count = batch.payloads.len();

            let delay = match transport.send_batch(batch).await {
                Ok(()) => {
                    state.record_upload().await;
                    info!(batch_id = ?batch_id, payload_count, "telemetry batch uploaded");
                    self.interval
                }
                Err(e) => {
                    state.record_upload_failure().await;
                    warn!(
                        error = %e,
                        batch_id = ?batch_id,
                        backoff_secs = self.backoff.as_secs(),
                        "telemetry upload failed, backing off"
                    );
                    self.backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("telemetry scheduler shut down");
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            backoff: DEFAULT_BACKOFF,
        }
    }
}
