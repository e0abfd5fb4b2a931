use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Mutex;

/// Shared runtime state, written from both the scheduler loop and the
/// inbound dispatch context.
pub struct GatewayState {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    cloud_connected: bool,
    uploads_completed: u64,
    uploads_failed: u64,
    commands_handled: u64,
    twin_updates_applied: u64,
    startup_time: Instant,
}

/// Point-in-time view of the runtime state, served by the HTTP endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub cloud_connected: bool,
    pub uploads_completed: u64,
    pub uploads_failed: u64,
    pub commands_handled: u64,
    pub twin_updates_applied: u64,
    pub uptime_seconds: u64,
}

impl GatewayState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                cloud_connected: false,
                uploads_completed: 0,
                uploads_failed: 0,
                commands_handled: 0,
                twin_updates_applied: 0,
                startup_time: Instant::now(),
            })),
        }
    }

    /// Record the platform's connection status notice (ct 116).
    pub async fn set_cloud_connected(&self, connected: bool) {
        let mut inner = self.inner.lock().await;
        inner.cloud_connected = connected;
    }

    pub async fn cloud_connected(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.cloud_connected
    }

    pub async fn record_upload(&self) {
        let mut inner = self.inner.lock().await;
        inner.uploads_completed += 1;
    }

    pub async fn record_upload_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.uploads_failed += 1;
    }

    pub async fn record_command(&self) {
        let mut inner = self.inner.lock().await;
        inner.commands_handled += 1;
    }

    pub async fn record_twin_updates(&self, count: u64) {
        let mut inner = self.inner.lock().await;
        inner.twin_updates_applied += count;
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        let inner = self.inner.lock().await;
        StateSnapshot {
            cloud_connected: inner.cloud_connected,
            uploads_completed: inner.uploads_completed,
            uploads_failed: inner.uploads_failed,
            commands_handled: inner.commands_handled,
            twin_updates_applied: inner.twin_updates_applied,
            uptime_seconds: inner.startup_time.elapsed().as_secs(),
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GatewayState {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
