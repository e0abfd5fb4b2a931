pub mod link;
pub mod mock;

use async_trait::async_trait;
use canopy_core::{CommandAck, ControlMessage, OtaAck, TwinMessage};
use canopy_link::TelemetryBatch;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Inbound traffic from the platform.
///
/// Delivered on the transport's own execution context; the dispatch loop
/// consumes the channel so handlers never run on the link's read path.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    /// A control message (device command, firmware command or connection
    /// status notice).
    Control(ControlMessage),
    /// A twin (shadow) change notification.
    Twin(TwinMessage),
}

/// Session with the device-management platform.
///
/// Acquired once at startup and released exactly once via `close`, on every
/// exit path. Send failures after startup are transient: callers retry, the
/// transport reconnects as needed.
#[async_trait]
pub trait CloudTransport: Send + Sync + 'static {
    /// Error type for this transport implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the inbound channel. Background work runs until the
    /// cancellation token fires.
    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<InboundMessage>, Self::Error>;

    /// Upload one telemetry batch.
    async fn send_batch(&self, batch: TelemetryBatch) -> Result<(), Self::Error>;

    /// Acknowledge a device command.
    async fn send_command_ack(&self, ack: CommandAck) -> Result<(), Self::Error>;

    /// Acknowledge a firmware command.
    async fn send_ota_ack(&self, ack: OtaAck) -> Result<(), Self::Error>;

    /// Report one twin property back to the platform.
    async fn report_property(&self, key: &str, value: Value) -> Result<(), Self::Error>;

    /// Release the session.
    async fn close(&self) -> Result<(), Self::Error>;
}
