use std::sync::Arc;

use async_trait::async_trait;
use canopy_core::{CommandAck, OtaAck};
use canopy_link::TelemetryBatch;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{CloudTransport, InboundMessage};

/// In-process cloud transport.
///
/// Records everything sent, can fail a planned number of uploads, and lets
/// callers inject inbound traffic. Backs the `mock` cloud config for
/// offline runs and is the reference transport for tests.
#[derive(Clone, Default)]
pub struct MockCloud {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    batches: Vec<TelemetryBatch>,
    command_acks: Vec<CommandAck>,
    ota_acks: Vec<OtaAck>,
    twin_reports: Vec<(String, Value)>,
    upload_attempts: Vec<tokio::time::Instant>,
    fail_uploads: u32,
    inbound_tx: Option<mpsc::Sender<InboundMessage>>,
    closed: bool,
}

/// Error returned for uploads failed on purpose.
#[derive(Debug, thiserror::Error)]
#[error("injected upload failure")]
pub struct InjectedFailure;

impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` uploads with [`InjectedFailure`].
    pub async fn fail_next_uploads(&self, count: u32) {
        let mut inner = self.inner.lock().await;
        inner.fail_uploads = count;
    }

    /// Deliver an inbound message as if pushed by the platform.
    ///
    /// Panics if the transport has not been started.
    pub async fn inject(&self, msg: InboundMessage) {
        let tx = {
            let inner = self.inner.lock().await;
            inner
                .inbound_tx
                .clone()
                .expect("MockCloud::inject called before start")
        };
        tx.send(msg).await.expect("inbound channel closed");
    }

    pub async fn sent_batches(&self) -> Vec<TelemetryBatch> {
        self.inner.lock().await.batches.clone()
    }

    pub async fn command_acks(&self) -> Vec<CommandAck> {
        self.inner.lock().await.command_acks.clone()
    }

    pub async fn ota_acks(&self) -> Vec<OtaAck> {
        self.inner.lock().await.ota_acks.clone()
    }

    pub async fn twin_reports(&self) -> Vec<(String, Value)> {
        self.inner.lock().await.twin_reports.clone()
    }

    /// Times of every upload attempt, successful or not.
    pub async fn upload_attempts(&self) -> Vec<tokio::time::Instant> {
        self.inner.lock().await.upload_attempts.clone()
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}

#[async_trait]
impl CloudTransport for MockCloud {
    type Error = InjectedFailure;

    async fn start(
        &self,
        _cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<InboundMessage>, Self::Error> {
        let (tx, rx) = mpsc::channel(64);
        let mut inner = self.inner.lock().await;
        inner.inbound_tx = Some(tx);
        info!("mock cloud transport started");
        Ok(rx)
    }

    async fn send_batch(&self, batch: TelemetryBatch) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().await;
        inner.upload_attempts.push(tokio::time::Instant::now());

        if inner.fail_uploads > 0 {
            inner.fail_uploads -= 1;
            return Err(InjectedFailure);
        }

        inner.batches.push(batch);
        Ok(())
    }

    async fn send_command_ack(&self, ack: CommandAck) -> Result<(), Self::Error> {
        self.inner.lock().await.command_acks.push(ack);
        Ok(())
    }

    async fn send_ota_ack(&self, ack: OtaAck) -> Result<(), Self::Error> {
        self.inner.lock().await.ota_acks.push(ack);
        Ok(())
    }

    async fn report_property(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        self.inner
            .lock()
            .await
            .twin_reports
            .push((key.to_owned(), value));
        Ok(())
    }

    async fn close(&self) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().await;
        inner.inbound_tx = None;
        inner.closed = true;
        info!("mock cloud transport closed");
        Ok(())
    }
}
