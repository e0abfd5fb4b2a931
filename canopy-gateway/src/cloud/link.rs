use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use canopy_core::{CommandAck, DeviceUid, OtaAck};
use canopy_link::{Client, HelloResponse, TelemetryBatch, WireMessage};
use canopy_tls::TlsConfig;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{CloudTransport, InboundMessage};

#[derive(Debug, thiserror::Error)]
pub enum TcpCloudError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("tls error: {0}")]
    Tls(#[from] canopy_tls::TlsError),
    #[error("invalid tls domain: {0}")]
    InvalidDomain(#[from] tokio_rustls::rustls::pki_types::InvalidDnsNameError),
    #[error("link error: {0}")]
    Link(#[from] canopy_link::ClientError),
    #[error("session rejected by platform: {0}")]
    Rejected(Box<str>),
    #[error("not connected")]
    NotConnected,
}

/// Platform session over TCP with mutual TLS.
///
/// The connection is established at start and re-established lazily after a
/// failure: a failed send drops the session and the next send reconnects.
/// Platform pushes received on any session are forwarded into the one
/// inbound channel handed out by `start`.
pub struct TcpCloudLink {
    addr: SocketAddr,
    tls: TlsConfig,
    gateway_id: DeviceUid,
    client: Mutex<Option<Client>>,
    inbound_tx: Mutex<Option<mpsc::Sender<InboundMessage>>>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl TcpCloudLink {
    pub fn new(addr: SocketAddr, tls: TlsConfig, gateway_id: DeviceUid) -> Self {
        Self {
            addr,
            tls,
            gateway_id,
            client: Mutex::new(None),
            inbound_tx: Mutex::new(None),
            cancel: Mutex::new(None),
        }
    }

    /// Open a TLS session, run the hello handshake and wire the session's
    /// pushes into the inbound channel.
    async fn connect(&self) -> Result<Client, TcpCloudError> {
        let stream = TcpStream::connect(self.addr).await?;

        let rustls_config = canopy_tls::client_config(&self.tls)?;
        let connector = TlsConnector::from(Arc::new(rustls_config));
        let server_name = ServerName::try_from(self.tls.domain.clone())?;

        let tls_stream = connector.connect(server_name, stream).await?;

        let mut client = Client::new(tls_stream);
        let inbound = client.take_inbound();

        match client.hello(self.gateway_id.clone()).await? {
            HelloResponse::Accepted { gateway_id } => {
                info!(gateway_id = %gateway_id, "registered with platform");
            }
            HelloResponse::Rejected { reason } => {
                return Err(TcpCloudError::Rejected(reason));
            }
        }

        let tx = self.inbound_tx.lock().await.clone();
        let cancel = self.cancel.lock().await.clone().unwrap_or_default();

        match (inbound, tx) {
            (Some(mut inbound), Some(tx)) => {
                tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            env = inbound.recv() => {
                                let Some(env) = env else { break };
                                let msg = match env.payload {
                                    WireMessage::Control(msg) => InboundMessage::Control(msg),
                                    WireMessage::TwinUpdate(msg) => InboundMessage::Twin(msg),
                                    other => {
                                        debug!(frame = ?other, "ignoring unsolicited frame");
                                        continue;
                                    }
                                };
                                if tx.send(msg).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                });
            }
            _ => {
                warn!("platform session opened before start, inbound traffic will be dropped");
            }
        }

        Ok(client)
    }

    /// Connect if no live session exists, then hand back the session.
    async fn session<'a>(
        &self,
        guard: &'a mut Option<Client>,
    ) -> Result<&'a Client, TcpCloudError> {
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        guard.as_ref().ok_or(TcpCloudError::NotConnected)
    }
}

#[async_trait]
impl CloudTransport for TcpCloudLink {
    type Error = TcpCloudError;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<InboundMessage>, Self::Error> {
        let (tx, rx) = mpsc::channel(64);
        *self.inbound_tx.lock().await = Some(tx);
        *self.cancel.lock().await = Some(cancel);

        // Best-effort initial connection so inbound traffic flows before the
        // first upload; a failure here is retried on the next send.
        let mut guard = self.client.lock().await;
        match self.connect().await {
            Ok(client) => *guard = Some(client),
            Err(e) => {
                warn!(error = %e, "initial platform connection failed, will retry on next upload");
            }
        }

        Ok(rx)
    }

    async fn send_batch(&self, batch: TelemetryBatch) -> Result<(), Self::Error> {
        let mut guard = self.client.lock().await;
        let client = self.session(&mut guard).await?;

        match client.send_batch(batch).await {
            Ok(ack) => {
                debug!(batch_id = ?ack.id, "batch acknowledged by platform");
                Ok(())
            }
            Err(e) => {
                *guard = None;
                Err(e.into())
            }
        }
    }

    async fn send_command_ack(&self, ack: CommandAck) -> Result<(), Self::Error> {
        let mut guard = self.client.lock().await;
        let client = self.session(&mut guard).await?;

        match client.send_command_ack(ack).await {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = None;
                Err(e.into())
            }
        }
    }

    async fn send_ota_ack(&self, ack: OtaAck) -> Result<(), Self::Error> {
        let mut guard = self.client.lock().await;
        let client = self.session(&mut guard).await?;

        match client.send_ota_ack(ack).await {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = None;
                Err(e.into())
            }
        }
    }

    async fn report_property(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        let mut guard = self.client.lock().await;
        let client = self.session(&mut guard).await?;

        match client.report_property(key, value).await {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = None;
                Err(e.into())
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        *self.client.lock().await = None;
        *self.inbound_tx.lock().await = None;
        info!("platform session released");
        Ok(())
    }
}
