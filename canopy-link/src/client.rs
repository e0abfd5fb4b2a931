use std::time::Duration;

use canopy_core::{CommandAck, DeviceUid, OtaAck};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::{
    Envelope, HelloRequest, HelloResponse, RpcError, RpcLink, TelemetryBatch, TelemetryBatchAck,
    TwinReport, WireError, WireMessage,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway-side handle to the platform session.
pub struct Client {
    rpc: RpcLink,
    timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),
    #[error("unexpected response type")]
    UnexpectedResponse,
    #[error("error response: {0:?}")]
    ErrorResponse(WireError),
}

impl Client {
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        Self::with_buffer(stream, 1024)
    }

    pub fn with_buffer<S>(stream: S, buffer: usize) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            rpc: RpcLink::new(stream, buffer),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Move the platform-push queue out of the client. Control messages and
    /// twin updates arrive here.
    pub fn take_inbound(&mut self) -> Option<mpsc::Receiver<Envelope>> {
        self.rpc.take_inbound()
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        let response = self.rpc.call(WireMessage::Ping, self.timeout).await?;

        match response.payload {
            WireMessage::Pong => Ok(()),
            WireMessage::Error(err) => Err(ClientError::ErrorResponse(err)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn hello(&self, gateway_id: DeviceUid) -> Result<HelloResponse, ClientError> {
        let response = self
            .rpc
            .call(
                WireMessage::Hello(HelloRequest { gateway_id }),
                self.timeout,
            )
            .await?;

        match response.payload {
            WireMessage::HelloResponse(resp) => Ok(resp),
            WireMessage::Error(err) => Err(ClientError::ErrorResponse(err)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn send_batch(
        &self,
        batch: TelemetryBatch,
    ) -> Result<TelemetryBatchAck, ClientError> {
        let response = self
            .rpc
            .call(WireMessage::TelemetryBatch(batch), self.timeout)
            .await?;

        match response.payload {
            WireMessage::TelemetryBatchAck(resp) => Ok(resp),
            WireMessage::Error(err) => Err(ClientError::ErrorResponse(err)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Acknowledge a device command. Fire-and-forget: the platform does not
    /// answer acks.
    pub async fn send_command_ack(&self, ack: CommandAck) -> Result<(), ClientError> {
        self.rpc.send(WireMessage::CommandAck(ack)).await?;
        Ok(())
    }

    /// Acknowledge a firmware command. Fire-and-forget.
    pub async fn send_ota_ack(&self, ack: OtaAck) -> Result<(), ClientError> {
        self.rpc.send(WireMessage::OtaAck(ack)).await?;
        Ok(())
    }

    /// Report one twin property back to the platform.
    pub async fn report_property(&self, key: &str, value: Value) -> Result<(), ClientError> {
        self.rpc
            .send(WireMessage::TwinReport(TwinReport {
                key: key.into(),
                value,
            }))
            .await?;
        Ok(())
    }
}
