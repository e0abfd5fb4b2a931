use dashmap::DashMap;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite, BufReader, BufWriter},
    sync::{mpsc, oneshot},
};

use crate::{Envelope, MessageId, WireMessage, read_frame, write_frame};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("send error: {0}")]
    SendError(#[source] Box<mpsc::error::SendError<Envelope>>),
    #[error("response channel closed: {0}")]
    ChannelClosed(#[from] oneshot::error::RecvError),
    #[error("timeout: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),
}

impl From<mpsc::error::SendError<Envelope>> for RpcError {
    fn from(err: mpsc::error::SendError<Envelope>) -> Self {
        RpcError::SendError(Box::new(err))
    }
}

/// Framed request/response layer over one stream.
///
/// A writer task drains the outbound queue; a reader task routes replies to
/// their waiting `call` and forwards everything else (platform pushes) to
/// the inbound queue. Both tasks end when the stream closes.
pub struct RpcLink {
    tx: mpsc::Sender<Envelope>,
    rx: Option<mpsc::Receiver<Envelope>>,
    pending: Arc<DashMap<MessageId, oneshot::Sender<Envelope>>>,
}

impl RpcLink {
    pub fn new<S>(stream: S, buffer: usize) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let mut reader = BufReader::new(reader);
        let mut writer = BufWriter::new(writer);

        let (tx_out, mut rx_out) = mpsc::channel::<Envelope>(buffer);
        let (tx_in, rx_in) = mpsc::channel::<Envelope>(buffer);

        let pending: Arc<DashMap<MessageId, oneshot::Sender<Envelope>>> = Arc::new(DashMap::new());

        tokio::spawn(async move {
            while let Some(msg) = rx_out.recv().await {
                if let Err(e) = write_frame(&mut writer, &msg).await {
                    tracing::error!(error = ?e, "link writer error");
                    break;
                }
                tracing::trace!(msg_id = ?msg.msg_id, "wrote frame");
            }
        });

        let pending_clone = pending.clone();
        tokio::spawn(async move {
            loop {
                let msg = match read_frame(&mut reader).await {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = ?e, "link reader closed");
                        break;
                    }
                };

                tracing::trace!(msg_id = ?msg.msg_id, "read frame");

                if let Some(reply_to) = msg.reply_to {
                    if let Some((_, tx)) = pending_clone.remove(&reply_to) {
                        let _ = tx.send(msg);
                        continue;
                    }
                    tracing::warn!(?reply_to, "no waiter found for reply");
                }

                if tx_in.send(msg).await.is_err() {
                    break;
                }
            }
        });

        Self {
            tx: tx_out,
            rx: Some(rx_in),
            pending,
        }
    }

    /// Send a fire-and-forget message.
    pub async fn send(&self, payload: WireMessage) -> Result<MessageId, RpcError> {
        let msg_id = MessageId::new();
        let env = Envelope {
            msg_id,
            reply_to: None,
            payload,
        };

        self.tx.send(env).await?;

        Ok(msg_id)
    }

    /// Send a request and wait for its reply.
    pub async fn call(
        &self,
        payload: WireMessage,
        timeout: Duration,
    ) -> Result<Envelope, RpcError> {
        let msg_id = MessageId::new();
        let (tx_wait, rx_wait) = oneshot::channel();

        self.pending.insert(msg_id, tx_wait);

        let env = Envelope {
            msg_id,
            reply_to: None,
            payload,
        };

        if let Err(e) = self.tx.send(env).await {
            self.pending.remove(&msg_id);
            return Err(e.into());
        }

        match tokio::time::timeout(timeout, rx_wait).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(closed)) => Err(RpcError::ChannelClosed(closed)),
            Err(elapsed) => {
                self.pending.remove(&msg_id);
                Err(RpcError::Timeout(elapsed))
            }
        }
    }

    /// Answer a request received from the peer.
    pub async fn reply(
        &self,
        request_msg_id: MessageId,
        payload: WireMessage,
    ) -> Result<MessageId, RpcError> {
        let msg_id = MessageId::new();
        let env = Envelope {
            msg_id,
            reply_to: Some(request_msg_id),
            payload,
        };

        self.tx.send(env).await?;

        Ok(msg_id)
    }

    /// Receive the next unsolicited message from the peer.
    ///
    /// Returns `None` once the stream is closed or after the inbound queue
    /// has been moved out with [`RpcLink::take_inbound`].
    pub async fn recv(&mut self) -> Option<Envelope> {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Move the inbound queue out, so pushes can be consumed from a task
    /// that does not own the link.
    pub fn take_inbound(&mut self) -> Option<mpsc::Receiver<Envelope>> {
        self.rx.take()
    }
}
