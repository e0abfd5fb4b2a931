use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::Envelope;

/// Upper bound on a single frame. A full-fleet telemetry batch is well
/// under 256 KiB; anything larger indicates a corrupt length prefix.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("frame of {size} bytes exceeds maximum of {max}")]
    TooLarge { size: usize, max: usize },
}

/// Write one length-prefixed JSON frame.
pub async fn write_frame<W>(writer: &mut W, envelope: &Envelope) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = serde_json::to_vec(envelope)?;
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge {
            size: bytes.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    writer.write_u32(bytes.len() as u32).await?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;

    Ok(())
}

/// Read one length-prefixed JSON frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<Envelope, FrameError>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32().await? as usize;
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;

    Ok(serde_json::from_slice(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageId, WireMessage};

    #[tokio::test]
    async fn frame_round_trip() {
        let envelope = Envelope {
            msg_id: MessageId::new(),
            reply_to: None,
            payload: WireMessage::Ping,
        };

        let mut buf = Vec::new();
        write_frame(&mut buf, &envelope).await.unwrap();

        let mut cursor = std::io::Cursor::new(buf);
        let decoded = read_frame(&mut cursor).await.unwrap();

        assert_eq!(decoded.msg_id, envelope.msg_id);
        assert!(matches!(decoded.payload, WireMessage::Ping));
    }

    #[tokio::test]
    async fn oversized_length_prefix_is_rejected() {
        let mut buf = Vec::new();
        tokio::io::AsyncWriteExt::write_u32(&mut buf, (MAX_FRAME_SIZE + 1) as u32)
            .await
            .unwrap();

        let mut cursor = std::io::Cursor::new(buf);
        let err = read_frame(&mut cursor).await.unwrap_err();
        assert!(matches!(err, FrameError::TooLarge { .. }));
    }
}
