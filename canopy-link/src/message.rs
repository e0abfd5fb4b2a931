use canopy_core::{
    BatchId, CommandAck, ControlMessage, DeviceUid, OtaAck, TelemetryPayload, TwinMessage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// Unique identifier for one frame on the link, used to match replies to
/// their request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Ulid);

impl MessageId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Carrier for every frame on the link.
///
/// A frame with `reply_to` set answers an earlier request; a frame without
/// it is either a request or an unsolicited push from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub msg_id: MessageId,
    pub reply_to: Option<MessageId>,
    pub payload: WireMessage,
}

/// Session handshake sent by the gateway after connecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloRequest {
    pub gateway_id: DeviceUid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HelloResponse {
    Accepted { gateway_id: DeviceUid },
    Rejected { reason: Box<str> },
}

/// One telemetry upload: the payloads of a single cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryBatch {
    pub id: BatchId,
    pub payloads: Box<[TelemetryPayload]>,
}

/// Platform receipt for an uploaded batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryBatchAck {
    pub id: BatchId,
}

/// One discrete reported-property update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinReport {
    pub key: Box<str>,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    pub message: Box<str>,
}

/// Every message that can travel over the link.
///
/// `Control` and `TwinUpdate` are pushed by the platform without a
/// preceding request; everything else follows request/response or
/// fire-and-forget conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WireMessage {
    Hello(HelloRequest),
    HelloResponse(HelloResponse),
    Ping,
    Pong,
    TelemetryBatch(TelemetryBatch),
    TelemetryBatchAck(TelemetryBatchAck),
    CommandAck(CommandAck),
    OtaAck(OtaAck),
    TwinReport(TwinReport),
    Control(ControlMessage),
    TwinUpdate(TwinMessage),
    Error(WireError),
}
