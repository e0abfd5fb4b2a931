use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

// We use `Box<str>` and `Box<[T]>` for structures that don't need to be
// dynamically sized. This helps us keep allocations compact and avoid
// accidental cloning of large values.
type BoxStr = Box<str>;
type BoxList<T> = Box<[T]>;

/// Unique identifier for a device, assigned by the device-management
/// platform. The fleet-wide identity key for gateway and child devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceUid(pub BoxStr);

impl DeviceUid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceUid {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

/// Unique identifier for one telemetry upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Ulid);

/// Device classification.
///
/// The serialized name doubles as the device's firmware targeting tag
/// (see [`DeviceType::tag`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Thermostat,
    TemperatureZigbee,
    Gesysense,
    Energy,
    Refrigeration,
    Lighting,
}

/// Targeting tag for the gateway device itself in firmware commands.
pub const GATEWAY_TAG: &str = "gateway";

impl DeviceType {
    /// Tag used by firmware (OTA) commands to address a class of devices.
    pub fn tag(&self) -> &'static str {
        match self {
            DeviceType::Thermostat => "thermostat",
            DeviceType::TemperatureZigbee => "temperature_zigbee",
            DeviceType::Gesysense => "gesysense",
            DeviceType::Energy => "energy",
            DeviceType::Refrigeration => "refrigeration",
            DeviceType::Lighting => "lighting",
        }
    }
}

/// A device registered behind the gateway.
/// Immutable once the registry is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    /// Stable identity of this device.
    pub unique_id: DeviceUid,
    /// Type of the device.
    pub device_type: DeviceType,
    /// Hardware model string. May be empty for types where the platform
    /// does not distinguish models.
    pub model: BoxStr,
    /// Display name.
    pub name: BoxStr,
}

/// One device's telemetry for one upload cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPayload {
    /// Device this payload belongs to.
    pub unique_id: DeviceUid,
    /// Cycle timestamp, ISO-8601 with milliseconds and a `Z` suffix.
    /// Identical across every payload of a batch.
    pub time: BoxStr,
    /// Device-type-specific attribute tree.
    pub data: Value,
}

/// Format a timestamp the way the platform expects batch times:
/// ISO-8601 in UTC with exactly millisecond precision and a `Z` suffix.
pub fn cycle_timestamp(ts: jiff::Timestamp) -> BoxStr {
    ts.strftime("%Y-%m-%dT%H:%M:%S%.3fZ").to_string().into()
}

/// Families of inbound control messages, selected by the `ct` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Device command (`ct` 0).
    Device,
    /// Firmware/OTA command (`ct` 1).
    Firmware,
    /// Connection status notice (`ct` 116).
    ConnectionStatus,
}

/// Error for `ct` codes outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCommandKind(pub i64);

impl fmt::Display for UnknownCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown control message type: {}", self.0)
    }
}

impl std::error::Error for UnknownCommandKind {}

impl TryFrom<i64> for CommandKind {
    type Error = UnknownCommandKind;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CommandKind::Device),
            1 => Ok(CommandKind::Firmware),
            116 => Ok(CommandKind::ConnectionStatus),
            other => Err(UnknownCommandKind(other)),
        }
    }
}

/// An inbound control message from the platform.
///
/// Every field is optional on the wire; validation happens at dispatch so
/// malformed input never aborts deserialization of the control stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Message family selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ct: Option<i64>,
    /// Opaque acknowledgment correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<BoxStr>,
    /// Target device id for device commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BoxStr>,
    /// Firmware image locations for OTA commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<BoxList<OtaUrl>>,
    /// Connection state for connection-status notices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<bool>,
}

/// One firmware image entry in an OTA command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtaUrl {
    /// Download location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<BoxStr>,
    /// Targeting tag; absent means the command is untargeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tg: Option<BoxStr>,
}

/// Status codes for device-command acknowledgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CommandAckStatus {
    Failed,
    Executed,
    ExecutedAck,
    Success,
}

impl CommandAckStatus {
    pub fn code(&self) -> u8 {
        match self {
            CommandAckStatus::Failed => 4,
            CommandAckStatus::Executed => 5,
            CommandAckStatus::ExecutedAck => 6,
            CommandAckStatus::Success => 7,
        }
    }
}

impl From<CommandAckStatus> for u8 {
    fn from(status: CommandAckStatus) -> u8 {
        status.code()
    }
}

impl TryFrom<u8> for CommandAckStatus {
    type Error = UnknownAckCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(CommandAckStatus::Failed),
            5 => Ok(CommandAckStatus::Executed),
            6 => Ok(CommandAckStatus::ExecutedAck),
            7 => Ok(CommandAckStatus::Success),
            other => Err(UnknownAckCode(other)),
        }
    }
}

/// Status codes for firmware (OTA) acknowledgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OtaAckStatus {
    Success,
    Failed,
    Downloading,
    DownloadComplete,
    DownloadFailed,
}

impl OtaAckStatus {
    pub fn code(&self) -> u8 {
        match self {
            OtaAckStatus::Success => 0,
            OtaAckStatus::Failed => 1,
            OtaAckStatus::Downloading => 2,
            OtaAckStatus::DownloadComplete => 3,
            OtaAckStatus::DownloadFailed => 4,
        }
    }
}

impl From<OtaAckStatus> for u8 {
    fn from(status: OtaAckStatus) -> u8 {
        status.code()
    }
}

impl TryFrom<u8> for OtaAckStatus {
    type Error = UnknownAckCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OtaAckStatus::Success),
            1 => Ok(OtaAckStatus::Failed),
            2 => Ok(OtaAckStatus::Downloading),
            3 => Ok(OtaAckStatus::DownloadComplete),
            4 => Ok(OtaAckStatus::DownloadFailed),
            other => Err(UnknownAckCode(other)),
        }
    }
}

/// Error for acknowledgment codes outside their closed sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAckCode(pub u8);

impl fmt::Display for UnknownAckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown acknowledgment code: {}", self.0)
    }
}

impl std::error::Error for UnknownAckCode {}

/// Acknowledgment of a device command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAck {
    /// Correlation id copied from the inbound command.
    pub ack_id: BoxStr,
    /// Execution status.
    pub st: CommandAckStatus,
    /// Human-readable status message.
    pub msg: BoxStr,
    /// Child device the ack is scoped to; absent for untargeted acks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_id: Option<DeviceUid>,
}

/// Acknowledgment of a firmware (OTA) command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaAck {
    /// Correlation id copied from the inbound command.
    pub ack_id: BoxStr,
    /// Update status.
    pub st: OtaAckStatus,
    /// Human-readable status message.
    pub msg: BoxStr,
    /// Child device the ack is scoped to; absent for untargeted acks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_id: Option<DeviceUid>,
}

/// Twin keys that are platform metadata, never propagated as device
/// property updates.
pub const RESERVED_TWIN_KEYS: [&str; 2] = ["version", "uniqueId"];

/// A twin (shadow) change notification.
///
/// `desired` without `reported` signals a cloud-originated change; the
/// presence of both marks an echo of the device's own prior report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwinMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported: Option<serde_json::Map<String, Value>>,
}
