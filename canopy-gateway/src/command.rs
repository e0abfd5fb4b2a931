use std::sync::Arc;

use canopy_core::{
    CommandAck, CommandAckStatus, CommandKind, ControlMessage, DeviceUid, OtaAck, OtaAckStatus,
};
use tracing::{debug, warn};

use crate::registry::DeviceRegistry;

/// Actions the dispatch loop must perform for one inbound control message.
#[derive(Debug, Clone)]
pub enum CommandEffect {
    SendCommandAck(CommandAck),
    SendOtaAck(OtaAck),
    /// Platform connection state changed (true = connected).
    ConnectionStatus(bool),
}

/// Interprets inbound control messages and decides the acknowledgments to
/// emit. Stateless across invocations: each message is handled on its own,
/// and malformed input never escapes as an error.
pub struct CommandProcessor {
    registry: Arc<DeviceRegistry>,
}

impl CommandProcessor {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }

    pub fn process(&self, msg: &ControlMessage) -> Vec<CommandEffect> {
        let Some(ct) = msg.ct else {
            warn!("control message without ct field, ignoring");
            return Vec::new();
        };

        let kind = match CommandKind::try_from(ct) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(%e, "ignoring control message");
                return Vec::new();
            }
        };

        match kind {
            CommandKind::Device => self.device_command(msg),
            CommandKind::Firmware => self.firmware_command(msg),
            CommandKind::ConnectionStatus => {
                let connected = msg.command.unwrap_or_else(|| {
                    warn!("connection status notice without command flag, assuming disconnected");
                    false
                });
                vec![CommandEffect::ConnectionStatus(connected)]
            }
        }
    }

    /// `ct = 0`: acknowledge with success, scoped to the target device when
    /// the command names one. No correlation id means no ack is expected.
    fn device_command(&self, msg: &ControlMessage) -> Vec<CommandEffect> {
        let Some(ack_id) = non_empty(&msg.ack) else {
            debug!("device command without ack id, nothing to acknowledge");
            return Vec::new();
        };

        let ack = CommandAck {
            ack_id: ack_id.into(),
            st: CommandAckStatus::Success,
            msg: "successful".into(),
            child_id: msg.id.as_ref().map(|id| DeviceUid(id.clone())),
        };

        vec![CommandEffect::SendCommandAck(ack)]
    }

    /// `ct = 1`: one OTA success ack per registry device matching each
    /// tagged url entry; untagged entries get a single untargeted ack. The
    /// correlation id is shared across every ack of the broadcast.
    fn firmware_command(&self, msg: &ControlMessage) -> Vec<CommandEffect> {
        let Some(ack_id) = non_empty(&msg.ack) else {
            warn!("firmware command without ack id, ignoring");
            return Vec::new();
        };

        let Some(urls) = msg.urls.as_ref().filter(|urls| !urls.is_empty()) else {
            warn!("firmware command without urls, ignoring");
            return Vec::new();
        };

        let mut effects = Vec::new();
        for url in urls.iter() {
            match url.tg.as_deref() {
                Some(tag) => {
                    let mut matched = 0usize;
                    for device in self.registry.devices_with_tag(tag) {
                        debug!(device_id = %device.unique_id, tag, "acknowledging firmware command");
                        effects.push(CommandEffect::SendOtaAck(OtaAck {
                            ack_id: ack_id.into(),
                            st: OtaAckStatus::Success,
                            msg: "successful".into(),
                            child_id: Some(device.unique_id.clone()),
                        }));
                        matched += 1;
                    }
                    if matched == 0 {
                        warn!(tag, "firmware command tag matched no devices");
                    }
                }
                None => {
                    effects.push(CommandEffect::SendOtaAck(OtaAck {
                        ack_id: ack_id.into(),
                        st: OtaAckStatus::Success,
                        msg: "successful".into(),
                        child_id: None,
                    }));
                }
            }
        }

        effects
    }
}

fn non_empty(value: &Option<Box<str>>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
