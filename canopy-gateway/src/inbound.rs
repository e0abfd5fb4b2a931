use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cloud::{CloudTransport, InboundMessage};
use crate::command::{CommandEffect, CommandProcessor};
use crate::state::GatewayState;
use crate::twin::TwinSynchronizer;

/// Consume inbound platform traffic and perform the resulting effects.
///
/// One loop serializes all inbound processing regardless of which transport
/// context delivered the message. Handler failures are logged and never
/// terminate the loop.
pub async fn run_inbound_dispatch<T: CloudTransport>(
    mut inbound: mpsc::Receiver<InboundMessage>,
    processor: CommandProcessor,
    twin: TwinSynchronizer,
    transport: &T,
    state: GatewayState,
    cancel: CancellationToken,
) {
    info!("inbound dispatch started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("inbound dispatch shutting down");
                break;
            }
            msg = inbound.recv() => {
                let Some(msg) = msg else {
                    info!("inbound channel closed");
                    break;
                };

                match msg {
                    InboundMessage::Control(control) => {
                        state.record_command().await;

                        for effect in processor.process(&control) {
                            match effect {
                                CommandEffect::SendCommandAck(ack) => {
                                    if let Err(e) = transport.send_command_ack(ack).await {
                                        error!(error = %e, "failed to send command ack");
                                    }
                                }
                                CommandEffect::SendOtaAck(ack) => {
                                    if let Err(e) = transport.send_ota_ack(ack).await {
                                        error!(error = %e, "failed to send firmware ack");
                                    }
                                }
                                CommandEffect::ConnectionStatus(connected) => {
                                    info!(connected, "platform connection status");
                                    state.set_cloud_connected(connected).await;
                                }
                            }
                        }
                    }
                    InboundMessage::Twin(twin_msg) => {
                        let updates = twin.apply_update(&twin_msg);
                        state.record_twin_updates(updates.len() as u64).await;

                        for (key, value) in updates {
                            if let Err(e) = transport.report_property(&key, value).await {
                                error!(error = %e, key, "failed to report twin property");
                            }
                        }
                    }
                }
            }
        }
    }
}
