use std::sync::Arc;
use std::time::Duration;

use canopy_core::{ControlMessage, DeviceUid, TwinMessage};
use canopy_gateway::{
    CloudTransport, CommandEffect, CommandProcessor, DeviceRegistry, GatewayState, InboundMessage,
    MockCloud, TwinSynchronizer, default_fleet, run_inbound_dispatch,
};
use tokio_util::sync::CancellationToken;

fn processor() -> CommandProcessor {
    let registry = Arc::new(DeviceRegistry::new(DeviceUid::from("GW-1"), default_fleet()));
    CommandProcessor::new(registry)
}

fn control(json: serde_json::Value) -> ControlMessage {
    serde_json::from_value(json).unwrap()
}

#[test]
fn device_command_with_target_acks_that_device() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 0, "ack": "A1", "id": "D1"
    })));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        CommandEffect::SendCommandAck(ack) => {
            assert_eq!(&*ack.ack_id, "A1");
            assert_eq!(ack.st.code(), 7);
            assert_eq!(ack.child_id.as_ref().map(|id| id.as_str()), Some("D1"));
        }
        other => panic!("unexpected effect: {other:?}"),
    }
}

#[test]
fn device_command_without_target_acks_untargeted() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 0, "ack": "A1"
    })));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        CommandEffect::SendCommandAck(ack) => {
            assert_eq!(ack.st.code(), 7);
            assert!(ack.child_id.is_none());
        }
        other => panic!("unexpected effect: {other:?}"),
    }
}

#[test]
fn device_command_without_ack_id_is_silent() {
    let effects = processor().process(&control(serde_json::json!({"ct": 0, "id": "D1"})));
    assert!(effects.is_empty());

    // An empty correlation id counts as absent.
    let effects = processor().process(&control(serde_json::json!({
        "ct": 0, "ack": "", "id": "D1"
    })));
    assert!(effects.is_empty());
}

#[test]
fn firmware_command_acks_every_tagged_device() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 1, "ack": "A1", "urls": [{"url": "https://fw.example/img", "tg": "thermostat"}]
    })));

    // Default fleet has eleven thermostats; one ack each, same correlation
    // id, distinct child ids.
    assert_eq!(effects.len(), 11);

    let mut child_ids = Vec::new();
    for effect in &effects {
        match effect {
            CommandEffect::SendOtaAck(ack) => {
                assert_eq!(&*ack.ack_id, "A1");
                assert_eq!(ack.st.code(), 0);
                child_ids.push(ack.child_id.clone().unwrap());
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }
    child_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    child_ids.dedup();
    assert_eq!(child_ids.len(), 11);
}

#[test]
fn firmware_command_without_tag_acks_untargeted_once() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 1, "ack": "A1", "urls": [{"url": "https://fw.example/img"}]
    })));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        CommandEffect::SendOtaAck(ack) => assert!(ack.child_id.is_none()),
        other => panic!("unexpected effect: {other:?}"),
    }
}

#[test]
fn firmware_command_with_unmatched_tag_acks_nothing() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 1, "ack": "A1", "urls": [{"tg": "elevator"}]
    })));
    assert!(effects.is_empty());
}

#[test]
fn connection_status_is_observational() {
    let effects = processor().process(&control(serde_json::json!({
        "ct": 116, "command": true
    })));

    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], CommandEffect::ConnectionStatus(true)));

    let effects = processor().process(&control(serde_json::json!({
        "ct": 116, "command": false
    })));
    assert!(matches!(effects[0], CommandEffect::ConnectionStatus(false)));
}

#[test]
fn malformed_control_messages_are_ignored() {
    // Unknown family code.
    assert!(processor()
        .process(&control(serde_json::json!({"ct": 42, "ack": "A1"})))
        .is_empty());

    // Missing ct entirely.
    assert!(processor()
        .process(&control(serde_json::json!({"ack": "A1"})))
        .is_empty());

    // Firmware command with no urls.
    assert!(processor()
        .process(&control(serde_json::json!({"ct": 1, "ack": "A1"})))
        .is_empty());
}

#[test]
fn twin_update_skips_reserved_keys() {
    let msg: TwinMessage = serde_json::from_value(serde_json::json!({
        "desired": {"foo": 1, "version": 2, "uniqueId": "x"}
    }))
    .unwrap();

    let updates = TwinSynchronizer.apply_update(&msg);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "foo");
    assert_eq!(updates[0].1, serde_json::json!(1));
}

#[test]
fn twin_echo_is_suppressed() {
    let msg: TwinMessage = serde_json::from_value(serde_json::json!({
        "desired": {"foo": 1},
        "reported": {"foo": 0}
    }))
    .unwrap();

    assert!(TwinSynchronizer.apply_update(&msg).is_empty());
}

#[test]
fn twin_without_desired_is_ignored() {
    let msg: TwinMessage = serde_json::from_value(serde_json::json!({
        "reported": {"foo": 0}
    }))
    .unwrap();
    assert!(TwinSynchronizer.apply_update(&msg).is_empty());

    let msg = TwinMessage::default();
    assert!(TwinSynchronizer.apply_update(&msg).is_empty());
}

/// Poll until `predicate` holds or the timeout elapses.
async fn wait_for<F, Fut>(mut predicate: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if predicate().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn dispatch_loop_routes_and_acknowledges() {
    let registry = Arc::new(DeviceRegistry::new(DeviceUid::from("GW-1"), default_fleet()));
    let transport = MockCloud::new();
    let state = GatewayState::new();
    let cancel = CancellationToken::new();

    let inbound_rx = transport.start(cancel.clone()).await.unwrap();

    let handle = {
        let transport_for_dispatch = transport.clone();
        let processor = CommandProcessor::new(Arc::clone(&registry));
        let state = state.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_inbound_dispatch(
                inbound_rx,
                processor,
                TwinSynchronizer,
                &transport_for_dispatch,
                state,
                cancel,
            )
            .await;
        })
    };

    transport
        .inject(InboundMessage::Control(control(serde_json::json!({
            "ct": 0, "ack": "A1", "id": "D1"
        }))))
        .await;
    transport
        .inject(InboundMessage::Twin(
            serde_json::from_value(serde_json::json!({
                "desired": {"setpoint": 71.5, "version": 3}
            }))
            .unwrap(),
        ))
        .await;
    transport
        .inject(InboundMessage::Control(control(serde_json::json!({
            "ct": 116, "command": true
        }))))
        .await;

    wait_for(|| {
        let transport = transport.clone();
        async move { !transport.twin_reports().await.is_empty() }
    })
    .await;
    wait_for(|| {
        let state = state.clone();
        async move { state.cloud_connected().await }
    })
    .await;

    let acks = transport.command_acks().await;
    assert_eq!(acks.len(), 1);
    assert_eq!(acks[0].child_id.as_ref().unwrap().as_str(), "D1");

    let reports = transport.twin_reports().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "setpoint");
    assert_eq!(reports[0].1, serde_json::json!(71.5));

    cancel.cancel();
    handle.await.unwrap();
}
