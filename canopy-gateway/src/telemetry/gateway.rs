use canopy_core::cycle_timestamp;
use rand::Rng;
use serde_json::{Value, json};

use super::Telemetry;

/// Heartbeat and network status for the gateway device itself.
pub struct GatewayHeartbeat;

impl Telemetry for GatewayHeartbeat {
    fn generate<R: Rng>(&self, now: jiff::Timestamp, _rng: &mut R) -> Value {
        let stamp = cycle_timestamp(now);

        json!({
            "hb": {
                "net_address_ip_v4": "192.168.68.123",
                "net_address_ip_v6": "fe80::3868:668e:93b4:9c1f",
                "hostname": "raspberrypi",
                "gateway_version": "3.2.40",
                "ota_version": "3.2.13",
                "configured": true,
                "fixed_id": "2941008C7954",
                "serial_id": "20002330",
                "mac_address": "b8:27:eb:3f:f0:11",
                "download_config_success": true,
                "download_firmware_success": true,
                "ota_success": true,
                "reason": "periodic",
                "ota_firmware_timestamp": "2024-09-06T15:57:02.070944Z",
                "gateway_firmware_timestamp": &*stamp,
                "gateway_start_timestamp": &*stamp,
                "gateway_stop_timestamp": "",
                "config_file_timestamp": &*stamp,
                "gateway_reboot_success": true
            },
            "zigbee_network": {
                "channel": 11,
                "extended_pan_id": "0x00124b0024cbee5f",
                "pan_id": 55363
            }
        })
    }
}
