use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value, json};

use super::Telemetry;

const ZONE_NAMES: [&str; 8] = [
    "kitchen",
    "living room",
    "bathroom",
    "bedroom",
    "garage",
    "",
    "",
    "",
];

/// Eight-zone lighting controller on Modbus.
pub struct LightingController;

impl Telemetry for LightingController {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let mut zones = Map::new();
        for (idx, name) in ZONE_NAMES.iter().enumerate() {
            let zone_id = format!("zone_id_{}", idx + 1);
            zones.insert(
                zone_id.clone(),
                json!({
                    "id": format!("Lighting-21-20002330_{zone_id}"),
                    "name": name,
                    "is_enabled": true,
                    "relay_value": *["on", "off"].choose(rng).unwrap(),
                    "schedule_active": rng.random_bool(0.5)
                }),
            );
        }

        json!({
            "lighting_modbus_device_info": {
                "version": 1.0,
                "model_id": "CONMOD1.0-ZG",
                "firmware_version": "2.1.3",
                "modbus_address": 21
            },
            "zone_id_def": zones
        })
    }
}
