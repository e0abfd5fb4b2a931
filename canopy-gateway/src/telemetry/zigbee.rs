use rand::Rng;
use serde_json::{Value, json};

use super::{Telemetry, round1};

/// Battery-powered ZigBee temperature sensor.
pub struct ZigbeeTemperature;

impl Telemetry for ZigbeeTemperature {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        json!({
            "link_quality": rng.random_range(85..=100),
            "battery_percentage_remaining": rng.random_range(90..=100),
            "battery_voltage": round1(rng.random_range(9.5..11.0)),
            "measure_temperature_value": round1(rng.random_range(68.0..80.0))
        })
    }
}
