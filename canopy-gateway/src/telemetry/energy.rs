use rand::Rng;
use serde_json::{Value, json};

use super::{Telemetry, round1, round2};

/// WattNode three-phase energy meter on Modbus.
pub struct WattNode;

impl Telemetry for WattNode {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let base_voltage = rng.random_range(208.0..240.0);
        let total_power = rng.random_range(5000.0..15000.0);

        json!({
            "wattnode_modbus_device_info": {
                "firmware_version": "1.23",
                "model_id": "WNC-3Y-208-MB",
                "serial_number": "WN2024001234",
                "modbus_address": 50
            },
            "total_energy_sum": round2(rng.random_range(1000.0..5000.0)),
            "power_sum": round1(total_power),
            "ct_amps": rng.random_range(100..=400),
            "ct_amps_a": rng.random_range(100..=150),
            "ct_amps_b": rng.random_range(100..=150),
            "ct_amps_c": rng.random_range(100..=150),
            "ct_directions": "all normal",
            "phase_adjust_a": 0,
            "phase_adjust_b": 120,
            "phase_adjust_c": 240,
            "zero_energy": 0,
            "real_power_a": round1(total_power * 0.33),
            "real_power_b": round1(total_power * 0.33),
            "real_power_c": round1(total_power * 0.34),
            "voltage_a": round1(base_voltage + rng.random_range(-5.0..5.0)),
            "voltage_b": round1(base_voltage + rng.random_range(-5.0..5.0)),
            "voltage_c": round1(base_voltage + rng.random_range(-5.0..5.0)),
            "voltage_avg": round1(base_voltage)
        })
    }
}
