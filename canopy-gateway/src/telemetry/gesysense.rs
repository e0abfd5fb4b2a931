use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};

use super::{Telemetry, round3};

/// gesySense wireless receiver unit.
pub struct GesysenseReceiver;

impl Telemetry for GesysenseReceiver {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, _rng: &mut R) -> Value {
        json!({
            "receiver": {
                "serial_number": "8.000.020.436",
                "label_id": "8000020436",
                "firmware_version": "1.07",
                "hardware_version": "0.02",
                "error_status": 0
            }
        })
    }
}

/// Registered temperature modules reporting through a gesySense receiver.
/// Each cycle reports one of the two simulated module units.
const MODULE_UNITS: [(&str, &str, &str); 2] = [
    ("19728 Cooler", "19728", "0.000.019.728"),
    ("Kitchen Fridge", "22602", "0.000.022.602"),
];

pub struct GesysenseTemperature;

impl Telemetry for GesysenseTemperature {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let base_temp = rng.random_range(40.0..45.0);
        let (_, label_id, serial_number) = MODULE_UNITS.choose(rng).unwrap();

        json!({
            "registered_temperature_modules": {
                "model_id": "P.W01101-2",
                "serial_number": serial_number,
                "label_id": label_id,
                "signal_quality": rng.random_range(80..=95),
                "transmission_quality": 100,
                "battery_status": 100,
                "temperature": round3(base_temp)
            }
        })
    }
}
