//! Telemetry synthesis for every supported device profile.
//!
//! Each profile produces a fixed attribute tree: key shape never varies,
//! numeric fields stay inside their documented bands and enumerated fields
//! draw from fixed choice sets. That shape is the contract with the
//! platform, so generators are covered by exhaustive key/bounds tests.

mod energy;
mod gateway;
mod gesysense;
mod lighting;
mod refrigeration;
mod thermostat;
mod zigbee;

pub use energy::WattNode;
pub use gateway::GatewayHeartbeat;
pub use gesysense::{GesysenseReceiver, GesysenseTemperature};
pub use lighting::LightingController;
pub use refrigeration::Ke2Refrigeration;
pub use thermostat::{Pct504e, Tbh300};
pub use zigbee::ZigbeeTemperature;

use canopy_core::DeviceType;
use rand::Rng;
use serde_json::Value;

/// One telemetry generator.
///
/// `now` is the cycle timestamp, so embedded timestamp fields agree with the
/// batch time; the random source is explicit so tests can pin sequences.
pub trait Telemetry {
    fn generate<R: Rng>(&self, now: jiff::Timestamp, rng: &mut R) -> Value;
}

/// Every (device type, model) pair with a registered generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProfile {
    Pct504e,
    Tbh300,
    ZigbeeTemperature,
    GesysenseReceiver,
    GesysenseTemperature,
    WattNode,
    Ke2Refrigeration,
    LightingController,
}

impl DeviceProfile {
    /// Resolve the generator for a registry entry.
    ///
    /// Thermostat and gesySense profiles are model-specific; the remaining
    /// types accept any model string.
    pub fn resolve(device_type: DeviceType, model: &str) -> Option<Self> {
        match device_type {
            DeviceType::Thermostat => match model {
                "PCT504-E" => Some(DeviceProfile::Pct504e),
                "TBH300" => Some(DeviceProfile::Tbh300),
                _ => None,
            },
            DeviceType::Gesysense => match model {
                "P.W01211" => Some(DeviceProfile::GesysenseReceiver),
                "P.W01101-2" => Some(DeviceProfile::GesysenseTemperature),
                _ => None,
            },
            DeviceType::TemperatureZigbee => Some(DeviceProfile::ZigbeeTemperature),
            DeviceType::Energy => Some(DeviceProfile::WattNode),
            DeviceType::Refrigeration => Some(DeviceProfile::Ke2Refrigeration),
            DeviceType::Lighting => Some(DeviceProfile::LightingController),
        }
    }

    pub fn generate<R: Rng>(&self, now: jiff::Timestamp, rng: &mut R) -> Value {
        match self {
            DeviceProfile::Pct504e => Pct504e.generate(now, rng),
            DeviceProfile::Tbh300 => Tbh300.generate(now, rng),
            DeviceProfile::ZigbeeTemperature => ZigbeeTemperature.generate(now, rng),
            DeviceProfile::GesysenseReceiver => GesysenseReceiver.generate(now, rng),
            DeviceProfile::GesysenseTemperature => GesysenseTemperature.generate(now, rng),
            DeviceProfile::WattNode => WattNode.generate(now, rng),
            DeviceProfile::Ke2Refrigeration => Ke2Refrigeration.generate(now, rng),
            DeviceProfile::LightingController => LightingController.generate(now, rng),
        }
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
