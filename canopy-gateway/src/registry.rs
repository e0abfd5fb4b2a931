use canopy_core::{DeviceDescriptor, DeviceType, DeviceUid};

/// Read-only catalog of the devices behind this gateway.
///
/// The fleet is fixed at startup; iteration order is construction order and
/// stays stable across telemetry cycles, so batch ordering is deterministic
/// for a given registry.
pub struct DeviceRegistry {
    gateway_id: DeviceUid,
    devices: Box<[DeviceDescriptor]>,
}

impl DeviceRegistry {
    pub fn new(gateway_id: DeviceUid, devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            gateway_id,
            devices: devices.into_boxed_slice(),
        }
    }

    pub fn gateway_id(&self) -> &DeviceUid {
        &self.gateway_id
    }

    /// All child devices, in registration order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.iter()
    }

    /// Child devices whose firmware targeting tag matches `tag`.
    pub fn devices_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a DeviceDescriptor> {
        self.devices.iter().filter(move |d| d.device_type.tag() == tag)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

fn descriptor(unique_id: &str, name: &str, model: &str, device_type: DeviceType) -> DeviceDescriptor {
    DeviceDescriptor {
        unique_id: DeviceUid::from(unique_id),
        device_type,
        model: model.into(),
        name: name.into(),
    }
}

/// The built-in simulated fleet: ten PCT504-E thermostats, ten ZigBee
/// temperature sensors, one TBH300 thermostat, a gesySense receiver, an
/// energy meter, a refrigeration controller and a lighting controller.
pub fn default_fleet() -> Vec<DeviceDescriptor> {
    use DeviceType::*;

    vec![
        descriptor("Thermostat-504112112200301", "Stat-1", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112112200204", "Stat-2", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130096", "Stat-3", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130105", "Stat-4", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130456", "Stat-5", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130127", "Stat-6", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130232", "Stat-7", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130372", "Stat-8", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130017", "Stat-9", "PCT504-E", Thermostat),
        descriptor("Thermostat-504112302130369", "Stat-10", "PCT504-E", Thermostat),
        descriptor("Temperature-ZigBee-317M12303210501", "ZigBee-1", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210685", "ZigBee-2", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210764", "ZigBee-3", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210702", "ZigBee-4", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210597", "ZigBee-5", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210419", "Zigbee-6", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210749", "Zigbee-7", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12211280468", "Zigbee-8", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210548", "Zigbee-9", "", TemperatureZigbee),
        descriptor("Temperature-ZigBee-317M12303210380", "Zigbee-10", "", TemperatureZigbee),
        descriptor("ENG-300-707-003", "UEI", "TBH300", Thermostat),
        descriptor("8000020280", "gesysense-receiver", "P.W01211", Gesysense),
        descriptor("ENG-300-707-004", "WattNode", "WNC-3Y-208-MB", Energy),
        descriptor("ENG-300-707-001", "Ke2", "21263", Refrigeration),
        descriptor("ENG-300-707-005-20001448", "LightingController", "CONMOD1.0-ZG", Lighting),
    ]
}
