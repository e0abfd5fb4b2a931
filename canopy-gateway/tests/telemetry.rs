use canopy_gateway::telemetry::DeviceProfile;
use canopy_gateway::telemetry::{GatewayHeartbeat, Telemetry};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

const SAMPLES: usize = 1000;

fn object_keys(value: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    keys
}

fn assert_keys(value: &Value, mut expected: Vec<&str>) {
    expected.sort_unstable();
    assert_eq!(object_keys(value), expected);
}

fn number_at(value: &Value, pointer: &str) -> f64 {
    value
        .pointer(pointer)
        .unwrap_or_else(|| panic!("missing field {pointer}"))
        .as_f64()
        .unwrap_or_else(|| panic!("field {pointer} is not numeric"))
}

fn string_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value
        .pointer(pointer)
        .unwrap_or_else(|| panic!("missing field {pointer}"))
        .as_str()
        .unwrap_or_else(|| panic!("field {pointer} is not a string"))
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    (min..=max).contains(&value)
}

#[test]
fn gateway_heartbeat_shape() {
    let mut rng = StdRng::seed_from_u64(1);
    let now: jiff::Timestamp = "2025-01-15T08:30:00.000Z".parse().unwrap();

    let data = GatewayHeartbeat.generate(now, &mut rng);
    assert_keys(&data, vec!["hb", "zigbee_network"]);

    let hb = &data["hb"];
    assert_keys(
        hb,
        vec![
            "net_address_ip_v4",
            "net_address_ip_v6",
            "hostname",
            "gateway_version",
            "ota_version",
            "configured",
            "fixed_id",
            "serial_id",
            "mac_address",
            "download_config_success",
            "download_firmware_success",
            "ota_success",
            "reason",
            "ota_firmware_timestamp",
            "gateway_firmware_timestamp",
            "gateway_start_timestamp",
            "gateway_stop_timestamp",
            "config_file_timestamp",
            "gateway_reboot_success",
        ],
    );

    // Embedded timestamps agree with the cycle time.
    assert_eq!(
        string_at(&data, "/hb/gateway_firmware_timestamp"),
        "2025-01-15T08:30:00.000Z"
    );
    assert_eq!(
        string_at(&data, "/hb/config_file_timestamp"),
        "2025-01-15T08:30:00.000Z"
    );

    assert_keys(
        &data["zigbee_network"],
        vec!["channel", "extended_pan_id", "pan_id"],
    );
}

#[test]
fn pct504e_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(2);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::Pct504e.generate(now, &mut rng);

        assert_keys(
            &data,
            vec![
                "genBasic",
                "hvacFanCtrl",
                "hvacThermostat",
                "occupied_heating_setphvacUserInterfaceCfgoint",
                "linkquality",
                "relative_humidity",
                "msOccupancySensing",
                "schedule_active",
            ],
        );
        assert_keys(&data["hvacFanCtrl"], vec!["fanMode", "fanModeSequence"]);
        assert_keys(
            &data["relative_humidity"],
            vec!["maxMeasuredValue", "measuredValue", "minMeasuredValue"],
        );
        assert_keys(
            &data["msOccupancySensing"],
            vec!["occupancy", "occupancySensorType", "pirOToUDelay"],
        );

        assert!(in_range(
            number_at(&data, "/hvacThermostat/localTemperature"),
            72.0,
            78.0
        ));
        assert!(in_range(
            number_at(&data, "/relative_humidity/measuredValue"),
            25.0,
            45.0
        ));
        assert!(in_range(number_at(&data, "/linkquality"), 150.0, 255.0));

        let fan_mode = string_at(&data, "/hvacFanCtrl/fanMode");
        assert!(["auto", "on"].contains(&fan_mode));

        let system_mode = string_at(&data, "/hvacThermostat/systemMode");
        assert!(["cool", "heat", "auto", "off"].contains(&system_mode));
    }
}

#[test]
fn tbh300_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::Tbh300.generate(now, &mut rng);

        assert_keys(
            &data,
            vec![
                "genBasic",
                "hvacFanCtrl",
                "hvacThermostat",
                "occupied_heating_setphvacUserInterfaceCfgoint",
                "linkquality",
                "relative_humidity",
                "msOccupancySensing",
                "schedule_active",
                "manuSpecificUniversalElectronics",
                "manuSpecific_remote_temperature_sensor",
            ],
        );
        assert_keys(
            &data["manuSpecific_remote_temperature_sensor"],
            vec!["remTempSensor1", "remTempSensor2", "remTempSensor3"],
        );

        let local_temp = number_at(&data, "/hvacThermostat/localTemperature");
        assert!(in_range(local_temp, 75.0, 82.0));

        // The manufacturer block reports the same measured temperature.
        assert_eq!(
            local_temp,
            number_at(&data, "/manuSpecificUniversalElectronics/temperature")
        );

        assert!(in_range(
            number_at(&data, "/relative_humidity/measuredValue"),
            25.0,
            40.0
        ));
        assert!(in_range(number_at(&data, "/linkquality"), 150.0, 200.0));
    }
}

#[test]
fn zigbee_temperature_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(4);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::ZigbeeTemperature.generate(now, &mut rng);

        assert_keys(
            &data,
            vec![
                "link_quality",
                "battery_percentage_remaining",
                "battery_voltage",
                "measure_temperature_value",
            ],
        );

        assert!(in_range(number_at(&data, "/link_quality"), 85.0, 100.0));
        assert!(in_range(
            number_at(&data, "/battery_percentage_remaining"),
            90.0,
            100.0
        ));
        assert!(in_range(number_at(&data, "/battery_voltage"), 9.5, 11.0));
        assert!(in_range(
            number_at(&data, "/measure_temperature_value"),
            68.0,
            80.0
        ));
    }
}

#[test]
fn gesysense_receiver_shape() {
    let mut rng = StdRng::seed_from_u64(5);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::GesysenseReceiver.generate(now, &mut rng);
        assert_keys(&data, vec!["receiver"]);
        assert_keys(
            &data["receiver"],
            vec![
                "serial_number",
                "label_id",
                "firmware_version",
                "hardware_version",
                "error_status",
            ],
        );
        assert_eq!(number_at(&data, "/receiver/error_status"), 0.0);
    }
}

#[test]
fn gesysense_temperature_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(6);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::GesysenseTemperature.generate(now, &mut rng);

        assert_keys(&data, vec!["registered_temperature_modules"]);
        let module = &data["registered_temperature_modules"];
        assert_keys(
            module,
            vec![
                "model_id",
                "serial_number",
                "label_id",
                "signal_quality",
                "transmission_quality",
                "battery_status",
                "temperature",
            ],
        );

        assert!(in_range(number_at(module, "/temperature"), 40.0, 45.0));
        assert!(in_range(number_at(module, "/signal_quality"), 80.0, 95.0));

        // Label and serial belong to the same simulated unit.
        match string_at(module, "/label_id") {
            "19728" => assert_eq!(string_at(module, "/serial_number"), "0.000.019.728"),
            "22602" => assert_eq!(string_at(module, "/serial_number"), "0.000.022.602"),
            other => panic!("unexpected label_id {other}"),
        }
    }
}

#[test]
fn wattnode_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::WattNode.generate(now, &mut rng);

        assert_keys(
            &data,
            vec![
                "wattnode_modbus_device_info",
                "total_energy_sum",
                "power_sum",
                "ct_amps",
                "ct_amps_a",
                "ct_amps_b",
                "ct_amps_c",
                "ct_directions",
                "phase_adjust_a",
                "phase_adjust_b",
                "phase_adjust_c",
                "zero_energy",
                "real_power_a",
                "real_power_b",
                "real_power_c",
                "voltage_a",
                "voltage_b",
                "voltage_c",
                "voltage_avg",
            ],
        );

        assert!(in_range(number_at(&data, "/power_sum"), 5000.0, 15000.0));
        assert!(in_range(number_at(&data, "/total_energy_sum"), 1000.0, 5000.0));
        assert!(in_range(number_at(&data, "/voltage_avg"), 208.0, 240.0));
        for phase in ["a", "b", "c"] {
            assert!(in_range(
                number_at(&data, &format!("/ct_amps_{phase}")),
                100.0,
                150.0
            ));
            // Per-phase voltage jitters ±5 V around the base.
            assert!(in_range(
                number_at(&data, &format!("/voltage_{phase}")),
                203.0,
                245.0
            ));
        }
    }
}

#[test]
fn refrigeration_shape_and_bounds() {
    let mut rng = StdRng::seed_from_u64(8);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::Ke2Refrigeration.generate(now, &mut rng);

        let object = data.as_object().unwrap();
        assert!(object.contains_key("ke2_modbus_device_info"));
        assert_eq!(object.len(), 57);

        assert!(in_range(
            number_at(&data, "/temperature_setpoint"),
            35.0,
            38.0
        ));
        assert!(in_range(
            number_at(&data, "/current_temperature"),
            32.0,
            40.0
        ));
        assert!(in_range(number_at(&data, "/coil_temperature_1"), 25.0, 35.0));
        assert!(in_range(number_at(&data, "/time_of_day"), 0.0, 24.0));

        let status = string_at(&data, "/system_status");
        assert!(["cooling", "idle", "defrost"].contains(&status));

        let alarms = string_at(&data, "/alarms");
        assert!(["none", "high_temp", "low_temp"].contains(&alarms));
    }
}

#[test]
fn lighting_shape() {
    let mut rng = StdRng::seed_from_u64(9);
    let now = jiff::Timestamp::now();

    for _ in 0..SAMPLES {
        let data = DeviceProfile::LightingController.generate(now, &mut rng);

        assert_keys(&data, vec!["lighting_modbus_device_info", "zone_id_def"]);

        let zones = data["zone_id_def"].as_object().unwrap();
        assert_eq!(zones.len(), 8);

        for i in 1..=8 {
            let zone = &zones[&format!("zone_id_{i}")];
            assert_keys(
                zone,
                vec!["id", "name", "is_enabled", "relay_value", "schedule_active"],
            );
            let relay = string_at(zone, "/relay_value");
            assert!(["on", "off"].contains(&relay));
        }

        assert_eq!(string_at(&data, "/zone_id_def/zone_id_1/name"), "kitchen");
        assert_eq!(string_at(&data, "/zone_id_def/zone_id_6/name"), "");
    }
}

#[test]
fn same_seed_generates_identical_values() {
    let now: jiff::Timestamp = "2025-01-15T08:30:00.000Z".parse().unwrap();

    let mut a = StdRng::seed_from_u64(42);
    let mut b = StdRng::seed_from_u64(42);

    let first = DeviceProfile::Pct504e.generate(now, &mut a);
    let second = DeviceProfile::Pct504e.generate(now, &mut b);

    assert_eq!(first, second);
}
