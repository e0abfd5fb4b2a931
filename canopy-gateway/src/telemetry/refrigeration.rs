use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};

use super::{Telemetry, round1};

/// KE2 Therm refrigeration controller on Modbus.
pub struct Ke2Refrigeration;

impl Telemetry for Ke2Refrigeration {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let room_temp = rng.random_range(32.0..40.0);
        let coil_temp = rng.random_range(25.0..35.0);
        let setpoint = rng.random_range(35.0..38.0);

        json!({
            "ke2_modbus_device_info": {
                "firmware_version": "3.2.1",
                "model_id": "21263",
                "firmware_part_number": 21263.0,
                "modbus_address": 31
            },
            "controller_modbus_address": "31",
            "type_of_3rd_input": "temperature",
            "fan_mode_during_refrigeration_mode": "auto",
            "minimum_compressor_run_time": 5.0,
            "minimum_compressor_off_time": 3.0,
            "temperature_differential": 2.0,
            "defrost_time": 30.0,
            "digital_input_active_state_for_3rd_input": "high",
            "number_of_defrosts_per_day": 4.0,
            "type_of_defrost": "electric",
            "temperature_setpoint": round1(setpoint),
            "drain_time": 5.0,
            "high_and_low_alarm_delay": 10,
            "low_alarm_temperature_offset": 5.0,
            "high_alarm_temperature_offset": 5.0,
            "defrost_initiate_type": 1,
            "type_of_4th_input": "none",
            "digital_input_active_state_for_4th_input": "low",
            "second_room_temperature_set_point": round1(setpoint + 2.0),
            "start_time_of_defrost_1": 6.0,
            "start_time_of_defrost_2": 12.0,
            "start_time_of_defrost_3": 18.0,
            "start_time_of_defrost_4": 24.0,
            "start_time_of_defrost_5": 0.0,
            "start_time_of_defrost_6": 0.0,
            "start_time_of_defrost_7": 0.0,
            "start_time_of_defrost_8": 0.0,
            "start_time_of_defrost_9": 0.0,
            "start_time_of_defrost_10": 0.0,
            "start_time_of_defrost_11": 0.0,
            "start_time_of_defrost_12": 0,
            "time_of_day": round1(rng.random_range(0.0..24.0)),
            "extreme_differential": 1.0,
            "defrost_heater_mode": 1,
            "defrost_parameter": 1,
            "defrost_pump_down_time": 2.0,
            "fan_state_during_defrost": "off",
            "max_fan_delay_time": 10.0,
            "fan_delay_temperature": round1(room_temp - 5.0),
            "defrost_termination_temperature_setpoint": 45.0,
            "alarms": *["none", "high_temp", "low_temp"].choose(rng).unwrap(),
            "coil_temperature_1": round1(coil_temp),
            "coil_temperature_2": round1(coil_temp + rng.random_range(-2.0..2.0)),
            "current_temperature": round1(room_temp),
            "compressor_relay": *["on", "off"].choose(rng).unwrap(),
            "defrost_relay": "off",
            "fan_relay": *["on", "off"].choose(rng).unwrap(),
            "system_status": *["cooling", "idle", "defrost"].choose(rng).unwrap(),
            "high_alarm_offset": 5.0,
            "low_alarm_offset": 5.0,
            "minimum_comp_off_time": 3,
            "minimum_comp_run_time": 5,
            "room_temp": room_temp as i64,
            "coil_temp": coil_temp as i64,
            "temp_3_temp": rng.random_range(30.0..40.0) as i64,
            "temp_4_temp": rng.random_range(30.0..40.0) as i64
        })
    }
}
