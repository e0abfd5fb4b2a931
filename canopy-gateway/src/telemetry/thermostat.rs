use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};

use super::{Telemetry, round1, round2};

/// OWON PCT504-E zone thermostat.
pub struct Pct504e;

impl Telemetry for Pct504e {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let base_temp = rng.random_range(72.0..78.0);

        json!({
            "genBasic": {
                "appVersion": 1,
                "dateCode": "20200513",
                "hwVersion": 4,
                "manufacturerName": "OWON Technology Inc.",
                "modelId": "PCT504-E",
                "powerSource_primary": "dc source",
                "powerSource_secondary": false,
                "stackVersion": 0,
                "zclVersion": 3
            },
            "hvacFanCtrl": {
                "fanMode": *["auto", "on"].choose(rng).unwrap(),
                "fanModeSequence": "low/med/high/auto"
            },
            "hvacThermostat": {
                "absMaxCoolSetpointLimit": 95.0,
                "absMaxHeatSetpointLimit": 86.0,
                "absMinCoolSetpointLimit": 44.6,
                "absMinHeatSetpointLimit": 41.0,
                "controlSequenceOfOperation": "cooling with heating 4-pipes",
                "localTemperature": round1(base_temp),
                "maxCoolSetpointLimit": 95.0,
                "maxHeatSetpointLimit": 86.0,
                "minCoolSetpointLimit": 44.6,
                "minHeatSetpointLimit": 41.0,
                "minSetpointDeadBand": 2.7,
                "occupancy": rng.random_bool(0.5),
                "occupiedCoolingSetpoint": 69.8,
                "occupiedHeatingSetpoint": 62.6,
                "runningMode": *["cool", "heat", "auto"].choose(rng).unwrap(),
                "runningState_cool2ndStageStateOn": false,
                "runningState_coolStateOn": rng.random_bool(0.5),
                "runningState_fan2ndStageStateOn": false,
                "runningState_fan3rdStageStateOn": rng.random_bool(0.5),
                "runningState_fanStateOn": false,
                "runningState_heat2ndStageStateOn": false,
                "runningState_heatStateOn": false,
                "systemMode": *["cool", "heat", "auto", "off"].choose(rng).unwrap(),
                "unoccupiedCoolingSetpoint": 69.8,
                "unoccupiedHeatingSetpoint": 62.6,
                "programingOperMode_auto_recovery_mode": "off",
                "programingOperMode_economy_energy_star_mode": "off",
                "programingOperMode_mode": "simple/setpoint mode",
                "systemTypeConfig_coolingSystemStage": "cool stage 1",
                "systemTypeConfig_heatingFuelSource": "electric / B",
                "systemTypeConfig_heatingSystemStage": "heat stage 1",
                "systemTypeConfig_heatingSystemType": "conventional"
            },
            "occupied_heating_setphvacUserInterfaceCfgoint": {
                "keypadLockout": "no lockout",
                "tempDisplayMode": *[
                    "temperature in Celsius",
                    "temperature in Fahrenheit"
                ].choose(rng).unwrap()
            },
            "linkquality": rng.random_range(150..=255),
            "relative_humidity": {
                "maxMeasuredValue": 100.0,
                "measuredValue": round1(rng.random_range(25.0..45.0)),
                "minMeasuredValue": 0.0
            },
            "msOccupancySensing": {
                "occupancy": rng.random_bool(0.5),
                "occupancySensorType": "ultrasonic",
                "pirOToUDelay": 60
            },
            "schedule_active": false
        })
    }
}

/// Universal Electronics TBH300 thermostat with remote sensors.
pub struct Tbh300;

impl Telemetry for Tbh300 {
    fn generate<R: Rng>(&self, _now: jiff::Timestamp, rng: &mut R) -> Value {
        let base_temp = rng.random_range(75.0..82.0);

        json!({
            "genBasic": {
                "appVersion": 10,
                "dateCode": "20210915-DE-FB1",
                "hwVersion": 0,
                "manufacturerName": "Universal Electronics Inc.",
                "modelId": "TBH300",
                "powerSource_primary": "mains (single phase)",
                "powerSource_secondary": false,
                "stackVersion": 0,
                "zclVersion": 8
            },
            "hvacFanCtrl": {
                "fanMode": *["on", "auto"].choose(rng).unwrap(),
                "fanModeSequence": "on/auto"
            },
            "hvacThermostat": {
                "absMaxCoolSetpointLimit": 112.01,
                "absMaxHeatSetpointLimit": 97.02,
                "absMinCoolSetpointLimit": 44.98,
                "absMinHeatSetpointLimit": 29.98,
                "controlSequenceOfOperation": "cooling with heating 4-pipes",
                "localTemperature": round1(base_temp),
                "maxCoolSetpointLimit": 93.0,
                "maxHeatSetpointLimit": 90.05,
                "minCoolSetpointLimit": 60.01,
                "minHeatSetpointLimit": 55.96,
                "minSetpointDeadBand": 3.6,
                "occupancy": rng.random_bool(0.5),
                "occupiedCoolingSetpoint": 71.01,
                "occupiedHeatingSetpoint": 68.0,
                "runningMode": *["cool", "heat", "auto"].choose(rng).unwrap(),
                "runningState_cool2ndStageStateOn": rng.random_bool(0.5),
                "runningState_coolStateOn": rng.random_bool(0.5),
                "runningState_fan2ndStageStateOn": false,
                "runningState_fan3rdStageStateOn": false,
                "runningState_fanStateOn": rng.random_bool(0.5),
                "runningState_heat2ndStageStateOn": false,
                "runningState_heatStateOn": false,
                "systemMode": *["auto", "cool", "heat"].choose(rng).unwrap(),
                "unoccupiedCoolingSetpoint": 75.0,
                "unoccupiedHeatingSetpoint": 61.0,
                "programingOperMode_auto_recovery_mode": "off",
                "programingOperMode_economy_energy_star_mode": "off",
                "programingOperMode_mode": "simple/setpoint mode",
                "systemTypeConfig_coolingSystemStage": "cool stage 1",
                "systemTypeConfig_heatingFuelSource": "electric / B",
                "systemTypeConfig_heatingSystemStage": "heat stage 1",
                "systemTypeConfig_heatingSystemType": "conventional"
            },
            "occupied_heating_setphvacUserInterfaceCfgoint": {
                "keypadLockout": "no lockout",
                "tempDisplayMode": "temperature in Fahrenheit"
            },
            "linkquality": rng.random_range(150..=200),
            "relative_humidity": {
                "maxMeasuredValue": 100.0,
                "measuredValue": round2(rng.random_range(25.0..40.0)),
                "minMeasuredValue": 0.0
            },
            "msOccupancySensing": {
                "occupancy": rng.random_bool(0.5),
                "occupancySensorType": "ultrasonic",
                "pirOToUDelay": 60
            },
            "schedule_active": false,
            "manuSpecificUniversalElectronics": {
                "temperature": round1(base_temp),
                "lowBattery": false,
                "installed": true,
                "online": true,
                "sensorType": "indoor",
                "systemState_autoModeOn": rng.random_bool(0.5),
                "systemState_coolModeOn": rng.random_bool(0.5),
                "systemState_fanModeOn": rng.random_bool(0.5),
                "systemState_heatModeOn": false,
                "systemState_occupied": rng.random_bool(0.5),
                "systemState_overrideHospitalityLogicOn": false,
                "systemState_systemStateOn": true,
                "tempSource_sensorSource": "remote"
            },
            "manuSpecific_remote_temperature_sensor": {
                "remTempSensor1": {
                    "deviceId": "uei-temp1-6888a100002cd9ed",
                    "installed": true,
                    "lowBattery": false,
                    "name": "Remote Sensor",
                    "online": true,
                    "sensorType": "indoor",
                    "temperature": 81.0
                },
                "remTempSensor2": {
                    "deviceId": "uei-temp2-6888a100002cd9ed",
                    "installed": true,
                    "lowBattery": false,
                    "name": "Discharge Sensor",
                    "online": true,
                    "sensorType": "supply air",
                    "temperature": 81.07
                },
                "remTempSensor3": {
                    "deviceId": "uei-temp3-6888a100002cd9ed",
                    "installed": false,
                    "lowBattery": false,
                    "name": "Averaging Sensor",
                    "online": false,
                    "sensorType": "indoor",
                    "temperature": 32.0
                }
            }
        })
    }
}
