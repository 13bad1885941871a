//! Sensor fleet and telemetry schema tests.

use heliostat::app::ports::SensorDriver;
use heliostat::sensors::{SensorFleet, TelemetrySnapshot};
use heliostat::solar::Location;

use crate::mock_hw::{ScriptedSensor, five_healthy, solstice};

fn fleet_of(sensors: Vec<ScriptedSensor>) -> SensorFleet {
    SensorFleet::new(
        sensors
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn SensorDriver>)
            .collect(),
    )
}

#[test]
fn every_configured_sensor_appears_in_every_read() {
    let mut sensors = five_healthy();
    sensors[0] = ScriptedSensor::dead("bme280");
    let flaky = sensors[2].read_ok.clone();
    let mut fleet = fleet_of(sensors);
    fleet.initialize_all();

    for round in 0..4 {
        flaky.set(round % 2 == 0);
        let readings = fleet.read_all();
        assert_eq!(readings.len(), 5);
        assert!(readings["bme280"].is_none());
        assert_eq!(readings["ltr390"].is_some(), round % 2 == 0);
        assert!(readings["sgp40"].is_some());
    }
}

#[test]
fn each_sensor_is_initialized_once() {
    let sensors = five_healthy();
    let counters: Vec<_> = sensors.iter().map(|s| s.init_calls.clone()).collect();
    let mut fleet = fleet_of(sensors);

    fleet.initialize_all();
    fleet.initialize_all();

    assert!(counters.iter().all(|c| c.get() == 1));
    assert_eq!(fleet.status().active, 5);
}

#[test]
fn mock_snapshot_has_hardware_schema() {
    let mut fleet = SensorFleet::synthetic(99);
    let snap = TelemetrySnapshot::new(solstice(12, 0), "pi-0001", Location::new(51.5007, 0.1246), fleet.read_all());
    let json = serde_json::to_value(&snap).unwrap();
    let obj = json.as_object().unwrap();

    for key in ["timestamp", "device_id", "location", "bme280", "tsl2591", "ltr390", "icm20948", "sgp40"] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert_eq!(obj.len(), 8);
    assert!(json["bme280"]["humidity"].is_number());
    assert!(json["tsl2591"]["lux"].is_number());
    assert!(json["ltr390"]["uv_index"].is_number());
    assert!(json["icm20948"]["gyroscope"]["z"].is_number());
    assert!(json["sgp40"]["voc_raw"].is_number());
    assert!((json["location"]["longitude"].as_f64().unwrap() - 0.1246).abs() < 1e-9);
}
