//! Station lifecycle and control-cycle tests against mock adapters.

use std::time::Duration;

use heliostat::app::events::AppEvent;
use heliostat::app::service::{Station, SystemMode};
use heliostat::config::StationConfig;
use heliostat::drivers::stepper::{Direction, Motion, TOTAL_STEPS};
use heliostat::error::{Error, MotionError, TransportError};
use heliostat::solar::{NormalizedPosition, PredictorMode};

use crate::mock_hw::{
    ManualClock, MockPlatform, RecordingSink, RecordingStepDriver, RecordingTransport, ScriptedSensor,
    five_healthy, solstice,
};

type TestStation = Station<ManualClock, RecordingTransport>;

fn start(config: StationConfig, platform: &mut MockPlatform, clock: &ManualClock, sink: &mut RecordingSink) -> TestStation {
    Station::start(config, platform, clock.clone(), RecordingTransport::default(), sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn healthy_hardware_starts_in_hardware_mode() {
    let stepper = RecordingStepDriver::new();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();

    let station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    assert_eq!(station.mode(), SystemMode::Hardware);
    assert_eq!(station.predictor().mode(), PredictorMode::Astronomical);
    assert_eq!(station.fleet().status().active, 5);
    assert_eq!(
        sink.events[0],
        AppEvent::Started {
            mode: SystemMode::Hardware,
            predictor: PredictorMode::Astronomical,
            active_sensors: 5,
            configured_sensors: 5,
        }
    );
}

#[test]
fn partial_sensor_failure_stays_in_hardware_mode() {
    let mut sensors = five_healthy();
    sensors[1] = ScriptedSensor::dead("tsl2591");
    sensors[3] = ScriptedSensor::dead("icm20948");
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), sensors);
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();

    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);
    assert_eq!(station.mode(), SystemMode::Hardware);
    assert_eq!(station.fleet().status().active, 3);

    let report = station.run_cycle(&mut sink).unwrap();
    assert_eq!(report.snapshot.readings.len(), 5);
    assert!(report.snapshot.readings["tsl2591"].is_none());
    assert!(report.snapshot.readings["icm20948"].is_none());
    assert!(report.snapshot.readings["bme280"].is_some());
}

#[test]
fn empty_fleet_escalates_to_full_mock_and_releases_stepper() {
    let stepper = RecordingStepDriver::new();
    let probe = stepper.probe();
    let sensors = ["bme280", "tsl2591", "ltr390", "icm20948", "sgp40"]
        .into_iter()
        .map(ScriptedSensor::dead)
        .collect();
    let mut platform = MockPlatform::new(stepper, sensors);
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();

    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    assert_eq!(station.mode(), SystemMode::FullMock);
    assert!(probe.released());
    assert!(station.fleet().status().is_complete());

    // Synthetic sensors report under the hardware names.
    let report = station.run_cycle(&mut sink).unwrap();
    assert_eq!(report.snapshot.available(), 5);
    assert!(report.snapshot.readings.contains_key("sgp40"));
    assert_eq!(probe.pulses(), 0);
}

#[test]
fn stepper_failure_escalates_without_touching_sensors() {
    let sensors = five_healthy();
    let init_calls = sensors[0].init_calls.clone();
    let mut platform = MockPlatform::without_stepper(sensors);
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();

    let station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    assert_eq!(station.mode(), SystemMode::FullMock);
    assert_eq!(platform.sensor_requests, 0);
    assert_eq!(init_calls.get(), 0);
}

#[test]
fn bus_failure_escalates_to_full_mock() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    platform.bus_ok = false;
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();

    let station = start(StationConfig::default(), &mut platform, &clock, &mut sink);
    assert_eq!(station.mode(), SystemMode::FullMock);
}

#[test]
fn configured_mock_mode_skips_platform() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let config = StationConfig {
        use_mock: true,
        ..StationConfig::default()
    };

    let station = start(config, &mut platform, &clock, &mut sink);
    assert_eq!(station.mode(), SystemMode::FullMock);
    assert_eq!(platform.step_requests, 0);
    assert_eq!(platform.sensor_requests, 0);
}

#[test]
fn invalid_coordinates_select_fixed_daylight() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let mut config = StationConfig::default();
    config.location.latitude = 123.0;

    let mut station = start(config, &mut platform, &clock, &mut sink);
    assert_eq!(station.predictor().mode(), PredictorMode::DeterministicFallback);

    let report = station.run_cycle(&mut sink).unwrap();
    assert_eq!(report.target, NormalizedPosition::new(0.5));
    assert_eq!(station.panel_position(), 258);
}

// ── Control cycle ─────────────────────────────────────────────

#[test]
fn cycle_moves_panel_then_delivers_snapshot() {
    let stepper = RecordingStepDriver::new();
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    let report = station.run_cycle(&mut sink).unwrap();

    let expected = report.target.to_steps(TOTAL_STEPS);
    assert!(report.target.value() > 0.3 && report.target.value() < 0.6);
    assert_eq!(station.panel_position(), expected);
    assert_eq!(probe.pulses(), u64::from(expected));
    assert_eq!(probe.log.borrow().directions, vec![Direction::West]);
    assert_eq!(
        report.motion,
        Motion::Stepped {
            direction: Direction::West,
            steps: expected
        }
    );

    assert!(report.delivered);
    let sent = &station.transport().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].device_id, "pi-0001");
    assert_eq!(sent[0].available(), 5);
    assert!((sent[0].timestamp - solstice(12, 0).timestamp() as f64).abs() < 1e-3);
}

#[test]
fn same_instant_twice_holds_position() {
    let stepper = RecordingStepDriver::new();
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(15, 30));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    station.run_cycle(&mut sink).unwrap();
    let after_first = probe.pulses();
    let second = station.run_cycle(&mut sink).unwrap();

    assert_eq!(second.motion, Motion::Holding);
    assert_eq!(probe.pulses(), after_first);
}

#[test]
fn night_parks_east() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(15, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    station.run_cycle(&mut sink).unwrap();
    assert!(station.panel_position() > 0);

    clock.set(solstice(23, 30));
    let report = station.run_cycle(&mut sink).unwrap();
    assert_eq!(report.target, NormalizedPosition::EAST);
    assert_eq!(station.panel_position(), 0);
    assert!(matches!(
        report.motion,
        Motion::Stepped {
            direction: Direction::East,
            ..
        }
    ));
}

#[test]
fn failing_sensor_reads_null_but_cycle_completes() {
    let sensors = five_healthy();
    sensors[4].read_ok.set(false);
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), sensors);
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    let report = station.run_cycle(&mut sink).unwrap();
    assert!(report.snapshot.readings["sgp40"].is_none());
    assert_eq!(report.snapshot.available(), 4);

    let json = serde_json::to_value(&report.snapshot).unwrap();
    assert!(json["sgp40"].is_null());
    assert!(json["bme280"]["temperature"].is_number());
}

#[test]
fn motion_fault_abandons_cycle_and_keeps_position() {
    let stepper = RecordingStepDriver::failing_after(10);
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    let err = station.run_cycle(&mut sink).unwrap_err();
    assert!(matches!(err, Error::Motion(MotionError::PulseFailed { issued: 10, .. })));
    assert_eq!(station.panel_position(), 0);
    assert!(station.transport().sent.is_empty());
    assert_eq!(sink.abandoned(), 1);

    // Fault cleared: the next cycle retries from the unchanged position.
    probe.log.borrow_mut().fail_after = None;
    let report = station.run_cycle(&mut sink).unwrap();
    assert_eq!(station.panel_position(), report.target.to_steps(TOTAL_STEPS));
    assert_eq!(station.transport().sent.len(), 1);
}

#[test]
fn transport_failure_is_reported_not_fatal() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let transport = RecordingTransport {
        fail_with: Some(TransportError::Status(503)),
        ..Default::default()
    };
    let mut station = Station::start(StationConfig::default(), &mut platform, clock, transport, &mut sink);

    let report = station.run_cycle(&mut sink).unwrap();
    assert!(!report.delivered);
    assert_eq!(sink.abandoned(), 0);
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::Telemetry(t) if !t.delivered)));
}

// ── Run loop ──────────────────────────────────────────────────

#[test]
fn run_honours_cycle_limit_and_interval() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(9, 0));
    let mut sink = RecordingSink::default();
    let config = StationConfig {
        max_cycles: Some(3),
        ..StationConfig::default()
    };
    let mut station = start(config, &mut platform, &clock, &mut sink);

    let ran = station.run(&mut sink, || true);

    assert_eq!(ran, 3);
    assert_eq!(station.transport().sent.len(), 3);
    assert_eq!(*clock.sleeps.borrow(), vec![Duration::from_secs(60); 2]);
    assert_eq!(clock.now.get(), solstice(9, 2));
}

#[test]
fn run_uses_retry_delay_after_abandoned_cycle() {
    let stepper = RecordingStepDriver::failing_after(0);
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let config = StationConfig {
        max_cycles: Some(2),
        ..StationConfig::default()
    };
    let mut station = start(config, &mut platform, &clock, &mut sink);

    let ran = station.run(&mut sink, || true);

    assert_eq!(ran, 2);
    assert_eq!(*clock.sleeps.borrow(), vec![Duration::from_secs(5)]);
    assert_eq!(sink.abandoned(), 2);
    assert_eq!(probe.pulses(), 0);
}

#[test]
fn run_stops_when_told() {
    let mut platform = MockPlatform::new(RecordingStepDriver::new(), five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    let mut budget = 4;
    let ran = station.run(&mut sink, || {
        budget -= 1;
        budget > 0
    });
    assert_eq!(ran, 3);
    assert_eq!(station.cycles(), 3);
}

#[test]
fn stepper_is_held_until_the_station_drops() {
    let stepper = RecordingStepDriver::new();
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(12, 0));
    let mut sink = RecordingSink::default();
    let config = StationConfig {
        max_cycles: Some(1),
        ..StationConfig::default()
    };
    let mut station = start(config, &mut platform, &clock, &mut sink);

    assert_eq!(station.run(&mut sink, || true), 1);
    assert!(!probe.released());

    drop(station);
    assert!(probe.released());
}

#[test]
fn shutdown_flag_ends_run_and_releases_stepper() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    let stepper = RecordingStepDriver::new();
    let probe = stepper.probe();
    let mut platform = MockPlatform::new(stepper, five_healthy());
    let clock = ManualClock::at(solstice(10, 0));
    let mut sink = RecordingSink::default();
    let mut station = start(StationConfig::default(), &mut platform, &clock, &mut sink);

    // Plays the signal handler: clears the flag once two cycles have run.
    let running = Arc::new(AtomicBool::new(true));
    let handler = Arc::clone(&running);
    let mut checks = 0;
    let ran = station.run(&mut sink, || {
        checks += 1;
        if checks > 2 {
            handler.store(false, Ordering::Relaxed);
        }
        running.load(Ordering::Relaxed)
    });

    assert_eq!(ran, 2);
    assert!(probe.pulses() > 0);
    assert!(!probe.released());

    drop(station);
    assert!(probe.released());
}
