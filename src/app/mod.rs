//! Application core: the control cycle and its port boundary.
//!
//! [`service::Station`] composes sun prediction, panel motion and sensor
//! acquisition. All interaction with hardware, the network and the clock
//! happens through the **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
