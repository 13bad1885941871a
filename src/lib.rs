//! Heliostat station library.
//!
//! Sun-tracking panel control and environmental telemetry for a fixed
//! installation. Exposes the domain core, adapters and drivers for the
//! binary and for host integration tests. Real peripherals are only
//! compiled in with the `rpi` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod solar;

pub mod adapters;
pub mod drivers;
pub mod sensors;
