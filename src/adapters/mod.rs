//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                      |
//! |-------------|--------------------|----------------------------------|
//! | `hardware`  | Platform           | Linux I2C + GPIO cdev (`rpi`)    |
//! | `http`      | TelemetryTransport | JSON over HTTP(S)                |
//! | `log_sink`  | EventSink          | `log` facade                     |
//! | `time`      | ClockPort          | OS wall clock                    |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
