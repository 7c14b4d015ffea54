//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to              |
//! |------------|--------------|--------------------------|
//! | `hardware` | RadarPort    | LD2410 UART + GPIO       |
//! |            | ActuatorPort | ESP32 GPIO, LEDC, RMT    |
//! | `log_sink` | EventSink    | Serial log output        |
//! | `time`     | —            | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod time;
