//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod hw_timer;
pub mod neopixel;
pub mod pump;
pub mod ring_patterns;
pub mod sma;
pub mod task_pin;
pub mod watchdog;
