//! Water pump driver (MOSFET low-side switch).
//!
//! Plain on/off control via a single GPIO — no speed control on this
//! board revision.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via the hw_init helper.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct PumpDriver {
    on: bool,
}

impl PumpDriver {
    pub fn new() -> Self {
        // Pin is driven low during init_gpio_outputs().
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::PUMP_GPIO, on);
        self.on = on;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
