//! GPIO / peripheral pin assignments for the LiveLamp main board
//! (SparkFun Thing Plus ESP32-S3).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump (simple on/off via MOSFET low-side switch)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = pump on.
pub const PUMP_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// SMA heating wire (single LEDC PWM channel)
// ---------------------------------------------------------------------------

/// LEDC PWM output heating the shape-memory-alloy wire.
pub const SMA_PWM_GPIO: i32 = 6;
/// LEDC base frequency for the SMA wire (25 kHz — inaudible).
pub const SMA_PWM_FREQ_HZ: u32 = 25_000;
/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const SMA_PWM_RESOLUTION_BITS: u32 = 10;

// ---------------------------------------------------------------------------
// NeoPixel ring (Adafruit #2852, 12 × WS2812, RMT-driven)
// ---------------------------------------------------------------------------

/// RMT data output for the NeoPixel ring.
pub const NEOPIXEL_GPIO: i32 = 8;
/// Number of LEDs on the ring.
pub const NEOPIXEL_COUNT: usize = 12;

// ---------------------------------------------------------------------------
// LD2410 mmWave radar
// ---------------------------------------------------------------------------

/// ESP32 TX → LD2410 RX.
pub const LD2410_TX_GPIO: i32 = 17;
/// ESP32 RX ← LD2410 TX.
pub const LD2410_RX_GPIO: i32 = 18;
/// Digital input: hardware presence line (HIGH = target detected).
/// Edge-triggered ISR feeds the presence atomic in `sensors`.
pub const LD2410_PRESENCE_GPIO: i32 = 4;
/// UART peripheral used for the radar data stream.
pub const LD2410_UART: u8 = 1;
/// Factory-default LD2410 baud rate.
pub const LD2410_BAUD: u32 = 256_000;
