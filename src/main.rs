//! LiveLamp Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter    LogEventSink    MonotonicClock           │
//! │  (Radar+Actuator)   (EventSink)     (time)                   │
//! │  ApiEngine + I/O task (gateway transport)                    │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │        AutomationService (pure logic)              │      │
//! │  │  policy table · SMA governor · backoff             │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;
mod radar;
mod safety;

pub mod app;
mod adapters;
pub mod drivers;
mod gateway;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{debug, info};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::MonotonicClock;
use app::events::AppEvent;
use app::ports::{ActuatorPort, EventSink};
use app::service::{AutomationService, TickOutcome};
use app::state::ActuatorState;
use config::SystemConfig;
use drivers::neopixel::NeopixelRing;
use drivers::pump::PumpDriver;
use drivers::ring_patterns::RingPatternEngine;
use drivers::sma::SmaDriver;
use events::Event;
use gateway::ApiEngine;
use sensors::ld2410::Ld2410;

#[cfg(not(target_os = "espidf"))]
use events::push_event;

// ── NeoPixel construction ─────────────────────────────────────

/// Build the ring driver on real hardware: RMT channel 0 on the data
/// pin from `pins::NEOPIXEL_GPIO`.
#[cfg(target_os = "espidf")]
fn build_ring() -> Result<NeopixelRing> {
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::rmt::TxRmtDriver;
    use esp_idf_hal::rmt::config::TransmitConfig;

    let peripherals = Peripherals::take()?;
    // gpio8 == pins::NEOPIXEL_GPIO.
    let tx = TxRmtDriver::new(
        peripherals.rmt.channel0,
        peripherals.pins.gpio8,
        &TransmitConfig::new().clock_divider(1),
    )?;
    NeopixelRing::new(tx).map_err(|e| anyhow::anyhow!("neopixel init: {}", e))
}

#[cfg(not(target_os = "espidf"))]
fn build_ring() -> Result<NeopixelRing> {
    NeopixelRing::new().map_err(|e| anyhow::anyhow!("neopixel init: {}", e))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    init_host_logger();

    info!("╔══════════════════════════════════════╗");
    info!("║  LiveLamp v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    drivers::hw_timer::start_timers(config.control_loop_interval_ms);
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {}, continuing without presence edges", e);
    }
    let watchdog = drivers::watchdog::Watchdog::new();

    // ── 3. Construct adapters ─────────────────────────────────
    let ring = build_ring()?;
    let mut hw = HardwareAdapter::new(Ld2410::new(), PumpDriver::new(), SmaDriver::new(), ring);
    // Force every output to the documented boot state before anything
    // can observe it.
    hw.all_off();

    let mut log_sink = LogEventSink::new();
    let clock = MonotonicClock::new();
    let mut pattern_engine = RingPatternEngine::new();
    pattern_engine.set_pattern(config.ring_pattern);

    // ── 4. Construct the domain core ──────────────────────────
    let state = ActuatorState::new(pins::SMA_PWM_FREQ_HZ);
    let mut service = AutomationService::new(&config);
    let mut api = ApiEngine::new(&config);

    log_sink.emit(&AppEvent::Started {
        automation_enabled: service.enabled(),
    });

    // ── 5. Gateway I/O thread ─────────────────────────────────
    // NullTransport placeholder until a serial or TCP transport is
    // wired up; the engine and channels are transport-agnostic.
    let _io_handle = gateway::io_task::spawn(gateway::NullTransport);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let ticks_per_telemetry = (u64::from(config.telemetry_interval_secs) * 1_000
        / u64::from(config.control_loop_interval_ms))
    .max(1);
    let mut telemetry_counter: u64 = 0;
    let mut last_render_us = clock.uptime_us();

    loop {
        // Simulate timer interrupts via sleep on non-espidf targets.
        // On real hardware, esp_timer callbacks push these events.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_loop_interval_ms,
            )));
            push_event(Event::ControlTick);
            push_event(Event::RenderTick);
        }

        events::drain_events(|event| match event {
            Event::ControlTick => {
                let now_us = clock.uptime_us();
                match service.tick(&mut hw, &state, now_us, &mut log_sink) {
                    TickOutcome::Applied(cmd) => {
                        debug!(
                            "tick: applied pump={} sma={}% led={:?}",
                            cmd.pump_on, cmd.sma_percent, cmd.led_rgb
                        );
                    }
                    TickOutcome::Disabled => {}
                    TickOutcome::SensorFailure(_) | TickOutcome::BackingOff => {
                        // Already logged through the event sink.
                    }
                }

                // Sync the shared state to hardware. This is the only
                // task that touches the actuators, so gateway writes
                // land within one control period.
                hw.set_pump(state.pump());
                hw.set_sma_duty(state.sma().percent);

                telemetry_counter += 1;
                if telemetry_counter >= ticks_per_telemetry {
                    telemetry_counter = 0;
                    events::push_event(Event::TelemetryTick);
                }
            }

            Event::RenderTick => {
                let now_us = clock.uptime_us();
                let delta_ms = ((now_us - last_render_us) / 1_000) as u32;
                last_render_us = now_us;

                let led = state.led();
                let (r, g, b) = pattern_engine.tick(delta_ms, (led.r, led.g, led.b));
                hw.set_ring(r, g, b);
            }

            Event::PresenceEdge => {
                debug!("presence line: {}", sensors::presence_level());
            }

            Event::TelemetryTick => {
                log_sink.emit(&AppEvent::Telemetry(service.build_telemetry(&state)));
            }

            Event::CommandReceived => {
                while let Some(msg) = gateway::io_task::try_recv_request() {
                    let now_us = clock.uptime_us();
                    let resp = api.dispatch(&msg.line, &mut service, &state, now_us, &mut log_sink);
                    gateway::io_task::send_response(resp);
                }
            }
        });

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}

// ── Host logging bootstrap ────────────────────────────────────

/// Minimal stderr logger for simulation runs (the device build uses
/// the ESP-IDF logger instead).
#[cfg(not(target_os = "espidf"))]
fn init_host_logger() {
    struct StderrLogger;
    impl log::Log for StderrLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
        fn flush(&self) {}
    }
    static LOGGER: StderrLogger = StderrLogger;
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Info);
}
