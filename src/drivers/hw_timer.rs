//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates periodic timers that push events into the lock-free SPSC
//! queue. On simulation targets, the main loop approximates the timing
//! with thread::sleep instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses atomics.

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Ring render cadence (20 fps keeps breathe/rainbow smooth).
pub const RENDER_INTERVAL_MS: u32 = 50;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut RENDER_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn render_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::RenderTick);
}

/// Start the hardware tick timers.
///
/// - control tick at `control_interval_ms` (10 Hz default)
/// - render tick at 20 Hz
#[cfg(target_os = "espidf")]
pub fn start_timers(control_interval_ms: u32) {
    // SAFETY: CONTROL_TIMER and RENDER_TIMER are written here once at
    // boot from the single main-task context before any timer callbacks
    // fire. The callbacks only call push_event(), which is ISR-safe.
    unsafe {
        let control_args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"control\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&control_args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: control timer create failed (rc={}), continuing without control ticks",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(CONTROL_TIMER, u64::from(control_interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: control timer start failed (rc={})", ret);
            return;
        }

        let render_args = esp_timer_create_args_t {
            callback: Some(render_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"render\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&render_args, &raw mut RENDER_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: render timer create failed (rc={}), ring patterns frozen",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(RENDER_TIMER, u64::from(RENDER_INTERVAL_MS) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: render timer start failed (rc={})", ret);
            return;
        }

        info!(
            "hw_timer: periodic timers started (control={}ms, render={}ms)",
            control_interval_ms, RENDER_INTERVAL_MS
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_control_interval_ms: u32) {
    log::info!("hw_timer(sim): main loop drives ticks via sleep");
}
