//! API engine — dispatches JSON request envelopes to the domain.
//!
//! **Transport-decoupled**: the engine does not own a transport. The
//! I/O task feeds raw request lines via channels; the control loop
//! calls [`ApiEngine::dispatch`] and sends the serialized responses
//! back. Every request passes a token-bucket rate limit gate (via
//! `burster`) before it touches any state.
//!
//! Request envelope, one per line:
//! `{"method":"GET"|"POST","path":"/api/<resource>","body":{…}}`
//! Response: `{"status":<u16>,"body":{…}}`, newline-terminated.
//!
//! Resources: `pump`, `sma`, `leds`, `leds/white`, `radar` (read-only),
//! `automation`. SMA writes route through the automation service's
//! governor path — a denied activation returns the unchanged current
//! value with status 200, because a safety denial is a decision, not a
//! fault.

use core::time::Duration;

use burster::Limiter;
use log::warn;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::ports::EventSink;
use crate::app::service::AutomationService;
use crate::app::state::{ActuatorState, LedColor};
use crate::config::SystemConfig;
use crate::error::ApiError;

use super::codec::MAX_LINE;

/// Inbound request envelope.
#[derive(Deserialize)]
struct RequestEnvelope {
    method: String,
    path: String,
    #[serde(default)]
    body: Value,
}

/// Transport-decoupled request dispatcher.
pub struct ApiEngine {
    limiter: burster::TokenBucket<fn() -> Duration>,
}

impl ApiEngine {
    pub fn new(config: &SystemConfig) -> Self {
        let per_sec = u64::from(config.api_rate_limit_per_sec);
        Self {
            // Burst capacity equals the sustained rate.
            limiter: burster::TokenBucket::new_with_time_provider(
                per_sec,
                per_sec,
                platform_now as fn() -> Duration,
            ),
        }
    }

    /// Handle one request line and produce the serialized response.
    pub fn dispatch(
        &mut self,
        line: &[u8],
        service: &mut AutomationService,
        state: &ActuatorState,
        now_us: u64,
        sink: &mut impl EventSink,
    ) -> heapless::Vec<u8, MAX_LINE> {
        match self.handle(line, service, state, now_us, sink) {
            Ok(body) => finalize(200, body),
            Err(e) => {
                warn!("api: {}", e);
                finalize(e.status(), json!({ "error": e.to_string() }))
            }
        }
    }

    fn handle(
        &mut self,
        line: &[u8],
        service: &mut AutomationService,
        state: &ActuatorState,
        now_us: u64,
        sink: &mut impl EventSink,
    ) -> Result<Value, ApiError> {
        if self.limiter.try_consume(1).is_err() {
            return Err(ApiError::RateLimited);
        }

        let req: RequestEnvelope =
            serde_json::from_slice(line).map_err(|_| ApiError::MalformedRequest)?;

        let resource = req
            .path
            .strip_prefix("/api/")
            .ok_or(ApiError::UnknownResource)?;
        let write = match req.method.as_str() {
            "GET" => false,
            "POST" => true,
            _ => return Err(ApiError::MethodNotAllowed),
        };

        match (resource, write) {
            ("pump", false) => Ok(json!({ "on": state.pump() })),
            ("pump", true) => {
                let on = req
                    .body
                    .get("on")
                    .ok_or(ApiError::MissingField("on"))?
                    .as_bool()
                    .ok_or(ApiError::InvalidPayload("on must be a boolean"))?;
                state.set_pump(on);
                Ok(json!({ "on": state.pump() }))
            }

            ("sma", false) => Ok(sma_body(state)),
            ("sma", true) => {
                let percent = req
                    .body
                    .get("percent")
                    .ok_or(ApiError::MissingField("percent"))?
                    .as_i64()
                    .ok_or(ApiError::InvalidPayload("percent must be an integer"))?;
                let percent = percent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                service.request_sma(percent, now_us, state, sink);
                // A governor denial still answers 200 with the (unchanged)
                // current state.
                Ok(sma_body(state))
            }

            ("leds", false) => Ok(led_body(state.led())),
            ("leds", true) => {
                let colour = parse_led_write(&req.body)?;
                state.set_led_color(colour);
                Ok(led_body(state.led()))
            }

            ("leds/white", true) => {
                let brightness = req
                    .body
                    .get("brightness")
                    .ok_or(ApiError::MissingField("brightness"))?
                    .as_i64()
                    .ok_or(ApiError::InvalidPayload("brightness must be an integer"))?;
                let n = brightness.clamp(0, 255) as i32;
                let colour = state.set_led(n, n, n);
                Ok(json!({ "white": colour.r }))
            }
            ("leds/white", false) => Err(ApiError::MethodNotAllowed),

            ("radar", false) => Ok(radar_body(service)),
            ("radar", true) => Err(ApiError::MethodNotAllowed),

            ("automation", false) => Ok(json!({ "enabled": service.enabled() })),
            ("automation", true) => {
                let enabled = req
                    .body
                    .get("enabled")
                    .ok_or(ApiError::MissingField("enabled"))?
                    .as_bool()
                    .ok_or(ApiError::InvalidPayload("enabled must be a boolean"))?;
                service.set_enabled(enabled, sink);
                Ok(json!({ "enabled": service.enabled() }))
            }

            _ => Err(ApiError::UnknownResource),
        }
    }
}

// ── Body builders ─────────────────────────────────────────────

fn sma_body(state: &ActuatorState) -> Value {
    let sma = state.sma();
    json!({ "percent": sma.percent, "freq": sma.freq_hz })
}

fn led_body(colour: LedColor) -> Value {
    json!({
        "r": colour.r,
        "g": colour.g,
        "b": colour.b,
        "hex": colour.hex().as_str(),
    })
}

fn radar_body(service: &AutomationService) -> Value {
    let snap = service.radar_snapshot();
    json!({
        "presence": snap.presence,
        "presence_gpio": snap.presence_gpio,
        "target_state": snap.target_state as u8,
        "moving_distance": snap.moving_distance_cm,
        "moving_energy": snap.moving_energy,
        "static_distance": snap.static_distance_cm,
        "static_energy": snap.static_energy,
        "detection_distance": snap.detection_distance_cm,
    })
}

/// LED writes accept `{hex:"#rrggbb"}` or `{r,g,b}`; hex wins when both
/// are present.
fn parse_led_write(body: &Value) -> Result<LedColor, ApiError> {
    if let Some(hex) = body.get("hex") {
        let hex = hex
            .as_str()
            .ok_or(ApiError::InvalidPayload("hex must be a string"))?;
        return LedColor::parse_hex(hex)
            .ok_or(ApiError::InvalidPayload("hex must be #rrggbb"));
    }

    let channel = |name: &'static str| -> Result<i32, ApiError> {
        body.get(name)
            .ok_or(ApiError::MissingField(name))?
            .as_i64()
            .ok_or(ApiError::InvalidPayload("channels must be integers"))
            .map(|v| v.clamp(0, 255) as i32)
    };
    Ok(LedColor {
        r: channel("r")? as u8,
        g: channel("g")? as u8,
        b: channel("b")? as u8,
    })
}

fn finalize(status: u16, body: Value) -> heapless::Vec<u8, MAX_LINE> {
    let mut out = heapless::Vec::new();
    let envelope = json!({ "status": status, "body": body });
    match serde_json::to_string(&envelope) {
        Ok(s) if s.len() < MAX_LINE => {
            // Capacity checked above; pushes cannot fail.
            let _ = out.extend_from_slice(s.as_bytes());
            let _ = out.push(b'\n');
        }
        _ => {
            let _ = out
                .extend_from_slice(b"{\"status\":500,\"body\":{\"error\":\"response too large\"}}\n");
        }
    }
    out
}

// ── Platform time for rate limiter ───────────────────────────

#[cfg(target_os = "espidf")]
fn platform_now() -> Duration {
    let us = unsafe { esp_idf_sys::esp_timer_get_time() };
    Duration::from_micros(us as u64)
}

#[cfg(not(target_os = "espidf"))]
fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}

// ── Tests ────────────────────────────────────────────────────
