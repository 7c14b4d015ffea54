#![allow(dead_code)] // Top-level Error funnel reserved for typed port returns

//! Unified error types for the LiveLamp firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform.  All variants are `Copy` so they can be cheaply passed across the
//! tick path without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The radar could not be read or produced an unusable frame.
    Sensor(SensorError),
    /// An actuator command failed at the hardware layer.
    Actuator(ActuatorError),
    /// A gateway request was malformed or not serviceable.
    Api(ApiError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Api(e) => write!(f, "api: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Logical radar read failures.  These are recovered locally by the
/// automation loop via backoff — never fatal, never surfaced to the
/// gateway as a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No complete report arrived within the hardware read timeout.
    Timeout,
    /// A report arrived but failed structural validation.
    MalformedFrame,
    /// The UART peripheral is not initialised (or host simulation).
    DeviceNotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read timeout"),
            Self::MalformedFrame => write!(f, "malformed frame"),
            Self::DeviceNotReady => write!(f, "device not ready"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// LEDC duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// RMT transmission to the NeoPixel ring failed.
    RmtWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::RmtWriteFailed => write!(f, "RMT write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Gateway request errors
// ---------------------------------------------------------------------------

/// Client-side request faults.  The gateway maps each variant to a JSON
/// `{"error": …}` body and a non-2xx status; actuator state is left
/// untouched when any of these fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Request line was not a valid JSON envelope.
    MalformedRequest,
    /// Resource path does not exist.
    UnknownResource,
    /// Resource exists but does not support the requested method.
    MethodNotAllowed,
    /// A required payload field is absent.
    MissingField(&'static str),
    /// A payload field has the wrong type or shape.
    InvalidPayload(&'static str),
    /// Token bucket exhausted.
    RateLimited,
}

impl ApiError {
    /// Transport-agnostic status code (HTTP-compatible by convention).
    pub const fn status(self) -> u16 {
        match self {
            Self::MalformedRequest
            | Self::MissingField(_)
            | Self::InvalidPayload(_) => 400,
            Self::UnknownResource => 404,
            Self::MethodNotAllowed => 405,
            Self::RateLimited => 429,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest => write!(f, "malformed request"),
            Self::UnknownResource => write!(f, "unknown resource"),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::MissingField(field) => write!(f, "missing field '{field}'"),
            Self::InvalidPayload(msg) => write!(f, "invalid payload: {msg}"),
            Self::RateLimited => write!(f, "rate limited"),
        }
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_status_mapping() {
        assert_eq!(ApiError::MalformedRequest.status(), 400);
        assert_eq!(ApiError::MissingField("enabled").status(), 400);
        assert_eq!(ApiError::UnknownResource.status(), 404);
        assert_eq!(ApiError::MethodNotAllowed.status(), 405);
        assert_eq!(ApiError::RateLimited.status(), 429);
    }

    #[test]
    fn display_carries_field_name() {
        let e = Error::from(ApiError::MissingField("enabled"));
        assert_eq!(e.to_string(), "api: missing field 'enabled'");
    }
}
