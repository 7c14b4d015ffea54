//! Gateway inter-task communication channels.
//!
//! Uses `embassy-sync` bounded channels to bridge the async I/O task
//! with the synchronous control loop. Both tasks share these static
//! channels without heap allocation.
//!
//! ```text
//! ┌──────────────┐  ApiRequestMsg  ┌──────────────┐
//! │   I/O Task   │───────────────▶│  Control Loop │
//! │  (async)     │◀───────────────│  (sync)       │
//! └──────────────┘  ApiResponseMsg └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use super::codec::MAX_LINE;

/// Inbound request line from a client, delivered to the control loop.
pub struct ApiRequestMsg {
    /// Raw JSON envelope bytes (newline terminator already stripped).
    pub line: Vec<u8, MAX_LINE>,
}

/// Outbound response from the control loop, delivered to the I/O task.
pub struct ApiResponseMsg {
    /// Serialized JSON response, newline-terminated, ready to write.
    pub data: Vec<u8, MAX_LINE>,
}

/// Channel depth for request (inbound) messages.
const REQ_DEPTH: usize = 8;

/// Channel depth for response (outbound) messages.
const RESP_DEPTH: usize = 8;

/// Inbound request channel: I/O task → control loop.
pub static REQ_CHANNEL: Channel<CriticalSectionRawMutex, ApiRequestMsg, REQ_DEPTH> = Channel::new();

/// Outbound response channel: control loop → I/O task.
pub static RESP_CHANNEL: Channel<CriticalSectionRawMutex, ApiResponseMsg, RESP_DEPTH> =
    Channel::new();
