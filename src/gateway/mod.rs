//! JSON request gateway — transport-decoupled API boundary.
//!
//! The gateway exposes the lamp's actuator and sensor state as JSON
//! resources without owning a transport or a server. The I/O task
//! decodes newline-delimited request envelopes from a byte [`Transport`]
//! and bridges them over channels to the control loop, which dispatches
//! them through the [`ApiEngine`] and sends the responses back.
//!
//! ```text
//! Transport ──▶ LineDecoder ──▶ REQ_CHANNEL ──▶ ApiEngine (control loop)
//! Transport ◀── write        ◀── RESP_CHANNEL ◀─────┘
//! ```

pub mod channels;
pub mod codec;
pub mod engine;
pub mod io_task;
pub mod transport;

pub use engine::ApiEngine;
pub use transport::{NullTransport, Transport};
