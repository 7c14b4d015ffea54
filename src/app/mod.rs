//! Application layer — the hexagonal core.
//!
//! Pure domain logic (actuator state, policy evaluation, the automation
//! service) plus the port traits that adapters implement.

pub mod events;
pub mod policy;
pub mod ports;
pub mod service;
pub mod state;
