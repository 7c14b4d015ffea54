//! LiveLamp firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod pins;
pub mod radar;
pub mod safety;

// The ESP-IDF-only paths inside these are guarded by cfg attributes;
// the host build compiles their simulation halves for tests.
pub mod adapters;
pub mod drivers;
pub mod sensors;
