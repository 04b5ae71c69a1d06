//! Object node firmware library.
//!
//! Exposes the protocol, configuration, sensing and classification core for
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, with host stubs in
//! its place.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod protocol;
pub mod sensors;
