//! Port traits: the hexagonal boundary between node logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (EEPROM, ranging line, ADC, microswitch, serial output)
//! implement these traits. The [`NodeService`](super::service::NodeService)
//! consumes them via generics, so the protocol and classification core never
//! touches registers directly.
//!
//! Every wait behind these ports blocks the caller: while an echo edge, an
//! ADC conversion or an EEPROM write is pending, nothing else in the loop
//! runs.

use crate::config::WaitBudget;
use crate::error::{SensorError, StoreError};

use super::events::NodeEvent;

// ───────────────────────────────────────────────────────────────
// Persistent store (EEPROM)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable persistent store.
pub trait PersistentStore {
    /// Read the byte at `address`.
    fn read(&self, address: u16) -> u8;

    /// Write one byte and block until the device acknowledges it.
    fn write(&mut self, address: u16, value: u8) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Ranging line (sonar)
// ───────────────────────────────────────────────────────────────

/// Edge on the echo line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Sonar trigger/echo line plus the free-running timer used to time it.
pub trait RangingPort {
    /// Emit the trigger pulse and release the line for the echo.
    fn trigger_pulse(&mut self);

    /// Current level of the echo line.
    fn echo_level(&mut self) -> bool;

    /// Zero the echo timer.
    fn reset_timer(&mut self);

    /// Ticks elapsed since the last [`reset_timer`](Self::reset_timer).
    fn read_timer(&mut self) -> u16;

    /// Spin until the echo line shows `edge`.
    fn wait_edge(&mut self, edge: Edge, budget: WaitBudget) -> Result<(), SensorError> {
        let target = edge == Edge::Rising;
        let mut spins = 0u32;
        while self.echo_level() != target {
            if budget.exhausted(spins) {
                return Err(SensorError::EchoTimeout);
            }
            spins = spins.saturating_add(1);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Analog channel (infrared)
// ───────────────────────────────────────────────────────────────

pub trait AnalogPort {
    /// Start a conversion on the IR channel.
    fn start_adc(&mut self);

    /// `true` while the conversion is still running.
    fn adc_busy(&mut self) -> bool;

    /// Result of the last completed conversion.
    fn read_adc(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Digital input (microswitch)
// ───────────────────────────────────────────────────────────────

pub trait SwitchPort {
    /// Sample the microswitch once. `true` = engaged.
    fn switch_engaged(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// System control
// ───────────────────────────────────────────────────────────────

pub trait SystemControl {
    /// Perform a full system reset. On hardware this does not return.
    fn reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Inbound bytes
// ───────────────────────────────────────────────────────────────

/// Consumer side of the inbound byte queue.
pub trait ByteSource {
    /// Take the oldest queued byte, if any.
    fn pop(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → serial / logging)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`NodeEvent`]s through this port. Adapters
/// decide where they go (serial wire format, log, both).
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}

/// Raw serial transmit.
pub trait SerialTx {
    fn write_bytes(&mut self, bytes: &[u8]);
}

impl SerialTx for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}
