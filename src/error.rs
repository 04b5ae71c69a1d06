//! Unified error types for the object node firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be passed through the dispatcher and event sinks without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The persistent store failed to accept a write.
    Store(StoreError),
    /// A sonar/IR sampling cycle could not complete.
    Sensor(SensorError),
    /// An inbound command frame was rejected.
    Frame(RejectReason),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Persistent store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The device never acknowledged the write within its wait budget.
    WriteTimeout,
    /// The backing storage reported a failure (NVS commit, flash error).
    Io,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteTimeout => write!(f, "write not acknowledged"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Only produced when a bounded [`WaitBudget`](crate::config::WaitBudget)
/// is configured; unbounded waits block forever instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The echo line never produced the expected edge.
    EchoTimeout,
    /// The ADC conversion never completed.
    AdcTimeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoTimeout => write!(f, "echo edge timeout"),
            Self::AdcTimeout => write!(f, "ADC conversion timeout"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Frame rejection
// ---------------------------------------------------------------------------

/// Why the dispatcher discarded a frame. Rejections are silent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// First byte of the frame is not a known opcode.
    UnknownOpcode(u8),
    /// More parameter bytes than the opcode's layout allows.
    ExcessParameters,
    /// The parameter buffer capacity would have been exceeded.
    Overflow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(op) => write!(f, "unknown opcode 0x{op:02X}"),
            Self::ExcessParameters => write!(f, "excess parameters"),
            Self::Overflow => write!(f, "parameter buffer overflow"),
        }
    }
}

impl From<RejectReason> for Error {
    fn from(e: RejectReason) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
