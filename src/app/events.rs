//! Outbound node events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. The serial sink turns the
//! wire-visible ones into text lines; the log sink mirrors all of them.

use crate::diagnostics::ResetCause;
use crate::error::{RejectReason, SensorError, StoreError};
use crate::sensors::classifier::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// The node finished booting (carries the detected reset cause).
    Started(ResetCause),

    /// An EEPROM_READ frame completed.
    EepromRead { address: u16, value: u8 },

    /// An EEPROM_WRITE frame stored all its data bytes.
    EepromWritten { address: u16, count: u8 },

    /// An EEPROM_WRITE frame stopped at `address` because the store failed.
    EepromWriteFailed { address: u16, error: StoreError },

    /// A sampling cycle finished and was classified.
    Classified(Classification),

    /// A sampling cycle could not complete within its wait budget.
    SensorFault(SensorError),

    /// The microswitch stayed engaged long enough to trip.
    SwitchTripped,

    /// A frame was discarded.
    FrameRejected(RejectReason),

    /// A RESET frame is about to reset the node.
    ResetRequested,
}
