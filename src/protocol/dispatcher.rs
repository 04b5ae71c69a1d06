//! Resumable command-frame state machine.
//!
//! The control loop hands the dispatcher at most one inbound byte per tick,
//! so a frame is assembled across many ticks. All in-flight state lives in
//! [`CommandDispatcher`]: the frame being accumulated and, for EEPROM
//! writes, the [`EepromWriteCursor`].
//!
//! ```text
//!            opcode byte                 completion predicate holds
//!   Idle ───────────────▶ InProgress ──────────────────────────────▶ Idle
//!     ▲                       │
//!     └───────────────────────┘  reject (unknown / excess / overflow)
//! ```

use log::{debug, warn};

use crate::app::ports::PersistentStore;
use crate::config::ConfigCache;
use crate::error::{RejectReason, StoreError};

use super::{CommandFrame, Opcode};

/// Parameters preceding the data bytes of an EEPROM_WRITE frame.
const WRITE_HEADER_LEN: usize = 3;
/// Parameters of an EEPROM_READ frame.
const READ_PARAM_LEN: usize = 2;

/// Result of a completed (or discarded) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// RESET received; the caller must reset the system.
    Reset,
    /// All data bytes of an EEPROM_WRITE frame were stored.
    EepromWritten { address: u16, count: u8 },
    /// The store failed at `address`; later bytes of the frame were skipped.
    WriteFailed { address: u16, error: StoreError },
    /// EEPROM_READ completed.
    EepromRead { address: u16, value: u8 },
    /// POLL_SONAR received; a sampling cycle is armed.
    PollArmed,
    /// The frame was discarded and the dispatcher is idle again.
    Rejected(RejectReason),
}

/// Frame accumulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DispatchState {
    Idle,
    InProgress(CommandFrame),
}

/// Progress of an EEPROM_WRITE frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EepromWriteCursor {
    /// Declared data length; `None` until the count byte has arrived.
    pub expected: Option<u8>,
    pub address: u16,
    pub offset: u8,
}

pub struct CommandDispatcher {
    state: DispatchState,
    cursor: EepromWriteCursor,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            state: DispatchState::Idle,
            cursor: EepromWriteCursor::default(),
        }
    }

    /// Consume one inbound byte.
    ///
    /// Returns `None` while a frame is still being accumulated, and the
    /// outcome once the frame completes or is rejected. In both of the
    /// latter cases the dispatcher is idle on return.
    pub fn feed(
        &mut self,
        byte: u8,
        store: &mut impl PersistentStore,
        config: &mut ConfigCache,
    ) -> Option<DispatchOutcome> {
        match &mut self.state {
            DispatchState::Idle => match Opcode::from_byte(byte) {
                Some(opcode) => self.state = DispatchState::InProgress(CommandFrame::new(opcode)),
                None => return Some(self.reject(RejectReason::UnknownOpcode(byte))),
            },
            DispatchState::InProgress(frame) => {
                if frame.push(byte).is_err() {
                    return Some(self.reject(RejectReason::Overflow));
                }
            }
        }
        self.evaluate(store, config)
    }

    /// `true` when no frame is in flight.
    pub fn is_idle(&self) -> bool {
        self.state == DispatchState::Idle
    }

    /// Opcode of the frame in flight.
    pub fn current_opcode(&self) -> Option<Opcode> {
        match &self.state {
            DispatchState::Idle => None,
            DispatchState::InProgress(frame) => Some(frame.opcode),
        }
    }

    /// Parameter bytes accumulated for the frame in flight.
    pub fn parameter_count(&self) -> usize {
        match &self.state {
            DispatchState::Idle => 0,
            DispatchState::InProgress(frame) => frame.len(),
        }
    }

    pub fn write_cursor(&self) -> EepromWriteCursor {
        self.cursor
    }

    // ── Completion predicates ─────────────────────────────────

    fn evaluate(
        &mut self,
        store: &mut impl PersistentStore,
        config: &mut ConfigCache,
    ) -> Option<DispatchOutcome> {
        let DispatchState::InProgress(frame) = &self.state else {
            return None;
        };
        let len = frame.len();

        match frame.opcode {
            Opcode::Reset => Some(self.finish(DispatchOutcome::Reset)),

            Opcode::PollSonar => Some(self.finish(DispatchOutcome::PollArmed)),

            Opcode::EepromRead => {
                // Unreachable while reads complete at exactly two
                // parameters; kept so a longer read layout still rejects.
                if len > READ_PARAM_LEN {
                    return Some(self.reject(RejectReason::ExcessParameters));
                }
                let address = frame.address().filter(|_| len == READ_PARAM_LEN)?;
                let value = store.read(address);
                Some(self.finish(DispatchOutcome::EepromRead { address, value }))
            }

            Opcode::EepromWrite => {
                if len == WRITE_HEADER_LEN {
                    self.cursor.expected = Some(frame.parameters[WRITE_HEADER_LEN - 1]);
                }
                let count = self.cursor.expected?;
                if len != usize::from(count) + WRITE_HEADER_LEN {
                    return None;
                }
                let DispatchState::InProgress(frame) =
                    core::mem::replace(&mut self.state, DispatchState::Idle)
                else {
                    return None;
                };
                Some(self.commit_write(&frame, count, store, config))
            }
        }
    }

    /// Store the data bytes of a complete EEPROM_WRITE frame sequentially,
    /// then refresh the config cache.
    fn commit_write(
        &mut self,
        frame: &CommandFrame,
        count: u8,
        store: &mut impl PersistentStore,
        config: &mut ConfigCache,
    ) -> DispatchOutcome {
        let start = u16::from_be_bytes([frame.parameters[0], frame.parameters[1]]);
        self.cursor.address = start;
        self.cursor.offset = 0;

        let mut outcome = DispatchOutcome::EepromWritten {
            address: start,
            count,
        };
        for &value in &frame.parameters[WRITE_HEADER_LEN..] {
            if let Err(error) = store.write(self.cursor.address, value) {
                warn!(
                    "dispatch: EEPROM write failed at 0x{:04X} ({}), {} of {} bytes stored",
                    self.cursor.address, error, self.cursor.offset, count
                );
                outcome = DispatchOutcome::WriteFailed {
                    address: self.cursor.address,
                    error,
                };
                break;
            }
            self.cursor.address = self.cursor.address.wrapping_add(1);
            self.cursor.offset += 1;
        }

        self.cursor = EepromWriteCursor::default();
        config.refresh(store);
        outcome
    }

    fn finish(&mut self, outcome: DispatchOutcome) -> DispatchOutcome {
        self.state = DispatchState::Idle;
        self.cursor = EepromWriteCursor::default();
        outcome
    }

    /// The one place a frame is discarded. Nothing is emitted on the wire.
    fn reject(&mut self, reason: RejectReason) -> DispatchOutcome {
        debug!("dispatch: frame rejected ({})", reason);
        self.finish(DispatchOutcome::Rejected(reason))
    }
}
