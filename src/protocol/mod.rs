//! Serial command protocol.
//!
//! Wire format (inbound):
//! ```text
//! ┌────────┬──────────────────────────────────────┐
//! │ opcode │ opcode-specific parameters (0..=32)  │
//! └────────┴──────────────────────────────────────┘
//! ```
//!
//! There is no length prefix, delimiter or checksum. A frame ends exactly
//! when its opcode's completion predicate holds:
//!
//! | Opcode         | Parameters                         | Complete when         |
//! |----------------|------------------------------------|-----------------------|
//! | `RESET`        | none                               | opcode byte           |
//! | `EEPROM_WRITE` | addr_hi, addr_lo, count, data…     | `len == count + 3`    |
//! | `EEPROM_READ`  | addr_hi, addr_lo                   | `len == 2`            |
//! | `POLL_SONAR`   | none                               | opcode byte           |
//!
//! Outbound traffic is ASCII lines, formatted in [`response`].

pub mod dispatcher;
pub mod response;

use heapless::Vec;

/// Parameter buffer capacity of a single frame.
pub const FRAME_CAPACITY: usize = 32;

pub const OP_RESET: u8 = 0x01;
pub const OP_EEPROM_WRITE: u8 = 0x02;
pub const OP_EEPROM_READ: u8 = 0x03;
pub const OP_POLL_SONAR: u8 = 0x04;

/// Known opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Reset = OP_RESET,
    EepromWrite = OP_EEPROM_WRITE,
    EepromRead = OP_EEPROM_READ,
    PollSonar = OP_POLL_SONAR,
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_RESET => Some(Self::Reset),
            OP_EEPROM_WRITE => Some(Self::EepromWrite),
            OP_EEPROM_READ => Some(Self::EepromRead),
            OP_POLL_SONAR => Some(Self::PollSonar),
            _ => None,
        }
    }
}

/// A frame being accumulated: opcode plus bounded parameter buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    pub opcode: Opcode,
    pub parameters: Vec<u8, FRAME_CAPACITY>,
}

impl CommandFrame {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            parameters: Vec::new(),
        }
    }

    /// Append one parameter byte. `Err` if the buffer is already full.
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        self.parameters.push(byte)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// 16-bit address carried big-endian in the first two parameters.
    pub fn address(&self) -> Option<u16> {
        match self.parameters.as_slice() {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}
