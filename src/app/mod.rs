//! Application core: control-loop orchestration, zero direct I/O.
//!
//! The node's rules (frame dispatch, EEPROM sequencing, poll arming,
//! classification, microswitch edge detection) are tied together here.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
