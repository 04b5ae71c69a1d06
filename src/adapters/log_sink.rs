//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every [`NodeEvent`] to the logger
//! (ESP-IDF console on target). The serial sink carries the host protocol;
//! this one is for whoever is watching the console.

use log::{debug, info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Started(cause) => {
                info!("START | cause={:?} banner=\"{}\"", cause, cause.banner());
            }
            NodeEvent::EepromRead { address, value } => {
                info!("EEPROM | read 0x{:04X} = 0x{:02X}", address, value);
            }
            NodeEvent::EepromWritten { address, count } => {
                info!("EEPROM | wrote {} byte(s) at 0x{:04X}", count, address);
            }
            NodeEvent::EepromWriteFailed { address, error } => {
                warn!("EEPROM | write failed at 0x{:04X}: {}", address, error);
            }
            NodeEvent::Classified(c) => {
                info!(
                    "POLL | {:?} sonar={} ir={}",
                    c.category, c.distance.sonar, c.distance.infrared
                );
            }
            NodeEvent::SensorFault(e) => warn!("POLL | {}", e),
            NodeEvent::SwitchTripped => info!("SWITCH | tripped"),
            NodeEvent::FrameRejected(reason) => debug!("FRAME | rejected: {}", reason),
            NodeEvent::ResetRequested => warn!("RESET | requested by host"),
        }
    }
}

/// Fan one event out to two sinks, in order.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &NodeEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
