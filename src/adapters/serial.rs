//! Serial event sink adapter.
//!
//! Implements [`EventSink`] by turning wire-visible [`NodeEvent`]s into
//! their ASCII lines and handing them to a [`SerialTx`]. Events with no
//! wire representation are dropped here.

use crate::app::events::NodeEvent;
use crate::app::ports::{EventSink, SerialTx};
use crate::drivers::hw_init;
use crate::protocol::response::format_event;

pub struct SerialSink<W> {
    tx: W,
}

impl<W: SerialTx> SerialSink<W> {
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    pub fn tx(&self) -> &W {
        &self.tx
    }
}

impl<W: SerialTx> EventSink for SerialSink<W> {
    fn emit(&mut self, event: &NodeEvent) {
        if let Some(line) = format_event(event) {
            self.tx.write_bytes(line.as_bytes());
        }
    }
}

/// Host-link UART transmitter.
#[derive(Debug, Default)]
pub struct UartTx;

impl SerialTx for UartTx {
    fn write_bytes(&mut self, bytes: &[u8]) {
        hw_init::uart_write(bytes);
    }
}
