//! Mock adapters for integration tests.
//!
//! Records every reset request and every emitted event so tests can assert
//! on the full history without touching real GPIO, ADC or NVS.

use std::collections::VecDeque;

use objnode::app::events::NodeEvent;
use objnode::app::ports::{
    AnalogPort, ByteSource, EventSink, PersistentStore, RangingPort, SwitchPort, SystemControl,
};
use objnode::error::StoreError;
use objnode::protocol::response::format_event;

// ── MockHardware ──────────────────────────────────────────────

/// Echo round trip of `echo_ticks`; the line goes high on trigger and low
/// once the timer is zeroed, so both edge waits return immediately.
pub struct MockHardware {
    pub echo_ticks: u16,
    pub ir_raw: u16,
    pub switch_pressed: bool,
    /// Sensor unplugged: the echo line never rises.
    pub echo_dead: bool,
    pub triggers: u32,
    pub resets: u32,
    echo_high: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            echo_ticks: 0,
            ir_raw: 0,
            switch_pressed: false,
            echo_dead: false,
            triggers: 0,
            resets: 0,
            echo_high: false,
        }
    }

    /// Scene the sensors will report on the next poll.
    pub fn with_scene(sonar: u16, infrared: u16) -> Self {
        Self {
            echo_ticks: sonar * 4,
            ir_raw: infrared,
            ..Self::new()
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl RangingPort for MockHardware {
    fn trigger_pulse(&mut self) {
        self.triggers += 1;
        self.echo_high = !self.echo_dead;
    }

    fn echo_level(&mut self) -> bool {
        self.echo_high
    }

    fn reset_timer(&mut self) {
        self.echo_high = false;
    }

    fn read_timer(&mut self) -> u16 {
        self.echo_ticks
    }
}

impl AnalogPort for MockHardware {
    fn start_adc(&mut self) {}

    fn adc_busy(&mut self) -> bool {
        false
    }

    fn read_adc(&mut self) -> u16 {
        self.ir_raw
    }
}

impl SwitchPort for MockHardware {
    fn switch_engaged(&mut self) -> bool {
        self.switch_pressed
    }
}

impl SystemControl for MockHardware {
    fn reset(&mut self) {
        self.resets += 1;
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// 1 KiB erased store. Writes at `fail_at` are refused.
pub struct MockStore {
    pub bytes: Vec<u8>,
    pub writes: Vec<(u16, u8)>,
    pub fail_at: Option<u16>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            bytes: vec![0xFF; 1024],
            writes: Vec::new(),
            fail_at: None,
        }
    }

    /// Store with big-endian `u16` values at the given addresses.
    pub fn with_words(words: &[(u16, u16)]) -> Self {
        let mut store = Self::new();
        for &(address, value) in words {
            let [hi, lo] = value.to_be_bytes();
            store.bytes[usize::from(address)] = hi;
            store.bytes[usize::from(address) + 1] = lo;
        }
        store
    }
}

impl PersistentStore for MockStore {
    fn read(&self, address: u16) -> u8 {
        self.bytes[usize::from(address) % 1024]
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), StoreError> {
        if self.fail_at == Some(address) {
            return Err(StoreError::WriteTimeout);
        }
        self.bytes[usize::from(address) % 1024] = value;
        self.writes.push((address, value));
        Ok(())
    }
}

// ── Byte source ───────────────────────────────────────────────

pub struct Inbox(pub VecDeque<u8>);

#[allow(dead_code)]
impl Inbox {
    pub fn new(bytes: &[u8]) -> Self {
        Self(bytes.iter().copied().collect())
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.0.extend(bytes.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ByteSource for Inbox {
    fn pop(&mut self) -> Option<u8> {
        self.0.pop_front()
    }
}

// ── Recording sink ────────────────────────────────────────────

/// Keeps every event plus the exact bytes the serial sink would send.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
    pub wire: Vec<u8>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wire_text(&self) -> String {
        String::from_utf8_lossy(&self.wire).into_owned()
    }

    pub fn take_wire(&mut self) -> String {
        let text = self.wire_text();
        self.wire.clear();
        text
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(*event);
        if let Some(line) = format_event(event) {
            self.wire.extend_from_slice(line.as_bytes());
        }
    }
}
