//! Integration tests for the inbound byte stream → dispatcher → store /
//! wire pipeline, one byte per control-loop tick.

use objnode::app::events::NodeEvent;
use objnode::app::service::NodeService;
use objnode::config::{EE_SWITCH_THRESHOLD, EE_THRESHOLD_IR, EE_THRESHOLD_SONAR, NodeConfig};
use objnode::diagnostics::ResetCause;
use objnode::error::{RejectReason, StoreError};
use objnode::protocol::{OP_EEPROM_READ, OP_EEPROM_WRITE, OP_POLL_SONAR, OP_RESET};

use crate::mock_hw::{Inbox, MockHardware, MockStore, RecordingSink};

struct Rig {
    node: NodeService,
    rx: Inbox,
    hw: MockHardware,
    store: MockStore,
    sink: RecordingSink,
}

impl Rig {
    fn new(store: MockStore) -> Self {
        let node = NodeService::new(NodeConfig::default(), &store);
        Self {
            node,
            rx: Inbox::new(&[]),
            hw: MockHardware::new(),
            store,
            sink: RecordingSink::new(),
        }
    }

    fn tick(&mut self) {
        self.node
            .tick(&mut self.rx, &mut self.hw, &mut self.store, &mut self.sink);
    }

    /// Queue `bytes` and tick until every one has been consumed.
    fn send(&mut self, bytes: &[u8]) {
        self.rx.push(bytes);
        while !self.rx.is_empty() {
            self.tick();
        }
    }
}

#[test]
fn eeprom_write_frame_stores_bytes_and_returns_idle() {
    let mut rig = Rig::new(MockStore::new());

    rig.send(&[OP_EEPROM_WRITE, 0x00, 0x10, 0x03, 0xAA, 0xBB, 0xCC]);

    assert_eq!(&rig.store.bytes[0x10..0x13], &[0xAA, 0xBB, 0xCC]);
    assert!(rig.node.context().dispatcher.is_idle());
    assert_eq!(rig.node.context().dispatcher.parameter_count(), 0);
    assert!(rig.sink.wire.is_empty(), "writes are not acknowledged on the wire");
    assert!(rig.sink.events.contains(&NodeEvent::EepromWritten {
        address: 0x0010,
        count: 3
    }));
    assert_eq!(rig.node.stats().bytes_stored, 3);
}

#[test]
fn write_frame_spans_ticks_until_last_data_byte() {
    let mut rig = Rig::new(MockStore::new());

    rig.send(&[OP_EEPROM_WRITE, 0x00, 0x20, 0x02, 0x11]);
    assert!(!rig.node.context().dispatcher.is_idle());
    assert!(rig.store.writes.is_empty());

    // Idle ticks in between do not disturb the pending frame.
    rig.tick();
    rig.tick();
    assert_eq!(rig.node.context().dispatcher.parameter_count(), 4);

    rig.send(&[0x22]);
    assert_eq!(rig.store.writes, vec![(0x0020, 0x11), (0x0021, 0x22)]);
    assert!(rig.node.context().dispatcher.is_idle());
}

#[test]
fn eeprom_read_frame_answers_with_hex_line() {
    let mut store = MockStore::new();
    store.bytes[0x05] = 0x2A;
    let mut rig = Rig::new(store);

    rig.send(&[OP_EEPROM_READ, 0x00, 0x05]);

    assert_eq!(rig.sink.wire_text(), "0 2A\n\r");
    assert!(rig.node.context().dispatcher.is_idle());
}

#[test]
fn byte_after_complete_read_starts_a_new_frame() {
    let mut store = MockStore::new();
    store.bytes[0x05] = 0x2A;
    let mut rig = Rig::new(store);

    rig.send(&[OP_EEPROM_READ, 0x00, 0x05, 0xFF]);

    // The read completes at its second parameter; 0xFF is then judged as
    // an opcode on its own and dropped silently.
    assert_eq!(rig.sink.take_wire(), "0 2A\n\r");
    assert!(rig.node.context().dispatcher.is_idle());
    assert!(rig
        .sink
        .events
        .contains(&NodeEvent::FrameRejected(RejectReason::UnknownOpcode(0xFF))));
    assert_eq!(rig.node.stats().frames_rejected, 1);
}

#[test]
fn write_updates_config_cache_immediately() {
    let mut rig = Rig::new(MockStore::new());
    assert_eq!(rig.node.config().threshold_sonar, 0xFFFF);

    let [hi, lo] = EE_THRESHOLD_SONAR.to_be_bytes();
    rig.send(&[OP_EEPROM_WRITE, hi, lo, 0x04, 0x00, 0x64, 0x00, 0x32]);

    assert_eq!(rig.node.config().threshold_sonar, 100);
    assert_eq!(rig.node.config().threshold_ir, 50);
}

#[test]
fn unknown_opcode_is_silent_and_counted() {
    let mut rig = Rig::new(MockStore::new());

    rig.send(&[0x7E, 0x00]);

    assert!(rig.sink.wire.is_empty());
    assert_eq!(rig.node.stats().frames_rejected, 2);
    assert!(rig.node.context().dispatcher.is_idle());
}

#[test]
fn oversized_write_frame_is_rejected_without_touching_store() {
    let mut rig = Rig::new(MockStore::new());

    // Declares 40 data bytes: the buffer fills before the frame completes.
    let mut frame = vec![OP_EEPROM_WRITE, 0x00, 0x40, 40];
    frame.extend(std::iter::repeat_n(0x5A, 40));
    rig.send(&frame);

    assert!(rig.store.writes.is_empty());
    assert!(rig
        .sink
        .events
        .contains(&NodeEvent::FrameRejected(RejectReason::Overflow)));

    // The dispatcher recovers for the next frame.
    rig.sink.events.clear();
    rig.store.bytes[0x100] = 0x07;
    rig.send(&[OP_EEPROM_READ, 0x01, 0x00]);
    assert!(rig.sink.wire_text().ends_with("0 07\n\r"));
}

#[test]
fn store_failure_stops_write_and_reports() {
    let mut store = MockStore::new();
    store.fail_at = Some(0x0031);
    let mut rig = Rig::new(store);

    rig.send(&[OP_EEPROM_WRITE, 0x00, 0x30, 0x03, 0x01, 0x02, 0x03]);

    assert_eq!(rig.store.writes, vec![(0x0030, 0x01)]);
    assert_eq!(rig.store.bytes[0x32], 0xFF);
    assert!(rig.sink.events.contains(&NodeEvent::EepromWriteFailed {
        address: 0x0031,
        error: StoreError::WriteTimeout,
    }));
    assert!(rig.node.context().dispatcher.is_idle());
}

#[test]
fn reset_frame_requests_system_reset() {
    let mut rig = Rig::new(MockStore::new());

    rig.send(&[OP_RESET]);

    assert_eq!(rig.hw.resets, 1);
    assert!(rig.sink.events.contains(&NodeEvent::ResetRequested));
    assert!(rig.sink.wire.is_empty());
}

#[test]
fn boot_banner_names_reset_cause() {
    let mut rig = Rig::new(MockStore::new());

    rig.node.start(ResetCause::BrownOut, &mut rig.sink);

    assert_eq!(rig.sink.wire_text(), "RST OBJ - BOR\n\r");
}

#[test]
fn commands_interleave_with_switch_sampling() {
    let mut rig = Rig::new(MockStore::with_words(&[(EE_SWITCH_THRESHOLD, 2)]));
    rig.hw.switch_pressed = true;
    rig.store.bytes[0x08] = 0x99;

    rig.send(&[OP_EEPROM_READ, 0x00]);
    // Tick 2 of the engagement run: the switch line goes out first.
    assert_eq!(rig.sink.take_wire(), "p\n\r");

    rig.send(&[0x08]);
    assert_eq!(rig.sink.take_wire(), "0 99\n\r");
}

#[test]
fn poll_uses_thresholds_from_store() {
    let store = MockStore::with_words(&[(EE_THRESHOLD_SONAR, 100), (EE_THRESHOLD_IR, 50)]);
    let mut rig = Rig::new(store);
    rig.hw = MockHardware::with_scene(50, 20);

    rig.send(&[OP_POLL_SONAR]);

    assert_eq!(rig.sink.wire_text(), "G 50 20\r\n");
}
