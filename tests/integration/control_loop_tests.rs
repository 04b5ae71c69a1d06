//! Integration tests for the poll → classify → wire path and the
//! microswitch edge detection, driven through `NodeService::tick`.

use objnode::app::events::NodeEvent;
use objnode::app::service::NodeService;
use objnode::config::{
    EE_SWITCH_THRESHOLD, EE_THRESHOLD_IR, EE_THRESHOLD_SONAR, NodeConfig, WaitBudget,
};
use objnode::error::SensorError;
use objnode::protocol::{OP_EEPROM_WRITE, OP_POLL_SONAR};
use objnode::sensors::Distance;
use objnode::sensors::classifier::{Category, Classification};

use crate::mock_hw::{Inbox, MockHardware, MockStore, RecordingSink};

fn thresholds_store(sonar: u16, ir: u16, switch: u16) -> MockStore {
    MockStore::with_words(&[
        (EE_SWITCH_THRESHOLD, switch),
        (EE_THRESHOLD_SONAR, sonar),
        (EE_THRESHOLD_IR, ir),
    ])
}

fn poll(sonar: u16, infrared: u16) -> (RecordingSink, NodeService) {
    let mut store = thresholds_store(100, 50, 0xFFFF);
    let mut node = NodeService::new(NodeConfig::default(), &store);
    let mut hw = MockHardware::with_scene(sonar, infrared);
    let mut sink = RecordingSink::new();
    node.tick(&mut Inbox::new(&[OP_POLL_SONAR]), &mut hw, &mut store, &mut sink);
    (sink, node)
}

// ── Classification ────────────────────────────────────────────

#[test]
fn near_and_dark_sample_is_glass() {
    let (sink, _) = poll(50, 20);
    assert_eq!(
        sink.events,
        vec![NodeEvent::Classified(Classification {
            category: Category::Glass,
            distance: Distance { sonar: 50, infrared: 20 },
        })]
    );
    assert_eq!(sink.wire_text(), "G 50 20\r\n");
}

#[test]
fn far_but_dark_sample_is_disagreement() {
    let (sink, _) = poll(120, 20);
    assert_eq!(sink.wire_text(), "E 120 20\r\n");
}

#[test]
fn remaining_quadrants_reach_the_wire() {
    assert_eq!(poll(50, 80).0.wire_text(), "P 50 80\r\n");
    assert_eq!(poll(120, 80).0.wire_text(), "A 120 80\r\n");
}

#[test]
fn threshold_equality_counts_as_not_below() {
    assert_eq!(poll(100, 20).0.wire_text(), "E 100 20\r\n");
    assert_eq!(poll(50, 50).0.wire_text(), "P 50 50\r\n");
    assert_eq!(poll(100, 50).0.wire_text(), "A 100 50\r\n");
}

#[test]
fn armed_poll_runs_once_in_the_same_tick() {
    let mut store = thresholds_store(100, 50, 0xFFFF);
    let mut node = NodeService::new(NodeConfig::default(), &store);
    let mut hw = MockHardware::with_scene(10, 10);
    let mut sink = RecordingSink::new();
    let mut rx = Inbox::new(&[OP_POLL_SONAR]);

    node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    assert_eq!(hw.triggers, 1);
    assert!(!node.poll_armed());

    node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    assert_eq!(hw.triggers, 1, "flag is one-shot");
    assert_eq!(node.stats().polls_run, 1);
}

#[test]
fn bounded_echo_wait_reports_sensor_fault() {
    let mut store = thresholds_store(100, 50, 0xFFFF);
    let config = NodeConfig {
        echo_wait: WaitBudget::Spins(16),
        ..NodeConfig::default()
    };
    let mut node = NodeService::new(config, &store);
    let mut hw = MockHardware::with_scene(10, 10);
    hw.echo_dead = true;
    let mut sink = RecordingSink::new();

    node.tick(&mut Inbox::new(&[OP_POLL_SONAR]), &mut hw, &mut store, &mut sink);

    assert_eq!(
        sink.events,
        vec![NodeEvent::SensorFault(SensorError::EchoTimeout)]
    );
    assert!(sink.wire.is_empty());
    assert_eq!(node.stats().sensor_faults, 1);
}

// ── Microswitch ───────────────────────────────────────────────

fn switch_rig(threshold: u16) -> (NodeService, MockHardware, MockStore, RecordingSink) {
    let store = thresholds_store(100, 50, threshold);
    let node = NodeService::new(NodeConfig::default(), &store);
    (node, MockHardware::new(), store, RecordingSink::new())
}

#[test]
fn switch_held_five_ticks_trips_once_on_third() {
    let (mut node, mut hw, mut store, mut sink) = switch_rig(3);
    let mut rx = Inbox::new(&[]);
    hw.switch_pressed = true;

    let mut fired_on = Vec::new();
    for tick in 1..=5 {
        node.tick(&mut rx, &mut hw, &mut store, &mut sink);
        if sink.events.last() == Some(&NodeEvent::SwitchTripped) {
            fired_on.push(tick);
            sink.events.clear();
        }
    }

    assert_eq!(fired_on, vec![3]);
    assert_eq!(node.stats().switch_events, 1);
}

#[test]
fn switch_release_rearms_edge_detection() {
    let (mut node, mut hw, mut store, mut sink) = switch_rig(2);
    let mut rx = Inbox::new(&[]);

    for pressed in [true, true, true, false, true, true] {
        hw.switch_pressed = pressed;
        node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    }

    assert_eq!(sink.wire_text(), "p\n\rp\n\r");
}

#[test]
fn switch_threshold_follows_eeprom_writes() {
    let (mut node, mut hw, mut store, mut sink) = switch_rig(0xFFFF);
    let mut rx = Inbox::new(&[OP_EEPROM_WRITE, 0x00, 0x00, 0x02, 0x00, 0x01]);

    // Frame completes on tick 6; the switch is not pressed until then.
    for _ in 0..6 {
        node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    }
    assert_eq!(node.config().switch_threshold, 1);

    hw.switch_pressed = true;
    node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    assert_eq!(sink.wire_text(), "p\n\r");
}

#[test]
fn zero_switch_threshold_trips_once_per_press() {
    let (mut node, mut hw, mut store, mut sink) = switch_rig(0);
    let mut rx = Inbox::new(&[]);

    for pressed in [true, true, true, false, true] {
        hw.switch_pressed = pressed;
        node.tick(&mut rx, &mut hw, &mut store, &mut sink);
    }

    assert_eq!(sink.wire_text(), "p\n\rp\n\r");
    assert_eq!(node.stats().switch_events, 2);
}
