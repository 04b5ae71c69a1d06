//! Node service, the hexagonal core.
//!
//! [`NodeService`] owns every piece of loop state in one
//! [`DispatcherContext`] and runs the control loop one tick at a time. All
//! I/O flows through port traits injected at call sites, making the whole
//! service testable with mock adapters.
//!
//! ```text
//!  ByteSource ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          NodeService         │
//!  Hardware  ◀──▶ │  Dispatcher · Poller · Switch│ ◀──▶ PersistentStore
//!                 └──────────────────────────────┘
//! ```
//!
//! One tick:
//! 1. dispatch: pop at most one inbound byte and feed the dispatcher;
//! 2. execute: if a poll is armed, run a sampling cycle and classify it;
//! 3. switch: sample the microswitch and run edge detection.

use log::{info, warn};

use crate::config::{ConfigCache, NodeConfig};
use crate::diagnostics::{NodeStats, ResetCause};
use crate::drivers::switch::SwitchDebounce;
use crate::error::{Error, Result};
use crate::protocol::dispatcher::{CommandDispatcher, DispatchOutcome};
use crate::sensors::SensorPoller;
use crate::sensors::classifier::{Classification, classify};

use super::events::NodeEvent;
use super::ports::{
    AnalogPort, ByteSource, EventSink, PersistentStore, RangingPort, SwitchPort, SystemControl,
};

/// All state the control loop carries between ticks.
pub struct DispatcherContext {
    pub dispatcher: CommandDispatcher,
    pub config: ConfigCache,
    /// One-shot: set by POLL_SONAR, cleared when the cycle runs.
    pub poll_armed: bool,
    pub debounce: SwitchDebounce,
}

pub struct NodeService {
    ctx: DispatcherContext,
    poller: SensorPoller,
    stats: NodeStats,
}

impl NodeService {
    /// Build the service and load the config cache from the store.
    pub fn new(node_config: NodeConfig, store: &impl PersistentStore) -> Self {
        Self {
            ctx: DispatcherContext {
                dispatcher: CommandDispatcher::new(),
                config: ConfigCache::load(store),
                poll_armed: false,
                debounce: SwitchDebounce::new(),
            },
            poller: SensorPoller::new(node_config),
            stats: NodeStats::default(),
        }
    }

    /// Announce the boot (banner on the wire).
    pub fn start(&mut self, cause: ResetCause, sink: &mut impl EventSink) {
        info!("NodeService started ({:?})", cause);
        sink.emit(&NodeEvent::Started(cause));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop tick.
    ///
    /// Every hardware wait inside blocks the whole tick; nothing else is
    /// serviced until it returns.
    pub fn tick<H>(
        &mut self,
        rx: &mut impl ByteSource,
        hw: &mut H,
        store: &mut impl PersistentStore,
        sink: &mut impl EventSink,
    ) where
        H: RangingPort + AnalogPort + SwitchPort + SystemControl,
    {
        // 1. Dispatch
        if let Some(byte) = rx.pop() {
            if let Some(outcome) = self.ctx.dispatcher.feed(byte, store, &mut self.ctx.config) {
                self.apply_outcome(outcome, hw, sink);
            }
        }

        // 2. Armed sampling cycle
        if core::mem::take(&mut self.ctx.poll_armed) {
            self.stats.polls_run += 1;
            match self.run_poll(hw) {
                Ok(result) => sink.emit(&NodeEvent::Classified(result)),
                Err(Error::Sensor(e)) => {
                    warn!("poll: sampling cycle failed ({})", e);
                    self.stats.sensor_faults += 1;
                    sink.emit(&NodeEvent::SensorFault(e));
                }
                Err(e) => warn!("poll: {}", e),
            }
        }

        // 3. Microswitch
        let engaged = hw.switch_engaged();
        if self
            .ctx
            .debounce
            .tick(engaged, self.ctx.config.switch_threshold)
            .is_some()
        {
            self.stats.switch_events += 1;
            sink.emit(&NodeEvent::SwitchTripped);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &ConfigCache {
        &self.ctx.config
    }

    pub fn context(&self) -> &DispatcherContext {
        &self.ctx
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub fn poll_armed(&self) -> bool {
        self.ctx.poll_armed
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_poll(&self, hw: &mut (impl RangingPort + AnalogPort)) -> Result<Classification> {
        let distance = self.poller.poll_once(hw)?;
        Ok(Classification {
            category: classify(distance, self.ctx.config.thresholds()),
            distance,
        })
    }

    fn apply_outcome(
        &mut self,
        outcome: DispatchOutcome,
        hw: &mut impl SystemControl,
        sink: &mut impl EventSink,
    ) {
        if let DispatchOutcome::Rejected(reason) = outcome {
            self.stats.frames_rejected += 1;
            sink.emit(&NodeEvent::FrameRejected(reason));
            return;
        }
        self.stats.frames_completed += 1;

        match outcome {
            DispatchOutcome::Reset => {
                self.stats.log_summary();
                sink.emit(&NodeEvent::ResetRequested);
                hw.reset();
            }
            DispatchOutcome::EepromWritten { address, count } => {
                self.stats.bytes_stored += u32::from(count);
                sink.emit(&NodeEvent::EepromWritten { address, count });
            }
            DispatchOutcome::WriteFailed { address, error } => {
                sink.emit(&NodeEvent::EepromWriteFailed { address, error });
            }
            DispatchOutcome::EepromRead { address, value } => {
                sink.emit(&NodeEvent::EepromRead { address, value });
            }
            DispatchOutcome::PollArmed => self.ctx.poll_armed = true,
            DispatchOutcome::Rejected(_) => {}
        }
    }
}
