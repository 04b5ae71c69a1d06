//! Sonar + infrared sampling.
//!
//! [`SensorPoller`] drives one complete cycle through the ranging and
//! analog ports and returns both readings together as a [`Distance`].
//!
//! ```text
//! trigger ─▶ wait ↑ ─▶ reset timer ─▶ wait ↓ ─▶ ticks/4 ─▶ ADC ─▶ Distance
//! ```

pub mod classifier;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::{AnalogPort, Edge, RangingPort};
use crate::config::NodeConfig;
use crate::error::SensorError;

/// Echo timer ticks per distance unit (timer runs at 4 ticks per unit).
pub const TICKS_PER_UNIT: u16 = 4;

/// One sampling result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Distance {
    pub sonar: u16,
    pub infrared: u16,
}

pub struct SensorPoller {
    config: NodeConfig,
}

impl SensorPoller {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    /// Run one sampling cycle. Blocks for the whole echo round trip and the
    /// IR conversion; only a bounded [`WaitBudget`](crate::config::WaitBudget)
    /// can make it fail.
    pub fn poll_once(
        &self,
        hw: &mut (impl RangingPort + AnalogPort),
    ) -> Result<Distance, SensorError> {
        hw.trigger_pulse();
        hw.wait_edge(Edge::Rising, self.config.echo_wait)?;
        hw.reset_timer();
        hw.wait_edge(Edge::Falling, self.config.echo_wait)?;
        let ticks = hw.read_timer();
        let sonar = ticks / TICKS_PER_UNIT;

        hw.start_adc();
        let mut spins = 0u32;
        while hw.adc_busy() {
            if self.config.adc_wait.exhausted(spins) {
                return Err(SensorError::AdcTimeout);
            }
            spins = spins.saturating_add(1);
        }
        let infrared = hw.read_adc();

        debug!("poll: echo={} ticks sonar={} ir={}", ticks, sonar, infrared);
        Ok(Distance { sonar, infrared })
    }
}
