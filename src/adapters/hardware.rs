//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the ranging driver and the microswitch, and reads the IR channel
//! through the ADC1 oneshot unit configured in
//! [`hw_init`](crate::drivers::hw_init). This is the only module besides
//! `hw_init` that touches actual hardware. On non-espidf targets the ADC,
//! timer and restart calls go to the simulation stubs.

use crate::app::ports::{AnalogPort, Edge, RangingPort, SwitchPort, SystemControl};
use crate::config::WaitBudget;
use crate::drivers::hw_init;
use crate::drivers::ping::TickCounter;
use crate::error::SensorError;
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, S> {
    ranging: R,
    switch: S,
    ir_channel: u32,
    ir_sample: u16,
}

impl<R: RangingPort, S: SwitchPort> HardwareAdapter<R, S> {
    pub fn new(ranging: R, switch: S) -> Self {
        Self {
            ranging,
            switch,
            ir_channel: pins::IR_ADC_CHANNEL,
            ir_sample: 0,
        }
    }
}

// ── RangingPort implementation ────────────────────────────────

impl<R: RangingPort, S> RangingPort for HardwareAdapter<R, S> {
    fn trigger_pulse(&mut self) {
        self.ranging.trigger_pulse();
    }

    fn echo_level(&mut self) -> bool {
        self.ranging.echo_level()
    }

    fn reset_timer(&mut self) {
        self.ranging.reset_timer();
    }

    fn read_timer(&mut self) -> u16 {
        self.ranging.read_timer()
    }

    fn wait_edge(&mut self, edge: Edge, budget: WaitBudget) -> Result<(), SensorError> {
        self.ranging.wait_edge(edge, budget)
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl<R, S> AnalogPort for HardwareAdapter<R, S> {
    /// The oneshot driver converts synchronously, so the sample is ready as
    /// soon as this returns.
    fn start_adc(&mut self) {
        self.ir_sample = hw_init::adc1_read(self.ir_channel);
    }

    fn adc_busy(&mut self) -> bool {
        false
    }

    fn read_adc(&mut self) -> u16 {
        self.ir_sample
    }
}

// ── SwitchPort / SystemControl ────────────────────────────────

impl<R, S: SwitchPort> SwitchPort for HardwareAdapter<R, S> {
    fn switch_engaged(&mut self) -> bool {
        self.switch.switch_engaged()
    }
}

impl<R, S> SystemControl for HardwareAdapter<R, S> {
    fn reset(&mut self) {
        hw_init::restart();
    }
}

/// Echo timer on the microsecond system clock. One tick is one
/// microsecond; readings saturate at `u16::MAX`.
#[derive(Debug, Default)]
pub struct EspTickCounter {
    start_us: i64,
}

impl TickCounter for EspTickCounter {
    fn reset(&mut self) {
        self.start_us = hw_init::uptime_us();
    }

    fn ticks(&mut self) -> u16 {
        let elapsed = hw_init::uptime_us().saturating_sub(self.start_us).max(0);
        u16::try_from(elapsed).unwrap_or(u16::MAX)
    }
}
