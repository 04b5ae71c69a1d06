//! Microswitch edge detection.
//!
//! ## Hardware
//!
//! Active-high microswitch sampled once per control-loop tick. There is no
//! ISR: the loop polls the line through [`SwitchPort`](crate::app::ports::SwitchPort).
//!
//! ## Behaviour
//!
//! The switch must stay engaged for `threshold` consecutive ticks; the
//! event fires on the tick where the run counter reaches the threshold and
//! never again until the switch is released. Thresholds 0 and 1 both fire
//! on the first engaged tick.
//!
//! | Input      | Counter           | Event                          |
//! |------------|-------------------|--------------------------------|
//! | engaged    | `count += 1`      | once, when `count` hits `thr`  |
//! | released   | `count = 0`       | none                           |

use embedded_hal::digital::InputPin;

use crate::app::ports::SwitchPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEvent;

/// Active-high microswitch on any `embedded-hal` input pin.
pub struct Microswitch<P> {
    pin: P,
}

impl<P: InputPin> Microswitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> SwitchPort for Microswitch<P> {
    fn switch_engaged(&mut self) -> bool {
        self.pin.is_high().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct SwitchDebounce {
    count: u32,
}

impl SwitchDebounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per control tick with the sampled input.
    pub fn tick(&mut self, engaged: bool, threshold: u16) -> Option<SwitchEvent> {
        if !engaged {
            self.count = 0;
            return None;
        }
        // u32 counter cannot revisit a u16 threshold by saturating.
        self.count = self.count.saturating_add(1);
        (self.count == u32::from(threshold.max(1))).then_some(SwitchEvent)
    }

    /// Length of the current engaged run.
    pub fn count(&self) -> u32 {
        self.count
    }
}
