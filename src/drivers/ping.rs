//! Ultrasonic ranging driver (Parallax PING-style trigger/echo).
//!
//! Generic over `embedded-hal` 1.0 pins and delay, so the same driver runs
//! on the ESP-IDF `PinDriver`s and on host test doubles. Echo timing comes
//! from a free-running [`TickCounter`].
//!
//! Trigger sequence: line low 2 µs, high 5 µs, low; then the sensor raises
//! the echo line for the round-trip time.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::RangingPort;

const TRIGGER_SETTLE_US: u32 = 2;
const TRIGGER_PULSE_US: u32 = 5;

/// Free-running echo timer.
pub trait TickCounter {
    fn reset(&mut self);
    fn ticks(&mut self) -> u16;
}

pub struct PingSensor<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    counter: C,
}

impl<T, E, D, C> PingSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: TickCounter,
{
    pub fn new(trigger: T, echo: E, delay: D, counter: C) -> Self {
        Self {
            trigger,
            echo,
            delay,
            counter,
        }
    }
}

impl<T, E, D, C> RangingPort for PingSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: TickCounter,
{
    fn trigger_pulse(&mut self) {
        // GPIO writes on the supported targets are infallible.
        let _ = self.trigger.set_low();
        self.delay.delay_us(TRIGGER_SETTLE_US);
        let _ = self.trigger.set_high();
        self.delay.delay_us(TRIGGER_PULSE_US);
        let _ = self.trigger.set_low();
    }

    fn echo_level(&mut self) -> bool {
        self.echo.is_high().unwrap_or(false)
    }

    fn reset_timer(&mut self) {
        self.counter.reset();
    }

    fn read_timer(&mut self) -> u16 {
        self.counter.ticks()
    }
}
