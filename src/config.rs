//! Node configuration.
//!
//! Two layers:
//! - [`ConfigCache`]: the four thresholds persisted in the EEPROM, mirrored
//!   in RAM and refreshed at boot and after every completed EEPROM write.
//! - [`NodeConfig`]: build-time tunables that never live in the store.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::PersistentStore;

// ---------------------------------------------------------------------------
// EEPROM address map (high byte at the lower address)
// ---------------------------------------------------------------------------

pub const EE_SWITCH_THRESHOLD: u16 = 0x00;
pub const EE_SONAR_DIVIDER: u16 = 0x02;
pub const EE_THRESHOLD_SONAR: u16 = 0x04;
pub const EE_THRESHOLD_IR: u16 = 0x06;

/// In-RAM mirror of the EEPROM-backed parameters.
///
/// Only [`refresh`](Self::refresh) mutates it, and it runs to completion on
/// the loop thread, so no other component ever sees a half-updated cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCache {
    /// Ticks the microswitch must stay engaged before an event fires.
    pub switch_threshold: u16,
    /// Echo tick divider as stored; the ranging conversion uses the
    /// hardware's calibrated resolution.
    pub sonar_divider: u16,
    /// Sonar distance below which the object counts as "near".
    pub threshold_sonar: u16,
    /// IR reading below which the object counts as "dark".
    pub threshold_ir: u16,
}

impl Default for ConfigCache {
    /// Values an erased EEPROM (all cells 0xFF) assembles to.
    fn default() -> Self {
        Self {
            switch_threshold: 0xFFFF,
            sonar_divider: 0xFFFF,
            threshold_sonar: 0xFFFF,
            threshold_ir: 0xFFFF,
        }
    }
}

impl ConfigCache {
    /// Build a cache by reading the store once.
    pub fn load(store: &impl PersistentStore) -> Self {
        let mut cache = Self::default();
        cache.refresh(store);
        cache
    }

    /// Re-read all four parameters from the store and overwrite the cache.
    pub fn refresh(&mut self, store: &impl PersistentStore) {
        *self = Self {
            switch_threshold: read_u16(store, EE_SWITCH_THRESHOLD),
            sonar_divider: read_u16(store, EE_SONAR_DIVIDER),
            threshold_sonar: read_u16(store, EE_THRESHOLD_SONAR),
            threshold_ir: read_u16(store, EE_THRESHOLD_IR),
        };
        info!(
            "config: switch={} divider={} sonar<{} ir<{}",
            self.switch_threshold, self.sonar_divider, self.threshold_sonar, self.threshold_ir
        );
    }

    /// The two classification thresholds.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            sonar: self.threshold_sonar,
            ir: self.threshold_ir,
        }
    }
}

fn read_u16(store: &impl PersistentStore, address: u16) -> u16 {
    u16::from_be_bytes([store.read(address), store.read(address.wrapping_add(1))])
}

/// Classification thresholds extracted from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub sonar: u16,
    pub ir: u16,
}

// ---------------------------------------------------------------------------
// Build-time tunables
// ---------------------------------------------------------------------------

/// How long a hardware busy-wait may spin before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaitBudget {
    /// Block until the condition holds (the device's native behaviour).
    #[default]
    Unbounded,
    /// Give up after this many polls of the condition.
    Spins(u32),
}

impl WaitBudget {
    /// Whether `spins` polls have used up the budget.
    pub fn exhausted(self, spins: u32) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Spins(max) => spins >= max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Budget for each echo edge wait.
    pub echo_wait: WaitBudget,
    /// Budget for the IR conversion wait.
    pub adc_wait: WaitBudget,
}
