//! Reset-cause banner and runtime counters.
//!
//! The banner is the first line the node sends after boot; hosts use it to
//! detect unexpected resets. Counters are kept in RAM only and logged
//! before a commanded reset.

use log::info;
use serde::{Deserialize, Serialize};

/// Why the node last came out of reset, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    Watchdog,
    MasterClear,
    PowerOn,
    BrownOut,
    Unknown,
}

/// Raw reset flags as reported by the hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetFlags {
    pub watchdog: bool,
    pub master_clear: bool,
    pub power_on: bool,
    pub brown_out: bool,
}

impl ResetCause {
    /// Pick the cause to report; when several flags are set the earlier
    /// one in the list wins.
    pub fn from_flags(flags: ResetFlags) -> Self {
        if flags.watchdog {
            Self::Watchdog
        } else if flags.master_clear {
            Self::MasterClear
        } else if flags.power_on {
            Self::PowerOn
        } else if flags.brown_out {
            Self::BrownOut
        } else {
            Self::Unknown
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            Self::Watchdog => "RST OBJ - WDT",
            Self::MasterClear => "RST OBJ - MCLR",
            Self::PowerOn => "RST OBJ - POR",
            Self::BrownOut => "RST OBJ - BOR",
            Self::Unknown => "RST OBJ",
        }
    }
}

/// Runtime counters, reset with the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    pub frames_completed: u32,
    pub frames_rejected: u32,
    pub bytes_stored: u32,
    pub polls_run: u32,
    pub sensor_faults: u32,
    pub switch_events: u32,
}

impl NodeStats {
    pub fn log_summary(&self) {
        info!(
            "STATS | frames ok={} rejected={} | stored={}B | polls={} faults={} | switch={}",
            self.frames_completed,
            self.frames_rejected,
            self.bytes_stored,
            self.polls_run,
            self.sensor_faults,
            self.switch_events,
        );
    }
}
