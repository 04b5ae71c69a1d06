//! Outbound ASCII line formatting.
//!
//! | Record          | Format                                   | Terminator |
//! |-----------------|------------------------------------------|------------|
//! | EEPROM read     | `"0 " HH`                                | LF CR      |
//! | Classification  | `code " " sonar " " infrared` (decimal)  | CR LF      |
//! | Switch tripped  | `'p'`                                    | LF CR      |
//! | Boot banner     | `"RST OBJ"` [`" - " cause`]              | LF CR      |
//!
//! The two terminator orders are both in use by deployed hosts and must be
//! kept byte-exact.

use core::fmt::Write;

use heapless::String;

use crate::app::events::NodeEvent;
use crate::sensors::classifier::{Category, Classification};

/// Longest line: `"E 65535 65535\r\n"`, with headroom.
pub const LINE_CAPACITY: usize = 24;

pub type Line = String<LINE_CAPACITY>;

pub const LF_CR: &str = "\n\r";
pub const CR_LF: &str = "\r\n";

/// Byte sent when the microswitch trips.
pub const SWITCH_CODE: char = 'p';

/// Wire code of a classification category.
pub fn category_code(category: Category) -> char {
    match category {
        Category::Glass => 'G',
        Category::Plastic => 'P',
        Category::Aluminum => 'A',
        Category::Disagreement => 'E',
    }
}

/// `"0 2A\n\r"`
pub fn eeprom_read_line(value: u8) -> Line {
    let mut line = Line::new();
    // Capacity covers every fixed-width line below; write! cannot fail.
    let _ = write!(line, "0 {value:02X}{LF_CR}");
    line
}

/// `"G 50 20\r\n"`
pub fn classification_line(result: &Classification) -> Line {
    let mut line = Line::new();
    let _ = write!(
        line,
        "{} {} {}{CR_LF}",
        category_code(result.category),
        result.distance.sonar,
        result.distance.infrared
    );
    line
}

pub fn switch_line() -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{SWITCH_CODE}{LF_CR}");
    line
}

pub fn banner_line(banner: &str) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{banner}{LF_CR}");
    line
}

/// Wire line for an event, or `None` for events that are silent on the wire.
pub fn format_event(event: &NodeEvent) -> Option<Line> {
    match event {
        NodeEvent::Started(cause) => Some(banner_line(cause.banner())),
        NodeEvent::EepromRead { value, .. } => Some(eeprom_read_line(*value)),
        NodeEvent::Classified(result) => Some(classification_line(result)),
        NodeEvent::SwitchTripped => Some(switch_line()),
        NodeEvent::EepromWritten { .. }
        | NodeEvent::EepromWriteFailed { .. }
        | NodeEvent::SensorFault(_)
        | NodeEvent::FrameRejected(_)
        | NodeEvent::ResetRequested => None,
    }
}
