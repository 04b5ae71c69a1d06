//! GPIO / peripheral pin assignments for the object node board.
//!
//! Every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sonar (PING-style ranging module)
// ---------------------------------------------------------------------------

/// Digital output: trigger pulse to the ranging module.
pub const PING_TRIGGER_GPIO: i32 = 4;
/// Digital input: echo line, high for the round-trip time.
pub const PING_ECHO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Infrared reflectance sensor, analog (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const IR_ADC_CHANNEL: u32 = 5;

// ---------------------------------------------------------------------------
// Microswitch (active high)
// ---------------------------------------------------------------------------

pub const MICROSWITCH_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Host link UART
// ---------------------------------------------------------------------------

pub const HOST_UART_PORT: i32 = 1;
pub const HOST_UART_TX_GPIO: i32 = 17;
pub const HOST_UART_RX_GPIO: i32 = 18;
pub const HOST_UART_BAUD: i32 = 9_600;
