//! Peripheral drivers, hardware initialisation, and input edge detection.

pub mod hw_init;
pub mod ping;
pub mod switch;
