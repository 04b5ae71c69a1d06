//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                  |
//! |------------|-------------------|------------------------------|
//! | `eeprom`   | PersistentStore   | NVS blob / in-memory image   |
//! | `hardware` | RangingPort       | PING driver (GPIO + timer)   |
//! |            | AnalogPort        | ESP32 ADC1 oneshot           |
//! |            | SwitchPort        | Microswitch GPIO             |
//! |            | SystemControl     | esp_restart                  |
//! | `log_sink` | EventSink         | Log output                   |
//! | `serial`   | EventSink         | Host-link UART               |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod serial;
