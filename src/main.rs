//! Object node firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter        EepromAdapter     SerialSink       │
//! │  (Ranging+Analog+       (PersistentStore) LogEventSink     │
//! │   Switch+System)                          (EventSink)      │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │           NodeService (pure logic)               │      │
//! │  │  Dispatcher · ConfigCache · Poller · Debounce    │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  UART RX pump thread ──▶ spsc byte queue ──▶ control loop  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info, warn};

use objnode::adapters::eeprom::EepromAdapter;
use objnode::adapters::hardware::{EspTickCounter, HardwareAdapter};
use objnode::adapters::log_sink::LogEventSink;
use objnode::adapters::serial::{SerialSink, UartTx};
use objnode::app::service::NodeService;
use objnode::config::NodeConfig;
use objnode::diagnostics::ResetCause;
use objnode::drivers::hw_init;
use objnode::drivers::ping::PingSensor;
use objnode::drivers::switch::Microswitch;
use objnode::events::{RxQueue, push_rx_byte, rx_overruns};

/// RX pump: how long one blocking UART read may wait.
const RX_POLL_MS: u32 = 10;

/// Control-loop tick period. Debounce thresholds count these ticks.
const TICK_MS: u32 = 1;

const RX_TASK_STACK: usize = 4096;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("objnode v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // The task watchdog resets the node once this loop starves it.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = Peripherals::take()?;
    // Pin numbers match pins::PING_TRIGGER_GPIO, pins::PING_ECHO_GPIO and
    // pins::MICROSWITCH_GPIO.
    let trigger = PinDriver::output(peripherals.pins.gpio4)?;
    let echo = PinDriver::input(peripherals.pins.gpio5)?;
    let mut switch_pin = PinDriver::input(peripherals.pins.gpio7)?;
    switch_pin.set_pull(Pull::Down)?;

    let ping = PingSensor::new(trigger, echo, Ets, EspTickCounter::default());
    let mut hw = HardwareAdapter::new(ping, Microswitch::new(switch_pin));

    // ── 3. Persistent store + config cache ────────────────────
    let mut store = match EepromAdapter::new() {
        Ok(s) => s,
        Err(e) => {
            warn!("EEPROM init failed ({}), running from an erased image", e);
            EepromAdapter::with_contents(&[])
        }
    };
    let mut service = NodeService::new(NodeConfig::default(), &store);

    // ── 4. Inbound byte queue + RX pump ───────────────────────
    let queue: &'static mut RxQueue = Box::leak(Box::new(RxQueue::new()));
    let (mut producer, mut consumer) = queue.split();
    std::thread::Builder::new()
        .name("uart_rx".into())
        .stack_size(RX_TASK_STACK)
        .spawn(move || {
            loop {
                if let Some(byte) = hw_init::uart_read_byte(RX_POLL_MS) {
                    if !push_rx_byte(&mut producer, byte) {
                        warn!("uart_rx: queue full, byte dropped ({} total)", rx_overruns());
                    }
                }
            }
        })?;

    // ── 5. Banner ─────────────────────────────────────────────
    let mut sink = (SerialSink::new(UartTx), LogEventSink::new());
    service.start(ResetCause::from_flags(hw_init::reset_flags()), &mut sink);

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        service.tick(&mut consumer, &mut hw, &mut store, &mut sink);
        FreeRtos::delay_ms(TICK_MS);
    }
}
