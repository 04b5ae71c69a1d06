//! One-shot hardware peripheral initialization and raw peripheral access.
//!
//! Configures the IR ADC channel and the host-link UART using raw ESP-IDF
//! sys calls. Called once from `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real ADC1 oneshot, UART driver, esp_timer and reset-reason
//! calls. On host/test: inert stubs; the IR reading comes from a static
//! `AtomicU16` for injection.

use crate::diagnostics::ResetFlags;
use crate::error::Result;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_IR_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_ir_adc(raw: u16) {
    SIM_IR_ADC.store(raw, Ordering::Relaxed);
}

/// UART driver RX ring size (bytes).
#[cfg(target_os = "espidf")]
const UART_RX_BUF: i32 = 256;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit"));
    }

    // 10-bit conversions keep readings on the scale the IR thresholds use.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_10,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), pins::IR_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 IR channel"));
    }

    info!("hw_init: ADC1 configured (CH{}=IR)", pins::IR_ADC_CHANNEL);
    Ok(())
}

/// Blocking oneshot conversion.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    SIM_IR_ADC.load(Ordering::Relaxed)
}

// ── Host-link UART ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<()> {
    let cfg = uart_config_t {
        baud_rate: pins::HOST_UART_BAUD,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let port = pins::HOST_UART_PORT;
    let ret = unsafe { uart_param_config(port, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("UART params"));
    }
    let ret = unsafe {
        uart_set_pin(
            port,
            pins::HOST_UART_TX_GPIO,
            pins::HOST_UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("UART pins"));
    }
    let ret = unsafe {
        uart_driver_install(port, UART_RX_BUF * 2, 0, 0, core::ptr::null_mut(), 0)
    };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("UART driver"));
    }
    info!("hw_init: UART{} at {} baud", port, pins::HOST_UART_BAUD);
    Ok(())
}

/// Wait up to `timeout_ms` for one received byte.
#[cfg(target_os = "espidf")]
pub fn uart_read_byte(timeout_ms: u32) -> Option<u8> {
    let mut byte = 0u8;
    let ticks = timeout_ms * configTICK_RATE_HZ / 1000;
    // SAFETY: UART driver installed in init_uart(); the RX pump thread is
    // the only reader.
    let n = unsafe {
        uart_read_bytes(pins::HOST_UART_PORT, (&raw mut byte).cast(), 1, ticks)
    };
    (n == 1).then_some(byte)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read_byte(timeout_ms: u32) -> Option<u8> {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(timeout_ms)));
    None
}

/// Queue bytes for transmission; blocks while the TX FIFO is full.
#[cfg(target_os = "espidf")]
pub fn uart_write(bytes: &[u8]) {
    // SAFETY: UART driver installed in init_uart(); main loop is the only writer.
    unsafe {
        uart_write_bytes(pins::HOST_UART_PORT, bytes.as_ptr().cast(), bytes.len());
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(_bytes: &[u8]) {}

// ── Timer ─────────────────────────────────────────────────────

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn uptime_us() -> i64 {
    // SAFETY: esp_timer_get_time is a read of the RTC-backed counter.
    unsafe { esp_timer_get_time() }
}

#[cfg(not(target_os = "espidf"))]
pub fn uptime_us() -> i64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static BOOT: OnceLock<Instant> = OnceLock::new();
    let elapsed = BOOT.get_or_init(Instant::now).elapsed();
    i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX)
}

// ── Reset ─────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn reset_flags() -> ResetFlags {
    // SAFETY: read-only query of the ROM reset reason.
    let reason = unsafe { esp_reset_reason() };
    #[allow(non_upper_case_globals)]
    match reason {
        esp_reset_reason_t_ESP_RST_TASK_WDT
        | esp_reset_reason_t_ESP_RST_INT_WDT
        | esp_reset_reason_t_ESP_RST_WDT => ResetFlags {
            watchdog: true,
            ..ResetFlags::default()
        },
        esp_reset_reason_t_ESP_RST_EXT => ResetFlags {
            master_clear: true,
            ..ResetFlags::default()
        },
        esp_reset_reason_t_ESP_RST_POWERON => ResetFlags {
            power_on: true,
            ..ResetFlags::default()
        },
        esp_reset_reason_t_ESP_RST_BROWNOUT => ResetFlags {
            brown_out: true,
            ..ResetFlags::default()
        },
        _ => ResetFlags::default(),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn reset_flags() -> ResetFlags {
    ResetFlags {
        power_on: true,
        ..ResetFlags::default()
    }
}

/// Full software reset.
#[cfg(target_os = "espidf")]
pub fn restart() {
    // SAFETY: esp_restart never returns.
    unsafe { esp_restart() }
}

#[cfg(not(target_os = "espidf"))]
pub fn restart() {
    log::warn!("hw_init(sim): restart requested, ignored on host");
}
