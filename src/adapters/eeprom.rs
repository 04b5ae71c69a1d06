//! EEPROM emulation on top of NVS (Non-Volatile Storage).
//!
//! Implements [`PersistentStore`] as a 1 KiB byte array. Reads are served
//! from a RAM mirror; every write updates the mirror and commits the whole
//! image to NVS as a single blob, so a write is durable once it returns.
//!
//! Addresses wrap modulo the store size. Bytes never written read as
//! `0xFF`, like an erased part.

use crate::app::ports::PersistentStore;
use crate::error::StoreError;
use log::info;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Addressable bytes.
pub const EEPROM_SIZE: usize = 1024;

/// Value of an unprogrammed cell.
pub const ERASED: u8 = 0xFF;

#[cfg(target_os = "espidf")]
const NAMESPACE: &[u8] = b"objnode\0";
#[cfg(target_os = "espidf")]
const IMAGE_KEY: &[u8] = b"eeprom\0";

pub struct EepromAdapter {
    image: [u8; EEPROM_SIZE],
}

impl EepromAdapter {
    /// Initialise NVS flash and load the stored image.
    ///
    /// On first boot (or after a partition version change) the partition is
    /// erased and the store starts fully erased.
    pub fn new() -> Result<Self, StoreError> {
        #[allow(unused_mut)]
        let mut image = [ERASED; EEPROM_SIZE];

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS use.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("EepromAdapter: erasing and re-initialising NVS partition");
                if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StoreError::Io);
                }
            } else if ret != ESP_OK {
                return Err(StoreError::Io);
            }

            match Self::with_nvs_handle(false, |handle| {
                let mut size = EEPROM_SIZE;
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        IMAGE_KEY.as_ptr() as *const _,
                        image.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(size)
            }) {
                Ok(size) => info!("EepromAdapter: loaded {} byte image from NVS", size),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("EepromAdapter: no stored image, starting erased")
                }
                Err(e) => warn!("EepromAdapter: NVS read error {}, starting erased", e),
            }
        }

        #[cfg(not(target_os = "espidf"))]
        info!("EepromAdapter: simulation backend");

        Ok(Self { image })
    }

    /// Seed the store from an existing image. Bytes past `contents` stay
    /// erased.
    pub fn with_contents(contents: &[u8]) -> Self {
        let mut image = [ERASED; EEPROM_SIZE];
        let len = contents.len().min(EEPROM_SIZE);
        image[..len].copy_from_slice(&contents[..len]);
        Self { image }
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    fn index(address: u16) -> usize {
        usize::from(address) % EEPROM_SIZE
    }

    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let ret = unsafe { nvs_open(NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn commit(&self) -> Result<(), StoreError> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    IMAGE_KEY.as_ptr() as *const _,
                    self.image.as_ptr() as *const _,
                    EEPROM_SIZE,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
        .map_err(|e| {
            warn!("EepromAdapter: NVS commit error {}", e);
            StoreError::Io
        })
    }
}

impl PersistentStore for EepromAdapter {
    fn read(&self, address: u16) -> u8 {
        self.image[Self::index(address)]
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), StoreError> {
        let idx = Self::index(address);
        #[cfg(target_os = "espidf")]
        {
            let previous = self.image[idx];
            if previous == value {
                return Ok(());
            }
            self.image[idx] = value;
            if let Err(e) = self.commit() {
                self.image[idx] = previous;
                return Err(e);
            }
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.image[idx] = value;
        }
        Ok(())
    }
}
