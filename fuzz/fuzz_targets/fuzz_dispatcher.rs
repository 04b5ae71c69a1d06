//! Fuzz target: `CommandDispatcher::feed`
//!
//! Drives arbitrary byte streams into the dispatcher one byte at a time and
//! asserts that it never panics, never holds more parameters than the frame
//! buffer allows, and leaves the config cache consistent with the store
//! after every completed write.
//!
//! cargo fuzz run fuzz_dispatcher

#![no_main]

use libfuzzer_sys::fuzz_target;
use objnode::adapters::eeprom::EepromAdapter;
use objnode::config::ConfigCache;
use objnode::protocol::FRAME_CAPACITY;
use objnode::protocol::dispatcher::{CommandDispatcher, DispatchOutcome};
use objnode::protocol::response::eeprom_read_line;

fuzz_target!(|data: &[u8]| {
    let mut store = EepromAdapter::with_contents(&[]);
    let mut config = ConfigCache::load(&store);
    let mut dispatcher = CommandDispatcher::new();

    for &byte in data {
        let outcome = dispatcher.feed(byte, &mut store, &mut config);
        assert!(dispatcher.parameter_count() <= FRAME_CAPACITY);

        match outcome {
            Some(DispatchOutcome::EepromWritten { .. } | DispatchOutcome::WriteFailed { .. }) => {
                assert_eq!(config, ConfigCache::load(&store));
            }
            Some(DispatchOutcome::EepromRead { value, .. }) => {
                assert_eq!(eeprom_read_line(value).len(), 6);
            }
            _ => {}
        }
        if outcome.is_some() {
            assert!(dispatcher.is_idle());
        }
    }
});
