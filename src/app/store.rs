//! Persisted relay selection.
//!
//! One byte in NVS, sharing its encoding with the wire command code:
//! 0 = no relay selected, N (1–5) = relay index N−1.
//!
//! Failure policy matches the shipped hardware: the device must keep
//! switching inputs even with worn-out flash, so storage errors never
//! propagate.  A read failure degrades to 0 (nothing selected) and a write
//! failure is logged and dropped — the in-memory selection still changes,
//! which can leave the stored value one command behind after a crash.

use log::warn;

use super::ports::{StorageError, StoragePort};

/// Highest valid command code (0 = none, 1–5 = relay 0–4).
pub const MAX_COMMAND_CODE: u8 = 5;

/// Log-and-degrade wrapper over a [`StoragePort`].
pub struct SelectionStore<S: StoragePort> {
    backend: S,
}

impl<S: StoragePort> SelectionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Last stored command code, or 0 if the slot was never written or
    /// cannot be read.
    pub fn get(&self) -> u8 {
        match self.backend.read_value() {
            Ok(v) if v <= MAX_COMMAND_CODE => v,
            Ok(v) => {
                warn!("store: stored value {} out of range, treating as 0", v);
                0
            }
            Err(StorageError::NotFound) => 0,
            Err(e) => {
                warn!("store: read failed ({}), treating as 0", e);
                0
            }
        }
    }

    /// Persist a command code.  Failures are logged and dropped.
    pub fn set(&mut self, value: u8) {
        if let Err(e) = self.backend.write_value(value) {
            warn!("store: write of {} failed ({}), selection not persisted", value, e);
        }
    }
}
