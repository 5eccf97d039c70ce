//! Relay exclusivity controller.
//!
//! Owns the invariant that at most one of the five relay outputs is
//! asserted at any time.  The audio path depends on this: two input
//! relays closed together would short two sources into the preamp.
//!
//! [`activate`](RelayController::activate) deliberately does **not** clear
//! the other outputs first — callers must call
//! [`clear_all`](RelayController::clear_all) before activating, so that
//! every transition passes through an all-off intermediate state (break
//! before make).

use log::{info, warn};

use crate::pins::RELAY_COUNT;

use super::ports::RelayPort;

/// Enforces "at most one relay active" over a [`RelayPort`].
pub struct RelayController<P: RelayPort> {
    outputs: P,
    selection: Option<usize>,
}

impl<P: RelayPort> RelayController<P> {
    /// Take ownership of the output port and drive everything off.
    pub fn new(outputs: P) -> Self {
        let mut ctl = Self {
            outputs,
            selection: None,
        };
        ctl.clear_all();
        ctl
    }

    /// Drive every relay output to logical low.
    pub fn clear_all(&mut self) {
        for index in 0..RELAY_COUNT {
            self.outputs.drive(index, false);
        }
        self.selection = None;
    }

    /// Drive output `index` high.
    ///
    /// Contract: the caller has already called [`clear_all`]; this method
    /// does not clear the other outputs.
    pub fn activate(&mut self, index: usize) {
        if index >= RELAY_COUNT {
            warn!("relay: activate({}) out of range, ignored", index);
            return;
        }
        self.outputs.drive(index, true);
        self.selection = Some(index);
        info!("relay: input {} selected", index);
    }

    /// Re-apply a persisted command code at boot: all off, then the stored
    /// selection if there was one (0 = nothing selected).
    pub fn restore(&mut self, persisted_value: u8) {
        self.clear_all();
        if persisted_value != 0 {
            self.activate(persisted_value as usize - 1);
        }
    }

    /// Currently selected relay index, if any.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Borrow the underlying port (used by tests to inspect pin state).
    pub fn outputs(&self) -> &P {
        &self.outputs
    }
}
