//! Station link state machine.
//!
//! The Wi-Fi stack delivers discrete [`NetEvent`]s on a channel (posted
//! from the system event loop by the adapter); a single consumer thread
//! applies the transition table here.  Keeping the state machine off the
//! callback thread means no transition ever runs in event-loop context.
//!
//! ```text
//!  sysloop callback ──▶ mpsc channel ──▶ ConnectivityManager ──▶ LinkSignal
//!                                              │
//!                                              └──▶ StationPort::join()
//! ```
//!
//! Reconnect policy: a `Disconnected` event immediately re-issues a join
//! attempt — no backoff, no attempt cap.  The device keeps trying for as
//! long as it is powered.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::StationPort;

// ───────────────────────────────────────────────────────────────
// Events and state
// ───────────────────────────────────────────────────────────────

/// Discrete network-stack events the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetEvent {
    /// The station interface finished starting.
    StationStart,
    /// DHCP assigned us an address; the link is usable.
    GotAddress,
    /// The station lost its association.
    Disconnected,
    /// Any event the state machine does not care about.
    Other,
}

/// Link state owned solely by [`ConnectivityManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Disconnected,
    Connecting,
    Connected,
}

// ───────────────────────────────────────────────────────────────
// Link signal
// ───────────────────────────────────────────────────────────────

/// Binary "link up" flag with real (condvar) suspension.
///
/// Set by `GotAddress`, cleared by `Disconnected`, waited on once at boot
/// before the control server starts.  `wait` takes an explicit bound so
/// tests never hang; the boot path passes the configured value, which
/// defaults to `None` (wait forever, as the shipped hardware does).
pub struct LinkSignal {
    up: Mutex<bool>,
    cond: Condvar,
}

impl LinkSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            up: Mutex::new(false),
            cond: Condvar::new(),
        })
    }

    pub fn set(&self) {
        let mut up = self.up.lock().unwrap_or_else(|e| e.into_inner());
        *up = true;
        self.cond.notify_all();
    }

    pub fn clear(&self) {
        let mut up = self.up.lock().unwrap_or_else(|e| e.into_inner());
        *up = false;
    }

    pub fn is_set(&self) -> bool {
        *self.up.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the signal is set.  Returns `false` if `timeout`
    /// elapsed first; with `timeout = None` the wait is unbounded.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let mut up = self.up.lock().unwrap_or_else(|e| e.into_inner());
        match timeout {
            None => {
                while !*up {
                    up = self.cond.wait(up).unwrap_or_else(|e| e.into_inner());
                }
                true
            }
            Some(bound) => {
                let (guard, result) = self
                    .cond
                    .wait_timeout_while(up, bound, |up| !*up)
                    .unwrap_or_else(|e| e.into_inner());
                drop(guard);
                !result.timed_out()
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity manager
// ───────────────────────────────────────────────────────────────

/// Applies the link transition table to incoming [`NetEvent`]s.
pub struct ConnectivityManager<S: StationPort> {
    station: S,
    state: ConnectivityState,
    signal: Arc<LinkSignal>,
}

impl<S: StationPort> ConnectivityManager<S> {
    pub fn new(station: S, signal: Arc<LinkSignal>) -> Self {
        Self {
            station,
            state: ConnectivityState::Disconnected,
            signal,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Apply one event to the transition table.
    pub fn handle_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::StationStart => {
                info!("link: station started, joining");
                self.station.join();
                self.state = ConnectivityState::Connecting;
            }
            NetEvent::GotAddress => {
                info!("link: got address, link up");
                self.state = ConnectivityState::Connected;
                self.signal.set();
            }
            NetEvent::Disconnected => {
                warn!("link: disconnected, rejoining");
                self.signal.clear();
                self.station.join();
                self.state = ConnectivityState::Connecting;
            }
            NetEvent::Other => {
                debug!("link: ignoring unrelated event");
            }
        }
    }

    /// Consume events until the sending side hangs up.
    ///
    /// Runs on its own thread for the process lifetime; the channel only
    /// closes when every adapter subscription is dropped, which on the
    /// device never happens.
    pub fn run(mut self, events: Receiver<NetEvent>) {
        while let Ok(event) = events.recv() {
            self.handle_event(event);
        }
        warn!("link: event channel closed, consumer exiting");
    }
}
