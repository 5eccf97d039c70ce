//! System configuration parameters.
//!
//! Wi-Fi credentials are baked in at build time via the
//! `SELECTOR_WIFI_SSID` / `SELECTOR_WIFI_PASS` environment variables;
//! everything else is a tunable default.  Nothing here is persisted —
//! the only durable state on this device is the relay selection itself.

use core::time::Duration;

/// Core system configuration.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    // --- Wi-Fi station ---
    /// SSID of the network to join (build-time).
    pub ssid: &'static str,
    /// WPA2 passphrase; empty for an open network (build-time).
    pub passphrase: &'static str,

    // --- Control server ---
    /// TCP port the control server listens on.
    pub http_port: u16,

    // --- Waits ---
    /// Upper bound on the boot-time wait for the link signal.
    /// `None` blocks until the station gets an address, matching the
    /// behavior of the shipped hardware.
    pub link_wait: Option<Duration>,
    /// Per-connection read timeout. `None` means a silent client holds
    /// the server forever (single-connection serving is deliberate).
    pub client_read_timeout: Option<Duration>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ssid: option_env!("SELECTOR_WIFI_SSID").unwrap_or(""),
            passphrase: option_env!("SELECTOR_WIFI_PASS").unwrap_or(""),
            http_port: 80,
            link_wait: None,
            client_read_timeout: None,
        }
    }
}
