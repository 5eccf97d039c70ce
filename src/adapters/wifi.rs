//! Wi-Fi station adapter.
//!
//! Implements [`StationPort`] and feeds the link state machine: the ESP-IDF
//! system event loop delivers Wi-Fi/IP events on its own thread, and the
//! subscriptions here do nothing but translate them into [`NetEvent`]s and
//! send them down the channel.  No link state is touched in callback
//! context.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF Wi-Fi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests; `start()`
//!   posts `StationStart` itself so the full boot flow runs without radio.

use core::fmt;
use std::sync::mpsc::Sender;

use log::info;

use crate::app::ports::StationPort;
use crate::net::link::NetEvent;

#[cfg(target_os = "espidf")]
use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
#[cfg(target_os = "espidf")]
use esp_idf_svc::ipv4::IpEvent;
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi, WifiEvent};

// ───────────────────────────────────────────────────────────────
// Credential validation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    InvalidSsid,
    InvalidPassphrase,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassphrase => {
                write!(f, "passphrase invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CredentialsError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CredentialsError::InvalidSsid);
    }
    Ok(())
}

fn validate_passphrase(passphrase: &str) -> Result<(), CredentialsError> {
    if passphrase.is_empty() {
        return Ok(());
    }
    if passphrase.len() < 8 || passphrase.len() > 64 {
        return Err(CredentialsError::InvalidPassphrase);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Event mapping
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn map_wifi_event(event: &WifiEvent<'_>) -> NetEvent {
    match event {
        WifiEvent::StaStarted => NetEvent::StationStart,
        WifiEvent::StaDisconnected(_) => NetEvent::Disconnected,
        _ => NetEvent::Other,
    }
}

#[cfg(target_os = "espidf")]
fn map_ip_event(event: &IpEvent) -> NetEvent {
    match event {
        IpEvent::DhcpIpAssigned(_) => NetEvent::GotAddress,
        _ => NetEvent::Other,
    }
}

// ───────────────────────────────────────────────────────────────
// Station adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,
    #[cfg(target_os = "espidf")]
    _wifi_sub: EspSubscription<'static, System>,
    #[cfg(target_os = "espidf")]
    _ip_sub: EspSubscription<'static, System>,
    #[cfg(not(target_os = "espidf"))]
    events: Sender<NetEvent>,
    #[cfg(not(target_os = "espidf"))]
    join_attempts: u32,
}

impl WifiAdapter {
    /// Construct the station, apply the client configuration, and wire the
    /// event subscriptions onto `events`.  Does not start the radio —
    /// call [`start`](Self::start) once the consumer thread is running.
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: EspSystemEventLoop,
        ssid: &str,
        passphrase: &str,
        events: Sender<NetEvent>,
    ) -> anyhow::Result<Self> {
        validate_ssid(ssid).map_err(|e| anyhow::anyhow!("{}", e))?;
        validate_passphrase(passphrase).map_err(|e| anyhow::anyhow!("{}", e))?;

        let mut wifi = EspWifi::new(modem, sysloop.clone(), None)?;

        let mut ssid_buf: heapless::String<32> = heapless::String::new();
        ssid_buf
            .push_str(ssid)
            .map_err(|()| anyhow::anyhow!("SSID too long"))?;
        let mut pass_buf: heapless::String<64> = heapless::String::new();
        pass_buf
            .push_str(passphrase)
            .map_err(|()| anyhow::anyhow!("passphrase too long"))?;

        let auth_method = if passphrase.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: ssid_buf.clone(),
            password: pass_buf,
            auth_method,
            ..Default::default()
        }))?;

        let wifi_tx = events.clone();
        let wifi_sub = sysloop.subscribe::<WifiEvent, _>(move |event| {
            // Callback context: translate and send, nothing else.
            let _ = wifi_tx.send(map_wifi_event(&event));
        })?;

        let ip_tx = events;
        let ip_sub = sysloop.subscribe::<IpEvent, _>(move |event| {
            let _ = ip_tx.send(map_ip_event(&event));
        })?;

        Ok(Self {
            ssid: ssid_buf,
            wifi,
            _wifi_sub: wifi_sub,
            _ip_sub: ip_sub,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(
        ssid: &str,
        passphrase: &str,
        events: Sender<NetEvent>,
    ) -> Result<Self, CredentialsError> {
        validate_ssid(ssid)?;
        validate_passphrase(passphrase)?;
        let mut stored = heapless::String::new();
        stored.push_str(ssid).map_err(|()| CredentialsError::InvalidSsid)?;
        Ok(Self {
            ssid: stored,
            events,
            join_attempts: 0,
        })
    }

    /// Bring the station interface up.  The stack answers with a
    /// `StaStarted` event, which is what triggers the first join.
    #[cfg(target_os = "espidf")]
    pub fn start(&mut self) -> anyhow::Result<()> {
        info!("wifi: starting station (SSID='{}')", self.ssid);
        self.wifi.start()?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(&mut self) -> Result<(), CredentialsError> {
        info!("wifi(sim): starting station (SSID='{}')", self.ssid);
        let _ = self.events.send(NetEvent::StationStart);
        Ok(())
    }

    /// Number of join attempts issued (simulation only; used by tests).
    #[cfg(not(target_os = "espidf"))]
    pub fn join_attempts(&self) -> u32 {
        self.join_attempts
    }
}

impl StationPort for WifiAdapter {
    #[cfg(target_os = "espidf")]
    fn join(&mut self) {
        // Outcome arrives as a later event; an immediate driver error is
        // logged and the next Disconnected event retries anyway.
        if let Err(e) = self.wifi.connect() {
            log::warn!("wifi: connect request failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn join(&mut self) {
        self.join_attempts += 1;
        info!("wifi(sim): join attempt {} to '{}'", self.join_attempts, self.ssid);
    }
}
