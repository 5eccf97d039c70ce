//! Relay Input Selector — Main Entry Point
//!
//! Boot sequence, in order:
//!
//! ```text
//! logger ─▶ GPIO init ─▶ all relays off ─▶ NVS read ─▶ restore selection
//!        ─▶ Wi-Fi station up ─▶ wait for link ─▶ serve forever
//! ```
//!
//! The selection is restored before the network exists: a reboot puts the
//! preamp back on the last input even if the access point is down.

#![deny(unused_must_use)]

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use input_selector::adapters::nvs::NvsAdapter;
use input_selector::adapters::wifi::WifiAdapter;
use input_selector::app::relay::RelayController;
use input_selector::app::store::SelectionStore;
use input_selector::config::SystemConfig;
use input_selector::diagnostics;
use input_selector::drivers::hw_init;
use input_selector::drivers::relay::RelayBank;
use input_selector::http::assets::Asset;
use input_selector::http::server::{ControlServer, SelectorContext};
use input_selector::net::link::{ConnectivityManager, LinkSignal};

fn main() -> Result<()> {
    // ── ESP-IDF bootstrap ─────────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("input-selector v{}", env!("CARGO_PKG_VERSION"));
    diagnostics::log_chip_info();

    if let Err(e) = run() {
        error!("fatal: {:#} — restarting", e);
        restart();
    }
    Ok(())
}

fn run() -> Result<()> {
    let config = SystemConfig::default();

    // ── 1. Relay outputs, everything off ──────────────────────
    hw_init::init_relay_outputs().map_err(|e| anyhow::anyhow!("hw init: {}", e))?;
    let mut relays = RelayController::new(RelayBank::new());

    // ── 2. Restore the persisted selection ────────────────────
    let nvs = match NvsAdapter::new() {
        Ok(nvs) => nvs,
        Err(e) => {
            warn!("NVS init failed ({}), selection will not persist", e);
            NvsAdapter::default()
        }
    };
    let store = SelectionStore::new(nvs);
    let persisted = store.get();
    relays.restore(persisted);
    info!("boot: restored selection code {}", persisted);

    // ── 3. Wi-Fi station bring-up ─────────────────────────────
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;

    let (events_tx, events_rx) = mpsc::channel();
    let signal = LinkSignal::new();

    let mut wifi = WifiAdapter::new(
        peripherals.modem,
        sysloop,
        config.ssid,
        config.passphrase,
        events_tx,
    )?;
    wifi.start()?;

    let link = ConnectivityManager::new(wifi, Arc::clone(&signal));
    thread::Builder::new()
        .name("link".into())
        .spawn(move || link.run(events_rx))
        .context("spawning link consumer")?;

    // ── 4. Wait for the link ──────────────────────────────────
    info!("boot: waiting for network");
    if !signal.wait(config.link_wait) {
        anyhow::bail!("network did not come up within {:?}", config.link_wait);
    }

    // ── 5. Control server, forever ────────────────────────────
    let server = ControlServer::bind(("0.0.0.0", config.http_port), config.client_read_timeout)
        .context("listener setup failed")?;
    info!("server: listening on port {}", config.http_port);

    let mut ctx = SelectorContext {
        relays,
        store,
        asset: Asset::index(),
    };
    server.serve_forever(&mut ctx)
}

/// Full process restart — the recovery path for every fatal boot error.
fn restart() {
    warn!("restarting in 5 seconds");
    thread::sleep(Duration::from_secs(5));
    // SAFETY: esp_restart never returns; all state is lost by design.
    unsafe { esp_idf_svc::sys::esp_restart() };
}
