//! Single-connection control server.
//!
//! One client at a time: `accept → read → header → dispatch → body → close`,
//! looping forever.  There is no worker pool and no keep-alive — a browser
//! clicking through inputs opens a fresh connection per command, and the
//! board has nothing else to do with its time.
//!
//! The canned success header is written for every non-empty request, even
//! unrecognized ones; that matches the device's long-standing behavior and
//! the bundled page depends on nothing more.

use std::io::{self, Read, Write};
use std::net::{TcpListener, ToSocketAddrs};
use std::time::Duration;

use log::{debug, error, warn};

use crate::app::ports::{RelayPort, StoragePort};
use crate::app::relay::RelayController;
use crate::app::store::SelectionStore;

use super::assets::Asset;
use super::route::Route;

/// Canned response header, written regardless of route.
pub const STATUS_HEADER: &[u8] = b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n";

/// End-of-body marker appended to relay and status responses.
/// Non-standard, but existing clients expect it.
pub const BODY_TERMINATOR: u8 = 0x00;

/// Fixed per-request read buffer; bytes beyond this are never read.
const READ_BUF_LEN: usize = 1024;

// ───────────────────────────────────────────────────────────────
// Dispatch context
// ───────────────────────────────────────────────────────────────

/// Everything a request can touch, owned in one place and passed by
/// reference into the serve loop.
pub struct SelectorContext<P: RelayPort, S: StoragePort> {
    pub relays: RelayController<P>,
    pub store: SelectionStore<S>,
    pub asset: Asset,
}

// ───────────────────────────────────────────────────────────────
// Server
// ───────────────────────────────────────────────────────────────

/// Listening socket plus per-connection settings.
pub struct ControlServer {
    listener: TcpListener,
    client_read_timeout: Option<Duration>,
}

impl ControlServer {
    /// Bind the listening socket.  Failure here is fatal to the process —
    /// the caller logs and restarts the device.
    pub fn bind(
        addr: impl ToSocketAddrs,
        client_read_timeout: Option<Duration>,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            client_read_timeout,
        })
    }

    /// Address actually bound (tests bind port 0).
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve clients forever, one at a time.
    ///
    /// Per-connection I/O errors are logged and the connection dropped;
    /// `accept` errors are logged and the loop keeps accepting.
    pub fn serve_forever<P, S>(&self, ctx: &mut SelectorContext<P, S>) -> !
    where
        P: RelayPort,
        S: StoragePort,
    {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    debug!("server: client {}", peer);
                    if let Err(e) = stream.set_read_timeout(self.client_read_timeout) {
                        warn!("server: set_read_timeout failed: {}", e);
                    }
                    if let Err(e) = handle_connection(&mut stream, ctx) {
                        warn!("server: connection error: {}", e);
                    }
                    // stream drops here — one request per connection
                }
                Err(e) => {
                    error!("server: accept failed: {}", e);
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Per-connection state machine
// ───────────────────────────────────────────────────────────────

/// Handle exactly one request/response exchange.
///
/// Generic over the stream so tests can drive it with in-memory buffers.
pub fn handle_connection<C, P, S>(
    conn: &mut C,
    ctx: &mut SelectorContext<P, S>,
) -> io::Result<()>
where
    C: Read + Write,
    P: RelayPort,
    S: StoragePort,
{
    let mut buf = [0u8; READ_BUF_LEN];
    let len = conn.read(&mut buf)?;
    if len == 0 {
        // Client connected and said nothing — close without a response.
        return Ok(());
    }

    conn.write_all(STATUS_HEADER)?;

    match Route::parse(&buf[..len]) {
        Some(Route::Root) => {
            conn.write_all(ctx.asset.bytes())?;
        }
        Some(Route::Status) => {
            // Placeholder: the status feature never shipped, clients get
            // the literal query byte back.
            conn.write_all(b"?")?;
            conn.write_all(&[BODY_TERMINATOR])?;
        }
        Some(Route::Select(code)) => {
            ctx.relays.clear_all();
            if code > 0 {
                ctx.relays.activate(code as usize - 1);
            }
            ctx.store.set(code);
            conn.write_all(&[BODY_TERMINATOR])?;
        }
        None => {
            // Unrecognized request: header only, no body.
        }
    }

    conn.flush()
}
