//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ domain (relay / store / link)
//! ```
//!
//! Driven adapters (relay bank, NVS, Wi-Fi station) implement these traits.
//! The domain modules consume them via generics, so the selection logic
//! never touches hardware directly and every test runs on the host.

// ───────────────────────────────────────────────────────────────
// Relay output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the five relay outputs.
///
/// Hardware writes are infallible: a GPIO register write cannot fail once
/// the pin is configured, so there is no error path.
pub trait RelayPort {
    /// Drive output `index` to the given logic level (true = coil energized).
    fn drive(&mut self, index: usize, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Durable single-byte slot holding the last relay command code.
///
/// Implementations open and release the underlying handle inside each call
/// (acquire → operate → release, released on failure too); no handle is
/// held across operations.
pub trait StoragePort {
    /// Read the stored byte.
    fn read_value(&self) -> Result<u8, StorageError>;

    /// Write the byte and commit it to flash.
    fn write_value(&mut self, value: u8) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Station port (driven adapter: link state machine → Wi-Fi driver)
// ───────────────────────────────────────────────────────────────

/// Initiates a station join attempt.
///
/// Joining is fire-and-forget: the outcome arrives later as a
/// [`NetEvent`](crate::net::link::NetEvent) from the driver's event
/// subscriptions, never as a return value here.  A driver-level failure to
/// even start the attempt is logged inside the adapter.
pub trait StationPort {
    fn join(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The slot has never been written.
    NotFound,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "value not found"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
