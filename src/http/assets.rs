//! Static asset served on the root route.
//!
//! The page itself is an opaque blob produced by the web build and checked
//! in under `assets/`; the firmware only knows its address and length and
//! returns it verbatim.

/// The bundled control page.
pub const INDEX_HTML: &[u8] = include_bytes!("../../assets/index.html");

/// One immutable byte blob with a stable address for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    bytes: &'static [u8],
}

impl Asset {
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }

    /// The bundled control page.
    pub const fn index() -> Self {
        Self::new(INDEX_HTML)
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
