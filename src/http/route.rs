//! Request-line tokenizer.
//!
//! The wire protocol is a single byte of intent: the character after the
//! leading `/` in `GET /<x>` selects the route.  Instead of indexing a
//! fixed offset into the raw buffer (which reads out of bounds on short
//! requests), the tokenizer extracts the request-target and maps it onto a
//! closed [`Route`] enum with identical routing semantics.

/// Interpreted intent of one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /` — serve the static page.
    Root,
    /// `GET /?` — status query (placeholder, see [`server`](super::server)).
    Status,
    /// `GET /<0-5>` — relay command; carries the wire code
    /// (0 = all off, 1–5 = select relay 0–4).
    Select(u8),
}

impl Route {
    /// Parse a raw request buffer.  Returns `None` for anything that is
    /// not a `GET` or whose target matches no route; those connections
    /// get the canned header and no body.
    pub fn parse(request: &[u8]) -> Option<Route> {
        let rest = request.strip_prefix(b"GET ")?;
        let target = rest
            .split(|&b| b == b' ' || b == b'\r' || b == b'\n')
            .next()?;

        let path = target.strip_prefix(b"/")?;
        match path.first().copied() {
            None => Some(Route::Root),
            Some(b'?') => Some(Route::Status),
            Some(d @ b'0'..=b'5') => Some(Route::Select(d - b'0')),
            Some(_) => None,
        }
    }
}
