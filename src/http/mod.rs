//! Minimal HTTP-ish control surface.
//!
//! Not RFC-7230: one request per connection, a canned success header, and
//! routing decided by the request-line target alone.  Anything a browser
//! sends beyond the first 1024 bytes is ignored.

pub mod assets;
pub mod route;
pub mod server;
