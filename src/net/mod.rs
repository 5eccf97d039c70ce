//! Network-side state machines.
//!
//! The Wi-Fi driver itself lives in [`crate::adapters::wifi`]; this module
//! holds the driver-agnostic link state machine and the readiness signal
//! that gates server startup.

pub mod link;
