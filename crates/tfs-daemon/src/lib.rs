//! tradefs controller daemon.
//!
//! The binary half (`main.rs`) is intentionally thin: CLI parsing and
//! tracing setup. The poll-loop controller lives here so scenario tests can
//! drive single ticks against a temp directory without a runtime clock.

pub mod controller;
pub mod init;

pub use controller::{Controller, ControllerConfig, TickOutcome};
pub use init::init_root;
