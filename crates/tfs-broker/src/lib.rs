//! Brokerage boundary and the order dispatcher.
//!
//! The real trade API (order submission, cancellation) is consumed through
//! the [`BrokerCapability`] trait; this crate ships only the deterministic
//! mock implementation. The dispatcher drives every unprocessed ORDER in
//! the ledger to exactly one terminal entry per poll cycle.

pub mod capability;
pub mod dispatch;
pub mod types;

pub use capability::{BrokerCapability, MockBroker};
pub use dispatch::dispatch_pending;
pub use types::{OrderType, Side, SubmitAck, SubmitRequest, TimeInForce};
