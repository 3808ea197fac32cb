//! Quote projection boundary.
//!
//! The quote fetch/stream side lives outside this core; a separate actor
//! writes per-symbol snapshot files under `quote/hold/<SYMBOL>/`. This
//! crate only reads those projections, and provides the directory-backed
//! trigger queue plus the owned subscription-set state that the streaming
//! side drives.

pub mod overview;
pub mod queue;
pub mod subs;

pub use overview::{hold_dir, read_latest_price, read_overview, QuoteOverview};
pub use queue::TriggerQueue;
pub use subs::SubscriptionSet;

use std::path::{Path, PathBuf};

pub fn quote_dir(root: &Path) -> PathBuf {
    root.join("quote")
}

/// Pending one-shot quote refresh requests (file name = symbol).
pub fn track_dir(root: &Path) -> PathBuf {
    quote_dir(root).join("track")
}

/// Pending real-time subscription requests (file name = symbol).
pub fn subscribe_dir(root: &Path) -> PathBuf {
    quote_dir(root).join("subscribe")
}

/// Pending unsubscription requests (file name = symbol).
pub fn unsubscribe_dir(root: &Path) -> PathBuf {
    quote_dir(root).join("unsubscribe")
}

/// Market-wide projections (index snapshots, session calendars).
pub fn market_dir(root: &Path) -> PathBuf {
    quote_dir(root).join("market")
}
