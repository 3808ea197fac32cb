//! Plain-text trade ledger: parsing, reconciliation state, append writers,
//! and block compaction.
//!
//! The ledger file is the single source of truth for the whole controller.
//! Every poll cycle re-reads it from disk; nothing in this crate holds
//! authoritative state between calls. Appending is the only mutation the
//! dispatcher and risk evaluator ever perform; compaction is the only code
//! path that rewrites the file, and it does so via temp-file + rename.

pub mod append;
pub mod compact;
pub mod parser;
pub mod paths;
pub mod state;
pub mod types;

pub use append::{
    append_execution, append_order, append_rejection, ExecutionRecord, OrderRecord,
    RejectionRecord,
};
pub use compact::compact_blocks;
pub use parser::{full_symbol, order_from_entry, parse_file, parse_str};
pub use paths::{blocks_dir, ledger_path, trade_dir};
pub use state::{build_state, LedgerState};
pub use types::{LedgerEntry, ParsedOrder, KIND_EXECUTION, KIND_ORDER, KIND_REJECTION};
