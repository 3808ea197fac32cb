use std::path::{Path, PathBuf};

/// Directory holding the live ledger, the risk-rule store and the block
/// archive, relative to the controller root.
pub fn trade_dir(root: &Path) -> PathBuf {
    root.join("trade")
}

/// The live append-only ledger file.
pub fn ledger_path(root: &Path) -> PathBuf {
    trade_dir(root).join("ledger.txt")
}

/// Base directory for immutable archive blocks (one subdirectory per block).
pub fn blocks_dir(root: &Path) -> PathBuf {
    trade_dir(root).join("blocks")
}
