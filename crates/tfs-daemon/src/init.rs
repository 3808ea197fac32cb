use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tfs_ledger::compact::LEDGER_HEADER;

/// Create the control-surface directory tree and seed the ledger and rule
/// store. Idempotent: existing files are left alone.
pub fn init_root(root: &Path) -> Result<()> {
    let dirs = [
        root.join("account"),
        tfs_ledger::blocks_dir(root),
        root.join("quote").join("hold"),
        tfs_quotes::track_dir(root),
        tfs_quotes::subscribe_dir(root),
        tfs_quotes::unsubscribe_dir(root),
        tfs_quotes::market_dir(root),
    ];
    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }

    let ledger = tfs_ledger::ledger_path(root);
    if !ledger.exists() {
        fs::write(&ledger, format!("{LEDGER_HEADER}\n"))
            .with_context(|| format!("seed {}", ledger.display()))?;
    }

    let rules = tfs_risk::rules_path(root);
    if !rules.exists() {
        fs::write(&rules, "{}\n").with_context(|| format!("seed {}", rules.display()))?;
    }

    info!(root = %root.display(), "initialized control surface");
    Ok(())
}
