use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Per-symbol snapshot written by the projection layer as
/// `quote/hold/<SYMBOL>/overview.json`. Every field defaults so partially
/// written snapshots still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteOverview {
    pub symbol: String,
    pub last: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    pub volume: i64,
    pub turnover: f64,
    pub change: f64,
    pub change_pct: f64,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_market: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_market: Option<f64>,
}

/// Hold directory for one symbol's projection files.
pub fn hold_dir(root: &Path, symbol: &str) -> PathBuf {
    root.join("quote").join("hold").join(symbol)
}

/// Read a symbol's overview snapshot. Absent or unparseable files are
/// simply "no data yet", never an error: freshness is whatever the
/// projection layer last wrote.
pub fn read_overview(hold_dir: &Path) -> Option<QuoteOverview> {
    let data = fs::read_to_string(hold_dir.join("overview.json")).ok()?;
    serde_json::from_str(&data).ok()
}

/// Latest known price for a symbol, or `None` when no usable snapshot
/// exists. A zero/negative last is treated as absent (a snapshot written
/// before the first trade of the session carries no price signal).
pub fn read_latest_price(root: &Path, symbol: &str) -> Option<f64> {
    let overview = read_overview(&hold_dir(root, symbol))?;
    (overview.last > 0.0).then_some(overview.last)
}
