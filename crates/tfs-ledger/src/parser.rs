use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{LedgerEntry, ParsedOrder};

/// Matches transaction header lines like:
/// `2026-02-11 * "ORDER" "BUY NVDA"`
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\d{4}-\d{2}-\d{2})\s+\*\s+"(\w+)"\s+"(.+)""#).unwrap());

/// Parse the ledger file into entries.
///
/// Only a missing/unreadable file is an error; malformed content never is.
pub fn parse_file(path: &Path) -> Result<Vec<LedgerEntry>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read ledger {}", path.display()))?;
    Ok(parse_str(&text))
}

/// Parse ledger text into an ordered sequence of entries.
///
/// An entry starts at a header line and owns every following line until the
/// next header or end of input. Indented `; key: value` comment lines become
/// metadata; any other interior line (free-form notes, blanks, garbage) is
/// kept in `raw_lines` only. Pure: safe to call every poll cycle.
pub fn parse_str(text: &str) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::new();
    let mut current: Option<LedgerEntry> = None;

    for line in text.split('\n') {
        if let Some(caps) = HEADER_RE.captures(line) {
            if let Some(done) = current.take() {
                entries.push(done);
            }
            current = Some(LedgerEntry {
                kind: caps[2].to_string(),
                meta: BTreeMap::new(),
                raw_lines: vec![line.to_string()],
            });
        } else if let Some(entry) = current.as_mut() {
            entry.raw_lines.push(line.to_string());
            if line.trim_start().starts_with(';') {
                if let Some((key, value)) = parse_meta_line(line) {
                    entry.meta.insert(key, value);
                }
            }
        }
        // Lines before the first header (file preamble comments) belong to
        // no entry and are rewritten fresh by compaction.
    }
    if let Some(done) = current {
        entries.push(done);
    }

    entries
}

/// Extract a key/value pair from a metadata comment line, `; key: value`.
fn parse_meta_line(line: &str) -> Option<(String, String)> {
    let s = line.trim().trim_start_matches(';').trim();
    let (key, value) = s.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Decode the trade instruction carried by an ORDER entry.
///
/// Defaults are part of the wire contract (the authoring tool relies on
/// permissive parsing): market=US, type=MARKET, tif=DAY.
pub fn order_from_entry(entry: &LedgerEntry) -> ParsedOrder {
    let get = |key: &str| entry.meta.get(key).cloned().unwrap_or_default();
    let mut order = ParsedOrder {
        intent_id: get("intent_id"),
        side: get("side").to_uppercase(),
        symbol: get("symbol"),
        qty: get("qty"),
        order_type: get("type").to_uppercase(),
        tif: get("tif").to_uppercase(),
        price: get("price"),
        market: get("market").to_uppercase(),
        action: get("action").to_uppercase(),
        order_id: get("order_id"),
    };
    if order.market.is_empty() {
        order.market = "US".to_string();
    }
    if order.order_type.is_empty() {
        order.order_type = "MARKET".to_string();
    }
    if order.tif.is_empty() {
        order.tif = "DAY".to_string();
    }
    order
}

/// Fully-qualified symbol: `"NVDA" + "US" -> "NVDA.US"`. A symbol that
/// already carries a qualifier is returned unchanged.
pub fn full_symbol(symbol: &str, market: &str) -> String {
    if symbol.contains('.') {
        symbol.to_string()
    } else {
        format!("{symbol}.{market}")
    }
}
