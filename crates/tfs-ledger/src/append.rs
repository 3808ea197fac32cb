//! Append-only entry writers.
//!
//! These are the only code paths that add to the live ledger. Each call
//! writes one complete blank-line-separated entry in the wire format the
//! parser reads back; the OS-level append guarantee plus single-writer
//! ownership keeps entries from interleaving.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

/// Terminal EXECUTION entry fields.
pub struct ExecutionRecord<'a> {
    pub intent_id: &'a str,
    pub order_id: &'a str,
    pub status: &'a str,
    pub symbol: &'a str,
    pub side: &'a str,
    pub qty: &'a str,
    pub price: Option<&'a str>,
}

/// Terminal REJECTION entry fields.
pub struct RejectionRecord<'a> {
    pub intent_id: &'a str,
    pub symbol: &'a str,
    pub side: &'a str,
    pub qty: &'a str,
    pub reason: &'a str,
}

/// ORDER entry fields, used by the risk evaluator to inject closing orders.
pub struct OrderRecord<'a> {
    pub intent_id: &'a str,
    pub side: &'a str,
    pub symbol: &'a str,
    pub qty: &'a str,
    pub order_type: &'a str,
    pub tif: &'a str,
    pub price: Option<&'a str>,
    pub reason: Option<&'a str>,
}

pub fn append_execution(path: &Path, rec: &ExecutionRecord<'_>) -> Result<()> {
    let mut meta: Vec<(&str, &str)> = vec![
        ("intent_id", rec.intent_id),
        ("order_id", rec.order_id),
        ("status", rec.status),
        ("symbol", rec.symbol),
        ("side", rec.side),
        ("qty", rec.qty),
    ];
    if let Some(price) = rec.price {
        meta.push(("price", price));
    }
    let description = format!("{} {}", rec.side, rec.symbol);
    append_entry(path, "EXECUTION", description.trim(), &meta)
}

pub fn append_rejection(path: &Path, rec: &RejectionRecord<'_>) -> Result<()> {
    let meta: Vec<(&str, &str)> = vec![
        ("intent_id", rec.intent_id),
        ("status", "REJECTED"),
        ("reason", rec.reason),
        ("symbol", rec.symbol),
        ("side", rec.side),
        ("qty", rec.qty),
    ];
    let description = format!("{} {}", rec.side, rec.symbol);
    append_entry(path, "REJECTION", description.trim(), &meta)
}

pub fn append_order(path: &Path, rec: &OrderRecord<'_>) -> Result<()> {
    let mut meta: Vec<(&str, &str)> = vec![
        ("intent_id", rec.intent_id),
        ("side", rec.side),
        ("symbol", rec.symbol),
        ("qty", rec.qty),
        ("type", rec.order_type),
        ("tif", rec.tif),
    ];
    if let Some(price) = rec.price {
        meta.push(("price", price));
    }
    if let Some(reason) = rec.reason {
        meta.push(("reason", reason));
    }
    let description = format!("{} {}", rec.side, rec.symbol);
    append_entry(path, "ORDER", description.trim(), &meta)
}

/// Format one entry and append it with a single write.
fn append_entry(path: &Path, kind: &str, description: &str, meta: &[(&str, &str)]) -> Result<()> {
    let date = Utc::now().format("%Y-%m-%d");
    let mut text = format!("\n{date} * \"{kind}\" \"{description}\"\n");
    for (key, value) in meta {
        text.push_str(&format!("  ; {key}: {value}\n"));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open ledger for append {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("append {kind} entry to {}", path.display()))?;
    Ok(())
}
