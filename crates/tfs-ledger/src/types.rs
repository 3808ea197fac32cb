use std::collections::BTreeMap;

/// Entry kinds the reconciliation logic acts on. The format is open-ended:
/// any other quoted kind parses fine and is carried through compaction
/// untouched, but the engine ignores it.
pub const KIND_ORDER: &str = "ORDER";
pub const KIND_EXECUTION: &str = "EXECUTION";
pub const KIND_REJECTION: &str = "REJECTION";

/// One transaction block in the ledger file.
///
/// `raw_lines` holds the entry's original text byte-for-byte (header line
/// plus everything up to the next header). Compaction relies on this to
/// reproduce untouched entries exactly, so nothing may normalize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub kind: String,
    /// Metadata from `; key: value` comment lines. Later duplicate keys
    /// overwrite earlier ones. Intentionally a loose string map: the format
    /// is forward-compatible with keys this engine knows nothing about.
    pub meta: BTreeMap<String, String>,
    pub raw_lines: Vec<String>,
}

impl LedgerEntry {
    /// The idempotency key linking an ORDER to its terminal outcome.
    /// Empty string means "not actionable".
    pub fn intent_id(&self) -> &str {
        self.meta.get("intent_id").map(String::as_str).unwrap_or("")
    }

    /// Raw entry text with a trailing newline, as stored on disk.
    pub fn raw_text(&self) -> String {
        let mut s = self.raw_lines.join("\n");
        s.push('\n');
        s
    }
}

/// A trade instruction decoded from an ORDER entry's metadata.
///
/// Everything stays a string: the authoring format is permissive (e.g.
/// `qty: ALL` from risk-generated closing orders) and numeric validation
/// belongs to the brokerage boundary, not the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOrder {
    pub intent_id: String,
    pub side: String,
    pub symbol: String,
    pub qty: String,
    pub order_type: String,
    pub tif: String,
    pub price: String,
    pub market: String,
    pub action: String,
    pub order_id: String,
}
