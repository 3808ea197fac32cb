//! Block compaction: moves fully-settled intent groups out of the live
//! ledger into immutable content-addressed blocks, keeping the append-only
//! file bounded in practice.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::parser::parse_file;
use crate::paths::{blocks_dir, ledger_path};
use crate::types::{KIND_EXECUTION, KIND_REJECTION};

/// Comment line seeded at the top of a fresh ledger and re-emitted on every
/// compaction rewrite.
pub const LEDGER_HEADER: &str = "; tradefs append-only trade ledger";

/// Archive every settled intent group into a new block and rewrite the live
/// ledger without them. Returns the number of entries archived (0 = no-op).
///
/// An intent is settled once any terminal entry (EXECUTION/REJECTION)
/// carries its id; every entry sharing that id, whatever its kind, moves
/// into the block so no entry is stranded or lost across the split.
/// Content-level idempotent: re-running before new terminal entries arrive
/// archives nothing.
pub fn compact_blocks(root: &Path) -> Result<usize> {
    let path = ledger_path(root);
    let entries = parse_file(&path)?;

    let mut settled: BTreeSet<&str> = BTreeSet::new();
    for entry in &entries {
        if matches!(entry.kind.as_str(), KIND_EXECUTION | KIND_REJECTION) {
            let id = entry.intent_id();
            if !id.is_empty() {
                settled.insert(id);
            }
        }
    }

    let archived: Vec<_> = entries
        .iter()
        .filter(|e| {
            let id = e.intent_id();
            !id.is_empty() && settled.contains(id)
        })
        .collect();
    if archived.is_empty() {
        return Ok(0);
    }

    // Block payload: the archived entries' raw text in file order.
    let mut payload = String::new();
    let mut intent_ids: BTreeSet<&str> = BTreeSet::new();
    for entry in &archived {
        payload.push_str(&entry.raw_text());
        intent_ids.insert(entry.intent_id());
    }
    let hash = hex::encode(Sha256::digest(payload.as_bytes()));

    let now = Utc::now();
    let block_id = format!("{}-{}", now.format("%Y%m%dT%H%M%S"), &hash[..8]);
    let created_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    let block_dir = blocks_dir(root).join(&block_id);
    fs::create_dir_all(&block_dir)
        .with_context(|| format!("create block dir {}", block_dir.display()))?;

    let manifest = format!(
        "block_id: {}\ncreated_at: {}\nentries: {}\nintent_ids: {}\nsha256: {}\n",
        block_id,
        created_at,
        archived.len(),
        intent_ids.iter().copied().collect::<Vec<_>>().join(", "),
        hash,
    );
    fs::write(block_dir.join("meta.txt"), manifest)
        .with_context(|| format!("write block manifest {}", block_dir.display()))?;
    fs::write(block_dir.join("data"), &payload)
        .with_context(|| format!("write block data {}", block_dir.display()))?;

    // Rewrite the live ledger: compaction notice, then every surviving
    // entry in original order with its exact original text.
    let mut remaining = vec![
        LEDGER_HEADER.to_string(),
        format!("; compacted to block {block_id} at {created_at}"),
        String::new(),
    ];
    for entry in &entries {
        let id = entry.intent_id();
        if !id.is_empty() && settled.contains(id) {
            continue;
        }
        remaining.push(entry.raw_lines.join("\n"));
    }
    let mut rewritten = remaining.join("\n");
    rewritten.push('\n');

    // Temp file + rename in the same directory so a crash mid-rewrite never
    // leaves a half-written live ledger.
    let tmp = path.with_extension("txt.tmp");
    fs::write(&tmp, rewritten).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, &path)
        .with_context(|| format!("replace ledger {}", path.display()))?;

    info!(
        entries = archived.len(),
        block_id = %block_id,
        "compacted settled entries into block"
    );
    Ok(archived.len())
}
