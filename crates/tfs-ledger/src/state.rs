use std::collections::BTreeSet;

use crate::types::{LedgerEntry, KIND_EXECUTION, KIND_ORDER, KIND_REJECTION};

/// Reconciliation state derived from one forward pass over the ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    /// Intent ids that already have a terminal entry (EXECUTION/REJECTION).
    pub processed: BTreeSet<String>,
    /// Every ORDER entry in file order. File order is processing order:
    /// first appended, first dispatched. No priority levels.
    pub pending: Vec<LedgerEntry>,
}

/// Build the processed-intent set and the pending order list.
///
/// Entries with an empty `intent_id` never enter `processed`; the authoring
/// format allows partial entries and downstream consumers skip them.
pub fn build_state(entries: &[LedgerEntry]) -> LedgerState {
    let mut state = LedgerState::default();
    for entry in entries {
        match entry.kind.as_str() {
            KIND_EXECUTION | KIND_REJECTION => {
                let id = entry.intent_id();
                if !id.is_empty() {
                    state.processed.insert(id.to_string());
                }
            }
            KIND_ORDER => state.pending.push(entry.clone()),
            _ => {}
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn terminal_entries_mark_intents_processed() {
        let text = concat!(
            "2026-01-01 * \"ORDER\" \"BUY A\"\n  ; intent_id: a\n",
            "2026-01-01 * \"ORDER\" \"BUY B\"\n  ; intent_id: b\n",
            "2026-01-01 * \"EXECUTION\" \"BUY A\"\n  ; intent_id: a\n",
            "2026-01-01 * \"REJECTION\" \"BUY C\"\n  ; intent_id: c\n",
        );
        let state = build_state(&parse_str(text));
        assert!(state.processed.contains("a"));
        assert!(state.processed.contains("c"));
        assert!(!state.processed.contains("b"));
        // Orders stay in file order, processed or not.
        let ids: Vec<&str> = state.pending.iter().map(|e| e.intent_id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_intent_ids_never_enter_processed() {
        let text = "2026-01-01 * \"EXECUTION\" \"stray\"\n  ; status: FILLED\n";
        let state = build_state(&parse_str(text));
        assert!(state.processed.is_empty());
    }
}
