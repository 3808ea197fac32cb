use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use tfs_ledger::{
    append_execution, append_rejection, build_state, full_symbol, ledger_path, order_from_entry,
    parse_file, ExecutionRecord, ParsedOrder, RejectionRecord,
};

use crate::capability::BrokerCapability;
use crate::types::{OrderType, Side, SubmitRequest, TimeInForce};

/// Drive every unprocessed ORDER in the ledger to a terminal entry.
///
/// Returns the number of intents handled this cycle (the caller feeds this
/// into its compaction trigger). Appending terminal entries is the only
/// mutation performed; existing entries are never edited or deleted.
///
/// Failure semantics: a brokerage error for one intent becomes that
/// intent's REJECTION and never aborts the rest of the cycle. Only an
/// unreadable ledger (or an unwritable one, since a lost terminal entry
/// would mean a resubmit next tick) aborts the whole cycle; the caller
/// logs it and retries next poll.
pub fn dispatch_pending(root: &Path, broker: &mut dyn BrokerCapability) -> Result<usize> {
    let path = ledger_path(root);
    let entries = parse_file(&path)?;
    let state = build_state(&entries);

    let mut processed = state.processed;
    let mut handled = 0;

    for entry in &state.pending {
        let order = order_from_entry(entry);
        if order.intent_id.is_empty() {
            // Partial/comment entry; not actionable and not an error.
            continue;
        }
        if processed.contains(&order.intent_id) {
            // Already has a terminal entry (or a duplicate intent id, which
            // the engine treats as "already handled").
            continue;
        }
        let symbol = full_symbol(&order.symbol, &order.market);

        if order.action == "CANCEL" {
            if order.order_id.is_empty() {
                // Nothing to cancel yet; leave the intent pending for the
                // author to fill in the order id.
                continue;
            }
            match broker.cancel_order(&order.order_id) {
                Ok(()) => {
                    info!(intent_id = %order.intent_id, order_id = %order.order_id, "order cancelled");
                    append_execution(
                        &path,
                        &ExecutionRecord {
                            intent_id: &order.intent_id,
                            order_id: &format!("CANCEL-{}", order.order_id),
                            status: "CANCELED",
                            symbol: &symbol,
                            side: &order.side,
                            qty: "0",
                            price: None,
                        },
                    )?;
                }
                Err(err) => {
                    warn!(intent_id = %order.intent_id, error = %err, "cancel rejected");
                    append_rejection(
                        &path,
                        &RejectionRecord {
                            intent_id: &order.intent_id,
                            symbol: &symbol,
                            side: &order.side,
                            qty: &order.qty,
                            reason: &err.to_string(),
                        },
                    )?;
                }
            }
            // Cancellation is terminal either way; it is never retried.
            processed.insert(order.intent_id.clone());
            handled += 1;
            continue;
        }

        let req = submit_request(&order, &symbol);
        match broker.submit_order(&req) {
            Ok(ack) => {
                info!(intent_id = %order.intent_id, order_id = %ack.order_id, symbol = %symbol, "order submitted");
                let price = ack
                    .price
                    .clone()
                    .or_else(|| (!order.price.is_empty()).then(|| order.price.clone()));
                append_execution(
                    &path,
                    &ExecutionRecord {
                        intent_id: &order.intent_id,
                        order_id: &ack.order_id,
                        status: "FILLED",
                        symbol: &symbol,
                        side: &order.side,
                        qty: &order.qty,
                        price: price.as_deref(),
                    },
                )?;
            }
            Err(err) => {
                warn!(intent_id = %order.intent_id, symbol = %symbol, error = %err, "order rejected");
                append_rejection(
                    &path,
                    &RejectionRecord {
                        intent_id: &order.intent_id,
                        symbol: &symbol,
                        side: &order.side,
                        qty: &order.qty,
                        reason: &err.to_string(),
                    },
                )?;
            }
        }
        processed.insert(order.intent_id.clone());
        handled += 1;
    }

    Ok(handled)
}

/// Translate a decoded ORDER into the brokerage vocabulary.
fn submit_request(order: &ParsedOrder, symbol: &str) -> SubmitRequest {
    SubmitRequest {
        symbol: symbol.to_string(),
        order_type: OrderType::parse(&order.order_type),
        side: Side::parse(&order.side),
        qty: order.qty.clone(),
        price: (!order.price.is_empty()).then(|| order.price.clone()),
        tif: TimeInForce::parse(&order.tif),
        remark: format!("tradefs:{}", order.intent_id),
    }
}
