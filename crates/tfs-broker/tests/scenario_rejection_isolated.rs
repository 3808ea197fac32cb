use std::fs;

use anyhow::{bail, Result};
use tfs_broker::{dispatch_pending, BrokerCapability, SubmitAck, SubmitRequest};
use tfs_ledger::{ledger_path, parse_file, trade_dir};

/// Rejects every submission for one symbol, accepts the rest.
struct FlakyBroker {
    reject_symbol: &'static str,
    submits: usize,
}

impl BrokerCapability for FlakyBroker {
    fn submit_order(&mut self, req: &SubmitRequest) -> Result<SubmitAck> {
        self.submits += 1;
        if req.symbol == self.reject_symbol {
            bail!("insufficient buying power");
        }
        Ok(SubmitAck {
            order_id: format!("BRK-{}", self.submits),
            price: None,
        })
    }

    fn cancel_order(&mut self, _order_id: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn one_rejected_intent_never_aborts_the_rest() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(trade_dir(root))?;
    fs::write(
        ledger_path(root),
        concat!(
            "2026-02-11 * \"ORDER\" \"BUY NVDA\"\n",
            "  ; intent_id: i1\n",
            "  ; side: BUY\n",
            "  ; symbol: NVDA\n",
            "  ; qty: 10\n",
            "\n",
            "2026-02-11 * \"ORDER\" \"BUY AMD\"\n",
            "  ; intent_id: i2\n",
            "  ; side: BUY\n",
            "  ; symbol: AMD\n",
            "  ; qty: 5\n",
            "  ; type: LIMIT\n",
            "  ; price: 150.00\n",
        ),
    )?;

    let mut broker = FlakyBroker {
        reject_symbol: "NVDA.US",
        submits: 0,
    };

    // Both intents are handled in the same cycle: the failure becomes i1's
    // REJECTION, the success becomes i2's EXECUTION.
    assert_eq!(dispatch_pending(root, &mut broker)?, 2);
    assert_eq!(broker.submits, 2);

    let entries = parse_file(&ledger_path(root))?;
    let rejection = entries.iter().find(|e| e.kind == "REJECTION").unwrap();
    assert_eq!(rejection.intent_id(), "i1");
    assert_eq!(
        rejection.meta.get("reason").map(String::as_str),
        Some("insufficient buying power")
    );

    let execution = entries.iter().find(|e| e.kind == "EXECUTION").unwrap();
    assert_eq!(execution.intent_id(), "i2");
    // No ack price from this broker: the requested limit price is recorded.
    assert_eq!(execution.meta.get("price").map(String::as_str), Some("150.00"));

    // Both outcomes are terminal; a rejected intent is not retried (a human
    // resubmits a corrected intent under a new id).
    assert_eq!(dispatch_pending(root, &mut broker)?, 0);
    assert_eq!(broker.submits, 2);
    Ok(())
}
