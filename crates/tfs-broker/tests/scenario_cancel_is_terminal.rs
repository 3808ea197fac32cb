use std::fs;

use anyhow::{bail, Result};
use tfs_broker::{dispatch_pending, BrokerCapability, MockBroker, SubmitAck, SubmitRequest};
use tfs_ledger::{ledger_path, parse_file, trade_dir};

fn seed_root(ledger: &str) -> anyhow::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(trade_dir(dir.path()))?;
    fs::write(ledger_path(dir.path()), ledger)?;
    Ok(dir)
}

const CANCEL_ORDER: &str = concat!(
    "2026-02-11 * \"ORDER\" \"cancel working order\"\n",
    "  ; intent_id: c1\n",
    "  ; symbol: NVDA\n",
    "  ; action: CANCEL\n",
    "  ; order_id: 900123\n",
);

#[test]
fn successful_cancel_records_zero_qty_execution() -> anyhow::Result<()> {
    let root = seed_root(CANCEL_ORDER)?;

    assert_eq!(dispatch_pending(root.path(), &mut MockBroker::new())?, 1);

    let entries = parse_file(&ledger_path(root.path()))?;
    let execution = entries.iter().find(|e| e.kind == "EXECUTION").unwrap();
    assert_eq!(execution.intent_id(), "c1");
    assert_eq!(
        execution.meta.get("order_id").map(String::as_str),
        Some("CANCEL-900123")
    );
    assert_eq!(execution.meta.get("qty").map(String::as_str), Some("0"));
    assert_eq!(execution.meta.get("status").map(String::as_str), Some("CANCELED"));
    Ok(())
}

/// Broker that refuses every cancellation.
struct NoCancelBroker;

impl BrokerCapability for NoCancelBroker {
    fn submit_order(&mut self, _req: &SubmitRequest) -> Result<SubmitAck> {
        bail!("not under test");
    }

    fn cancel_order(&mut self, order_id: &str) -> Result<()> {
        bail!("order {order_id} already filled");
    }
}

#[test]
fn failed_cancel_is_terminal_and_never_retried() -> anyhow::Result<()> {
    let root = seed_root(CANCEL_ORDER)?;

    assert_eq!(dispatch_pending(root.path(), &mut NoCancelBroker)?, 1);

    let entries = parse_file(&ledger_path(root.path()))?;
    let rejection = entries.iter().find(|e| e.kind == "REJECTION").unwrap();
    assert_eq!(rejection.intent_id(), "c1");
    assert_eq!(
        rejection.meta.get("reason").map(String::as_str),
        Some("order 900123 already filled")
    );

    // Terminal regardless of outcome: the next cycle does not retry.
    assert_eq!(dispatch_pending(root.path(), &mut NoCancelBroker)?, 0);
    Ok(())
}

#[test]
fn cancel_without_order_id_stays_pending() -> anyhow::Result<()> {
    let root = seed_root(concat!(
        "2026-02-11 * \"ORDER\" \"cancel, order id tbd\"\n",
        "  ; intent_id: c2\n",
        "  ; symbol: NVDA\n",
        "  ; action: CANCEL\n",
    ))?;
    let before = fs::read_to_string(ledger_path(root.path()))?;

    // Not actionable until the author fills in the order id; it is neither
    // handled nor given a terminal entry.
    assert_eq!(dispatch_pending(root.path(), &mut MockBroker::new())?, 0);
    assert_eq!(fs::read_to_string(ledger_path(root.path()))?, before);
    Ok(())
}
