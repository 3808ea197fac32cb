use std::fs;
use std::path::Path;

use tfs_ledger::{ledger_path, parse_file, trade_dir};
use tfs_risk::{check_risk_rules, load_rules, rules_path};

fn seed_root() -> anyhow::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(trade_dir(dir.path()))?;
    fs::write(ledger_path(dir.path()), "; tradefs append-only trade ledger\n")?;
    Ok(dir)
}

fn write_price(root: &Path, symbol: &str, last: f64) -> anyhow::Result<()> {
    let dir = tfs_quotes::hold_dir(root, symbol);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("overview.json"),
        format!(r#"{{"symbol":"{symbol}","last":{last}}}"#),
    )?;
    Ok(())
}

#[test]
fn stop_loss_appends_closing_order_and_disarms() -> anyhow::Result<()> {
    let root = seed_root()?;
    fs::write(
        rules_path(root.path()),
        r#"{"NVDA.US": {"stop_loss": 100.0}}"#,
    )?;
    write_price(root.path(), "NVDA.US", 95.0)?;

    assert_eq!(check_risk_rules(root.path())?, vec!["NVDA.US"]);

    let entries = parse_file(&ledger_path(root.path()))?;
    let order = entries.iter().find(|e| e.kind == "ORDER").unwrap();
    assert_eq!(order.meta.get("side").map(String::as_str), Some("SELL"));
    assert_eq!(order.meta.get("symbol").map(String::as_str), Some("NVDA.US"));
    assert_eq!(order.meta.get("qty").map(String::as_str), Some("ALL"));
    assert!(order.intent_id().starts_with("risk-NVDA-US-"));
    assert!(order
        .meta
        .get("reason")
        .unwrap()
        .starts_with("STOP_LOSS triggered: last=95.0000 <= stop_loss=100.0000"));

    // The fired rule is gone from the store...
    assert!(load_rules(root.path())?.is_empty());

    // ...so a second pass with the same price appends nothing.
    assert!(check_risk_rules(root.path())?.is_empty());
    let orders = parse_file(&ledger_path(root.path()))?
        .iter()
        .filter(|e| e.kind == "ORDER")
        .count();
    assert_eq!(orders, 1);
    Ok(())
}

#[test]
fn rule_overrides_replace_the_closing_defaults() -> anyhow::Result<()> {
    let root = seed_root()?;
    fs::write(
        rules_path(root.path()),
        r#"{"700.HK": {"take_profit": 350.0, "side": "sell", "qty": "200"}}"#,
    )?;
    write_price(root.path(), "700.HK", 360.0)?;

    assert_eq!(check_risk_rules(root.path())?, vec!["700.HK"]);

    let entries = parse_file(&ledger_path(root.path()))?;
    let order = entries.iter().find(|e| e.kind == "ORDER").unwrap();
    assert_eq!(order.meta.get("qty").map(String::as_str), Some("200"));
    assert!(order
        .meta
        .get("reason")
        .unwrap()
        .starts_with("TAKE_PROFIT triggered"));
    Ok(())
}

#[test]
fn rules_without_fresh_prices_stay_armed() -> anyhow::Result<()> {
    let root = seed_root()?;
    fs::write(
        rules_path(root.path()),
        r#"{"NVDA.US": {"stop_loss": 100.0}, "AMD.US": {"stop_loss": 80.0}}"#,
    )?;
    // Only AMD has a projection, and it is above its stop.
    write_price(root.path(), "AMD.US", 90.0)?;

    assert!(check_risk_rules(root.path())?.is_empty());
    // Nothing fired: both rules survive untouched.
    assert_eq!(load_rules(root.path())?.len(), 2);
    Ok(())
}

#[test]
fn absent_store_is_no_rules_but_malformed_store_is_an_error() -> anyhow::Result<()> {
    let root = seed_root()?;
    assert!(check_risk_rules(root.path())?.is_empty());

    fs::write(rules_path(root.path()), "{not json")?;
    assert!(check_risk_rules(root.path()).is_err());
    Ok(())
}
