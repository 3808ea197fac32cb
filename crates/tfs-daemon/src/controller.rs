use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use tfs_broker::BrokerCapability;

/// Name of the kill-switch sentinel under the root. Touching it stops the
/// controller at the next tick; the file is deleted on detection so a
/// restart does not immediately shut down again.
pub const KILL_SWITCH: &str = ".kill";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub root: PathBuf,
    pub interval: Duration,
    /// Compact after this many handled intents; 0 disables compaction.
    pub compact_after: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Shutdown,
}

/// The single-writer poll loop. One controller process owns the ledger for
/// writes; ticks run strictly serially, and shutdown only happens between
/// ticks (an in-flight brokerage call completes first).
pub struct Controller {
    cfg: ControllerConfig,
    broker: Box<dyn BrokerCapability + Send>,
    handled_since_compact: usize,
}

impl Controller {
    pub fn new(cfg: ControllerConfig, broker: Box<dyn BrokerCapability + Send>) -> Self {
        Self {
            cfg,
            broker,
            handled_since_compact: 0,
        }
    }

    /// One poll cycle: kill switch, dispatch, risk, compaction. Every
    /// per-step failure is logged and the loop keeps going; a transient
    /// brokerage or file error must never stop future ticks.
    pub fn tick(&mut self) -> TickOutcome {
        let root = self.cfg.root.clone();

        if self.kill_switch_tripped(&root) {
            return TickOutcome::Shutdown;
        }

        // Dispatch pending intents. An unreadable ledger skips compaction
        // too: its trigger counter only moves on successful dispatch.
        let mut ledger_ok = true;
        match tfs_broker::dispatch_pending(&root, self.broker.as_mut()) {
            Ok(handled) => self.handled_since_compact += handled,
            Err(err) => {
                error!("dispatch failed: {err:#}");
                ledger_ok = false;
            }
        }

        // Risk rules read the rule store and quote projections, not the
        // ledger; a dispatch failure does not block them.
        match tfs_risk::check_risk_rules(&root) {
            Ok(triggered) if !triggered.is_empty() => {
                info!(symbols = ?triggered, "risk rules fired");
            }
            Ok(_) => {}
            Err(err) => error!("risk check failed: {err:#}"),
        }

        if ledger_ok
            && self.cfg.compact_after > 0
            && self.handled_since_compact >= self.cfg.compact_after
        {
            match tfs_ledger::compact_blocks(&root) {
                Ok(_) => self.handled_since_compact = 0,
                Err(err) => error!("compaction failed: {err:#}"),
            }
        }

        TickOutcome::Continue
    }

    fn kill_switch_tripped(&self, root: &Path) -> bool {
        let sentinel = root.join(KILL_SWITCH);
        if !sentinel.exists() {
            return false;
        }
        info!("kill switch activated, shutting down");
        if let Err(err) = fs::remove_file(&sentinel) {
            warn!("failed to remove kill switch sentinel: {err}");
        }
        true
    }

    /// Run the fixed-interval loop until a signal or the kill switch stops
    /// it. The tick body is synchronous, so a signal arriving mid-tick
    /// takes effect at the next loop turn, never mid-cycle.
    pub async fn run(mut self) -> Result<()> {
        info!(
            root = %self.cfg.root.display(),
            interval = ?self.cfg.interval,
            compact_after = self.cfg.compact_after,
            "controller started"
        );

        let mut ticker = tokio::time::interval(self.cfg.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("received signal, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if self.tick() == TickOutcome::Shutdown {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Resolves when SIGINT or (on unix) SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!("failed to install SIGTERM handler: {err}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
