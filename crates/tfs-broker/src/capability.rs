use anyhow::Result;
use chrono::Utc;

use crate::types::{SubmitAck, SubmitRequest};

/// The brokerage trade capability this core consumes but does not
/// implement: submit and cancel. Calls may block on network I/O; the poll
/// loop waits on them synchronously per intent.
pub trait BrokerCapability {
    fn submit_order(&mut self, req: &SubmitRequest) -> Result<SubmitAck>;
    fn cancel_order(&mut self, order_id: &str) -> Result<()>;
}

/// Mock execution for dry runs and tests: no external calls, a
/// locally-unique order id, and an execution price echoing the requested
/// limit price (or a fixed placeholder for market orders).
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBroker;

impl MockBroker {
    pub fn new() -> Self {
        Self
    }
}

impl BrokerCapability for MockBroker {
    fn submit_order(&mut self, req: &SubmitRequest) -> Result<SubmitAck> {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Ok(SubmitAck {
            order_id: format!("LOCAL-{nanos}"),
            price: Some(req.price.clone().unwrap_or_else(|| "100.00".to_string())),
        })
    }

    fn cancel_order(&mut self, _order_id: &str) -> Result<()> {
        Ok(())
    }
}
