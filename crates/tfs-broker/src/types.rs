//! Brokerage vocabulary and request/response types.
//!
//! Translation from ledger strings is deliberately permissive: the
//! authoring tool relies on unknown values degrading to safe defaults
//! (market order, buy, day) instead of rejecting the intent.

/// Order type in the brokerage's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
    EnhancedLimit,
    AtAuctionLimit,
}

impl OrderType {
    /// Unrecognized order types default to market.
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "LIMIT" | "LO" => OrderType::Limit,
            "MARKET" | "MO" => OrderType::Market,
            "ELO" => OrderType::EnhancedLimit,
            "ALO" => OrderType::AtAuctionLimit,
            _ => OrderType::Market,
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            OrderType::Limit => "LO",
            OrderType::Market => "MO",
            OrderType::EnhancedLimit => "ELO",
            OrderType::AtAuctionLimit => "ALO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Unrecognized sides default to buy.
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SELL" => Side::Sell,
            _ => Side::Buy,
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Day,
    GoodTilCanceled,
    GoodTilDate,
}

impl TimeInForce {
    /// Unrecognized time-in-force values default to day.
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GTC" => TimeInForce::GoodTilCanceled,
            "GTD" => TimeInForce::GoodTilDate,
            _ => TimeInForce::Day,
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            TimeInForce::Day => "Day",
            TimeInForce::GoodTilCanceled => "GoodTilCanceled",
            TimeInForce::GoodTilDate => "GoodTilDate",
        }
    }
}

/// One order submission. Quantity stays a string (`ALL` sentinel included);
/// adapters that need a number parse it at their own boundary and fail the
/// submission, which the dispatcher records as a REJECTION.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub qty: String,
    pub price: Option<String>,
    pub tif: TimeInForce,
    /// Carries the intent id for cross-system traceability.
    pub remark: String,
}

/// Successful submission. `price` is only set by adapters that know the
/// execution price at submit time (the mock does; a live adapter echoes
/// nothing and the requested limit price is recorded instead).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAck {
    pub order_id: String,
    pub price: Option<String>,
}
