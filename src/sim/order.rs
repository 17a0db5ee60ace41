/// Order finalization sink.
///
/// Nothing is executed and no balance changes: the sink only
/// acknowledges the order with the fixed "EXECUTED" line.

use tracing::info;

use crate::domain::coin::{Coin, TransactionType};

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub kind: TransactionType,
    pub coin: Coin,
    /// Input buffer text at confirmation time.
    pub amount: String,
}

impl Order {
    pub fn summary(&self) -> String {
        format!("EXECUTED: {} {} {}", self.kind.label(), self.amount, self.coin.symbol)
    }
}

pub trait OrderSink {
    /// Accept a confirmed order, returning the message to display.
    fn execute(&mut self, order: &Order) -> String;
}

/// In-memory stand-in for an exchange.
#[derive(Debug, Default)]
pub struct MockExchange {
    executed: u64,
}

impl MockExchange {
    pub fn new() -> Self {
        MockExchange::default()
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl OrderSink for MockExchange {
    fn execute(&mut self, order: &Order) -> String {
        self.executed += 1;
        info!(
            side = order.kind.label(),
            symbol = order.coin.symbol,
            amount = %order.amount,
            seq = self.executed,
            "mock order executed"
        );
        order.summary()
    }
}
