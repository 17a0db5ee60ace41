/// Market records shown on the handheld.
/// All of them are immutable snapshots handed out by `domain::mock`.

/// A tradable spot asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Spot price in USD, never negative.
    pub price: f64,
    /// 24h change in percent (signed).
    pub change_24h: f64,
    /// Quantity owned, never negative.
    pub holdings: f64,
}

impl Coin {
    pub fn has_holdings(&self) -> bool {
        self.holdings > 0.0
    }

    /// USD value of the current holdings.
    pub fn holding_value(&self) -> f64 {
        self.holdings * self.price
    }

    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}

/// Side of a mock order. Fixed for the lifetime of one Transaction view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

/// Perpetual contract listing (display only).
#[derive(Clone, Debug)]
pub struct PerpContract {
    pub symbol: &'static str,
    pub mark_price: &'static str,
    pub funding: &'static str,
    pub leverage: &'static str,
}

/// Static balances for the account screen.
#[derive(Clone, Debug)]
pub struct AccountSnapshot {
    pub exchange_name: &'static str,
    pub total_value: &'static str,
    pub pnl_24h: &'static str,
    pub exchange_usdc: &'static str,
    pub wallet_name: &'static str,
    pub wallet_address: &'static str,
    pub wallet_eth: &'static str,
    pub wallet_usdc: &'static str,
    pub gas_note: &'static str,
}

impl AccountSnapshot {
    /// `0x88f2...e4a1` style short form of the wallet address.
    pub fn short_address(&self) -> String {
        let addr = self.wallet_address;
        if addr.len() <= 10 {
            return addr.to_string();
        }
        format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(price: f64, holdings: f64, change: f64) -> Coin {
        Coin { id: "x", symbol: "X", name: "Test", price, change_24h: change, holdings }
    }

    #[test]
    fn holdings_and_value() {
        let c = coin(2.0, 3.5, 1.0);
        assert!(c.has_holdings());
        assert!((c.holding_value() - 7.0).abs() < 1e-9);
        assert!(!coin(2.0, 0.0, 1.0).has_holdings());
    }

    #[test]
    fn flat_change_counts_as_up() {
        assert!(coin(1.0, 0.0, 0.0).is_up());
        assert!(!coin(1.0, 0.0, -0.1).is_up());
    }

    #[test]
    fn short_address_keeps_head_and_tail() {
        let acct = AccountSnapshot {
            exchange_name: "", total_value: "", pnl_24h: "", exchange_usdc: "",
            wallet_name: "",
            wallet_address: "0x88f273412a8901cde4a1bb22390f12c129e4a1",
            wallet_eth: "", wallet_usdc: "", gas_note: "",
        };
        assert_eq!(acct.short_address(), "0x88f2...e4a1");
    }
}
