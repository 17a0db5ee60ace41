/// Static market data. Built once at start, never mutated.

use super::coin::{AccountSnapshot, Coin, PerpContract};

pub fn coins() -> Vec<Coin> {
    vec![
        Coin { id: "1", symbol: "BTC",  name: "Bitcoin",  price: 64230.50, change_24h: 2.4,  holdings: 0.15 },
        Coin { id: "2", symbol: "ETH",  name: "Ethereum", price: 3450.12,  change_24h: -1.2, holdings: 2.5 },
        Coin { id: "3", symbol: "SOL",  name: "Solana",   price: 145.60,   change_24h: 5.8,  holdings: 100.0 },
        Coin { id: "4", symbol: "DOGE", name: "Dogecoin", price: 0.12,     change_24h: 0.5,  holdings: 5000.0 },
        Coin { id: "5", symbol: "ADA",  name: "Cardano",  price: 0.45,     change_24h: -3.4, holdings: 0.0 },
        Coin { id: "6", symbol: "XRP",  name: "Ripple",   price: 0.60,     change_24h: 1.1,  holdings: 0.0 },
        Coin { id: "7", symbol: "DOT",  name: "Polkadot", price: 7.20,     change_24h: -0.8, holdings: 0.0 },
    ]
}

pub fn perps() -> Vec<PerpContract> {
    vec![
        PerpContract { symbol: "BTC-PERP", mark_price: "64,210.5", funding: "0.0100%", leverage: "50x" },
        PerpContract { symbol: "ETH-PERP", mark_price: "3,452.1",  funding: "0.0085%", leverage: "20x" },
        PerpContract { symbol: "SOL-PERP", mark_price: "145.2",    funding: "0.0120%", leverage: "10x" },
    ]
}

pub fn account() -> AccountSnapshot {
    AccountSnapshot {
        exchange_name: "HYPERLIQUID_DEX",
        total_value: "$42,904.32",
        pnl_24h: "+$1,240.50 (+2.8%)",
        exchange_usdc: "3,124.20",
        wallet_name: "ARBITRUM_L2",
        wallet_address: "0x88f273412a8901cde4a1bb22390f12c129e4a1",
        wallet_eth: "1.4502",
        wallet_usdc: "1,204.00",
        gas_note: "GAS: 12 GWEI ~ $0.01",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_ids_are_unique() {
        let list = coins();
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn values_are_non_negative() {
        for c in coins() {
            assert!(c.price >= 0.0, "{}", c.symbol);
            assert!(c.holdings >= 0.0, "{}", c.symbol);
        }
    }

    #[test]
    fn some_coins_have_no_holdings() {
        assert!(coins().iter().any(|c| !c.has_holdings()));
        assert!(coins().iter().any(|c| c.has_holdings()));
    }
}
