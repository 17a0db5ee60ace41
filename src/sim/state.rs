/// Navigation state owned by the controller.
///
/// ## Focus as one tagged union
///
/// `FocusState` carries the per-view payload, and the active `ViewState`
/// is derived from it. A keypad cursor while the Account screen is up, or
/// a row index while in the Transaction view, cannot be represented.
///
/// ## Modal
///
/// The quit dialog sits beside the focus, not inside it. Opening and
/// closing it never touches `FocusState`, so closing restores the
/// pre-modal screen exactly.

use crate::domain::coin::{Coin, TransactionType};
use crate::domain::keypad::{InputBuffer, KeypadPos};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewState {
    MarketList,
    Derivatives,
    Account,
    Transaction,
}

/// What L1/R1 mean on a given screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShoulderRole {
    CycleView,
    StepAmount,
}

impl ViewState {
    /// Order of the L1/R1 tab cycle.
    pub const CYCLE: [ViewState; 3] = [
        ViewState::MarketList,
        ViewState::Derivatives,
        ViewState::Account,
    ];

    /// Shoulder dispatch table. Every precedence decision about L1/R1
    /// goes through here.
    pub fn shoulder_role(self) -> ShoulderRole {
        match self {
            ViewState::MarketList => ShoulderRole::CycleView,
            ViewState::Derivatives => ShoulderRole::CycleView,
            ViewState::Account => ShoulderRole::CycleView,
            ViewState::Transaction => ShoulderRole::StepAmount,
        }
    }

    /// Neighbour in the tab cycle, wrapping both ways. None outside the cycle.
    pub fn cycled(self, forward: bool) -> Option<ViewState> {
        let idx = Self::CYCLE.iter().position(|v| *v == self)?;
        let n = Self::CYCLE.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        Some(Self::CYCLE[next])
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            ViewState::MarketList => "SPOT",
            ViewState::Derivatives => "PERP",
            ViewState::Account => "ACCOUNT",
            ViewState::Transaction => "ORDER",
        }
    }
}

// ── Market list ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FooterAction {
    #[default]
    Buy,
    Sell,
}

impl FooterAction {
    pub fn transaction_type(self) -> TransactionType {
        match self {
            FooterAction::Buy => TransactionType::Buy,
            FooterAction::Sell => TransactionType::Sell,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MarketFocus {
    /// Always `< coin_count` (0 when the list is empty).
    pub row: usize,
    pub footer: FooterAction,
}

// ── Account ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AccountColumn {
    #[default]
    Primary,
    Secondary,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AccountFocus {
    pub column: AccountColumn,
    pub address_open: bool,
}

// ── Transaction ──

/// Keypad vs footer focus. The footer variants remember the keypad
/// cursor so that `Up` returns to it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TxFocus {
    Keypad(KeypadPos),
    Confirm { last: KeypadPos },
    Cancel { last: KeypadPos },
}

impl TxFocus {
    pub fn keypad_cursor(self) -> Option<KeypadPos> {
        match self {
            TxFocus::Keypad(pos) => Some(pos),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum AdvisoryStatus {
    Idle,
    Pending,
    Ready(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct TransactionFocus {
    pub coin: Coin,
    pub kind: TransactionType,
    pub input: InputBuffer,
    pub focus: TxFocus,
    /// Identifies this stay in the Transaction view. Advisory results
    /// carrying another id are stale.
    pub visit: u64,
    pub advisory: AdvisoryStatus,
}

impl TransactionFocus {
    pub fn new(coin: Coin, kind: TransactionType, visit: u64) -> Self {
        TransactionFocus {
            coin,
            kind,
            input: InputBuffer::new(),
            focus: TxFocus::Keypad(KeypadPos::START),
            visit,
            advisory: AdvisoryStatus::Idle,
        }
    }

    /// Largest amount the order may take: buying power in coin units
    /// for Buy, holdings for Sell.
    pub fn max_amount(&self, buying_power_usd: f64) -> f64 {
        match self.kind {
            TransactionType::Buy if self.coin.price > 0.0 => buying_power_usd / self.coin.price,
            TransactionType::Buy => 0.0,
            TransactionType::Sell => self.coin.holdings,
        }
    }

    /// Allocation meter reading in percent, 0..=100.
    pub fn allocation_percent(&self, buying_power_usd: f64) -> f64 {
        match self.input.fraction_of(self.max_amount(buying_power_usd)) {
            Some(f) => (f * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }
}

// ── Focus union ──

#[derive(Clone, PartialEq, Debug)]
pub enum FocusState {
    MarketList(MarketFocus),
    Derivatives,
    Account(AccountFocus),
    Transaction(TransactionFocus),
}

impl FocusState {
    pub fn view(&self) -> ViewState {
        match self {
            FocusState::MarketList(_) => ViewState::MarketList,
            FocusState::Derivatives => ViewState::Derivatives,
            FocusState::Account(_) => ViewState::Account,
            FocusState::Transaction(_) => ViewState::Transaction,
        }
    }
}

// ── Quit modal ──

pub const QUIT_WARNING: &str =
    "Warning: Disconnecting from the construct will terminate all active sessions. Do you wish to proceed?";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModalChoice {
    Quit,
    Stay,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QuitModal {
    pub choice: ModalChoice,
    /// Characters of `QUIT_WARNING` revealed so far. Presentation only.
    reveal: usize,
}

impl QuitModal {
    pub fn new() -> Self {
        QuitModal { choice: ModalChoice::Stay, reveal: 0 }
    }

    /// Reveal one more character. Returns false once the text is complete.
    pub fn advance_reveal(&mut self) -> bool {
        let total = QUIT_WARNING.chars().count();
        if self.reveal >= total {
            return false;
        }
        self.reveal += 1;
        true
    }

    pub fn revealed(&self) -> &str {
        match QUIT_WARNING.char_indices().nth(self.reveal) {
            Some((byte, _)) => &QUIT_WARNING[..byte],
            None => QUIT_WARNING,
        }
    }

    pub fn fully_revealed(&self) -> bool {
        self.reveal >= QUIT_WARNING.chars().count()
    }
}

impl Default for QuitModal {
    fn default() -> Self {
        QuitModal::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(ViewState::MarketList.cycled(true), Some(ViewState::Derivatives));
        assert_eq!(ViewState::Account.cycled(true), Some(ViewState::MarketList));
        assert_eq!(ViewState::MarketList.cycled(false), Some(ViewState::Account));
        assert_eq!(ViewState::Transaction.cycled(true), None);
    }

    #[test]
    fn shoulder_table() {
        for v in ViewState::CYCLE {
            assert_eq!(v.shoulder_role(), ShoulderRole::CycleView);
        }
        assert_eq!(ViewState::Transaction.shoulder_role(), ShoulderRole::StepAmount);
    }

    #[test]
    fn typewriter_stops_at_end() {
        let mut m = QuitModal::new();
        assert_eq!(m.revealed(), "");
        assert!(m.advance_reveal());
        assert_eq!(m.revealed(), "W");
        while m.advance_reveal() {}
        assert!(m.fully_revealed());
        assert_eq!(m.revealed(), QUIT_WARNING);
        assert!(!m.advance_reveal());
    }

    #[test]
    fn modal_opens_on_stay() {
        assert_eq!(QuitModal::new().choice, ModalChoice::Stay);
    }

    #[test]
    fn sell_max_is_holdings() {
        let coin = Coin { id: "3", symbol: "SOL", name: "Solana", price: 145.6, change_24h: 5.8, holdings: 100.0 };
        let tx = TransactionFocus::new(coin.clone(), TransactionType::Sell, 1);
        assert_eq!(tx.max_amount(10_000.0), 100.0);
        let tx = TransactionFocus::new(coin, TransactionType::Buy, 1);
        assert!((tx.max_amount(10_000.0) - 10_000.0 / 145.6).abs() < 1e-9);
    }

    #[test]
    fn allocation_meter_clamps() {
        let coin = Coin { id: "1", symbol: "A", name: "A", price: 100.0, change_24h: 0.0, holdings: 4.0 };
        let mut tx = TransactionFocus::new(coin, TransactionType::Sell, 1);
        assert_eq!(tx.allocation_percent(0.0), 0.0);
        tx.input.press(crate::domain::keypad::Key::Digit(2));
        assert!((tx.allocation_percent(0.0) - 50.0).abs() < 1e-9);
        tx.input.press(crate::domain::keypad::Key::Digit(0));
        assert_eq!(tx.allocation_percent(0.0), 100.0);
    }
}
