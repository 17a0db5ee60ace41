/// The navigation controller: the single authority over which screen is
/// shown and what is focused on it.
///
/// Processing order for one action:
///   1. SystemMenu opens the quit modal (always wins)
///   2. Open modal swallows everything but its own keys
///   3. Shoulder actions go through the per-view dispatch table
///   4. Cancel in Transaction returns to the market list
///   5. View-specific handling
///
/// `handle` is a total, synchronous function of (state, action). It never
/// fails; a refused action simply leaves the state alone and, where the
/// user should know, emits a notification. Side effects are returned as
/// `Effect`s for the application loop to apply.

use tracing::debug;

use crate::domain::action::Action;
use crate::domain::coin::Coin;
use crate::domain::keypad::StepDir;
use super::effect::{Effect, NO_ASSETS};
use super::order::Order;
use super::state::{
    AccountColumn, AccountFocus, AdvisoryStatus, FocusState, FooterAction, MarketFocus,
    ModalChoice, QuitModal, ShoulderRole, TransactionFocus, TxFocus, ViewState,
};

pub struct Controller {
    coins: Vec<Coin>,
    focus: FocusState,
    /// Market list focus, kept while another screen is active.
    market: MarketFocus,
    modal: Option<QuitModal>,
    buying_power_usd: f64,
    /// Transaction visit counter.
    visits: u64,
}

impl Controller {
    pub fn new(coins: Vec<Coin>, buying_power_usd: f64) -> Self {
        Controller {
            coins,
            focus: FocusState::MarketList(MarketFocus::default()),
            market: MarketFocus::default(),
            modal: None,
            buying_power_usd,
            visits: 0,
        }
    }

    // ── Queries ──

    pub fn view(&self) -> ViewState {
        self.focus.view()
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn modal(&self) -> Option<&QuitModal> {
        self.modal.as_ref()
    }

    pub fn buying_power_usd(&self) -> f64 {
        self.buying_power_usd
    }

    /// Market list focus: live when the list is shown, remembered otherwise.
    pub fn market_focus(&self) -> MarketFocus {
        match &self.focus {
            FocusState::MarketList(m) => *m,
            _ => self.market,
        }
    }

    // ── Input ──

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.dispatch(action, &mut fx);
        fx
    }

    fn dispatch(&mut self, action: Action, fx: &mut Vec<Effect>) {
        if action == Action::SystemMenu {
            self.modal = Some(QuitModal::new());
            fx.push(Effect::ModalOpened);
            return;
        }

        if self.modal.is_some() {
            self.handle_modal(action, fx);
            return;
        }

        if action.is_shoulder() {
            let forward = action == Action::ShoulderNext;
            match self.view().shoulder_role() {
                ShoulderRole::CycleView => self.cycle_view(forward, fx),
                ShoulderRole::StepAmount => self.step_amount(forward, fx),
            }
            return;
        }

        if action == Action::Cancel && self.view() == ViewState::Transaction {
            self.return_to_market(fx);
            return;
        }

        match self.view() {
            ViewState::MarketList => self.handle_market(action, fx),
            ViewState::Derivatives => {}
            ViewState::Account => self.handle_account(action, fx),
            ViewState::Transaction => self.handle_transaction(action, fx),
        }
    }

    // ── Modal ──

    fn handle_modal(&mut self, action: Action, fx: &mut Vec<Effect>) {
        let Some(modal) = self.modal.as_mut() else { return };
        match action {
            Action::Left => select_choice(modal, ModalChoice::Quit, fx),
            Action::Right => select_choice(modal, ModalChoice::Stay, fx),
            Action::Confirm => match modal.choice {
                ModalChoice::Quit => fx.push(Effect::Quit),
                ModalChoice::Stay => self.close_modal(fx),
            },
            Action::Cancel => self.close_modal(fx),
            _ => {}
        }
    }

    fn close_modal(&mut self, fx: &mut Vec<Effect>) {
        self.modal = None;
        fx.push(Effect::ModalClosed);
    }

    /// Presentation tick for the typewriter text. Returns false when
    /// there is nothing left to reveal (or no modal).
    pub fn advance_modal_reveal(&mut self) -> bool {
        self.modal.as_mut().is_some_and(|m| m.advance_reveal())
    }

    // ── View switching ──

    fn set_focus(&mut self, next: FocusState, fx: &mut Vec<Effect>) {
        let from = self.view();
        if let FocusState::MarketList(m) = &self.focus {
            self.market = *m;
        }
        self.focus = next;
        let to = self.view();
        debug!(?from, ?to, "view changed");
        fx.push(Effect::ViewChanged { from, to });
    }

    fn cycle_view(&mut self, forward: bool, fx: &mut Vec<Effect>) {
        let Some(target) = self.view().cycled(forward) else { return };
        let next = match target {
            ViewState::MarketList => FocusState::MarketList(self.market),
            ViewState::Derivatives => FocusState::Derivatives,
            ViewState::Account => FocusState::Account(AccountFocus::default()),
            ViewState::Transaction => return,
        };
        self.set_focus(next, fx);
    }

    fn return_to_market(&mut self, fx: &mut Vec<Effect>) {
        self.set_focus(FocusState::MarketList(self.market), fx);
    }

    // ── Market list ──

    fn handle_market(&mut self, action: Action, fx: &mut Vec<Effect>) {
        let count = self.coins.len();
        let FocusState::MarketList(m) = &mut self.focus else { return };
        match action {
            Action::Up if count > 0 => {
                m.row = if m.row == 0 { count - 1 } else { m.row - 1 };
                fx.push(Effect::Moved);
            }
            Action::Down if count > 0 => {
                m.row = (m.row + 1) % count;
                fx.push(Effect::Moved);
            }
            Action::Left => set_footer(m, FooterAction::Buy, fx),
            Action::Right => set_footer(m, FooterAction::Sell, fx),
            Action::Confirm => {
                let snapshot = *m;
                self.open_transaction(snapshot, fx);
            }
            _ => {}
        }
    }

    fn open_transaction(&mut self, m: MarketFocus, fx: &mut Vec<Effect>) {
        let Some(coin) = self.coins.get(m.row) else { return };
        if m.footer == FooterAction::Sell && coin.holdings <= 0.0 {
            debug!(symbol = coin.symbol, "sell refused: no holdings");
            fx.push(Effect::Rejected);
            fx.push(Effect::Notify(NO_ASSETS.to_string()));
            return;
        }
        let coin = coin.clone();
        let kind = m.footer.transaction_type();
        self.visits += 1;
        let tx = TransactionFocus::new(coin, kind, self.visits);
        self.set_focus(FocusState::Transaction(tx), fx);
    }

    // ── Account ──

    fn handle_account(&mut self, action: Action, fx: &mut Vec<Effect>) {
        let FocusState::Account(a) = &mut self.focus else { return };
        match action {
            Action::Secondary => a.address_open = true,
            Action::Cancel if a.address_open => a.address_open = false,
            Action::Left => set_column(a, AccountColumn::Primary, fx),
            Action::Right => set_column(a, AccountColumn::Secondary, fx),
            _ => {}
        }
    }

    // ── Transaction ──

    fn handle_transaction(&mut self, action: Action, fx: &mut Vec<Effect>) {
        let FocusState::Transaction(tx) = &mut self.focus else { return };
        match action {
            Action::Up => {
                let next = match tx.focus {
                    TxFocus::Keypad(p) => TxFocus::Keypad(p.up()),
                    TxFocus::Confirm { last } | TxFocus::Cancel { last } => TxFocus::Keypad(last),
                };
                refocus(tx, next, fx);
            }
            Action::Down => {
                let next = match tx.focus {
                    TxFocus::Keypad(p) if p.is_bottom_row() => TxFocus::Confirm { last: p },
                    TxFocus::Keypad(p) => TxFocus::Keypad(p.down()),
                    other => other,
                };
                refocus(tx, next, fx);
            }
            Action::Left => {
                let next = match tx.focus {
                    TxFocus::Keypad(p) => TxFocus::Keypad(p.left()),
                    TxFocus::Cancel { last } => TxFocus::Confirm { last },
                    other => other,
                };
                refocus(tx, next, fx);
            }
            Action::Right => {
                let next = match tx.focus {
                    TxFocus::Keypad(p) => TxFocus::Keypad(p.right()),
                    TxFocus::Confirm { last } => TxFocus::Cancel { last },
                    other => other,
                };
                refocus(tx, next, fx);
            }
            Action::Confirm => match tx.focus {
                TxFocus::Keypad(p) => {
                    tx.input.press(p.key());
                    fx.push(Effect::Moved);
                }
                TxFocus::Confirm { .. } => {
                    let order = Order {
                        kind: tx.kind,
                        coin: tx.coin.clone(),
                        amount: tx.input.as_str().to_string(),
                    };
                    fx.push(Effect::Execute(order));
                    self.return_to_market(fx);
                }
                TxFocus::Cancel { .. } => self.return_to_market(fx),
            },
            Action::Secondary => {
                if tx.advisory == AdvisoryStatus::Idle {
                    tx.advisory = AdvisoryStatus::Pending;
                    fx.push(Effect::RequestAdvisory { visit: tx.visit, coin: tx.coin.clone() });
                }
            }
            _ => {}
        }
    }

    fn step_amount(&mut self, forward: bool, fx: &mut Vec<Effect>) {
        let bp = self.buying_power_usd;
        let FocusState::Transaction(tx) = &mut self.focus else { return };
        let max = tx.max_amount(bp);
        let before = tx.input.clone();
        tx.input.step_percent(max, if forward { StepDir::Up } else { StepDir::Down });
        if tx.input != before {
            fx.push(Effect::Moved);
        }
    }

    /// Deliver an advisory result. Ignored unless it belongs to the
    /// current Transaction visit and that visit is still waiting.
    pub fn advisory_ready(&mut self, visit: u64, text: String) -> bool {
        match &mut self.focus {
            FocusState::Transaction(tx)
                if tx.visit == visit && tx.advisory == AdvisoryStatus::Pending =>
            {
                tx.advisory = AdvisoryStatus::Ready(text);
                true
            }
            _ => {
                debug!(visit, "stale advisory dropped");
                false
            }
        }
    }
}

fn select_choice(modal: &mut QuitModal, choice: ModalChoice, fx: &mut Vec<Effect>) {
    if modal.choice != choice {
        modal.choice = choice;
        fx.push(Effect::Moved);
    }
}

fn set_footer(m: &mut MarketFocus, footer: FooterAction, fx: &mut Vec<Effect>) {
    if m.footer != footer {
        m.footer = footer;
        fx.push(Effect::Moved);
    }
}

fn set_column(a: &mut AccountFocus, column: AccountColumn, fx: &mut Vec<Effect>) {
    if a.column != column {
        a.column = column;
        fx.push(Effect::Moved);
    }
}

fn refocus(tx: &mut TransactionFocus, next: TxFocus, fx: &mut Vec<Effect>) {
    if tx.focus != next {
        tx.focus = next;
        fx.push(Effect::Moved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coin::TransactionType;
    use crate::domain::keypad::KeypadPos;
    use crate::domain::mock;

    const BTC: usize = 0;
    const SOL: usize = 2;
    const ADA: usize = 4;

    fn ctl() -> Controller {
        Controller::new(mock::coins(), 10_000.0)
    }

    fn press(c: &mut Controller, actions: &[Action]) -> Vec<Effect> {
        actions.iter().flat_map(|&a| c.handle(a)).collect()
    }

    fn row(c: &Controller) -> usize {
        c.market_focus().row
    }

    fn select_row(c: &mut Controller, target: usize) {
        while row(c) != target {
            c.handle(Action::Down);
        }
    }

    fn tx(c: &Controller) -> &TransactionFocus {
        match c.focus() {
            FocusState::Transaction(tx) => tx,
            other => panic!("expected transaction, got {other:?}"),
        }
    }

    fn notified(fx: &[Effect]) -> Vec<&str> {
        fx.iter()
            .filter_map(|e| match e {
                Effect::Notify(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Enter a transaction for `coin_row` with the given footer side.
    fn open(c: &mut Controller, coin_row: usize, side: Action) {
        select_row(c, coin_row);
        press(c, &[side, Action::Confirm]);
        assert_eq!(c.view(), ViewState::Transaction);
    }

    // ── Market list ──

    #[test]
    fn starts_on_market_list_first_row() {
        let c = ctl();
        assert_eq!(c.view(), ViewState::MarketList);
        assert_eq!(row(&c), 0);
        assert!(c.modal().is_none());
    }

    #[test]
    fn rows_wrap_at_both_ends() {
        let mut c = ctl();
        let n = c.coins().len();
        c.handle(Action::Up);
        assert_eq!(row(&c), n - 1);
        c.handle(Action::Down);
        assert_eq!(row(&c), 0);
    }

    #[test]
    fn footer_is_set_not_toggled() {
        let mut c = ctl();
        press(&mut c, &[Action::Right, Action::Right]);
        assert_eq!(c.market_focus().footer, FooterAction::Sell);
        press(&mut c, &[Action::Left, Action::Left]);
        assert_eq!(c.market_focus().footer, FooterAction::Buy);
    }

    #[test]
    fn sell_without_holdings_is_refused() {
        let mut c = ctl();
        select_row(&mut c, ADA);
        let fx = press(&mut c, &[Action::Right, Action::Confirm]);
        assert_eq!(c.view(), ViewState::MarketList);
        assert_eq!(notified(&fx), vec![NO_ASSETS]);
        assert!(fx.contains(&Effect::Rejected));
        assert_eq!(row(&c), ADA);
    }

    #[test]
    fn buy_captures_coin_even_without_holdings() {
        let mut c = ctl();
        open(&mut c, ADA, Action::Left);
        let t = tx(&c);
        assert_eq!(t.kind, TransactionType::Buy);
        assert_eq!(t.coin.symbol, "ADA");
        assert_eq!(t.input.as_str(), "0");
        assert_eq!(t.focus, TxFocus::Keypad(KeypadPos::START));
    }

    #[test]
    fn sell_with_holdings_enters_transaction() {
        let mut c = ctl();
        open(&mut c, SOL, Action::Right);
        assert_eq!(tx(&c).kind, TransactionType::Sell);
        assert_eq!(tx(&c).coin.symbol, "SOL");
    }

    // ── Global precedence ──

    #[test]
    fn modal_blocks_navigation() {
        let mut c = ctl();
        c.handle(Action::SystemMenu);
        let fx = press(&mut c, &[Action::Down, Action::Up, Action::ShoulderNext, Action::Secondary]);
        assert!(fx.is_empty());
        assert_eq!(row(&c), 0);
        assert_eq!(c.view(), ViewState::MarketList);
    }

    #[test]
    fn modal_cancel_restores_every_view() {
        let setups: [&[Action]; 4] = [
            &[Action::Down, Action::Down, Action::Right],
            &[Action::ShoulderNext],
            &[Action::ShoulderPrev, Action::Right, Action::Secondary],
            &[Action::Confirm, Action::Confirm, Action::Down, Action::Right, Action::ShoulderNext],
        ];
        for setup in setups {
            let mut c = ctl();
            press(&mut c, setup);
            let before = c.focus().clone();
            let fx = press(&mut c, &[Action::SystemMenu, Action::Left, Action::Cancel]);
            assert!(fx.contains(&Effect::ModalClosed));
            assert!(c.modal().is_none());
            assert_eq!(c.focus(), &before);
        }
    }

    #[test]
    fn modal_selection_and_confirm() {
        let mut c = ctl();
        c.handle(Action::SystemMenu);
        assert_eq!(c.modal().map(|m| m.choice), Some(ModalChoice::Stay));
        // Confirm on Stay closes
        let fx = c.handle(Action::Confirm);
        assert_eq!(fx, vec![Effect::ModalClosed]);

        c.handle(Action::SystemMenu);
        c.handle(Action::Left);
        assert_eq!(c.modal().map(|m| m.choice), Some(ModalChoice::Quit));
        assert_eq!(c.handle(Action::Confirm), vec![Effect::Quit]);
    }

    #[test]
    fn cancel_always_stays_even_on_quit_choice() {
        let mut c = ctl();
        let fx = press(&mut c, &[Action::SystemMenu, Action::Left, Action::Cancel]);
        assert!(!fx.contains(&Effect::Quit));
        assert!(c.modal().is_none());
    }

    #[test]
    fn system_menu_reopen_resets_modal() {
        let mut c = ctl();
        press(&mut c, &[Action::SystemMenu, Action::Left]);
        c.advance_modal_reveal();
        c.handle(Action::SystemMenu);
        let m = c.modal().cloned().unwrap_or_default();
        assert_eq!(m.choice, ModalChoice::Stay);
        assert_eq!(m.revealed(), "");
    }

    #[test]
    fn shoulders_cycle_list_views() {
        let mut c = ctl();
        c.handle(Action::ShoulderNext);
        assert_eq!(c.view(), ViewState::Derivatives);
        c.handle(Action::ShoulderNext);
        assert_eq!(c.view(), ViewState::Account);
        c.handle(Action::ShoulderNext);
        assert_eq!(c.view(), ViewState::MarketList);
        c.handle(Action::ShoulderPrev);
        assert_eq!(c.view(), ViewState::Account);
    }

    #[test]
    fn market_focus_survives_cycling() {
        let mut c = ctl();
        press(&mut c, &[Action::Down, Action::Down, Action::Right]);
        press(&mut c, &[Action::ShoulderNext, Action::ShoulderPrev]);
        assert_eq!(c.market_focus(), MarketFocus { row: 2, footer: FooterAction::Sell });
    }

    #[test]
    fn shoulders_step_amount_in_transaction() {
        let mut c = ctl();
        open(&mut c, SOL, Action::Right); // max = 100 holdings
        c.handle(Action::ShoulderNext);
        assert_eq!(tx(&c).input.as_str(), "5");
        c.handle(Action::ShoulderNext);
        assert_eq!(tx(&c).input.as_str(), "10");
        c.handle(Action::ShoulderPrev);
        assert_eq!(tx(&c).input.as_str(), "5");
        assert_eq!(c.view(), ViewState::Transaction);
    }

    #[test]
    fn cancel_in_transaction_discards_input() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        c.handle(Action::Confirm); // types "2"
        assert_eq!(tx(&c).input.as_str(), "2");
        let fx = c.handle(Action::Cancel);
        assert!(fx.contains(&Effect::ViewChanged {
            from: ViewState::Transaction,
            to: ViewState::MarketList,
        }));
        c.handle(Action::Confirm);
        assert_eq!(tx(&c).input.as_str(), "0");
    }

    // ── Transaction keypad ──

    #[test]
    fn keypad_to_footer_and_back() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        press(&mut c, &[Action::Down, Action::Down, Action::Down]);
        assert_eq!(tx(&c).focus, TxFocus::Keypad(KeypadPos::new(3, 1)));

        c.handle(Action::Down);
        assert_eq!(tx(&c).focus, TxFocus::Confirm { last: KeypadPos::new(3, 1) });
        c.handle(Action::Left);
        assert!(matches!(tx(&c).focus, TxFocus::Confirm { .. }));
        c.handle(Action::Right);
        assert!(matches!(tx(&c).focus, TxFocus::Cancel { .. }));
        c.handle(Action::Right);
        assert!(matches!(tx(&c).focus, TxFocus::Cancel { .. }));
        c.handle(Action::Down);
        assert!(matches!(tx(&c).focus, TxFocus::Cancel { .. }));

        c.handle(Action::Up);
        assert_eq!(tx(&c).focus, TxFocus::Keypad(KeypadPos::new(3, 1)));
    }

    #[test]
    fn keypad_cursor_clamps() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        press(&mut c, &[Action::Up, Action::Left, Action::Left, Action::Left]);
        assert_eq!(tx(&c).focus, TxFocus::Keypad(KeypadPos::new(0, 0)));
        press(&mut c, &[Action::Right, Action::Right, Action::Right]);
        assert_eq!(tx(&c).focus, TxFocus::Keypad(KeypadPos::new(0, 2)));
    }

    #[test]
    fn keypad_confirm_types_digits() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        // "2", then ".", "0" on the bottom row, then DEL
        press(&mut c, &[Action::Confirm, Action::Down, Action::Down, Action::Down, Action::Left, Action::Confirm]);
        assert_eq!(tx(&c).input.as_str(), "2.");
        press(&mut c, &[Action::Right, Action::Confirm]);
        assert_eq!(tx(&c).input.as_str(), "2.0");
        press(&mut c, &[Action::Right, Action::Confirm]);
        assert_eq!(tx(&c).input.as_str(), "2.");
    }

    #[test]
    fn confirm_footer_executes_and_returns() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        c.handle(Action::Confirm); // "2"
        let fx = press(&mut c, &[Action::Down, Action::Down, Action::Down, Action::Down, Action::Confirm]);
        let order = fx.iter().find_map(|e| match e {
            Effect::Execute(o) => Some(o.clone()),
            _ => None,
        });
        let order = order.expect("order executed");
        assert_eq!(order.kind, TransactionType::Buy);
        assert_eq!(order.amount, "2");
        assert_eq!(order.coin.symbol, "BTC");
        assert_eq!(c.view(), ViewState::MarketList);
    }

    #[test]
    fn cancel_footer_returns_without_order() {
        let mut c = ctl();
        open(&mut c, BTC, Action::Left);
        let fx = press(&mut c, &[Action::Down, Action::Down, Action::Down, Action::Down, Action::Right, Action::Confirm]);
        assert!(!fx.iter().any(|e| matches!(e, Effect::Execute(_))));
        assert_eq!(c.view(), ViewState::MarketList);
    }

    // ── Account ──

    #[test]
    fn account_dialog_and_columns() {
        let mut c = ctl();
        c.handle(Action::ShoulderPrev);
        assert_eq!(c.view(), ViewState::Account);
        c.handle(Action::Right);
        c.handle(Action::Secondary);
        match c.focus() {
            FocusState::Account(a) => {
                assert!(a.address_open);
                assert_eq!(a.column, AccountColumn::Secondary);
            }
            other => panic!("{other:?}"),
        }
        c.handle(Action::Cancel);
        assert_eq!(c.view(), ViewState::Account);
        assert!(matches!(c.focus(), FocusState::Account(a) if !a.address_open));
        c.handle(Action::Left);
        assert!(matches!(c.focus(), FocusState::Account(a) if a.column == AccountColumn::Primary));
    }

    #[test]
    fn derivatives_ignores_view_keys() {
        let mut c = ctl();
        c.handle(Action::ShoulderNext);
        let fx = press(&mut c, &[Action::Up, Action::Down, Action::Confirm, Action::Cancel, Action::Secondary]);
        assert!(fx.is_empty());
        assert_eq!(c.view(), ViewState::Derivatives);
    }

    // ── Advisory ──

    #[test]
    fn advisory_requested_once_per_visit() {
        let mut c = ctl();
        open(&mut c, SOL, Action::Left);
        let fx = press(&mut c, &[Action::Secondary, Action::Secondary]);
        let requests: Vec<_> = fx.iter().filter(|e| matches!(e, Effect::RequestAdvisory { .. })).collect();
        assert_eq!(requests.len(), 1);
        let visit = tx(&c).visit;
        assert!(c.advisory_ready(visit, "STATUS: HOLD.".into()));
        assert_eq!(tx(&c).advisory, AdvisoryStatus::Ready("STATUS: HOLD.".into()));
        assert!(c.handle(Action::Secondary).is_empty());
    }

    #[test]
    fn stale_advisory_is_dropped() {
        let mut c = ctl();
        open(&mut c, SOL, Action::Left);
        c.handle(Action::Secondary);
        let old_visit = tx(&c).visit;
        c.handle(Action::Cancel);
        c.handle(Action::Confirm);
        assert!(!c.advisory_ready(old_visit, "late".into()));
        assert_eq!(tx(&c).advisory, AdvisoryStatus::Idle);
    }

    // ── Invariants over long runs ──

    #[test]
    fn invariants_hold_for_action_sequences() {
        let mut c = ctl();
        let n = c.coins().len();
        // deterministic walk over the action set, skipping SystemMenu
        // every so often so the modal does not swallow everything
        let mut seed: u32 = 7;
        for i in 0..5000 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let mut a = Action::ALL[(seed >> 16) as usize % Action::ALL.len()];
            if a == Action::SystemMenu && i % 3 != 0 {
                a = Action::Cancel;
            }
            c.handle(a);
            assert!(row(&c) < n);
            match c.focus() {
                FocusState::Transaction(t) => {
                    let v = t.input.value();
                    assert!(v >= 0.0);
                    assert!(t.input.as_str().matches('.').count() <= 1);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn empty_coin_list_is_inert() {
        let mut c = Controller::new(Vec::new(), 10_000.0);
        let fx = press(&mut c, &[Action::Up, Action::Down, Action::Confirm]);
        assert!(fx.is_empty());
        assert_eq!(c.view(), ViewState::MarketList);
        assert_eq!(row(&c), 0);
    }
}
