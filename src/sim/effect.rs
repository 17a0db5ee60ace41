/// Effects emitted by the controller for one processed action.
/// The application loop applies them (notifications, sound, transitions,
/// advisory requests); the controller itself performs no I/O.

use crate::domain::coin::Coin;
use super::order::Order;
use super::state::ViewState;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Some cursor or selection moved.
    Moved,
    ViewChanged { from: ViewState, to: ViewState },
    Notify(String),
    /// The action was valid input but the current state refused it.
    Rejected,
    Execute(Order),
    RequestAdvisory { visit: u64, coin: Coin },
    ModalOpened,
    ModalClosed,
    Quit,
}

/// Fixed message for selling an asset that is not held.
pub const NO_ASSETS: &str = "ERROR: NO ASSETS";
