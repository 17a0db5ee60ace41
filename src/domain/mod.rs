pub mod action;
pub mod coin;
pub mod keypad;
pub mod mock;
