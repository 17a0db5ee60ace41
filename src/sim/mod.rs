pub mod advisory;
pub mod controller;
pub mod effect;
pub mod order;
pub mod state;
pub mod toast;
