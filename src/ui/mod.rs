pub mod gamepad;
pub mod input;
pub mod rain;
pub mod renderer;
pub mod schedule;
pub mod sound;
