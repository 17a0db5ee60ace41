/// Gamepad input using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Directions
///   A                     →  Confirm
///   B                     →  Cancel
///   X                     →  Secondary
///   L1 / R1               →  ShoulderPrev / ShoulderNext
///   Start / Select        →  SystemMenu
///
/// Every action is edge-triggered: one press yields one action.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::info;

use crate::config::GamepadConfig;
use crate::domain::action::Action;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Clone, Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    secondary: Vec<Btn>,
    shoulder_prev: Vec<Btn>,
    shoulder_next: Vec<Btn>,
    menu: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm:       vec![Btn::A],
            cancel:        vec![Btn::B],
            secondary:     vec![Btn::X],
            shoulder_prev: vec![Btn::L1],
            shoulder_next: vec![Btn::R1],
            menu:          vec![Btn::Start, Btn::Select],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; a list with no valid names keeps the default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_into(names: &[String], slot: &mut Vec<Btn>) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let mut map = ActionMap::default();
        parse_into(&cfg.confirm, &mut map.confirm);
        parse_into(&cfg.cancel, &mut map.cancel);
        parse_into(&cfg.secondary, &mut map.secondary);
        parse_into(&cfg.shoulder_prev, &mut map.shoulder_prev);
        parse_into(&cfg.shoulder_next, &mut map.shoulder_next);
        parse_into(&cfg.menu, &mut map.menu);
        map
    }

    /// Button lists in the order actions are emitted within one frame.
    fn bindings(&self) -> [(Action, &[Btn]); 6] {
        [
            (Action::SystemMenu, self.menu.as_slice()),
            (Action::ShoulderPrev, self.shoulder_prev.as_slice()),
            (Action::ShoulderNext, self.shoulder_next.as_slice()),
            (Action::Secondary, self.secondary.as_slice()),
            (Action::Cancel, self.cancel.as_slice()),
            (Action::Confirm, self.confirm.as_slice()),
        ]
    }
}

/// Four-way digital direction (d-pad and stick share it).
#[derive(Clone, Copy, Debug, Default)]
struct Dirs {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update()`, indexed by `Btn`.
    just_pressed: [bool; BTN_COUNT],

    dpad_pressed: Dirs,
    stick_held: Dirs,
    stick_pressed: Dirs,
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            connected,
            ..Self::detached()
        }
    }

    /// State with no backend attached. Never reports input.
    fn detached() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            just_pressed: [false; BTN_COUNT],
            dpad_pressed: Dirs::default(),
            stick_held: Dirs::default(),
            stick_pressed: Dirs::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad_pressed = Dirs::default();
        self.stick_pressed = Dirs::default();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    /// Actions produced since the last `update()`: directions first, then
    /// mapped buttons.
    pub fn actions(&self) -> Vec<Action> {
        let mut out = Vec::new();
        let dirs = [
            (Action::Up, self.dpad_pressed.up || self.stick_pressed.up),
            (Action::Down, self.dpad_pressed.down || self.stick_pressed.down),
            (Action::Left, self.dpad_pressed.left || self.stick_pressed.left),
            (Action::Right, self.dpad_pressed.right || self.stick_pressed.right),
        ];
        out.extend(dirs.iter().filter(|(_, on)| *on).map(|(a, _)| *a));
        for (action, btns) in self.action_map.bindings() {
            if btns.iter().any(|&b| self.just_pressed[b as usize]) {
                out.push(action);
            }
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press_button(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        self.update_stick();
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, btn: Button) {
        match btn {
            Button::DPadUp    => self.dpad_pressed.up = true,
            Button::DPadDown  => self.dpad_pressed.down = true,
            Button::DPadLeft  => self.dpad_pressed.left = true,
            Button::DPadRight => self.dpad_pressed.right = true,
            other => {
                if let Some(b) = Btn::from_gilrs(other) {
                    self.just_pressed[b as usize] = true;
                }
            }
        }
    }

    /// Derive digital stick directions; a press is the crossing into the
    /// outer zone.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn update_stick(&mut self) {
        let prev = self.stick_held;
        self.stick_held = Dirs {
            left: self.stick_x < -STICK_DEADZONE,
            right: self.stick_x > STICK_DEADZONE,
            up: self.stick_y > STICK_DEADZONE,
            down: self.stick_y < -STICK_DEADZONE,
        };
        let now = self.stick_held;
        self.stick_pressed = Dirs {
            left: now.left && !prev.left,
            right: now.right && !prev.right,
            up: now.up && !prev.up,
            down: now.down && !prev.down,
        };
    }
}
