/// Abstract input actions.
///
/// The controller only ever sees these. Keyboard keys and gamepad buttons
/// are mapped onto them by `ui::input` / `ui::gamepad`, so the same
/// navigation rules hold whatever device produced the press.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    /// L1
    ShoulderPrev,
    /// R1
    ShoulderNext,
    /// X button
    Secondary,
    /// Start / Select
    SystemMenu,
}

impl Action {
    #[cfg(test)]
    pub const ALL: [Action; 10] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Confirm,
        Action::Cancel,
        Action::ShoulderPrev,
        Action::ShoulderNext,
        Action::Secondary,
        Action::SystemMenu,
    ];

    pub fn is_shoulder(self) -> bool {
        matches!(self, Action::ShoulderPrev | Action::ShoulderNext)
    }
}
