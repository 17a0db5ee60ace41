/// Keyboard input.
///
/// Drains pending crossterm events each frame and translates key presses
/// into logical `Action`s. Release events are ignored; auto-repeat is
/// treated as another press so held arrows scroll.
///
/// Fixed map:
///   Arrows              →  directions
///   Enter / Space       →  Confirm
///   Esc / Backspace     →  Cancel
///   q / w               →  ShoulderPrev / ShoulderNext
///   x                   →  Secondary
///   m                   →  SystemMenu
///   Ctrl+C              →  immediate exit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::action::Action;

pub struct InputState {
    /// Actions collected during the most recent `drain_events()`.
    actions: Vec<Action>,
    interrupted: bool,
    resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            actions: Vec::with_capacity(8),
            interrupted: false,
            resized: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.actions.clear();
        self.resized = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Resize(..)) => self.resized = true,
                _ => {}
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if is_ctrl_c(&key) {
            self.interrupted = true;
            return;
        }
        if let Some(action) = action_for_key(&key) {
            self.actions.push(action);
        }
    }

    /// Actions in arrival order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Ctrl+C seen at any point.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Terminal was resized this frame.
    pub fn resized(&self) -> bool {
        self.resized
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let action = match key.code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Action::Cancel,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Action::ShoulderPrev,
            'w' => Action::ShoulderNext,
            'x' => Action::Secondary,
            'm' => Action::SystemMenu,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}
