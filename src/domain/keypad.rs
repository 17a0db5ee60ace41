/// Order-entry keypad: layout, cursor, input buffer and the L1/R1
/// percentage stepping.
///
/// Layout (row, col):
///
/// ```text
///   1  2  3
///   4  5  6
///   7  8  9
///   .  0  DEL
/// ```
///
/// Key semantics are queried through `InputBuffer::press`, so the
/// digit-entry rules live in one place.

pub const ROWS: usize = 4;
pub const COLS: usize = 3;

/// Longest buffer an append can produce.
pub const MAX_INPUT_LEN: usize = 10;

/// L1/R1 step size as a fraction of the maximum amount.
pub const STEP: f64 = 0.05;

/// Absorbs float error so that exactly 15% steps to 20% / 10%.
const STEP_TOLERANCE: f64 = 0.001;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Digit(u8),
    Dot,
    Delete,
}

impl Key {
    pub fn label(self) -> String {
        match self {
            Key::Digit(d) => d.to_string(),
            Key::Dot => ".".to_string(),
            Key::Delete => "DEL".to_string(),
        }
    }
}

pub const LAYOUT: [[Key; COLS]; ROWS] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3)],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6)],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9)],
    [Key::Dot, Key::Digit(0), Key::Delete],
];

/// Cursor on the keypad grid. Always within `[0, ROWS) x [0, COLS)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeypadPos {
    row: usize,
    col: usize,
}

impl KeypadPos {
    /// Starting cursor: the "2" key.
    pub const START: KeypadPos = KeypadPos { row: 0, col: 1 };

    /// Clamps out-of-range coordinates onto the grid.
    pub fn new(row: usize, col: usize) -> Self {
        KeypadPos { row: row.min(ROWS - 1), col: col.min(COLS - 1) }
    }

    pub fn is_bottom_row(self) -> bool {
        self.row == ROWS - 1
    }

    pub fn up(self) -> Self { KeypadPos { row: self.row.saturating_sub(1), ..self } }
    pub fn down(self) -> Self { KeypadPos::new(self.row + 1, self.col) }
    pub fn left(self) -> Self { KeypadPos { col: self.col.saturating_sub(1), ..self } }
    pub fn right(self) -> Self { KeypadPos::new(self.row, self.col + 1) }

    pub fn key(self) -> Key {
        LAYOUT[self.row][self.col]
    }
}

impl Default for KeypadPos {
    fn default() -> Self {
        KeypadPos::START
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepDir {
    Down,
    Up,
}

/// Text form of the amount being entered. Always parses to a
/// non-negative number with at most one decimal point.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        InputBuffer { text: "0".to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.text.parse::<f64>().unwrap_or(0.0)
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Delete => self.delete(),
            Key::Dot => self.append('.'),
            Key::Digit(d) => self.append(char::from(b'0' + d.min(9))),
        }
    }

    fn append(&mut self, ch: char) {
        if self.text == "0" && ch != '.' {
            self.text = ch.to_string();
            return;
        }
        if ch == '.' && self.text.contains('.') {
            return;
        }
        if self.text.len() >= MAX_INPUT_LEN {
            return;
        }
        self.text.push(ch);
    }

    fn delete(&mut self) {
        if self.text.len() > 1 {
            self.text.pop();
        } else {
            self.text = "0".to_string();
        }
    }

    /// Current amount as a fraction of `max`, or None if `max` is unusable.
    pub fn fraction_of(&self, max: f64) -> Option<f64> {
        if !max.is_finite() || max <= 0.0 {
            return None;
        }
        Some(self.value() / max)
    }

    /// Rewrite the buffer to the next 5% multiple of `max` above/below
    /// the current fraction. No-op when `max` is zero or not finite.
    pub fn step_percent(&mut self, max: f64, dir: StepDir) {
        let Some(current) = self.fraction_of(max) else { return };
        let next = step_fraction(current, dir);
        self.text = format_amount(max * next);
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        InputBuffer::new()
    }
}

/// Next multiple of `STEP` strictly above (Up) or below (Down) `current`,
/// clamped to `[0, 1]`.
pub fn step_fraction(current: f64, dir: StepDir) -> f64 {
    let next = match dir {
        StepDir::Up => (((current + STEP_TOLERANCE) / STEP).floor() + 1.0) * STEP,
        StepDir::Down => (((current - STEP_TOLERANCE) / STEP).ceil() - 1.0) * STEP,
    };
    next.clamp(0.0, 1.0)
}

/// Four decimal places with trailing zeros and a dangling point removed.
pub fn format_amount(v: f64) -> String {
    let v = if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(s: &str) -> InputBuffer {
        InputBuffer { text: s.to_string() }
    }

    fn type_keys(b: &mut InputBuffer, keys: &[Key]) {
        for &k in keys { b.press(k); }
    }

    // ── Digit entry ──

    #[test]
    fn digit_replaces_lone_zero() {
        let mut b = InputBuffer::new();
        b.press(Key::Digit(5));
        assert_eq!(b.as_str(), "5");
    }

    #[test]
    fn dot_after_zero_keeps_zero() {
        let mut b = InputBuffer::new();
        type_keys(&mut b, &[Key::Dot, Key::Digit(5)]);
        assert_eq!(b.as_str(), "0.5");
    }

    #[test]
    fn second_dot_is_ignored() {
        let mut b = InputBuffer::new();
        type_keys(&mut b, &[Key::Digit(5), Key::Dot, Key::Digit(5)]);
        assert_eq!(b.as_str(), "5.5");
        b.press(Key::Dot);
        assert_eq!(b.as_str(), "5.5");
    }

    #[test]
    fn delete_last_char_resets_to_zero() {
        let mut b = buf("5");
        b.press(Key::Delete);
        assert_eq!(b.as_str(), "0");
        b.press(Key::Delete);
        assert_eq!(b.as_str(), "0");

        let mut b = buf("12.");
        b.press(Key::Delete);
        assert_eq!(b.as_str(), "12");
    }

    #[test]
    fn appends_stop_at_cap() {
        let mut b = InputBuffer::new();
        for _ in 0..15 { b.press(Key::Digit(9)); }
        assert_eq!(b.as_str().len(), MAX_INPUT_LEN);
        b.press(Key::Dot);
        assert_eq!(b.as_str(), "9999999999");
    }

    #[test]
    fn trailing_dot_still_parses() {
        assert_eq!(buf("5.").value(), 5.0);
        assert_eq!(buf("0").value(), 0.0);
    }

    // ── Percentage stepping ──

    #[test]
    fn step_up_goes_to_next_multiple() {
        let mut b = buf("12");
        b.step_percent(100.0, StepDir::Up);
        assert_eq!(b.as_str(), "15");
    }

    #[test]
    fn step_down_goes_to_previous_multiple() {
        let mut b = buf("12");
        b.step_percent(100.0, StepDir::Down);
        assert_eq!(b.as_str(), "10");
    }

    #[test]
    fn exact_multiple_moves_a_full_step() {
        let mut b = buf("15");
        b.step_percent(100.0, StepDir::Up);
        assert_eq!(b.as_str(), "20");
        let mut b = buf("15");
        b.step_percent(100.0, StepDir::Down);
        assert_eq!(b.as_str(), "10");
    }

    #[test]
    fn steps_clamp_to_range() {
        let mut b = buf("100");
        b.step_percent(100.0, StepDir::Up);
        assert_eq!(b.as_str(), "100");
        let mut b = buf("0");
        b.step_percent(100.0, StepDir::Down);
        assert_eq!(b.as_str(), "0");
        let mut b = buf("500");
        b.step_percent(100.0, StepDir::Down);
        assert_eq!(b.as_str(), "100");
    }

    #[test]
    fn step_result_is_normalized() {
        // 10000 USD / 64230.5 per BTC, 5% of that
        let max = 10000.0 / 64230.5;
        let mut b = InputBuffer::new();
        b.step_percent(max, StepDir::Up);
        assert_eq!(b.as_str(), "0.0078");
    }

    #[test]
    fn step_may_exceed_append_cap() {
        // 10000 USD at 0.0000123 per unit
        let max = 10000.0 / 0.0000123;
        let mut b = InputBuffer::new();
        b.step_percent(max, StepDir::Up);
        assert_eq!(b.as_str(), "40650406.5041");

        b.press(Key::Digit(7));
        assert_eq!(b.as_str(), "40650406.5041");
        b.press(Key::Delete);
        assert_eq!(b.as_str(), "40650406.504");
    }

    #[test]
    fn unusable_max_is_noop() {
        let mut b = buf("3");
        b.step_percent(0.0, StepDir::Up);
        assert_eq!(b.as_str(), "3");
        b.step_percent(f64::INFINITY, StepDir::Down);
        assert_eq!(b.as_str(), "3");
    }

    #[test]
    fn format_amount_trims() {
        assert_eq!(format_amount(15.000000000000002), "15");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(4166.666666), "4166.6667");
    }

    // ── Cursor ──

    #[test]
    fn cursor_clamps_at_edges() {
        let p = KeypadPos::new(0, 0);
        assert_eq!(p.up(), p);
        assert_eq!(p.left(), p);
        let q = KeypadPos::new(3, 2);
        assert_eq!(q.down(), q);
        assert_eq!(q.right(), q);
        assert!(q.is_bottom_row());
        assert_eq!(q.key(), Key::Delete);
    }

    #[test]
    fn start_is_two_key() {
        assert_eq!(KeypadPos::START.key(), Key::Digit(2));
    }
}
