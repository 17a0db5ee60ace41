/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The handheld screen is a fixed 72x24 area centered in the terminal.
/// Everything the screens show is read from a `Scene`; the renderer owns
/// no application state beyond the market list scroll offset.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::coin::{AccountSnapshot, Coin, PerpContract, TransactionType};
use crate::domain::keypad::{KeypadPos, COLS, LAYOUT, ROWS};
use crate::sim::controller::Controller;
use crate::sim::state::{
    AccountColumn, AccountFocus, AdvisoryStatus, FocusState, FooterAction, MarketFocus,
    ModalChoice, QuitModal, TransactionFocus, TxFocus, ViewState,
};
use super::rain::{DigitalRain, Shade};

pub const SCREEN_W: u16 = 72;
pub const SCREEN_H: u16 = 24;

const W: usize = SCREEN_W as usize;
const H: usize = SCREEN_H as usize;

// ── Palette ──

const BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const TEXT: Color = Color::Rgb { r: 0, g: 255, b: 65 };
const DIM: Color = Color::Rgb { r: 0, g: 143, b: 17 };
const DARK: Color = Color::Rgb { r: 0, g: 59, b: 0 };
const ALERT: Color = Color::Rgb { r: 255, g: 0, b: 85 };
const INK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const HEAD: Color = Color::Rgb { r: 200, g: 255, b: 210 };
const BEZEL: Color = Color::Rgb { r: 40, g: 40, b: 48 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every empty cell, so the terminal's own
    /// default never shows through between rows.
    const BASE_BG: Color = BG;

    const BLANK: Cell = Cell { ch: ' ', fg: TEXT, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Painter: screen-relative drawing, clipped to the handheld area ──

struct Painter<'a> {
    buf: &'a mut FrameBuffer,
    ox: usize,
    oy: usize,
}

impl<'a> Painter<'a> {
    fn put(&mut self, x: usize, y: usize, ch: char, fg: Color, bg: Color) {
        if x < W && y < H {
            self.buf.set(self.ox + x, self.oy + y, Cell::new(ch, fg, bg));
        }
    }

    fn text(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i, y, ch, fg, bg);
        }
    }

    /// Text whose last character lands on column `right`.
    fn text_right(&mut self, right: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = (right + 1).saturating_sub(len);
        self.text(x, y, s, fg, bg);
    }

    fn text_center(&mut self, x: usize, width: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        self.text(x + width.saturating_sub(len) / 2, y, s, fg, bg);
    }

    fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.put(col, row, ' ', TEXT, bg);
            }
        }
    }

    fn hline(&mut self, x: usize, y: usize, w: usize, ch: char, fg: Color) {
        for col in x..x + w {
            self.put(col, y, ch, fg, BG);
        }
    }

    fn frame(&mut self, x: usize, y: usize, w: usize, h: usize, fg: Color) {
        if w < 2 || h < 2 {
            return;
        }
        self.fill(x, y, w, h, BG);
        self.put(x, y, '┌', fg, BG);
        self.put(x + w - 1, y, '┐', fg, BG);
        self.put(x, y + h - 1, '└', fg, BG);
        self.put(x + w - 1, y + h - 1, '┘', fg, BG);
        for col in x + 1..x + w - 1 {
            self.put(col, y, '─', fg, BG);
            self.put(col, y + h - 1, '─', fg, BG);
        }
        for row in y + 1..y + h - 1 {
            self.put(x, row, '│', fg, BG);
            self.put(x + w - 1, row, '│', fg, BG);
        }
    }

    fn dashed_frame(&mut self, x: usize, y: usize, w: usize, h: usize, fg: Color) {
        if w < 2 || h < 2 {
            return;
        }
        for col in x..x + w {
            let ch = if col % 2 == 0 { '-' } else { ' ' };
            self.put(col, y, ch, fg, BG);
            self.put(col, y + h - 1, ch, fg, BG);
        }
        for row in y + 1..y + h - 1 {
            let ch = if row % 2 == 0 { '¦' } else { ' ' };
            self.put(x, row, ch, fg, BG);
            self.put(x + w - 1, row, ch, fg, BG);
        }
    }

    /// Button label, inverted when focused.
    fn button(&mut self, x: usize, y: usize, label: &str, focused: bool, enabled: bool, blink: bool) {
        let (fg, bg) = match (focused, enabled) {
            (_, false) => (DARK, BG),
            (true, true) => (INK, TEXT),
            (false, true) => (DIM, BG),
        };
        let marker = if focused && enabled && blink { '>' } else { ' ' };
        let s = format!("[{marker}{label} ]");
        self.text(x, y, &s, fg, bg);
    }
}

// ── Scene: everything a frame reads ──

pub struct Scene<'a> {
    pub ctl: &'a Controller,
    pub perps: &'a [PerpContract],
    pub account: &'a AccountSnapshot,
    pub notification: Option<&'a str>,
    pub rain: Option<&'a DigitalRain>,
    /// Startup animation progress, 0.0..=1.0. None once finished.
    pub power_on: Option<f32>,
    pub blink: bool,
    /// A gamepad is attached.
    pub pad: bool,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    market_scroll: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            market_scroll: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((SCREEN_W, SCREEN_H));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    pub fn render(&mut self, scene: &Scene) -> io::Result<()> {
        self.sync_size()?;

        self.front.clear();
        let ox = self.term_w.saturating_sub(W) / 2;
        let oy = self.term_h.saturating_sub(H) / 2;
        self.market_scroll = compose(&mut self.front, ox, oy, scene, self.market_scroll);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = TEXT;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

/// Draw one frame. Returns the updated market list scroll offset.
fn compose(buf: &mut FrameBuffer, ox: usize, oy: usize, scene: &Scene, scroll: usize) -> usize {
    let mut p = Painter { buf, ox, oy };
    let ctl = scene.ctl;
    let mut scroll = scroll;

    compose_bezel(&mut p, scene.pad);

    match ctl.focus() {
        FocusState::MarketList(_) => {
            compose_header(&mut p, ViewState::MarketList);
            scroll = compose_market(&mut p, ctl.coins(), ctl.market_focus(), scroll, scene.blink);
        }
        FocusState::Derivatives => {
            compose_header(&mut p, ViewState::Derivatives);
            compose_derivatives(&mut p, scene.perps, scene.blink);
        }
        FocusState::Account(a) => {
            compose_header(&mut p, ViewState::Account);
            compose_account(&mut p, scene.account, *a);
        }
        FocusState::Transaction(tx) => {
            compose_transaction(&mut p, tx, ctl.buying_power_usd(), scene.blink);
        }
    }

    if let Some(rain) = scene.rain {
        compose_rain(&mut p, rain);
    }
    if let Some(modal) = ctl.modal() {
        compose_modal(&mut p, modal, scene.blink);
    }
    if let Some(text) = scene.notification {
        compose_notification(&mut p, text);
    }
    if let Some(progress) = scene.power_on {
        compose_power_on(&mut p, progress);
    }
    scroll
}

fn compose_bezel(p: &mut Painter, pad: bool) {
    p.put(0, 0, '╔', BEZEL, BG);
    p.put(W - 1, 0, '╗', BEZEL, BG);
    p.put(0, H - 1, '╚', BEZEL, BG);
    p.put(W - 1, H - 1, '╝', BEZEL, BG);
    for x in 1..W - 1 {
        p.put(x, 0, '═', BEZEL, BG);
        p.put(x, H - 1, '═', BEZEL, BG);
    }
    for y in 1..H - 1 {
        p.put(0, y, '║', BEZEL, BG);
        p.put(W - 1, y, '║', BEZEL, BG);
    }
    if pad {
        p.text(W - 9, H - 1, " PAD ● ", BEZEL, BG);
    }
}

fn view_title(view: ViewState) -> &'static str {
    match view {
        ViewState::MarketList => "> SPOT_TRADE",
        ViewState::Derivatives => "> PERP_ENGINE",
        ViewState::Account => "> SYS_ACCOUNT",
        ViewState::Transaction => "> ORDER",
    }
}

fn compose_header(p: &mut Painter, active: ViewState) {
    p.text(2, 1, view_title(active), TEXT, BG);

    // Right to left: shoulder hint, then the tab strip.
    let hint = " L1  R1 ";
    let hint_x = W - 2 - hint.chars().count();
    p.text(hint_x, 1, hint, INK, DIM);

    let mut x = hint_x - 2;
    for (i, view) in ViewState::CYCLE.iter().rev().enumerate() {
        let label = view.tab_label();
        x -= label.chars().count();
        let (fg, bg) = if *view == active { (INK, TEXT) } else { (DIM, BG) };
        p.text(x, 1, label, fg, bg);
        if i + 1 < ViewState::CYCLE.len() {
            x -= 3;
            p.text(x, 1, " | ", DARK, BG);
        }
    }

    p.hline(1, 2, W - 2, '━', DIM);
}

// ── Market list ──

const LIST_TOP: usize = 4;
const LIST_ROWS: usize = 15;

/// Keep `selected` inside a window of `visible` rows starting at `top`,
/// moving the window as little as possible.
fn follow_scroll(top: usize, selected: usize, count: usize, visible: usize) -> usize {
    if count <= visible || visible == 0 {
        return 0;
    }
    let top = if selected < top {
        selected
    } else if selected >= top + visible {
        selected + 1 - visible
    } else {
        top
    };
    top.min(count - visible)
}

fn compose_market(p: &mut Painter, coins: &[Coin], m: MarketFocus, scroll: usize, blink: bool) -> usize {
    p.text(4, 3, "CODE", DIM, BG);
    p.text_center(14, 20, 3, "HOLDINGS", DIM, BG);
    p.text_right(51, 3, "PRICE", DIM, BG);
    p.text_right(66, 3, "24H", DIM, BG);

    let top = follow_scroll(scroll, m.row, coins.len(), LIST_ROWS);
    for (slot, (idx, coin)) in coins.iter().enumerate().skip(top).take(LIST_ROWS).enumerate() {
        let y = LIST_TOP + slot;
        let selected = idx == m.row;
        let (fg, bg) = if selected { (INK, TEXT) } else { (TEXT, BG) };
        if selected {
            p.fill(1, y, W - 2, 1, TEXT);
            p.put(1, y, if blink { '█' } else { ' ' }, INK, TEXT);
        }
        p.text(4, y, coin.symbol, fg, bg);
        if coin.has_holdings() {
            p.text_center(14, 20, y, &format!("{:.2}", coin.holdings), fg, bg);
        }
        p.text_right(51, y, &group_thousands(coin.price, 2), fg, bg);
        let change_fg = if selected { INK } else if coin.is_up() { TEXT } else { ALERT };
        p.text_right(66, y, &signed_change(coin.change_24h), change_fg, bg);
    }
    if top > 0 {
        p.put(W - 3, LIST_TOP, '▲', DIM, BG);
    }
    if top + LIST_ROWS < coins.len() {
        p.put(W - 3, LIST_TOP + LIST_ROWS - 1, '▼', DIM, BG);
    }

    p.hline(1, 20, W - 2, '━', DIM);
    if let Some(coin) = coins.get(m.row) {
        let status = holding_line(coin);
        let status: String = status.chars().take(44).collect();
        p.text(2, 21, &status, TEXT, BG);
        p.button(48, 21, "BUY", m.footer == FooterAction::Buy, true, blink);
        p.button(58, 21, "SELL", m.footer == FooterAction::Sell, coin.has_holdings(), blink);
    }
    top
}

fn holding_line(coin: &Coin) -> String {
    if coin.has_holdings() {
        format!(
            "HOLD: {} {} (${})",
            coin.holdings,
            coin.symbol,
            group_thousands(coin.holding_value(), 2)
        )
    } else {
        format!("WALLET: NO {} ASSETS", coin.symbol)
    }
}

// ── Derivatives ──

fn compose_derivatives(p: &mut Painter, perps: &[PerpContract], blink: bool) {
    let card_w = 22;
    for (i, perp) in perps.iter().take(3).enumerate() {
        let x = 2 + i * (card_w + 1);
        p.frame(x, 4, card_w, 7, DIM);
        p.text(x + 2, 5, perp.symbol, TEXT, BG);
        p.text_right(x + card_w - 3, 5, perp.leverage, INK, DIM);
        p.text(x + 2, 7, "MARK", DIM, BG);
        p.text_right(x + card_w - 3, 7, perp.mark_price, TEXT, BG);
        p.text(x + 2, 8, &format!("FUNDING: {}", perp.funding), DIM, BG);
    }

    p.dashed_frame(2, 12, W - 4, 6, DARK);
    p.text_center(2, W - 4, 14, "--- SIGNAL_STABLE: AWAITING_ORDERS ---", DIM, BG);

    p.hline(1, 20, W - 2, '━', DIM);
    if blink {
        p.text_center(1, W - 2, 21, "PRESS [A] TO INITIALIZE POSITION", TEXT, BG);
    }
}

// ── Account ──

fn compose_account(p: &mut Painter, acct: &AccountSnapshot, focus: AccountFocus) {
    let col_w = 33;
    let left_fg = if focus.column == AccountColumn::Primary { TEXT } else { DARK };
    let right_fg = if focus.column == AccountColumn::Secondary { TEXT } else { DARK };

    let x = 2;
    p.frame(x, 4, col_w, 15, left_fg);
    p.text(x + 2, 5, acct.exchange_name, INK, left_fg);
    p.text(x + 2, 7, "Total_Value", DIM, BG);
    p.text(x + 2, 8, acct.total_value, TEXT, BG);
    p.text(x + 2, 10, "24h_PnL_Flux", DIM, BG);
    p.text(x + 2, 11, acct.pnl_24h, TEXT, BG);
    p.text(x + 2, 13, "USDC_Balance", DIM, BG);
    p.text(x + 2, 14, acct.exchange_usdc, TEXT, BG);
    p.text(x + 2, 16, "<- DEPOSIT USDC", left_fg, BG);

    let x = 2 + col_w + 2;
    p.frame(x, 4, col_w, 15, right_fg);
    p.text(x + 2, 5, acct.wallet_name, INK, right_fg);
    p.text(x + 2, 6, &acct.short_address(), DIM, BG);
    p.text(x + 2 + 14, 6, "[X]", TEXT, BG);
    p.text(x + 2, 8, "ETH_Balance", DIM, BG);
    p.text(x + 2, 9, acct.wallet_eth, TEXT, BG);
    p.text(x + 2, 11, "USDC_Balance", DIM, BG);
    p.text(x + 2, 12, acct.wallet_usdc, TEXT, BG);
    p.text(x + 2, 14, acct.gas_note, DIM, BG);
    p.text(x + 2, 16, "WITHDRAW USDC ->", right_fg, BG);

    p.hline(1, 20, W - 2, '━', DIM);
    p.text(2, 21, "D-PAD", DIM, BG);
    p.text(8, 21, "SELECT SOURCE", DARK, BG);

    if focus.address_open {
        let bw = 48;
        let bx = (W - bw) / 2;
        p.frame(bx, 8, bw, 7, TEXT);
        p.text_center(bx, bw, 9, "WALLET_ADDRESS", DIM, BG);
        p.text_center(bx, bw, 11, acct.wallet_address, TEXT, BG);
        p.text_center(bx, bw, 13, "[B] CLOSE_BUFFER", INK, DIM);
    }
}

// ── Transaction ──

const KEY_W: usize = 14;
const KEYPAD_X: usize = 3;
const KEYPAD_Y: usize = 9;

const INPUT_W: usize = 42;

fn compose_transaction(p: &mut Painter, tx: &TransactionFocus, buying_power: f64, blink: bool) {
    let coin = &tx.coin;
    let kind_fg = match tx.kind {
        TransactionType::Buy => TEXT,
        TransactionType::Sell => ALERT,
    };
    p.text(2, 1, &format!("{}_ORDER: {}", tx.kind.label(), coin.symbol), kind_fg, BG);
    p.text(2, 2, &format!("CURR_PRICE: ${}", group_thousands(coin.price, 2)), DIM, BG);
    p.text_right(W - 3, 1, "AVAILABLE_FUNDS", DIM, BG);
    let funds = match tx.kind {
        TransactionType::Buy => format!("{} USD", group_thousands(buying_power, 2)),
        TransactionType::Sell => format!("{:.4} {}", coin.holdings, coin.symbol),
    };
    p.text_right(W - 3, 2, &funds, TEXT, BG);
    p.hline(1, 3, W - 2, '━', DIM);

    // Input display
    p.frame(2, 4, 46, 4, DIM);
    p.text(4, 4, "INPUT_BUFFER", DIM, BG);
    let cursor = if blink { "_" } else { " " };
    let entry = format!("{}{}", tx.input.as_str(), cursor);
    p.text_right(45, 5, &clip_left(&entry, INPUT_W), TEXT, BG);
    let usd = tx.input.value() * coin.price;
    let usd = format!("≈ ${} USD", group_thousands(usd, 2));
    p.text_right(45, 6, &clip_left(&usd, INPUT_W), DIM, BG);

    // Keypad
    let cursor_pos = tx.focus.keypad_cursor();
    for row in 0..ROWS {
        for col in 0..COLS {
            let pos = KeypadPos::new(row, col);
            let label = LAYOUT[row][col].label();
            let focused = cursor_pos == Some(pos);
            let (fg, bg) = if focused { (INK, TEXT) } else { (TEXT, DARK) };
            let x = KEYPAD_X + col * (KEY_W + 1);
            let y = KEYPAD_Y + row * 2;
            p.fill(x, y, KEY_W, 1, bg);
            p.text_center(x, KEY_W, y, &label, fg, bg);
        }
    }

    // Allocation meter
    let pct = tx.allocation_percent(buying_power);
    p.text(51, 4, "ALLOCATION_METER", DIM, BG);
    let meter_h = 9;
    let filled = ((pct / 100.0) * meter_h as f64).round() as usize;
    p.frame(56, 5, 6, meter_h + 2, DIM);
    for i in 0..meter_h {
        let y = 5 + meter_h - i;
        let on = i < filled;
        let ch = if on { '█' } else { '░' };
        for x in 57..61 {
            p.put(x, y, ch, if on { kind_fg } else { DARK }, BG);
        }
    }
    p.text_center(50, 18, 16, &format!("{:.0}%", pct), TEXT, BG);
    p.text(51, 17, "L1", INK, DIM);
    p.text(54, 17, "DECREASE 5%", DIM, BG);
    p.text(51, 18, "R1", INK, DIM);
    p.text(54, 18, "INCREASE 5%", DIM, BG);

    // Oracle panel
    p.text(3, 17, "ORACLE", INK, DIM);
    let oracle = match &tx.advisory {
        AdvisoryStatus::Idle => "PRESS [X] TO CONSULT THE OPERATOR".to_string(),
        AdvisoryStatus::Pending => {
            if blink { "> ANALYZING FLUX...".to_string() } else { "> ANALYZING FLUX".to_string() }
        }
        AdvisoryStatus::Ready(text) => text.clone(),
    };
    for (i, line) in wrap(&oracle, 44).into_iter().take(2).enumerate() {
        p.text(3, 18 + i, &line, TEXT, BG);
    }

    // Footer
    p.hline(1, 20, W - 2, '━', DIM);
    let on_confirm = matches!(tx.focus, TxFocus::Confirm { .. });
    let on_cancel = matches!(tx.focus, TxFocus::Cancel { .. });
    p.button(14, 21, "CONFIRM_EXEC", on_confirm, true, blink);
    p.button(40, 21, "ABORT", on_cancel, true, blink);
}

// ── Overlays ──

fn compose_rain(p: &mut Painter, rain: &DigitalRain) {
    for cell in rain.cells() {
        let fg = match cell.shade {
            Shade::Head => HEAD,
            Shade::Bright => TEXT,
            Shade::Dim => DIM,
        };
        // rain is sized to the area inside the bezel
        p.put(cell.x as usize + 1, cell.y as usize + 1, cell.ch, fg, BG);
    }
}

fn compose_modal(p: &mut Painter, modal: &QuitModal, blink: bool) {
    let bw = 52;
    let bx = (W - bw) / 2;
    let by = 6;
    p.frame(bx, by, bw, 11, ALERT);
    p.text_center(bx, bw, by, " SYSTEM_HALT ", INK, ALERT);

    let mut text = modal.revealed().to_string();
    if !modal.fully_revealed() || blink {
        text.push('_');
    }
    for (i, line) in wrap(&text, bw - 6).into_iter().take(4).enumerate() {
        p.text(bx + 3, by + 2 + i, &line, TEXT, BG);
    }

    let quit = modal.choice == ModalChoice::Quit;
    let (qf, qb) = if quit { (INK, ALERT) } else { (ALERT, BG) };
    let (sf, sb) = if quit { (DIM, BG) } else { (INK, TEXT) };
    p.text(bx + 8, by + 8, " Yes (Quit) ", qf, qb);
    p.text(bx + bw - 8 - 11, by + 8, " No (Stay) ", sf, sb);
}

fn compose_notification(p: &mut Painter, text: &str) {
    let line = format!(" ▲ {} ", text);
    let len = line.chars().count().min(W - 4);
    let bx = (W - len) / 2;
    let by = H / 2 - 1;
    p.fill(bx, by, len, 3, TEXT);
    let shown: String = line.chars().take(len).collect();
    p.text(bx, by + 1, &shown, INK, TEXT);
}

/// Startup: a thin line grows across the middle, then opens vertically.
fn compose_power_on(p: &mut Painter, progress: f32) {
    let progress = progress.clamp(0.0, 1.0);
    let mid = H / 2;
    if progress < 0.5 {
        p.fill(0, 0, W, H, BG);
        let width = ((W as f32) * progress * 2.0) as usize;
        let x = (W - width.min(W)) / 2;
        p.hline(x, mid, width, '━', HEAD);
        return;
    }
    let half = ((H as f32 / 2.0) * (progress - 0.5) * 2.0) as usize;
    let top = mid.saturating_sub(half);
    let bottom = (mid + half).min(H);
    p.fill(0, 0, W, top, BG);
    p.fill(0, bottom, W, H - bottom, BG);
}

// ── Formatting helpers ──

/// Fixed decimals with comma-grouped integer part: 64230.5 -> "64,230.50".
fn group_thousands(v: f64, decimals: usize) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let s = format!("{:.*}", decimals, v.abs());
    let (int, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3 + 1);
    if v < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Keep the rightmost `width` chars, marking the cut with `…`.
fn clip_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width || width == 0 {
        return s.to_string();
    }
    let tail: String = s.chars().skip(len - width + 1).collect();
    format!("…{tail}")
}

fn signed_change(change: f64) -> String {
    if change >= 0.0 { format!("+{change}%") } else { format!("{change}%") }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
