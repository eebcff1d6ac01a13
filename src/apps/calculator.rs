use crossterm::event::{Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, centered_offset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Op {
    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Op::Add => Some(lhs + rhs),
            Op::Subtract => Some(lhs - rhs),
            Op::Multiply => Some(lhs * rhs),
            Op::Divide if rhs == 0.0 => None,
            Op::Divide => Some(lhs / rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Op(Op),
    Equals,
    Clear,
    Negate,
    Percent,
    Backspace,
}

const KEYPAD: [[(&str, Key); 4]; 5] = [
    [
        ("C", Key::Clear),
        ("±", Key::Negate),
        ("%", Key::Percent),
        ("÷", Key::Op(Op::Divide)),
    ],
    [
        ("7", Key::Digit(7)),
        ("8", Key::Digit(8)),
        ("9", Key::Digit(9)),
        ("×", Key::Op(Op::Multiply)),
    ],
    [
        ("4", Key::Digit(4)),
        ("5", Key::Digit(5)),
        ("6", Key::Digit(6)),
        ("−", Key::Op(Op::Subtract)),
    ],
    [
        ("1", Key::Digit(1)),
        ("2", Key::Digit(2)),
        ("3", Key::Digit(3)),
        ("+", Key::Op(Op::Add)),
    ],
    [
        ("0", Key::Digit(0)),
        (".", Key::Point),
        ("⌫", Key::Backspace),
        ("=", Key::Equals),
    ],
];

// Display row, then a blank row.
const KEYPAD_TOP: u16 = 2;

fn format_number(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    if rounded == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Immediate-execution calculator: operators apply left to right as they are
/// entered, without precedence.
#[derive(Debug, Clone)]
pub struct CalculatorApp {
    display: String,
    accumulator: Option<f64>,
    pending: Option<Op>,
    fresh_entry: bool,
    error: bool,
    key_width: u16,
}

impl CalculatorApp {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            accumulator: None,
            pending: None,
            fresh_entry: true,
            error: false,
            key_width: 6,
        }
    }

    pub fn display(&self) -> &str {
        if self.error { "Error" } else { &self.display }
    }

    fn value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    fn clear(&mut self) {
        *self = Self {
            key_width: self.key_width,
            ..Self::new()
        };
    }

    fn fold_pending(&mut self) -> bool {
        let rhs = self.value();
        let result = match (self.accumulator, self.pending) {
            (Some(lhs), Some(op)) => op.apply(lhs, rhs),
            _ => Some(rhs),
        };
        match result {
            Some(value) => {
                self.accumulator = Some(value);
                self.display = format_number(value);
                true
            }
            None => {
                tracing::debug!("calculator division by zero");
                self.clear();
                self.error = true;
                false
            }
        }
    }

    pub fn press(&mut self, key: Key) {
        if self.error && key != Key::Clear {
            self.clear();
        }
        match key {
            Key::Digit(d) => {
                if self.fresh_entry || self.display == "0" {
                    self.display.clear();
                    self.fresh_entry = false;
                }
                self.display.push(char::from(b'0' + d.min(9)));
            }
            Key::Point => {
                if self.fresh_entry {
                    self.display = "0".to_string();
                    self.fresh_entry = false;
                }
                if !self.display.contains('.') {
                    self.display.push('.');
                }
            }
            Key::Op(op) => {
                // Pressing a second operator in a row replaces the first.
                if (!self.fresh_entry || self.accumulator.is_none()) && !self.fold_pending() {
                    return;
                }
                self.pending = Some(op);
                self.fresh_entry = true;
            }
            Key::Equals => {
                if self.pending.is_some() && self.fold_pending() {
                    self.pending = None;
                    self.accumulator = None;
                }
                self.fresh_entry = true;
            }
            Key::Clear => self.clear(),
            Key::Negate => {
                if self.display != "0" {
                    self.display = match self.display.strip_prefix('-') {
                        Some(rest) => rest.to_string(),
                        None => format!("-{}", self.display),
                    };
                }
            }
            Key::Percent => {
                self.display = format_number(self.value() / 100.0);
                self.fresh_entry = true;
            }
            Key::Backspace => {
                if !self.fresh_entry {
                    self.display.pop();
                    if self.display.is_empty() || self.display == "-" {
                        self.display = "0".to_string();
                    }
                }
            }
        }
    }

    fn key_for_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Key::Digit(d as u8)),
            '.' | ',' => Some(Key::Point),
            '+' => Some(Key::Op(Op::Add)),
            '-' => Some(Key::Op(Op::Subtract)),
            '*' | 'x' => Some(Key::Op(Op::Multiply)),
            '/' => Some(Key::Op(Op::Divide)),
            '=' => Some(Key::Equals),
            '%' => Some(Key::Percent),
            'c' | 'C' => Some(Key::Clear),
            _ => None,
        }
    }
}

impl Default for CalculatorApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CalculatorApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        if area.width == 0 || area.height == 0 {
            return;
        }
        let display = self.display();
        let len = display.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(len + 1);
        frame.set_string(
            area,
            x,
            area.y,
            display,
            palette.window().add_modifier(Modifier::BOLD),
        );

        self.key_width = (area.width / 4).max(1);
        for (row_idx, row) in KEYPAD.iter().enumerate() {
            let y = area.y + KEYPAD_TOP + row_idx as u16;
            for (col_idx, (label, key)) in row.iter().enumerate() {
                let key_area = Rect::new(area.x + col_idx as u16 * self.key_width, y, self.key_width, 1);
                let style = match key {
                    Key::Op(_) | Key::Equals => Style::default().bg(theme::minimize_button()).fg(palette.window_bg),
                    Key::Digit(_) | Key::Point => Style::default().bg(palette.header_bg).fg(palette.window_fg),
                    _ => Style::default().bg(palette.border).fg(palette.window_fg),
                };
                let inner = Rect {
                    width: key_area.width.saturating_sub(1),
                    ..key_area
                };
                frame.fill(inner, style);
                let offset = centered_offset(label, inner.width);
                frame.set_string(inner, inner.x + offset, y, label, style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                let pressed = match key.code {
                    KeyCode::Char(c) => Self::key_for_char(c),
                    KeyCode::Enter => Some(Key::Equals),
                    KeyCode::Backspace => Some(Key::Backspace),
                    KeyCode::Esc | KeyCode::Delete => Some(Key::Clear),
                    _ => None,
                };
                match pressed {
                    Some(k) => {
                        self.press(k);
                        true
                    }
                    None => false,
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(row) = mouse
                    .row
                    .checked_sub(KEYPAD_TOP)
                    .and_then(|r| KEYPAD.get(usize::from(r)))
                else {
                    return false;
                };
                let col = usize::from(mouse.column / self.key_width.max(1));
                match row.get(col) {
                    Some((_, key)) => {
                        self.press(*key);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}
