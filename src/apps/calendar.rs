use chrono::{Datelike, Local, Months, NaiveDate};
use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::theme;
use crate::ui::{UiFrame, centered_offset};

const WEEKDAYS: &str = "Su Mo Tu We Th Fr Sa";

/// Weeks of `month`, Sunday first. Days outside the month are `None`.
pub fn month_grid(first_of_month: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let offset = first_of_month.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first_of_month);
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = offset;
    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

pub fn days_in_month(first_of_month: NaiveDate) -> u32 {
    first_of_month
        .checked_add_months(Months::new(1))
        .map_or(31, |next| (next - first_of_month).num_days() as u32)
}

pub struct CalendarApp {
    today: NaiveDate,
    shown: NaiveDate,
    width: u16,
    keys: KeyBindings,
}

impl CalendarApp {
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            today,
            shown: first_of(today),
            width: 0,
            keys: KeyBindings::default(),
        }
    }

    /// First day of the month on screen.
    pub fn shown(&self) -> NaiveDate {
        self.shown
    }

    pub fn next_month(&mut self) -> bool {
        match self.shown.checked_add_months(Months::new(1)) {
            Some(next) => {
                self.shown = next;
                true
            }
            None => false,
        }
    }

    pub fn prev_month(&mut self) -> bool {
        match self.shown.checked_sub_months(Months::new(1)) {
            Some(prev) => {
                self.shown = prev;
                true
            }
            None => false,
        }
    }

    pub fn show_today(&mut self) {
        self.shown = first_of(self.today);
    }

    fn heading(&self) -> String {
        self.shown.format("%B %Y").to_string()
    }
}

fn first_of(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl Default for CalendarApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CalendarApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        self.width = area.width;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let left = area.x + centered_offset(WEEKDAYS, area.width);
        let heading = self.heading();
        frame.set_string(area, area.x, area.y, "‹", palette.window());
        frame.set_string(
            area,
            area.x + centered_offset(&heading, area.width),
            area.y,
            &heading,
            palette.window().add_modifier(Modifier::BOLD),
        );
        frame.set_string(
            area,
            area.right().saturating_sub(1),
            area.y,
            "›",
            palette.window(),
        );
        frame.set_string(
            area,
            left,
            area.y + 1,
            WEEKDAYS,
            Style::default().fg(palette.muted_fg),
        );

        let today_in_view = first_of(self.today) == self.shown;
        for (row, week) in month_grid(self.shown).iter().enumerate() {
            let y = area.y + 2 + row as u16;
            for (col, day) in week.iter().enumerate() {
                let Some(day) = day else {
                    continue;
                };
                let style = if today_in_view && *day == self.today.day() {
                    Style::default()
                        .bg(theme::close_button())
                        .fg(palette.window_bg)
                        .add_modifier(Modifier::BOLD)
                } else if col == 0 || col == 6 {
                    Style::default().fg(palette.muted_fg)
                } else {
                    palette.window()
                };
                let x = left + col as u16 * 3;
                frame.set_string(area, x, y, &format!("{day:>2}"), style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) => {
                if self.keys.matches(Action::SelectLeft, key)
                    || self.keys.matches(Action::ScrollPageUp, key)
                {
                    self.prev_month()
                } else if self.keys.matches(Action::SelectRight, key)
                    || self.keys.matches(Action::ScrollPageDown, key)
                {
                    self.next_month()
                } else if self.keys.matches(Action::ScrollHome, key) {
                    self.show_today();
                    true
                } else {
                    false
                }
            }
            Event::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) && mouse.row == 0 =>
            {
                if mouse.column < 2 {
                    self.prev_month()
                } else if mouse.column.saturating_add(2) >= self.width {
                    self.next_month()
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn title(&self) -> Option<String> {
        Some(format!("Calendar: {}", self.heading()))
    }
}
