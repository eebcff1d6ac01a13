use crossterm::event::Event;
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{AppRequest, Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;

const INTRO: &str = indoc! {"
    Welcome to term-desk.

    Drag a window by its title bar, resize it from any edge or corner,
    and use the three buttons on the left of the title bar to close,
    minimize or zoom it. Double-click a title bar to zoom.

    Apps live in the dock. The menu bar shows the focused app's menus.
"};

const SHORTCUTS: [Action; 7] = [
    Action::Spotlight,
    Action::CycleWindows,
    Action::CloseWindow,
    Action::MinimizeWindow,
    Action::ZoomWindow,
    Action::OpenSettings,
    Action::Quit,
];

pub struct WelcomeApp {
    keys: KeyBindings,
    requests: Vec<AppRequest>,
}

impl WelcomeApp {
    pub fn new() -> Self {
        Self {
            keys: KeyBindings::default(),
            requests: Vec::new(),
        }
    }

    fn shortcut_lines(&self, style: Style) -> Vec<Line<'static>> {
        SHORTCUTS
            .iter()
            .map(|action| {
                let combos = self.keys.combos_for(*action).join(" / ");
                Line::from(vec![
                    Span::styled(format!("{combos:>12}  "), style.add_modifier(Modifier::BOLD)),
                    Span::styled(action.to_string(), style),
                ])
            })
            .collect()
    }
}

impl Default for WelcomeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WelcomeApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        let style = palette.window();
        frame.fill(area, style);
        let mut lines: Vec<Line> = INTRO
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect();
        if let Some(first) = lines.first_mut() {
            *first = Line::from(Span::styled(
                "Welcome to term-desk.",
                style.add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::default());
        lines.extend(self.shortcut_lines(style));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Press Enter to get started.",
            Style::default().fg(palette.muted_fg),
        )));
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).style(style);
        let inner = Rect {
            x: area.x.saturating_add(1),
            width: area.width.saturating_sub(2),
            ..area
        };
        frame.render_widget(paragraph, inner);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) if self.keys.matches(Action::Activate, key) => {
                self.requests.push(AppRequest::CloseWindow);
                true
            }
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}
