use crossterm::event::Event;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{Component, ComponentContext};
use crate::ui::UiFrame;

/// A stand-in app that only shows its name and a status line.
#[derive(Debug, Clone)]
pub struct PlaceholderApp {
    name: &'static str,
    message: &'static str,
}

impl PlaceholderApp {
    pub fn new(name: &'static str, message: &'static str) -> Self {
        Self { name, message }
    }

    pub fn message(&self) -> &str {
        self.message
    }
}

impl Component for PlaceholderApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        if area.height == 0 {
            return;
        }
        let top_pad = area.height.saturating_sub(3) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::default()).collect();
        lines.push(Line::from(Span::styled(
            self.name,
            palette.window().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            self.message,
            Style::default().fg(palette.muted_fg),
        )));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(palette.window());
        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SystemSettings;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_name_and_message() {
        let area = Rect::new(0, 0, 40, 7);
        let mut buffer = Buffer::empty(area);
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        let mut app = PlaceholderApp::new("Mail", "No new messages.");
        app.render(&mut UiFrame::from_parts(area, &mut buffer), area, &ctx);
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Mail"));
        assert!(text.contains("No new messages."));
    }
}
