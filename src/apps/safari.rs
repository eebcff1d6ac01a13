//! A tabbed browser shell. There is no network access: pages render as an
//! offline notice, and `about:blank` shows a favorites grid.

use crossterm::event::{Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::ui::{UiFrame, truncate_to_width};

pub const BLANK: &str = "about:blank";
const TAB_WIDTH: u16 = 16;
const FAVORITES: [(&str, &str); 4] = [
    ("Rust", "https://www.rust-lang.org"),
    ("crates.io", "https://crates.io"),
    ("docs.rs", "https://docs.rs"),
    ("GitHub", "https://github.com"),
];

/// Turn what the user typed into a URL: bare words become a search, a bare
/// host gets an `https://` scheme.
pub fn normalize_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("http://") || input.starts_with("https://") || input == BLANK {
        return Some(input.to_string());
    }
    if !input.contains('.') || input.contains(' ') {
        let query: String = input
            .chars()
            .map(|c| if c == ' ' { '+' } else { c })
            .collect();
        return Some(format!("https://www.google.com/search?q={query}"));
    }
    Some(format!("https://{input}"))
}

fn host_of(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    history: Vec<String>,
    index: usize,
}

impl Tab {
    fn blank() -> Self {
        Self {
            history: vec![BLANK.to_string()],
            index: 0,
        }
    }

    pub fn url(&self) -> &str {
        self.history.get(self.index).map_or(BLANK, String::as_str)
    }

    pub fn title(&self) -> String {
        match self.url() {
            BLANK => "New Tab".to_string(),
            url => host_of(url).to_string(),
        }
    }

    fn load(&mut self, url: String) {
        self.history.truncate(self.index + 1);
        self.history.push(url);
        self.index = self.history.len() - 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.history.len()
    }
}

pub struct SafariApp {
    tabs: Vec<Tab>,
    active: usize,
    input: String,
    keys: KeyBindings,
}

impl SafariApp {
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::blank()],
            active: 0,
            input: String::new(),
            keys: KeyBindings::default(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn sync_input(&mut self) {
        let url = self.active_tab().url();
        self.input = if url == BLANK {
            String::new()
        } else {
            url.to_string()
        };
    }

    pub fn new_tab(&mut self) {
        self.tabs.push(Tab::blank());
        self.active = self.tabs.len() - 1;
        self.input.clear();
    }

    /// Closing the last tab leaves a single blank tab behind.
    pub fn close_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        if self.tabs.len() == 1 {
            self.tabs[0] = Tab::blank();
        } else {
            self.tabs.remove(index);
            if self.active >= index && self.active > 0 {
                self.active -= 1;
            }
        }
        self.sync_input();
        true
    }

    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.active = index;
        self.sync_input();
        true
    }

    pub fn load(&mut self, input: &str) -> bool {
        let Some(url) = normalize_url(input) else {
            return false;
        };
        tracing::debug!(%url, "safari load");
        self.tabs[self.active].load(url);
        self.sync_input();
        true
    }

    pub fn go_back(&mut self) -> bool {
        let tab = &mut self.tabs[self.active];
        if !tab.can_go_back() {
            return false;
        }
        tab.index -= 1;
        self.sync_input();
        true
    }

    pub fn go_forward(&mut self) -> bool {
        let tab = &mut self.tabs[self.active];
        if !tab.can_go_forward() {
            return false;
        }
        tab.index += 1;
        self.sync_input();
        true
    }

    fn page_lines(&self, ctx: &ComponentContext<'_>) -> Vec<Line<'static>> {
        let palette = ctx.palette();
        let muted = Style::default().fg(palette.muted_fg);
        let url = self.active_tab().url();
        if url == BLANK {
            let mut lines = vec![
                Line::default(),
                Line::from(Span::styled(
                    "  Favorites",
                    palette.window().add_modifier(Modifier::BOLD),
                )),
                Line::default(),
            ];
            lines.extend(FAVORITES.iter().enumerate().map(|(idx, (name, _))| {
                Line::from(vec![
                    Span::styled(format!("  {}. ", idx + 1), muted),
                    Span::styled((*name).to_string(), palette.window()),
                ])
            }));
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "  Type an address and press Enter.",
                muted,
            )));
            return lines;
        }
        vec![
            Line::default(),
            Line::from(Span::styled(
                format!("  {}", host_of(url)),
                palette.window().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "  You are not connected to the Internet.",
                palette.window(),
            )),
            Line::from(Span::styled(format!("  {url}"), muted)),
        ]
    }
}

impl Default for SafariApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SafariApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        if area.height < 2 {
            return;
        }
        let strip = Style::default().bg(palette.header_bg).fg(palette.header_fg);
        frame.fill(Rect { height: 1, ..area }, strip);
        let mut x = area.x;
        for (idx, tab) in self.tabs.iter().enumerate() {
            let style = if idx == self.active {
                palette.window().add_modifier(Modifier::BOLD)
            } else {
                strip
            };
            let label = format!(" {:<w$}", truncate_to_width(&tab.title(), 13), w = 13);
            frame.set_string(area, x, area.y, &label, style);
            frame.set_string(area, x + TAB_WIDTH - 2, area.y, "×", style);
            x = x.saturating_add(TAB_WIDTH);
        }
        frame.set_string(area, x.saturating_add(1), area.y, "+", strip);

        let tab = self.active_tab();
        let muted = Style::default().fg(palette.muted_fg);
        let address = Line::from(vec![
            Span::styled("‹ ", if tab.can_go_back() { palette.window() } else { muted }),
            Span::styled("› ", if tab.can_go_forward() { palette.window() } else { muted }),
            Span::styled(
                if self.input.is_empty() {
                    "Search or enter website name".to_string()
                } else {
                    self.input.clone()
                },
                if self.input.is_empty() { muted } else { palette.window() },
            ),
        ]);
        frame.render_widget(
            address,
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );

        let page = Rect {
            y: area.y + 2,
            height: area.height.saturating_sub(2),
            ..area
        };
        let paragraph = Paragraph::new(self.page_lines(ctx))
            .style(palette.window())
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, page);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) => {
                if self.keys.matches(Action::NewItem, key) {
                    self.new_tab();
                    true
                } else if self.keys.matches(Action::DeleteItem, key) {
                    self.close_tab(self.active)
                } else if self.keys.matches(Action::GoBack, key) {
                    self.go_back()
                } else if self.keys.matches(Action::GoForward, key) {
                    self.go_forward()
                } else if self.keys.matches(Action::Activate, key) {
                    let input = self.input.clone();
                    self.load(&input)
                } else if self.keys.matches(Action::DismissMenu, key) {
                    self.sync_input();
                    true
                } else if self.keys.matches(Action::NavigateBack, key) {
                    self.input.pop().is_some()
                } else if let KeyCode::Char(c) = key.code
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.input.push(c);
                    true
                } else {
                    false
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                match mouse.row {
                    0 => {
                        let idx = usize::from(mouse.column / TAB_WIDTH);
                        if idx < self.tabs.len() {
                            if mouse.column % TAB_WIDTH == TAB_WIDTH - 2 {
                                self.close_tab(idx)
                            } else {
                                self.select_tab(idx)
                            }
                        } else if idx == self.tabs.len() {
                            self.new_tab();
                            true
                        } else {
                            false
                        }
                    }
                    1 => match mouse.column {
                        0..=1 => self.go_back(),
                        2..=3 => self.go_forward(),
                        _ => false,
                    },
                    row => {
                        // Favorites start on the fourth page row.
                        if self.active_tab().url() != BLANK || row < 5 {
                            return false;
                        }
                        match FAVORITES.get(usize::from(row - 5)) {
                            Some((_, url)) => self.load(url),
                            None => false,
                        }
                    }
                }
            }
            Event::Paste(text) => {
                self.input.push_str(text.trim());
                true
            }
            _ => false,
        }
    }

    fn title(&self) -> Option<String> {
        Some(format!("Safari: {}", self.active_tab().title()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SystemSettings;
    use crossterm::event::{KeyEvent, MouseEvent};

    fn send(app: &mut SafariApp, event: Event) -> bool {
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        app.handle_event(&event, &ctx)
    }

    fn type_and_enter(app: &mut SafariApp, text: &str) {
        for c in text.chars() {
            send(app, Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
        send(app, Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn urls_are_normalized() {
        assert_eq!(normalize_url("  "), None);
        assert_eq!(normalize_url("example.com").as_deref(), Some("https://example.com"));
        assert_eq!(
            normalize_url("http://example.com/a").as_deref(),
            Some("http://example.com/a")
        );
        assert_eq!(
            normalize_url("rust lang").as_deref(),
            Some("https://www.google.com/search?q=rust+lang")
        );
    }

    #[test]
    fn typing_and_enter_loads_into_history() {
        let mut app = SafariApp::new();
        type_and_enter(&mut app, "crates.io");
        assert_eq!(app.active_tab().url(), "https://crates.io");
        assert_eq!(app.title().as_deref(), Some("Safari: crates.io"));
        assert!(app.go_back());
        assert_eq!(app.active_tab().url(), BLANK);
        assert_eq!(app.input(), "");
        assert!(app.go_forward());
        assert_eq!(app.input(), "https://crates.io");
    }

    #[test]
    fn closing_the_last_tab_resets_it() {
        let mut app = SafariApp::new();
        app.load("docs.rs");
        app.new_tab();
        assert_eq!(app.tabs().len(), 2);
        assert!(send(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))
        ));
        assert_eq!(app.tabs().len(), 1);
        assert_eq!(app.active_tab().url(), "https://docs.rs");
        assert!(app.close_tab(0));
        assert_eq!(app.tabs().len(), 1);
        assert_eq!(app.active_tab().url(), BLANK);
    }

    #[test]
    fn clicking_a_favorite_loads_it() {
        let mut app = SafariApp::new();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 6,
            modifiers: KeyModifiers::NONE,
        });
        assert!(send(&mut app, click));
        assert_eq!(app.active_tab().url(), FAVORITES[1].1);
    }
}
