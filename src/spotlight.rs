//! Spotlight: a search overlay over apps, settings and saved notes.
//!
//! While open it takes every key and press before the rest of the desktop.
//! Choosing a result queues the app to launch; the desktop drains the queue
//! and launches through the catalog like a dock click.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{Block, Borders, Clear};

use crate::apps::notes::{Note, saved_notes};
use crate::apps::settings_app::SettingRow;
use crate::apps::{AppCatalog, AppId};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::storage::Store;
use crate::theme::Palette;
use crate::ui::UiFrame;

pub const MAX_RESULTS: usize = 8;
const PREVIEW_CHARS: usize = 50;
const OVERLAY_MAX_WIDTH: u16 = 60;
const PROMPT: &str = "⌕ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    App,
    Setting,
    Note,
}

impl ResultKind {
    fn label(self) -> &'static str {
        match self {
            ResultKind::App => "Application",
            ResultKind::Setting => "System Settings",
            ResultKind::Note => "Note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotlightResult {
    pub kind: ResultKind,
    pub title: String,
    /// Kind label, or the start of the body for notes.
    pub detail: String,
    /// App launched when the result is chosen.
    pub app: AppId,
}

fn preview(body: &str) -> String {
    let flat: String = body
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let mut text: String = flat.chars().take(PREVIEW_CHARS).collect();
    if flat.chars().count() > PREVIEW_CHARS {
        text.push_str("...");
    }
    text
}

/// Case-insensitive substring search. Apps come first, then settings, then
/// notes matching on title or body. A blank query finds nothing.
pub fn search(query: &str, notes: &[Note]) -> Vec<SpotlightResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let apps = AppCatalog
        .descriptors()
        .iter()
        .filter(|d| hit(d.name))
        .map(|d| SpotlightResult {
            kind: ResultKind::App,
            title: d.name.to_string(),
            detail: ResultKind::App.label().to_string(),
            app: d.id,
        });
    let settings = SettingRow::ALL
        .into_iter()
        .filter(|row| hit(row.label()))
        .map(|row| SpotlightResult {
            kind: ResultKind::Setting,
            title: row.label().to_string(),
            detail: ResultKind::Setting.label().to_string(),
            app: AppId::Settings,
        });
    let notes = notes
        .iter()
        .filter(|note| hit(note.title()) || hit(&note.body))
        .map(|note| SpotlightResult {
            kind: ResultKind::Note,
            title: note.title().to_string(),
            detail: preview(&note.body),
            app: AppId::Notes,
        });
    apps.chain(settings).chain(notes).collect()
}

pub struct Spotlight {
    open: bool,
    query: String,
    results: Vec<SpotlightResult>,
    selected: usize,
    launches: Vec<AppId>,
    store: Store,
    keys: KeyBindings,
}

impl Spotlight {
    pub fn new(store: Store) -> Self {
        Self {
            open: false,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            launches: Vec::new(),
            store,
            keys: KeyBindings::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SpotlightResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<&SpotlightResult> {
        self.results.get(self.selected)
    }

    /// Opening always starts from an empty query.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            self.query.clear();
            self.refresh();
            tracing::debug!("spotlight opened");
        }
    }

    pub fn close(&mut self) {
        if self.open {
            tracing::debug!("spotlight closed");
        }
        self.open = false;
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh();
    }

    /// Apps chosen since the last call.
    pub fn take_launches(&mut self) -> Vec<AppId> {
        std::mem::take(&mut self.launches)
    }

    fn refresh(&mut self) {
        let notes = saved_notes(&self.store).unwrap_or_default();
        self.results = search(&self.query, &notes);
        self.results.truncate(MAX_RESULTS);
        self.selected = 0;
        tracing::trace!(query = %self.query, results = self.results.len(), "spotlight search");
    }

    fn choose(&mut self, index: usize) {
        if let Some(result) = self.results.get(index) {
            tracing::info!(app = %result.app, title = %result.title, "spotlight launch");
            self.launches.push(result.app);
            self.close();
        }
    }

    /// Keys go to the overlay while it is open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.open {
            return false;
        }
        if self.keys.matches(Action::DismissMenu, key) {
            self.close();
        } else if self.keys.matches(Action::SelectNext, key) {
            if self.selected + 1 < self.results.len() {
                self.selected += 1;
            }
        } else if self.keys.matches(Action::SelectPrev, key) {
            self.selected = self.selected.saturating_sub(1);
        } else if self.keys.matches(Action::Activate, key) {
            self.choose(self.selected);
        } else {
            match key.code {
                KeyCode::Backspace => {
                    if self.query.pop().is_some() {
                        self.refresh();
                    }
                }
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.query.push(c);
                    self.refresh();
                }
                _ => {}
            }
        }
        true
    }

    /// A press on a result chooses it; a press outside the overlay closes it.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, screen: Rect) -> bool {
        if !self.open {
            return false;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return true;
        }
        let rect = self.overlay_rect(screen);
        if !rect_contains(rect, mouse.column, mouse.row) {
            self.close();
            return true;
        }
        // Border, then the query row, then one row per result.
        let first_result = rect.y.saturating_add(2);
        if mouse.row >= first_result {
            self.choose(usize::from(mouse.row - first_result));
        }
        true
    }

    /// Centered horizontally, a fifth of the way down.
    pub fn overlay_rect(&self, screen: Rect) -> Rect {
        let width = OVERLAY_MAX_WIDTH.min(screen.width.saturating_sub(4)).max(1);
        let rows = self.results.len().max(1) as u16;
        let height = (rows + 3).min(screen.height);
        Rect {
            x: screen.x + (screen.width.saturating_sub(width)) / 2,
            y: screen.y + screen.height / 5,
            width,
            height,
        }
        .intersection(screen)
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, screen: Rect, palette: &Palette) {
        if !self.open {
            return;
        }
        let rect = self.overlay_rect(screen);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Spotlight ")
            .border_style(palette.menu().fg(palette.border_focused))
            .style(palette.menu());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if inner.height == 0 {
            return;
        }

        let prompt = format!("{PROMPT}{}▏", self.query);
        frame.set_string(inner, inner.x, inner.y, &prompt, palette.menu().add_modifier(Modifier::BOLD));
        if self.results.is_empty() && !self.query.trim().is_empty() {
            let y = inner.y.saturating_add(1);
            if y < inner.bottom() {
                frame.set_string(inner, inner.x + 1, y, "No results", palette.menu().fg(palette.menu_disabled_fg));
            }
            return;
        }
        for (index, result) in self.results.iter().enumerate() {
            let y = inner.y.saturating_add(1 + index as u16);
            if y >= inner.bottom() {
                break;
            }
            let line = Rect::new(inner.x, y, inner.width, 1);
            let style = if index == self.selected {
                palette.menu_selected()
            } else {
                palette.menu()
            };
            frame.fill(line, style);
            frame.set_string(line, inner.x + 1, y, &result.title, style);
            let detail_len = result.detail.chars().count() as u16 + 1;
            let title_end = inner.x + 2 + result.title.chars().count() as u16;
            let x = line.right().saturating_sub(detail_len).max(title_end);
            frame.set_string(line, x, y, &result.detail, style.remove_modifier(Modifier::BOLD).fg(palette.menu_disabled_fg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NOTES_KEY;
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn note(id: u64, body: &str) -> Note {
        Note {
            id,
            body: body.to_string(),
        }
    }

    #[test]
    fn search_groups_apps_then_settings_then_notes() {
        let notes = vec![note(1, "Shopping\nmilk, eggs"), note(2, "Dock ideas")];
        let results = search("dock", &notes);
        let kinds: Vec<ResultKind> = results.iter().map(|r| r.kind).collect();
        assert_eq!(kinds.first(), Some(&ResultKind::Setting));
        assert_eq!(kinds.last(), Some(&ResultKind::Note));
        assert!(results.iter().all(|r| r.kind != ResultKind::Note || r.title == "Dock ideas"));

        let results = search("NOTES", &notes);
        assert_eq!(results[0].kind, ResultKind::App);
        assert_eq!(results[0].app, AppId::Notes);
        assert!(search("   ", &notes).is_empty());
    }

    #[test]
    fn note_matches_on_body_with_a_short_preview() {
        let long = format!("Title\n{}", "x".repeat(80));
        let results = search("xxx", &[note(1, &long)]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Title");
        assert_eq!(results[0].detail.chars().count(), PREVIEW_CHARS + 3);
        assert!(results[0].detail.starts_with("Title x"));
    }

    #[test]
    fn typing_filters_and_enter_queues_a_launch() {
        let mut spotlight = Spotlight::new(Store::in_memory());
        assert!(!spotlight.handle_key(&key(KeyCode::Char('c'))));
        spotlight.toggle();
        for c in "calc".chars() {
            assert!(spotlight.handle_key(&key(KeyCode::Char(c))));
        }
        assert_eq!(spotlight.selected().map(|r| r.app), Some(AppId::Calculator));
        spotlight.handle_key(&key(KeyCode::Enter));
        assert!(!spotlight.is_open());
        assert_eq!(spotlight.take_launches(), vec![AppId::Calculator]);
        assert!(spotlight.take_launches().is_empty());
    }

    #[test]
    fn saved_notes_are_searchable() {
        let store = Store::in_memory();
        store.save(NOTES_KEY, &vec![note(4, "Meeting agenda")]);
        let mut spotlight = Spotlight::new(store);
        spotlight.toggle();
        spotlight.set_query("agenda");
        assert_eq!(spotlight.results().len(), 1);
        assert_eq!(spotlight.results()[0].app, AppId::Notes);
        spotlight.handle_key(&key(KeyCode::Esc));
        assert!(!spotlight.is_open());
        assert!(spotlight.take_launches().is_empty());
    }

    #[test]
    fn clicks_choose_results_or_dismiss() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut spotlight = Spotlight::new(Store::in_memory());
        spotlight.toggle();
        spotlight.set_query("a");
        let rect = spotlight.overlay_rect(screen);
        let second = spotlight.results()[1].app;
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert!(spotlight.handle_mouse(&click(rect.x + 3, rect.y + 3), screen));
        assert_eq!(spotlight.take_launches(), vec![second]);

        spotlight.toggle();
        assert!(spotlight.handle_mouse(&click(0, 0), screen));
        assert!(!spotlight.is_open());
        assert!(spotlight.take_launches().is_empty());
    }

    #[test]
    fn render_shows_the_query_and_results() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut spotlight = Spotlight::new(Store::in_memory());
        spotlight.toggle();
        spotlight.set_query("fin");
        let mut buffer = Buffer::empty(screen);
        let mut frame = UiFrame::from_parts(screen, &mut buffer);
        spotlight.render(&mut frame, screen, Palette::for_mode(Default::default()));
        let rect = spotlight.overlay_rect(screen);
        let row = |y: u16| -> String {
            (rect.x..rect.right()).map(|x| buffer[(x, y)].symbol().to_string()).collect()
        };
        assert!(row(rect.y + 1).contains("⌕ fin"));
        assert!(row(rect.y + 2).contains("Finder"));
    }
}
