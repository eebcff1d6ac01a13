//! Notes: a sidebar of notes and a plain-text editor.
//!
//! A note's title is its first non-blank line. When opened with a store, the
//! whole list is saved under the `notes` key after every edit.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use serde::{Deserialize, Serialize};

use crate::components::{Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::storage::{NOTES_KEY, Store};
use crate::ui::UiFrame;

const UNTITLED: &str = "New Note";
const SIDEBAR_MAX_WIDTH: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    #[serde(rename = "content")]
    pub body: String,
}

/// Notes saved in `store`, if any were ever saved.
pub fn saved_notes(store: &Store) -> Option<Vec<Note>> {
    store.get(NOTES_KEY)
}

impl Note {
    pub fn title(&self) -> &str {
        self.body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or(UNTITLED)
    }
}

pub struct NotesApp {
    notes: Vec<Note>,
    selected: usize,
    editing: bool,
    next_id: u64,
    sidebar_width: u16,
    keys: KeyBindings,
    store: Option<Store>,
}

impl NotesApp {
    pub fn new() -> Self {
        Self::with_notes(vec![Note {
            id: 0,
            body: "Welcome to Notes\n\nPress Ctrl+N to start a new note.".to_string(),
        }])
    }

    /// Notes saved in `store`, or the welcome note on first run. Later edits
    /// are written back.
    pub fn load(store: Store) -> Self {
        let mut app = match saved_notes(&store) {
            Some(notes) => Self::with_notes(notes),
            None => Self::new(),
        };
        tracing::debug!(notes = app.notes.len(), "notes loaded");
        app.store = Some(store);
        app
    }

    fn with_notes(notes: Vec<Note>) -> Self {
        let next_id = notes.iter().map(|note| note.id + 1).max().unwrap_or(0);
        Self {
            notes,
            selected: 0,
            editing: false,
            next_id,
            sidebar_width: SIDEBAR_MAX_WIDTH,
            keys: KeyBindings::default(),
            store: None,
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            store.save(NOTES_KEY, &self.notes);
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// New notes go to the top of the list and open for editing.
    pub fn create_note(&mut self) {
        let note = Note {
            id: self.next_id,
            body: String::new(),
        };
        self.next_id += 1;
        self.notes.insert(0, note);
        self.selected = 0;
        self.editing = true;
        self.persist();
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.selected >= self.notes.len() {
            return false;
        }
        self.notes.remove(self.selected);
        self.selected = self.selected.min(self.notes.len().saturating_sub(1));
        if self.notes.is_empty() {
            self.editing = false;
        }
        self.persist();
        true
    }

    fn bump_selection(&mut self, delta: isize) {
        if self.notes.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.notes.len() - 1);
        }
    }

    fn sidebar_width_for(area: Rect) -> u16 {
        (area.width / 3).min(SIDEBAR_MAX_WIDTH)
    }

    fn edit_key(&mut self, key: &KeyEvent) -> bool {
        if self.keys.matches(Action::DismissMenu, key) {
            self.editing = false;
            return true;
        }
        let Some(note) = self.notes.get_mut(self.selected) else {
            self.editing = false;
            return false;
        };
        let edited = match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                note.body.push(c);
                true
            }
            KeyCode::Enter => {
                note.body.push('\n');
                true
            }
            KeyCode::Backspace => note.body.pop().is_some(),
            _ => false,
        };
        if edited {
            self.persist();
        }
        edited
    }

    fn browse_key(&mut self, key: &KeyEvent) -> bool {
        if self.keys.matches(Action::SelectPrev, key) {
            self.bump_selection(-1);
            true
        } else if self.keys.matches(Action::SelectNext, key) {
            self.bump_selection(1);
            true
        } else if self.keys.matches(Action::ScrollHome, key) {
            self.selected = 0;
            true
        } else if self.keys.matches(Action::ScrollEnd, key) {
            self.selected = self.notes.len().saturating_sub(1);
            true
        } else if self.keys.matches(Action::Activate, key) {
            self.editing = !self.notes.is_empty();
            true
        } else {
            false
        }
    }
}

impl Default for NotesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NotesApp {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext<'_>) {
        self.sidebar_width = Self::sidebar_width_for(area);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        self.sidebar_width = Self::sidebar_width_for(area);
        let sidebar = Rect {
            width: self.sidebar_width,
            ..area
        };
        let editor = Rect {
            x: area.x.saturating_add(self.sidebar_width + 1),
            width: area.width.saturating_sub(self.sidebar_width + 2),
            ..area
        };

        let sidebar_style = Style::default().bg(palette.header_bg).fg(palette.window_fg);
        frame.fill(sidebar, sidebar_style);
        let items: Vec<ListItem> = self
            .notes
            .iter()
            .map(|note| ListItem::new(note.title().to_string()))
            .collect();
        let highlight = if ctx.focused() && !self.editing {
            palette.menu_selected()
        } else {
            sidebar_style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        };
        let list = List::new(items).style(sidebar_style).highlight_style(highlight);
        let mut state = ListState::default().with_selected(
            (!self.notes.is_empty()).then_some(self.selected),
        );
        frame.render_stateful_widget(list, sidebar, &mut state);

        let Some(note) = self.notes.get(self.selected) else {
            frame.set_string(
                editor,
                editor.x,
                editor.y,
                "No notes. Press Ctrl+N.",
                Style::default().fg(palette.muted_fg),
            );
            return;
        };
        let mut lines: Vec<Line> = note
            .body
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect();
        if self.editing && ctx.focused()
            && let Some(last) = lines.last_mut()
        {
            last.spans.push(Span::styled("▏", Style::default().fg(crate::theme::accent())));
        }
        let paragraph = Paragraph::new(lines)
            .style(palette.window())
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, editor);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) => {
                if self.keys.matches(Action::NewItem, key) {
                    self.create_note();
                    true
                } else if self.keys.matches(Action::DeleteItem, key) {
                    self.delete_selected()
                } else if self.editing {
                    self.edit_key(key)
                } else {
                    self.browse_key(key)
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if mouse.column < self.sidebar_width {
                    let row = usize::from(mouse.row);
                    if row < self.notes.len() {
                        self.selected = row;
                    }
                    self.editing = false;
                } else {
                    self.editing = !self.notes.is_empty();
                }
                true
            }
            Event::Paste(text) if self.editing => {
                if let Some(note) = self.notes.get_mut(self.selected) {
                    note.body.push_str(text);
                    self.persist();
                }
                true
            }
            _ => false,
        }
    }

    fn title(&self) -> Option<String> {
        self.selected().map(|note| format!("Notes: {}", note.title()))
    }
}
