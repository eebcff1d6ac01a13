//! A browser over a small in-memory folder tree.
//!
//! `/Applications` lists the dock apps; opening one asks the desktop to
//! launch it. Other entries can be renamed and deleted, and new folders
//! created. Deleting a folder deletes everything below it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table, TableState};

use crate::apps::{AppCatalog, AppId};
use crate::components::{AppRequest, Component, ComponentContext};
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;

pub const APPLICATIONS: &str = "/Applications";
const NEW_FOLDER: &str = "untitled folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File { size: u64 },
    App(AppId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    fn kind_label(&self) -> &'static str {
        match self.kind {
            EntryKind::Folder => "Folder",
            EntryKind::File { .. } => "Document",
            EntryKind::App(_) => "Application",
        }
    }

    fn size_label(&self) -> String {
        match self.kind {
            EntryKind::File { size } => format_size(size),
            _ => "-".to_string(),
        }
    }

    fn glyph(&self) -> &'static str {
        match self.kind {
            EntryKind::Folder => "▸",
            EntryKind::File { .. } => "·",
            EntryKind::App(id) => AppCatalog.get(id).map_or("·", |d| d.icon),
        }
    }
}

// (parent, name, kind)
const SEED: &[(&str, &str, EntryKind)] = &[
    ("/", "Applications", EntryKind::Folder),
    ("/", "Desktop", EntryKind::Folder),
    ("/", "Documents", EntryKind::Folder),
    ("/", "Downloads", EntryKind::Folder),
    ("/", "README.md", EntryKind::File { size: 1024 }),
    ("/", "profile.jpg", EntryKind::File { size: 2048 }),
    ("/Documents", "Document1.txt", EntryKind::File { size: 512 }),
    ("/Documents", "Document2.txt", EntryKind::File { size: 768 }),
    ("/Downloads", "download.zip", EntryKind::File { size: 10240 }),
];

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < KB * KB {
        format!("{:.1} KB", value / KB)
    } else if value < KB * KB * KB {
        format!("{:.1} MB", value / (KB * KB))
    } else {
        format!("{:.1} GB", value / (KB * KB * KB))
    }
}

fn join(path: &str, name: &str) -> String {
    if path == "/" {
        format!("/{name}")
    } else {
        format!("{path}/{name}")
    }
}

fn is_below(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    parent: String,
    entry: Entry,
}

/// Why a tree edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    NotFound,
    Protected,
    InvalidName,
    NameTaken,
}

/// The folder tree. `/Applications` is virtual and read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    nodes: Vec<Node>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self {
            nodes: SEED
                .iter()
                .map(|(parent, name, kind)| Node {
                    parent: (*parent).to_string(),
                    entry: Entry {
                        name: (*name).to_string(),
                        kind: *kind,
                    },
                })
                .collect(),
        }
    }
}

impl FileTree {
    /// Entries directly under `path`.
    pub fn list(&self, path: &str) -> Vec<Entry> {
        if path == APPLICATIONS {
            return AppCatalog
                .dock_apps()
                .map(|d| Entry {
                    name: d.name.to_string(),
                    kind: EntryKind::App(d.id),
                })
                .collect();
        }
        self.nodes
            .iter()
            .filter(|node| node.parent == path)
            .map(|node| node.entry.clone())
            .collect()
    }

    fn position(&self, parent: &str, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.parent == parent && node.entry.name == name)
    }

    fn check_editable(&self, parent: &str, name: &str) -> Result<usize, TreeError> {
        if is_below(parent, APPLICATIONS) || join(parent, name) == APPLICATIONS {
            return Err(TreeError::Protected);
        }
        self.position(parent, name).ok_or(TreeError::NotFound)
    }

    fn check_name(&self, parent: &str, name: &str) -> Result<(), TreeError> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(TreeError::InvalidName);
        }
        if self.position(parent, name).is_some() {
            return Err(TreeError::NameTaken);
        }
        Ok(())
    }

    /// New empty folder under `parent`, named `untitled folder`, then
    /// `untitled folder 2` and so on. Returns the name used.
    pub fn create_folder(&mut self, parent: &str) -> Result<String, TreeError> {
        if is_below(parent, APPLICATIONS) {
            return Err(TreeError::Protected);
        }
        let name = (1..)
            .map(|n| {
                if n == 1 {
                    NEW_FOLDER.to_string()
                } else {
                    format!("{NEW_FOLDER} {n}")
                }
            })
            .find(|name| self.position(parent, name).is_none())
            .ok_or(TreeError::NameTaken)?;
        self.nodes.push(Node {
            parent: parent.to_string(),
            entry: Entry {
                name: name.clone(),
                kind: EntryKind::Folder,
            },
        });
        Ok(name)
    }

    /// Rename an entry in place; a folder's contents move with it.
    pub fn rename(&mut self, parent: &str, name: &str, new_name: &str) -> Result<(), TreeError> {
        let index = self.check_editable(parent, name)?;
        let new_name = new_name.trim();
        if new_name == name {
            return Ok(());
        }
        self.check_name(parent, new_name)?;
        let old_path = join(parent, name);
        let new_path = join(parent, new_name);
        for node in &mut self.nodes {
            if is_below(&node.parent, &old_path) {
                node.parent = format!("{new_path}{}", &node.parent[old_path.len()..]);
            }
        }
        self.nodes[index].entry.name = new_name.to_string();
        tracing::debug!(from = %old_path, to = %new_path, "finder rename");
        Ok(())
    }

    /// Delete an entry and, for folders, everything below it. Returns how
    /// many entries were removed.
    pub fn delete(&mut self, parent: &str, name: &str) -> Result<usize, TreeError> {
        self.check_editable(parent, name)?;
        let path = join(parent, name);
        let before = self.nodes.len();
        self.nodes.retain(|node| {
            !(node.parent == parent && node.entry.name == name) && !is_below(&node.parent, &path)
        });
        let removed = before - self.nodes.len();
        tracing::debug!(%path, removed, "finder delete");
        Ok(removed)
    }
}

pub struct FinderApp {
    tree: FileTree,
    history: Vec<String>,
    history_index: usize,
    entries: Vec<Entry>,
    table: TableState,
    /// Name being typed while renaming the selected entry.
    renaming: Option<String>,
    requests: Vec<AppRequest>,
    keys: KeyBindings,
}

// Toolbar row plus table header row.
const LIST_TOP: u16 = 2;

impl FinderApp {
    pub fn new() -> Self {
        let mut app = Self {
            tree: FileTree::default(),
            history: vec!["/".to_string()],
            history_index: 0,
            entries: Vec::new(),
            table: TableState::default(),
            renaming: None,
            requests: Vec::new(),
            keys: KeyBindings::default(),
        };
        app.reload();
        app
    }

    pub fn path(&self) -> &str {
        self.history
            .get(self.history_index)
            .map_or("/", String::as_str)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.table.selected().and_then(|idx| self.entries.get(idx))
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn is_renaming(&self) -> bool {
        self.renaming.is_some()
    }

    fn reload(&mut self) {
        self.renaming = None;
        self.entries = self.tree.list(self.path());
        let selected = (!self.entries.is_empty()).then_some(0);
        self.table = TableState::default().with_selected(selected);
    }

    /// Re-list the current folder keeping `name` selected when it is there.
    fn reload_selecting(&mut self, name: Option<&str>) {
        let previous = self.table.selected().unwrap_or(0);
        self.reload();
        let index = name
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .unwrap_or_else(|| previous.min(self.entries.len().saturating_sub(1)));
        if !self.entries.is_empty() {
            self.table.select(Some(index));
        }
    }

    /// Create a folder here and start renaming it.
    pub fn new_folder(&mut self) -> Result<(), TreeError> {
        let path = self.path().to_string();
        let name = self.tree.create_folder(&path)?;
        self.reload_selecting(Some(&name));
        self.renaming = Some(name);
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<usize, TreeError> {
        let entry = self.selected_entry().cloned().ok_or(TreeError::NotFound)?;
        let path = self.path().to_string();
        let removed = self.tree.delete(&path, &entry.name)?;
        self.reload_selecting(None);
        Ok(removed)
    }

    pub fn begin_rename(&mut self) -> bool {
        let Some(entry) = self.selected_entry() else {
            return false;
        };
        if matches!(entry.kind, EntryKind::App(_)) || join(self.path(), &entry.name) == APPLICATIONS {
            return false;
        }
        let name = entry.name.clone();
        self.renaming = Some(name);
        true
    }

    /// Apply the typed name. An invalid or taken name keeps the old one.
    pub fn commit_rename(&mut self) -> Result<(), TreeError> {
        let (Some(new_name), Some(entry)) = (self.renaming.take(), self.selected_entry().cloned()) else {
            return Err(TreeError::NotFound);
        };
        let path = self.path().to_string();
        let result = self.tree.rename(&path, &entry.name, &new_name);
        let keep = if result.is_ok() { new_name.trim() } else { entry.name.as_str() };
        self.reload_selecting(Some(keep));
        result
    }

    fn rename_key(&mut self, key: &KeyEvent) -> bool {
        if self.keys.matches(Action::DismissMenu, key) {
            self.renaming = None;
            return true;
        }
        if self.keys.matches(Action::Activate, key) {
            if let Err(err) = self.commit_rename() {
                tracing::debug!(?err, "finder rename refused");
            }
            return true;
        }
        let Some(buffer) = self.renaming.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                buffer.push(c);
                true
            }
            KeyCode::Backspace => {
                buffer.pop();
                true
            }
            // Swallow everything else so navigation keys do not move the
            // selection out from under the edit.
            _ => true,
        }
    }

    /// Navigating drops any forward history.
    pub fn navigate_to(&mut self, path: String) {
        if path == self.path() {
            return;
        }
        tracing::debug!(%path, "finder navigate");
        self.history.truncate(self.history_index + 1);
        self.history.push(path);
        self.history_index = self.history.len() - 1;
        self.reload();
    }

    pub fn go_back(&mut self) -> bool {
        if self.history_index == 0 {
            return false;
        }
        self.history_index -= 1;
        self.reload();
        true
    }

    pub fn go_forward(&mut self) -> bool {
        if self.history_index + 1 >= self.history.len() {
            return false;
        }
        self.history_index += 1;
        self.reload();
        true
    }

    pub fn open_selected(&mut self) -> bool {
        let Some(entry) = self.selected_entry().cloned() else {
            return false;
        };
        match entry.kind {
            EntryKind::Folder => {
                let path = join(self.path(), &entry.name);
                self.navigate_to(path);
                true
            }
            EntryKind::App(id) => {
                self.requests.push(AppRequest::Launch(id));
                true
            }
            EntryKind::File { .. } => false,
        }
    }

    fn bump_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(self.entries.len() - 1)
        };
        self.table.select(Some(next));
    }
}

impl Default for FinderApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FinderApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext<'_>) {
        let palette = ctx.palette();
        frame.fill(area, palette.window());
        if area.height == 0 {
            return;
        }
        let muted = Style::default().fg(palette.muted_fg);
        let can_back = self.history_index > 0;
        let can_forward = self.history_index + 1 < self.history.len();
        let toolbar = Line::from(vec![
            Span::styled("‹ ", if can_back { palette.window() } else { muted }),
            Span::styled("› ", if can_forward { palette.window() } else { muted }),
            Span::styled(
                self.path().to_string(),
                palette.window().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(toolbar, Rect { height: 1, ..area });

        let list_area = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(1),
            ..area
        };
        let selected = self.table.selected();
        let rows: Vec<Row> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let name = match &self.renaming {
                    Some(buffer) if selected == Some(index) => format!("{buffer}▏"),
                    _ => entry.name.clone(),
                };
                Row::new(vec![
                    Cell::from(format!("{} {}", entry.glyph(), name)),
                    Cell::from(entry.kind_label()),
                    Cell::from(entry.size_label()),
                ])
            })
            .collect();
        let highlight = if ctx.focused() {
            palette.menu_selected()
        } else {
            palette.window().add_modifier(Modifier::REVERSED)
        };
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(9),
            ],
        )
        .header(Row::new(vec!["Name", "Kind", "Size"]).style(muted))
        .style(palette.window())
        .row_highlight_style(highlight);
        frame.render_stateful_widget(table, list_area, &mut self.table);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext<'_>) -> bool {
        match event {
            Event::Key(key) if self.renaming.is_some() => self.rename_key(key),
            Event::Key(key) => {
                if self.keys.matches(Action::NewItem, key) {
                    self.new_folder().is_ok()
                } else if self.keys.matches(Action::DeleteItem, key) {
                    self.delete_selected().is_ok()
                } else if self.keys.matches(Action::RenameItem, key) {
                    self.begin_rename()
                } else if self.keys.matches(Action::SelectPrev, key) {
                    self.bump_selection(-1);
                    true
                } else if self.keys.matches(Action::SelectNext, key) {
                    self.bump_selection(1);
                    true
                } else if self.keys.matches(Action::Activate, key) {
                    self.open_selected()
                } else if self.keys.matches(Action::NavigateBack, key)
                    || self.keys.matches(Action::GoBack, key)
                {
                    self.go_back()
                } else if self.keys.matches(Action::GoForward, key) {
                    self.go_forward()
                } else {
                    false
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self.renaming.is_some()
                    && let Err(err) = self.commit_rename()
                {
                    tracing::debug!(?err, "finder rename refused");
                }
                if mouse.row == 0 {
                    return match mouse.column {
                        0..=1 => self.go_back(),
                        2..=3 => self.go_forward(),
                        _ => false,
                    };
                }
                if mouse.row < LIST_TOP {
                    return false;
                }
                let idx = usize::from(mouse.row - LIST_TOP) + self.table.offset();
                if idx >= self.entries.len() {
                    return false;
                }
                // A click on the selected row opens it.
                if self.table.selected() == Some(idx) {
                    self.open_selected();
                } else {
                    self.table.select(Some(idx));
                }
                true
            }
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SystemSettings;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    fn press(app: &mut FinderApp, code: KeyCode) -> bool {
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), &ctx)
    }

    #[test]
    fn sizes_format_with_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(10240), "10.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn folders_open_and_history_walks_back_and_forward() {
        let mut app = FinderApp::new();
        assert_eq!(app.path(), "/");
        // Documents is the third root entry.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(app.path(), "/Documents");
        assert_eq!(app.entries().len(), 2);

        assert!(press(&mut app, KeyCode::Backspace));
        assert_eq!(app.path(), "/");
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        let forward = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::ALT));
        assert!(app.handle_event(&forward, &ctx));
        assert_eq!(app.path(), "/Documents");
        assert!(!app.handle_event(&forward, &ctx));
    }

    #[test]
    fn navigating_drops_forward_history() {
        let mut app = FinderApp::new();
        app.navigate_to("/Documents".to_string());
        app.go_back();
        app.navigate_to("/Downloads".to_string());
        assert!(!app.go_forward());
        assert_eq!(app.entries()[0].name, "download.zip");
    }

    #[test]
    fn opening_an_application_requests_a_launch() {
        let mut app = FinderApp::new();
        assert!(press(&mut app, KeyCode::Enter));
        assert_eq!(app.path(), APPLICATIONS);
        assert!(press(&mut app, KeyCode::Enter));
        let first = AppCatalog.dock_apps().next().unwrap().id;
        assert_eq!(app.take_requests(), vec![AppRequest::Launch(first)]);
    }

    #[test]
    fn files_do_not_open() {
        let mut app = FinderApp::new();
        app.navigate_to("/Documents".to_string());
        assert!(!app.open_selected());
        assert!(app.take_requests().is_empty());
    }

    fn key(app: &mut FinderApp, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        app.handle_event(&Event::Key(KeyEvent::new(code, modifiers)), &ctx)
    }

    fn names(app: &FinderApp) -> Vec<&str> {
        app.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn deleting_a_folder_takes_its_contents() {
        let mut tree = FileTree::default();
        assert_eq!(tree.delete("/", "Documents"), Ok(3));
        assert!(tree.list("/Documents").is_empty());
        assert_eq!(tree.delete("/", "Documents"), Err(TreeError::NotFound));
        assert_eq!(tree.delete("/", "Applications"), Err(TreeError::Protected));
        assert_eq!(tree.delete(APPLICATIONS, "Notes"), Err(TreeError::Protected));
    }

    #[test]
    fn renaming_a_folder_moves_its_children() {
        let mut tree = FileTree::default();
        tree.create_folder("/Documents").unwrap();
        assert_eq!(tree.rename("/", "Documents", "Papers"), Ok(()));
        assert!(tree.list("/Documents").is_empty());
        let papers: Vec<String> = tree.list("/Papers").into_iter().map(|e| e.name).collect();
        assert_eq!(papers, vec!["Document1.txt", "Document2.txt", "untitled folder"]);
        assert_eq!(tree.rename("/", "Papers", "Downloads"), Err(TreeError::NameTaken));
        assert_eq!(tree.rename("/", "Papers", "a/b"), Err(TreeError::InvalidName));
        assert_eq!(tree.rename("/", "Papers", "  "), Err(TreeError::InvalidName));
        // A sibling sharing the prefix is untouched.
        tree.create_folder("/").unwrap();
        tree.rename("/", "untitled folder", "Papers2").unwrap();
        tree.rename("/", "Papers", "Archive").unwrap();
        assert!(tree.list("/").iter().any(|e| e.name == "Papers2"));
    }

    #[test]
    fn new_folders_get_unique_names() {
        let mut tree = FileTree::default();
        assert_eq!(tree.create_folder("/Downloads").unwrap(), "untitled folder");
        assert_eq!(tree.create_folder("/Downloads").unwrap(), "untitled folder 2");
        assert_eq!(tree.create_folder(APPLICATIONS), Err(TreeError::Protected));
    }

    #[test]
    fn keyboard_new_rename_and_delete() {
        let mut app = FinderApp::new();
        app.navigate_to("/Downloads".to_string());
        assert!(key(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert!(app.is_renaming());
        for _ in 0.."untitled folder".len() {
            key(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        }
        for c in "Music".chars() {
            key(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert!(key(&mut app, KeyCode::Enter, KeyModifiers::NONE));
        assert!(!app.is_renaming());
        assert_eq!(names(&app), vec!["download.zip", "Music"]);
        assert_eq!(app.selected_entry().unwrap().name, "Music");

        assert!(key(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert_eq!(names(&app), vec!["download.zip"]);
        assert_eq!(app.selected_entry().unwrap().name, "download.zip");

        assert!(key(&mut app, KeyCode::F(2), KeyModifiers::NONE));
        key(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(names(&app), vec!["download.zip"]);
    }

    #[test]
    fn applications_cannot_be_renamed_or_deleted() {
        let mut app = FinderApp::new();
        assert!(!key(&mut app, KeyCode::F(2), KeyModifiers::NONE));
        assert!(!key(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL));
        app.navigate_to(APPLICATIONS.to_string());
        assert!(!key(&mut app, KeyCode::F(2), KeyModifiers::NONE));
        assert!(!key(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL));
    }

    #[test]
    fn second_click_on_a_row_opens_it() {
        let settings = SystemSettings::default();
        let ctx = ComponentContext::new(true, &settings);
        let mut app = FinderApp::new();
        let click = |row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 4,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        // Row 3 is the second entry, Desktop.
        assert!(app.handle_event(&click(3), &ctx));
        assert_eq!(app.selected_entry().unwrap().name, "Desktop");
        assert!(app.handle_event(&click(3), &ctx));
        assert_eq!(app.path(), "/Desktop");
        assert!(app.entries().is_empty());
    }
}
