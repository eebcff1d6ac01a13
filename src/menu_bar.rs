//! The menu bar across the top row and its dropdowns.
//!
//! Titles, from the left: the system menu glyph, the focused app's name, then
//! that app's static menus. The clock and hostname sit on the right. Layout
//! is a pure function of the `MenuModel`, so hit testing never depends on a
//! previous frame.

use chrono::Local;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{Block, Borders, Clear};

use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::theme::Palette;
use crate::ui::UiFrame;
use crate::window::WindowId;

pub const SYSTEM_GLYPH: &str = "≡";

/// What a static menu item does when chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    About,
    OpenSettings,
    Quit,
    Hide,
    Minimize,
    Zoom,
    CloseWindow,
}

impl MenuAction {
    /// The key binding whose combo is shown next to the item.
    pub fn binding(self) -> Option<Action> {
        match self {
            MenuAction::About => None,
            MenuAction::OpenSettings => Some(Action::OpenSettings),
            MenuAction::Quit => Some(Action::Quit),
            MenuAction::Hide | MenuAction::Minimize => Some(Action::MinimizeWindow),
            MenuAction::Zoom => Some(Action::ZoomWindow),
            MenuAction::CloseWindow => Some(Action::CloseWindow),
        }
    }

    /// Window commands are disabled while no window has focus.
    pub fn needs_window(self) -> bool {
        matches!(
            self,
            MenuAction::Hide | MenuAction::Minimize | MenuAction::Zoom | MenuAction::CloseWindow
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        label: &'static str,
        action: Option<MenuAction>,
    },
    Separator,
}

const fn inert(label: &'static str) -> MenuEntry {
    MenuEntry::Item {
        label,
        action: None,
    }
}

const fn run(label: &'static str, action: MenuAction) -> MenuEntry {
    MenuEntry::Item {
        label,
        action: Some(action),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub entries: &'static [MenuEntry],
    /// Append one entry per open window.
    pub lists_windows: bool,
}

impl Menu {
    pub const fn new(title: &'static str, entries: &'static [MenuEntry]) -> Self {
        Self {
            title,
            entries,
            lists_windows: false,
        }
    }

    pub const fn window_list(title: &'static str, entries: &'static [MenuEntry]) -> Self {
        Self {
            title,
            entries,
            lists_windows: true,
        }
    }
}

pub mod standard_menus {
    use super::{Menu, MenuAction, MenuEntry, inert, run};

    const EDIT_ENTRIES: &[MenuEntry] = &[
        inert("Undo"),
        inert("Redo"),
        MenuEntry::Separator,
        inert("Cut"),
        inert("Copy"),
        inert("Paste"),
        MenuEntry::Separator,
        inert("Select All"),
        inert("Find..."),
    ];
    const WINDOW_ENTRIES: &[MenuEntry] = &[
        run("Minimize", MenuAction::Minimize),
        run("Zoom", MenuAction::Zoom),
        run("Close", MenuAction::CloseWindow),
    ];
    const HELP_ENTRIES: &[MenuEntry] = &[run("About term-desk", MenuAction::About)];
    const FULL_SCREEN: &[MenuEntry] = &[run("Enter Full Screen", MenuAction::Zoom)];

    const EDIT: Menu = Menu::new("Edit", EDIT_ENTRIES);
    const WINDOW: Menu = Menu::window_list("Window", WINDOW_ENTRIES);
    const HELP: Menu = Menu::new("Help", HELP_ENTRIES);

    const FINDER_FILE: &[MenuEntry] = &[
        inert("New Finder Window"),
        inert("New Folder"),
        MenuEntry::Separator,
        run("Close Window", MenuAction::CloseWindow),
        inert("Get Info"),
    ];
    const FINDER_VIEW: &[MenuEntry] = &[
        inert("as Icons"),
        inert("as List"),
        inert("as Columns"),
        MenuEntry::Separator,
        inert("Show Path Bar"),
        inert("Show Status Bar"),
    ];
    const FINDER_GO: &[MenuEntry] = &[
        inert("Back"),
        inert("Forward"),
        inert("Enclosing Folder"),
        MenuEntry::Separator,
        inert("Documents"),
        inert("Desktop"),
        inert("Downloads"),
        inert("Applications"),
    ];

    pub const FINDER: &[Menu] = &[
        Menu::new("File", FINDER_FILE),
        EDIT,
        Menu::new("View", FINDER_VIEW),
        Menu::new("Go", FINDER_GO),
        WINDOW,
        HELP,
    ];

    const BROWSER_FILE: &[MenuEntry] = &[
        inert("New Tab"),
        inert("Open Location..."),
        MenuEntry::Separator,
        run("Close Window", MenuAction::CloseWindow),
    ];
    const BROWSER_VIEW: &[MenuEntry] = &[
        inert("Reload Page"),
        MenuEntry::Separator,
        run("Enter Full Screen", MenuAction::Zoom),
    ];
    const BROWSER_HISTORY: &[MenuEntry] =
        &[inert("Back"), inert("Forward"), inert("Show All History")];

    pub const BROWSER: &[Menu] = &[
        Menu::new("File", BROWSER_FILE),
        EDIT,
        Menu::new("View", BROWSER_VIEW),
        Menu::new("History", BROWSER_HISTORY),
        WINDOW,
        HELP,
    ];

    const NOTES_FILE: &[MenuEntry] = &[
        inert("New Note"),
        MenuEntry::Separator,
        run("Close", MenuAction::CloseWindow),
        inert("Export..."),
    ];
    const NOTES_EDIT: &[MenuEntry] = &[
        inert("Undo"),
        inert("Redo"),
        MenuEntry::Separator,
        inert("Cut"),
        inert("Copy"),
        inert("Paste"),
        MenuEntry::Separator,
        inert("Add Link..."),
    ];
    const NOTES_VIEW: &[MenuEntry] = &[
        inert("Show Folders"),
        MenuEntry::Separator,
        run("Enter Full Screen", MenuAction::Zoom),
    ];

    pub const NOTES: &[Menu] = &[
        Menu::new("File", NOTES_FILE),
        Menu::new("Edit", NOTES_EDIT),
        Menu::new("View", NOTES_VIEW),
        WINDOW,
        HELP,
    ];

    const GENERIC_FILE: &[MenuEntry] = &[
        inert("New"),
        inert("Open..."),
        MenuEntry::Separator,
        run("Close", MenuAction::CloseWindow),
        inert("Save"),
        inert("Print..."),
    ];

    pub const GENERIC: &[Menu] = &[
        Menu::new("File", GENERIC_FILE),
        EDIT,
        Menu::new("View", FULL_SCREEN),
        WINDOW,
        HELP,
    ];
}

/// What the desktop should do after a menu pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Run(MenuAction),
    FocusWindow(WindowId),
}

/// One open window as listed in the Window menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowListing {
    pub id: WindowId,
    pub title: String,
    pub focused: bool,
    pub minimized: bool,
}

/// Snapshot of desktop state the menu bar renders from.
#[derive(Debug, Clone)]
pub struct MenuModel {
    pub app_name: String,
    pub menus: &'static [Menu],
    pub windows: Vec<WindowListing>,
    pub has_focus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownRow {
    Item {
        label: String,
        shortcut: Option<String>,
        command: Option<MenuCommand>,
    },
    Separator,
}

impl DropdownRow {
    fn is_enabled(&self) -> bool {
        matches!(self, DropdownRow::Item { command: Some(_), .. })
    }
}

/// Title slot on the bar: column span and menu index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleSlot {
    pub x: u16,
    pub width: u16,
    pub menu: usize,
}

const SYSTEM_MENU: usize = 0;
const APP_MENU: usize = 1;
const FIRST_STATIC_MENU: usize = 2;

#[derive(Debug)]
pub struct MenuBar {
    open: Option<usize>,
    highlighted: Option<usize>,
    commands: Vec<MenuCommand>,
    hostname: String,
    keys: KeyBindings,
}

impl MenuBar {
    pub fn new() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_default();
        Self::with_hostname(hostname)
    }

    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            open: None,
            highlighted: None,
            commands: Vec::new(),
            hostname: hostname.into(),
            keys: KeyBindings::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.open
    }

    pub fn open(&mut self, menu: usize) {
        self.open = Some(menu);
        self.highlighted = None;
    }

    pub fn close(&mut self) {
        self.open = None;
        self.highlighted = None;
    }

    pub fn take_commands(&mut self) -> Vec<MenuCommand> {
        std::mem::take(&mut self.commands)
    }

    fn menu_count(model: &MenuModel) -> usize {
        FIRST_STATIC_MENU + model.menus.len()
    }

    fn title_label(model: &MenuModel, menu: usize) -> Option<&str> {
        match menu {
            SYSTEM_MENU => Some(SYSTEM_GLYPH),
            APP_MENU => Some(model.app_name.as_str()),
            _ => model.menus.get(menu - FIRST_STATIC_MENU).map(|m| m.title),
        }
    }

    pub fn title_slots(model: &MenuModel) -> Vec<TitleSlot> {
        let mut x = 0u16;
        (0..Self::menu_count(model))
            .filter_map(|menu| {
                let label = Self::title_label(model, menu)?;
                let width = label.chars().count() as u16 + 2;
                let slot = TitleSlot { x, width, menu };
                x = x.saturating_add(width);
                Some(slot)
            })
            .collect()
    }

    fn shortcut(&self, action: MenuAction) -> Option<String> {
        action
            .binding()
            .and_then(|binding| self.keys.first_combo(binding))
            .map(|combo| combo.display())
    }

    fn row_for(&self, model: &MenuModel, entry: &MenuEntry) -> DropdownRow {
        match *entry {
            MenuEntry::Separator => DropdownRow::Separator,
            MenuEntry::Item { label, action } => {
                let enabled = action.is_some_and(|a| model.has_focus || !a.needs_window());
                DropdownRow::Item {
                    label: label.to_string(),
                    shortcut: action.and_then(|a| self.shortcut(a)),
                    command: action.filter(|_| enabled).map(MenuCommand::Run),
                }
            }
        }
    }

    /// Rows of dropdown `menu`, built from the model.
    pub fn rows(&self, model: &MenuModel, menu: usize) -> Vec<DropdownRow> {
        let name = &model.app_name;
        match menu {
            SYSTEM_MENU => [
                run("About term-desk", MenuAction::About),
                MenuEntry::Separator,
                run("System Settings...", MenuAction::OpenSettings),
                MenuEntry::Separator,
                run("Quit term-desk", MenuAction::Quit),
            ]
            .iter()
            .map(|entry| self.row_for(model, entry))
            .collect(),
            APP_MENU => {
                let mut rows = Vec::new();
                let item = |label: String, action: MenuAction| {
                    let mut row = self.row_for(model, &run("", action));
                    if let DropdownRow::Item { label: l, .. } = &mut row {
                        *l = label;
                    }
                    row
                };
                rows.push(item(format!("About {name}"), MenuAction::About));
                rows.push(DropdownRow::Separator);
                rows.push(item("Settings...".to_string(), MenuAction::OpenSettings));
                rows.push(DropdownRow::Separator);
                rows.push(item(format!("Hide {name}"), MenuAction::Hide));
                rows.push(DropdownRow::Separator);
                rows.push(item(format!("Quit {name}"), MenuAction::Quit));
                rows
            }
            _ => {
                let Some(static_menu) = model.menus.get(menu - FIRST_STATIC_MENU) else {
                    return Vec::new();
                };
                let mut rows: Vec<DropdownRow> = static_menu
                    .entries
                    .iter()
                    .map(|entry| self.row_for(model, entry))
                    .collect();
                if static_menu.lists_windows && !model.windows.is_empty() {
                    rows.push(DropdownRow::Separator);
                    rows.extend(model.windows.iter().map(|window| {
                        let mark = if window.focused {
                            "✓"
                        } else if window.minimized {
                            "◇"
                        } else {
                            " "
                        };
                        DropdownRow::Item {
                            label: format!("{mark} {}", window.title),
                            shortcut: None,
                            command: Some(MenuCommand::FocusWindow(window.id.clone())),
                        }
                    }));
                }
                rows
            }
        }
    }

    /// Outer rect of the open dropdown, border included.
    pub fn dropdown_rect(&self, model: &MenuModel, screen: Rect) -> Option<Rect> {
        let menu = self.open?;
        let slot = Self::title_slots(model).into_iter().find(|s| s.menu == menu)?;
        let rows = self.rows(model, menu);
        let inner_width = rows
            .iter()
            .map(|row| match row {
                DropdownRow::Item {
                    label, shortcut, ..
                } => {
                    label.chars().count()
                        + shortcut.as_ref().map_or(0, |s| s.chars().count() + 3)
                }
                DropdownRow::Separator => 0,
            })
            .max()
            .unwrap_or(0) as u16
            + 2;
        let rect = Rect::new(
            slot.x,
            screen.y.saturating_add(1),
            inner_width + 2,
            rows.len() as u16 + 2,
        );
        Some(rect.intersection(screen))
    }

    fn row_at(&self, model: &MenuModel, screen: Rect, column: u16, row: u16) -> Option<usize> {
        let rect = self.dropdown_rect(model, screen)?;
        if !rect_contains(rect, column, row)
            || row == rect.y
            || row + 1 >= rect.bottom()
            || column == rect.x
            || column + 1 >= rect.right()
        {
            return None;
        }
        Some(usize::from(row - rect.y - 1))
    }

    fn choose(&mut self, model: &MenuModel, index: usize) -> bool {
        let Some(menu) = self.open else {
            return false;
        };
        let rows = self.rows(model, menu);
        match rows.get(index) {
            Some(DropdownRow::Item {
                command: Some(command),
                label,
                ..
            }) => {
                tracing::debug!(%label, ?command, "menu item chosen");
                self.commands.push(command.clone());
                self.close();
                true
            }
            // Inert items and separators keep the menu open.
            _ => true,
        }
    }

    /// Mouse routing. Returns whether the menu bar consumed the event.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, model: &MenuModel, screen: Rect) -> bool {
        let on_bar = mouse.row == screen.y;
        let title = on_bar
            .then(|| {
                Self::title_slots(model)
                    .into_iter()
                    .find(|slot| mouse.column >= slot.x && mouse.column < slot.x + slot.width)
            })
            .flatten();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(slot) = title {
                    if self.open == Some(slot.menu) {
                        self.close();
                    } else {
                        self.open(slot.menu);
                    }
                    return true;
                }
                if let Some(index) = self.row_at(model, screen, mouse.column, mouse.row) {
                    return self.choose(model, index);
                }
                if self.is_open() {
                    // A click anywhere else dismisses the menu and is swallowed.
                    self.close();
                    return true;
                }
                on_bar
            }
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) if self.is_open() => {
                if let Some(slot) = title
                    && self.open != Some(slot.menu)
                {
                    self.open(slot.menu);
                }
                self.highlighted = self.row_at(model, screen, mouse.column, mouse.row);
                true
            }
            MouseEventKind::Up(MouseButton::Left) if self.is_open() => {
                if let Some(index) = self.row_at(model, screen, mouse.column, mouse.row) {
                    return self.choose(model, index);
                }
                true
            }
            _ => on_bar || self.is_open(),
        }
    }

    /// Keyboard navigation while a dropdown is open.
    pub fn handle_key(&mut self, key: &KeyEvent, model: &MenuModel) -> bool {
        let Some(menu) = self.open else {
            return false;
        };
        let rows = self.rows(model, menu);
        let count = Self::menu_count(model);
        if self.keys.matches(Action::DismissMenu, key) {
            self.close();
        } else if self.keys.matches(Action::SelectLeft, key) {
            self.open((menu + count - 1) % count);
        } else if self.keys.matches(Action::SelectRight, key) {
            self.open((menu + 1) % count);
        } else if self.keys.matches(Action::SelectNext, key) {
            self.highlighted = step_enabled(&rows, self.highlighted, true);
        } else if self.keys.matches(Action::SelectPrev, key) {
            self.highlighted = step_enabled(&rows, self.highlighted, false);
        } else if self.keys.matches(Action::Activate, key) {
            if let Some(index) = self.highlighted {
                self.choose(model, index);
            }
        }
        // Everything else is swallowed while a menu is open.
        true
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, area: Rect, model: &MenuModel, palette: &Palette, show_clock: bool) {
        if area.height == 0 {
            return;
        }
        let bar = Rect { height: 1, ..area };
        frame.fill(bar, palette.menu());
        for slot in Self::title_slots(model) {
            let Some(label) = Self::title_label(model, slot.menu) else {
                continue;
            };
            let mut style = if self.open == Some(slot.menu) {
                palette.menu_selected()
            } else {
                palette.menu()
            };
            if slot.menu == APP_MENU {
                style = style.add_modifier(Modifier::BOLD);
            }
            let x = bar.x.saturating_add(slot.x);
            frame.fill(Rect::new(x, bar.y, slot.width, 1).intersection(bar), style);
            frame.set_string(bar, x.saturating_add(1), bar.y, label, style);
        }

        let mut status = String::new();
        if !self.hostname.is_empty() {
            status.push_str(&self.hostname);
        }
        if show_clock {
            if !status.is_empty() {
                status.push_str("  ");
            }
            status.push_str(&Local::now().format("%H:%M").to_string());
        }
        if !status.is_empty() {
            let len = status.chars().count() as u16 + 1;
            let x = bar.right().saturating_sub(len);
            let titles_end = Self::title_slots(model)
                .last()
                .map_or(0, |slot| bar.x + slot.x + slot.width);
            if x > titles_end {
                frame.set_string(bar, x, bar.y, &status, palette.menu());
            }
        }
    }

    /// Draw the open dropdown. Called last so it sits above windows and dock.
    pub fn render_dropdown(&self, frame: &mut UiFrame<'_>, screen: Rect, model: &MenuModel, palette: &Palette) {
        let (Some(menu), Some(rect)) = (self.open, self.dropdown_rect(model, screen)) else {
            return;
        };
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.menu().fg(palette.border_focused))
            .style(palette.menu());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        for (index, row) in self.rows(model, menu).iter().enumerate() {
            let y = inner.y + index as u16;
            if y >= inner.bottom() {
                break;
            }
            let line = Rect::new(inner.x, y, inner.width, 1);
            match row {
                DropdownRow::Separator => {
                    let rule = "─".repeat(usize::from(inner.width));
                    frame.set_string(line, inner.x, y, &rule, palette.menu().fg(palette.menu_disabled_fg));
                }
                DropdownRow::Item {
                    label, shortcut, ..
                } => {
                    let style = if !row.is_enabled() && shortcut.is_some() {
                        palette.menu().fg(palette.menu_disabled_fg)
                    } else if self.highlighted == Some(index) && row.is_enabled() {
                        palette.menu_selected()
                    } else {
                        palette.menu()
                    };
                    frame.fill(line, style);
                    frame.set_string(line, inner.x + 1, y, label, style);
                    if let Some(shortcut) = shortcut {
                        let len = shortcut.chars().count() as u16 + 1;
                        let x = line.right().saturating_sub(len);
                        frame.set_string(line, x, y, shortcut, style.remove_modifier(Modifier::BOLD));
                    }
                }
            }
        }
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

fn step_enabled(rows: &[DropdownRow], from: Option<usize>, forward: bool) -> Option<usize> {
    let enabled: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_enabled())
        .map(|(index, _)| index)
        .collect();
    if enabled.is_empty() {
        return None;
    }
    let next = match from.and_then(|current| enabled.iter().position(|i| *i == current)) {
        None if forward => 0,
        None => enabled.len() - 1,
        Some(pos) if forward => (pos + 1) % enabled.len(),
        Some(pos) => (pos + enabled.len() - 1) % enabled.len(),
    };
    enabled.get(next).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ThemeMode;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::buffer::Buffer;

    fn model(has_focus: bool) -> MenuModel {
        MenuModel {
            app_name: "Notes".to_string(),
            menus: standard_menus::NOTES,
            windows: vec![
                WindowListing {
                    id: WindowId::new("notes"),
                    title: "Notes".to_string(),
                    focused: has_focus,
                    minimized: false,
                },
                WindowListing {
                    id: WindowId::new("finder"),
                    title: "Finder".to_string(),
                    focused: false,
                    minimized: true,
                },
            ],
            has_focus,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    fn window_menu_index(model: &MenuModel) -> usize {
        FIRST_STATIC_MENU + model.menus.iter().position(|m| m.lists_windows).unwrap()
    }

    #[test]
    fn titles_are_laid_out_left_to_right() {
        let slots = MenuBar::title_slots(&model(true));
        assert_eq!(slots[0], TitleSlot { x: 0, width: 3, menu: 0 });
        assert_eq!(slots[1], TitleSlot { x: 3, width: 7, menu: 1 });
        assert_eq!(slots[2].x, 10);
        assert_eq!(slots.len(), 2 + standard_menus::NOTES.len());
    }

    #[test]
    fn window_menu_lists_open_windows() {
        let bar = MenuBar::with_hostname("box");
        let model = model(true);
        let rows = bar.rows(&model, window_menu_index(&model));
        assert!(rows.contains(&DropdownRow::Item {
            label: "◇ Finder".to_string(),
            shortcut: None,
            command: Some(MenuCommand::FocusWindow(WindowId::new("finder"))),
        }));
        assert!(matches!(
            &rows[0],
            DropdownRow::Item { command: Some(MenuCommand::Run(MenuAction::Minimize)), shortcut: Some(s), .. } if s == "Alt+M"
        ));
    }

    #[test]
    fn window_commands_are_disabled_without_focus() {
        let bar = MenuBar::with_hostname("box");
        let model = model(false);
        let rows = bar.rows(&model, window_menu_index(&model));
        assert!(matches!(&rows[0], DropdownRow::Item { command: None, .. }));
        let system = bar.rows(&model, SYSTEM_MENU);
        assert!(system.last().is_some_and(DropdownRow::is_enabled));
    }

    #[test]
    fn clicking_a_title_opens_and_an_item_runs() {
        let mut bar = MenuBar::with_hostname("box");
        let model = model(true);
        assert!(bar.handle_mouse(&click(1, 0), &model, screen()));
        assert_eq!(bar.open_menu(), Some(SYSTEM_MENU));
        // Row 0 of the dropdown is its top border; the last item is Quit.
        let rect = bar.dropdown_rect(&model, screen()).unwrap();
        assert!(bar.handle_mouse(&click(rect.x + 2, rect.bottom() - 2), &model, screen()));
        assert!(!bar.is_open());
        assert_eq!(bar.take_commands(), vec![MenuCommand::Run(MenuAction::Quit)]);
    }

    #[test]
    fn clicking_outside_dismisses_and_swallows() {
        let mut bar = MenuBar::with_hostname("box");
        let model = model(true);
        bar.open(APP_MENU);
        assert!(bar.handle_mouse(&click(60, 20), &model, screen()));
        assert!(!bar.is_open());
        assert!(!bar.handle_mouse(&click(60, 20), &model, screen()));
        assert!(bar.take_commands().is_empty());
    }

    #[test]
    fn keyboard_walks_enabled_items_only() {
        let mut bar = MenuBar::with_hostname("box");
        let model = model(true);
        bar.open(SYSTEM_MENU);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(bar.handle_key(&down, &model));
        assert!(bar.handle_key(&down, &model));
        assert!(bar.handle_key(&enter, &model));
        assert_eq!(
            bar.take_commands(),
            vec![MenuCommand::Run(MenuAction::OpenSettings)]
        );
        assert!(!bar.handle_key(&down, &model));
    }

    #[test]
    fn renders_titles_hostname_and_dropdown() {
        let area = screen();
        let mut buffer = Buffer::empty(area);
        let mut bar = MenuBar::with_hostname("box");
        let model = model(true);
        bar.open(APP_MENU);
        let palette = Palette::for_mode(ThemeMode::Light);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            bar.render(&mut frame, area, &model, palette, false);
            bar.render_dropdown(&mut frame, area, &model, palette);
        }
        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buffer.cell((x, y)).unwrap().symbol().to_string())
                .collect()
        };
        assert!(row(0).starts_with(" ≡  Notes  File"));
        assert!(row(0).trim_end().ends_with("box"));
        assert!(row(2).contains("About Notes"));
        assert!(buffer.cell((4, 0)).unwrap().modifier.contains(Modifier::BOLD));
    }
}
