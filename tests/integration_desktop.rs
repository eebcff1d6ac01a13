use std::time::Duration;

use clap::Parser;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use term_desk::apps::notes::saved_notes;
use term_desk::apps::{AppCatalog, AppId};
use term_desk::config::{Cli, DeskConfig};
use term_desk::desktop::Desktop;
use term_desk::dock::item_rects;
use term_desk::drivers::ScriptedDriver;
use term_desk::menu_bar::{MenuBar, MenuModel};
use term_desk::runner::run_desktop;
use term_desk::settings::{SettingsChange, SystemSettings, ThemeMode};
use term_desk::spotlight::ResultKind;
use term_desk::viewport::CellMetrics;

fn desktop() -> Desktop {
    Desktop::new(
        Rect::new(0, 0, 100, 30),
        SystemSettings::default(),
        CellMetrics::default(),
    )
}

fn press(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn dock_slot(desktop: &Desktop, app: AppId) -> (u16, u16) {
    let apps = desktop.dock().apps();
    let index = apps.iter().position(|a| *a == app).unwrap();
    let rects = item_rects(desktop.regions().dock, &desktop.settings().dock, apps.len());
    let rect = rects[index];
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}

#[test]
fn clicking_a_dock_icon_opens_and_focuses_the_app() {
    let mut desktop = desktop();
    let (column, row) = dock_slot(&desktop, AppId::Notes);
    assert!(desktop.handle_event(&press(column, row)));

    let registry = desktop.registry();
    assert!(registry.contains("notes"));
    assert_eq!(registry.focused_window_id().map(|id| id.as_str()), Some("notes"));

    desktop.launch(AppId::Finder);
    let (column, row) = dock_slot(&desktop, AppId::Notes);
    desktop.handle_event(&press(column, row));
    assert_eq!(desktop.registry().len(), 2);
    assert_eq!(
        desktop.registry().focused_window_id().map(|id| id.as_str()),
        Some("notes")
    );
}

#[test]
fn window_menu_lists_and_focuses_open_windows() {
    let mut desktop = desktop();
    desktop.launch(AppId::Finder);
    desktop.launch(AppId::Calculator);

    let calculator = AppCatalog.get(AppId::Calculator).unwrap();
    let model = MenuModel {
        app_name: calculator.name.to_string(),
        menus: calculator.menus,
        windows: Vec::new(),
        has_focus: true,
    };
    let window_menu = MenuBar::title_slots(&model)
        .into_iter()
        .find(|slot| {
            slot.menu >= 2 && calculator.menus[slot.menu - 2].title == "Window"
        })
        .unwrap();

    assert!(desktop.handle_event(&press(window_menu.x, 0)));
    assert!(desktop.menu_bar().is_open());
    // Minimize, Zoom, Close, separator, then one row per window in open order.
    assert!(desktop.handle_event(&press(window_menu.x + 1, 2 + 4)));

    assert!(!desktop.menu_bar().is_open());
    assert_eq!(
        desktop.registry().focused_window_id().map(|id| id.as_str()),
        Some("finder")
    );
}

#[test]
fn scripted_session_launches_from_the_dock_then_quits() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut desktop = desktop();
    let (column, row) = dock_slot(&desktop, AppId::Calculator);
    let mut driver = ScriptedDriver::new([
        press(column, row),
        Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
    ]);

    run_desktop(&mut terminal, &mut driver, &mut desktop, Duration::ZERO).unwrap();

    assert!(desktop.should_quit());
    assert!(desktop.registry().contains("calculator"));
    assert!(desktop.registry().check_invariants().is_ok());
    assert_eq!(desktop.active_captures(), 0);
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

#[test]
fn notes_and_settings_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["term-desk", "--data-dir", data_dir]).unwrap();
    let config = DeskConfig::try_from(&cli).unwrap();
    let screen = Rect::new(0, 0, 100, 30);

    let mut first = Desktop::from_config(screen, &config, config.open_store().unwrap());
    first.apply_settings(SettingsChange::Theme(ThemeMode::Dark));
    first.launch(AppId::Notes);
    assert!(first.handle_event(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)));
    for c in "groceries".chars() {
        first.handle_event(&key(KeyCode::Char(c), KeyModifiers::NONE));
    }
    drop(first);

    let mut second = Desktop::from_config(screen, &config, config.open_store().unwrap());
    assert_eq!(second.settings().theme, ThemeMode::Dark);
    let notes = saved_notes(second.store()).unwrap();
    assert_eq!(notes[0].body, "groceries");

    second.handle_event(&key(KeyCode::Char(' '), KeyModifiers::CONTROL));
    for c in "grocer".chars() {
        second.handle_event(&key(KeyCode::Char(c), KeyModifiers::NONE));
    }
    let hit = second.spotlight().selected().unwrap();
    assert_eq!(hit.kind, ResultKind::Note);
    assert_eq!(hit.app, AppId::Notes);
}
