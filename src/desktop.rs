//! The desktop: owns the registry, window frames, hosted app views, dock and
//! menu bar, and routes terminal events between them.
//!
//! Presses are routed in a fixed order: Spotlight when open, open menu, menu
//! bar, dock, the window chrome under the pointer, then window content. Once a drag or resize has
//! started, the pointer is captured and every move and release goes to that
//! gesture until it ends.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;

use crate::actions::Action;
use crate::apps::{AppCatalog, AppId, AppDescriptor};
use crate::component_context::ComponentContext;
use crate::components::{AppRequest, Component};
use crate::config::DeskConfig;
use crate::constants::{DOUBLE_CLICK_MS, MIN_VISIBLE_MARGIN_CELLS};
use crate::dock::{Dock, DockState};
use crate::geometry::{Position, Size, clamp};
use crate::gesture::{DragBounds, PointerCapture, PointerDown};
use crate::keybindings::KeyBindings;
use crate::layout::floating::content_for_region;
use crate::layout::{DesktopRegions, HitMap, WindowHit, WindowZones};
use crate::menu_bar::{MenuAction, MenuBar, MenuCommand, MenuModel, WindowListing, standard_menus};
use crate::settings::{SettingsChange, SystemSettings};
use crate::spotlight::Spotlight;
use crate::storage::{SETTINGS_KEY, Store};
use crate::theme::Palette;
use crate::ui::UiFrame;
use crate::viewport::{CellMetrics, clip_rect};
use crate::window::decorator::{HeaderAction, TrafficLightDecorator, WindowChrome, WindowDecorator};
use crate::window::{FloatRect, RegistryEvent, WindowFrame, WindowId, WindowRecord, WindowRegistry, WindowSpec};

pub struct Desktop {
    registry: WindowRegistry<AppId>,
    catalog: AppCatalog,
    views: BTreeMap<WindowId, Box<dyn Component>>,
    frames: BTreeMap<WindowId, WindowFrame>,
    capture: PointerCapture,
    settings: SystemSettings,
    metrics: CellMetrics,
    regions: DesktopRegions,
    hits: HitMap,
    dock: Dock,
    menu_bar: MenuBar,
    spotlight: Spotlight,
    store: Store,
    keys: KeyBindings,
    decorator: TrafficLightDecorator,
    gesture: Option<WindowId>,
    last_title_click: Option<(WindowId, Instant)>,
    mouse_capture: bool,
    mouse_capture_change: Option<bool>,
    quit: bool,
}

impl Desktop {
    /// A desktop whose app state lives in memory only.
    pub fn new(screen: Rect, settings: SystemSettings, metrics: CellMetrics) -> Self {
        let store = Store::in_memory();
        Self {
            registry: WindowRegistry::new(),
            catalog: AppCatalog,
            views: BTreeMap::new(),
            frames: BTreeMap::new(),
            capture: PointerCapture::new(),
            settings,
            metrics,
            regions: DesktopRegions::compute(screen, &settings),
            hits: HitMap::default(),
            dock: Dock::new(),
            menu_bar: MenuBar::new(),
            spotlight: Spotlight::new(store.clone()),
            store,
            keys: KeyBindings::default(),
            decorator: TrafficLightDecorator,
            gesture: None,
            last_title_click: None,
            mouse_capture: true,
            mouse_capture_change: None,
            quit: false,
        }
    }

    /// Desktop seeded from the saved settings and the command line, with the
    /// startup apps open.
    pub fn from_config(screen: Rect, config: &DeskConfig, store: Store) -> Self {
        let saved = store.get::<SystemSettings>(SETTINGS_KEY).unwrap_or_default();
        let settings = config.settings_over(saved);
        let mut desktop = Self::new(screen, settings, config.metrics).with_store(store);
        desktop.mouse_capture = config.mouse_capture;
        for app in &config.open {
            desktop.launch(*app);
        }
        desktop
    }

    /// Read and save app state through `store`. Apps opened afterwards load
    /// from it.
    pub fn with_store(mut self, store: Store) -> Self {
        self.spotlight = Spotlight::new(store.clone());
        self.store = store;
        self
    }

    /// Replace the menu bar, e.g. with a fixed hostname for rendering tests.
    pub fn with_menu_bar(mut self, menu_bar: MenuBar) -> Self {
        self.menu_bar = menu_bar;
        self
    }

    pub fn registry(&self) -> &WindowRegistry<AppId> {
        &self.registry
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    pub fn regions(&self) -> DesktopRegions {
        self.regions
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn menu_bar(&self) -> &MenuBar {
        &self.menu_bar
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Live capture guards across every window frame.
    pub fn active_captures(&self) -> usize {
        self.capture.active()
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture
    }

    /// Drain a pending mouse capture toggle for the input driver.
    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        self.mouse_capture_change.take()
    }

    pub fn resize(&mut self, screen: Rect) {
        if screen == self.regions.screen {
            return;
        }
        tracing::debug!(width = screen.width, height = screen.height, "screen resized");
        self.regions = DesktopRegions::compute(screen, &self.settings);
    }

    /// Apply and save a settings change.
    pub fn apply_settings(&mut self, change: SettingsChange) {
        self.settings.apply(change);
        self.regions = DesktopRegions::compute(self.regions.screen, &self.settings);
        self.store.save(SETTINGS_KEY, &self.settings);
    }

    /// Bring `app` to the front, opening a window with the catalog defaults
    /// when it has none. Returns whether anything changed.
    pub fn launch(&mut self, app: AppId) -> bool {
        let id = app.window_id();
        if self.registry.contains(&id) {
            let focused = self.registry.focus(&id);
            self.sync_registry();
            return focused;
        }
        let Some(descriptor) = self.catalog.get(app) else {
            return false;
        };
        let view = (descriptor.factory)(&self.store);
        let spec = self.place(descriptor);
        self.registry.open(spec);
        if let Some(record) = self.registry.get(&id) {
            self.frames
                .insert(id.clone(), WindowFrame::new(record, &self.capture));
        }
        self.views.insert(id, view);
        tracing::info!(%app, "launched app");
        self.sync_registry();
        true
    }

    /// Descriptor defaults, shrunk and shifted to fit the work area.
    fn place(&self, descriptor: &AppDescriptor) -> WindowSpec<AppId> {
        let (origin, area) = self.metrics.rect_to_logical(self.regions.work_area);
        let spec = descriptor.window_spec();
        let size = Size::new(
            spec.size.width.min(area.width.max(1.0)),
            spec.size.height.min(area.height.max(1.0)),
        );
        let position = Position::new(
            clamp(spec.position.x, origin.x, origin.x + area.width - size.width),
            clamp(spec.position.y, origin.y, origin.y + area.height - size.height),
        );
        spec.at(position).sized(size)
    }

    /// Cell rect of a window as drawn: maximized windows fill the work area.
    pub fn outer_rect(&self, id: &WindowId) -> Option<FloatRect> {
        self.registry.get(id).map(|record| self.outer_for(record))
    }

    fn outer_for(&self, record: &WindowRecord<AppId>) -> FloatRect {
        if record.is_maximized {
            FloatRect::from_rect(self.regions.work_area)
        } else {
            self.metrics.logical_to_cells(record.position, record.size)
        }
    }

    fn rebuild_hits(&mut self) {
        self.hits.clear();
        for id in self.registry.stacking_order() {
            let Some(record) = self.registry.get(&id) else {
                continue;
            };
            if record.is_minimized {
                continue;
            }
            let outer = self.outer_for(record);
            if let Some(zones) = WindowZones::build(id, outer, self.regions.screen, !record.is_maximized) {
                self.hits.push(zones);
            }
        }
    }

    /// Limits that keep the title bar below the menu bar and a margin of
    /// the window on screen.
    fn drag_bounds(&self, record: &WindowRecord<AppId>) -> DragBounds {
        let margin = f64::from(MIN_VISIBLE_MARGIN_CELLS) * self.metrics.cell_width;
        let work = self.regions.work_area;
        let screen = self.regions.screen;
        DragBounds {
            left: Some(margin - record.size.width),
            top: Some(f64::from(work.y) * self.metrics.cell_height),
            right: Some(f64::from(screen.right().saturating_sub(MIN_VISIBLE_MARGIN_CELLS)) * self.metrics.cell_width),
            bottom: Some(f64::from(work.bottom().saturating_sub(2)) * self.metrics.cell_height),
        }
    }

    fn menu_model(&self) -> MenuModel {
        let focused = self.registry.focused();
        let descriptor = focused.and_then(|record| self.catalog.get(record.content));
        MenuModel {
            app_name: descriptor.map_or("Finder", |d| d.name).to_string(),
            menus: descriptor.map_or(standard_menus::FINDER, |d| d.menus),
            windows: self
                .registry
                .windows()
                .iter()
                .map(|record| WindowListing {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    focused: record.is_focused,
                    minimized: record.is_minimized,
                })
                .collect(),
            has_focus: focused.is_some(),
        }
    }

    /// Route one terminal event. Returns whether anything consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let consumed = match event {
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, *width, *height));
                true
            }
            Event::Mouse(mouse) if self.mouse_capture => self.handle_mouse(mouse),
            Event::Key(key) => self.handle_key(key),
            Event::Paste(_) => self.forward_to_focused(event),
            _ => false,
        };
        self.process_requests();
        consumed
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if self.gesture.is_some() && self.handle_gesture(mouse) {
            return true;
        }
        if self.spotlight.handle_mouse(mouse, self.regions.screen) {
            return true;
        }
        let model = self.menu_model();
        if self.menu_bar.handle_mouse(mouse, &model, self.regions.screen) {
            return true;
        }
        if self.dock.handle_mouse(mouse, self.regions.dock, &self.settings.dock) {
            return true;
        }
        self.rebuild_hits();
        let Some((id, hit)) = self
            .hits
            .hit_test(mouse.column, mouse.row)
            .map(|(id, hit)| (id.clone(), hit))
        else {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.last_title_click = None;
            }
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(button) => self.press_window(&id, hit, button, mouse),
            _ if hit == WindowHit::Content => self.forward_mouse(&id, mouse),
            _ => false,
        }
    }

    /// Feed a captured pointer to the window frame that owns the gesture.
    fn handle_gesture(&mut self, mouse: &MouseEvent) -> bool {
        let Some(id) = self.gesture.clone() else {
            return false;
        };
        let Some(frame) = self.frames.get_mut(&id) else {
            self.gesture = None;
            return false;
        };
        let pointer = self.metrics.pointer(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                frame.pointer_moved(pointer, &mut self.registry);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                frame.pointer_released(&mut self.registry);
                self.gesture = None;
            }
            MouseEventKind::Down(_) => {
                // The release went missing; drop the stale gesture and route the press normally.
                frame.cancel();
                self.gesture = None;
                return false;
            }
            _ => {}
        }
        self.sync_registry();
        true
    }

    fn press_window(&mut self, id: &WindowId, hit: WindowHit, button: MouseButton, mouse: &MouseEvent) -> bool {
        let Some(maximized) = self.registry.get(id).map(|record| record.is_maximized) else {
            return false;
        };
        if button != MouseButton::Left {
            self.registry.focus(id);
            self.sync_registry();
            if hit == WindowHit::Content {
                self.forward_mouse(id, mouse);
            }
            return true;
        }
        let pointer = self.metrics.pointer(mouse.column, mouse.row);
        match hit {
            WindowHit::Button(_) => {
                self.last_title_click = None;
                match HeaderAction::from_hit(hit, maximized) {
                    HeaderAction::Close => {
                        self.registry.close(id);
                    }
                    HeaderAction::Minimize => {
                        self.registry.minimize(id);
                    }
                    HeaderAction::Maximize => {
                        self.registry.toggle_maximize(id);
                    }
                    HeaderAction::Drag | HeaderAction::None => {}
                }
            }
            WindowHit::TitleBar => {
                let now = Instant::now();
                if let Some((previous, at)) = &self.last_title_click
                    && previous == id
                    && now.duration_since(*at) <= Duration::from_millis(DOUBLE_CLICK_MS)
                {
                    self.last_title_click = None;
                    self.registry.toggle_maximize(id);
                    self.sync_registry();
                    return true;
                }
                self.last_title_click = Some((id.clone(), now));
                self.registry.focus(id);
                if HeaderAction::from_hit(hit, maximized) == HeaderAction::Drag {
                    self.begin_drag(id, pointer);
                }
            }
            WindowHit::Resize(direction) => {
                self.last_title_click = None;
                self.registry.focus(id);
                if let Some(frame) = self.frames.get_mut(id)
                    && frame.begin_resize(PointerDown::primary(pointer), direction)
                {
                    self.gesture = Some(id.clone());
                }
            }
            WindowHit::Content => {
                self.last_title_click = None;
                self.registry.focus(id);
                self.sync_registry();
                self.forward_mouse(id, mouse);
            }
            WindowHit::Chrome => {
                self.last_title_click = None;
                self.registry.focus(id);
            }
        }
        self.sync_registry();
        true
    }

    fn begin_drag(&mut self, id: &WindowId, pointer: Position) {
        let Some(bounds) = self.registry.get(id).map(|record| self.drag_bounds(record)) else {
            return;
        };
        if let Some(frame) = self.frames.get_mut(id) {
            frame.set_drag_bounds(bounds);
            if frame.begin_drag(PointerDown::primary(pointer)) {
                self.gesture = Some(id.clone());
            }
        }
    }

    /// Hand a mouse event to a window's app, relative to its content area.
    fn forward_mouse(&mut self, id: &WindowId, mouse: &MouseEvent) -> bool {
        let Some(content) = self
            .hits
            .get(id)
            .and_then(|zones| clip_rect(zones.content, zones.visible))
        else {
            return false;
        };
        if mouse.column < content.x || mouse.row < content.y {
            return false;
        }
        let local = MouseEvent {
            column: mouse.column - content.x,
            row: mouse.row - content.y,
            ..*mouse
        };
        let focused = self.registry.focused_window_id() == Some(id);
        let ctx = ComponentContext::new(focused, &self.settings);
        self.views
            .get_mut(id)
            .is_some_and(|view| view.handle_event(&Event::Mouse(local), &ctx))
    }

    fn forward_to_focused(&mut self, event: &Event) -> bool {
        let Some(id) = self.registry.focused_window_id().cloned() else {
            return false;
        };
        let ctx = ComponentContext::new(true, &self.settings);
        self.views
            .get_mut(&id)
            .is_some_and(|view| view.handle_event(event, &ctx))
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if self.spotlight.is_open() {
            if self.keys.matches(Action::Spotlight, key) {
                self.spotlight.close();
                return true;
            }
            return self.spotlight.handle_key(key);
        }
        if self.menu_bar.is_open() {
            let model = self.menu_model();
            return self.menu_bar.handle_key(key, &model);
        }
        if let Some(action) = self.keys.global_action_for_key(key) {
            self.run_action(action);
            return true;
        }
        self.forward_to_focused(&Event::Key(*key))
    }

    fn run_action(&mut self, action: Action) {
        tracing::debug!(%action, "desktop action");
        let focused = self.registry.focused_window_id().cloned();
        match action {
            Action::Quit => self.quit = true,
            Action::CloseWindow => {
                if let Some(id) = focused {
                    self.registry.close(&id);
                }
            }
            Action::MinimizeWindow => {
                if let Some(id) = focused {
                    self.registry.minimize(&id);
                }
            }
            Action::ZoomWindow => {
                if let Some(id) = focused {
                    self.registry.toggle_maximize(&id);
                }
            }
            Action::CycleWindows => {
                self.registry.cycle_focus();
            }
            Action::OpenSettings => {
                self.launch(AppId::Settings);
            }
            Action::Spotlight => self.spotlight.toggle(),
            Action::ToggleMouseCapture => {
                self.mouse_capture = !self.mouse_capture;
                self.mouse_capture_change = Some(self.mouse_capture);
                tracing::info!(enabled = self.mouse_capture, "mouse capture toggled");
            }
            _ => {}
        }
        self.sync_registry();
    }

    fn run_menu_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Run(MenuAction::About) => {
                self.launch(AppId::Welcome);
            }
            MenuCommand::Run(action) => {
                if let Some(binding) = action.binding() {
                    self.run_action(binding);
                }
            }
            MenuCommand::FocusWindow(id) => {
                self.registry.focus(&id);
                self.sync_registry();
            }
        }
    }

    /// Drain everything the menu bar, dock and app views queued.
    fn process_requests(&mut self) {
        for command in self.menu_bar.take_commands() {
            self.run_menu_command(command);
        }
        for app in self.dock.take_launches() {
            self.launch(app);
        }
        for app in self.spotlight.take_launches() {
            self.launch(app);
        }
        let mut pending = Vec::new();
        for (id, view) in self.views.iter_mut() {
            if let Some(title) = view.title()
                && self.registry.get(id).is_some_and(|record| record.title != title)
            {
                self.registry.set_title(id, title);
            }
            pending.extend(view.take_requests().into_iter().map(|request| (id.clone(), request)));
        }
        for (id, request) in pending {
            match request {
                AppRequest::Launch(app) => {
                    self.launch(app);
                }
                AppRequest::Settings(change) => self.apply_settings(change),
                AppRequest::CloseWindow => {
                    self.registry.close(&id);
                }
            }
        }
        self.sync_registry();
    }

    /// Mirror registry changes into frames and views.
    fn sync_registry(&mut self) {
        for event in self.registry.take_events() {
            match event {
                RegistryEvent::Closed(id) => {
                    self.views.remove(&id);
                    self.frames.remove(&id);
                    if self.gesture.as_ref() == Some(&id) {
                        self.gesture = None;
                    }
                }
                RegistryEvent::Minimized(id) => {
                    if self.gesture.as_ref() == Some(&id) {
                        if let Some(frame) = self.frames.get_mut(&id) {
                            frame.cancel();
                        }
                        self.gesture = None;
                    }
                }
                RegistryEvent::Maximized(id)
                | RegistryEvent::Restored(id)
                | RegistryEvent::Moved(id)
                | RegistryEvent::Resized(id) => {
                    if let (Some(frame), Some(record)) = (self.frames.get_mut(&id), self.registry.get(&id))
                        && frame.sync(record)
                        && self.gesture.as_ref() == Some(&id)
                    {
                        self.gesture = None;
                    }
                }
                RegistryEvent::Opened { .. } | RegistryEvent::Focused(_) => {}
            }
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.resize(frame.area());
        let palette = Palette::for_mode(self.settings.theme);
        let screen = self.regions.screen;

        frame.fill(screen, palette.desktop());
        for y in self.regions.work_area.top()..self.regions.work_area.bottom() {
            for x in screen.left()..screen.right() {
                if let Some(glyph) = self.settings.wallpaper.glyph(x, y) {
                    frame.set_string(screen, x, y, glyph, palette.desktop());
                }
            }
        }

        self.rebuild_hits();
        for zones in self.hits.iter() {
            let Some(record) = self.registry.get(&zones.id) else {
                continue;
            };
            frame.fill(zones.visible, palette.window());
            let highlight = self
                .frames
                .get(&zones.id)
                .is_some_and(|f| f.resize_direction().is_some());
            self.decorator.render_window(
                frame,
                &WindowChrome {
                    outer: zones.outer,
                    bounds: screen,
                    title: &record.title,
                    icon: &record.app_icon,
                    focused: record.is_focused,
                    highlight,
                },
                palette,
            );
            let Some(area) = clip_rect(content_for_region(zones.outer), zones.visible) else {
                continue;
            };
            if let Some(view) = self.views.get_mut(&zones.id) {
                let ctx = ComponentContext::new(record.is_focused, &self.settings);
                view.resize(area, &ctx);
                view.render(frame, area, &ctx);
            }
        }

        let running: Vec<AppId> = self.registry.windows().iter().map(|r| r.content).collect();
        let state = DockState {
            running: &running,
            focused: self.registry.focused().map(|r| r.content),
        };
        self.dock
            .render(frame, self.regions.dock, &self.settings.dock, state, palette);

        let model = self.menu_model();
        self.menu_bar
            .render(frame, self.regions.menu_bar, &model, palette, self.settings.show_clock);
        self.menu_bar.render_dropdown(frame, screen, &model, palette);
        self.spotlight.render(frame, screen, palette);
    }
}
