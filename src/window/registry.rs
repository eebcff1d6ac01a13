//! The window registry: sole owner and mutator of window state.
//!
//! Every command targets a window by id. Unknown ids are silently ignored so
//! chrome can race harmlessly against a window that was just closed; each
//! command returns whether its target existed.

use std::fmt;

use thiserror::Error;

use crate::geometry::{Position, Size};

/// Stable identifier of an open window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WindowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Everything the caller supplies when opening a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec<C> {
    pub id: WindowId,
    pub title: String,
    pub content: C,
    pub position: Position,
    pub size: Size,
    pub app_icon: String,
    pub is_open: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
}

impl<C> WindowSpec<C> {
    pub fn new(id: impl Into<WindowId>, title: impl Into<String>, content: C) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
            position: Position::ZERO,
            size: crate::constants::DEFAULT_MIN_WINDOW_SIZE,
            app_icon: String::new(),
            is_open: true,
            is_minimized: false,
            is_maximized: false,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn sized(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.app_icon = icon.into();
        self
    }

    pub fn maximized(mut self, maximized: bool) -> Self {
        self.is_maximized = maximized;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord<C> {
    pub id: WindowId,
    pub title: String,
    pub content: C,
    pub is_open: bool,
    pub is_focused: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub position: Position,
    pub size: Size,
    pub z_index: u64,
    pub previous_position: Option<Position>,
    pub previous_size: Option<Size>,
    pub app_icon: String,
}

impl<C> WindowRecord<C> {
    pub fn is_visible(&self) -> bool {
        !self.is_minimized
    }
}

/// State changes, queued in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Opened { id: WindowId, replaced: bool },
    Closed(WindowId),
    Focused(WindowId),
    Minimized(WindowId),
    Maximized(WindowId),
    Restored(WindowId),
    Moved(WindowId),
    Resized(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("window registry invariant violated: {0}")]
pub struct InvariantViolation(pub String);

#[derive(Debug)]
pub struct WindowRegistry<C> {
    windows: Vec<WindowRecord<C>>,
    highest_z_index: u64,
    focused_window_id: Option<WindowId>,
    events: Vec<RegistryEvent>,
}

impl<C> Default for WindowRegistry<C> {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            highest_z_index: 0,
            focused_window_id: None,
            events: Vec::new(),
        }
    }
}

impl<C> WindowRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn windows(&self) -> &[WindowRecord<C>] {
        &self.windows
    }

    pub fn get(&self, id: impl AsRef<str>) -> Option<&WindowRecord<C>> {
        let id = id.as_ref();
        self.windows.iter().find(|w| w.id.as_str() == id)
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn focused_window_id(&self) -> Option<&WindowId> {
        self.focused_window_id.as_ref()
    }

    pub fn focused(&self) -> Option<&WindowRecord<C>> {
        self.focused_window_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn highest_z_index(&self) -> u64 {
        self.highest_z_index
    }

    /// Window ids from bottom to top.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut order: Vec<&WindowRecord<C>> = self.windows.iter().collect();
        order.sort_by_key(|w| w.z_index);
        order.into_iter().map(|w| w.id.clone()).collect()
    }

    /// The highest non-minimized window.
    pub fn topmost_visible(&self) -> Option<&WindowRecord<C>> {
        self.windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
    }

    /// Drain the queued state changes.
    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn open(&mut self, spec: WindowSpec<C>) {
        let replaced = self.remove_record(spec.id.as_str()).is_some();
        let z_index = self.next_z_index();
        let (previous_position, previous_size) = if spec.is_maximized {
            (Some(spec.position), Some(spec.size))
        } else {
            (None, None)
        };
        for window in &mut self.windows {
            window.is_focused = false;
        }
        tracing::debug!(window_id = %spec.id, z_index, replaced, "opened window");
        self.focused_window_id = Some(spec.id.clone());
        self.events.push(RegistryEvent::Opened {
            id: spec.id.clone(),
            replaced,
        });
        self.windows.push(WindowRecord {
            id: spec.id,
            title: spec.title,
            content: spec.content,
            is_open: true,
            is_focused: true,
            is_minimized: false,
            is_maximized: spec.is_maximized,
            position: spec.position,
            size: spec.size,
            z_index,
            previous_position,
            previous_size,
            app_icon: spec.app_icon,
        });
        self.verify();
    }

    pub fn close(&mut self, id: impl AsRef<str>) -> bool {
        let Some(record) = self.remove_record(id.as_ref()) else {
            return false;
        };
        tracing::debug!(window_id = %record.id, "closed window");
        self.events.push(RegistryEvent::Closed(record.id.clone()));
        if record.is_focused {
            self.focus_fallback();
        }
        self.verify();
        true
    }

    /// Focus and raise a window. Focusing a minimized window brings it back.
    pub fn focus(&mut self, id: impl AsRef<str>) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        if self.windows[index].is_focused {
            return true;
        }
        self.focus_index(index);
        self.verify();
        true
    }

    pub fn minimize(&mut self, id: impl AsRef<str>) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        let window = &mut self.windows[index];
        let was_focused = window.is_focused;
        window.is_minimized = true;
        window.is_focused = false;
        tracing::debug!(window_id = %window.id, "minimized window");
        self.events.push(RegistryEvent::Minimized(window.id.clone()));
        if was_focused {
            self.focus_fallback();
        }
        self.verify();
        true
    }

    /// Geometry is left untouched; the renderer fills the work area while the
    /// flag is set.
    pub fn maximize(&mut self, id: impl AsRef<str>) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        let window = &mut self.windows[index];
        window.previous_position = Some(window.position);
        window.previous_size = Some(window.size);
        window.is_maximized = true;
        tracing::debug!(window_id = %window.id, "maximized window");
        self.events.push(RegistryEvent::Maximized(window.id.clone()));
        self.focus_index(index);
        self.verify();
        true
    }

    pub fn restore(&mut self, id: impl AsRef<str>) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        let window = &mut self.windows[index];
        window.is_minimized = false;
        window.is_maximized = false;
        if let Some(position) = window.previous_position.take() {
            window.position = position;
        }
        if let Some(size) = window.previous_size.take() {
            window.size = size;
        }
        tracing::debug!(window_id = %window.id, "restored window");
        self.events.push(RegistryEvent::Restored(window.id.clone()));
        self.focus_index(index);
        self.verify();
        true
    }

    pub fn toggle_maximize(&mut self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        match self.get(id).map(|w| w.is_maximized) {
            Some(true) => self.restore(id),
            Some(false) => self.maximize(id),
            None => false,
        }
    }

    pub fn move_window(&mut self, id: impl AsRef<str>, position: Position) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        let window = &mut self.windows[index];
        if window.position != position {
            window.position = position;
            tracing::trace!(window_id = %window.id, x = position.x, y = position.y, "moved window");
            self.events.push(RegistryEvent::Moved(window.id.clone()));
        }
        true
    }

    pub fn resize(&mut self, id: impl AsRef<str>, size: Size) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        let window = &mut self.windows[index];
        if window.size != size {
            window.size = size;
            tracing::trace!(window_id = %window.id, width = size.width, height = size.height, "resized window");
            self.events.push(RegistryEvent::Resized(window.id.clone()));
        }
        true
    }

    pub fn set_title(&mut self, id: impl AsRef<str>, title: impl Into<String>) -> bool {
        let Some(index) = self.index_of(id.as_ref()) else {
            return false;
        };
        self.windows[index].title = title.into();
        true
    }

    /// Raise the bottom-most visible window. Calling this repeatedly walks
    /// through every visible window.
    pub fn cycle_focus(&mut self) -> Option<WindowId> {
        let visible = self.windows.iter().filter(|w| w.is_visible()).count();
        if visible < 2 {
            return self.focused_window_id.clone();
        }
        let next = self
            .windows
            .iter()
            .filter(|w| w.is_visible())
            .min_by_key(|w| w.z_index)
            .map(|w| w.id.clone())?;
        self.focus(&next);
        Some(next)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let focused: Vec<&WindowRecord<C>> = self.windows.iter().filter(|w| w.is_focused).collect();
        if focused.len() > 1 {
            return Err(InvariantViolation(format!(
                "{} windows focused",
                focused.len()
            )));
        }
        if focused.first().map(|w| &w.id) != self.focused_window_id.as_ref() {
            return Err(InvariantViolation(format!(
                "focused_window_id {:?} does not match focus flags",
                self.focused_window_id
            )));
        }
        let mut z: Vec<u64> = self.windows.iter().map(|w| w.z_index).collect();
        z.sort_unstable();
        if z.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(InvariantViolation("duplicate z_index".to_string()));
        }
        if z.last().is_some_and(|top| *top > self.highest_z_index) {
            return Err(InvariantViolation("z_index above counter".to_string()));
        }
        if let Some(w) = self.windows.iter().find(|w| w.is_minimized && w.is_focused) {
            return Err(InvariantViolation(format!("minimized window {} focused", w.id)));
        }
        if let Some(w) = self
            .windows
            .iter()
            .find(|w| w.previous_position.is_some() != w.previous_size.is_some())
        {
            return Err(InvariantViolation(format!("window {} has a partial snapshot", w.id)));
        }
        let mut ids: Vec<&str> = self.windows.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(InvariantViolation("duplicate window id".to_string()));
        }
        Ok(())
    }

    fn verify(&self) {
        if let Err(violation) = self.check_invariants() {
            debug_assert!(false, "{violation}");
            tracing::warn!(%violation, "window registry inconsistent");
        }
    }

    fn next_z_index(&mut self) -> u64 {
        self.highest_z_index += 1;
        self.highest_z_index
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.id.as_str() == id)
    }

    fn remove_record(&mut self, id: &str) -> Option<WindowRecord<C>> {
        let index = self.index_of(id)?;
        let record = self.windows.remove(index);
        if self.focused_window_id.as_ref() == Some(&record.id) {
            self.focused_window_id = None;
        }
        Some(record)
    }

    fn focus_index(&mut self, index: usize) {
        let z_index = self.next_z_index();
        for (i, window) in self.windows.iter_mut().enumerate() {
            window.is_focused = i == index;
        }
        let window = &mut self.windows[index];
        window.is_minimized = false;
        window.z_index = z_index;
        tracing::debug!(window_id = %window.id, z_index, "focused window");
        self.focused_window_id = Some(window.id.clone());
        self.events.push(RegistryEvent::Focused(window.id.clone()));
    }

    /// Hand focus to the highest visible window without raising it.
    fn focus_fallback(&mut self) {
        let next = self
            .windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_visible())
            .max_by_key(|(_, w)| w.z_index)
            .map(|(i, _)| i);
        for window in &mut self.windows {
            window.is_focused = false;
        }
        self.focused_window_id = next.map(|i| {
            let window = &mut self.windows[i];
            window.is_focused = true;
            window.id.clone()
        });
        if let Some(id) = &self.focused_window_id {
            tracing::debug!(window_id = %id, "focus fell back");
            self.events.push(RegistryEvent::Focused(id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, x: f64, y: f64) -> WindowSpec<()> {
        WindowSpec::new(id, id.to_uppercase(), ())
            .at(Position::new(x, y))
            .sized(Size::new(400.0, 300.0))
    }

    fn registry(ids: &[&str]) -> WindowRegistry<()> {
        let mut registry = WindowRegistry::new();
        for (i, id) in ids.iter().enumerate() {
            registry.open(spec(id, 10.0 * i as f64, 10.0 * i as f64));
        }
        registry
    }

    fn focused(registry: &WindowRegistry<()>) -> Option<&str> {
        registry.focused_window_id().map(WindowId::as_str)
    }

    #[test]
    fn open_focuses_newest_with_fresh_z() {
        let registry = registry(&["a", "b"]);
        assert_eq!(focused(&registry), Some("b"));
        assert!(!registry.get("a").unwrap().is_focused);
        assert_eq!(registry.get("a").unwrap().z_index, 1);
        assert_eq!(registry.get("b").unwrap().z_index, 2);
        assert_eq!(registry.highest_z_index(), 2);
    }

    #[test]
    fn focus_allocates_new_z_and_is_idempotent() {
        let mut registry = registry(&["a", "b"]);
        assert!(registry.focus("a"));
        assert_eq!(registry.get("a").unwrap().z_index, 3);
        assert!(registry.focus("a"));
        assert_eq!(registry.highest_z_index(), 3);
        assert_eq!(registry.stacking_order(), vec![WindowId::new("b"), WindowId::new("a")]);
    }

    #[test]
    fn maximize_restore_round_trip() {
        let mut registry = registry(&["a"]);
        registry.maximize("a");
        registry.move_window("a", Position::new(0.0, 16.0));
        registry.resize("a", Size::new(1024.0, 700.0));
        registry.restore("a");
        let a = registry.get("a").unwrap();
        assert_eq!(a.position, Position::new(0.0, 0.0));
        assert_eq!(a.size, Size::new(400.0, 300.0));
        assert!(!a.is_maximized);
        assert!(a.previous_position.is_none() && a.previous_size.is_none());
    }

    #[test]
    fn maximize_again_takes_a_fresh_snapshot() {
        let mut registry = registry(&["a"]);
        registry.maximize("a");
        registry.move_window("a", Position::new(50.0, 50.0));
        registry.maximize("a");
        registry.restore("a");
        let a = registry.get("a").unwrap();
        assert_eq!(a.position, Position::new(50.0, 50.0));
        assert_eq!(a.size, Size::new(400.0, 300.0));
    }

    #[test]
    fn restore_without_snapshot_keeps_geometry() {
        let mut registry = registry(&["a", "b"]);
        registry.minimize("a");
        registry.restore("a");
        let a = registry.get("a").unwrap();
        assert_eq!(a.position, Position::ZERO);
        assert!(!a.is_minimized && a.is_focused);
    }

    #[test]
    fn minimize_hands_focus_to_highest_visible() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.minimize("c");
        assert_eq!(focused(&registry), Some("b"));
        assert!(!registry.get("c").unwrap().is_focused);
        registry.minimize("b");
        registry.minimize("a");
        assert_eq!(focused(&registry), None);
    }

    #[test]
    fn minimize_unfocused_keeps_focus() {
        let mut registry = registry(&["a", "b"]);
        registry.minimize("a");
        assert_eq!(focused(&registry), Some("b"));
    }

    #[test]
    fn close_reassigns_focus() {
        let mut registry = registry(&["a", "b"]);
        registry.focus("a");
        // a has z 3, b has z 2
        registry.close("a");
        assert_eq!(focused(&registry), Some("b"));
        assert!(registry.get("b").unwrap().is_focused);
        // fallback focus does not raise
        assert_eq!(registry.get("b").unwrap().z_index, 2);
    }

    #[test]
    fn close_skips_minimized_when_refocusing() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.minimize("b");
        registry.focus("c");
        registry.close("c");
        assert_eq!(focused(&registry), Some("a"));
    }

    #[test]
    fn focusing_minimized_window_restores_visibility() {
        let mut registry = registry(&["a", "b"]);
        registry.minimize("a");
        registry.focus("a");
        let a = registry.get("a").unwrap();
        assert!(!a.is_minimized && a.is_focused);
    }

    #[test]
    fn duplicate_open_replaces_record() {
        let mut registry = registry(&["a", "b"]);
        registry.open(spec("a", 99.0, 99.0));
        assert_eq!(registry.len(), 2);
        let a = registry.get("a").unwrap();
        assert_eq!(a.position, Position::new(99.0, 99.0));
        assert_eq!(a.z_index, 3);
        assert_eq!(focused(&registry), Some("a"));
        let events = registry.take_events();
        assert!(events.contains(&RegistryEvent::Opened {
            id: WindowId::new("a"),
            replaced: true
        }));
    }

    #[test]
    fn open_minimized_spec_is_shown() {
        let mut registry = WindowRegistry::new();
        let mut s = spec("a", 0.0, 0.0);
        s.is_minimized = true;
        registry.open(s);
        assert!(!registry.get("a").unwrap().is_minimized);
    }

    #[test]
    fn open_maximized_spec_snapshots_geometry() {
        let mut registry = WindowRegistry::new();
        registry.open(spec("a", 5.0, 6.0).maximized(true));
        registry.restore("a");
        assert_eq!(registry.get("a").unwrap().position, Position::new(5.0, 6.0));
    }

    #[test]
    fn unknown_ids_leave_state_unchanged() {
        let mut registry = registry(&["a", "b"]);
        registry.take_events();
        let before = registry.windows().to_vec();
        assert!(!registry.focus("zzz"));
        assert!(!registry.close("zzz"));
        assert!(!registry.minimize("zzz"));
        assert!(!registry.maximize("zzz"));
        assert!(!registry.restore("zzz"));
        assert!(!registry.toggle_maximize("zzz"));
        assert!(!registry.move_window("zzz", Position::new(1.0, 1.0)));
        assert!(!registry.resize("zzz", Size::new(1.0, 1.0)));
        assert_eq!(registry.windows(), before.as_slice());
        assert_eq!(registry.highest_z_index(), 2);
        assert!(registry.take_events().is_empty());
    }

    #[test]
    fn move_and_resize_are_verbatim() {
        let mut registry = registry(&["a"]);
        registry.move_window("a", Position::new(-5000.0, -3.0));
        registry.resize("a", Size::new(1.0, 1.0));
        let a = registry.get("a").unwrap();
        assert_eq!(a.position, Position::new(-5000.0, -3.0));
        assert_eq!(a.size, Size::new(1.0, 1.0));
        assert_eq!(registry.highest_z_index(), 1);
    }

    #[test]
    fn cycle_focus_walks_every_visible_window() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.minimize("b");
        assert_eq!(registry.cycle_focus(), Some(WindowId::new("a")));
        assert_eq!(registry.cycle_focus(), Some(WindowId::new("c")));
        assert_eq!(registry.cycle_focus(), Some(WindowId::new("a")));
        assert!(registry.get("b").unwrap().is_minimized);
    }

    #[test]
    fn events_follow_command_order() {
        let mut registry = registry(&["a"]);
        registry.take_events();
        registry.minimize("a");
        registry.restore("a");
        assert_eq!(
            registry.take_events(),
            vec![
                RegistryEvent::Minimized(WindowId::new("a")),
                RegistryEvent::Restored(WindowId::new("a")),
                RegistryEvent::Focused(WindowId::new("a")),
            ]
        );
    }
}
