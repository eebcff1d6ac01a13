use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(
            CloseWindow,
            KeyCombo::new(KeyCode::Char('w'), KeyModifiers::CONTROL),
        );
        kb.add(
            MinimizeWindow,
            KeyCombo::new(KeyCode::Char('m'), KeyModifiers::ALT),
        );
        kb.add(ZoomWindow, KeyCombo::new(KeyCode::Char('z'), KeyModifiers::ALT));
        kb.add(
            CycleWindows,
            KeyCombo::new(KeyCode::Char('`'), KeyModifiers::ALT),
        );
        kb.add(CycleWindows, KeyCombo::new(KeyCode::F(6), KeyModifiers::NONE));
        kb.add(
            OpenSettings,
            KeyCombo::new(KeyCode::Char(','), KeyModifiers::ALT),
        );
        kb.add(
            Spotlight,
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::CONTROL),
        );
        kb.add(Spotlight, KeyCombo::new(KeyCode::Char(' '), KeyModifiers::ALT));
        kb.add(
            ToggleMouseCapture,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::ALT),
        );
        kb.add(DismissMenu, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        // In-app navigation
        kb.add(SelectPrev, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(SelectNext, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(SelectLeft, KeyCombo::new(KeyCode::Left, KeyModifiers::NONE));
        kb.add(SelectRight, KeyCombo::new(KeyCode::Right, KeyModifiers::NONE));
        kb.add(Activate, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(
            ToggleSelection,
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE),
        );
        kb.add(
            NavigateBack,
            KeyCombo::new(KeyCode::Backspace, KeyModifiers::NONE),
        );
        kb.add(GoBack, KeyCombo::new(KeyCode::Left, KeyModifiers::ALT));
        kb.add(GoForward, KeyCombo::new(KeyCode::Right, KeyModifiers::ALT));
        kb.add(NewItem, KeyCombo::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        kb.add(
            DeleteItem,
            KeyCombo::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
        );
        kb.add(RenameItem, KeyCombo::new(KeyCode::F(2), KeyModifiers::NONE));
        // Scrolling
        kb.add(
            ScrollPageUp,
            KeyCombo::new(KeyCode::PageUp, KeyModifiers::NONE),
        );
        kb.add(
            ScrollPageDown,
            KeyCombo::new(KeyCode::PageDown, KeyModifiers::NONE),
        );
        kb.add(ScrollHome, KeyCombo::new(KeyCode::Home, KeyModifiers::NONE));
        kb.add(ScrollEnd, KeyCombo::new(KeyCode::End, KeyModifiers::NONE));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// The desktop-level action bound to `key`, if any.
    pub fn global_action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .filter(|(action, _)| action.is_global())
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}
