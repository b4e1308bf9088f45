//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crate::model::LogLevel;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions in normal (non-search) mode.
///
/// While the search input is active, keys are text and only Esc/Enter are
/// interpreted; see [`KeyBindings::search_action`].
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Release and repeat kinds are ignored; only the code and modifiers matter.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Action for a key while the search input has focus.
    pub fn search_action(key: KeyEvent) -> Option<KeyAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Enter, _) => Some(KeyAction::EndSearch),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(KeyAction::Quit),
            _ => None,
        }
    }

    /// Bind (or rebind) a key.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        let table = [
            // Vim-style and arrow scrolling
            (plain(KeyCode::Char('j')), KeyAction::ScrollDown),
            (plain(KeyCode::Char('k')), KeyAction::ScrollUp),
            (plain(KeyCode::Down), KeyAction::ScrollDown),
            (plain(KeyCode::Up), KeyAction::ScrollUp),
            (plain(KeyCode::Char('g')), KeyAction::ScrollToTop),
            (plain(KeyCode::Home), KeyAction::ScrollToTop),
            (
                KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
                KeyAction::ScrollToBottom,
            ),
            (plain(KeyCode::Char('G')), KeyAction::ScrollToBottom),
            (plain(KeyCode::End), KeyAction::ScrollToBottom),
            // Page navigation
            (plain(KeyCode::PageDown), KeyAction::PageDown),
            (plain(KeyCode::PageUp), KeyAction::PageUp),
            (ctrl('d'), KeyAction::PageDown),
            (ctrl('u'), KeyAction::PageUp),
            // Filtering
            (plain(KeyCode::Char('/')), KeyAction::StartSearch),
            (ctrl('f'), KeyAction::StartSearch),
            (plain(KeyCode::Char('s')), KeyAction::CycleSource),
            (plain(KeyCode::Char('1')), KeyAction::ToggleLevel(LogLevel::Log)),
            (plain(KeyCode::Char('2')), KeyAction::ToggleLevel(LogLevel::Warn)),
            (plain(KeyCode::Char('3')), KeyAction::ToggleLevel(LogLevel::Error)),
            (plain(KeyCode::Char('x')), KeyAction::ClearFilters),
            // Store
            (plain(KeyCode::Char('c')), KeyAction::ClearLogs),
            // Detail
            (plain(KeyCode::Char('e')), KeyAction::ToggleExpand),
            // Application
            (plain(KeyCode::Char('q')), KeyAction::Quit),
            (ctrl('c'), KeyAction::Quit),
        ];

        Self {
            bindings: table.into_iter().collect(),
        }
    }
}
