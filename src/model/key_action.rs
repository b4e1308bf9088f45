//! Domain-level keyboard actions independent of key bindings.

use crate::model::LogLevel;

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the entry list up by one row. Default: k/↑
    ScrollUp,
    /// Scroll the entry list down by one row. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the newest entry (top of the list). Default: g/Home
    ScrollToTop,
    /// Jump to the oldest entry (bottom of the list). Default: G/End
    ScrollToBottom,

    // Filtering
    /// Start editing the search text. Default: /
    StartSearch,
    /// Leave the search input, keeping the text. Default: Enter/Esc
    EndSearch,
    /// Cycle the source filter through known sources, then back to all. Default: s
    CycleSource,
    /// Toggle one level in the level filter. Default: 1/2/3
    ToggleLevel(LogLevel),
    /// Reset search, source and level filters. Default: x
    ClearFilters,

    // Store
    /// Drop every stored entry and reset the counters. Default: c
    ClearLogs,

    // Detail
    /// Open the entry at the top of the viewport in the detail pane, or
    /// close the pane. Default: e
    ToggleExpand,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}
