//! Viewer state machine (pure).
//!
//! All state transitions are plain method calls testable without a terminal.

pub mod app_state;
pub mod search;

// Re-export for convenience
pub use app_state::{AppState, LevelCounts, NEW_ENTRIES_HINT};
pub use search::SearchInput;
