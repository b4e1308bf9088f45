//! Level styling configuration.
//!
//! Provides distinct colors for the three log levels plus the entry chrome
//! (timestamp, source location, placeholders).

use crate::model::LogLevel;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors on.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Colors off.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether colors are on.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LevelStyles =====

/// Styles for entry rendering.
///
/// - log: default foreground
/// - warn: Yellow
/// - error: Red
/// - timestamp / location: DarkGray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyles {
    log_style: Style,
    warn_style: Style,
    error_style: Style,
    timestamp_style: Style,
    location_style: Style,
    placeholder_style: Style,
}

impl LevelStyles {
    /// Level palette, or plain styles when colors are off.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                log_style: Style::default().fg(Color::Cyan),
                warn_style: Style::default().fg(Color::Yellow),
                error_style: Style::default().fg(Color::Red),
                timestamp_style: Style::default().fg(Color::DarkGray),
                location_style: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                placeholder_style: Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::DIM),
            }
        } else {
            Self {
                log_style: Style::default(),
                warn_style: Style::default(),
                error_style: Style::default(),
                timestamp_style: Style::default(),
                location_style: Style::default(),
                placeholder_style: Style::default(),
            }
        }
    }

    /// Style for the icon and arguments of an entry at `level`.
    pub fn style_for_level(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Log => self.log_style,
            LogLevel::Warn => self.warn_style,
            LogLevel::Error => self.error_style,
        }
    }

    /// Style of the time column.
    pub fn timestamp(&self) -> Style {
        self.timestamp_style
    }

    /// Style of the source location.
    pub fn location(&self) -> Style {
        self.location_style
    }

    /// Style of failed-render placeholders.
    pub fn placeholder(&self) -> Style {
        self.placeholder_style
    }
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
