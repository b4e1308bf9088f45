//! Per-entry rendering for the virtual scroller.
//!
//! Each entry occupies one fixed-height slot. The first row is the header
//! (level icon, local time, source location); the remaining rows show the
//! arguments rendered to text. Content that does not fit the slot is cut and
//! the last row notes how many lines were hidden.

use super::styles::LevelStyles;
use crate::model::{number_to_text, LogEntry, LogLevel, SerializedValue};
use crate::view_state::{ItemRenderer, RenderError};
use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::text::{Line, Span};
use std::rc::Rc;
use unicode_width::UnicodeWidthChar;

/// Nesting depth past which argument rendering stops.
pub const MAX_RENDER_DEPTH: usize = 10;

/// Longest string leaf shown before cutting.
pub const MAX_RENDERED_STRING: usize = 10_000;

/// Widest source location shown in the header, in terminal columns.
pub const MAX_LOCATION_WIDTH: usize = 60;

/// Text of a failed entry render.
pub const RENDER_FAILED_TEXT: &str = "[render failed: malformed entry]";

/// Materialized slot for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryNode {
    /// Entry id, or `None` for a placeholder.
    pub id: Option<String>,
    /// Exactly the rows drawn for this slot (never more than the slot height).
    pub lines: Vec<Line<'static>>,
}

/// Renders [`LogEntry`] items into [`EntryNode`]s.
#[derive(Debug, Clone)]
pub struct EntryRenderer {
    styles: LevelStyles,
    item_height: usize,
}

impl EntryRenderer {
    /// Renderer for slots of `item_height` rows (at least one).
    pub fn new(styles: LevelStyles, item_height: usize) -> Self {
        Self {
            styles,
            item_height: item_height.max(1),
        }
    }

    fn header(&self, entry: &LogEntry, time: DateTime<Utc>) -> Line<'static> {
        let level_style = self.styles.style_for_level(entry.level());
        Line::from(vec![
            Span::styled(format!("{} ", level_icon(entry.level())), level_style),
            Span::styled(format_timestamp(time, &Local), self.styles.timestamp()),
            Span::raw(" "),
            Span::styled(
                truncate_to_width(&sanitize_location(entry.source_location()), MAX_LOCATION_WIDTH),
                self.styles.location(),
            ),
        ])
    }
}

impl EntryRenderer {
    fn body(&self, entry: &LogEntry) -> Vec<Line<'static>> {
        let level_style = self.styles.style_for_level(entry.level());
        render_args(entry.args())
            .lines()
            .map(|line| Line::styled(line.to_string(), level_style))
            .collect()
    }

    /// Every line of an entry, uncut, for the detail pane.
    pub fn detail_lines(&self, entry: &LogEntry) -> Vec<Line<'static>> {
        let mut lines = match entry.timestamp() {
            Some(time) => vec![self.header(entry, time)],
            None => vec![Line::styled(RENDER_FAILED_TEXT, self.styles.placeholder())],
        };
        lines.extend(self.body(entry));
        lines
    }
}

impl ItemRenderer<Rc<LogEntry>> for EntryRenderer {
    type Node = EntryNode;

    fn render(&mut self, entry: &Rc<LogEntry>, _index: usize) -> Result<EntryNode, RenderError> {
        let time = entry.timestamp().ok_or_else(|| {
            RenderError::new(format!("timestamp {} out of range", entry.timestamp_ms()))
        })?;

        let mut lines = vec![self.header(entry, time)];
        let body_rows = self.item_height - 1;
        if body_rows > 0 {
            let mut body = self.body(entry);
            if body.len() > body_rows {
                let shown = body_rows - 1;
                let hidden = body.len() - shown;
                body.truncate(shown);
                let hint = if entry.is_expandable() {
                    format!("... (+{hidden} more lines, e to expand)")
                } else {
                    format!("... (+{hidden} more lines)")
                };
                body.push(Line::styled(hint, self.styles.timestamp()));
            }
            lines.extend(body);
        }
        lines.truncate(self.item_height);

        Ok(EntryNode {
            id: Some(entry.id().to_string()),
            lines,
        })
    }

    fn placeholder(&mut self, _index: usize, _error: &RenderError) -> EntryNode {
        EntryNode {
            id: None,
            lines: vec![Line::styled(RENDER_FAILED_TEXT, self.styles.placeholder())],
        }
    }
}

/// Icon shown before each entry.
pub fn level_icon(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Log => "ℹ",
        LogLevel::Warn => "⚠",
        LogLevel::Error => "✖",
    }
}

/// `HH:MM:SS.mmm` in the given time zone.
pub fn format_timestamp<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.with_timezone(tz).format("%H:%M:%S%.3f").to_string()
}

/// Strip characters that could smuggle markup out of a location string.
pub fn sanitize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"'))
        .collect()
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// All arguments of an entry, space separated.
pub fn render_args(args: &[SerializedValue]) -> String {
    args.iter()
        .map(|arg| render_value(arg, 0))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text form of one serialized value.
///
/// Containers expand to indented multi-line blocks; errors show their stack
/// when present.
pub fn render_value(value: &SerializedValue, depth: usize) -> String {
    if depth > MAX_RENDER_DEPTH {
        return "[Max depth exceeded]".to_string();
    }
    let indent = "  ".repeat(depth);

    match value {
        SerializedValue::String { value } => {
            if value.chars().count() > MAX_RENDERED_STRING {
                let cut: String = value.chars().take(MAX_RENDERED_STRING).collect();
                format!("{cut}... [truncated]")
            } else {
                value.clone()
            }
        }
        SerializedValue::Number { value } => number_to_text(*value),
        SerializedValue::Boolean { value } => value.to_string(),
        SerializedValue::Null => "null".to_string(),
        SerializedValue::Undefined => "undefined".to_string(),
        SerializedValue::Function { value } if value.is_empty() => "[Function]".to_string(),
        SerializedValue::Function { value } => value.clone(),
        SerializedValue::Error { message, stack } => match stack.as_deref() {
            Some(stack) if !stack.is_empty() => stack.to_string(),
            _ if !message.is_empty() => message.clone(),
            _ => "[Error]".to_string(),
        },
        SerializedValue::Object { value, .. } if value.is_empty() => "{}".to_string(),
        SerializedValue::Object { value, .. } => {
            let members: Vec<String> = value
                .iter()
                .map(|(key, child)| format!("{indent}  {key}: {}", render_value(child, depth + 1)))
                .collect();
            format!("{{\n{}\n{indent}}}", members.join("\n"))
        }
        SerializedValue::Array { value, .. } if value.is_empty() => "[]".to_string(),
        SerializedValue::Array { value, .. } => {
            let items: Vec<String> = value
                .iter()
                .enumerate()
                .map(|(i, child)| format!("{indent}  {i}: {}", render_value(child, depth + 1)))
                .collect();
            format!("[\n{}\n{indent}]", items.join("\n"))
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
