//! Header lines: counters, active filters, and the search input.

use super::entry::level_icon;
use super::ViewerState;
use crate::filter::FilterPredicate;
use crate::model::LogLevel;
use crate::state::SearchInput;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const LIVE_TEXT: &str = "[LIVE]";
const NEW_ENTRIES_TEXT: &str = "▲ new entries";

/// Title, per-level counts, shown/stored totals, the new-entries hint and
/// the live marker.
pub fn status_line(state: &ViewerState, live: bool) -> Line<'static> {
    let counts = state.counts();
    let mut spans = vec![Span::styled(
        " satcon ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for level in LogLevel::ALL {
        spans.push(Span::raw(format!(" {} {}", level_icon(level), counts.get(level))));
    }

    spans.push(Span::raw(format!(
        "  showing {}/{} (max {})",
        state.visible_count(),
        state.store().count(),
        state.store().capacity()
    )));

    if state.rejected_count() > 0 {
        spans.push(Span::styled(
            format!("  rejected {}", state.rejected_count()),
            Style::default().fg(Color::Red),
        ));
    }

    if state.has_new_entries() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            NEW_ENTRIES_TEXT,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if live {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(LIVE_TEXT, Style::default().fg(Color::Green)));
    }

    Line::from(spans)
}

/// The search input while it has focus, otherwise a summary of the filters.
pub fn filter_line(predicate: &FilterPredicate, search: &SearchInput) -> Line<'static> {
    if search.is_active() {
        return search_input_line(search);
    }

    let mut parts = Vec::new();
    if let Some(text) = predicate.search() {
        parts.push(format!("search \"{text}\""));
    }
    if let Some(source) = predicate.source() {
        parts.push(format!("source {source}"));
    }
    if !predicate.levels.is_empty() {
        let levels: Vec<&str> = predicate.levels.iter().map(LogLevel::as_str).collect();
        parts.push(format!("levels {}", levels.join(",")));
    }

    if parts.is_empty() {
        Line::styled(
            " Filters: none",
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        Line::from(format!(" Filters: {}", parts.join("  ")))
    }
}

fn search_input_line(search: &SearchInput) -> Line<'static> {
    let text = search.text();
    let before: String = text.chars().take(search.cursor()).collect();
    let mut rest = text.chars().skip(search.cursor());
    let cursor_char = rest.next().map_or_else(|| " ".to_string(), String::from);
    let after: String = rest.collect();

    Line::from(vec![
        Span::styled(" Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(before),
        Span::styled(
            cursor_char,
            Style::default()
                .bg(Color::White)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(after),
    ])
}

/// Footer with the main bindings.
pub fn key_hints() -> Line<'static> {
    Line::styled(
        " q quit  / search  s source  1/2/3 levels  x clear filters  c clear logs  e expand  j/k g/G scroll",
        Style::default().add_modifier(Modifier::DIM),
    )
}
