//! Screen layout.
//!
//! Vertical stack: status line, filter/search line, the entry list, the
//! detail pane while an entry is expanded, and a one-line key hint footer.
//! The list area is the scroller's viewport.

use super::entry_list::EntryList;
use super::header::{filter_line, key_hints, status_line};
use super::ViewerState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows above the entry list.
pub const HEADER_HEIGHT: u16 = 2;

/// Rows below the entry list.
pub const FOOTER_HEIGHT: u16 = 1;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    /// Counters and live marker.
    pub status: Rect,
    /// Filter summary or search input.
    pub filters: Rect,
    /// Entry list; the scroller viewport.
    pub list: Rect,
    /// Expanded entry; zero height when nothing is expanded.
    pub detail: Rect,
    /// Key hints.
    pub footer: Rect,
}

/// Split the frame into its regions.
///
/// With `detail` set, the lower half of the space between header and footer
/// goes to the detail pane.
pub fn split(area: Rect, detail: bool) -> Areas {
    let body = area.height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT);
    let detail_height = if detail { body / 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(HEADER_HEIGHT - 1),
            Constraint::Min(0),
            Constraint::Length(detail_height),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    Areas {
        status: chunks[0],
        filters: chunks[1],
        list: chunks[2],
        detail: chunks[3],
        footer: chunks[4],
    }
}

/// Draw the whole screen.
pub fn render_layout(frame: &mut Frame, state: &ViewerState, live: bool) {
    let areas = split(frame.area(), state.expanded().is_some());

    frame.render_widget(Paragraph::new(status_line(state, live)), areas.status);
    frame.render_widget(
        Paragraph::new(filter_line(state.predicate(), &state.search)),
        areas.filters,
    );

    let empty_message = if state.store().is_empty() {
        "Waiting for messages..."
    } else {
        "No entries match the current filters"
    };
    frame.render_widget(EntryList::new(state.scroller(), empty_message), areas.list);

    if let (Some(entry), Some(renderer)) = (state.expanded(), state.scroller().renderer()) {
        let block = Block::default()
            .borders(Borders::TOP)
            .title(" Entry (e to collapse) ");
        frame.render_widget(
            Paragraph::new(renderer.detail_lines(entry)).block(block),
            areas.detail,
        );
    }

    frame.render_widget(Paragraph::new(key_hints()), areas.footer);
}
