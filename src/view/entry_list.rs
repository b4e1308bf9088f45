//! Entry list widget.
//!
//! Draws only the materialized nodes of the scroller. Node `i` occupies rows
//! `i * item_height .. (i + 1) * item_height` of the virtual list; the widget
//! shifts them by the scroll offset and clips to its area.

use super::entry::{EntryNode, EntryRenderer};
use crate::model::LogEntry;
use crate::view_state::VirtualScroller;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};
use std::rc::Rc;

/// Draws the scroller's materialized entries into the list area.
pub struct EntryList<'a> {
    scroller: &'a VirtualScroller<Rc<LogEntry>, EntryRenderer>,
    empty_message: &'a str,
}

impl<'a> EntryList<'a> {
    /// List over `scroller`, showing `empty_message` when it has no items.
    pub fn new(
        scroller: &'a VirtualScroller<Rc<LogEntry>, EntryRenderer>,
        empty_message: &'a str,
    ) -> Self {
        Self {
            scroller,
            empty_message,
        }
    }
}

impl Widget for EntryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        if self.scroller.item_count() == 0 {
            let line = Line::styled(
                self.empty_message,
                Style::default().add_modifier(Modifier::DIM),
            );
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let item_height = self.scroller.config().item_height;
        let offset = self.scroller.scroll_offset();
        let bottom = offset + usize::from(area.height);

        for (index, node) in self.scroller.nodes() {
            let top = index * item_height;
            if top >= bottom || top + item_height <= offset {
                continue;
            }
            draw_node(node, top, offset, bottom, area, buf);
        }
    }
}

fn draw_node(
    node: &EntryNode,
    top: usize,
    offset: usize,
    bottom: usize,
    area: Rect,
    buf: &mut Buffer,
) {
    for (row, line) in node.lines.iter().enumerate() {
        let virtual_row = top + row;
        if virtual_row < offset || virtual_row >= bottom {
            continue;
        }
        // virtual_row - offset < area.height, so the cast is lossless
        let y = area.y + (virtual_row - offset) as u16;
        buf.set_line(area.x, y, line, area.width);
    }
}
