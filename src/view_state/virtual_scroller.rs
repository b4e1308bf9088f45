//! Windowed rendering of a long list.
//!
//! [`VirtualScroller`] keeps rendered nodes only for the items inside the
//! current [`VisibleRange`]. Nodes live in an arena keyed by item index;
//! every recompute releases the indices that left the range and acquires the
//! ones that entered it, so the materialized set always equals the last
//! computed range.
//!
//! # Scroll coalescing
//!
//! User scrolling goes through [`VirtualScroller::on_scroll`], which only
//! records the offset and requests a frame. The event loop calls
//! [`VirtualScroller::on_frame`] once per iteration; any number of scroll
//! events between two frames produce at most one recompute. A frame whose
//! offset moved less than `scroll_threshold` since the last render is
//! skipped entirely. Programmatic jumps (`scroll_to_*`) render immediately.
//!
//! # Lifecycle
//!
//! After [`VirtualScroller::destroy`] the renderer is dropped, the pending
//! frame is cancelled, and every later call is a no-op.

use super::visible_range::VisibleRange;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to render a single item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render failed: {reason}")]
pub struct RenderError {
    /// What went wrong.
    pub reason: String,
}

impl RenderError {
    /// Failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Caller-supplied per-item render function.
pub trait ItemRenderer<T> {
    /// Rendered representation of one item.
    type Node;

    /// Acquire a node for `item` at `index`.
    fn render(&mut self, item: &T, index: usize) -> Result<Self::Node, RenderError>;

    /// Minimal node shown in place of an item whose render failed.
    fn placeholder(&mut self, index: usize, error: &RenderError) -> Self::Node;

    /// Release a node whose index left the materialized range.
    fn release(&mut self, _index: usize, _node: Self::Node) {}
}

/// Geometry of the scroller, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollerConfig {
    /// Fixed height estimate of every item.
    pub item_height: usize,
    /// Extra items materialized above and below the viewport.
    pub buffer_size: usize,
    /// Minimum offset delta since the last render that triggers a recompute.
    pub scroll_threshold: usize,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            item_height: 3,
            buffer_size: 5,
            scroll_threshold: 2,
        }
    }
}

/// Virtualized list over items of type `T`, rendered by `R`.
pub struct VirtualScroller<T, R: ItemRenderer<T>> {
    config: ScrollerConfig,
    items: Vec<T>,
    /// `None` once destroyed
    renderer: Option<R>,
    nodes: BTreeMap<usize, R::Node>,
    range: VisibleRange,
    scroll_offset: usize,
    viewport_extent: usize,
    last_rendered_offset: Option<usize>,
    frame_requested: bool,
}

impl<T, R: ItemRenderer<T>> VirtualScroller<T, R> {
    /// Empty scroller; nothing is rendered until items and a viewport arrive.
    pub fn new(config: ScrollerConfig, renderer: R) -> Self {
        Self {
            config,
            items: Vec::new(),
            renderer: Some(renderer),
            nodes: BTreeMap::new(),
            range: VisibleRange::default(),
            scroll_offset: 0,
            viewport_extent: 0,
            last_rendered_offset: None,
            frame_requested: false,
        }
    }

    /// Geometry this scroller was built with.
    pub fn config(&self) -> ScrollerConfig {
        self.config
    }

    /// Replace the backing items and re-render the visible range.
    pub fn set_items(&mut self, items: Vec<T>) {
        if self.is_destroyed() {
            return;
        }
        self.release_all();
        self.items = items;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
        self.render_now();
    }

    /// Resize the viewport; re-renders when the extent changed.
    pub fn set_viewport_extent(&mut self, extent: usize) {
        if self.is_destroyed() || extent == self.viewport_extent {
            return;
        }
        self.viewport_extent = extent;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
        self.render_now();
    }

    /// Record a user scroll and request a frame.
    pub fn on_scroll(&mut self, offset: usize) {
        if self.is_destroyed() {
            return;
        }
        self.scroll_offset = offset.min(self.max_scroll_offset());
        self.frame_requested = true;
    }

    /// Scroll relative to the current offset.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_offset.saturating_add_signed(delta);
        self.on_scroll(target);
    }

    /// Run the pending frame, if any. Returns whether a render happened.
    pub fn on_frame(&mut self) -> bool {
        if self.is_destroyed() || !self.frame_requested {
            return false;
        }
        self.frame_requested = false;

        if let Some(last) = self.last_rendered_offset {
            if self.scroll_offset.abs_diff(last) < self.config.scroll_threshold {
                return false;
            }
        }
        self.render_now();
        true
    }

    /// Whether a scroll is waiting for the next frame.
    pub fn has_pending_frame(&self) -> bool {
        self.frame_requested
    }

    /// Jump so item `index` is at the top of the viewport.
    pub fn scroll_to_index(&mut self, index: usize) {
        self.jump_to(index.saturating_mul(self.config.item_height));
    }

    /// Jump to offset zero.
    pub fn scroll_to_top(&mut self) {
        self.jump_to(0);
    }

    /// Jump to `count * item_height - viewport_extent` (clamped at zero).
    pub fn scroll_to_bottom(&mut self) {
        self.jump_to(self.max_scroll_offset());
    }

    /// Re-render every materialized item in place.
    pub fn refresh(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.release_all();
        self.render_now();
    }

    /// Cancel the pending frame, drop every node and the renderer.
    pub fn destroy(&mut self) {
        self.frame_requested = false;
        self.release_all();
        self.renderer = None;
        self.items.clear();
        self.range = VisibleRange::default();
        self.last_rendered_offset = None;
        debug!("virtual scroller destroyed");
    }

    /// The item renderer, until `destroy` drops it.
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Whether `destroy` has run.
    pub fn is_destroyed(&self) -> bool {
        self.renderer.is_none()
    }

    /// Range computed by the last render.
    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    /// Backing items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of backing items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Full scrollable extent: `count * item_height`.
    pub fn total_extent(&self) -> usize {
        self.items.len().saturating_mul(self.config.item_height)
    }

    /// Current scroll offset, in rows.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Viewport height, in rows.
    pub fn viewport_extent(&self) -> usize {
        self.viewport_extent
    }

    /// Largest offset that still fills the viewport.
    pub fn max_scroll_offset(&self) -> usize {
        self.total_extent().saturating_sub(self.viewport_extent)
    }

    /// Materialized nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, &R::Node)> {
        self.nodes.iter().map(|(index, node)| (*index, node))
    }

    /// Materialized node for `index`, if it is in range.
    pub fn node(&self, index: usize) -> Option<&R::Node> {
        self.nodes.get(&index)
    }

    /// Indices that currently hold a node, ascending.
    pub fn materialized_indices(&self) -> Vec<usize> {
        self.nodes.keys().copied().collect()
    }

    fn jump_to(&mut self, offset: usize) {
        if self.is_destroyed() {
            return;
        }
        self.scroll_offset = offset.min(self.max_scroll_offset());
        self.frame_requested = false;
        self.render_now();
    }

    fn render_now(&mut self) {
        let range = VisibleRange::compute(
            self.scroll_offset,
            self.viewport_extent,
            self.config.item_height,
            self.config.buffer_size,
            self.items.len(),
        );
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let leaving: Vec<usize> = self
            .nodes
            .keys()
            .copied()
            .filter(|index| !range.contains(*index))
            .collect();
        for index in leaving {
            if let Some(node) = self.nodes.remove(&index) {
                renderer.release(index, node);
            }
        }

        for index in range.indices() {
            if self.nodes.contains_key(&index) {
                continue;
            }
            let item = &self.items[index];
            let rendered = catch_unwind(AssertUnwindSafe(|| renderer.render(item, index)))
                .unwrap_or_else(|_| Err(RenderError::new("renderer panicked")));
            let node = match rendered {
                Ok(node) => node,
                Err(error) => {
                    warn!(index, %error, "item render failed, using placeholder");
                    renderer.placeholder(index, &error)
                }
            };
            self.nodes.insert(index, node);
        }

        self.range = range;
        self.last_rendered_offset = Some(self.scroll_offset);
    }

    fn release_all(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        match self.renderer.as_mut() {
            Some(renderer) => {
                for (index, node) in nodes {
                    renderer.release(index, node);
                }
            }
            None => drop(nodes),
        }
        self.range = VisibleRange::default();
    }
}

#[cfg(test)]
#[path = "virtual_scroller_tests.rs"]
mod tests;
