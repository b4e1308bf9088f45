//! View-state layer - windowed rendering of long lists
//!
//! # Module Structure
//!
//! - `visible_range`: VisibleRange - materialized index window and its computation
//! - `virtual_scroller`: VirtualScroller - scroll state, frame coalescing and the node arena

pub mod virtual_scroller;
pub mod visible_range;

pub use virtual_scroller::{ItemRenderer, RenderError, ScrollerConfig, VirtualScroller};
pub use visible_range::VisibleRange;
