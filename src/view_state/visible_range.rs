//! Materialized index window for the virtual scroller

/// Half-open range `[start, end)` of item indices to keep materialized.
///
/// # Invariants
/// - `start <= end`
/// - `end <= item count` when produced by [`VisibleRange::compute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// First materialized index (inclusive).
    pub start: usize,
    /// One past the last materialized index (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Create a range.
    ///
    /// # Panics
    /// In debug builds, panics if start > end.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "VisibleRange start {start} > end {end}");
        Self { start, end }
    }

    /// Range covering the viewport plus `buffer` items on either side.
    ///
    /// `start = max(0, floor(offset / item_height) - buffer)` and
    /// `end = min(count, ceil((offset + viewport) / item_height) + buffer)`.
    /// A zero item height materializes nothing.
    pub fn compute(
        scroll_offset: usize,
        viewport_extent: usize,
        item_height: usize,
        buffer: usize,
        item_count: usize,
    ) -> Self {
        if item_height == 0 || item_count == 0 {
            return Self::default();
        }

        let first_visible = scroll_offset / item_height;
        let last_visible = (scroll_offset + viewport_extent).div_ceil(item_height);

        let end = (last_visible + buffer).min(item_count);
        let start = first_visible.saturating_sub(buffer).min(end);
        Self::new(start, end)
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range covers no items.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over the indices in order.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..self.end
    }

    /// Whether `index` lies in `[start, end)`.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}
