//! Application state and transitions.
//!
//! AppState is the root state of the viewer. It owns the entry store, the
//! active filter, and the windowed list that displays the filtered entries
//! newest first. Every transition is a plain method call; the terminal layer
//! only translates events into these calls and draws the result.

use crate::config::ResolvedConfig;
use crate::filter::{get_filtered, Debouncer, FilterPredicate};
use crate::model::{KeyAction, LogEntry, LogLevel, ParseError};
use crate::parser::{parse_message, process_lines};
use crate::state::SearchInput;
use crate::store::EntryStore;
use crate::view_state::{ItemRenderer, VirtualScroller};
use std::ops::Bound;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long the new-entries hint stays up after the last arrival.
pub const NEW_ENTRIES_HINT: Duration = Duration::from_secs(2);

// ===== LevelCounts =====

/// Cumulative per-level counters.
///
/// Counts every accepted entry, including ones later evicted from the store.
/// Only [`AppState::clear_logs`] resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    /// Accepted `log` entries.
    pub log: usize,
    /// Accepted `warn` entries.
    pub warn: usize,
    /// Accepted `error` entries.
    pub error: usize,
}

impl LevelCounts {
    /// Count for one level.
    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Log => self.log,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
        }
    }

    /// Count one more entry of `level`.
    pub fn increment(&mut self, level: LogLevel) {
        match level {
            LogLevel::Log => self.log += 1,
            LogLevel::Warn => self.warn += 1,
            LogLevel::Error => self.error += 1,
        }
    }

    /// Sum over all levels.
    pub fn total(&self) -> usize {
        self.log + self.warn + self.error
    }
}

// ===== AppState =====

/// Viewer state.
///
/// Generic over the item renderer so state transitions are testable without
/// a terminal.
///
/// # Auto-scroll
///
/// Newest entries are shown at the top. While the viewport sits within the
/// first row band (offset below one item height) `auto_scroll` is on and
/// every ingest jumps back to the top. Scrolling further down turns it off
/// until the user returns.
pub struct AppState<R: ItemRenderer<Rc<LogEntry>>> {
    /// Bounded FIFO of accepted entries.
    store: EntryStore,

    /// Filter applied on every view refresh.
    predicate: FilterPredicate,

    /// Windowed list over the filtered entries, newest first.
    scroller: VirtualScroller<Rc<LogEntry>, R>,

    counts: LevelCounts,

    /// Messages rejected by the parser since startup.
    rejected: usize,

    /// Whether new entries pull the view back to the top.
    auto_scroll: bool,

    /// Search text being edited. Its committed value lives in `predicate`.
    pub search: SearchInput,

    /// Pending search text, applied once typing pauses.
    search_debounce: Debouncer<String>,

    /// Line number the next inbound message is attributed to (1-based).
    next_line: usize,

    /// Entries arrived since the last tick.
    arrived: bool,

    /// When the new-entries hint goes away.
    hint_until: Option<Instant>,

    /// Entry open in the detail pane.
    expanded: Option<Rc<LogEntry>>,
}

impl<R: ItemRenderer<Rc<LogEntry>>> AppState<R> {
    /// Empty state: no entries, no filters, auto-scroll on.
    pub fn new(config: &ResolvedConfig, renderer: R) -> Self {
        Self {
            store: EntryStore::new(config.store_capacity),
            predicate: FilterPredicate::default(),
            scroller: VirtualScroller::new(config.scroller_config(), renderer),
            counts: LevelCounts::default(),
            rejected: 0,
            auto_scroll: true,
            search: SearchInput::new(),
            search_debounce: Debouncer::new(config.search_debounce()),
            next_line: 1,
            arrived: false,
            hint_until: None,
            expanded: None,
        }
    }

    // ===== Accessors =====

    /// Stored entries, oldest first.
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Filter currently applied to the view.
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    /// Windowed list over the filtered entries.
    pub fn scroller(&self) -> &VirtualScroller<Rc<LogEntry>, R> {
        &self.scroller
    }

    /// Cumulative per-level counters.
    pub fn counts(&self) -> LevelCounts {
        self.counts
    }

    /// Messages rejected since startup or the last clear.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// Whether new entries pull the view back to the top.
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Number of entries passing the current filter.
    pub fn visible_count(&self) -> usize {
        self.scroller.item_count()
    }

    /// Whether the new-entries hint is showing.
    ///
    /// Raised by every accepted entry and cleared by [`AppState::tick`] once
    /// [`NEW_ENTRIES_HINT`] has passed without further arrivals.
    pub fn has_new_entries(&self) -> bool {
        self.arrived || self.hint_until.is_some()
    }

    /// Entry shown in full in the detail pane, if any.
    pub fn expanded(&self) -> Option<&Rc<LogEntry>> {
        self.expanded.as_ref()
    }

    /// Whether a search update is waiting for the debounce delay.
    pub fn has_pending_search(&self) -> bool {
        self.search_debounce.is_pending()
    }

    // ===== Ingestion =====

    /// Parse one inbound line and ingest it.
    ///
    /// # Errors
    ///
    /// Returns the rejection. It has already been logged and counted; the
    /// state is otherwise unchanged.
    pub fn ingest_line(&mut self, raw: &str, line_number: usize) -> Result<(), ParseError> {
        self.next_line = self.next_line.max(line_number + 1);
        match parse_message(raw, line_number) {
            Ok(entry) => {
                self.ingest(entry);
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Ingest a batch of lines from the input source, refreshing the view once.
    ///
    /// Returns the number of accepted entries.
    pub fn ingest_lines(&mut self, lines: Vec<String>) -> usize {
        if lines.is_empty() {
            return 0;
        }
        let first_line = self.next_line;
        self.next_line += lines.len();

        let (entries, errors) = process_lines(lines, first_line);
        for err in &errors {
            self.reject(err);
        }
        let accepted = entries.len();
        if accepted == 0 {
            return 0;
        }
        for entry in entries {
            self.accept(entry);
        }
        self.refresh_view();
        debug!(accepted, rejected = errors.len(), "ingested batch");
        accepted
    }

    /// Store one entry, count it and recompute the view.
    pub fn ingest(&mut self, entry: LogEntry) {
        self.accept(entry);
        self.refresh_view();
    }

    fn accept(&mut self, entry: LogEntry) {
        self.counts.increment(entry.level());
        self.arrived = true;
        if let Some(evicted) = self.store.add_entry(entry) {
            debug!(id = evicted.id(), "evicted oldest entry");
        }
    }

    fn reject(&mut self, err: &ParseError) {
        self.rejected += 1;
        warn!(line = err.line(), error = %err, "rejected message");
    }

    /// Filter the store snapshot and hand it to the scroller, newest first.
    pub fn refresh_view(&mut self) {
        let mut filtered = get_filtered(&self.store.all_entries(), &self.predicate);
        filtered.reverse();
        self.scroller.set_items(filtered);
        if self.auto_scroll {
            self.scroller.scroll_to_top();
        }
        self.update_auto_scroll();
    }

    // ===== Store and filter transitions =====

    /// Drop every entry and reset the counters. Filters stay as they are.
    pub fn clear_logs(&mut self) {
        self.store.clear();
        self.counts = LevelCounts::default();
        self.rejected = 0;
        self.auto_scroll = true;
        self.arrived = false;
        self.hint_until = None;
        self.expanded = None;
        self.refresh_view();
    }

    /// Reset search, source and level filters.
    pub fn clear_filters(&mut self) {
        self.predicate = FilterPredicate::default();
        self.search.clear();
        self.search_debounce.cancel();
        self.refresh_view();
    }

    /// Advance the source filter to the next known source in sorted order,
    /// wrapping back to "all sources" after the last one.
    pub fn cycle_source(&mut self) {
        let sources = self.store.sources();
        let next = match self.predicate.source() {
            None => sources.into_iter().next(),
            Some(current) => sources
                .range::<str, _>((Bound::Excluded(current), Bound::Unbounded))
                .next()
                .cloned(),
        };
        self.predicate.source_id = next;
        self.refresh_view();
    }

    /// Add or remove one level from the level filter.
    ///
    /// An empty level set admits every level.
    pub fn toggle_level(&mut self, level: LogLevel) {
        if !self.predicate.levels.remove(&level) {
            self.predicate.levels.insert(level);
        }
        self.refresh_view();
    }

    // ===== Detail pane =====

    /// Close the detail pane, or open it on the entry at the top of the
    /// viewport when that entry is expandable.
    ///
    /// The pane keeps its entry through filter changes and eviction.
    pub fn toggle_expand(&mut self) {
        if self.expanded.take().is_some() {
            return;
        }
        let index = self.scroller.scroll_offset() / self.scroller.config().item_height.max(1);
        self.expanded = self
            .scroller
            .items()
            .get(index)
            .filter(|entry| entry.is_expandable())
            .cloned();
    }

    // ===== Search input =====

    /// Give the search input focus.
    pub fn start_search(&mut self) {
        self.search.activate();
    }

    /// Leave the input and apply any pending text immediately.
    pub fn end_search(&mut self) {
        self.search.deactivate();
        if let Some(text) = self.search_debounce.flush() {
            self.apply_search(text);
        }
    }

    /// Insert a char at the cursor and schedule the search update.
    pub fn search_insert(&mut self, c: char, now: Instant) {
        self.search.insert(c);
        self.schedule_search(now);
    }

    /// Erase before the cursor and schedule the search update.
    pub fn search_backspace(&mut self, now: Instant) {
        if self.search.backspace() {
            self.schedule_search(now);
        }
    }

    /// Erase under the cursor and schedule the search update.
    pub fn search_delete(&mut self, now: Instant) {
        if self.search.delete() {
            self.schedule_search(now);
        }
    }

    fn schedule_search(&mut self, now: Instant) {
        self.search_debounce
            .schedule(self.search.text().to_string(), now);
    }

    fn apply_search(&mut self, text: String) {
        self.predicate.search_text = if text.is_empty() { None } else { Some(text) };
        self.refresh_view();
    }

    // ===== Frame =====

    /// Advance time: apply a due search update, update the new-entries hint,
    /// then run the scroller's pending frame. Returns whether anything
    /// visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.tick_new_entries(now);
        if let Some(text) = self.search_debounce.poll(now) {
            self.apply_search(text);
            changed = true;
        }
        changed |= self.scroller.on_frame();
        changed
    }

    /// Returns whether the hint appeared or went away.
    fn tick_new_entries(&mut self, now: Instant) -> bool {
        if std::mem::take(&mut self.arrived) {
            let appeared = self.hint_until.is_none();
            self.hint_until = Some(now + NEW_ENTRIES_HINT);
            return appeared;
        }
        match self.hint_until {
            Some(until) if now >= until => {
                self.hint_until = None;
                true
            }
            _ => false,
        }
    }

    // ===== Scrolling =====

    /// Resize the list viewport.
    pub fn set_viewport_height(&mut self, rows: usize) {
        self.scroller.set_viewport_extent(rows);
        self.update_auto_scroll();
    }

    /// Scroll by `rows`; applied on the next frame.
    pub fn scroll_by(&mut self, rows: isize) {
        self.scroller.scroll_by(rows);
        self.update_auto_scroll();
    }

    /// Scroll up one viewport.
    pub fn page_up(&mut self) {
        let page = self.page_rows();
        self.scroll_by(-page);
    }

    /// Scroll down one viewport.
    pub fn page_down(&mut self) {
        let page = self.page_rows();
        self.scroll_by(page);
    }

    /// Jump to the newest entry.
    pub fn scroll_to_top(&mut self) {
        self.scroller.scroll_to_top();
        self.update_auto_scroll();
    }

    /// Jump to the oldest entry.
    pub fn scroll_to_bottom(&mut self) {
        self.scroller.scroll_to_bottom();
        self.update_auto_scroll();
    }

    fn page_rows(&self) -> isize {
        isize::try_from(self.scroller.viewport_extent().max(1)).unwrap_or(isize::MAX)
    }

    fn update_auto_scroll(&mut self) {
        self.auto_scroll = self.scroller.scroll_offset() < self.scroller.config().item_height;
    }

    // ===== Actions =====

    /// Apply a bound key action. `Quit` is left to the caller.
    pub fn apply(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::ScrollUp => self.scroll_by(-1),
            KeyAction::ScrollDown => self.scroll_by(1),
            KeyAction::PageUp => self.page_up(),
            KeyAction::PageDown => self.page_down(),
            KeyAction::ScrollToTop => self.scroll_to_top(),
            KeyAction::ScrollToBottom => self.scroll_to_bottom(),
            KeyAction::StartSearch => self.start_search(),
            KeyAction::EndSearch => self.end_search(),
            KeyAction::CycleSource => self.cycle_source(),
            KeyAction::ToggleLevel(level) => self.toggle_level(level),
            KeyAction::ClearFilters => self.clear_filters(),
            KeyAction::ClearLogs => self.clear_logs(),
            KeyAction::ToggleExpand => self.toggle_expand(),
            KeyAction::Quit => {}
        }
        // Scroll actions only request a frame; make them visible now.
        self.tick(now);
    }

    /// Stop rendering. The state keeps its store but draws nothing afterwards.
    pub fn shutdown(&mut self) {
        self.search_debounce.cancel();
        self.arrived = false;
        self.hint_until = None;
        self.scroller.destroy();
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
