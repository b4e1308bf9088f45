//! TUI rendering and terminal management (impure shell)

pub mod entry;
mod entry_list;
mod header;
pub mod layout;
pub mod styles;

pub use entry::{EntryNode, EntryRenderer};
pub use styles::{ColorConfig, LevelStyles};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::KeyAction;
use crate::source::InputSource;
use crate::state::AppState;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::Backend, backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::panic::{self, PanicHookInfo};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Viewer state with the terminal entry renderer.
pub type ViewerState = AppState<EntryRenderer>;

/// Upper bound on the wait for terminal events; one frame per iteration.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: isize = 3;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    state: ViewerState,
    input_source: InputSource,
    key_bindings: KeyBindings,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        input_source: InputSource,
        config: &ResolvedConfig,
        colors: ColorConfig,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, input_source, config, colors)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Each iteration waits at most
    /// one frame for terminal events, then drains the input source and
    /// advances the scroller and search debounce. Redraws only when
    /// something changed.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let mut dirty = false;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if self.handle_key(key, Instant::now()) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        dirty = self.handle_mouse(mouse);
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                        self.sync_viewport()?;
                        dirty = true;
                    }
                    _ => {}
                }
            }

            dirty |= self.frame(Instant::now());
            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app on an existing terminal and load whatever the input
    /// source already has.
    pub fn with_terminal(
        terminal: Terminal<B>,
        input_source: InputSource,
        config: &ResolvedConfig,
        colors: ColorConfig,
    ) -> Result<Self, TuiError> {
        let renderer = EntryRenderer::new(
            LevelStyles::with_color_config(colors),
            config.scroller_config().item_height,
        );
        let mut app = Self {
            terminal,
            state: AppState::new(config, renderer),
            input_source,
            key_bindings: KeyBindings::default(),
        };
        app.sync_viewport()?;
        app.frame(Instant::now());
        Ok(app)
    }

    /// Current viewer state.
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// One frame: pull new lines, then advance debounce and scroller.
    ///
    /// Returns whether anything visible changed.
    fn frame(&mut self, now: Instant) -> bool {
        let ingested = match self.input_source.poll() {
            Ok(lines) => self.state.ingest_lines(lines) > 0,
            Err(err) => {
                // The source is complete after a failure; keep showing what arrived.
                warn!(error = %err, "input source failed");
                false
            }
        };
        let ticked = self.state.tick(now);
        ingested || ticked
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.state.search.is_active() {
            if let Some(action) = KeyBindings::search_action(key) {
                self.state.apply(action, now);
                return false;
            }
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.state.search_insert(c, now);
                }
                KeyCode::Backspace => self.state.search_backspace(now),
                KeyCode::Delete => self.state.search_delete(now),
                KeyCode::Left => self.state.search.move_left(),
                KeyCode::Right => self.state.search.move_right(),
                _ => {}
            }
            return false;
        }

        match self.key_bindings.get(key) {
            Some(KeyAction::Quit) => true,
            Some(action) => {
                self.state.apply(action, now);
                false
            }
            None => false,
        }
    }

    /// Wheel scrolling goes through the deferred frame path.
    ///
    /// Returns whether the scroll offset moved.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let delta = match mouse.kind {
            MouseEventKind::ScrollDown => WHEEL_ROWS,
            MouseEventKind::ScrollUp => -WHEEL_ROWS,
            _ => return false,
        };
        let before = self.state.scroller().scroll_offset();
        self.state.scroll_by(delta);
        self.state.scroller().scroll_offset() != before
    }

    /// Match the scroller viewport to the list area of the current terminal size.
    fn sync_viewport(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let detail = self.state.expanded().is_some();
        let areas = layout::split(Rect::new(0, 0, size.width, size.height), detail);
        self.state.set_viewport_height(usize::from(areas.list.height));
        Ok(())
    }

    /// Render the current frame
    ///
    /// The viewport is re-synced first; opening or closing the detail pane
    /// changes the list height.
    fn draw(&mut self) -> Result<(), TuiError> {
        self.sync_viewport()?;
        let live = self.input_source.is_live();
        let state = &self.state;
        self.terminal.draw(|frame| {
            layout::render_layout(frame, state, live);
        })?;
        Ok(())
    }

    /// Stop rendering and release every materialized node.
    fn shutdown(&mut self) {
        self.state.shutdown();
    }
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Sends panic messages to the log instead of stderr while installed.
///
/// Getter and renderer panics are caught and turned into sentinels or
/// placeholders, but the default hook would still print them over the
/// alternate screen. Dropping the guard puts the previous hook back.
struct QuietPanics {
    previous: Option<PanicHook>,
}

impl QuietPanics {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            error!(panic = %info, "panic while the viewer is running");
        }));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        // set_hook panics when called during unwinding
        if std::thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

/// Initialize and run the TUI application with an input source
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source(
    input_source: InputSource,
    config: &ResolvedConfig,
    colors: ColorConfig,
) -> Result<(), TuiError> {
    let mut app = match TuiApp::new(input_source, config, colors) {
        Ok(app) => app,
        Err(err) => {
            restore_terminal()?;
            return Err(err);
        }
    };

    let quiet = QuietPanics::install();

    // Run the app and ensure cleanup happens even on error
    let result = app.run();
    app.shutdown();
    info!(
        entries = app.state.store().count(),
        rejected = app.state.rejected_count(),
        "viewer closed"
    );

    // Always restore terminal state
    drop(quiet);
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogLevel;
    use crate::source::FileSource;
    use ratatui::backend::TestBackend;
    use serial_test::serial;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn wire_line(id: &str, level: &str, text: &str) -> String {
        format!(
            r#"{{"type":"log","payload":{{"id":"{id}","level":"{level}","timestamp":1700000000000,"sourceId":"tab-1","sourceLocation":"http://localhost/<app>","args":[{{"type":"string","value":"{text}"}}]}}}}"#
        )
    }

    fn temp_file(name: &str, lines: &[String]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "satcon_view_{}_{name}.jsonl",
            std::process::id()
        ));
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn config() -> ResolvedConfig {
        ResolvedConfig {
            item_height: 3,
            ..ResolvedConfig::default()
        }
    }

    // Helper to create test TuiApp over a recorded file
    fn create_test_app(name: &str, lines: &[String]) -> TuiApp<TestBackend> {
        let path = temp_file(name, lines);
        let source = InputSource::File(FileSource::new(&path).unwrap());
        let _ = std::fs::remove_file(&path);

        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        TuiApp::with_terminal(terminal, source, &config(), ColorConfig::disabled()).unwrap()
    }

    fn screen(app: &mut TuiApp<TestBackend>) -> Vec<String> {
        app.draw().unwrap();
        let buffer = app.terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn row_of(screen: &[String], needle: &str) -> Option<usize> {
        screen.iter().position(|row| row.contains(needle))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    #[serial]
    fn quiet_panics_swallows_output_and_restores_previous_hook() {
        const MARKER: &str = "quiet panic marker";
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<&str>() == Some(&MARKER) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        {
            let _quiet = QuietPanics::install();
            let _ = panic::catch_unwind(|| std::panic::panic_any(MARKER));
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }

        let _ = panic::catch_unwind(|| std::panic::panic_any(MARKER));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        drop(panic::take_hook());
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn empty_source_shows_waiting_message() {
        let mut app = create_test_app("empty", &[]);
        let rows = screen(&mut app);
        assert!(row_of(&rows, "Waiting for messages...").is_some());
        assert!(rows[1].contains("Filters: none"));
    }

    #[test]
    fn viewport_matches_list_area() {
        let app = create_test_app("viewport", &[]);
        assert_eq!(app.state().scroller().viewport_extent(), 21);
    }

    #[test]
    fn entries_render_newest_first_with_sanitized_location() {
        let mut app = create_test_app(
            "order",
            &[
                wire_line("a", "log", "first message"),
                wire_line("b", "error", "second message"),
            ],
        );
        let rows = screen(&mut app);

        let first = row_of(&rows, "first message").expect("first rendered");
        let second = row_of(&rows, "second message").expect("second rendered");
        assert!(second < first, "newest entry is drawn on top");
        assert_eq!(first - second, 3, "one slot per entry");
        assert!(row_of(&rows, "http://localhost/app").is_some());
        assert!(rows[0].contains("showing 2/2"));
    }

    #[test]
    fn rejected_lines_are_counted_in_status() {
        let mut app = create_test_app(
            "rejected",
            &[wire_line("a", "log", "fine"), "{broken".to_string()],
        );
        let rows = screen(&mut app);
        assert!(rows[0].contains("rejected 1"));
        assert_eq!(app.state().store().count(), 1);
    }

    #[test]
    fn quit_keys_return_true() {
        let mut app = create_test_app("quit", &[]);
        let now = Instant::now();
        assert!(app.handle_key(key(KeyCode::Char('q')), now));
        assert!(app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now
        ));
        assert!(!app.handle_key(key(KeyCode::Char('z')), now));
    }

    #[test]
    fn typing_q_in_search_does_not_quit() {
        let mut app = create_test_app("search_q", &[]);
        let now = Instant::now();
        assert!(!app.handle_key(key(KeyCode::Char('/')), now));
        assert!(!app.handle_key(key(KeyCode::Char('q')), now));
        assert_eq!(app.state().search.text(), "q");
    }

    #[test]
    fn search_keys_filter_entries_on_enter() {
        let mut app = create_test_app(
            "search",
            &[
                wire_line("a", "log", "Apple pie"),
                wire_line("d", "log", "Dog food"),
            ],
        );
        let now = Instant::now();
        for code in [KeyCode::Char('/'), KeyCode::Char('d'), KeyCode::Char('o')] {
            app.handle_key(key(code), now);
        }
        assert!(screen(&mut app)[1].contains("Search: do"));

        app.handle_key(key(KeyCode::Enter), now);
        let rows = screen(&mut app);
        assert!(rows[1].contains("Filters: search \"do\""));
        assert!(row_of(&rows, "Dog food").is_some());
        assert!(row_of(&rows, "Apple pie").is_none());
    }

    #[test]
    fn level_key_toggles_level_filter() {
        let mut app = create_test_app(
            "levels",
            &[
                wire_line("a", "log", "chatter"),
                wire_line("b", "error", "failure"),
            ],
        );
        app.handle_key(key(KeyCode::Char('3')), Instant::now());

        assert!(app.state().predicate().levels.contains(&LogLevel::Error));
        let rows = screen(&mut app);
        assert!(row_of(&rows, "failure").is_some());
        assert!(row_of(&rows, "chatter").is_none());
        assert!(row_of(&rows, "No entries match").is_none());
    }

    #[test]
    fn clear_logs_key_empties_the_view() {
        let mut app = create_test_app("clear", &[wire_line("a", "warn", "careful")]);
        app.handle_key(key(KeyCode::Char('c')), Instant::now());
        let rows = screen(&mut app);
        assert!(row_of(&rows, "Waiting for messages...").is_some());
        assert_eq!(app.state().counts().total(), 0);
    }

    #[test]
    fn expand_key_opens_detail_pane_and_shrinks_list() {
        let object_line = r#"{"type":"log","payload":{"id":"o","level":"log","timestamp":1700000000000,"sourceId":"tab-1","sourceLocation":"http://localhost/","args":[{"type":"object","value":{"a":{"type":"number","value":1},"b":{"type":"number","value":2},"c":{"type":"number","value":3}},"preview":"Object {a, b, c}"}]}}"#;
        let mut app = create_test_app("expand", &[object_line.to_string()]);
        let rows = screen(&mut app);
        assert!(row_of(&rows, "e to expand").is_some());
        assert!(row_of(&rows, "  c: 3").is_none(), "slot cuts the object");

        app.handle_key(key(KeyCode::Char('e')), Instant::now());
        let rows = screen(&mut app);
        assert_eq!(app.state().scroller().viewport_extent(), 11);
        let title = row_of(&rows, "Entry (e to collapse)").expect("detail pane drawn");
        let last = row_of(&rows, "  c: 3").expect("detail shows every line");
        assert!(last > title);

        app.handle_key(key(KeyCode::Char('e')), Instant::now());
        let rows = screen(&mut app);
        assert!(row_of(&rows, "Entry (e to collapse)").is_none());
        assert_eq!(app.state().scroller().viewport_extent(), 21);
    }

    #[test]
    fn mouse_wheel_scroll_applies_on_next_frame() {
        let lines: Vec<String> = (0..30)
            .map(|i| wire_line(&format!("e{i}"), "log", &format!("message {i}")))
            .collect();
        let mut app = create_test_app("wheel", &lines);

        assert!(app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }));
        assert!(app.state().scroller().has_pending_frame());

        assert!(app.frame(Instant::now()));
        assert_eq!(app.state().scroller().scroll_offset(), 3);
        assert!(!app.state().auto_scroll());
    }

    #[test]
    fn shutdown_destroys_scroller() {
        let mut app = create_test_app("shutdown", &[wire_line("a", "log", "x")]);
        app.shutdown();
        assert!(app.state().scroller().is_destroyed());
    }
}
