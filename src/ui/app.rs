//! Step-through viewer: application state and event loop

use crate::interpreter::engine::{Interpreter, StepOutcome};
use crate::interpreter::errors::RuntimeError;
use crate::parser::lines::normalize_newlines;
use crate::snapshot::{Snapshot, SnapshotManager};
use crate::ui::panes::{self, RunState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(500);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Trace,
    Registers,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> trace -> registers)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Registers,
            FocusedPane::Registers => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Registers,
            FocusedPane::Trace => FocusedPane::Source,
            FocusedPane::Registers => FocusedPane::Trace,
        }
    }
}

/// The main application state
///
/// The machine is executed lazily: stepping past the end of the recorded
/// history performs one more statement, so programs that never halt can
/// still be explored.
pub struct App {
    /// The interpreter instance
    interpreter: Interpreter,

    /// Program text with newlines normalized, so line numbers match the loader
    source_code: String,

    /// One snapshot per statement reached, in execution order
    history: SnapshotManager,

    /// Index of the displayed snapshot in `history`
    position: usize,

    /// Runtime error that stopped the machine
    fault: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub registers_scroll: usize,
    pub trace_scroll: usize,

    /// Visual row the current line is pinned to (None = center on first render)
    pub target_line_row: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app positioned at the program's entry label
    pub fn new(interpreter: Interpreter, source_code: &str, history_limit: usize) -> Self {
        let now = Instant::now();
        let mut app = App {
            interpreter,
            source_code: normalize_newlines(source_code).into_owned(),
            history: SnapshotManager::new(history_limit),
            position: 0,
            fault: None,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            registers_scroll: 0,
            trace_scroll: 0,
            target_line_row: None,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
        };

        if let Err(e) = app.record_pending() {
            app.set_fault(e);
        }
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    fn run_state(&self) -> RunState {
        let at_end = self.position + 1 >= self.history.len();
        if self.fault.is_some() && at_end {
            RunState::Faulted
        } else if self.is_playing {
            RunState::Playing
        } else if self.interpreter.is_halted() && at_end {
            RunState::Halted
        } else {
            RunState::Running
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Trace (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        let state = self.run_state();
        let current = self.history.get(self.position);

        let current_line = current.map_or(0, |s| s.line);
        let branch_lines: Vec<usize> = current
            .map(|s| {
                s.statement
                    .successors()
                    .iter()
                    .filter_map(|label| self.interpreter.program().line_of(label))
                    .collect()
            })
            .unwrap_or_default();

        // After a fault the interpreter holds the last valid state, which can
        // be one statement past the final snapshot
        let registers = match current {
            Some(snapshot) if state != RunState::Faulted => &snapshot.registers,
            _ => self.interpreter.registers(),
        };
        let target = current.and_then(|s| s.statement.target());

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            &branch_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
            &mut self.target_line_row,
        );

        panes::render_trace_pane(
            frame,
            left_rows[1],
            self.history.up_to(self.position),
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        panes::render_registers_pane(
            frame,
            columns[1],
            registers,
            target,
            self.focused_pane == FocusedPane::Registers,
            &mut self.registers_scroll,
        );

        let total_steps = if self.interpreter.is_halted() || self.fault.is_some() {
            Some(self.history.len())
        } else {
            None
        };

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            total_steps,
            state,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let mut stepped = 0;
                for _ in 0..n {
                    if !self.step_forward() {
                        break;
                    }
                    stepped += 1;
                }
                if stepped > 0 {
                    self.status_message = format!("Stepped forward {} step(s)", stepped);
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Registers => {
                    self.registers_scroll = self.registers_scroll.saturating_sub(1);
                }
                FocusedPane::Trace => {
                    self.trace_scroll = self.trace_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Registers => {
                    self.registers_scroll = self.registers_scroll.saturating_add(1);
                }
                FocusedPane::Trace => {
                    self.trace_scroll = self.trace_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Backspace | KeyCode::Home => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
                self.trace_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Move one snapshot forward, executing a statement when the end of the
    /// recorded history is reached. Returns whether the position moved.
    pub fn step_forward(&mut self) -> bool {
        self.trace_scroll = usize::MAX;

        if self.position + 1 < self.history.len() {
            self.position += 1;
            self.status_message = "Stepped forward".to_string();
            return true;
        }

        if let Some(fault) = &self.fault {
            self.status_message = fault.clone();
            return false;
        }

        if self.interpreter.is_halted() {
            self.status_message = format!(
                "Machine halted after {} step(s)",
                self.interpreter.steps_executed()
            );
            return false;
        }

        let recorded = self.interpreter.step().and_then(|outcome| match outcome {
            StepOutcome::Continue => self.record_pending().map(|()| true),
            StepOutcome::Halted => Ok(false),
        });

        match recorded {
            Ok(true) => {
                self.position += 1;
                self.status_message = "Stepped forward".to_string();
                true
            }
            Ok(false) => {
                self.status_message = format!(
                    "Machine halted after {} step(s)",
                    self.interpreter.steps_executed()
                );
                false
            }
            Err(e) => {
                self.set_fault(e);
                false
            }
        }
    }

    /// Move one snapshot backward
    pub fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            self.status_message = "Already at the beginning of execution".to_string();
            return false;
        }
        self.position -= 1;
        self.status_message = "Stepped backward".to_string();
        self.trace_scroll = usize::MAX;
        true
    }

    /// Record the statement the interpreter is about to perform
    fn record_pending(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot::from(&self.interpreter.peek()?);
        self.history.push(snapshot)
    }

    fn set_fault(&mut self, error: RuntimeError) {
        log::warn!("execution stopped: {}", error);
        self.is_playing = false;
        self.status_message = format!("Error: {}", error);
        self.fault = Some(self.status_message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RegisterBank;
    use crate::parser::parse::Parser;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App {
        let program = Parser::new(source).parse_program().unwrap();
        App::new(
            Interpreter::new(program, RegisterBank::new()),
            source,
            1024 * 1024,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_starts_at_entry() {
        let app = app("# header\nA INC 0 B\nB END");
        assert_eq!(app.history.len(), 1);
        let current = app.history.get(app.position).unwrap();
        assert_eq!(current.label, "A");
        assert_eq!(current.line, 2);
    }

    #[test]
    fn test_step_forward_and_back() {
        let mut app = app("A INC 0 B\nB END");

        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 1);
        assert_eq!(app.history.get(app.position).unwrap().registers.get(0), 1);

        // END performed, nothing further to show
        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 1);
        assert!(app.status_message.starts_with("Machine halted"));
        assert_eq!(app.run_state(), RunState::Halted);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 0);
        assert_eq!(app.history.get(app.position).unwrap().registers.get(0), 0);

        // Replays from history without executing again
        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 1);
        assert_eq!(app.history.len(), 2);
    }

    #[test]
    fn test_number_keys_step_non_terminating_program() {
        let mut app = app("A INC 0 B\nB DEB 0 A END\nEND END");
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.position, 9);
        assert_eq!(app.status_message, "Stepped forward 9 step(s)");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.position, 0);
        assert_eq!(app.run_state(), RunState::Running);
    }

    #[test]
    fn test_unknown_label_faults() {
        let mut app = app("A INC 0 missing");
        assert!(!app.step_forward());
        assert!(app.fault().unwrap().contains("missing"));
        assert_eq!(app.run_state(), RunState::Faulted);
        assert_eq!(app.interpreter.registers().get(0), 1);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app("A END");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Trace);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Registers);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_smoke() {
        let mut app = app("# adder\r\nA DEB 1 B C\r\nB INC 0 A\r\nC END\r\n");
        press(&mut app, KeyCode::Right);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let mut tiny = Terminal::new(TestBackend::new(10, 3)).unwrap();
        tiny.draw(|f| app.render(f)).unwrap();
    }
}
