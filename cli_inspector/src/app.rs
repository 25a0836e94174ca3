use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use gym_core::{PageController, WatchConfig};
use gym_proto::GymsResponse;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::trace;

use crate::ui::{draw_ui, UiState};

/// Leaves raw mode when dropped, including on early `?` returns.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

pub struct InspectorApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    _raw_mode: RawModeGuard,
    ui_state: UiState,
    page: PageController,
    receiver: UnboundedReceiver<GymsResponse>,
    log_receiver: Receiver<String>,
}

impl InspectorApp {
    pub fn new(
        receiver: UnboundedReceiver<GymsResponse>,
        log_receiver: Receiver<String>,
        config: &WatchConfig,
    ) -> Result<Self> {
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        let raw_mode = RawModeGuard::enable()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            _raw_mode: raw_mode,
            ui_state: UiState::new(&config.map),
            page: PageController::new(config),
            receiver,
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let mut last_draw: Option<Instant> = None;

        loop {
            while let Ok(response) = self.receiver.try_recv() {
                let report = self.page.apply(&response, Instant::now());
                trace!(
                    target: "gym_watch::inspector",
                    created = report.markers.created,
                    updated = report.markers.updated,
                    events = report.events.len(),
                    skipped_unknown = report.skipped_unknown,
                    "page.applied"
                );
            }

            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            let now = Instant::now();
            self.page.tick(now);

            if last_draw.map_or(true, |at| at.elapsed() >= Duration::from_millis(100)) {
                self.terminal
                    .draw(|frame| draw_ui(frame, &self.page, &self.ui_state, now))?;
                last_draw = Some(Instant::now());
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left => self.ui_state.viewport.pan(-1, 0),
                        KeyCode::Right => self.ui_state.viewport.pan(1, 0),
                        KeyCode::Up => self.ui_state.viewport.pan(0, 1),
                        KeyCode::Down => self.ui_state.viewport.pan(0, -1),
                        KeyCode::Char('=') | KeyCode::Char('+') => {
                            self.ui_state.viewport.zoom_in()
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            self.ui_state.viewport.zoom_out()
                        }
                        KeyCode::Char('c') => self.ui_state.recenter(),
                        KeyCode::Tab => self.ui_state.select_step(self.page.markers(), 1),
                        KeyCode::BackTab => self.ui_state.select_step(self.page.markers(), -1),
                        _ => {}
                    }
                }
            }
        }

        self.terminal.show_cursor()?;
        Ok(())
    }
}
