use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{Instant, interval, interval_at};

use crate::board::{Board, BorderPolicy, Rectangle};
use crate::game::{Action, Direction, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    board: Board,
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
    /// Level file to reload on restart; None plays the default level.
    level_path: Option<PathBuf>,
    initial_speed: u32,
}

impl HumanMode {
    /// Builds a board from the given geometry and level, and starts a
    /// game on it. Fails when the level file cannot be loaded.
    pub fn new(
        width: usize,
        height: usize,
        level_path: Option<PathBuf>,
        speed: u32,
        policy: BorderPolicy,
    ) -> Result<Self> {
        let mut board = Board::new(Rectangle::new(0, 0, width, height), policy);
        match &level_path {
            Some(path) => board
                .load_file(path)
                .with_context(|| format!("Failed to load level {:?}", path))?,
            None => board.load_default_level(),
        }
        board.set_speed(speed);

        let mut engine = GameEngine::new();
        let state = engine.start(&mut board)?;

        Ok(Self {
            board,
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
            level_path,
            initial_speed: speed,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The board's timeout paces the game; eating shortens it.
        let mut tick_timeout = self.board.timeout();
        let mut tick_timer = interval(tick_timeout);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.state.is_alive {
                        self.update_game();
                    }
                    // Re-arm the timer when the speed changed the timeout.
                    // interval_at skips the immediate first tick a fresh
                    // interval would fire.
                    if self.board.timeout() != tick_timeout {
                        tick_timeout = self.board.timeout();
                        tick_timer = interval_at(Instant::now() + tick_timeout, tick_timeout);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.board, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);

            match action {
                KeyAction::GameAction(Action::Move(dir)) => {
                    self.pending_direction = Some(dir);
                }
                KeyAction::GameAction(Action::Continue) => {
                    // No action needed
                }
                KeyAction::ToggleBorders => {
                    let policy = match self.board.border_policy() {
                        BorderPolicy::Solid => BorderPolicy::Wrap,
                        BorderPolicy::Wrap => BorderPolicy::Solid,
                    };
                    self.board.set_border_policy(policy);
                }
                KeyAction::Restart => {
                    self.reset_game()?;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        let action = self
            .pending_direction
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        self.pending_direction = None;

        let result = self.engine.step(&mut self.board, &mut self.state, action);

        // Track game over
        if result.terminated && !self.state.is_alive {
            self.metrics
                .on_game_over(self.state.score, self.board.speed());
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        match &self.level_path {
            Some(path) => self
                .board
                .load_file(path)
                .with_context(|| format!("Failed to reload level {:?}", path))?,
            None => self.board.load_default_level(),
        }
        self.board.set_speed(self.initial_speed);

        self.state = self.engine.start(&mut self.board)?;
        self.metrics.on_game_start();
        self.pending_direction = None;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(12, 9, None, 3, BorderPolicy::Wrap).unwrap();
        assert!(mode.state.is_alive);
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.board.speed(), 3);
        assert_eq!(mode.board.level_name(), "default");
    }

    #[test]
    fn test_missing_level_file_fails() {
        let result = HumanMode::new(
            12,
            9,
            Some(PathBuf::from("/nonexistent/level.json")),
            1,
            BorderPolicy::Wrap,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_game_reset() {
        let mut mode = HumanMode::new(12, 9, None, 2, BorderPolicy::Wrap).unwrap();
        mode.state.score = 10;
        mode.state.is_alive = false;
        mode.board.set_speed(9);

        mode.reset_game().unwrap();

        assert_eq!(mode.state.score, 0);
        assert!(mode.state.is_alive);
        assert_eq!(mode.board.speed(), 2);
    }
}
