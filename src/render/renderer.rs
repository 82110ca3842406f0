use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::board::{Board, TileKind};
use crate::game::GameState;
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        board: &Board,
        state: &GameState,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(chunks[0], board, state, metrics);
        frame.render_widget(stats, chunks[0]);

        // The board's screen position offsets the grid inside the game area
        let game_area = self.board_area(chunks[1], board);

        // Render game grid or game over screen
        if state.is_alive {
            let grid = self.render_grid(game_area, board);
            frame.render_widget(grid, game_area);
        } else {
            let game_over = self.render_game_over(game_area, state);
            frame.render_widget(game_over, game_area);
        }

        // Render footer with controls
        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn board_area(&self, area: Rect, board: &Board) -> Rect {
        let offset_x = board.x().max(0) as u16;
        let offset_y = board.y().max(0) as u16;
        Rect {
            x: area.x.saturating_add(offset_x).min(area.right()),
            y: area.y.saturating_add(offset_y).min(area.bottom()),
            width: area.width.saturating_sub(offset_x),
            height: area.height.saturating_sub(offset_y),
        }
    }

    fn render_grid(&self, _area: Rect, board: &Board) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..board.height() as i32 {
            let mut spans = Vec::new();

            for x in 0..board.width() as i32 {
                let cell = match board.at(x, y).kind() {
                    TileKind::Wall => {
                        Span::styled("█ ", Style::default().fg(Color::White))
                    }
                    TileKind::SnakeHead => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    TileKind::SnakeBody => {
                        Span::styled("□ ", Style::default().fg(Color::Green))
                    }
                    TileKind::Food => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    TileKind::Empty => {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    }
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = format!(" {} ", board.level_name());
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        board: &Board,
        state: &GameState,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let borders = if board.has_borders() { "solid" } else { "wrap" };
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(board.speed().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Borders: ", Style::default().fg(Color::Yellow)),
            Span::styled(borders.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, _area: Rect, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("B", Style::default().fg(Color::Yellow)),
            Span::raw(" to toggle borders | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
