use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, Position, Snapshot};
use crate::metrics::GameMetrics;

/// Snake colour climbs through these as the score grows
const SCORE_COLORS: [(u32, Color); 4] = [
    (300, Color::Magenta),
    (200, Color::Yellow),
    (100, Color::Blue),
    (50, Color::LightRed),
];

pub fn snake_color(score: u32) -> Color {
    SCORE_COLORS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|&(_, color)| color)
        .unwrap_or(Color::Green)
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.is_game_over {
            frame.render_widget(self.render_game_over(snapshot), game_area);
        } else {
            frame.render_widget(self.render_grid(snapshot), game_area);
        }

        frame.render_widget(self.render_controls(snapshot), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let body = Style::default().fg(snake_color(snapshot.score));
        let mut lines = Vec::with_capacity(snapshot.board.size());

        for (row, cells) in snapshot.board.rows().enumerate() {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let pos = Position::new(row as i32, col as i32);
                    match cell {
                        Cell::Snake if pos == snapshot.head => {
                            Span::styled("■ ", body.add_modifier(Modifier::BOLD))
                        }
                        Cell::Snake => Span::styled("□ ", body),
                        Cell::Food => Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    }
                })
                .collect();

            lines.push(Line::from(spans));
        }

        let title = if !snapshot.is_started {
            " Snake - press Enter to start "
        } else if snapshot.is_paused {
            " Snake - PAUSED "
        } else {
            " Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(if snapshot.is_paused {
                        Color::Yellow
                    } else {
                        Color::White
                    }))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.snake_len.to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'static> {
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
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for a new game or ", Style::default().fg(Color::Gray)),
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

    fn render_controls(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move ("),
            Span::styled(snapshot.direction.arrow(), Style::default().fg(Color::Cyan)),
            Span::raw(") | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(if snapshot.is_paused { " resume | " } else { " pause | " }),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" new game | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameEngine, GameState, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(snapshot: &Snapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| Renderer::new().render(frame, snapshot, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_snake_color_thresholds() {
        assert_eq!(snake_color(0), Color::Green);
        assert_eq!(snake_color(49), Color::Green);
        assert_eq!(snake_color(50), Color::LightRed);
        assert_eq!(snake_color(100), Color::Blue);
        assert_eq!(snake_color(250), Color::Yellow);
        assert_eq!(snake_color(300), Color::Magenta);
        assert_eq!(snake_color(10_000), Color::Magenta);
    }

    #[test]
    fn test_render_waiting_board() {
        let engine = GameEngine::with_seed(GameConfig::default(), 5);
        let screen = draw(&engine.snapshot());

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("press Enter to start"));
        assert!(screen.contains('■'));
        assert!(screen.contains('O'));
    }

    #[test]
    fn test_render_paused_title() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5);
        engine.start();
        engine.toggle_pause();

        let screen = draw(&engine.snapshot());
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("resume"));
    }

    #[test]
    fn test_render_game_over() {
        let snake = Snake::from_segments(vec![Position::new(2, 2), Position::new(2, 1)]).unwrap();
        let mut engine = GameEngine::from_state(
            GameConfig::default(),
            GameState::new(snake, Direction::Left, Position::new(2, 1)),
            5,
        );
        engine.tick();

        let screen = draw(&engine.snapshot());
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final Score: 0"));
    }
}
