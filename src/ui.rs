mod board;
mod menu;

use board::BoardWidget;
use menu::WidgetLayer;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::Paragraph,
};

use root_wars::simulation::{
    MatchOutcome, MatchSnapshot, Mode, Rgb, ScreenPos, SessionSnapshot, Viewport,
};

/// Maps between terminal cells of the play area and viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelMap {
    pub area: Rect,
    pub viewport: Viewport,
}

impl PixelMap {
    fn scale(&self) -> (f32, f32) {
        let cols = self.area.width.saturating_sub(1).max(1) as f32;
        let rows = self.area.height.saturating_sub(1).max(1) as f32;
        (self.viewport.width / cols, self.viewport.height / rows)
    }

    /// Pixel under a terminal cell. The outermost columns and rows land
    /// exactly on the viewport edges so edge panning works.
    pub fn to_pixel(&self, column: u16, row: u16) -> ScreenPos {
        let (sx, sy) = self.scale();
        let col = column.saturating_sub(self.area.x).min(self.area.width.saturating_sub(1));
        let row = row.saturating_sub(self.area.y).min(self.area.height.saturating_sub(1));
        ScreenPos::new(col as f32 * sx, row as f32 * sy)
    }

    pub fn to_cell(&self, pos: ScreenPos) -> Option<(u16, u16)> {
        let (sx, sy) = self.scale();
        let col = (pos.x / sx).round();
        let row = (pos.y / sy).round();
        if col < 0.0 || row < 0.0 || col >= self.area.width as f32 || row >= self.area.height as f32 {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Terminal columns and rows covered by `width` x `height` pixels.
    pub fn span(&self, width: f32, height: f32) -> (u16, u16) {
        let (sx, sy) = self.scale();
        (
            (width / sx).round().max(1.0) as u16,
            (height / sy).round().max(1.0) as u16,
        )
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Renders one frame and returns the pixel mapping of the play area, used to
/// translate mouse positions on the next input poll.
pub fn render(frame: &mut Frame, snapshot: &SessionSnapshot, viewport: Viewport, fps: Option<f64>) -> PixelMap {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.size());
    let map = PixelMap {
        area: layout[0],
        viewport,
    };

    if let (Mode::Game, Some(game)) = (snapshot.mode, snapshot.game.as_ref()) {
        frame.render_widget(BoardWidget { snapshot: game, map }, layout[0]);
    }
    frame.render_widget(
        WidgetLayer {
            widgets: &snapshot.widgets,
            map,
        },
        layout[0],
    );
    frame.render_widget(status_line(snapshot, fps), layout[1]);
    map
}

fn status_line<'a>(snapshot: &'a SessionSnapshot, fps: Option<f64>) -> Paragraph<'a> {
    let mut spans = vec![Span::styled(
        format!(" {} ", snapshot.mode.label()),
        Style::default().fg(Color::Black).bg(Color::Gray).bold(),
    )];
    if let Some(game) = snapshot.game.as_ref() {
        spans.extend(match_spans(game));
    }
    if let Some(fps) = fps.filter(|_| snapshot.show_fps) {
        spans.push(Span::styled(
            format!("  {:.0} fps", fps),
            Style::default().fg(Color::Green),
        ));
    }
    spans.push(Span::styled(
        "  Esc menu · q quit",
        Style::default().fg(Color::DarkGray),
    ));
    Paragraph::new(Line::from(spans))
}

fn match_spans(game: &MatchSnapshot) -> Vec<Span<'_>> {
    let outcome = match game.outcome {
        MatchOutcome::InProgress => Span::styled(" playing", Style::default().fg(Color::Gray)),
        MatchOutcome::Victory => Span::styled(" victory", Style::default().fg(Color::Green).bold()),
        MatchOutcome::Defeat => Span::styled(" defeat", Style::default().fg(Color::Red).bold()),
    };
    let mut spans = vec![
        Span::raw(format!("  tick {}", game.tick)),
        Span::styled(
            format!("  player {}", game.player_cells),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(
            format!("  bot {}", game.enemy_cells),
            Style::default().fg(Color::Red),
        ),
        outcome,
    ];
    if let Some(event) = game.events.last() {
        spans.push(Span::styled(
            format!("  | {}", event.headline()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}
