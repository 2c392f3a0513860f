use ratatui::{prelude::*, widgets::Widget};

use root_wars::simulation::{
    Highlight, MatchSnapshot, Owner, Rgb, ScreenPos, add_brightness, sub_brightness,
};

use crate::ui::{PixelMap, to_color};

pub struct BoardWidget<'a> {
    pub snapshot: &'a MatchSnapshot,
    pub map: PixelMap,
}

impl<'a> Widget for BoardWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Each cell paints its hit box, so what you see is what you can click.
        let footprint = self.snapshot.hit_box;
        let (cols, rows) = self.map.span(footprint, footprint);
        for cell in &self.snapshot.cells {
            let top_left = ScreenPos::new(
                cell.screen_pos.x - footprint / 2.0,
                cell.screen_pos.y - footprint / 2.0,
            );
            let Some((x0, y0)) = first_visible(self.map, top_left, footprint) else {
                continue;
            };

            // Only the top ring of the stack would be visible.
            let fill = cell
                .energy_rings()
                .last()
                .map(|ring| ring.fill)
                .unwrap_or(cell.color);
            let edge = match cell.highlight {
                Highlight::None if cell.owner == Owner::Neutral => Rgb(50, 50, 50),
                Highlight::None => sub_brightness(fill, 60),
                _ => add_brightness(cell.color, 40),
            };

            for dy in 0..rows {
                for dx in 0..cols {
                    let (x, y) = (x0 + dx, y0 + dy);
                    if x >= area.x + area.width || y >= area.y + area.height {
                        continue;
                    }
                    let border = dx == 0 || dy == 0 || dx + 1 == cols || dy + 1 == rows;
                    let color = if border { edge } else { fill };
                    buf.set_string(x, y, " ", Style::default().bg(to_color(color)));
                }
            }

            let label = if cell.is_origin {
                format!("◆{}", cell.energy)
            } else if cell.energy > 0 {
                cell.energy.to_string()
            } else {
                String::new()
            };
            let label_x = x0 + cols.saturating_sub(label.chars().count() as u16) / 2;
            let label_y = y0 + rows / 2;
            if !label.is_empty() && label_y < area.y + area.height && label_x < area.x + area.width {
                buf.set_string(
                    label_x,
                    label_y,
                    &label,
                    Style::default()
                        .fg(to_color(add_brightness(fill, 120)))
                        .bg(to_color(fill))
                        .bold(),
                );
            }
        }
    }
}

/// Terminal position of `pos`, or `None` when the `side` square starting
/// there is entirely off the left or top edge.
fn first_visible(map: PixelMap, pos: ScreenPos, side: f32) -> Option<(u16, u16)> {
    let clamped = ScreenPos::new(pos.x.max(0.0), pos.y.max(0.0));
    if pos.x + side < 0.0 || pos.y + side < 0.0 {
        return None;
    }
    map.to_cell(clamped)
}
