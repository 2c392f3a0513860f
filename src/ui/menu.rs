use ratatui::{prelude::*, widgets::Widget as RenderWidget};

use root_wars::simulation::{Label, Widget, add_brightness};

use crate::ui::{PixelMap, to_color};

pub struct WidgetLayer<'a> {
    pub widgets: &'a [Widget],
    pub map: PixelMap,
}

impl<'a> RenderWidget for WidgetLayer<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for widget in self.widgets {
            match widget {
                Widget::Label(label) => {
                    let style = Style::default().fg(to_color(label.color)).bold();
                    draw_label(label, self.map, area, buf, style);
                }
                Widget::Button(button) => {
                    // A button that just fired glows until its cooldown ends.
                    let color = if button.is_cooling_down() {
                        add_brightness(button.label.color, 40)
                    } else {
                        button.label.color
                    };
                    let style = Style::default().fg(to_color(color)).bold().reversed();
                    draw_label(&button.label, self.map, area, buf, style);
                }
                Widget::Text(block) => {
                    let style = Style::default().fg(to_color(block.label.color));
                    draw_label(&block.label, self.map, area, buf, style);
                }
            }
        }
    }
}

/// Draws each line at the pixel row it occupies; lines scrolled off the
/// play area are skipped.
fn draw_label(label: &Label, map: PixelMap, area: Rect, buf: &mut Buffer, style: Style) {
    let line_height = label.size.y / label.text.lines().count().max(1) as f32;
    for (index, line) in label.text.lines().enumerate() {
        let mut pos = label.pos;
        pos.y += index as f32 * line_height;
        let Some((x, y)) = map.to_cell(pos) else {
            continue;
        };
        if y >= area.y + area.height || line.is_empty() {
            continue;
        }
        let room = (area.x + area.width).saturating_sub(x) as usize;
        let text: String = line.chars().take(room).collect();
        buf.set_string(x, y, text, style);
    }
}
