//! Menu widgets laid out in viewport pixels.
//!
//! Text is measured with a fixed metric (every glyph half as wide as the font
//! is tall) so the layout does not depend on the renderer's fonts.

use serde::Serialize;

use crate::simulation::{Rect, Rgb, ScreenPos, Viewport};

pub const DEFAULT_FONT_SIZE: f32 = 60.0;
pub const BUTTON_COOLDOWN: u32 = 50;

pub fn char_width(font_size: f32) -> f32 {
    font_size * 0.5
}

pub fn line_height(font_size: f32) -> f32 {
    font_size
}

/// Pixel size of `text` laid out at `font_size`.
pub fn measure(text: &str, font_size: f32) -> ScreenPos {
    let widest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
    let lines = text.lines().count().max(1);
    ScreenPos::new(
        widest as f32 * char_width(font_size),
        lines as f32 * line_height(font_size),
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub text: String,
    /// Top-left corner.
    pub pos: ScreenPos,
    pub size: ScreenPos,
    pub font_size: f32,
    pub color: Rgb,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let size = measure(&text, DEFAULT_FONT_SIZE);
        Self {
            text,
            pos: ScreenPos::default(),
            size,
            font_size: DEFAULT_FONT_SIZE,
            color: Rgb(200, 200, 200),
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self.size = measure(&self.text, font_size);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.size = measure(&self.text, self.font_size);
    }

    /// Centres the label in the viewport.
    pub fn center(mut self, viewport: &Viewport) -> Self {
        self.pos = ScreenPos::new(
            (viewport.width - self.size.x) / 2.0,
            (viewport.height - self.size.y) / 2.0,
        );
        self
    }

    /// Centres horizontally and puts the top edge at `percent` of the height.
    pub fn percent_y(mut self, percent: f32, viewport: &Viewport) -> Self {
        self.pos = ScreenPos::new(
            (viewport.width - self.size.x) / 2.0,
            viewport.height * percent / 100.0,
        );
        self
    }

    /// Places the label's centre at the given percentages of the viewport.
    pub fn percent(mut self, x_percent: f32, y_percent: f32, viewport: &Viewport) -> Self {
        self.pos = ScreenPos::new(
            viewport.width * x_percent / 100.0 - self.size.x / 2.0,
            viewport.height * y_percent / 100.0 - self.size.y / 2.0,
        );
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub label: Label,
    pub cooldown: u32,
    /// Ticks left before the button can fire again.
    remaining: u32,
}

impl Button {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            cooldown: BUTTON_COOLDOWN,
            remaining: 0,
        }
    }

    /// Polled once per tick. Fires while the primary button is held over the
    /// label, at most once per cooldown window.
    pub fn clicked(&mut self, primary_held: bool, pointer: ScreenPos) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if primary_held && self.label.bounds().contains_point(pointer) && self.remaining == 0 {
            self.remaining = self.cooldown;
            return true;
        }
        false
    }

    pub fn is_cooling_down(&self) -> bool {
        self.remaining > 0
    }
}

/// Multi-line text that can be scrolled vertically.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub label: Label,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            label: Label::new(text).with_font_size(font_size),
        }
    }

    /// Moves the block by `steps * scale` pixels, keeping its top edge within
    /// `[-height, height - scale]`. A step that would leave the range is
    /// dropped.
    pub fn scroll(&mut self, steps: i32, scale: f32) {
        let height = self.label.size.y;
        let y = self.label.pos.y;
        let moved = y + steps as f32 * scale;
        if (steps < 0 && y > -height) || (steps > 0 && y < height - scale) {
            self.label.pos.y = moved;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Label(Label),
    Button(Button),
    Text(TextBlock),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_uses_the_widest_line() {
        let size = measure("ab\nabcd\n", 10.0);
        assert_eq!(size, ScreenPos::new(20.0, 20.0));
        assert_eq!(measure("", 10.0), ScreenPos::new(0.0, 10.0));
    }

    #[test]
    fn button_fires_once_per_cooldown() {
        let viewport = Viewport::default();
        let mut button = Button::new(Label::new("Play").percent_y(35.0, &viewport));
        let inside = ScreenPos::new(viewport.width / 2.0, viewport.height * 0.35 + 5.0);

        assert!(!button.clicked(false, inside));
        assert!(button.clicked(true, inside));
        let mut fired = 0;
        for _ in 0..BUTTON_COOLDOWN - 1 {
            if button.clicked(true, inside) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert!(button.clicked(true, inside));
    }

    #[test]
    fn button_ignores_pointer_outside() {
        let mut button = Button::new(Label::new("Exit"));
        assert!(!button.clicked(true, ScreenPos::new(-10.0, -10.0)));
    }

    #[test]
    fn text_block_scroll_stays_in_range() {
        let mut block = TextBlock::new("one\ntwo\nthree\nfour", 40.0);
        let height = block.label.size.y;
        for _ in 0..20 {
            block.scroll(-1, 40.0);
        }
        assert!(block.label.pos.y <= -height);
        assert!(block.label.pos.y > -height - 40.0);
        for _ in 0..40 {
            block.scroll(1, 40.0);
        }
        assert!(block.label.pos.y >= height - 40.0);
        assert!(block.label.pos.y < height);
    }
}
