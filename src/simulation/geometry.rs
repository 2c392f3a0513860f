//! Small math helpers shared by the grid, hit testing and rendering.

use serde::{Deserialize, Serialize};

/// A point (or offset) in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: ScreenPos) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    pub fn minus(self, by: ScreenPos) -> Self {
        Self::new(self.x - by.x, self.y - by.y)
    }
}

/// 24-bit color. Rendering only; ownership never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        rgb_to_hex(self.0, self.1, self.2)
    }
}

pub fn deg_to_rad(degree: f32) -> f32 {
    degree * std::f32::consts::PI / 180.0
}

pub fn rad_to_deg(radian: f32) -> f32 {
    radian * 180.0 / std::f32::consts::PI
}

pub fn distance(a: ScreenPos, b: ScreenPos) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Heading in degrees that `from` must turn to in order to face `to`.
///
/// Returns `None` when both points share a y coordinate: the slope is
/// undefined there and callers apply no rotation.
pub fn rotate_to_cord(from: ScreenPos, to: ScreenPos) -> Option<f32> {
    let dx = from.x - to.x;
    let dy = from.y - to.y;
    if dy == 0.0 {
        return None;
    }
    let angle = rad_to_deg((dx / dy).atan());
    if from.y > to.y {
        Some(angle + 180.0)
    } else {
        Some(angle)
    }
}

/// Inclusive overlap test between rectangle A `(x1, w1, y1, h1)` and
/// rectangle B `(x2, w2, y2, h2)`. A 1×1 rectangle stands in for a point.
///
/// Argument order follows the call sites: x-range pairs first, then
/// y-range pairs.
#[allow(clippy::too_many_arguments)]
pub fn touched(x1: f32, w1: f32, x2: f32, w2: f32, y1: f32, h1: f32, y2: f32, h2: f32) -> bool {
    (x1 <= x2 && x2 <= x1 + w1 && y1 <= y2 && y2 <= y1 + h1)
        || (x1 <= x2 + w2 && x1 + w1 >= x2 && y1 <= y2 + h2 && y1 + h1 >= y2)
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `side` centred on `center`.
    pub fn centered(center: ScreenPos, side: f32) -> Self {
        Self::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
    }

    pub fn touches(&self, other: &Rect) -> bool {
        touched(
            self.x,
            self.width,
            other.x,
            other.width,
            self.y,
            self.height,
            other.y,
            other.height,
        )
    }

    pub fn contains_point(&self, point: ScreenPos) -> bool {
        self.touches(&Rect::new(point.x, point.y, 1.0, 1.0))
    }
}

/// Brightens a color, spilling overflow of one channel into the other two.
pub fn add_brightness(color: Rgb, value: i32) -> Rgb {
    let (mut r, mut g, mut b) = (
        color.0 as i32 + value,
        color.1 as i32 + value,
        color.2 as i32 + value,
    );
    if r > 255 {
        let err = r - 255;
        g += err / 2;
        b += err / 2;
    }
    if g > 255 {
        let err = g - 255;
        r += err / 2;
        b += err / 2;
    }
    if b > 255 {
        let err = b - 255;
        g += err / 2;
        r += err / 2;
    }
    Rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b))
}

pub fn sub_brightness(color: Rgb, value: i32) -> Rgb {
    Rgb(
        clamp_channel(color.0 as i32 - value),
        clamp_channel(color.1 as i32 - value),
        clamp_channel(color.2 as i32 - value),
    )
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

pub(crate) fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_touches_itself_at_origin() {
        assert!(touched(0.0, 10.0, 0.0, 10.0, 0.0, 10.0, 0.0, 10.0));
    }

    #[test]
    fn touched_is_inclusive_on_edges() {
        // Point sitting exactly on the right/bottom edge.
        assert!(touched(0.0, 10.0, 10.0, 1.0, 0.0, 10.0, 10.0, 1.0));
        // One pixel past the edge on both axes.
        assert!(!touched(0.0, 10.0, 11.5, 1.0, 0.0, 10.0, 11.5, 1.0));
        // Edge-adjacent rectangles still touch.
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.touches(&b));
    }

    #[test]
    fn point_inside_centered_square() {
        let square = Rect::centered(ScreenPos::new(100.0, 100.0), 150.0);
        assert!(square.contains_point(ScreenPos::new(100.0, 100.0)));
        assert!(square.contains_point(ScreenPos::new(175.0, 25.0)));
        assert!(!square.contains_point(ScreenPos::new(176.5, 100.0)));
    }

    #[test]
    fn degree_radian_round_trip() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((rad_to_deg(deg_to_rad(60.0)) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn distance_is_pythagorean() {
        let d = distance(ScreenPos::new(0.0, 0.0), ScreenPos::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_to_cord_reports_undefined_on_shared_row() {
        assert_eq!(
            rotate_to_cord(ScreenPos::new(0.0, 5.0), ScreenPos::new(10.0, 5.0)),
            None
        );
        let down = rotate_to_cord(ScreenPos::new(0.0, 0.0), ScreenPos::new(0.0, 10.0)).unwrap();
        assert!(down.abs() < 1e-6);
        let up = rotate_to_cord(ScreenPos::new(0.0, 10.0), ScreenPos::new(0.0, 0.0)).unwrap();
        assert!((up - 180.0).abs() < 1e-4);
    }

    #[test]
    fn brightness_spills_and_clamps() {
        assert_eq!(add_brightness(Rgb(250, 0, 0), 20), Rgb(255, 27, 27));
        assert_eq!(add_brightness(Rgb(10, 20, 30), 5), Rgb(15, 25, 35));
        assert_eq!(sub_brightness(Rgb(50, 5, 100), 10), Rgb(40, 0, 90));
    }

    #[test]
    fn hex_formatting_is_upper_case_and_padded() {
        assert_eq!(rgb_to_hex(0, 10, 255), "#000AFF");
        assert_eq!(Rgb(255, 0, 0).to_hex(), "#FF0000");
    }
}
