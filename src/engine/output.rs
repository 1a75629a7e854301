//! Render output: pixel-space points, stroke style and the canvas seam.

use serde::Serialize;

/// Stroke width used when a preset does not set `linesize`.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;
pub const MIN_LINE_WIDTH: f64 = 0.5;
pub const MAX_LINE_WIDTH: f64 = 10.0;

/// Values with a magnitude up to this are treated as normalized coordinates.
pub const NORMALIZED_LIMIT: f64 = 1.5;

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map a preset-space `(x, y)` into pixels.
    pub fn to_pixels(&self, x: f64, y: f64) -> Point {
        Point {
            x: map_axis(x, self.width, false),
            y: map_axis(y, self.height, true),
        }
    }
}

/// Normalized values map from -1..1 onto `[1, extent - 1]`, flipped for the
/// vertical axis since preset `y` grows upward. Anything larger is taken to
/// be a pixel coordinate already and passes through untouched.
fn map_axis(value: f64, extent: f64, flip: bool) -> f64 {
    if value.abs() > NORMALIZED_LIMIT {
        return value;
    }
    let v = if flip { -value } else { value };
    (v + 1.0) * 0.5 * (extent - 2.0) + 1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Convert unit-range channels to bytes by rounding, clamped to 0..255.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    /// `None` leaves the colour to the renderer.
    pub color: Option<Rgb>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            color: None,
        }
    }
}

/// Everything one frame produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub points: Vec<Point>,
    pub stroke: Stroke,
    pub beat: bool,
}

/// The renderer that draws a frame.
pub trait Canvas {
    fn size(&self) -> CanvasSize;

    /// Draw the points joined in order.
    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke);
}
