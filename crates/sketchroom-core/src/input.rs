//! Pointer input: viewport to canvas coordinate conversion and drag tracking.

use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Drawing tool selected by the local drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Fill,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in viewport (CSS) pixels relative to the canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
    Leave,
}

/// The on-screen canvas element: its CSS size and the device pixel ratio.
///
/// The raster buffer is allocated at `css_size * dpr` so strokes stay sharp on
/// high-density displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_size: Size,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            css_size: Size::new(css_width.max(0.0), css_height.max(0.0)),
            device_pixel_ratio: dpr,
        }
    }

    /// Raster buffer size in device pixels, at least 1x1.
    pub fn buffer_size(&self) -> (u32, u32) {
        let w = (self.css_size.width * self.device_pixel_ratio).round().max(1.0);
        let h = (self.css_size.height * self.device_pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Transform from viewport (CSS) pixels to buffer pixels.
    pub fn to_buffer(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio)
    }
}

/// Tracks the local drawer's pointer between events.
///
/// Owned by the session rather than stored as ambient state.
#[derive(Debug, Clone)]
pub struct InputState {
    pub tool: Tool,
    pub color: Rgba,
    /// Last pointer position in logical canvas coordinates while a stroke is in progress.
    last_position: Option<Point>,
    /// Id shared by all segments of the stroke in progress.
    stroke_id: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            color: Rgba::BLACK,
            last_position: None,
            stroke_id: None,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.last_position.is_some()
    }

    /// Start a stroke at `position` with a fresh stroke id.
    pub fn begin_stroke(&mut self, position: Point) -> &str {
        self.last_position = Some(position);
        self.stroke_id.insert(new_stroke_id())
    }

    /// Advance the stroke in progress, returning the previous position and the stroke id.
    pub fn advance(&mut self, position: Point) -> Option<(Point, String)> {
        let id = self.stroke_id.clone()?;
        let prev = self.last_position.replace(position)?;
        Some((prev, id))
    }

    /// End the stroke in progress, if any.
    pub fn end_stroke(&mut self) {
        self.last_position = None;
        self.stroke_id = None;
    }

    pub fn current_stroke_id(&self) -> Option<&str> {
        self.stroke_id.as_deref()
    }
}

/// Fresh id for one drag or one fill.
pub fn new_stroke_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
