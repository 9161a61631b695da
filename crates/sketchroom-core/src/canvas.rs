//! Drawing canvas: a raster buffer plus the mapping from the shared logical
//! coordinate space into buffer pixels.
//!
//! Every participant draws in the same logical space (800x600 by default), so
//! strokes land in the same place regardless of each client's buffer size.
//! Resizing reallocates the buffer and replays history at the new scale.

use kurbo::{Affine, Point, Size};

use crate::color::Rgba;
use crate::config::CanvasConfig;
use crate::history::HistoryLog;
use crate::protocol::StrokeOp;
use crate::raster::RasterBuffer;
use crate::render::{apply_clear, apply_fill, apply_segment};

/// The raster canvas and its coordinate mapping.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: RasterBuffer,
    /// Size of the shared logical drawing space.
    logical: Size,
    /// Brush width in logical units.
    brush_width: f64,
}

impl Canvas {
    /// Create a canvas whose buffer matches the logical size.
    pub fn new(config: &CanvasConfig) -> Self {
        Self::with_buffer_size(config, config.logical_width, config.logical_height)
    }

    /// Create a canvas with an explicit buffer size.
    pub fn with_buffer_size(config: &CanvasConfig, width: u32, height: u32) -> Self {
        Self {
            buffer: RasterBuffer::new(width, height, config.background),
            logical: Size::new(config.logical_width as f64, config.logical_height as f64),
            brush_width: config.brush_width,
        }
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn logical_size(&self) -> Size {
        self.logical
    }

    pub fn buffer_size(&self) -> Size {
        Size::new(self.buffer.width() as f64, self.buffer.height() as f64)
    }

    /// Transform from logical coordinates to buffer pixels.
    pub fn to_buffer(&self) -> Affine {
        let buffer = self.buffer_size();
        if !has_area(self.logical) {
            return Affine::IDENTITY;
        }
        Affine::scale_non_uniform(buffer.width / self.logical.width, buffer.height / self.logical.height)
    }

    /// Transform from buffer pixels to logical coordinates.
    pub fn from_buffer(&self) -> Affine {
        self.to_buffer().inverse()
    }

    /// Brush width in buffer pixels at the current scale.
    pub fn brush_width_px(&self) -> f64 {
        let buffer = self.buffer_size();
        if !has_area(self.logical) {
            return self.brush_width.max(1.0);
        }
        let scale = (buffer.width / self.logical.width + buffer.height / self.logical.height) / 2.0;
        (self.brush_width * scale).max(1.0)
    }

    /// Apply one stroke operation given in logical coordinates.
    pub fn apply(&mut self, op: &StrokeOp) {
        let transform = self.to_buffer();
        match op {
            StrokeOp::Segment(seg) => {
                let from = transform * Point::new(seg.prev_x, seg.prev_y);
                let to = transform * Point::new(seg.curr_x, seg.curr_y);
                let width = self.brush_width_px();
                apply_segment(&mut self.buffer, from, to, seg.color, width);
            }
            StrokeOp::Fill(fill) => {
                let seed = transform * Point::new(fill.x, fill.y);
                if !seed.is_finite() {
                    return;
                }
                apply_fill(&mut self.buffer, seed.x.floor() as i64, seed.y.floor() as i64, fill.color);
            }
        }
    }

    /// Reset the buffer to the background color.
    pub fn clear(&mut self) {
        apply_clear(&mut self.buffer);
    }

    /// Reset to background, then apply every logged operation in order.
    pub fn replay(&mut self, log: &HistoryLog) {
        self.clear();
        for op in log.iter() {
            self.apply(op);
        }
    }

    /// Reallocate the buffer and rebuild it from `log`. History is never discarded.
    pub fn resize(&mut self, width: u32, height: u32, log: &HistoryLog) {
        if width == self.buffer.width() && height == self.buffer.height() {
            return;
        }
        self.buffer = RasterBuffer::new(width, height, self.buffer.background());
        self.replay(log);
    }

    pub fn background(&self) -> Rgba {
        self.buffer.background()
    }
}

fn has_area(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}
