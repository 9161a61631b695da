//! Raster pixel buffer.

use crate::color::Rgba;

/// A row-major RGBA pixel buffer with a fixed background color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    background: Rgba,
    pixels: Vec<Rgba>,
}

impl RasterBuffer {
    /// Create a buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Whether (x, y) lies inside the buffer.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at (x, y), or `None` outside the buffer.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.pixels[self.index(x as u32, y as u32)])
    }

    /// Set the pixel at (x, y). Out-of-range writes are ignored.
    pub fn set(&mut self, x: i64, y: i64, color: Rgba) {
        if self.contains(x, y) {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Reset every pixel to the background color.
    pub fn fill_background(&mut self) {
        let bg = self.background;
        self.pixels.iter_mut().for_each(|p| *p = bg);
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Number of pixels currently equal to `color`.
    pub fn count(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    /// Flatten to RGBA8 bytes for blitting or encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.0).collect()
    }
}
