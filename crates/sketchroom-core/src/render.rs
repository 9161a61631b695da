//! Stroke renderer: pure operations that mutate a [`RasterBuffer`].
//!
//! These run for local optimistic painting and for history replay alike, so
//! they must depend on nothing but the buffer contents and their arguments.

use std::collections::VecDeque;

use kurbo::{Point, Rect};

use crate::color::Rgba;
use crate::raster::RasterBuffer;

/// Draw a round-capped line of `width` buffer pixels from `from` to `to`.
///
/// Every pixel whose center lies within `width / 2` of the segment takes
/// `color`. Pixels outside the buffer are clipped. Non-finite input is ignored.
pub fn apply_segment(buffer: &mut RasterBuffer, from: Point, to: Point, color: Rgba, width: f64) {
    if !(from.is_finite() && to.is_finite() && width.is_finite()) {
        return;
    }
    let radius = (width / 2.0).max(0.5);
    let bounds = Rect::from_points(from, to).inflate(radius, radius);
    let clip = Rect::new(0.0, 0.0, buffer.width() as f64, buffer.height() as f64);
    let area = bounds.intersect(clip);
    if area.width() <= 0.0 || area.height() <= 0.0 {
        return;
    }

    let seg = to - from;
    let len_sq = seg.hypot2();
    let radius_sq = radius * radius;

    let x0 = area.x0.floor() as i64;
    let y0 = area.y0.floor() as i64;
    let x1 = area.x1.ceil() as i64;
    let y1 = area.y1.ceil() as i64;

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let t = if len_sq > 0.0 {
                ((center - from).dot(seg) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let nearest = from + seg * t;
            if (center - nearest).hypot2() <= radius_sq {
                buffer.set(x, y, color);
            }
        }
    }
}

/// 4-connected flood fill from (x, y).
///
/// Recolors every pixel contiguous with the seed whose color exactly equals
/// the seed's color before the fill. Returns the number of pixels recolored.
pub fn apply_fill(buffer: &mut RasterBuffer, x: i64, y: i64, color: Rgba) -> usize {
    let Some(target) = buffer.get(x, y) else {
        return 0;
    };
    // Seed already has the fill color.
    if target == color {
        return 0;
    }

    let mut recolored = 0;
    let mut queue = VecDeque::new();
    queue.push_back((x, y));

    while let Some((px, py)) = queue.pop_front() {
        if buffer.get(px, py) != Some(target) {
            continue;
        }
        buffer.set(px, py, color);
        recolored += 1;

        for (nx, ny) in [(px + 1, py), (px - 1, py), (px, py + 1), (px, py - 1)] {
            if buffer.contains(nx, ny) {
                queue.push_back((nx, ny));
            }
        }
    }

    recolored
}

/// Reset every pixel to the buffer's background.
pub fn apply_clear(buffer: &mut RasterBuffer) {
    buffer.fill_background();
}
