//! Dotted lines
//!
//! A "pen down" boolean flips every `dot_length` pixels drawn and every
//! `dot_space` pixels skipped, tracked with modulo counters. Three geometry
//! branches: pure vertical, pure horizontal, and general slope through the
//! explicit line equation `y = m*x + n`.
//!
//! The general branch deliberately walks x across the full surface width
//! rather than only the segment's span, and all three branches write one
//! pixel up/left of the walked coordinate. Both behaviors are load-bearing
//! for existing callers and are preserved as-is.

use crate::clip::{clip_line_i32, Rectangle};
use crate::color::Color;
use crate::context::SurfaceContext;

impl SurfaceContext<'_> {
    /// Draw a dotted line: `dot_length` pixels on, `dot_space` pixels off
    ///
    /// Both pattern values must be positive. Zero-length segments draw
    /// nothing.
    pub fn draw_line_dotted(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        dot_space: i32,
        dot_length: i32,
        color: Color,
    ) {
        assert!(
            dot_space > 0 && dot_length > 0,
            "dot pattern must be positive, got space {} length {}",
            dot_space,
            dot_length
        );
        if x1 == x2 && y1 == y2 {
            return;
        }
        if x1 == x2 {
            let (y1, y2) = if y2 < y1 { (y2, y1) } else { (y1, y2) };
            self.dotted_vertical(x1, y1, y2, dot_space, dot_length, color);
        } else if y1 == y2 {
            let (x1, x2) = if x2 < x1 { (x2, x1) } else { (x1, x2) };
            self.dotted_horizontal(x1, x2, y1, dot_space, dot_length, color);
        } else {
            self.dotted_sloped(x1, y1, x2, y2, dot_space, dot_length, color);
        }
    }

    fn dotted_vertical(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        dot_space: i32,
        dot_length: i32,
        color: Color,
    ) {
        let w = self.width();
        let h = self.height();
        let stride = self.stride();
        if x < 0 || x > w {
            return;
        }

        let pixels = self.pixels_mut();
        let mut on = true;
        let mut space_count = 0;
        for i in y1..=y2 {
            if i < 1 {
                continue;
            }
            if i >= h {
                break;
            }
            if on {
                pixels[((i - 1) * stride + x) as usize] = color.0;
                on = i % dot_length != 0;
                space_count = 0;
            } else {
                space_count += 1;
                on = space_count % dot_space == 0;
            }
        }
    }

    fn dotted_horizontal(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        dot_space: i32,
        dot_length: i32,
        color: Color,
    ) {
        let w = self.width();
        let h = self.height();
        let stride = self.stride();
        if y < 0 || y > h {
            return;
        }

        let pixels = self.pixels_mut();
        let mut on = true;
        let mut space_count = 0;
        for i in x1..=x2 {
            if i < 1 {
                continue;
            }
            if i >= w {
                break;
            }
            if y >= h {
                break;
            }
            if on {
                pixels[(y * stride + i - 1) as usize] = color.0;
                on = i % dot_length != 0;
                space_count = 0;
            } else {
                space_count += 1;
                on = space_count % dot_space == 0;
            }
        }
    }

    fn dotted_sloped(
        &mut self,
        mut x1: i32,
        mut y1: i32,
        mut x2: i32,
        mut y2: i32,
        dot_space: i32,
        dot_length: i32,
        color: Color,
    ) {
        // y = m * x + n
        let w = self.width();
        let h = self.height();
        let stride = self.stride();

        let extents = Rectangle::new(0, 0, w, h);
        if !clip_line_i32(&extents, &mut x1, &mut y1, &mut x2, &mut y2) {
            return;
        }
        // always draw from left to right
        if x2 < x1 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }
        let m = (y2 - y1) as f32 / (x2 - x1) as f32;
        let n = y1 as f32 - m * x1 as f32;

        let pixels = self.pixels_mut();
        let mut on = true;
        let mut space_count = 0;
        // walks to the full surface width, not just the segment span
        for i in x1..=w {
            if i == 0 {
                continue;
            }
            let y = (m * i as f32 + n) as i32;
            if y <= 0 {
                continue;
            }
            if y >= h || i >= x2 {
                continue;
            }
            if on {
                pixels[((y - 1) * stride + i - 1) as usize] = color.0;
                space_count = 0;
                on = i % dot_length != 0;
            } else {
                space_count += 1;
                on = space_count % dot_space == 0;
            }
        }
    }
}
