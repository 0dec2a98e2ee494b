//! Pen-stamped lines
//!
//! Instead of single pixels, each Bresenham step stamps a square pen
//! bitmap onto the destination. The pen is any surface acquired through a
//! read-only context.

use crate::blend::alpha_blend;
use crate::clip::{clip_line_i32, Rectangle};
use crate::context::SurfaceContext;
use crate::line::resolve_clip;

impl SurfaceContext<'_> {
    /// Draw a line by stamping the `pen` surface at each step
    ///
    /// The pen's top-left corner follows the line; stamps are clipped to the
    /// destination bounds. Segments whose y-range lies entirely above or
    /// below the surface, and zero-length segments, draw nothing.
    pub fn draw_line_penned(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        pen: &SurfaceContext,
        clip: Option<Rectangle<i32>>,
    ) {
        let w = self.width();
        let h = self.height();

        if (y1 < 0 && y2 < 0) || (y1 > h && y2 > h) {
            return;
        }
        if x1 == x2 && y1 == y2 {
            return;
        }

        let (clip_x1, clip_y1, clip_x2, clip_y2) = match resolve_clip(clip, w, h) {
            Some(c) => c,
            None => return,
        };
        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
        let extents = Rectangle::new(clip_x1, clip_y1, clip_x2, clip_y2);
        if !clip_line_i32(&extents, &mut x1, &mut y1, &mut x2, &mut y2) {
            return;
        }

        let size = pen.width();

        let mut dx = x2 - x1;
        let mut dy = y2 - y1;

        let mut incx = 0;
        if dx < 0 {
            dx = -dx;
            incx = -1;
        } else if dx > 0 {
            incx = 1;
        }
        let mut incy = 0;
        if dy < 0 {
            dy = -dy;
            incy = -1;
        } else if dy > 0 {
            incy = 1;
        }

        let (pdx, pdy, odx, ody, es, el) = if dx > dy {
            (incx, 0, incx, incy, dy, dx)
        } else {
            (0, incy, incx, incy, dx, dy)
        };

        let mut x = x1;
        let mut y = y1;
        let mut error = el >> 1;

        if y < h && y >= 0 && x < w && x >= 0 {
            self.stamp_pen(pen, x, y, size);
        }

        for _ in 0..el {
            error -= es;
            if error < 0 {
                error += el;
                x += odx;
                y += ody;
            } else {
                x += pdx;
                y += pdy;
            }
            if y < h && y >= 0 && x < w && x >= 0 {
                self.stamp_pen(pen, x, y, size);
            }
        }
    }

    /// Alpha-blend the pen block at `(x,y)`, clipped to the destination
    fn stamp_pen(&mut self, pen: &SurfaceContext, x: i32, y: i32, size: i32) {
        let w = self.width();
        let h = self.height();
        let stride = self.stride();
        let pen_stride = pen.stride();
        let span_y = size.min(pen.height());

        let pen_pixels = pen.pixels();
        let pixels = self.pixels_mut();

        for py in 0..span_y {
            let dy = y + py;
            if dy < 0 {
                continue;
            }
            if dy >= h {
                break;
            }
            for px in 0..size {
                let dx = x + px;
                if dx < 0 {
                    continue;
                }
                if dx >= w {
                    break;
                }
                let src = pen_pixels[(py * pen_stride + px) as usize];
                let sa = (src >> 24) as i32;
                if sa == 0 {
                    continue;
                }
                let di = (dy * stride + dx) as usize;
                pixels[di] = if sa == 255 {
                    src
                } else {
                    let sr = ((src >> 16) & 0xff) as i32;
                    let sg = ((src >> 8) & 0xff) as i32;
                    let sb = (src & 0xff) as i32;
                    alpha_blend(sa, sr, sg, sb, pixels[di])
                };
            }
        }
    }
}
