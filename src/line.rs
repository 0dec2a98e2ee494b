//! Aliased line rasterizers
//!
//! Three variants with different speed/accuracy trade-offs: classic
//! Bresenham and a float DDA, both checking every candidate pixel against
//! the clip rect, and the fixed-point production variant which clips the
//! whole segment up front so its inner loop can run unchecked.

use crate::clip::{clip_line_i32, Rectangle};
use crate::color::Color;
use crate::context::SurfaceContext;

/// Resolve an optional clip rectangle against the surface bounds
///
/// Returns half-open pixel bounds `(x1, y1, x2, y2)`, or `None` when the
/// intersection is empty and nothing can be drawn.
pub(crate) fn resolve_clip(
    clip: Option<Rectangle<i32>>,
    width: i32,
    height: i32,
) -> Option<(i32, i32, i32, i32)> {
    let (mut cx1, mut cy1, mut cx2, mut cy2) = (0, 0, width, height);
    if let Some(c) = clip {
        cx1 = cx1.max(c.x1);
        cy1 = cy1.max(c.y1);
        cx2 = cx2.min(c.x2);
        cy2 = cy2.min(c.y2);
    }
    if cx1 >= cx2 || cy1 >= cy2 {
        None
    } else {
        Some((cx1, cy1, cx2, cy2))
    }
}

impl SurfaceContext<'_> {
    /// Draw a line from `(x1,y1)` to `(x2,y2)` of color `color`
    ///
    /// Uses [Bresenham's line drawing algorithm](https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm).
    /// Every candidate pixel is checked against the clip rect individually;
    /// there is no pre-clip pass, so a zero-length segment still plots its
    /// single coincident point.
    pub fn draw_line_bresenham(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        let stride = self.stride();
        let (clip_x1, clip_y1, clip_x2, clip_y2) =
            match resolve_clip(clip, self.width(), self.height()) {
                Some(c) => c,
                None => return,
            };
        let pixels = self.pixels_mut();

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

        // Which gradient is larger
        let (pdx, pdy, odx, ody, es, el) = if dx > dy {
            (incx, 0, incx, incy, dy, dx)
        } else {
            (0, incy, incx, incy, dx, dy)
        };

        let mut x = x1;
        let mut y = y1;
        let mut error = el >> 1;
        if y < clip_y2 && y >= clip_y1 && x < clip_x2 && x >= clip_x1 {
            pixels[(y * stride + x) as usize] = color.0;
        }

        // Walk the line, one major-axis step at a time
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
            if y < clip_y2 && y >= clip_y1 && x < clip_x2 && x >= clip_x1 {
                pixels[(y * stride + x) as usize] = color.0;
            }
        }
    }

    /// Draw a line from `(x1,y1)` to `(x2,y2)` of color `color`
    ///
    /// Uses a [DDA](https://en.wikipedia.org/wiki/Digital_differential_analyzer_(graphics_algorithm))
    /// with float stepping: `max(|dx|,|dy|)` steps of `dx/len`, `dy/len`
    /// each, truncated to pixel coordinates. Bound checks match
    /// [draw_line_bresenham](SurfaceContext::draw_line_bresenham).
    pub fn draw_line_dda(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        let stride = self.stride();
        let (clip_x1, clip_y1, clip_x2, clip_y2) =
            match resolve_clip(clip, self.width(), self.height()) {
                Some(c) => c,
                None => return,
            };
        let pixels = self.pixels_mut();

        let dx = x2 - x1;
        let dy = y2 - y1;
        let len = dy.abs().max(dx.abs());

        if len == 0 {
            // coincident endpoints still yield their one point
            if y1 < clip_y2 && y1 >= clip_y1 && x1 < clip_x2 && x1 >= clip_x1 {
                pixels[(y1 * stride + x1) as usize] = color.0;
            }
            return;
        }

        let incx = dx as f32 / len as f32;
        let incy = dy as f32 / len as f32;
        let mut x = x1 as f32;
        let mut y = y1 as f32;

        for _ in 0..len {
            if y < clip_y2 as f32 && y >= clip_y1 as f32 && x < clip_x2 as f32 && x >= clip_x1 as f32
            {
                pixels[(y as i32 * stride + x as i32) as usize] = color.0;
            }
            x += incx;
            y += incy;
        }
    }

    /// Draw a line from `(x1,y1)` to `(x2,y2)` of color `color` using the
    /// fixed-point production variant
    ///
    /// The segment is Cohen-Sutherland clipped against clip∩surface, then
    /// trimmed a second time in 8-bit fixed point so that every stepped
    /// pixel is known to land in the buffer: the four ascending/descending
    /// boundary cases are solved with modular arithmetic on the fractional
    /// accumulator, never with a per-pixel division. The inner loop advances
    /// a row-crossing index directly by `±stride` or `±1`.
    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        const PRECISION_SHIFT: i32 = 8;

        let w = self.width();
        let h = self.height();
        let stride = self.stride();
        let (clip_x1, clip_y1, clip_x2, clip_y2) = match resolve_clip(clip, w, h) {
            Some(c) => c,
            None => return,
        };

        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
        let extents = Rectangle::new(clip_x1, clip_y1, clip_x2, clip_y2);
        if !clip_line_i32(&extents, &mut x1, &mut y1, &mut x2, &mut y2) {
            return;
        }

        let dx = x2 - x1;
        let dy = y2 - y1;
        let len_x = dx.abs();
        let len_y = dy.abs();

        if len_x > len_y {
            // x increases by +/- 1
            if dx < 0 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let incy = (dy << PRECISION_SHIFT) / dx;
            let mut y1s = y1 << PRECISION_SHIFT;
            let mut y2s = y2 << PRECISION_SHIFT;
            let hs = h << PRECISION_SHIFT;

            if y1 < y2 {
                if y1 >= clip_y2 || y2 < clip_y1 {
                    return;
                }
                if y1s < 0 {
                    if incy == 0 {
                        return;
                    }
                    // lowest y1s on the line that is >= 0
                    let old_y1s = y1s;
                    y1s = incy - 1 + ((y1s + 1) % incy);
                    x1 += (y1s - old_y1s) / incy;
                }
                if y2s >= hs && incy != 0 {
                    // highest y2s on the line that is <= hs - 1
                    y2s = hs - 1 - ((hs - 1 - y1s) % incy);
                    x2 = x1 + (y2s - y1s) / incy;
                }
            } else {
                if y2 >= clip_y2 || y1 < clip_y1 {
                    return;
                }
                if y1s >= hs {
                    if incy == 0 {
                        return;
                    }
                    // highest y1s on the line that is <= hs - 1
                    let old_y1s = y1s;
                    y1s = hs - 1 + (incy - ((hs - 1 - old_y1s) % incy));
                    x1 += (y1s - old_y1s) / incy;
                }
                if y2s < 0 && incy != 0 {
                    // lowest y2s on the line that is >= 0
                    y2s = y1s % incy;
                    x2 = x1 + (y2s - y1s) / incy;
                }
            }

            if x1 < 0 {
                y1s -= incy * x1;
                x1 = 0;
            }
            if x2 >= w {
                x2 = w - 1;
            }

            let mut ys = y1s;
            let mut y = ys >> PRECISION_SHIFT;
            let mut previous_y = y;
            let mut index = x1 + y * stride;
            let k = if incy < 0 { 1 - stride } else { 1 + stride };

            let pixels = self.pixels_mut();
            for _ in x1..=x2 {
                pixels[index as usize] = color.0;
                ys += incy;
                y = ys >> PRECISION_SHIFT;
                if y != previous_y {
                    previous_y = y;
                    index += k;
                } else {
                    index += 1;
                }
            }
        } else {
            // y increases by +/- 1; a zero-length segment has nothing to step
            if len_y == 0 {
                return;
            }
            if dy < 0 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let mut x1s = x1 << PRECISION_SHIFT;
            let mut x2s = x2 << PRECISION_SHIFT;
            let ws = w << PRECISION_SHIFT;
            let incx = (dx << PRECISION_SHIFT) / dy;

            if x1 < x2 {
                if x1 >= clip_x2 || x2 < clip_x1 {
                    return;
                }
                if x1s < 0 {
                    if incx == 0 {
                        return;
                    }
                    // lowest x1s on the line that is >= 0
                    let old_x1s = x1s;
                    x1s = incx - 1 + ((x1s + 1) % incx);
                    y1 += (x1s - old_x1s) / incx;
                }
                if x2s >= ws && incx != 0 {
                    // highest x2s on the line that is <= ws - 1
                    x2s = ws - 1 - ((ws - 1 - x1s) % incx);
                    y2 = y1 + (x2s - x1s) / incx;
                }
            } else {
                if x2 >= clip_x2 || x1 < clip_x1 {
                    return;
                }
                if x1s >= ws {
                    if incx == 0 {
                        return;
                    }
                    // highest x1s on the line that is <= ws - 1
                    let old_x1s = x1s;
                    x1s = ws - 1 + (incx - ((ws - 1 - old_x1s) % incx));
                    y1 += (x1s - old_x1s) / incx;
                }
                if x2s < 0 && incx != 0 {
                    // lowest x2s on the line that is >= 0
                    x2s = x1s % incx;
                    y2 = y1 + (x2s - x1s) / incx;
                }
            }

            if y1 < 0 {
                x1s -= incx * y1;
                y1 = 0;
            }
            if y2 >= h {
                y2 = h - 1;
            }

            // The fractional accumulator carries the column; the row offset
            // is folded into the per-step increment.
            let mut index = i64::from(x1s);
            let index_base = i64::from(y1) * i64::from(stride);
            let inc = i64::from((stride << PRECISION_SHIFT) + incx);

            let pixels = self.pixels_mut();
            for _ in y1..=y2 {
                pixels[(index_base + (index >> PRECISION_SHIFT)) as usize] = color.0;
                index += inc;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_clip;
    use crate::clip::Rectangle;

    #[test]
    fn clip_defaults_to_surface_bounds() {
        assert_eq!(resolve_clip(None, 10, 5), Some((0, 0, 10, 5)));
    }

    #[test]
    fn clip_is_intersected_with_surface() {
        let clip = Some(Rectangle::new(-5, 2, 20, 9));
        assert_eq!(resolve_clip(clip, 10, 5), Some((0, 2, 10, 5)));
    }

    #[test]
    fn empty_intersection_draws_nothing() {
        let clip = Some(Rectangle::new(12, 0, 20, 5));
        assert_eq!(resolve_clip(clip, 10, 5), None);
    }
}
