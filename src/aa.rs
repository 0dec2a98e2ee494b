//! Antialiased line rasterizers
//!
//! Two families: Wu's algorithm, which splits each step's intensity between
//! a pixel and its minor-axis neighbor from a 16-bit error accumulator, and
//! Gupta-Sproull, which stamps a short perpendicular span per step with
//! coverage derived incrementally from the distance to the ideal line.
//! Neither performs a division or square root inside the pixel loop.

use crate::blend::{alpha_blend, blend_coverage};
use crate::clip::{clip_line_i32, Rectangle};
use crate::color::Color;
use crate::context::SurfaceContext;
use crate::line::resolve_clip;

/// Fixed-point scale of the Gupta-Sproull coverage terms
const DISTANCE_SHIFT: i32 = 10;
const DISTANCE_SCALE: i32 = 1 << DISTANCE_SHIFT;

impl SurfaceContext<'_> {
    /// Draw an antialiased, alpha blended line using
    /// [Wu's algorithm](https://en.wikipedia.org/wiki/Xiaolin_Wu%27s_line_algorithm)
    ///
    /// Horizontal, vertical and 45° segments pass through pixel centers and
    /// are drawn at full intensity with no neighbor blending. All other
    /// slopes accumulate a 16-bit fixed-point error along the major axis;
    /// the high byte weights the primary pixel (complemented) and its
    /// minor-axis neighbor. First and last pixels are always full intensity.
    pub fn draw_line_wu(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        const INTENSITY_SHIFT: i32 = 16 - 8;
        const WEIGHT_COMPLEMENT_MASK: i32 = 0xff;

        if x1 == x2 && y1 == y2 {
            return;
        }
        let stride = self.stride();
        let (clip_x1, clip_y1, clip_x2, clip_y2) =
            match resolve_clip(clip, self.width(), self.height()) {
                Some(c) => c,
                None => return,
            };
        // inclusive extents keep both blended pixels of every step on the
        // surface
        let extents = Rectangle::new(clip_x1, clip_y1, clip_x2 - 1, clip_y2 - 1);
        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
        if !clip_line_i32(&extents, &mut x1, &mut y1, &mut x2, &mut y2) {
            return;
        }

        let (sa, sr, sg, sb) = color.channels();
        let pixels = self.pixels_mut();

        // ensure the line runs from top to bottom
        if y1 > y2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }

        // initial pixel, always intersected by the line
        let i0 = (y1 * stride + x1) as usize;
        pixels[i0] = alpha_blend(sa, sr, sg, sb, pixels[i0]);

        let mut delta_x = x2 - x1;
        let xdir = if delta_x >= 0 {
            1
        } else {
            delta_x = -delta_x;
            -1
        };

        // Horizontal, vertical and diagonal lines need no weighting; this
        // also keeps the slope division below away from zero.
        let delta_y = y2 - y1;
        if delta_y == 0 {
            let mut x = x1;
            for _ in 0..delta_x {
                x += xdir;
                let i = (y1 * stride + x) as usize;
                pixels[i] = alpha_blend(sa, sr, sg, sb, pixels[i]);
            }
            return;
        }
        if delta_x == 0 {
            let mut y = y1;
            for _ in 0..delta_y {
                y += 1;
                let i = (y * stride + x1) as usize;
                pixels[i] = alpha_blend(sa, sr, sg, sb, pixels[i]);
            }
            return;
        }
        if delta_x == delta_y {
            let mut x = x1;
            let mut y = y1;
            for _ in 0..delta_y {
                x += xdir;
                y += 1;
                let i = (y * stride + x) as usize;
                pixels[i] = alpha_blend(sa, sr, sg, sb, pixels[i]);
            }
            return;
        }

        let mut error_acc: u16 = 0;
        let mut x = x1;
        let mut y = y1;

        if delta_y > delta_x {
            // y-major: 16-bit fixed-point fraction of a pixel that x
            // advances per unit y, truncated so the endpoint is never overrun
            let error_adj = (((delta_x as u32) << 16) / delta_y as u32) as u16;

            for _ in 1..delta_y {
                let error_acc_temp = error_acc;
                error_acc = error_acc.wrapping_add(error_adj);
                if error_acc <= error_acc_temp {
                    // accumulator turned over
                    x += xdir;
                }
                y += 1;
                let weighting = i32::from(error_acc >> INTENSITY_SHIFT);

                let weight = weighting ^ WEIGHT_COMPLEMENT_MASK;
                let i = (y * stride + x) as usize;
                pixels[i] = alpha_blend(
                    sa,
                    (sr * weight) >> 8,
                    (sg * weight) >> 8,
                    (sb * weight) >> 8,
                    pixels[i],
                );

                let i = (y * stride + x + xdir) as usize;
                pixels[i] = alpha_blend(
                    sa,
                    (sr * weighting) >> 8,
                    (sg * weighting) >> 8,
                    (sb * weighting) >> 8,
                    pixels[i],
                );
            }
        } else {
            // x-major
            let error_adj = (((delta_y as u32) << 16) / delta_x as u32) as u16;

            for _ in 1..delta_x {
                let error_acc_temp = error_acc;
                error_acc = error_acc.wrapping_add(error_adj);
                if error_acc <= error_acc_temp {
                    y += 1;
                }
                x += xdir;
                let weighting = i32::from(error_acc >> INTENSITY_SHIFT);

                let weight = weighting ^ WEIGHT_COMPLEMENT_MASK;
                let i = (y * stride + x) as usize;
                pixels[i] = alpha_blend(
                    sa,
                    (sr * weight) >> 8,
                    (sg * weight) >> 8,
                    (sb * weight) >> 8,
                    pixels[i],
                );

                let i = ((y + 1) * stride + x) as usize;
                pixels[i] = alpha_blend(
                    sa,
                    (sr * weighting) >> 8,
                    (sg * weighting) >> 8,
                    (sb * weighting) >> 8,
                    pixels[i],
                );
            }
        }

        // final pixel, exactly intersected by the line
        let iend = (y2 * stride + x2) as usize;
        pixels[iend] = alpha_blend(sa, sr, sg, sb, pixels[iend]);
    }

    /// Draw an antialiased line using an optimized
    /// [Gupta-Sproull](https://en.wikipedia.org/wiki/Line_drawing_algorithm) variant
    ///
    /// Octant normalization collapses all slopes into one (u,v) loop. Per
    /// u-step the center pixel and both minor-axis neighbors are blended
    /// with coverage derived from the perpendicular distance to the ideal
    /// line, tracked incrementally through a precomputed fixed-point inverse
    /// distance. Coordinates are clamped one pixel inward of every edge so
    /// the three-pixel stamp stays on the surface; a zero-length segment
    /// returns immediately, as it has no defined distance denominator.
    pub fn draw_line_aa(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        self.gupta_sproull(x1, y1, x2, y2, 1, color, clip);
    }

    /// Draw an antialiased line with a stroke width
    ///
    /// Same machinery as [draw_line_aa](SurfaceContext::draw_line_aa), with
    /// the three-pixel stamp widened: an inner band of `stroke_width` pixels
    /// at full source alpha and one distance-weighted pixel on each edge.
    /// Widths below 2 fall back to the thin line.
    pub fn draw_line_aa_width(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stroke_width: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        self.gupta_sproull(x1, y1, x2, y2, stroke_width.max(1), color, clip);
    }

    fn gupta_sproull(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stroke_width: i32,
        color: Color,
        clip: Option<Rectangle<i32>>,
    ) {
        if x1 == x2 && y1 == y2 {
            // would overflow the inverse distance precomputation
            return;
        }
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

        // inner band below/left of center, above/right of center
        let band_lo = stroke_width / 2;
        let band_hi = (stroke_width - 1) / 2;
        let margin = band_lo + 1;

        // the stamp must fit between the clamped coordinate and every edge
        if w <= 2 * margin || h <= 2 * margin {
            return;
        }
        x1 = x1.max(margin).min(w - 1 - margin);
        y1 = y1.max(margin).min(h - 1 - margin);
        x2 = x2.max(margin).min(w - 1 - margin);
        y2 = y2.max(margin).min(h - 1 - margin);
        if x1 == x2 && y1 == y2 {
            return;
        }

        let mut addr = y1 * stride + x1;
        let dx = x2 - x1;
        let dy = y2 - y1;

        let (sa, _, _, _) = color.channels();
        let srb = color.0 & 0x00ff_00ff;
        let sg = (color.0 >> 8) & 0xff;

        // By switching to (u,v), all eight octants collapse into one loop
        let adx = dx.abs();
        let ady = dy.abs();
        let (du, dv, uincr, vincr) = if adx > ady {
            (
                adx,
                ady,
                if dx < 0 { -1 } else { 1 },
                if dy < 0 { -stride } else { stride },
            )
        } else {
            (
                ady,
                adx,
                if dy < 0 { -stride } else { stride },
                if dx < 0 { -1 } else { 1 },
            )
        };

        let mut d = (dv << 1) - du; // initial value as in Bresenham's
        let incr_s = dv << 1; // d step for straight increments
        let incr_d = (dv - du) << 1; // d step for diagonal increments

        // precomputed inverse denominator; everything downstream stays in
        // fixed point
        let inv_d_float = 1.0 / (4.0 * f64::from(du * du + dv * dv).sqrt());
        let inv_d2du_float = 0.75 - 2.0 * (f64::from(du) * inv_d_float);

        let inv_d = (inv_d_float * f64::from(DISTANCE_SCALE)) as i32;
        let inv_d2du = (inv_d2du_float * f64::from(DISTANCE_SCALE) * f64::from(sa)) as i32;
        let zero_dot75 = (0.75 * f64::from(DISTANCE_SCALE) * f64::from(sa)) as i32;

        let inv_d_mul_alpha = inv_d * sa;
        let du_mul_inv_d = du * inv_d_mul_alpha;
        let mut d_mul_inv_d = d * inv_d_mul_alpha;
        let mut twovdu_mul_inv_d = 0; // numerator of the distance, starts on the line
        let incr_s_mul_inv_d = incr_s * inv_d_mul_alpha;
        let incr_d_mul_inv_d = incr_d * inv_d_mul_alpha;

        let pixels = self.pixels_mut();
        for _ in 0..=du {
            if stroke_width == 1 {
                blend_coverage(
                    pixels,
                    addr as usize,
                    (zero_dot75 - twovdu_mul_inv_d) >> DISTANCE_SHIFT,
                    srb,
                    sg,
                );
            } else {
                // full-alpha core of the stroke
                for j in -band_lo..=band_hi {
                    blend_coverage(pixels, (addr + j * vincr) as usize, sa, srb, sg);
                }
            }
            blend_coverage(
                pixels,
                (addr + (band_hi + 1) * vincr) as usize,
                (inv_d2du + twovdu_mul_inv_d) >> DISTANCE_SHIFT,
                srb,
                sg,
            );
            blend_coverage(
                pixels,
                (addr - (band_lo + 1) * vincr) as usize,
                (inv_d2du - twovdu_mul_inv_d) >> DISTANCE_SHIFT,
                srb,
                sg,
            );

            if d < 0 {
                // straight step along u
                twovdu_mul_inv_d = d_mul_inv_d + du_mul_inv_d;
                d += incr_s;
                d_mul_inv_d += incr_s_mul_inv_d;
            } else {
                // diagonal step along u+v
                twovdu_mul_inv_d = d_mul_inv_d - du_mul_inv_d;
                d += incr_d;
                d_mul_inv_d += incr_d_mul_inv_d;
                addr += vincr;
            }
            addr += uincr;
        }
    }
}
