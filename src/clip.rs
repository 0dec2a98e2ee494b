//! Clipping Region

/// Rectangle
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rectangle<T: std::cmp::PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T> Rectangle<T>
where
    T: std::cmp::PartialOrd + Copy,
{
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        Self { x1, y1, x2, y2 }
    }
    /// Get location of point relative to rectangle
    ///
    /// Returned is a u8 made up of the following bits:
    /// - [INSIDE](constant.INSIDE.html)
    /// - [LEFT](constant.LEFT.html)
    /// - [RIGHT](constant.RIGHT.html)
    /// - [BOTTOM](constant.BOTTOM.html)
    /// - [TOP](constant.TOP.html)
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(&x, &y, &self.x1, &self.y1, &self.x2, &self.y2)
    }
}

/// Inside Region
pub const INSIDE: u8 = 0b0000;
/// Left of Region
pub const LEFT: u8 = 0b0000_0001;
/// Right of Region
pub const RIGHT: u8 = 0b0000_0010;
/// Below Region
///
/// Screen convention: larger y values are below the region
pub const BOTTOM: u8 = 0b0000_0100;
/// Above Region
pub const TOP: u8 = 0b0000_1000;

/// Determine the location of a point relative to a broken-down rectangle
///
/// Returned is a u8 made up of the following bits:
/// - [INSIDE](constant.INSIDE.html)
/// - [LEFT](constant.LEFT.html)
/// - [RIGHT](constant.RIGHT.html)
/// - [BOTTOM](constant.BOTTOM.html)
/// - [TOP](constant.TOP.html)
fn clip_flags<T: std::cmp::PartialOrd>(x: &T, y: &T, x1: &T, y1: &T, x2: &T, y2: &T) -> u8 {
    let mut code = INSIDE;
    if x < x1 {
        code |= LEFT;
    } else if x > x2 {
        code |= RIGHT;
    }
    if y > y2 {
        code |= BOTTOM;
    } else if y < y1 {
        code |= TOP;
    }
    code
}

/// Clip the segment (x0,y0)-(x1,y1) to `extents`, edges inclusive
///
/// [Cohen-Sutherland](https://en.wikipedia.org/wiki/Cohen%E2%80%93Sutherland_algorithm):
/// trivial accept when both outcodes are zero, trivial reject when their
/// bitwise AND is nonzero, otherwise the outside endpoint is moved onto the
/// violated edge (priority TOP, BOTTOM, RIGHT, LEFT) and reclassified.
/// Terminates in at most four iterations.
///
/// Returns `false` when the segment lies fully outside; no pixels should be
/// drawn from the endpoints in that case.
pub fn clip_line(
    extents: &Rectangle<f64>,
    x0: &mut f64,
    y0: &mut f64,
    x1: &mut f64,
    y1: &mut f64,
) -> bool {
    let mut f0 = extents.clip_flags(*x0, *y0);
    let mut f1 = extents.clip_flags(*x1, *y1);

    if f0 == INSIDE && f1 == INSIDE {
        return true;
    }
    loop {
        if (f0 | f1) == INSIDE {
            return true;
        }
        if (f0 & f1) != INSIDE {
            return false;
        }
        // Resolve the endpoint that lies outside against the edge it violates
        let out = if f0 != INSIDE { f0 } else { f1 };
        let (x, y);
        if out & TOP != 0 {
            x = *x0 + (*x1 - *x0) * (extents.y1 - *y0) / (*y1 - *y0);
            y = extents.y1;
        } else if out & BOTTOM != 0 {
            x = *x0 + (*x1 - *x0) * (extents.y2 - *y0) / (*y1 - *y0);
            y = extents.y2;
        } else if out & RIGHT != 0 {
            y = *y0 + (*y1 - *y0) * (extents.x2 - *x0) / (*x1 - *x0);
            x = extents.x2;
        } else if out & LEFT != 0 {
            y = *y0 + (*y1 - *y0) * (extents.x1 - *x0) / (*x1 - *x0);
            x = extents.x1;
        } else {
            unreachable!("outcode {:04b}", out);
        }
        if out == f0 {
            *x0 = x;
            *y0 = y;
            f0 = extents.clip_flags(*x0, *y0);
        } else {
            *x1 = x;
            *y1 = y;
            f1 = extents.clip_flags(*x1, *y1);
        }
    }
}

/// Clip an integer segment by delegating to the f64 core
///
/// Clipped endpoints are truncated back toward zero, matching the pixel
/// walk of the rasterizers.
pub fn clip_line_i32(
    extents: &Rectangle<i32>,
    x0: &mut i32,
    y0: &mut i32,
    x1: &mut i32,
    y1: &mut i32,
) -> bool {
    let e = Rectangle::new(
        f64::from(extents.x1),
        f64::from(extents.y1),
        f64::from(extents.x2),
        f64::from(extents.y2),
    );
    let (mut fx0, mut fy0) = (f64::from(*x0), f64::from(*y0));
    let (mut fx1, mut fy1) = (f64::from(*x1), f64::from(*y1));
    let valid = clip_line(&e, &mut fx0, &mut fy0, &mut fx1, &mut fy1);
    *x0 = fx0 as i32;
    *y0 = fy0 as i32;
    *x1 = fx1 as i32;
    *y1 = fy1 as i32;
    valid
}

/// Clip an f32 segment by delegating to the f64 core
///
/// Coordinates beyond the i32 range (including infinities) are pulled back
/// to it first; the line equation would otherwise produce non-finite
/// intersections.
pub fn clip_line_f32(
    extents: &Rectangle<f32>,
    x0: &mut f32,
    y0: &mut f32,
    x1: &mut f32,
    y1: &mut f32,
) -> bool {
    let e = Rectangle::new(
        f64::from(extents.x1),
        f64::from(extents.y1),
        f64::from(extents.x2),
        f64::from(extents.y2),
    );
    let (mut fx0, mut fy0) = (clamp_to_i32(*x0), clamp_to_i32(*y0));
    let (mut fx1, mut fy1) = (clamp_to_i32(*x1), clamp_to_i32(*y1));
    let valid = clip_line(&e, &mut fx0, &mut fy0, &mut fx1, &mut fy1);
    *x0 = fx0 as f32;
    *y0 = fy0 as f32;
    *x1 = fx1 as f32;
    *y1 = fy1 as f32;
    valid
}

fn clamp_to_i32(v: f32) -> f64 {
    if v > i32::max_value() as f32 {
        f64::from(i32::max_value())
    } else if v < i32::min_value() as f32 {
        f64::from(i32::min_value())
    } else {
        f64::from(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_flags_regions() {
        let r = Rectangle::new(0, 0, 10, 10);
        assert_eq!(r.clip_flags(5, 5), INSIDE);
        assert_eq!(r.clip_flags(-1, 5), LEFT);
        assert_eq!(r.clip_flags(11, 5), RIGHT);
        assert_eq!(r.clip_flags(5, 11), BOTTOM);
        assert_eq!(r.clip_flags(5, -1), TOP);
        assert_eq!(r.clip_flags(-1, -1), LEFT | TOP);
        assert_eq!(r.clip_flags(11, 11), RIGHT | BOTTOM);
    }

    #[test]
    fn inside_segment_is_untouched() {
        let r = Rectangle::new(0, 0, 10, 10);
        let (mut x0, mut y0, mut x1, mut y1) = (1, 2, 8, 9);
        assert!(clip_line_i32(&r, &mut x0, &mut y0, &mut x1, &mut y1));
        assert_eq!((x0, y0, x1, y1), (1, 2, 8, 9));
    }

    #[test]
    fn shared_outcode_bit_rejects() {
        let r = Rectangle::new(0, 0, 10, 10);
        // both endpoints left of the region
        let (mut x0, mut y0, mut x1, mut y1) = (-5, 2, -1, 9);
        assert!(!clip_line_i32(&r, &mut x0, &mut y0, &mut x1, &mut y1));
        // both above
        let (mut x0, mut y0, mut x1, mut y1) = (2, -7, 9, -1);
        assert!(!clip_line_i32(&r, &mut x0, &mut y0, &mut x1, &mut y1));
    }

    #[test]
    fn crossing_segment_lands_on_boundary() {
        let r = Rectangle::new(0, 0, 10, 10);
        let (mut x0, mut y0, mut x1, mut y1) = (-5, 5, 15, 5);
        assert!(clip_line_i32(&r, &mut x0, &mut y0, &mut x1, &mut y1));
        assert_eq!((x0, y0), (0, 5));
        assert_eq!((x1, y1), (10, 5));
    }

    #[test]
    fn outside_to_inside_clips_one_end() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let (mut x0, mut y0, mut x1, mut y1) = (5.0, -5.0, 5.0, 5.0);
        assert!(clip_line(&r, &mut x0, &mut y0, &mut x1, &mut y1));
        assert_eq!((x0, y0), (5.0, 0.0));
        assert_eq!((x1, y1), (5.0, 5.0));
    }

    #[test]
    fn diagonal_corner_cut() {
        // cuts the corner of the region, both endpoints outside but accepted
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let (mut x0, mut y0, mut x1, mut y1) = (-2.0, 2.0, 2.0, -2.0);
        assert!(clip_line(&r, &mut x0, &mut y0, &mut x1, &mut y1));
        assert_eq!((x0, y0), (0.0, 0.0));
        assert_eq!((x1, y1), (0.0, 0.0));
    }

    #[test]
    fn f32_overload_survives_infinities() {
        let r = Rectangle::new(0.0_f32, 0.0, 10.0, 10.0);
        let (mut x0, mut y0) = (std::f32::INFINITY, 5.0);
        let (mut x1, mut y1) = (5.0, 5.0);
        let valid = clip_line_f32(&r, &mut x0, &mut y0, &mut x1, &mut y1);
        assert!(valid);
        assert!(x0.is_finite());
        assert_eq!(x0, 10.0);
    }
}
