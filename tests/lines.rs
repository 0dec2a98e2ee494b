
extern crate rasterline;

use rasterline::{AccessMode, Bitmap, Color, Rectangle, SurfaceRegistry};

const RED: Color = Color::from_argb(0xff, 0xff, 0, 0);

fn written(bmp: &Bitmap, w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if bmp.pixel(x, y) != 0 {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn production_line_on_a_5x1_surface() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(5, 1);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line(0, 0, 4, 0, RED, None);
    assert_eq!(ctx.pixels(), &[0xffff_0000u32; 5][..]);
    ctx.release().unwrap();
}

#[test]
fn zero_length_segments() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(8, 8);
    let pen_bmp = Bitmap::new(3, 3);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();

    // Bresenham and DDA plot the single coincident point
    ctx.draw_line_bresenham(3, 3, 3, 3, RED, None);
    assert_eq!(ctx.pixels().iter().filter(|&&p| p != 0).count(), 1);
    ctx.clear();
    ctx.draw_line_dda(3, 3, 3, 3, RED, None);
    assert_eq!(ctx.pixels().iter().filter(|&&p| p != 0).count(), 1);

    // every other variant writes nothing
    ctx.clear();
    ctx.draw_line(3, 3, 3, 3, RED, None);
    ctx.draw_line_wu(3, 3, 3, 3, RED, None);
    ctx.draw_line_aa(3, 3, 3, 3, RED, None);
    ctx.draw_line_aa_width(3, 3, 3, 3, 4, RED, None);
    ctx.draw_line_dotted(3, 3, 3, 3, 2, 2, RED);
    let pen = registry.acquire(&pen_bmp, AccessMode::ReadOnly).unwrap();
    ctx.draw_line_penned(3, 3, 3, 3, &pen, None);
    assert!(ctx.pixels().iter().all(|&p| p == 0));
}

#[test]
fn bresenham_diagonal() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(6, 6);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_bresenham(0, 0, 3, 3, RED, None);
    ctx.release().unwrap();
    assert_eq!(written(&bmp, 6, 6), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
}

#[test]
fn bresenham_discards_pixels_outside_the_clip() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(10, 5);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_bresenham(0, 2, 9, 2, RED, Some(Rectangle::new(2, 0, 5, 5)));
    ctx.release().unwrap();
    assert_eq!(written(&bmp, 10, 5), vec![(2, 2), (3, 2), (4, 2)]);
}

#[test]
fn dda_excludes_the_end_point() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(6, 3);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_dda(0, 1, 4, 1, RED, None);
    ctx.release().unwrap();
    // the DDA walks len steps from the start, never plotting (4,1)
    assert_eq!(written(&bmp, 6, 3), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
}

#[test]
fn production_line_vertical_includes_both_ends() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(5, 5);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line(2, 0, 2, 4, RED, None);
    ctx.release().unwrap();
    assert_eq!(
        written(&bmp, 5, 5),
        vec![(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]
    );
}

#[test]
fn production_line_fully_clipped_writes_nothing() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(5, 5);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line(-10, -3, -2, -8, RED, None);
    ctx.draw_line(0, 0, 4, 4, RED, Some(Rectangle::new(8, 8, 12, 12)));
    ctx.release().unwrap();
    assert_eq!(written(&bmp, 5, 5), vec![]);
}

#[test]
fn production_line_respects_a_stride_larger_than_width() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::with_stride(5, 3, 8);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line(0, 1, 4, 1, RED, None);
    ctx.release().unwrap();
    for x in 0..5 {
        assert_eq!(bmp.pixel(x, 1), 0xffff_0000, "pixel ({},1)", x);
    }
    assert_eq!(bmp.pixel(0, 0), 0);
    assert_eq!(bmp.pixel(0, 2), 0);
}

#[test]
fn dotted_horizontal_pattern() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(10, 5);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_dotted(0, 2, 9, 2, 2, 2, RED);
    ctx.release().unwrap();
    // two on, two off, starting one pixel in (the walk skips x = 0)
    assert_eq!(
        written(&bmp, 10, 5),
        vec![(0, 2), (1, 2), (4, 2), (5, 2), (8, 2)]
    );
}

#[test]
fn dotted_vertical_pattern() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(8, 6);
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_dotted(3, 0, 3, 4, 1, 3, RED);
    ctx.release().unwrap();
    assert_eq!(written(&bmp, 8, 6), vec![(3, 0), (3, 1), (3, 2)]);
}

#[test]
fn dotted_endpoint_order_does_not_matter() {
    let registry = SurfaceRegistry::new();
    let forward = Bitmap::new(10, 5);
    let backward = Bitmap::new(10, 5);
    let mut ctx = registry.acquire(&forward, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_dotted(0, 2, 9, 2, 2, 2, RED);
    ctx.release().unwrap();
    let mut ctx = registry.acquire(&backward, AccessMode::ReadWrite).unwrap();
    ctx.draw_line_dotted(9, 2, 0, 2, 2, 2, RED);
    ctx.release().unwrap();
    assert_eq!(written(&forward, 10, 5), written(&backward, 10, 5));
}

#[test]
fn penned_line_stamps_the_pen_block() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(10, 8);
    let pen_bmp = Bitmap::new(3, 3);
    {
        let mut pen_ctx = registry.acquire(&pen_bmp, AccessMode::ReadWrite).unwrap();
        for p in pen_ctx.pixels_mut().iter_mut() {
            *p = 0xffff_ffff;
        }
    }

    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    let pen = registry.acquire(&pen_bmp, AccessMode::ReadOnly).unwrap();
    ctx.draw_line_penned(2, 2, 4, 2, &pen, None);
    pen.release().unwrap();
    ctx.release().unwrap();

    // stamps at (2,2), (3,2) and (4,2) merge into one 5x3 block
    for y in 2..5 {
        for x in 2..7 {
            assert_eq!(bmp.pixel(x, y), 0xffff_ffff, "pixel ({},{})", x, y);
        }
    }
    assert_eq!(bmp.pixel(1, 2), 0);
    assert_eq!(bmp.pixel(7, 2), 0);
    assert_eq!(bmp.pixel(2, 5), 0);
}

#[test]
fn penned_line_entirely_outside_the_y_range() {
    let registry = SurfaceRegistry::new();
    let bmp = Bitmap::new(10, 8);
    let pen_bmp = Bitmap::new(3, 3);
    {
        let mut pen_ctx = registry.acquire(&pen_bmp, AccessMode::ReadWrite).unwrap();
        for p in pen_ctx.pixels_mut().iter_mut() {
            *p = 0xffff_ffff;
        }
    }
    let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
    let pen = registry.acquire(&pen_bmp, AccessMode::ReadOnly).unwrap();
    ctx.draw_line_penned(0, -9, 9, -3, &pen, None);
    assert!(ctx.pixels().iter().all(|&p| p == 0));
}
