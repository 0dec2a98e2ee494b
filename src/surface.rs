//! Host bitmap surfaces
//!
//! Pixel memory belongs to the host bitmap resource for its full lifetime;
//! the rasterization core only ever borrows it between `lock` and `unlock`.
//! [Surface] is the capability set the core consumes, [Bitmap] the owned
//! reference implementation used by hosts without a native bitmap type.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::clip::Rectangle;

/// Pixel memory layout of a host surface
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32-bit premultiplied ARGB, 8 bits per channel, alpha in the top byte
    ///
    /// The only format the rasterizers accept.
    Pargb32,
    /// 32-bit straight (non-premultiplied) ARGB
    Argb32,
}

/// Borrowed view of a locked pixel buffer
///
/// Valid strictly between the `lock` call that produced it and the matching
/// `unlock`.
#[derive(Debug, Copy, Clone)]
pub struct RawBuffer {
    /// First pixel of the buffer
    pub pixels: *mut u32,
    /// Total number of pixels, `row_stride * pixel_height`
    pub len: usize,
}

/// Capability set the core consumes from a host bitmap resource
///
/// The core never depends on a concrete GUI bitmap type, only on this
/// surface contract. A pen/stamp bitmap satisfies the same contract and is
/// acquired in read-only mode.
pub trait Surface {
    /// Width of the visible region in pixels
    fn pixel_width(&self) -> i32;
    /// Height of the visible region in pixels
    fn pixel_height(&self) -> i32;
    /// Pixels per scanline row; may exceed `pixel_width` due to padding
    fn row_stride(&self) -> i32;
    /// Layout of the pixel memory
    fn format(&self) -> PixelFormat;
    /// Lock the backing store and expose its pixels
    fn lock(&self) -> RawBuffer;
    /// Release the backing store; the last [RawBuffer] becomes invalid
    fn unlock(&self);
    /// Report a region as modified so the host can repaint it
    fn mark_dirty(&self, rect: Rectangle<i32>);
}

/// Owned ARGB32 premultiplied bitmap implementing [Surface]
///
/// Stand-in for a host GUI bitmap: a contiguous `u32` pixel buffer with a
/// row stride that may exceed the visible width.
///
///     use rasterline::{Bitmap, Surface};
///
///     let bmp = Bitmap::new(320, 200);
///     assert_eq!(bmp.pixel_width(), 320);
///     assert_eq!(bmp.row_stride(), 320);
///     assert!(!bmp.is_locked());
pub struct Bitmap {
    data: UnsafeCell<Box<[u32]>>,
    width: i32,
    height: i32,
    stride: i32,
    format: PixelFormat,
    locked: AtomicBool,
    dirty: Mutex<Option<Rectangle<i32>>>,
}

// The UnsafeCell is only reached through a locked RawBuffer; concurrent
// mutation of one surface is the callers' single-writer contract.
unsafe impl Sync for Bitmap {}

impl Bitmap {
    /// Create a new bitmap of width x height with stride == width
    ///
    /// Pixels are zero-initialized (transparent black).
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_stride(width, height, width)
    }

    /// Create a new bitmap with a row stride larger than the visible width
    pub fn with_stride(width: i32, height: i32, stride: i32) -> Self {
        assert!(
            width > 0 && height > 0 && stride >= width,
            "cannot create bitmap {}x{} with stride {}",
            width,
            height,
            stride
        );
        Bitmap {
            data: UnsafeCell::new(vec![0u32; (stride * height) as usize].into_boxed_slice()),
            width,
            height,
            stride,
            format: PixelFormat::Pargb32,
            locked: AtomicBool::new(false),
            dirty: Mutex::new(None),
        }
    }

    /// Create a bitmap claiming a different pixel format
    ///
    /// The coordinator rejects anything but [PixelFormat::Pargb32].
    pub fn with_format(width: i32, height: i32, format: PixelFormat) -> Self {
        let mut bmp = Self::new(width, height);
        bmp.format = format;
        bmp
    }

    /// Whether the backing store is currently locked
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Last region reported through `mark_dirty`, if any
    pub fn dirty_rect(&self) -> Option<Rectangle<i32>> {
        *self.dirty.lock().expect("dirty rect mutex poisoned")
    }

    /// Read one pixel directly from the backing store
    ///
    /// Diagnostic path; must not race a live read-write context.
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        assert!(x >= 0 && x < self.width, "x {} outside 0..{}", x, self.width);
        assert!(y >= 0 && y < self.height, "y {} outside 0..{}", y, self.height);
        let data = unsafe { &*self.data.get() };
        data[(y * self.stride + x) as usize]
    }
}

impl Surface for Bitmap {
    fn pixel_width(&self) -> i32 {
        self.width
    }
    fn pixel_height(&self) -> i32 {
        self.height
    }
    fn row_stride(&self) -> i32 {
        self.stride
    }
    fn format(&self) -> PixelFormat {
        self.format
    }
    fn lock(&self) -> RawBuffer {
        let was_locked = self.locked.swap(true, Ordering::SeqCst);
        debug_assert!(!was_locked, "bitmap locked twice");
        let data = unsafe { &mut *self.data.get() };
        RawBuffer {
            pixels: data.as_mut_ptr(),
            len: data.len(),
        }
    }
    fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }
    fn mark_dirty(&self, rect: Rectangle<i32>) {
        *self.dirty.lock().expect("dirty rect mutex poisoned") = Some(rect);
    }
}
