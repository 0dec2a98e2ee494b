//! Surface access coordination
//!
//! A [SurfaceRegistry] shares one lock/unlock cycle across nested or
//! repeated acquisitions of the same surface. The first acquire locks the
//! host resource and snapshots its buffer; later acquires only bump a
//! reference count and reuse the snapshot. The release that drops the count
//! to zero marks the surface dirty (read-write mode only) and unlocks it.
//!
//! Pixel reads and writes through an acquired context are deliberately not
//! synchronized: drawing is a single-writer model, and guarding every pixel
//! would defeat the inner loops. Only the ref-count table itself lives
//! behind a mutex.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::slice;
use std::sync::Mutex;

use log::{error, trace};

use crate::clip::Rectangle;
use crate::error::{RasterError, Result};
use crate::surface::{PixelFormat, Surface};

/// Access mode of a [SurfaceContext]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessMode {
    /// On release, do not invalidate the surface
    ReadOnly,
    /// On release, mark the full surface dirty so the host repaints it
    ReadWrite,
}

/// Identity of a host surface
///
/// Surfaces are keyed by address, mirroring the per-instance dictionaries
/// of the host environment. Stable for as long as the surface itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

impl SurfaceId {
    /// Identity of `surface`
    pub fn of(surface: &dyn Surface) -> SurfaceId {
        SurfaceId(surface as *const dyn Surface as *const () as usize)
    }
}

/// Buffer metrics captured on first acquire and reused until the count
/// returns to zero
#[derive(Copy, Clone)]
struct Snapshot {
    pixels: *mut u32,
    len: usize,
    width: i32,
    height: i32,
    stride: i32,
    format: PixelFormat,
}

// The pointer is only dereferenced through a live SurfaceContext, which
// the registry guarantees exists between lock and unlock.
unsafe impl Send for Snapshot {}

struct Entry {
    open_count: usize,
    snapshot: Snapshot,
}

/// Ref-counting coordinator for surface acquisitions
///
/// All table mutations (insert, increment, decrement, remove) run inside a
/// single mutex so concurrent acquire/release calls, on the same or
/// different surfaces, observe each transition atomically.
///
///     use rasterline::{AccessMode, Bitmap, Color, SurfaceRegistry};
///
///     let registry = SurfaceRegistry::new();
///     let bmp = Bitmap::new(5, 1);
///     let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
///     ctx.draw_line(0, 0, 4, 0, Color(0xffff_0000), None);
///     assert_eq!(&ctx.pixels()[..5], &[0xffff_0000u32; 5][..]);
///     ctx.release().unwrap();
#[derive(Default)]
pub struct SurfaceRegistry {
    table: Mutex<HashMap<SurfaceId, Entry>>,
}

impl SurfaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        SurfaceRegistry {
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire a context onto `surface`
    ///
    /// The first acquire locks the host resource; nested acquires before the
    /// matching releases reuse the lock and its cached buffer snapshot.
    pub fn acquire<'a>(
        &'a self,
        surface: &'a dyn Surface,
        mode: AccessMode,
    ) -> Result<SurfaceContext<'a>> {
        if surface.format() != PixelFormat::Pargb32 {
            return Err(RasterError::UnsupportedFormat(surface.format()));
        }
        let id = SurfaceId::of(surface);
        let mut table = self.table.lock().expect("registry mutex poisoned");
        let snapshot = match table.entry(id) {
            MapEntry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.open_count += 1;
                entry.snapshot
            }
            MapEntry::Vacant(vacant) => {
                let raw = surface.lock();
                let snapshot = Snapshot {
                    pixels: raw.pixels,
                    len: raw.len,
                    width: surface.pixel_width(),
                    height: surface.pixel_height(),
                    stride: surface.row_stride(),
                    format: surface.format(),
                };
                assert!(
                    snapshot.len >= (snapshot.stride * snapshot.height) as usize,
                    "host buffer of {} pixels cannot hold stride {} x height {}",
                    snapshot.len,
                    snapshot.stride,
                    snapshot.height
                );
                trace!(
                    "locked surface {:?}: {}x{} stride {}",
                    id,
                    snapshot.width,
                    snapshot.height,
                    snapshot.stride
                );
                vacant.insert(Entry {
                    open_count: 1,
                    snapshot,
                });
                snapshot
            }
        };
        Ok(SurfaceContext {
            registry: self,
            surface,
            mode,
            snapshot,
            released: false,
        })
    }

    /// Number of open contexts on `surface`
    pub fn open_count(&self, surface: &dyn Surface) -> usize {
        let table = self.table.lock().expect("registry mutex poisoned");
        table
            .get(&SurfaceId::of(surface))
            .map_or(0, |e| e.open_count)
    }

    fn release(&self, surface: &dyn Surface, mode: AccessMode) -> Result<()> {
        let id = SurfaceId::of(surface);
        let last = {
            let mut table = self.table.lock().expect("registry mutex poisoned");
            let entry = table
                .get_mut(&id)
                .ok_or(RasterError::ReleaseWithoutAcquire(id))?;
            entry.open_count -= 1;
            if entry.open_count == 0 {
                let snapshot = entry.snapshot;
                table.remove(&id);
                Some(snapshot)
            } else {
                None
            }
        };
        // Host callbacks run outside the table mutex; a host may re-acquire
        // from within mark_dirty.
        if let Some(snapshot) = last {
            if mode == AccessMode::ReadWrite {
                surface.mark_dirty(Rectangle::new(0, 0, snapshot.width, snapshot.height));
            }
            surface.unlock();
            trace!("unlocked surface {:?}", id);
        }
        Ok(())
    }
}

/// Value handle onto one locked surface
///
/// Created by [SurfaceRegistry::acquire], valid until released (explicitly
/// or on drop). The pixel buffer it exposes is only guaranteed for that
/// window; consuming `release` makes use-after-release unrepresentable.
pub struct SurfaceContext<'a> {
    registry: &'a SurfaceRegistry,
    surface: &'a dyn Surface,
    mode: AccessMode,
    snapshot: Snapshot,
    released: bool,
}

impl<'a> SurfaceContext<'a> {
    /// Width of the surface in pixels
    pub fn width(&self) -> i32 {
        self.snapshot.width
    }
    /// Height of the surface in pixels
    pub fn height(&self) -> i32 {
        self.snapshot.height
    }
    /// Pixels per scanline row
    pub fn stride(&self) -> i32 {
        self.snapshot.stride
    }
    /// Total number of pixels, `stride * height`
    pub fn len(&self) -> usize {
        self.snapshot.len
    }
    /// Whether the buffer holds zero pixels (never, for a live context)
    pub fn is_empty(&self) -> bool {
        self.snapshot.len == 0
    }
    /// Pixel layout of the surface
    pub fn format(&self) -> PixelFormat {
        self.snapshot.format
    }
    /// Access mode requested at acquire time
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// The pixels as premultiplied ARGB integers
    pub fn pixels(&self) -> &[u32] {
        unsafe { slice::from_raw_parts(self.snapshot.pixels, self.snapshot.len) }
    }

    /// The pixels as premultiplied ARGB integers, writable
    ///
    /// Single-writer drawing model: no two contexts may mutate the same
    /// surface concurrently. That is a caller contract, not guarded here.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        debug_assert!(
            self.mode == AccessMode::ReadWrite,
            "writing through a read-only surface context"
        );
        unsafe { slice::from_raw_parts_mut(self.snapshot.pixels, self.snapshot.len) }
    }

    /// The pixel buffer as raw bytes
    pub fn bytes(&self) -> &[u8] {
        unsafe {
            slice::from_raw_parts(self.snapshot.pixels as *const u8, self.snapshot.len * 4)
        }
    }

    /// The pixel buffer as raw bytes, writable
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        debug_assert!(
            self.mode == AccessMode::ReadWrite,
            "writing through a read-only surface context"
        );
        unsafe { slice::from_raw_parts_mut(self.snapshot.pixels as *mut u8, self.snapshot.len * 4) }
    }

    /// Zero-fill the underlying bitmap, padding included
    pub fn clear(&mut self) {
        self.pixels_mut().iter_mut().for_each(|p| *p = 0);
    }

    /// Release the context, unlocking the surface when this was the last one
    ///
    /// Dropping the context releases it as well; calling `release` instead
    /// surfaces coordinator errors the drop path can only log.
    pub fn release(mut self) -> Result<()> {
        self.release_now()
    }

    fn release_now(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.registry.release(self.surface, self.mode)
    }
}

impl Drop for SurfaceContext<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release_now() {
            error!("releasing surface context failed: {}", e);
        }
    }
}

fn check_range(offset: usize, count: usize, len: usize) -> Result<()> {
    if offset.checked_add(count).map_or(true, |end| end > len) {
        return Err(RasterError::CopyOutOfBounds { offset, count, len });
    }
    Ok(())
}

/// Copy `count` bytes from one surface to another
///
/// Offsets and count are in bytes. Ranges are validated against both
/// buffers; out-of-range requests fail without touching either surface.
/// Source and destination must not overlap.
pub fn block_copy(
    src: &SurfaceContext,
    src_offset: usize,
    dst: &mut SurfaceContext,
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check_range(src_offset, count, src.len() * 4)?;
    check_range(dst_offset, count, dst.len() * 4)?;
    dst.bytes_mut()[dst_offset..dst_offset + count]
        .copy_from_slice(&src.bytes()[src_offset..src_offset + count]);
    Ok(())
}

/// Copy `count` bytes from a byte array into a surface
pub fn block_copy_from_slice(
    src: &[u8],
    src_offset: usize,
    dst: &mut SurfaceContext,
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check_range(src_offset, count, src.len())?;
    check_range(dst_offset, count, dst.len() * 4)?;
    dst.bytes_mut()[dst_offset..dst_offset + count]
        .copy_from_slice(&src[src_offset..src_offset + count]);
    Ok(())
}

/// Copy `count` bytes from a surface into a byte array
pub fn block_copy_to_slice(
    src: &SurfaceContext,
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check_range(src_offset, count, src.len() * 4)?;
    check_range(dst_offset, count, dst.len())?;
    dst[dst_offset..dst_offset + count]
        .copy_from_slice(&src.bytes()[src_offset..src_offset + count]);
    Ok(())
}

/// Copy `count` pixels from a pixel array into a surface
///
/// Offsets and count are in whole pixels.
pub fn block_copy_from_pixels(
    src: &[u32],
    src_offset: usize,
    dst: &mut SurfaceContext,
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check_range(src_offset, count, src.len())?;
    check_range(dst_offset, count, dst.len())?;
    dst.pixels_mut()[dst_offset..dst_offset + count]
        .copy_from_slice(&src[src_offset..src_offset + count]);
    Ok(())
}

/// Copy `count` pixels from a surface into a pixel array
///
/// Offsets and count are in whole pixels.
pub fn block_copy_to_pixels(
    src: &SurfaceContext,
    src_offset: usize,
    dst: &mut [u32],
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check_range(src_offset, count, src.len())?;
    check_range(dst_offset, count, dst.len())?;
    dst[dst_offset..dst_offset + count]
        .copy_from_slice(&src.pixels()[src_offset..src_offset + count]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Bitmap;

    #[test]
    fn release_without_acquire_is_an_error() {
        let registry = SurfaceRegistry::new();
        let bmp = Bitmap::new(2, 2);
        let err = registry
            .release(&bmp, AccessMode::ReadWrite)
            .expect_err("no entry should exist");
        assert_eq!(err, RasterError::ReleaseWithoutAcquire(SurfaceId::of(&bmp)));
    }

    #[test]
    fn nested_acquire_reuses_the_lock() {
        let registry = SurfaceRegistry::new();
        let bmp = Bitmap::new(2, 2);
        let outer = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
        let inner = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
        assert_eq!(registry.open_count(&bmp), 2);
        assert!(bmp.is_locked());
        inner.release().unwrap();
        assert_eq!(registry.open_count(&bmp), 1);
        assert!(bmp.is_locked());
        outer.release().unwrap();
        assert_eq!(registry.open_count(&bmp), 0);
        assert!(!bmp.is_locked());
    }

    #[test]
    fn read_only_release_leaves_surface_clean() {
        let registry = SurfaceRegistry::new();
        let bmp = Bitmap::new(3, 2);
        let ctx = registry.acquire(&bmp, AccessMode::ReadOnly).unwrap();
        ctx.release().unwrap();
        assert_eq!(bmp.dirty_rect(), None);

        let ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
        ctx.release().unwrap();
        assert_eq!(bmp.dirty_rect(), Some(Rectangle::new(0, 0, 3, 2)));
    }

    #[test]
    fn wrong_format_is_rejected() {
        let registry = SurfaceRegistry::new();
        let bmp = Bitmap::with_format(2, 2, PixelFormat::Argb32);
        let err = registry
            .acquire(&bmp, AccessMode::ReadWrite)
            .err()
            .expect("straight alpha must be rejected");
        assert_eq!(err, RasterError::UnsupportedFormat(PixelFormat::Argb32));
        assert!(!bmp.is_locked());
    }

    #[test]
    fn copy_range_validation() {
        let registry = SurfaceRegistry::new();
        let bmp = Bitmap::new(2, 2);
        let mut ctx = registry.acquire(&bmp, AccessMode::ReadWrite).unwrap();
        let src = [0u8; 8];
        let err = block_copy_from_slice(&src, 0, &mut ctx, 12, 8).unwrap_err();
        assert_eq!(
            err,
            RasterError::CopyOutOfBounds {
                offset: 12,
                count: 8,
                len: 16
            }
        );
        // a valid copy right at the end of the buffer still succeeds
        block_copy_from_slice(&src, 0, &mut ctx, 8, 8).unwrap();
    }
}
