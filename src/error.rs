//! Contract-violation errors
//!
//! Degenerate geometry is never an error: a zero-length or fully clipped
//! segment makes the rasterizers return early with zero pixels written.
//! Errors are reserved for misuse of the coordinator and the bulk memory
//! helpers, where the original behavior would have been silent corruption.

use crate::context::SurfaceId;
use crate::surface::PixelFormat;

use thiserror::Error;

/// Error raised on misuse of the surface coordinator or bulk copies
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// A release was requested for a surface with no open context
    #[error("release without a matching acquire for surface {0:?}")]
    ReleaseWithoutAcquire(SurfaceId),
    /// An offset/count pair runs past the end of a buffer
    #[error("copy range out of bounds: offset {offset} + count {count} > buffer length {len}")]
    CopyOutOfBounds {
        /// Requested start of the range
        offset: usize,
        /// Requested length of the range
        count: usize,
        /// Actual buffer length
        len: usize,
    },
    /// The surface does not carry premultiplied ARGB32 pixels
    #[error("unsupported pixel format {0:?}, expected Pargb32")]
    UnsupportedFormat(PixelFormat),
}

/// Result alias for coordinator and copy operations
pub type Result<T> = std::result::Result<T, RasterError>;
