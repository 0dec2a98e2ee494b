
/// How does this work
///    registry = SurfaceRegistry::new()
///    ctx = registry.acquire(surface, mode)
///       first acquire locks the host bitmap and snapshots its buffer,
///       later acquires only bump a ref count and reuse the snapshot
///    ctx.draw_line*(...)
///       resolve clip rect (given, else full surface)
///       clip_line()                 -- Cohen-Sutherland, f64 core
///       step loop                   -- integer / float / fixed-point
///         alpha_blend()             -- premultiplied "over"
///         blend_coverage()          -- coverage-weighted variant
///    ctx.release()
///       count hits zero: mark dirty (ReadWrite only), unlock

pub mod aa;
pub mod blend;
pub mod clip;
pub mod color;
pub mod context;
pub mod dotted;
pub mod error;
pub mod line;
pub mod pen;
pub mod surface;

pub use blend::*;
pub use clip::*;
pub use color::*;
pub use context::*;
pub use error::*;
pub use surface::*;
