//! Font loading, fuzzy name resolution, text layout and glyph
//! rasterization into caller-supplied 8-bit alpha buffers.
//!
//! The crate is built around a two-step protocol:
//!
//! 1. [`FontSystem::measure`] lays out UTF-16 text (word wrap, kerning,
//!    bearing rules, multi-line bounding box, top correction) and returns a
//!    [`LayoutResult`] with one placement per code unit plus the bitmap
//!    dimensions.
//! 2. [`FontSystem::composite`] stamps those placements into a buffer the
//!    caller sized from the measured dimensions; [`FontSystem::render`]
//!    does both in one call over a fresh [`Bitmap`].
//!
//! Fonts load by file path or by installed-font name; names resolve against
//! the host catalog by edit distance, so close misspellings still land on
//! the intended face. Each `(file, face index)` pair is resident at most
//! once and file bytes are shared between faces of the same file.
//!
//! Everything is synchronous and single-threaded: loading and resolving
//! take `&mut FontSystem`, measuring and compositing borrow immutably and
//! share no scratch state, so concurrent use means a caller-held lock.
//!
//! ```no_run
//! use textraster::FontSystem;
//!
//! # fn main() -> Result<(), textraster::FontError> {
//! let mut fonts = FontSystem::new();
//! let handle = fonts.load("DejaVu Sans")?;
//! let bitmap = fonts.render(handle, "hello", 24, 0, 1.5)?;
//! assert_eq!(bitmap.alphas.len(), (bitmap.width * bitmap.height) as usize);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod compose;
pub mod error;
pub mod layout;
pub mod raster;
pub mod system;

pub use cache::{FontHandle, FontStore};
pub use catalog::{CatalogEntry, NameResolver};
pub use compose::composite;
pub use error::FontError;
pub use layout::{measure, GlyphPlacement, LayoutResult};
pub use system::{points_to_pixels, Bitmap, FontSystem};
