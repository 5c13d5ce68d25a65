//! Foundational primitives for the half-sample kernel family.
//!
//! ## Image layout
//! Images are 8-bit single-channel, row-major, and tightly packed: the row
//! stride always equals the width. The packed kernels depend on this layout
//! to treat consecutive rows as word-addressable runs.
//!
//! ## Errors
//! [`Error`] covers image construction ([`Error::SizeMismatch`]) and the
//! kernel precondition checks: dimensions, buffer sizes, and base-address
//! alignment are validated before any unchecked pixel access.

mod error;
mod image;

pub use error::Error;
pub use image::{Image, ImageView};
