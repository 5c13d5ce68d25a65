//! Umbrella crate for the `half-sample` workspace.
//!
//! Re-exports the image primitives and the kernel family. The benchmark
//! driver lives in the separate `hs-bench` binary crate.

pub use hs_core::*;
pub use hs_kernels::*;
