//! 2x2 box-filter half-sampling kernels for 8-bit single-channel images.
//!
//! Every kernel computes the same transform: each output byte is the
//! round-half-up average `(a + b + c + d + 2) >> 2` of one non-overlapping
//! 2x2 input block. The variants trade stricter width-divisibility and
//! alignment preconditions for throughput:
//!
//! | kernel               | width multiple | alignment | bytes/iteration |
//! |----------------------|----------------|-----------|-----------------|
//! | `half_sample_scalar` | 2              | 1         | 4 in, 1 out     |
//! | `half_sample_u32`    | 4              | 4         | 8 in, 2 out     |
//! | `half_sample_u32x2`  | 8              | 4         | 16 in, 4 out    |
//! | `half_sample_u64`    | 8              | 8         | 16 in, 4 out    |
//! | `half_sample_sse2`   | 32             | 16        | 64 in, 16 out   |
//!
//! Preconditions are validated up front and reported as [`hs_core::Error`];
//! for any input that passes validation, every kernel's output is
//! byte-identical to the scalar reference.
//!
//! [`kernels`] exposes the variants as one ordered descriptor table and
//! [`half_sample`] dispatches to the fastest applicable one.

mod aligned;
mod check;
mod packed;
mod pyramid;
mod registry;
mod scalar;
#[cfg(target_arch = "x86_64")]
mod vector;

pub use aligned::AlignedBuf;
pub use packed::{half_sample_u32, half_sample_u32x2, half_sample_u64};
pub use pyramid::PyramidU8;
pub use registry::{KernelDesc, KernelFn, half_sample, kernels};
pub use scalar::half_sample_scalar;
#[cfg(target_arch = "x86_64")]
pub use vector::half_sample_sse2;
