//! Kernel registry and auto-dispatch.
//!
//! One ordered collection of descriptors replaces parallel name/function
//! tables: harnesses iterate the same sequence for correctness checks and
//! benchmarks, so names can never drift out of step with callables. The
//! vector kernel registers itself only on targets that provide 128-bit
//! integer vectors; there is no runtime capability probing.

use hs_core::Error;

use crate::check::check_args;
use crate::packed;
use crate::scalar;
#[cfg(target_arch = "x86_64")]
use crate::vector;

pub type KernelFn = fn(&[u8], usize, usize, &mut [u8]) -> Result<(), Error>;

/// One half-sample kernel variant: display name, its width-divisibility and
/// base-address alignment preconditions, and the callable itself.
#[derive(Debug, Clone, Copy)]
pub struct KernelDesc {
    pub name: &'static str,
    /// Required width divisibility.
    pub granularity: usize,
    /// Required input/output base-address alignment in bytes.
    pub alignment: usize,
    pub func: KernelFn,
}

impl KernelDesc {
    /// Reports whether a call with these buffers would pass validation.
    pub fn supports(&self, src: &[u8], width: usize, height: usize, dst: &[u8]) -> bool {
        check_args(src, width, height, dst, self.granularity, self.alignment).is_ok()
    }

    pub fn run(
        &self,
        src: &[u8],
        width: usize,
        height: usize,
        dst: &mut [u8],
    ) -> Result<(), Error> {
        (self.func)(src, width, height, dst)
    }
}

/// All kernel variants available on this target, fastest first. The scalar
/// reference is always last and accepts every even-dimension image.
pub fn kernels() -> Vec<KernelDesc> {
    let mut table = Vec::with_capacity(5);

    #[cfg(target_arch = "x86_64")]
    table.push(KernelDesc {
        name: "half_sample_sse2",
        granularity: vector::VECTOR_GRANULARITY,
        alignment: vector::VECTOR_ALIGNMENT,
        func: vector::half_sample_sse2,
    });

    table.push(KernelDesc {
        name: "half_sample_u64",
        granularity: packed::U64_GRANULARITY,
        alignment: packed::U64_ALIGNMENT,
        func: packed::half_sample_u64,
    });
    table.push(KernelDesc {
        name: "half_sample_u32x2",
        granularity: packed::U32X2_GRANULARITY,
        alignment: packed::U32X2_ALIGNMENT,
        func: packed::half_sample_u32x2,
    });
    table.push(KernelDesc {
        name: "half_sample_u32",
        granularity: packed::U32_GRANULARITY,
        alignment: packed::U32_ALIGNMENT,
        func: packed::half_sample_u32,
    });
    table.push(KernelDesc {
        name: "half_sample_scalar",
        granularity: scalar::SCALAR_GRANULARITY,
        alignment: scalar::SCALAR_ALIGNMENT,
        func: scalar::half_sample_scalar,
    });

    table
}

/// Half-samples with the fastest kernel whose preconditions hold for these
/// buffers and dimensions, falling back to the scalar reference.
pub fn half_sample(src: &[u8], width: usize, height: usize, dst: &mut [u8]) -> Result<(), Error> {
    for kernel in kernels() {
        if kernel.supports(src, width, height, dst) {
            return kernel.run(src, width, height, dst);
        }
    }

    // Nothing applies, so the dimensions themselves must be invalid; let the
    // scalar kernel surface the validation error.
    scalar::half_sample_scalar(src, width, height, dst)
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng, rngs::StdRng};

    use super::{half_sample, kernels};
    use crate::aligned::AlignedBuf;
    use crate::scalar::half_sample_scalar;
    use hs_core::Error;

    fn random_image(width: usize, height: usize, seed: u64) -> AlignedBuf {
        let mut buf = AlignedBuf::zeroed(width * height);
        StdRng::seed_from_u64(seed).fill_bytes(buf.as_mut_slice());
        buf
    }

    #[test]
    fn scalar_reference_is_always_registered_last() {
        let table = kernels();
        assert!(!table.is_empty());
        let last = table.last().expect("non-empty table");
        assert_eq!(last.name, "half_sample_scalar");
        assert_eq!(last.granularity, 2);
        assert_eq!(last.alignment, 1);
    }

    #[test]
    fn every_kernel_matches_scalar_on_random_1280x720() {
        let width = 1280usize;
        let height = 720usize;
        let src = random_image(width, height, 7);
        let out_len = (width / 2) * (height / 2);

        let mut reference = AlignedBuf::zeroed(out_len);
        half_sample_scalar(src.as_slice(), width, height, reference.as_mut_slice())
            .expect("valid args");

        for kernel in kernels() {
            assert!(kernel.supports(src.as_slice(), width, height, reference.as_slice()));
            let mut out = AlignedBuf::zeroed(out_len);
            kernel
                .run(src.as_slice(), width, height, out.as_mut_slice())
                .expect("valid args");
            assert_eq!(
                out.as_slice(),
                reference.as_slice(),
                "kernel {} disagrees with scalar reference",
                kernel.name
            );
        }
    }

    #[test]
    fn every_kernel_writes_every_output_byte() {
        let width = 64usize;
        let height = 4usize;
        let src = random_image(width, height, 11);
        let out_len = (width / 2) * (height / 2);

        for kernel in kernels() {
            // Two runs with different sentinel fills must agree, so no
            // output byte can survive from before the call.
            let mut out_a = AlignedBuf::zeroed(out_len);
            out_a.as_mut_slice().fill(0xAA);
            let mut out_b = AlignedBuf::zeroed(out_len);
            out_b.as_mut_slice().fill(0x55);

            kernel
                .run(src.as_slice(), width, height, out_a.as_mut_slice())
                .expect("valid args");
            kernel
                .run(src.as_slice(), width, height, out_b.as_mut_slice())
                .expect("valid args");
            assert_eq!(out_a.as_slice(), out_b.as_slice(), "kernel {}", kernel.name);
        }
    }

    #[test]
    fn minimum_width_images_stay_in_bounds() {
        for kernel in kernels() {
            let width = kernel.granularity.max(2);
            let height = 2usize;
            // Exactly sized buffers: any read or write past the end would
            // land outside the allocations.
            let src = random_image(width, height, width as u64);
            let mut out = AlignedBuf::zeroed(width / 2);
            kernel
                .run(src.as_slice(), width, height, out.as_mut_slice())
                .expect("valid args");

            let mut reference = vec![0u8; width / 2];
            half_sample_scalar(src.as_slice(), width, height, &mut reference)
                .expect("valid args");
            assert_eq!(out.as_slice(), reference.as_slice(), "kernel {}", kernel.name);
        }
    }

    #[test]
    fn zero_height_is_a_no_op() {
        // Empty images are valid; no kernel may touch (or even offset into)
        // either buffer before its row loop runs.
        for kernel in kernels() {
            let src = AlignedBuf::zeroed(0);
            let mut out = AlignedBuf::zeroed(0);
            kernel
                .run(src.as_slice(), kernel.granularity.max(2), 0, out.as_mut_slice())
                .expect("empty image is valid");
        }
    }

    #[test]
    fn oversized_output_tail_is_untouched() {
        let width = 32usize;
        let height = 4usize;
        let src = random_image(width, height, 13);
        let out_len = (width / 2) * (height / 2);

        for kernel in kernels() {
            let mut out = AlignedBuf::zeroed(out_len + 8);
            out.as_mut_slice().fill(0xEE);
            kernel
                .run(src.as_slice(), width, height, out.as_mut_slice())
                .expect("valid args");
            assert!(
                out.as_slice()[out_len..].iter().all(|&b| b == 0xEE),
                "kernel {} wrote past the exact output size",
                kernel.name
            );
        }
    }

    #[test]
    fn kernels_do_not_mutate_input() {
        let width = 32usize;
        let height = 4usize;
        let src = random_image(width, height, 3);
        let before = src.as_slice().to_vec();

        for kernel in kernels() {
            let mut out = AlignedBuf::zeroed((width / 2) * (height / 2));
            kernel
                .run(src.as_slice(), width, height, out.as_mut_slice())
                .expect("valid args");
        }
        assert_eq!(src.as_slice(), before.as_slice());
    }

    #[test]
    fn auto_dispatch_matches_scalar() {
        let width = 96usize;
        let height = 6usize;
        let src = random_image(width, height, 5);
        let out_len = (width / 2) * (height / 2);

        let mut out = AlignedBuf::zeroed(out_len);
        half_sample(src.as_slice(), width, height, out.as_mut_slice()).expect("valid args");

        let mut reference = vec![0u8; out_len];
        half_sample_scalar(src.as_slice(), width, height, &mut reference).expect("valid args");
        assert_eq!(out.as_slice(), reference.as_slice());
    }

    #[test]
    fn auto_dispatch_falls_back_to_scalar() {
        // Width 6 defeats every packed granularity (4, 8, 32), leaving only
        // the scalar kernel applicable.
        let width = 6usize;
        let height = 2usize;
        let mut src = vec![0u8; width * height];
        StdRng::seed_from_u64(9).fill_bytes(&mut src);

        let mut out = vec![0u8; 3];
        half_sample(&src, width, height, &mut out).expect("scalar fallback");

        let mut reference = vec![0u8; 3];
        half_sample_scalar(&src, width, height, &mut reference).expect("valid args");
        assert_eq!(out, reference);
    }

    #[test]
    fn auto_dispatch_surfaces_invalid_dimensions() {
        let src = vec![0u8; 15];
        let mut out = vec![0u8; 3];
        let err = half_sample(&src, 5, 3, &mut out).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDimensions {
                width: 5,
                height: 3,
                granularity: 2,
            }
        );
    }
}
