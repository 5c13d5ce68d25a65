//! 128-bit vector half-sample kernel.
//!
//! Same even/odd lane algorithm as the word-packed kernels, widened to 16
//! byte lanes per register. Each outer iteration consumes two 16-byte loads
//! from the top row and two from the bottom row (32 input bytes) and emits
//! one 16-byte store. SSE2 has no instruction that both averages and narrows
//! 16-bit lanes in one step, so the kernel computes two 8-lane 16-bit
//! averages and narrows them with `_mm_packus_epi16`, which picks every low
//! byte from the two source vectors in left-to-right order (exact here:
//! every averaged lane is at most 255, so unsigned saturation never fires).

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_add_epi16, _mm_and_si128, _mm_load_si128, _mm_packus_epi16, _mm_set1_epi16,
    _mm_srli_epi16, _mm_store_si128,
};

use hs_core::Error;

use crate::check::check_args;

pub const VECTOR_GRANULARITY: usize = 32;
pub const VECTOR_ALIGNMENT: usize = 16;

/// 128-bit vector kernel: 32 input bytes per iteration, 16 output bytes.
/// Requires `width % 32 == 0` and 16-byte aligned buffers.
#[cfg(target_arch = "x86_64")]
pub fn half_sample_sse2(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
) -> Result<(), Error> {
    check_args(src, width, height, dst, VECTOR_GRANULARITY, VECTOR_ALIGNMENT)?;

    let x_blocks = width / 32;
    let out_h = height / 2;

    // SAFETY: `check_args` guarantees buffer extents, even dimensions,
    // `width % 32 == 0`, and 16-byte alignment. Row pointers are re-derived
    // from the base per output row, so no offset leaves the allocations;
    // within a row `top` and `bottom` advance by 32 per iteration (two
    // aligned loads each) and `out` by 16 (one aligned store), so every
    // access is 16-aligned. SSE2 is part of the x86_64 baseline, so the
    // intrinsics are always available.
    unsafe {
        let mask_00ff = _mm_set1_epi16(0x00FF);
        let bias = _mm_set1_epi16(0x0002);
        let out_w = width / 2;

        for y in 0..out_h {
            let mut top = src.as_ptr().add((2 * y) * width);
            let mut bottom = top.add(width);
            let mut out = dst.as_mut_ptr().add(y * out_w);

            for _x in 0..x_blocks {
                let top_1 = _mm_load_si128(top.cast::<__m128i>());
                let bottom_1 = _mm_load_si128(bottom.cast::<__m128i>());
                let top_2 = _mm_load_si128(top.add(16).cast::<__m128i>());
                let bottom_2 = _mm_load_si128(bottom.add(16).cast::<__m128i>());

                let average_1 = average_lanes(top_1, bottom_1, mask_00ff, bias);
                let average_2 = average_lanes(top_2, bottom_2, mask_00ff, bias);

                // Narrow 2x8 sixteen-bit lanes to 16 byte lanes; lane order
                // is `average_1` columns then `average_2` columns, matching
                // left-to-right output order.
                let out16 = _mm_packus_epi16(average_1, average_2);
                _mm_store_si128(out.cast::<__m128i>(), out16);

                top = top.add(32);
                bottom = bottom.add(32);
                out = out.add(16);
            }
        }
    }

    Ok(())
}

/// Sums even/odd byte lanes of one top/bottom vector pair plus the rounding
/// bias and divides each 16-bit slot by 4.
#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn average_lanes(
    top: __m128i,
    bottom: __m128i,
    mask_00ff: __m128i,
    bias: __m128i,
) -> __m128i {
    // SAFETY: Pure register arithmetic on SSE2 (x86_64 baseline).
    unsafe {
        let top_even = _mm_and_si128(top, mask_00ff);
        let top_odd = _mm_srli_epi16(top, 8);
        let bottom_even = _mm_and_si128(bottom, mask_00ff);
        let bottom_odd = _mm_srli_epi16(bottom, 8);

        let totals = _mm_add_epi16(
            _mm_add_epi16(top_even, top_odd),
            _mm_add_epi16(_mm_add_epi16(bottom_even, bottom_odd), bias),
        );
        _mm_srli_epi16(totals, 2)
    }
}
