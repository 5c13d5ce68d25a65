//! Word-packed half-sample kernels.
//!
//! All three variants run the same lane algorithm at different word widths:
//! split a word of consecutive bytes into even- and odd-indexed byte lanes
//! with a repeating `0x00FF` mask, sum top/bottom/even/odd lanes plus a
//! rounding bias of 2 inside 16-bit accumulation slots, shift right by 2,
//! re-mask, then repack the averaged low bytes into a contiguous half-width
//! word. Words are interpreted little-endian so lane positions match byte
//! positions on every target.

use hs_core::Error;

use crate::check::check_args;

pub const U32_GRANULARITY: usize = 4;
pub const U32_ALIGNMENT: usize = 4;
pub const U32X2_GRANULARITY: usize = 8;
pub const U32X2_ALIGNMENT: usize = 4;
pub const U64_GRANULARITY: usize = 8;
pub const U64_ALIGNMENT: usize = 8;

const MASK_00FF_32: u32 = 0x00FF_00FF;
const BIAS_32: u32 = 0x0002_0002;
const MASK_00FF_64: u64 = 0x00FF_00FF_00FF_00FF;
const BIAS_64: u64 = 0x0002_0002_0002_0002;

/// Averages one 32-bit word (two 2x2 blocks worth of one row pair) into two
/// packed output bytes.
#[inline]
fn average_u32(top: u32, bottom: u32) -> u16 {
    let top_even = top & MASK_00FF_32;
    let top_odd = (top >> 8) & MASK_00FF_32;
    let bottom_even = bottom & MASK_00FF_32;
    let bottom_odd = (bottom >> 8) & MASK_00FF_32;

    // Each 16-bit slot holds a value in [0, 1020] plus the bias.
    let totals = top_even + top_odd + bottom_even + bottom_odd + BIAS_32;
    let average = (totals >> 2) & MASK_00FF_32;

    // Collapse the two averaged bytes into the low 16 bits.
    (((average >> 8) | average) & 0xFFFF) as u16
}

/// 32-bit packed kernel: 4 input bytes per word per row, 2 output bytes per
/// iteration. Requires `width % 4 == 0` and 4-byte aligned buffers.
pub fn half_sample_u32(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
) -> Result<(), Error> {
    check_args(src, width, height, dst, U32_GRANULARITY, U32_ALIGNMENT)?;

    let x_blocks = width / 4;
    let out_h = height / 2;

    // SAFETY: `check_args` guarantees buffer extents, even dimensions,
    // `width % 4 == 0`, and 4-byte alignment of both base addresses. Row
    // pointers are re-derived from the base per output row, so no offset
    // leaves the allocations; within a row `top` and `bottom` advance by 4
    // and `out` by 2, so every u32 read is 4-aligned and every u16 write is
    // 2-aligned.
    unsafe {
        let out_w = width / 2;

        for y in 0..out_h {
            let mut top = src.as_ptr().add((2 * y) * width);
            let mut bottom = top.add(width);
            let mut out = dst.as_mut_ptr().add(y * out_w);

            for _x in 0..x_blocks {
                let top_vals = u32::from_le(top.cast::<u32>().read());
                let bottom_vals = u32::from_le(bottom.cast::<u32>().read());

                let out2 = average_u32(top_vals, bottom_vals);
                out.cast::<u16>().write(out2.to_le());

                top = top.add(4);
                bottom = bottom.add(4);
                out = out.add(2);
            }
        }
    }

    Ok(())
}

/// Doubled 32-bit kernel: two 32-bit lane computations per outer step,
/// merged into one 4-byte output store. Requires `width % 8 == 0` and
/// 4-byte aligned buffers.
pub fn half_sample_u32x2(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
) -> Result<(), Error> {
    check_args(src, width, height, dst, U32X2_GRANULARITY, U32X2_ALIGNMENT)?;

    let x_blocks = width / 8;
    let out_h = height / 2;

    // SAFETY: `check_args` guarantees buffer extents, even dimensions,
    // `width % 8 == 0`, and 4-byte alignment. Row pointers are re-derived
    // from the base per output row, so no offset leaves the allocations;
    // within a row `top` and `bottom` advance by 8 per iteration (two u32
    // reads each) and `out` by 4, so all reads and writes are 4-aligned.
    unsafe {
        let out_w = width / 2;

        for y in 0..out_h {
            let mut top = src.as_ptr().add((2 * y) * width);
            let mut bottom = top.add(width);
            let mut out = dst.as_mut_ptr().add(y * out_w);

            for _x in 0..x_blocks {
                let top_1 = u32::from_le(top.cast::<u32>().read());
                let bottom_1 = u32::from_le(bottom.cast::<u32>().read());
                let top_2 = u32::from_le(top.add(4).cast::<u32>().read());
                let bottom_2 = u32::from_le(bottom.add(4).cast::<u32>().read());

                let lo = average_u32(top_1, bottom_1) as u32;
                let hi = average_u32(top_2, bottom_2) as u32;
                let out4 = lo | (hi << 16);
                out.cast::<u32>().write(out4.to_le());

                top = top.add(8);
                bottom = bottom.add(8);
                out = out.add(4);
            }
        }
    }

    Ok(())
}

/// 64-bit packed kernel: 8 input bytes per word per row, 4 output bytes per
/// iteration. Requires `width % 8 == 0` and 8-byte aligned buffers.
pub fn half_sample_u64(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
) -> Result<(), Error> {
    check_args(src, width, height, dst, U64_GRANULARITY, U64_ALIGNMENT)?;

    let x_blocks = width / 8;
    let out_h = height / 2;

    // SAFETY: `check_args` guarantees buffer extents, even dimensions,
    // `width % 8 == 0`, and 8-byte alignment. Row pointers are re-derived
    // from the base per output row, so no offset leaves the allocations;
    // within a row `top` and `bottom` advance by 8 and `out` by 4, so u64
    // reads stay 8-aligned and u32 writes 4-aligned.
    unsafe {
        let out_w = width / 2;

        for y in 0..out_h {
            let mut top = src.as_ptr().add((2 * y) * width);
            let mut bottom = top.add(width);
            let mut out = dst.as_mut_ptr().add(y * out_w);

            for _x in 0..x_blocks {
                let top_vals = u64::from_le(top.cast::<u64>().read());
                let bottom_vals = u64::from_le(bottom.cast::<u64>().read());

                let top_even = top_vals & MASK_00FF_64;
                let top_odd = (top_vals >> 8) & MASK_00FF_64;
                let bottom_even = bottom_vals & MASK_00FF_64;
                let bottom_odd = (bottom_vals >> 8) & MASK_00FF_64;

                let totals = top_even + top_odd + bottom_even + bottom_odd + BIAS_64;
                let average = (totals >> 2) & MASK_00FF_64;

                // Pack the four averaged bytes into the low 32 bits: gather
                // each 16-bit group's low byte pair, then fold the two
                // 32-bit halves together.
                let shift_1 = (average >> 8) | average;
                let shift_1_masked = shift_1 & 0x0000_FFFF_0000_FFFF;
                let out4 = (shift_1_masked as u32) | ((shift_1_masked >> 16) as u32);

                out.cast::<u32>().write(out4.to_le());

                top = top.add(8);
                bottom = bottom.add(8);
                out = out.add(4);
            }
        }
    }

    Ok(())
}
