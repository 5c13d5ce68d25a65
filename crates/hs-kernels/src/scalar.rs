use hs_core::Error;

use crate::check::check_args;

pub const SCALAR_GRANULARITY: usize = 2;
pub const SCALAR_ALIGNMENT: usize = 1;

/// Byte-at-a-time reference kernel.
///
/// Writes `dst[x, y] = (src[2x, 2y] + src[2x+1, 2y] + src[2x, 2y+1] +
/// src[2x+1, 2y+1] + 2) >> 2` for every output position. Every other kernel
/// must match this output byte-for-byte.
pub fn half_sample_scalar(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &mut [u8],
) -> Result<(), Error> {
    check_args(src, width, height, dst, SCALAR_GRANULARITY, SCALAR_ALIGNMENT)?;
    // SAFETY: `check_args` guarantees `src.len() >= width * height`,
    // `dst.len() >= (width / 2) * (height / 2)`, and even dimensions.
    unsafe {
        half_sample_scalar_unchecked(src.as_ptr(), width, height, dst.as_mut_ptr());
    }
    Ok(())
}

/// # Safety
/// `src` must be readable for `width * height` bytes, `dst` writable for
/// `(width / 2) * (height / 2)` bytes, and `width`/`height` even.
unsafe fn half_sample_scalar_unchecked(src: *const u8, width: usize, height: usize, dst: *mut u8) {
    let out_w = width / 2;
    let out_h = height / 2;

    // SAFETY: Caller guarantees the buffer extents. Row pointers are derived
    // from the base for each output row, so no offset ever goes past
    // one-past-the-end: `bottom` ends at most at `src + width * height` on
    // the last row, and nothing is offset at all when `out_h == 0`.
    unsafe {
        for y in 0..out_h {
            let mut top = src.add((2 * y) * width);
            let mut bottom = top.add(width);
            let mut out = dst.add(y * out_w);

            for _x in 0..out_w {
                let sum = (*top as u32)
                    + (*top.add(1) as u32)
                    + (*bottom as u32)
                    + (*bottom.add(1) as u32);
                *out = ((sum + 2) >> 2) as u8;
                top = top.add(2);
                bottom = bottom.add(2);
                out = out.add(1);
            }
        }
    }
}
