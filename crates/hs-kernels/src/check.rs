use hs_core::Error;

/// Validates every kernel precondition before any unchecked access.
///
/// Input longer than `width * height` is allowed (benchmark drivers slide a
/// window over one large allocation); output longer than the exact result
/// size is tolerated and only the exact prefix is written.
pub(crate) fn check_args(
    src: &[u8],
    width: usize,
    height: usize,
    dst: &[u8],
    granularity: usize,
    alignment: usize,
) -> Result<(), Error> {
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) || !width.is_multiple_of(granularity) {
        return Err(Error::InvalidDimensions {
            width,
            height,
            granularity,
        });
    }

    // A `width * height` that overflows usize can never describe a real
    // allocation; treat it as a dimension error.
    let in_len = width.checked_mul(height).ok_or(Error::InvalidDimensions {
        width,
        height,
        granularity,
    })?;
    if src.len() < in_len {
        return Err(Error::BufferTooSmall {
            expected: in_len,
            actual: src.len(),
        });
    }

    let out_len = (width / 2) * (height / 2);
    if dst.len() < out_len {
        return Err(Error::BufferTooSmall {
            expected: out_len,
            actual: dst.len(),
        });
    }

    if !(src.as_ptr() as usize).is_multiple_of(alignment)
        || !(dst.as_ptr() as usize).is_multiple_of(alignment)
    {
        return Err(Error::Misaligned {
            required: alignment,
        });
    }

    Ok(())
}
