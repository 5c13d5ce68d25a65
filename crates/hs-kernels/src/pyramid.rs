use hs_core::{Image, ImageView};

use crate::registry::half_sample;

/// Reusable u8 image pyramid built by repeated half-sampling.
///
/// Level 0 is a copy of the input. Each next level is the 2x2 round-half-up
/// average of the previous one, computed by the fastest applicable kernel.
///
/// The kernels only accept even dimensions, so building stops before a level
/// whose width or height would be odd or smaller than 2.
#[derive(Debug, Default, Clone)]
pub struct PyramidU8 {
    levels: Vec<Image>,
}

impl PyramidU8 {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Ensures that internal buffers match the size chain implied by
    /// `(base_w, base_h, num_levels)`: `(w, h), (w/2, h/2), ...`.
    pub fn ensure(&mut self, base_w: usize, base_h: usize, num_levels: usize) {
        if num_levels == 0 {
            self.levels.clear();
            return;
        }

        self.levels.truncate(num_levels);
        self.levels
            .resize_with(num_levels, || Image::new_fill(0, 0, 0));

        let mut w = base_w;
        let mut h = base_h;
        for level in &mut self.levels {
            if level.width() != w || level.height() != h {
                *level = Image::new_fill(w, h, 0);
            }
            w /= 2;
            h /= 2;
        }
    }

    pub fn build(&mut self, src: &ImageView<'_>, num_levels: usize) {
        let build_levels = max_build_levels(src.width(), src.height(), num_levels);
        if build_levels == 0 {
            self.levels.clear();
            return;
        }

        self.ensure(src.width(), src.height(), build_levels);
        self.levels[0].data_mut().copy_from_slice(src.data());

        for level_idx in 1..build_levels {
            let (prev_levels, curr_and_tail) = self.levels.split_at_mut(level_idx);
            let prev = &prev_levels[level_idx - 1];
            let curr = &mut curr_and_tail[0];
            half_sample(prev.data(), prev.width(), prev.height(), curr.data_mut())
                .expect("pyramid levels have even dimensions");
        }
    }

    pub fn level(&self, i: usize) -> Option<&Image> {
        self.levels.get(i)
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
}

fn max_build_levels(base_w: usize, base_h: usize, requested_levels: usize) -> usize {
    if requested_levels == 0 || base_w == 0 || base_h == 0 {
        return 0;
    }

    let mut levels = 1usize;
    let mut w = base_w;
    let mut h = base_h;
    while levels < requested_levels
        && w >= 2
        && h >= 2
        && w.is_multiple_of(2)
        && h.is_multiple_of(2)
    {
        w /= 2;
        h /= 2;
        levels += 1;
    }
    levels
}

#[cfg(test)]
mod tests {
    use hs_core::Image;

    use super::PyramidU8;

    #[test]
    fn pyramid_build_stops_at_1x1() {
        let mut data = Vec::with_capacity(16 * 16);
        for i in 0..(16 * 16) {
            data.push((i % 251) as u8);
        }
        let src = Image::from_vec(16, 16, data).expect("valid image");

        let mut pyr = PyramidU8::new();
        pyr.build(&src.as_view(), 10);

        assert_eq!(pyr.num_levels(), 5);
        let dims: Vec<(usize, usize)> = (0..pyr.num_levels())
            .map(|i| {
                let level = pyr.level(i).expect("level should exist");
                (level.width(), level.height())
            })
            .collect();
        assert_eq!(dims, vec![(16, 16), (8, 8), (4, 4), (2, 2), (1, 1)]);
    }

    #[test]
    fn pyramid_stops_before_odd_level() {
        let src = Image::from_vec(12, 6, vec![0u8; 72]).expect("valid image");
        let mut pyr = PyramidU8::new();
        pyr.build(&src.as_view(), 10);

        // 12x6 -> 6x3; 3 is odd, so no third level.
        assert_eq!(pyr.num_levels(), 2);
        let l1 = pyr.level(1).expect("level 1");
        assert_eq!((l1.width(), l1.height()), (6, 3));
    }

    #[test]
    fn pyramid_level_zero_is_copy() {
        let src = Image::from_vec(4, 2, vec![1u8, 2, 3, 4, 5, 6, 7, 8]).expect("valid image");
        let mut pyr = PyramidU8::new();
        pyr.build(&src.as_view(), 3);

        let l0 = pyr.level(0).expect("level 0");
        assert_eq!(l0.data(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn pyramid_levels_use_rounded_average() {
        let src = Image::from_vec(2, 2, vec![10u8, 20, 30, 40]).expect("valid image");
        let mut pyr = PyramidU8::new();
        pyr.build(&src.as_view(), 2);

        let l1 = pyr.level(1).expect("level 1");
        assert_eq!(l1.data(), &[25]); // (10 + 20 + 30 + 40 + 2) >> 2
    }

    #[test]
    fn build_zero_levels_clears_pyramid() {
        let src = Image::from_vec(4, 4, vec![1u8; 16]).expect("valid image");
        let mut pyr = PyramidU8::new();
        pyr.build(&src.as_view(), 2);
        assert_eq!(pyr.num_levels(), 2);
        pyr.build(&src.as_view(), 0);
        assert_eq!(pyr.num_levels(), 0);
    }
}
