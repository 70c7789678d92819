use std::iter::Enumerate;
use std::slice::{Iter, IterMut};

use crate::media::CarrierImage;

/// Index of the channel that is left out, if any.
fn skipped_channel(carrier: &CarrierImage, skip_alpha: bool) -> Option<usize> {
    if skip_alpha && carrier.has_alpha() {
        Some(carrier.channels() as usize - 1)
    } else {
        None
    }
}

/// number of samples `SampleIter` and `SampleIterMut` visit
pub(crate) fn usable_samples(carrier: &CarrierImage, skip_alpha: bool) -> usize {
    match skipped_channel(carrier, skip_alpha) {
        Some(_) => carrier.pixel_count() * (carrier.channels() as usize - 1),
        None => carrier.samples().len(),
    }
}

/// Readonly access to the samples of an image in raster order,
/// row by row, pixel by pixel, channel by channel.
pub(crate) struct SampleIter<'a> {
    samples: Enumerate<Iter<'a, u8>>,
    channels: usize,
    skip: Option<usize>,
}

impl<'a> SampleIter<'a> {
    pub fn new(carrier: &'a CarrierImage, skip_alpha: bool) -> Self {
        Self {
            skip: skipped_channel(carrier, skip_alpha),
            channels: carrier.channels() as usize,
            samples: carrier.samples().iter().enumerate(),
        }
    }
}

impl Iterator for SampleIter<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (i, s) in self.samples.by_ref() {
            if Some(i % self.channels) != self.skip {
                return Some(*s);
            }
        }
        None
    }
}

/// Mutable access to the samples of an image, same order as `SampleIter`.
pub(crate) struct SampleIterMut<'a> {
    samples: Enumerate<IterMut<'a, u8>>,
    channels: usize,
    skip: Option<usize>,
}

impl<'a> SampleIterMut<'a> {
    pub fn new(carrier: &'a mut CarrierImage, skip_alpha: bool) -> Self {
        Self {
            skip: skipped_channel(carrier, skip_alpha),
            channels: carrier.channels() as usize,
            samples: carrier.samples_mut().iter_mut().enumerate(),
        }
    }
}

impl<'a> Iterator for SampleIterMut<'a> {
    type Item = &'a mut u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (i, s) in self.samples.by_ref() {
            if Some(i % self.channels) != self.skip {
                return Some(s);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 RGBA image where every sample holds its own index
    fn prepare_2x2_rgba() -> CarrierImage {
        CarrierImage::new(2, 2, 4, (0..16).collect()).unwrap()
    }

    #[test]
    fn should_iterate_rows_first_then_channels() {
        let img = prepare_2x2_rgba();
        let all: Vec<u8> = SampleIter::new(&img, false).collect();

        assert_eq!(all, (0..16).collect::<Vec<u8>>());
        assert_eq!(usable_samples(&img, false), 16);
    }

    #[test]
    fn should_skip_the_alpha_channel() {
        let img = prepare_2x2_rgba();
        let colors: Vec<u8> = SampleIter::new(&img, true).collect();

        assert_eq!(colors, vec![0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14]);
        assert_eq!(usable_samples(&img, true), 12);
    }

    #[test]
    fn should_not_skip_anything_without_alpha() {
        let img = CarrierImage::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();

        assert_eq!(SampleIter::new(&img, true).count(), 6);
        assert_eq!(usable_samples(&img, true), 6);
    }

    #[test]
    fn should_be_possible_to_mutate_samples_in_the_same_order() {
        let mut img = prepare_2x2_rgba();
        for s in SampleIterMut::new(&mut img, true) {
            *s = 0xff;
        }

        assert_eq!(img.sample(0, 0, 0), 0xff);
        assert_eq!(img.sample(1, 1, 2), 0xff);
        assert_eq!(img.sample(0, 0, 3), 3, "alpha must stay untouched");
        assert_eq!(img.sample(1, 1, 3), 15, "alpha must stay untouched");
    }
}
