//! Deterministic color reduction for the palette codec.
//!
//! Colors are RGBA, so transparency survives the reduction. Images with at most
//! `max_colors` distinct colors keep them exactly, larger ones are reduced by median
//! cut. Every tie is broken by color value, so the same pixels always give the same
//! palette and the same indices.

use std::collections::BTreeMap;

pub type Rgb = [u8; 3];
pub type Rgba = [u8; 4];

/// Rec. 601 luma, scaled by 1000 to stay in integers
pub(crate) fn luma(c: &Rgba) -> u32 {
    299 * c[0] as u32 + 587 * c[1] as u32 + 114 * c[2] as u32
}

/// A box of distinct colors with their pixel counts.
struct ColorBox {
    colors: Vec<(Rgba, usize)>,
}

impl ColorBox {
    fn range(&self, channel: usize) -> u8 {
        let (min, max) = self
            .colors
            .iter()
            .fold((u8::MAX, u8::MIN), |(min, max), (c, _)| {
                (min.min(c[channel]), max.max(c[channel]))
            });
        max.saturating_sub(min)
    }

    fn widest_channel(&self) -> (usize, u8) {
        (0..4)
            .map(|ch| (ch, self.range(ch)))
            .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// splits at the pixel weighted median of the widest channel, both halves stay non-empty
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.widest_channel();
        self.colors
            .sort_by(|(a, _), (b, _)| a[channel].cmp(&b[channel]).then(a.cmp(b)));

        let total: usize = self.colors.iter().map(|(_, n)| n).sum();
        let mut seen = 0;
        let mut at = 1;
        for (i, (_, n)) in self.colors.iter().enumerate() {
            seen += n;
            if seen * 2 >= total {
                at = i + 1;
                break;
            }
        }
        let at = at.clamp(1, self.colors.len() - 1);
        let upper = self.colors.split_off(at);

        (self, ColorBox { colors: upper })
    }

    /// pixel weighted mean color
    fn average(&self) -> Rgba {
        let total: usize = self.colors.iter().map(|(_, n)| n).sum();
        let mut sum = [0usize; 4];
        for (c, n) in &self.colors {
            for ch in 0..4 {
                sum[ch] += c[ch] as usize * n;
            }
        }
        sum.map(|s| ((s + total / 2) / total) as u8)
    }
}

/// Reduces `pixels` to at most `max_colors` colors.
///
/// Returns the palette, ordered by luma, and one palette index per pixel.
/// `max_colors` must be within `1..=256`.
pub(crate) fn quantize(pixels: &[Rgba], max_colors: usize) -> (Vec<Rgba>, Vec<u8>) {
    let mut histogram: BTreeMap<Rgba, usize> = BTreeMap::new();
    for p in pixels {
        *histogram.entry(*p).or_default() += 1;
    }

    // every box maps its colors to one representative
    let mut boxes = vec![ColorBox {
        colors: histogram.into_iter().collect(),
    }];
    let exact = boxes[0].colors.len() <= max_colors;
    if exact {
        boxes = boxes
            .pop()
            .map(|b| {
                b.colors
                    .into_iter()
                    .map(|c| ColorBox { colors: vec![c] })
                    .collect()
            })
            .unwrap_or_default();
    } else {
        while boxes.len() < max_colors {
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.colors.len() > 1)
                .map(|(i, b)| (i, b.widest_channel().1))
                .fold(None, |best: Option<(usize, u8)>, cur| match best {
                    Some(b) if b.1 >= cur.1 => Some(b),
                    _ => Some(cur),
                });
            let Some((i, _)) = candidate else {
                break;
            };
            let (lower, upper) = boxes.swap_remove(i).split();
            boxes.push(lower);
            boxes.push(upper);
        }
    }

    let mut entries: Vec<(Rgba, Vec<Rgba>)> = boxes
        .into_iter()
        .map(|b| (b.average(), b.colors.into_iter().map(|(c, _)| c).collect()))
        .collect();
    entries.sort_by(|(a, ma), (b, mb)| luma(a).cmp(&luma(b)).then(a.cmp(b)).then(ma.cmp(mb)));

    let mut lookup: BTreeMap<Rgba, u8> = BTreeMap::new();
    for (index, (_, members)) in entries.iter().enumerate() {
        for c in members {
            lookup.insert(*c, index as u8);
        }
    }
    let palette = entries.into_iter().map(|(c, _)| c).collect();
    let indices = pixels.iter().map(|p| lookup[p]).collect();

    (palette, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_few_colors_exactly() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let red = [200, 0, 0, 255];
        let pixels = vec![white, black, red, black, white];

        let (palette, indices) = quantize(&pixels, 128);

        assert_eq!(palette, vec![black, red, white]);
        assert_eq!(indices, vec![2, 0, 1, 0, 2]);
    }

    #[test]
    fn should_reduce_to_the_requested_number_of_colors() {
        let pixels: Vec<Rgba> = (0..4096)
            .map(|i| [(i % 64 * 4) as u8, (i / 64 * 4) as u8, (i % 7 * 30) as u8, 255])
            .collect();

        let (palette, indices) = quantize(&pixels, 16);

        assert_eq!(palette.len(), 16);
        assert_eq!(indices.len(), pixels.len());
        assert!(indices.iter().all(|i| (*i as usize) < palette.len()));
        assert!(palette.windows(2).all(|w| luma(&w[0]) <= luma(&w[1])));
    }

    #[test]
    fn should_be_deterministic() {
        let pixels: Vec<Rgba> = (0..2000u32)
            .map(|i| {
                let c = |m: u32| (i * m % 256) as u8;
                [c(7), c(11), c(13), c(17)]
            })
            .collect();

        assert_eq!(quantize(&pixels, 32), quantize(&pixels, 32));
    }

    #[test]
    fn should_map_pixels_to_a_near_color() {
        let pixels: Vec<Rgba> = (0..=255u8).map(|v| [v, v, v, 255]).collect();

        let (palette, indices) = quantize(&pixels, 8);

        for (p, i) in pixels.iter().zip(&indices) {
            let c = palette[*i as usize];
            assert!((p[0] as i32 - c[0] as i32).abs() <= 32, "{p:?} -> {c:?}");
        }
    }

    #[test]
    fn should_keep_transparency() {
        let clear = [10, 20, 30, 0];
        let opaque = [10, 20, 30, 255];
        let pixels: Vec<Rgba> = (0..600)
            .map(|i| if i % 3 == 0 { clear } else { opaque })
            .collect();

        let (palette, indices) = quantize(&pixels, 128);
        assert_eq!(palette, vec![clear, opaque]);
        assert_eq!(&indices[..3], &[0, 1, 1]);

        let (reduced, _) = quantize(&pixels, 1);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0][3], 170);
    }
}
