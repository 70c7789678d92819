//! Palette index embedding.
//!
//! The palette is laid out in pairs `(2k, 2k + 1)` and every pixel index carries one
//! bit in its parity. Flipping a bit moves the pixel to the other member of its pair,
//! so each pair holds two colors as close to each other as the palette allows.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use log::{debug, error, info};

use super::quantize::{luma, quantize, Rgb, Rgba};
use super::{Decoded, Encoded, EmbeddingPlan, ImageCodec, Method};
use crate::error::SteganoError;
use crate::frame::{frame, unframe};
use crate::media::types::is_png;
use crate::media::{
    ensure_png_output, is_supported_image, CarrierImage, HideBit, PaletteCodecOptions, Persist,
    UnveilBit,
};
use crate::message::Message;
use crate::result::Result;

/// pairs at most this far apart, by [`distance`], already count as twins
const NEAR_TWIN: u32 = 12;

/// An 8 bit indexed raster with an RGB palette and optional per entry alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Vec<Rgb>,
    /// alpha per palette entry, entries beyond its end are opaque
    trns: Option<Vec<u8>>,
    indices: Vec<u8>,
}

/// the pair member of `c`, one blue level apart
fn twin(c: &Rgba) -> Rgba {
    let [r, g, b, a] = *c;
    [r, g, if b < u8::MAX { b + 1 } else { b - 1 }, a]
}

/// weighted squared distance, green weighs most as the eye is most sensitive to it
fn distance(a: &Rgba, b: &Rgba) -> u32 {
    const WEIGHTS: [u32; 4] = [2, 4, 3, 3];
    a.iter()
        .zip(b)
        .zip(WEIGHTS)
        .map(|((x, y), w)| {
            let d = x.abs_diff(*y) as u32;
            w * d * d
        })
        .sum()
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, palette: Vec<Rgb>, indices: Vec<u8>) -> Result<Self> {
        if palette.is_empty()
            || palette.len() > 256
            || indices.len() != width as usize * height as usize
        {
            return Err(SteganoError::InvalidImageMedia);
        }
        if let Some(i) = indices.iter().find(|i| **i as usize >= palette.len()) {
            return Err(SteganoError::UnsupportedCarrier(format!(
                "palette index {i} is beyond the {} palette entries",
                palette.len()
            )));
        }

        Ok(Self {
            width,
            height,
            palette,
            trns: None,
            indices,
        })
    }

    /// Like [`IndexedImage::new`], with alpha taken from the entries.
    pub fn from_entries(
        width: u32,
        height: u32,
        entries: &[Rgba],
        indices: Vec<u8>,
    ) -> Result<Self> {
        let palette = entries.iter().map(|[r, g, b, _]| [*r, *g, *b]).collect();
        let mut img = Self::new(width, height, palette, indices)?;
        img.trns = entries
            .iter()
            .rposition(|e| e[3] < u8::MAX)
            .map(|last| entries[..=last].iter().map(|e| e[3]).collect());

        Ok(img)
    }

    /// Reads an indexed PNG, `None` when the file is a PNG of another color type.
    pub fn read_png(path: &Path) -> Result<Option<Self>> {
        let file = File::open(path).map_err(|e| {
            error!("Error opening image {path:?}: {e}");
            SteganoError::ReadError { source: e }
        })?;
        let mut decoder = png::Decoder::new(file);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().map_err(|e| {
            error!("Error decoding png {path:?}: {e}");
            SteganoError::InvalidImageMedia
        })?;

        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Ok(None);
        }
        let palette: Vec<Rgb> = info
            .palette
            .as_ref()
            .map(|p| p.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
            .unwrap_or_default();
        let trns = info.trns.as_ref().map(|t| t.to_vec());

        let mut buf = vec![0; reader.output_buffer_size()];
        let out = reader.next_frame(&mut buf).map_err(|e| {
            error!("Error decoding png {path:?}: {e}");
            SteganoError::InvalidImageMedia
        })?;
        let depth = out.bit_depth as usize;
        let (width, height) = (out.width, out.height);
        let per_byte = 8 / depth;
        let mask = ((1u16 << depth) - 1) as u8;

        let mut indices = Vec::with_capacity(width as usize * height as usize);
        for row in buf.chunks(out.line_size).take(height as usize) {
            indices.extend((0..width as usize).map(|x| {
                let shift = 8 - depth * (x % per_byte + 1);
                (row[x / per_byte] >> shift) & mask
            }));
        }
        debug!(
            "read {width}x{height} indexed png, {depth} bit, {} colors",
            palette.len()
        );

        let mut img = Self::new(width, height, palette, indices)?;
        img.trns = trns;
        Ok(Some(img))
    }

    /// Quantizes a raster to `max_colors` base colors, each followed by its twin.
    ///
    /// Alpha is carried into the palette, gray carriers become gray RGB entries.
    pub fn from_carrier(carrier: &CarrierImage, max_colors: usize) -> Result<Self> {
        let pixels: Vec<Rgba> = carrier
            .samples()
            .chunks_exact(carrier.channels() as usize)
            .map(|p| match *p {
                [l] => [l, l, l, u8::MAX],
                [l, a] => [l, l, l, a],
                [r, g, b] => [r, g, b, u8::MAX],
                [r, g, b, a, ..] => [r, g, b, a],
                _ => [0, 0, 0, u8::MAX],
            })
            .collect();

        Self::from_pixels(carrier.width(), carrier.height(), &pixels, max_colors)
    }

    /// base colors in luma order, each followed by its twin
    fn from_pixels(width: u32, height: u32, pixels: &[Rgba], max_colors: usize) -> Result<Self> {
        let (base, indices) = quantize(pixels, max_colors);
        if base.len() < 2 {
            return Err(SteganoError::UnsupportedCarrier(format!(
                "{} distinct colors, the palette method needs at least 2",
                base.len()
            )));
        }
        debug!("quantized carrier to {} base colors", base.len());

        let entries: Vec<Rgba> = base.iter().flat_map(|c| [*c, twin(c)]).collect();
        let indices = indices.into_iter().map(|i| i * 2).collect();

        Self::from_entries(width, height, &entries, indices)
    }

    /// Lays the palette out in pairs of close colors.
    ///
    /// A palette of near twins, as this codec writes it, stays untouched so that
    /// re-encoding an output reproduces its indices. Otherwise the used colors are
    /// rebuilt as base and twin when there are at most `max_colors` of them, and
    /// larger palettes pair every entry with its nearest neighbor.
    fn pair_up(&mut self, max_colors: usize) -> Result<()> {
        let entries = self.entries();
        let near_twins = entries.len() % 2 == 0
            && entries
                .chunks_exact(2)
                .all(|pair| distance(&pair[0], &pair[1]) <= NEAR_TWIN);
        if near_twins {
            return Ok(());
        }

        let used: BTreeSet<u8> = self.indices.iter().copied().collect();
        let used_colors: BTreeSet<Rgba> = used.iter().map(|i| entries[*i as usize]).collect();
        if used_colors.len() < 2 {
            return Err(SteganoError::UnsupportedCarrier(format!(
                "{} colors in use, the palette method needs at least 2",
                used_colors.len()
            )));
        }

        if used_colors.len() <= max_colors {
            debug!("rebuilding palette of {} used colors", used_colors.len());
            *self = Self::from_pixels(self.width, self.height, &self.pixels(), max_colors)?;
            return Ok(());
        }
        debug!("pairing {} palette entries by distance", entries.len());
        self.pair_nearest(&entries)
    }

    /// Pairs every entry with its nearest unpaired neighbor, darkest first.
    /// A lone last entry is paired with its twin.
    fn pair_nearest(&mut self, entries: &[Rgba]) -> Result<()> {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|i| (luma(&entries[*i]), entries[*i], *i));

        let mut paired = vec![false; entries.len()];
        let mut remap = vec![0u8; entries.len()];
        let mut layout: Vec<Rgba> = Vec::with_capacity(entries.len() + 1);
        for &i in &order {
            if paired[i] {
                continue;
            }
            paired[i] = true;
            let partner = order
                .iter()
                .copied()
                .filter(|j| !paired[*j])
                .min_by_key(|j| (distance(&entries[i], &entries[*j]), *j));

            remap[i] = layout.len() as u8;
            layout.push(entries[i]);
            match partner {
                Some(j) => {
                    paired[j] = true;
                    remap[j] = layout.len() as u8;
                    layout.push(entries[j]);
                }
                None => layout.push(twin(&entries[i])),
            }
        }

        let indices = self.indices.iter().map(|i| remap[*i as usize]).collect();
        *self = Self::from_entries(self.width, self.height, &layout, indices)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// palette entries with their alpha
    pub fn entries(&self) -> Vec<Rgba> {
        let alpha = |i: usize| {
            self.trns
                .as_ref()
                .and_then(|t| t.get(i).copied())
                .unwrap_or(u8::MAX)
        };
        self.palette
            .iter()
            .enumerate()
            .map(|(i, [r, g, b])| [*r, *g, *b, alpha(i)])
            .collect()
    }

    /// the color of every pixel in raster order
    pub fn pixels(&self) -> Vec<Rgba> {
        let entries = self.entries();
        self.indices.iter().map(|i| entries[*i as usize]).collect()
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn pixel_count(&self) -> usize {
        self.indices.len()
    }
}

impl Persist for IndexedImage {
    /// writes an 8 bit indexed PNG
    fn save_as(&mut self, file: &Path) -> Result<()> {
        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            SteganoError::WriteError { source: e }
        })?;
        let mut encoder = png::Encoder::new(BufWriter::new(f), self.width, self.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(self.palette.concat());
        if let Some(trns) = &self.trns {
            encoder.set_trns(trns.clone());
        }

        let encoding_error = |e: png::EncodingError| {
            error!("Error saving image: {e}");
            SteganoError::ImageEncodingError
        };
        let mut writer = encoder.write_header().map_err(encoding_error)?;
        writer.write_image_data(&self.indices).map_err(encoding_error)?;
        writer.finish().map_err(encoding_error)
    }
}

/// Hides one bit per pixel in the parity of its palette index.
#[derive(Debug, Clone, Default)]
pub struct PaletteCodec {
    options: PaletteCodecOptions,
}

impl PaletteCodec {
    pub fn new(options: PaletteCodecOptions) -> Self {
        Self { options }
    }

    /// Indexed PNGs keep their palette entries, everything else is quantized.
    fn load(&self, input: &Path) -> Result<IndexedImage> {
        if is_png(input) {
            if let Some(img) = IndexedImage::read_png(input)? {
                return Ok(img);
            }
        }
        IndexedImage::from_carrier(&CarrierImage::from_file(input)?, self.options.max_colors)
    }

    pub fn hide(&self, img: &mut IndexedImage, message: &Message) -> Result<()> {
        self.options.validate()?;
        let frame = frame(message)?;
        EmbeddingPlan {
            method: Method::Palette,
            units: img.pixel_count(),
            bits_per_unit: 1,
        }
        .ensure_fits(&frame)?;
        img.pair_up(self.options.max_colors)?;

        for (index, bit) in img.indices.iter_mut().zip(frame.bits()) {
            index.hide_bit(bit);
        }

        Ok(())
    }

    pub fn unveil(&self, img: &IndexedImage) -> Result<Message> {
        unframe(img.indices.iter().map(|i| i.unveil_bit()))
    }
}

impl ImageCodec for PaletteCodec {
    fn method(&self) -> Method {
        Method::Palette
    }

    /// one bit per pixel, the palette itself does not limit capacity
    fn plan(&self, carrier: &CarrierImage) -> Result<EmbeddingPlan> {
        self.options.validate()?;
        Ok(EmbeddingPlan {
            method: Method::Palette,
            units: carrier.pixel_count(),
            bits_per_unit: 1,
        })
    }

    fn encode(&self, input: &Path, message: &Message, output: &Path) -> Result<Encoded> {
        self.options.validate()?;
        ensure_png_output(output)?;
        let start = Instant::now();
        let mut img = self.load(input)?;
        self.hide(&mut img, message)?;
        img.save_as(output)?;
        let elapsed = start.elapsed();
        info!(
            "{}: hid {} bytes in {input:?}, wrote {output:?} in {elapsed:?}",
            Method::Palette,
            message.len()
        );

        Ok(Encoded {
            output: output.to_path_buf(),
            elapsed,
        })
    }

    fn decode(&self, input: &Path) -> Result<Decoded> {
        if !is_supported_image(input) {
            return Err(SteganoError::UnsupportedMedia);
        }
        let start = Instant::now();
        let img = match is_png(input) {
            true => IndexedImage::read_png(input)?,
            false => None,
        }
        .ok_or_else(|| {
            SteganoError::UnsupportedCarrier(format!("{input:?} is not an indexed PNG"))
        })?;
        let message = self.unveil(&img)?;
        let elapsed = start.elapsed();
        info!(
            "{}: unveiled {} bytes from {input:?} in {elapsed:?}",
            Method::Palette,
            message.len()
        );

        Ok(Decoded { message, elapsed })
    }
}
