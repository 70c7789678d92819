use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{DynamicImage, ImageBuffer};
use log::error;

use crate::error::SteganoError;
use crate::result::Result;

use super::Persist;

/// File extensions accepted as carrier input, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub(crate) fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Encoded images are always written as PNG, so their path has to say so.
pub fn ensure_png_output(path: &Path) -> Result<()> {
    if !is_png(path) {
        error!("Output {path:?} must be a .png file");
        return Err(SteganoError::UnsupportedMedia);
    }
    Ok(())
}

/// Opens any supported raster file, without touching its pixel layout.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    if !is_supported_image(path) {
        return Err(SteganoError::UnsupportedMedia);
    }

    image::open(path).map_err(|e| {
        error!("Error opening image {path:?}: {e}");
        SteganoError::InvalidImageMedia
    })
}

/// A decoded 8 bit raster.
///
/// Samples are stored row-major and channel-minor, i.e. the sample of channel `c`
/// at `(x, y)` lives at `(y * width + x) * channels + c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierImage {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl CarrierImage {
    pub fn new(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self> {
        if !(1..=4).contains(&channels)
            || samples.len() != width as usize * height as usize * channels as usize
        {
            return Err(SteganoError::InvalidImageMedia);
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Keeps the channel layout of the source, 16 bit and float images are reduced to 8 bit.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        use image::ColorType::*;

        let (width, height) = (img.width(), img.height());
        let (channels, samples) = match img.color() {
            L8 | L16 => (1, img.into_luma8().into_raw()),
            La8 | La16 => (2, img.into_luma_alpha8().into_raw()),
            Rgb8 | Rgb16 | Rgb32F => (3, img.into_rgb8().into_raw()),
            _ => (4, img.into_rgba8().into_raw()),
        };

        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_dynamic(open_image(path)?))
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let raw = self.samples.clone();
        let img = match self.channels {
            1 => ImageBuffer::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
            _ => ImageBuffer::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        };

        img.ok_or(SteganoError::ImageEncodingError)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// `(width, height, channels)`
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }

    /// gray+alpha and RGBA carry alpha as their last channel
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    #[inline]
    pub fn sample(&self, x: u32, y: u32, channel: u8) -> u8 {
        self.samples[self.index_of(x, y, channel)]
    }

    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, channel: u8, value: u8) {
        let i = self.index_of(x, y, channel);
        self.samples[i] = value;
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32, channel: u8) -> usize {
        debug_assert!(x < self.width && y < self.height && channel < self.channels);
        (y as usize * self.width as usize + x as usize) * self.channels as usize + channel as usize
    }
}

impl Persist for CarrierImage {
    /// always writes PNG, so no sample is altered
    fn save_as(&mut self, file: &Path) -> Result<()> {
        let img = self.to_dynamic()?;
        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            SteganoError::WriteError { source: e }
        })?;
        let mut writer = BufWriter::new(f);

        img.write_to(&mut writer, image::ImageFormat::Png)
            .map_err(|e| {
                error!("Error saving image: {e}");
                SteganoError::ImageEncodingError
            })
    }
}
