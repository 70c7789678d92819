//! Fidelity of an encoded image compared to its carrier, as SSIM and PSNR.

use std::path::Path;

use image::DynamicImage;
use log::{debug, warn};

use crate::error::SteganoError;
use crate::media::{open_image, CarrierImage};
use crate::result::Result;

const PEAK: f64 = 255.0;
const WINDOW_RADIUS: usize = 5;
const WINDOW_SIGMA: f64 = 1.5;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Similarity of two images, `None` where a metric could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityReport {
    pub ssim: Option<f64>,
    /// infinite for identical images
    pub psnr: Option<f64>,
}

/// Scores `encoded` against `original`; both must share width, height and channels.
pub fn evaluate(original: &CarrierImage, encoded: &CarrierImage) -> Result<QualityReport> {
    if original.shape() != encoded.shape() {
        return Err(SteganoError::ShapeMismatch {
            left: original.shape(),
            right: encoded.shape(),
        });
    }

    let report = QualityReport {
        ssim: Some(ssim(original, encoded)),
        psnr: Some(psnr(original, encoded)),
    };
    debug!("quality: {report:?}");

    Ok(report)
}

/// Loads and scores two image files, never fails.
///
/// Both images are converted to RGB, or RGBA when both carry alpha, so an indexed
/// PNG compares fine with the raster it was made from.
pub fn evaluate_files(original: &Path, encoded: &Path) -> QualityReport {
    let result = open_image(original)
        .and_then(|a| open_image(encoded).map(|b| (a, b)))
        .and_then(|(a, b)| {
            let with_alpha = a.color().has_alpha() && b.color().has_alpha();
            evaluate(&normalise(a, with_alpha), &normalise(b, with_alpha))
        });

    result.unwrap_or_else(|e| {
        warn!("cannot compare {original:?} with {encoded:?}: {e}");
        QualityReport::default()
    })
}

fn normalise(img: DynamicImage, with_alpha: bool) -> CarrierImage {
    let img = match with_alpha {
        true => DynamicImage::ImageRgba8(img.into_rgba8()),
        false => DynamicImage::ImageRgb8(img.into_rgb8()),
    };
    CarrierImage::from_dynamic(img)
}

/// `10 * log10(255² / MSE)` over all samples, infinite when nothing differs.
pub fn psnr(a: &CarrierImage, b: &CarrierImage) -> f64 {
    let squared_error: f64 = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum();
    if squared_error == 0.0 {
        return f64::INFINITY;
    }

    let mse = squared_error / a.samples().len() as f64;
    10.0 * (PEAK * PEAK / mse).log10()
}

/// Gaussian windowed SSIM, averaged over all window positions and channels.
pub fn ssim(a: &CarrierImage, b: &CarrierImage) -> f64 {
    let (width, height, channels) = (a.width() as usize, a.height() as usize, a.channels());
    if width == 0 || height == 0 {
        return 1.0;
    }
    let radius = WINDOW_RADIUS.min((width.min(height) - 1) / 2);
    let window = gaussian(radius);

    let total: f64 = (0..channels)
        .map(|c| ssim_plane(&plane(a, c), &plane(b, c), width, height, &window))
        .sum();
    total / channels as f64
}

fn plane(img: &CarrierImage, channel: u8) -> Vec<f64> {
    img.samples()[channel as usize..]
        .iter()
        .step_by(img.channels() as usize)
        .map(|s| *s as f64)
        .collect()
}

/// normalised 1D gaussian of `2 * radius + 1` taps
fn gaussian(radius: usize) -> Vec<f64> {
    let taps: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-(d * d) / (2.0 * WINDOW_SIGMA * WINDOW_SIGMA)).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Separable convolution over the positions where the window fits entirely.
fn filter_valid(
    src: &[f64],
    width: usize,
    height: usize,
    window: &[f64],
) -> (Vec<f64>, usize, usize) {
    let n = window.len();
    let (out_w, out_h) = (width + 1 - n, height + 1 - n);

    let mut rows = vec![0.0; out_w * height];
    for y in 0..height {
        for x in 0..out_w {
            rows[y * out_w + x] = window
                .iter()
                .enumerate()
                .map(|(k, w)| w * src[y * width + x + k])
                .sum();
        }
    }

    let mut out = vec![0.0; out_w * out_h];
    for y in 0..out_h {
        for x in 0..out_w {
            out[y * out_w + x] = window
                .iter()
                .enumerate()
                .map(|(k, w)| w * rows[(y + k) * out_w + x])
                .sum();
        }
    }

    (out, out_w, out_h)
}

fn ssim_plane(x: &[f64], y: &[f64], width: usize, height: usize, window: &[f64]) -> f64 {
    let c1 = (K1 * PEAK).powi(2);
    let c2 = (K2 * PEAK).powi(2);

    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(y).map(|(a, b)| a * b).collect();

    let (mu_x, w, h) = filter_valid(x, width, height, window);
    let (mu_y, ..) = filter_valid(y, width, height, window);
    let (e_xx, ..) = filter_valid(&xx, width, height, window);
    let (e_yy, ..) = filter_valid(&yy, width, height, window);
    let (e_xy, ..) = filter_valid(&xy, width, height, window);

    let sum: f64 = (0..w * h)
        .map(|i| {
            let (mx, my) = (mu_x[i], mu_y[i]);
            let var_x = e_xx[i] - mx * mx;
            let var_y = e_yy[i] - my * my;
            let cov = e_xy[i] - mx * my;
            ((2.0 * mx * my + c1) * (2.0 * cov + c2))
                / ((mx * mx + my * my + c1) * (var_x + var_y + c2))
        })
        .sum();

    sum / (w * h) as f64
}
