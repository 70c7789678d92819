//! Runs every method on one carrier and collects a row per method.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use rayon::prelude::*;

use crate::media::image::{ImageCodec, Method};
use crate::quality::{evaluate_files, QualityReport};
use crate::{CodecOptions, Message, SteganoError};

pub fn prepare() -> CompareApi {
    CompareApi::default()
}

/// Outcome of encode, decode and evaluate for one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub output: PathBuf,
    pub encode_time: Duration,
    pub decode_time: Duration,
    pub quality: QualityReport,
    pub recovered: Message,
    /// the recovered message equals the hidden one
    pub recovered_ok: bool,
}

#[derive(Debug)]
pub struct CompareRow {
    pub method: Method,
    pub outcome: Result<MethodReport, SteganoError>,
}

#[derive(Debug)]
pub struct CompareApi {
    message: Option<String>,
    image: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    methods: Vec<Method>,
    options: CodecOptions,
}

impl Default for CompareApi {
    fn default() -> Self {
        Self {
            message: None,
            image: None,
            output_folder: None,
            methods: Method::ALL.to_vec(),
            options: CodecOptions::default(),
        }
    }
}

impl CompareApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Outputs land next to the carrier unless a folder is given
    pub fn into_output_folder<A: AsRef<Path>>(mut self, output_folder: A) -> Self {
        self.output_folder = Some(output_folder.as_ref().to_path_buf());
        self
    }

    pub fn use_output_folder<A: AsRef<Path>>(mut self, output_folder: Option<A>) -> Self {
        self.output_folder = output_folder.map(|o| o.as_ref().to_path_buf());
        self
    }

    /// Restricts the run to these methods, reported in the given order
    pub fn with_methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Runs all methods in parallel; a failing method only fails its own row.
    pub fn execute(self) -> Result<Vec<CompareRow>, SteganoError> {
        let message = match self.message {
            Some(m) if !m.trim().is_empty() => Message::new(m),
            _ => return Err(SteganoError::MissingMessage),
        };
        let Some(image) = self.image else {
            return Err(SteganoError::CarrierNotSet);
        };
        let folder = match self.output_folder {
            Some(folder) => folder,
            None => image
                .parent()
                .map(Path::to_path_buf)
                .ok_or(SteganoError::TargetNotSet)?,
        };
        let stem = image
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or(SteganoError::UnsupportedMedia)?;

        let options = &self.options;
        let rows = self
            .methods
            .par_iter()
            .map(|method| {
                let output = folder.join(format!("{stem}_{}.png", method.slug()));
                let outcome = run_method(*method, options, &image, &message, &output);
                if let Err(e) = &outcome {
                    warn!("{method}: {e}");
                }
                CompareRow {
                    method: *method,
                    outcome,
                }
            })
            .collect();

        Ok(rows)
    }
}

fn run_method(
    method: Method,
    options: &CodecOptions,
    image: &Path,
    message: &Message,
    output: &Path,
) -> Result<MethodReport, SteganoError> {
    let codec = method.codec(options);
    let encoded = codec.encode(image, message, output)?;
    let decoded = codec.decode(&encoded.output)?;
    let quality = evaluate_files(image, &encoded.output);
    let recovered_ok = decoded.message == *message;
    info!("{method}: recovered {recovered_ok}, {quality:?}");

    Ok(MethodReport {
        output: encoded.output,
        encode_time: encoded.elapsed,
        decode_time: decoded.elapsed,
        quality,
        recovered: decoded.message,
        recovered_ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn should_report_every_method_in_order() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let carrier = temp_dir.path().join("photo.png");
        RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]))
            .save(&carrier)
            .expect("Failed to write carrier image");

        let rows = prepare()
            .with_message("HELLO")
            .with_image(&carrier)
            .execute()
            .expect("Failed to compare methods");

        let methods: Vec<Method> = rows.iter().map(|r| r.method).collect();
        assert_eq!(methods, Method::ALL.to_vec());

        for row in &rows {
            match (&row.method, &row.outcome) {
                // 64 blocks cannot hold 72 frame bits
                (Method::Dct, Err(SteganoError::CapacityExceeded { .. })) => (),
                (_, Ok(report)) => {
                    assert!(report.recovered_ok, "{} lost the message", row.method);
                    assert!(report.output.exists());
                    assert!(report.quality.ssim.is_some());
                }
                (method, Err(e)) => panic!("{method} failed: {e}"),
            }
        }
        assert!(temp_dir.path().join("photo_lsb.png").exists());
        assert!(temp_dir.path().join("photo_xor.png").exists());
        assert!(!temp_dir.path().join("photo_dct.png").exists());
    }

    #[test]
    fn should_insist_on_a_message() {
        assert!(matches!(
            prepare().with_image("photo.png").execute(),
            Err(SteganoError::MissingMessage)
        ));
        assert!(matches!(
            prepare().with_image("photo.png").with_message("   ").execute(),
            Err(SteganoError::MissingMessage)
        ));
    }
}
