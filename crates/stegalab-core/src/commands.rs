//! One function per command line workflow, thin wrappers around [`crate::api`].

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::api::compare::CompareRow;
use crate::api::hide::EncodeReport;
use crate::media::image::{EmbeddingPlan, ImageCodec, Method};
use crate::quality::{evaluate_files, QualityReport};
use crate::{CarrierImage, CodecOptions, Message, SteganoError};

pub fn hide(
    media: &Path,
    write_to_file: Option<&Path>,
    message: Option<String>,
    method: Method,
    options: CodecOptions,
) -> Result<EncodeReport, SteganoError> {
    crate::api::hide::prepare()
        .with_options(options)
        .with_method(method)
        .use_message(message)
        .with_image(media)
        .use_output(write_to_file)
        .execute()
}

/// Unveils the message and writes it to `destination` when given.
pub fn unveil(
    secret_media: &Path,
    destination: Option<&Path>,
    method: Method,
    options: CodecOptions,
) -> Result<Message, SteganoError> {
    let decoded = crate::api::unveil::prepare()
        .with_options(options)
        .with_method(method)
        .from_secret_file(secret_media)
        .execute()?;

    if let Some(destination) = destination {
        let mut target_file =
            File::create(destination).map_err(|source| SteganoError::WriteError { source })?;

        target_file
            .write_all(decoded.message.as_bytes())
            .map_err(|source| SteganoError::WriteError { source })?;
    }

    Ok(decoded.message)
}

pub fn evaluate(original: &Path, encoded: &Path) -> QualityReport {
    evaluate_files(original, encoded)
}

pub fn compare(
    media: &Path,
    output_folder: Option<&Path>,
    message: Option<String>,
    options: CodecOptions,
) -> Result<Vec<CompareRow>, SteganoError> {
    let api = crate::api::compare::prepare()
        .with_options(options)
        .with_image(media)
        .use_output_folder(output_folder);

    match message {
        Some(message) => api.with_message(&message),
        None => api,
    }
    .execute()
}

/// The plan of every method for the given carrier.
pub fn capacity(media: &Path, options: &CodecOptions) -> Result<Vec<EmbeddingPlan>, SteganoError> {
    let carrier = CarrierImage::from_file(media)?;

    Method::ALL
        .iter()
        .map(|method| method.codec(options).plan(&carrier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, GrayImage};
    use tempfile::tempdir;

    #[test]
    fn capacity_should_list_all_methods() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let carrier = temp_dir.path().join("gray.png");
        GrayImage::from_pixel(64, 64, Luma([90])).save(&carrier).unwrap();

        let plans = capacity(&carrier, &CodecOptions::default()).unwrap();
        let bits: Vec<(Method, usize)> = plans
            .iter()
            .map(|p| (p.method, p.capacity_bits()))
            .collect();

        assert_eq!(
            bits,
            vec![
                (Method::Lsb, 4096),
                (Method::Palette, 4096),
                (Method::Dct, 64),
                (Method::Xor, 4096)
            ]
        );
    }

    #[test]
    fn unveil_should_write_the_message_to_a_file() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let carrier = temp_dir.path().join("gray.png");
        let secret = temp_dir.path().join("secret.png");
        let text = temp_dir.path().join("message.txt");
        GrayImage::from_fn(32, 32, |x, y| Luma([(x * y) as u8])).save(&carrier).unwrap();

        hide(
            &carrier,
            Some(&secret),
            Some("to file".to_string()),
            Method::Lsb,
            CodecOptions::default(),
        )
        .unwrap();
        let message = unveil(&secret, Some(&text), Method::Lsb, CodecOptions::default()).unwrap();

        assert_eq!(message.as_str(), "to file");
        assert_eq!(std::fs::read_to_string(&text).unwrap(), "to file");
    }
}
