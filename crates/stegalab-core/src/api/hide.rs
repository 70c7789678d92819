use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::media::image::{ImageCodec, Method};
use crate::quality::{evaluate_files, QualityReport};
use crate::{CodecOptions, Message, SteganoError};

pub fn prepare() -> HideApi {
    HideApi::default()
}

/// What a hide run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    pub method: Method,
    pub output: PathBuf,
    pub elapsed: Duration,
    /// carrier compared to the written image
    pub quality: QualityReport,
}

#[derive(Default, Debug)]
pub struct HideApi {
    method: Method,
    message: Option<String>,
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    options: CodecOptions,
}

impl HideApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn use_message<S: AsRef<str>>(mut self, message: Option<S>) -> Self {
        self.message = message.map(|s| s.as_ref().to_string());
        self
    }

    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Defaults to `output_<method>.png` next to the carrier
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn use_output<A: AsRef<Path>>(mut self, output: Option<A>) -> Self {
        self.output = output.map(|o| o.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<EncodeReport, SteganoError> {
        let message = match self.message {
            Some(m) if !m.trim().is_empty() => Message::new(m),
            _ => return Err(SteganoError::MissingMessage),
        };
        let Some(image) = self.image else {
            return Err(SteganoError::CarrierNotSet);
        };
        let output = self
            .output
            .unwrap_or_else(|| image.with_file_name(format!("output_{}.png", self.method.slug())));

        let encoded = self
            .method
            .codec(&self.options)
            .encode(&image, &message, &output)?;
        let quality = evaluate_files(&image, &encoded.output);

        Ok(EncodeReport {
            method: self.method,
            output: encoded.output,
            elapsed: encoded.elapsed,
            quality,
        })
    }
}
