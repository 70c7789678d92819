use std::path::PathBuf;

use clap::Args;
use stegalab_core::{CodecOptions, Method};

use super::{format_psnr, format_ssim};
use crate::CliResult;

/// Hides a text message in an image
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image (png, jpg, jpeg, bmp or gif), used readonly.
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Final image will be stored as PNG file, defaults to output_<method>.png next to the carrier
    #[arg(short = 'o', long = "out", value_name = "output image file")]
    pub write_to_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message", required = true)]
    pub message: Option<String>,

    /// Embedding method: lsb, palette, dct or xor
    #[arg(long, value_name = "method", default_value = "lsb")]
    pub method: Method,
}

impl HideArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let report = stegalab_core::commands::hide(
            &self.media,
            self.write_to_file.as_deref(),
            self.message,
            self.method,
            options,
        )?;

        println!("Method: {}", report.method);
        println!("Output: {}", report.output.display());
        println!("Encode time: {:.3}s", report.elapsed.as_secs_f64());
        println!("SSIM: {}", format_ssim(report.quality.ssim));
        println!("PSNR: {}", format_psnr(report.quality.psnr));

        Ok(())
    }
}
