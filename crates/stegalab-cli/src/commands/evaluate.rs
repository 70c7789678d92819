use std::path::PathBuf;

use clap::Args;

use super::{format_psnr, format_ssim};
use crate::CliResult;

/// Compares an encoded image with its carrier
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// The carrier image
    #[arg(value_name = "original image")]
    pub original: PathBuf,

    /// The image with the hidden message
    #[arg(value_name = "encoded image")]
    pub encoded: PathBuf,
}

impl EvaluateArgs {
    pub fn run(self) -> CliResult<()> {
        let report = stegalab_core::commands::evaluate(&self.original, &self.encoded);
        println!("SSIM: {}", format_ssim(report.ssim));
        println!("PSNR: {}", format_psnr(report.psnr));

        Ok(())
    }
}
