use std::path::PathBuf;

use clap::Args;
use stegalab_core::{CodecOptions, Method};

use crate::CliResult;

/// Unveils a text message from an image
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source image that contains the secret message
    #[arg(
        short = 'i',
        long = "in",
        value_name = "media source file",
        required = true
    )]
    pub media: PathBuf,

    /// Message will also be stored in that file
    #[arg(short = 'o', long = "out", value_name = "output file")]
    pub output_file: Option<PathBuf>,

    /// Method the image was encoded with: lsb, palette, dct or xor
    #[arg(long, value_name = "method", default_value = "lsb")]
    pub method: Method,
}

impl UnveilArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let message = stegalab_core::commands::unveil(
            &self.media,
            self.output_file.as_deref(),
            self.method,
            options,
        )?;
        println!("{message}");

        Ok(())
    }
}
