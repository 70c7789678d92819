use clap::{Parser, Subcommand};
use stegalab_core::media::{
    CodecOptions, DctCodecOptions, LsbCodecOptions, PaletteCodecOptions, XorCodecOptions,
};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Experimental: leave the alpha channel alone in LSB and XOR embedding
    #[arg(long = "x-skip-alpha", global = true)]
    pub skip_alpha: bool,

    /// Experimental: number of base colors the palette method quantizes to
    #[arg(long = "x-palette-colors", default_value = "128", global = true)]
    pub palette_colors: usize,

    /// Experimental: quantization step of the DCT coefficients
    #[arg(long = "x-dct-margin", default_value = "24.0", global = true)]
    pub dct_margin: f64,

    /// Experimental: coefficients used per 8x8 block, 1 to 4
    #[arg(long = "x-dct-bits-per-block", default_value = "1", global = true)]
    pub dct_bits_per_block: usize,

    /// Experimental: channel the DCT method embeds into, defaults to blue or gray
    #[arg(long = "x-dct-channel", global = true)]
    pub dct_channel: Option<u8>,

    /// Experimental: key the XOR method masks the message with
    #[arg(long = "x-xor-key", default_value = "stegalab", global = true)]
    pub xor_key: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_lsb(LsbCodecOptions {
                skip_alpha_channel: self.skip_alpha,
            })
            .with_palette(PaletteCodecOptions {
                max_colors: self.palette_colors,
            })
            .with_dct(
                DctCodecOptions::default()
                    .with_margin(self.dct_margin)
                    .with_bits_per_block(self.dct_bits_per_block)
                    .with_channel(self.dct_channel),
            )
            .with_xor(XorCodecOptions::default().with_key(&self.xor_key))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    Evaluate(evaluate::EvaluateArgs),
    Compare(compare::CompareArgs),
    Capacity(capacity::CapacityArgs),
}
