use crate::error::SteganoError;
use crate::result::Result;

/// Codec configuration for all four embedding methods
///
/// Every method only reads its own section, so one instance can drive a whole comparison run.
#[derive(Debug, Clone, Default)]
pub struct CodecOptions {
    pub lsb: LsbCodecOptions,
    pub palette: PaletteCodecOptions,
    pub dct: DctCodecOptions,
    pub xor: XorCodecOptions,
}

impl CodecOptions {
    pub fn with_lsb(mut self, lsb: LsbCodecOptions) -> Self {
        self.lsb = lsb;
        self
    }

    pub fn with_palette(mut self, palette: PaletteCodecOptions) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_dct(mut self, dct: DctCodecOptions) -> Self {
        self.dct = dct;
        self
    }

    pub fn with_xor(mut self, xor: XorCodecOptions) -> Self {
        self.xor = xor;
        self
    }
}

/// Options for LSB (Least Significant Bit) image encoding,
/// the XOR codec walks the samples the same way
#[derive(Debug, Clone, Default)]
pub struct LsbCodecOptions {
    /// If true no alpha channel would be used for encoding,
    /// this reduces then the capacity by one bit per pixel
    pub skip_alpha_channel: bool,
}

/// Upper bound of base colors, every base color gets a twin entry in a 256 color palette
pub const MAX_PALETTE_BASE_COLORS: usize = 128;

/// Options for palette index encoding
#[derive(Debug, Clone)]
pub struct PaletteCodecOptions {
    /// Number of base colors a full color carrier is quantized to (2..=128).
    pub max_colors: usize,
}

impl Default for PaletteCodecOptions {
    fn default() -> Self {
        Self {
            max_colors: MAX_PALETTE_BASE_COLORS,
        }
    }
}

impl PaletteCodecOptions {
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_PALETTE_BASE_COLORS).contains(&self.max_colors) {
            return Err(SteganoError::InvalidCodecOptions(format!(
                "palette colors must be within 2..={MAX_PALETTE_BASE_COLORS}, got {}",
                self.max_colors
            )));
        }
        Ok(())
    }
}

/// Default quantization step of the DCT codec
pub const DEFAULT_DCT_MARGIN: f64 = 24.0;

/// Options for DCT coefficient encoding
#[derive(Debug, Clone)]
pub struct DctCodecOptions {
    /// Quantization step of the embedding lattice. A coefficient may drift by up to
    /// half of it before its bit flips, the default survives pixel rounding of any
    /// unsaturated block.
    pub margin: f64,

    /// Number of mid frequency coefficients used per 8x8 block (1..=4).
    pub bits_per_block: usize,

    /// Channel that carries the bits, defaults to blue on color images and to the
    /// only channel on gray images.
    pub channel: Option<u8>,
}

impl Default for DctCodecOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_DCT_MARGIN,
            bits_per_block: 1,
            channel: None,
        }
    }
}

impl DctCodecOptions {
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_bits_per_block(mut self, bits_per_block: usize) -> Self {
        self.bits_per_block = bits_per_block;
        self
    }

    pub fn with_channel(mut self, channel: Option<u8>) -> Self {
        self.channel = channel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin < 1.0 {
            return Err(SteganoError::InvalidCodecOptions(format!(
                "DCT margin must be a finite number >= 1, got {}",
                self.margin
            )));
        }
        if !(1..=4).contains(&self.bits_per_block) {
            return Err(SteganoError::InvalidCodecOptions(format!(
                "DCT bits per block must be within 1..=4, got {}",
                self.bits_per_block
            )));
        }
        Ok(())
    }
}

pub const DEFAULT_XOR_KEY: &[u8] = b"stegalab";

/// Options for the XOR masked LSB encoding
#[derive(Debug, Clone)]
pub struct XorCodecOptions {
    /// Base key, masks the length header directly and the payload mixed with the length.
    pub key: Vec<u8>,
}

impl Default for XorCodecOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_XOR_KEY.to_vec(),
        }
    }
}

impl XorCodecOptions {
    pub fn with_key<K: AsRef<[u8]>>(mut self, key: K) -> Self {
        self.key = key.as_ref().to_vec();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(SteganoError::InvalidCodecOptions(
                "XOR key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
