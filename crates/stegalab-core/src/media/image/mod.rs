//! The four image codecs and the registry that picks one per [`Method`].

pub mod dct;
mod iterators;
pub mod lsb;
pub mod palette;
mod quantize;
pub mod xor;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use enum_dispatch::enum_dispatch;
use log::{debug, info};

pub use dct::DctCodec;
pub use lsb::LsbCodec;
pub use palette::{IndexedImage, PaletteCodec};
pub use quantize::{Rgb, Rgba};
pub use xor::XorCodec;

use crate::error::SteganoError;
use crate::frame::{BitFrame, HEADER_BITS};
use crate::media::{ensure_png_output, CarrierImage, CodecOptions, Persist};
use crate::message::Message;
use crate::result::Result;

/// The embedding methods, in the order a comparison run reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    #[default]
    Lsb,
    Palette,
    Dct,
    Xor,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Lsb, Method::Palette, Method::Dct, Method::Xor];

    /// display name, e.g. `DCT`
    pub fn name(&self) -> &'static str {
        match self {
            Method::Lsb => "LSB",
            Method::Palette => "Palette",
            Method::Dct => "DCT",
            Method::Xor => "XOR",
        }
    }

    /// lower case name, used on the command line and in file names
    pub fn slug(&self) -> &'static str {
        match self {
            Method::Lsb => "lsb",
            Method::Palette => "palette",
            Method::Dct => "dct",
            Method::Xor => "xor",
        }
    }

    /// builds the codec of this method from the matching options section
    pub fn codec(&self, options: &CodecOptions) -> Codec {
        match self {
            Method::Lsb => LsbCodec::new(options.lsb.clone()).into(),
            Method::Palette => PaletteCodec::new(options.palette.clone()).into(),
            Method::Dct => DctCodec::new(options.dct.clone()).into(),
            Method::Xor => XorCodec::new(options.xor.clone(), options.lsb.clone()).into(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SteganoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SteganoError::UnknownMethod(s.to_string()))
    }
}

/// How many bits a carrier offers to a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingPlan {
    pub method: Method,
    /// samples, pixels or blocks, depending on the method
    pub units: usize,
    pub bits_per_unit: usize,
}

impl EmbeddingPlan {
    pub fn capacity_bits(&self) -> usize {
        self.units * self.bits_per_unit
    }

    /// longest message in bytes that still fits, length header included
    pub fn max_message_bytes(&self) -> usize {
        self.capacity_bits().saturating_sub(HEADER_BITS) / 8
    }

    pub fn ensure_fits(&self, frame: &BitFrame) -> Result<()> {
        let required = frame.bit_len();
        let available = self.capacity_bits();
        debug!(
            "{}: {required} bits to embed, {available} bits available",
            self.method
        );
        if required > available {
            return Err(SteganoError::CapacityExceeded {
                required,
                available,
            });
        }
        Ok(())
    }
}

/// Outcome of a successful encode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Outcome of a successful decode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub message: Message,
    pub elapsed: Duration,
}

/// One embedding method, working on files.
///
/// `encode` always writes a lossless PNG to `output`; `decode` only reads.
#[enum_dispatch]
pub trait ImageCodec {
    fn method(&self) -> Method;

    /// capacity of the given carrier for this method
    fn plan(&self, carrier: &CarrierImage) -> Result<EmbeddingPlan>;

    fn encode(&self, input: &Path, message: &Message, output: &Path) -> Result<Encoded>;

    fn decode(&self, input: &Path) -> Result<Decoded>;
}

/// All codecs behind one type, see [`Method::codec`].
#[enum_dispatch(ImageCodec)]
#[derive(Debug, Clone)]
pub enum Codec {
    LsbCodec,
    PaletteCodec,
    DctCodec,
    XorCodec,
}

/// Codecs that hide bits in the samples of a [`CarrierImage`], in memory.
pub trait RasterCodec: ImageCodec {
    fn hide(&self, carrier: &mut CarrierImage, message: &Message) -> Result<()>;

    fn unveil(&self, carrier: &CarrierImage) -> Result<Message>;
}

pub(crate) fn encode_raster<C: RasterCodec>(
    codec: &C,
    input: &Path,
    message: &Message,
    output: &Path,
) -> Result<Encoded> {
    ensure_png_output(output)?;
    let start = Instant::now();
    let mut carrier = CarrierImage::from_file(input)?;
    codec.hide(&mut carrier, message)?;
    carrier.save_as(output)?;
    let elapsed = start.elapsed();
    info!(
        "{}: hid {} bytes in {input:?}, wrote {output:?} in {elapsed:?}",
        codec.method(),
        message.len()
    );

    Ok(Encoded {
        output: output.to_path_buf(),
        elapsed,
    })
}

pub(crate) fn decode_raster<C: RasterCodec>(codec: &C, input: &Path) -> Result<Decoded> {
    let start = Instant::now();
    let carrier = CarrierImage::from_file(input)?;
    let message = codec.unveil(&carrier)?;
    let elapsed = start.elapsed();
    info!(
        "{}: unveiled {} bytes from {input:?} in {elapsed:?}",
        codec.method(),
        message.len()
    );

    Ok(Decoded { message, elapsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::frame;

    #[test]
    fn should_parse_method_names_case_insensitive() {
        assert_eq!("lsb".parse::<Method>().unwrap(), Method::Lsb);
        assert_eq!("Palette".parse::<Method>().unwrap(), Method::Palette);
        assert_eq!("DCT".parse::<Method>().unwrap(), Method::Dct);
        assert_eq!(" xor ".parse::<Method>().unwrap(), Method::Xor);
        assert!(matches!(
            "f5".parse::<Method>(),
            Err(SteganoError::UnknownMethod(_))
        ));
    }

    #[test]
    fn should_build_the_codec_of_each_method() {
        let options = CodecOptions::default();
        for method in Method::ALL {
            assert_eq!(method.codec(&options).method(), method);
        }
    }

    #[test]
    fn plan_should_accept_a_frame_that_fills_it_exactly() {
        let plan = EmbeddingPlan {
            method: Method::Lsb,
            units: 72,
            bits_per_unit: 1,
        };
        let hello = frame(&Message::from("HELLO")).unwrap();
        assert!(plan.ensure_fits(&hello).is_ok());
        assert_eq!(plan.max_message_bytes(), 5);

        let smaller = EmbeddingPlan { units: 71, ..plan };
        match smaller.ensure_fits(&hello) {
            Err(SteganoError::CapacityExceeded {
                required: 72,
                available: 71,
            }) => (),
            other => panic!("expected capacity exceeded, got {other:?}"),
        }
    }
}
