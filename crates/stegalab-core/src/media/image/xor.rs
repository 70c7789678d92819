//! XOR masked LSB embedding.
//!
//! This is a reversible scrambling, not a cipher: the frame is XORed with a repeating
//! key before its bits go into the sample LSBs. The 32 header bits use the base key,
//! the payload uses the base key mixed with the big-endian length bytes, so the decoder
//! can rebuild the payload key as soon as it has unmasked the header.

use std::path::Path;

use super::iterators::{usable_samples, SampleIter, SampleIterMut};
use super::{
    decode_raster, encode_raster, Decoded, Encoded, EmbeddingPlan, ImageCodec, Method, RasterCodec,
};
use crate::error::SteganoError;
use crate::frame::{frame, unframe, FrameBits, HEADER_BITS};
use crate::media::{CarrierImage, HideBit, LsbCodecOptions, UnveilBit, XorCodecOptions};
use crate::message::Message;
use crate::result::Result;

const HEADER_BYTES: usize = HEADER_BITS / 8;

#[derive(Debug, Clone, Default)]
pub struct XorCodec {
    options: XorCodecOptions,
    lsb: LsbCodecOptions,
}

impl XorCodec {
    pub fn new(options: XorCodecOptions, lsb: LsbCodecOptions) -> Self {
        Self { options, lsb }
    }

    /// Repeating payload key, `lcm(key, 4)` bytes long.
    fn payload_key(&self, length_be: [u8; HEADER_BYTES]) -> Vec<u8> {
        let base = &self.options.key;
        let period = lcm(base.len(), HEADER_BYTES);

        (0..period)
            .map(|i| base[i % base.len()] ^ length_be[i % HEADER_BYTES])
            .collect()
    }

    fn header_key(&self, i: usize) -> u8 {
        self.options.key[i % self.options.key.len()]
    }

    /// the frame bytes as they travel through the carrier
    fn mask(&self, frame_bytes: &[u8]) -> Vec<u8> {
        let (header, payload) = frame_bytes.split_at(HEADER_BYTES);
        let mut length_be = [0u8; HEADER_BYTES];
        length_be.copy_from_slice(header);
        let key = self.payload_key(length_be);

        header
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ self.header_key(i))
            .chain(
                payload
                    .iter()
                    .zip(key.iter().cycle())
                    .map(|(b, k)| b ^ k),
            )
            .collect()
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

/// bit `j` of a repeating key, most significant first
#[inline]
fn key_bit(key: &[u8], j: usize) -> bool {
    (key[(j / 8) % key.len()] >> (7 - j % 8)) & 1 == 1
}

impl ImageCodec for XorCodec {
    fn method(&self) -> Method {
        Method::Xor
    }

    fn plan(&self, carrier: &CarrierImage) -> Result<EmbeddingPlan> {
        Ok(EmbeddingPlan {
            method: Method::Xor,
            units: usable_samples(carrier, self.lsb.skip_alpha_channel),
            bits_per_unit: 1,
        })
    }

    fn encode(&self, input: &Path, message: &Message, output: &Path) -> Result<Encoded> {
        encode_raster(self, input, message, output)
    }

    fn decode(&self, input: &Path) -> Result<Decoded> {
        decode_raster(self, input)
    }
}

impl RasterCodec for XorCodec {
    fn hide(&self, carrier: &mut CarrierImage, message: &Message) -> Result<()> {
        self.options.validate()?;
        let frame = frame(message)?;
        self.plan(carrier)?.ensure_fits(&frame)?;

        let masked = self.mask(frame.as_bytes());
        for (sample, bit) in
            SampleIterMut::new(carrier, self.lsb.skip_alpha_channel).zip(FrameBits::new(&masked))
        {
            sample.hide_bit(bit);
        }

        Ok(())
    }

    fn unveil(&self, carrier: &CarrierImage) -> Result<Message> {
        self.options.validate()?;
        let mut bits =
            SampleIter::new(carrier, self.lsb.skip_alpha_channel).map(|s| s.unveil_bit());

        let mut length_be = [0u8; HEADER_BYTES];
        let mut header_bits = 0;
        for (j, bit) in bits.by_ref().take(HEADER_BITS).enumerate() {
            let bit = bit ^ key_bit(&self.options.key, j);
            length_be[j / 8] |= u8::from(bit) << (7 - j % 8);
            header_bits += 1;
        }
        if header_bits < HEADER_BITS {
            return Err(SteganoError::CorruptFrame(format!(
                "only {header_bits} bits available, the length header needs {HEADER_BITS}"
            )));
        }

        let key = self.payload_key(length_be);
        let payload = bits.enumerate().map(|(j, bit)| bit ^ key_bit(&key, j));

        unframe(FrameBits::new(&length_be).chain(payload))
    }
}
