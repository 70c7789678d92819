//! Frequency domain embedding in complete 8x8 blocks of one channel.
//!
//! Bits are carried by mid frequency coefficients with quantization index modulation:
//! a coefficient `c` reads as the parity of `round(c / margin)`. After writing, every
//! block is rounded to 8 bit samples and read back with the decoder's own routine, so
//! a block is only accepted once its bits survive the trip through the pixel domain.

mod transform;

use std::path::Path;

use log::debug;

use self::transform::{forward, inverse, BLOCK, BLOCK_LEN};
use super::{
    decode_raster, encode_raster, Decoded, Encoded, EmbeddingPlan, ImageCodec, Method, RasterCodec,
};
use crate::error::SteganoError;
use crate::frame::{frame, unframe};
use crate::media::{CarrierImage, DctCodecOptions};
use crate::message::Message;
use crate::result::Result;

/// `(row, column)` frequencies in order of use
const POSITIONS: [(usize, usize); 4] = [(4, 3), (3, 4), (2, 5), (5, 2)];

/// write, round and read back attempts per block
const MAX_ATTEMPTS: usize = 8;

/// every further attempt pulls the block this much closer to mid gray
const SHRINK_STEP: f64 = 0.08;

#[derive(Debug, Clone, Default)]
pub struct DctCodec {
    options: DctCodecOptions,
}

impl DctCodec {
    pub fn new(options: DctCodecOptions) -> Self {
        Self { options }
    }

    /// the designated channel, blue for color carriers
    fn channel(&self, carrier: &CarrierImage) -> Result<u8> {
        let channel = self
            .options
            .channel
            .unwrap_or(if carrier.channels() >= 3 { 2 } else { 0 });
        if channel >= carrier.channels() {
            return Err(SteganoError::InvalidCodecOptions(format!(
                "channel {channel} does not exist in a carrier with {} channels",
                carrier.channels()
            )));
        }
        Ok(channel)
    }

    fn positions(&self) -> &'static [(usize, usize)] {
        &POSITIONS[..self.options.bits_per_block]
    }

    /// Reads the bits of one block, one per position.
    fn read_bits(&self, coeffs: &[f64; BLOCK_LEN], count: usize) -> Vec<bool> {
        self.positions()
            .iter()
            .take(count)
            .map(|(v, u)| qim_bit(coeffs[v * BLOCK + u], self.options.margin))
            .collect()
    }

    /// Writes `bits` into `block`, or fails if no attempt survives rounding.
    fn embed_block(
        &self,
        block: &mut [u8; BLOCK_LEN],
        bits: &[bool],
        at: (u32, u32),
    ) -> Result<()> {
        for attempt in 0..MAX_ATTEMPTS {
            let shrink = 1.0 - SHRINK_STEP * attempt as f64;
            let mut pixels = [0.0f64; BLOCK_LEN];
            for (p, s) in pixels.iter_mut().zip(block.iter()) {
                *p = 128.0 + (*s as f64 - 128.0) * shrink;
            }

            let mut coeffs = forward(&pixels);
            for ((v, u), bit) in self.positions().iter().zip(bits) {
                let c = &mut coeffs[v * BLOCK + u];
                *c = qim_embed(*c, *bit, self.options.margin);
            }

            let mut candidate = [0u8; BLOCK_LEN];
            for (s, p) in candidate.iter_mut().zip(inverse(&coeffs).iter()) {
                *s = p.round().clamp(0.0, 255.0) as u8;
            }

            if self.read_bits(&forward(&to_f64(&candidate)), bits.len()) == bits {
                if attempt > 0 {
                    debug!("block {at:?} needed {} attempts", attempt + 1);
                }
                *block = candidate;
                return Ok(());
            }
        }

        Err(SteganoError::UnsupportedCarrier(format!(
            "block {at:?} cannot hold {} bits after {MAX_ATTEMPTS} attempts",
            bits.len()
        )))
    }
}

/// parity of the lattice point nearest to `c`
#[inline]
fn qim_bit(c: f64, margin: f64) -> bool {
    ((c / margin).round() as i64).rem_euclid(2) == 1
}

/// moves `c` onto the nearest lattice point whose parity is `bit`
fn qim_embed(c: f64, bit: bool, margin: f64) -> f64 {
    let scaled = c / margin;
    let k = scaled.round() as i64;
    let k = if (k.rem_euclid(2) == 1) == bit {
        k
    } else if scaled >= k as f64 {
        k + 1
    } else {
        k - 1
    };
    k as f64 * margin
}

fn to_f64(block: &[u8; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let mut pixels = [0.0f64; BLOCK_LEN];
    for (p, s) in pixels.iter_mut().zip(block.iter()) {
        *p = *s as f64;
    }
    pixels
}

/// Complete blocks in block-row-major order, as `(bx, by)`.
fn blocks(carrier: &CarrierImage) -> impl Iterator<Item = (u32, u32)> {
    let (cols, rows) = (carrier.width() / BLOCK as u32, carrier.height() / BLOCK as u32);
    (0..rows).flat_map(move |by| (0..cols).map(move |bx| (bx, by)))
}

/// pixel position of sample `i` of block `(bx, by)`
#[inline]
fn block_pixel((bx, by): (u32, u32), i: usize) -> (u32, u32) {
    (
        bx * BLOCK as u32 + (i % BLOCK) as u32,
        by * BLOCK as u32 + (i / BLOCK) as u32,
    )
}

fn read_block(carrier: &CarrierImage, channel: u8, at: (u32, u32)) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    for (i, s) in block.iter_mut().enumerate() {
        let (x, y) = block_pixel(at, i);
        *s = carrier.sample(x, y, channel);
    }
    block
}

fn write_block(
    carrier: &mut CarrierImage,
    channel: u8,
    at: (u32, u32),
    block: &[u8; BLOCK_LEN],
) {
    for (i, s) in block.iter().enumerate() {
        let (x, y) = block_pixel(at, i);
        carrier.set_sample(x, y, channel, *s);
    }
}

impl ImageCodec for DctCodec {
    fn method(&self) -> Method {
        Method::Dct
    }

    fn plan(&self, carrier: &CarrierImage) -> Result<EmbeddingPlan> {
        self.options.validate()?;
        Ok(EmbeddingPlan {
            method: Method::Dct,
            units: blocks(carrier).count(),
            bits_per_unit: self.options.bits_per_block,
        })
    }

    fn encode(&self, input: &Path, message: &Message, output: &Path) -> Result<Encoded> {
        encode_raster(self, input, message, output)
    }

    fn decode(&self, input: &Path) -> Result<Decoded> {
        decode_raster(self, input)
    }
}

impl RasterCodec for DctCodec {
    fn hide(&self, carrier: &mut CarrierImage, message: &Message) -> Result<()> {
        let channel = self.channel(carrier)?;
        let frame = frame(message)?;
        self.plan(carrier)?.ensure_fits(&frame)?;

        let bits: Vec<bool> = frame.bits().collect();
        let all: Vec<(u32, u32)> = blocks(carrier).collect();
        for (at, chunk) in all.into_iter().zip(bits.chunks(self.options.bits_per_block)) {
            let mut block = read_block(carrier, channel, at);
            self.embed_block(&mut block, chunk, at)?;
            write_block(carrier, channel, at, &block);
        }

        Ok(())
    }

    fn unveil(&self, carrier: &CarrierImage) -> Result<Message> {
        self.options.validate()?;
        let channel = self.channel(carrier)?;
        let per_block = self.options.bits_per_block;

        unframe(blocks(carrier).flat_map(|at| {
            let coeffs = forward(&to_f64(&read_block(carrier, channel, at)));
            self.read_bits(&coeffs, per_block)
        }))
    }
}
