use std::path::Path;

use super::iterators::{usable_samples, SampleIter, SampleIterMut};
use super::{
    decode_raster, encode_raster, Decoded, Encoded, EmbeddingPlan, ImageCodec, Method, RasterCodec,
};
use crate::frame::{frame, unframe};
use crate::media::{CarrierImage, HideBit, LsbCodecOptions, UnveilBit};
use crate::message::Message;
use crate::result::Result;

/// Hides one frame bit in the least significant bit of every sample, in raster order.
#[derive(Debug, Clone, Default)]
pub struct LsbCodec {
    options: LsbCodecOptions,
}

impl LsbCodec {
    pub fn new(options: LsbCodecOptions) -> Self {
        Self { options }
    }
}

impl ImageCodec for LsbCodec {
    fn method(&self) -> Method {
        Method::Lsb
    }

    fn plan(&self, carrier: &CarrierImage) -> Result<EmbeddingPlan> {
        Ok(EmbeddingPlan {
            method: Method::Lsb,
            units: usable_samples(carrier, self.options.skip_alpha_channel),
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

impl RasterCodec for LsbCodec {
    fn hide(&self, carrier: &mut CarrierImage, message: &Message) -> Result<()> {
        let frame = frame(message)?;
        self.plan(carrier)?.ensure_fits(&frame)?;

        for (sample, bit) in
            SampleIterMut::new(carrier, self.options.skip_alpha_channel).zip(frame.bits())
        {
            sample.hide_bit(bit);
        }

        Ok(())
    }

    fn unveil(&self, carrier: &CarrierImage) -> Result<Message> {
        unframe(SampleIter::new(carrier, self.options.skip_alpha_channel).map(|s| s.unveil_bit()))
    }
}
