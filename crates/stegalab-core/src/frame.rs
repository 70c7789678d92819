//! Wire form of a message, shared by all codecs.
//!
//! A frame is a 32 bit big-endian length field, holding the payload length in bits,
//! followed by the UTF-8 payload. Bits travel most significant first.
//!
//! ```text
//! | length in bits (u32, BE) | payload byte 0 | payload byte 1 | ...
//! ```
//!
//! There is no terminator, decoders stop after the declared payload and ignore
//! whatever the carrier holds behind it.

use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use byteorder::{BigEndian as ByteOrderBe, WriteBytesExt};

use crate::error::SteganoError;
use crate::message::Message;
use crate::result::Result;

/// Bits occupied by the length field in front of the payload.
pub const HEADER_BITS: usize = 32;

/// A framed message, ready to be spread over a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFrame {
    bytes: Vec<u8>,
}

impl BitFrame {
    /// total number of bits, header included
    pub fn bit_len(&self) -> usize {
        self.bytes.len() << 3
    }

    /// the bits in transmission order
    pub fn bits(&self) -> FrameBits<'_> {
        FrameBits::new(&self.bytes)
    }

    /// header and payload as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Iterates over bytes bit by bit, most significant bit first.
pub struct FrameBits<'a> {
    reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    remaining: usize,
}

impl<'a> FrameBits<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: BitReader::endian(Cursor::new(bytes), BigEndian),
            remaining: bytes.len() << 3,
        }
    }
}

impl Iterator for FrameBits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.reader.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FrameBits<'_> {}

/// Frames a message, fails only if its bit length overflows the length field.
pub fn frame(message: &Message) -> Result<BitFrame> {
    let payload = message.as_bytes();
    let bit_len = u32::try_from(payload.len())
        .ok()
        .and_then(|len| len.checked_mul(8))
        .ok_or(SteganoError::MessageTooLarge(payload.len()))?;

    let mut bytes = Vec::with_capacity(payload.len() + HEADER_BITS / 8);
    bytes.write_u32::<ByteOrderBe>(bit_len)?;
    bytes.extend_from_slice(payload);

    Ok(BitFrame { bytes })
}

/// Reads the length header from `bits`, then exactly the declared payload bits.
///
/// Bits behind the payload are never consumed.
pub fn unframe<I>(bits: I) -> Result<Message>
where
    I: IntoIterator<Item = bool>,
{
    let mut bits = bits.into_iter();

    let (declared, header_bits) = bits
        .by_ref()
        .take(HEADER_BITS)
        .fold((0u32, 0usize), |(value, n), bit| {
            ((value << 1) | u32::from(bit), n + 1)
        });
    if header_bits < HEADER_BITS {
        return Err(SteganoError::CorruptFrame(format!(
            "only {header_bits} bits available, the length header needs {HEADER_BITS}"
        )));
    }
    if declared % 8 != 0 {
        return Err(SteganoError::CorruptFrame(format!(
            "declared payload of {declared} bits is not a whole number of bytes"
        )));
    }

    let declared = declared as usize;
    // a corrupt header may declare far more than the carrier holds
    let capacity = (declared / 8).min(bits.size_hint().0 / 8);
    let mut payload = BitWriter::endian(Vec::with_capacity(capacity), BigEndian);
    let mut read = 0usize;
    for bit in bits.take(declared) {
        payload.write_bit(bit)?;
        read += 1;
    }
    if read < declared {
        return Err(SteganoError::CorruptFrame(format!(
            "declared payload of {declared} bits but only {read} bits available"
        )));
    }

    Message::from_utf8(payload.into_writer())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(bytes: &[u8]) -> Vec<bool> {
        FrameBits::new(bytes).collect()
    }

    #[test]
    fn should_frame_hello_into_72_bits() {
        let frame = frame(&Message::from("HELLO")).unwrap();

        assert_eq!(frame.bit_len(), 72);
        assert_eq!(&frame.as_bytes()[..4], &[0, 0, 0, 40]);
        assert_eq!(&frame.as_bytes()[4..], b"HELLO");
    }

    #[test]
    fn should_emit_most_significant_bit_first() {
        let bits = bits_of(&[0b1000_0001, 0b0100_0000]);

        assert_eq!(bits.len(), 16);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[7]);
        assert!(bits[9]);
    }

    #[test]
    fn should_unframe_what_was_framed() {
        for text in ["", "HI", "Hello, World!", "ünïcödé ✓ 🦀"] {
            let message = Message::from(text);
            let frame = frame(&message).unwrap();
            assert_eq!(unframe(frame.bits()).unwrap(), message);
        }
    }

    #[test]
    fn should_ignore_trailing_bits() {
        let frame = frame(&Message::from("HI")).unwrap();
        let noise = [true, false, true, true, false].into_iter().cycle().take(1000);

        assert_eq!(unframe(frame.bits().chain(noise)).unwrap().as_str(), "HI");
    }

    #[test]
    fn should_reject_a_short_header() {
        match unframe(vec![false; 31]) {
            Err(SteganoError::CorruptFrame(reason)) => assert!(reason.contains("31")),
            other => panic!("expected a corrupt frame, got {other:?}"),
        }
    }

    #[test]
    fn should_reject_a_payload_shorter_than_declared() {
        let frame = frame(&Message::from("HELLO")).unwrap();
        let truncated = frame.bits().take(frame.bit_len() - 1);

        assert!(matches!(
            unframe(truncated),
            Err(SteganoError::CorruptFrame(_))
        ));
    }

    #[test]
    fn should_reject_lengths_that_are_not_byte_aligned() {
        let mut bits = bits_of(&[0, 0, 0, 3]);
        bits.extend([true, true, true]);

        assert!(matches!(unframe(bits), Err(SteganoError::CorruptFrame(_))));
    }

    #[test]
    fn should_reject_invalid_text() {
        let mut bits = bits_of(&[0, 0, 0, 8]);
        bits.extend(bits_of(&[0xff]));

        assert!(matches!(unframe(bits), Err(SteganoError::CorruptFrame(_))));
    }
}
