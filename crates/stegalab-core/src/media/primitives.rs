/// Writes one bit into the least significant bit of a sample, leaving all other bits alone
pub trait HideBit {
    fn hide_bit(self, bit: bool);
}

impl HideBit for &mut u8 {
    #[inline]
    fn hide_bit(self, bit: bool) {
        *self = (*self & (u8::MAX - 1)) | u8::from(bit);
    }
}

/// Reads the bit that `HideBit` wrote
pub trait UnveilBit {
    fn unveil_bit(&self) -> bool;
}

impl UnveilBit for u8 {
    #[inline]
    fn unveil_bit(&self) -> bool {
        self & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_only_touch_the_lowest_bit() {
        for value in [0u8, 1, 2, 127, 128, 254, 255] {
            let mut sample = value;
            sample.hide_bit(true);
            assert_eq!(sample, value | 1);
            assert!(sample.unveil_bit());

            let mut sample = value;
            sample.hide_bit(false);
            assert_eq!(sample, value & 0xfe);
            assert!(!sample.unveil_bit());
        }
    }
}
