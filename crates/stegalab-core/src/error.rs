use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteganoError {
    /// The framed message needs more bits than the carrier offers for the chosen method
    #[error("Capacity Error: the message needs {required} bits but the carrier only holds {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// The recovered bits do not form a valid frame, e.g. a declared length beyond the carrier
    #[error("Corrupt frame: {0}")]
    CorruptFrame(String),

    /// Two images with different dimensions or channel counts were compared
    #[error("Shape mismatch: {left:?} vs {right:?} (width, height, channels)")]
    ShapeMismatch {
        left: (u32, u32, u8),
        right: (u32, u32, u8),
    },

    /// The carrier fails a method specific precondition, e.g. too few palette colors
    #[error("Unsupported carrier: {0}")]
    UnsupportedCarrier(String),

    /// The message length in bits does not fit into the 32 bit length field
    #[error("Message of {0} bytes is too large to be framed")]
    MessageTooLarge(usize),

    /// Represents an unsupported carrier media. For example, a text file
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents an unknown method name
    #[error("Unknown method `{0}`, expected one of lsb, palette, dct, xor")]
    UnknownMethod(String),

    /// Represents codec options that cannot work, e.g. an empty XOR key
    #[error("Invalid codec options: {0}")]
    InvalidCodecOptions(String),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target set")]
    TargetNotSet,

    #[error("API Error: Missing message")]
    MissingMessage,
}

impl SteganoError {
    /// true for the failures a codec reports about the carrier or the message,
    /// false for I/O faults and API misuse
    pub fn is_codec_failure(&self) -> bool {
        matches!(
            self,
            SteganoError::CapacityExceeded { .. }
                | SteganoError::CorruptFrame(_)
                | SteganoError::ShapeMismatch { .. }
                | SteganoError::UnsupportedCarrier(_)
                | SteganoError::MessageTooLarge(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_tell_codec_failures_from_io_faults() {
        assert!(SteganoError::CorruptFrame("short".into()).is_codec_failure());
        assert!(SteganoError::CapacityExceeded {
            required: 72,
            available: 64
        }
        .is_codec_failure());
        assert!(!SteganoError::InvalidImageMedia.is_codec_failure());
        assert!(!SteganoError::ReadError {
            source: std::io::Error::from(std::io::ErrorKind::NotFound)
        }
        .is_codec_failure());
    }

    #[test]
    fn should_render_capacity_numbers() {
        let e = SteganoError::CapacityExceeded {
            required: 72,
            available: 64,
        };
        assert_eq!(
            e.to_string(),
            "Capacity Error: the message needs 72 bits but the carrier only holds 64 bits"
        );
    }
}
