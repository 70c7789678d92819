//! # Stegalab Core API
//!
//! Hides a text message in an image with one of four interchangeable methods and
//! scores how much the carrier suffered:
//! - [`Method::Lsb`] writes the message bits into the least significant bit of every sample
//! - [`Method::Palette`] writes them into the parity of palette indices of an indexed PNG
//! - [`Method::Dct`] writes them into mid frequency DCT coefficients of 8x8 blocks
//! - [`Method::Xor`] masks them with a repeating key before writing them like LSB
//!
//! Every method frames the message as a 32 bit big-endian bit length followed by the
//! UTF-8 bytes, see [`frame`].
//!
//! # Usage Examples
//!
//! ## Hide a message inside an image
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use stegalab_core::Method;
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.png");
//! RgbImage::from_pixel(64, 64, Rgb([90, 120, 200])).save(&carrier).unwrap();
//!
//! let report = stegalab_core::api::hide::prepare()
//!     .with_method(Method::Lsb)
//!     .with_message("Hello, World!")
//!     .with_image(&carrier)
//!     .with_output(temp_dir.path().join("image-with-secret.png"))
//!     .execute()
//!     .expect("Failed to hide message in image");
//!
//! let decoded = stegalab_core::api::unveil::prepare()
//!     .with_method(Method::Lsb)
//!     .from_secret_file(&report.output)
//!     .execute()
//!     .expect("Failed to unveil message from image");
//!
//! assert_eq!(decoded.message.as_str(), "Hello, World!");
//! ```
//!
//! ## Compare all methods
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let carrier = temp_dir.path().join("carrier.png");
//! RgbImage::from_fn(128, 128, |x, y| Rgb([x as u8, y as u8, 100])).save(&carrier).unwrap();
//!
//! let rows = stegalab_core::api::compare::prepare()
//!     .with_message("Hi")
//!     .with_image(&carrier)
//!     .execute()
//!     .expect("Failed to compare methods");
//!
//! for row in rows {
//!     let report = row.outcome.expect("every method fits this message");
//!     assert!(report.recovered_ok);
//! }
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod error;
pub mod frame;
pub mod media;
pub mod message;
pub mod quality;
pub mod result;

pub use crate::error::SteganoError;
pub use crate::frame::{frame, unframe, BitFrame};
pub use crate::media::image::{Codec, Decoded, EmbeddingPlan, Encoded, ImageCodec, Method};
pub use crate::media::{CarrierImage, CodecOptions, Persist};
pub use crate::message::Message;
pub use crate::quality::{evaluate, evaluate_files, QualityReport};
pub use crate::result::Result;
