use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use stegalab_core::media::{DctCodecOptions, LsbCodecOptions, XorCodecOptions};
use stegalab_core::{evaluate_files, CodecOptions, ImageCodec, Message, Method, SteganoError};
use tempfile::{tempdir, TempDir};

fn save(dir: &TempDir, name: &str, img: DynamicImage) -> PathBuf {
    let path = dir.path().join(name);
    img.save(&path).expect("Failed to write carrier image");
    path
}

fn gradient_rgb(dir: &TempDir) -> PathBuf {
    save(
        dir,
        "gradient.png",
        DynamicImage::ImageRgb8(RgbImage::from_fn(192, 128, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, ((x * y) % 256) as u8])
        })),
    )
}

fn round_trip(method: Method, options: &CodecOptions, input: &Path, message: &str) -> Message {
    let codec = method.codec(options);
    let output = input.with_file_name(format!("out_{}.png", method.slug()));

    let encoded = codec
        .encode(input, &Message::from(message), &output)
        .unwrap_or_else(|e| panic!("{method} failed to encode: {e}"));
    assert_eq!(encoded.output, output);

    codec
        .decode(&encoded.output)
        .unwrap_or_else(|e| panic!("{method} failed to decode: {e}"))
        .message
}

#[test]
fn every_method_should_recover_the_message() {
    let dir = tempdir().unwrap();
    let input = gradient_rgb(&dir);
    let options = CodecOptions::default();

    for method in Method::ALL {
        for message in ["a", "Hello, World!", "grüße 🦀 ünïcödé"] {
            assert_eq!(round_trip(method, &options, &input, message).as_str(), message);
        }
    }
}

#[test]
fn every_method_should_handle_gray_and_rgba_carriers() {
    let dir = tempdir().unwrap();
    let gray = save(
        &dir,
        "gray.png",
        DynamicImage::ImageLuma8(GrayImage::from_fn(80, 80, |x, y| Luma([(x * 3 + y) as u8]))),
    );
    let rgba = save(
        &dir,
        "rgba.png",
        DynamicImage::ImageRgba8(RgbaImage::from_fn(80, 80, |x, y| {
            Rgba([(x * 3) as u8, (y * 3) as u8, 60, 200])
        })),
    );
    let options = CodecOptions::default();

    for input in [&gray, &rgba] {
        for method in Method::ALL {
            assert_eq!(round_trip(method, &options, input, "layout").as_str(), "layout");
        }
    }
}

#[test]
fn non_png_carriers_should_be_accepted_and_written_as_png() {
    let dir = tempdir().unwrap();
    let bmp = save(
        &dir,
        "carrier.bmp",
        DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
            Rgb([x as u8 * 4, y as u8 * 4, 7])
        })),
    );

    assert_eq!(round_trip(Method::Lsb, &CodecOptions::default(), &bmp, "bmp").as_str(), "bmp");
    assert_eq!(
        round_trip(Method::Palette, &CodecOptions::default(), &bmp, "bmp").as_str(),
        "bmp"
    );
}

#[test]
fn outputs_not_named_png_should_be_refused_before_writing() {
    let dir = tempdir().unwrap();
    let input = gradient_rgb(&dir);

    for name in ["secret.bmp", "secret.jpg", "secret"] {
        let output = dir.path().join(name);
        for method in Method::ALL {
            match method
                .codec(&CodecOptions::default())
                .encode(&input, &Message::from("png only"), &output)
            {
                Err(SteganoError::UnsupportedMedia) => (),
                other => panic!("{method} wrote {name}: {other:?}"),
            }
        }
        assert!(!output.exists());
    }
}

#[test]
fn options_should_be_honoured_by_both_sides() {
    let dir = tempdir().unwrap();
    let input = gradient_rgb(&dir);
    let options = CodecOptions::default()
        .with_lsb(LsbCodecOptions {
            skip_alpha_channel: true,
        })
        .with_dct(
            DctCodecOptions::default()
                .with_margin(32.0)
                .with_bits_per_block(3)
                .with_channel(Some(1)),
        )
        .with_xor(XorCodecOptions::default().with_key("correct horse battery staple"));

    for method in Method::ALL {
        assert_eq!(round_trip(method, &options, &input, "options").as_str(), "options");
    }
}

#[test]
fn encoded_images_should_stay_close_to_the_carrier() {
    let dir = tempdir().unwrap();
    let input = gradient_rgb(&dir);
    let options = CodecOptions::default();

    for method in [Method::Lsb, Method::Xor, Method::Dct] {
        let output = dir.path().join(format!("close_{}.png", method.slug()));
        method
            .codec(&options)
            .encode(&input, &Message::from("quality"), &output)
            .unwrap();

        let report = evaluate_files(&input, &output);
        assert!(report.ssim.unwrap() > 0.9, "{method}: {report:?}");
        assert!(report.psnr.unwrap() > 30.0, "{method}: {report:?}");
    }
}

#[test]
fn unsupported_files_should_be_refused() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "not an image").unwrap();

    for method in Method::ALL {
        let codec = method.codec(&CodecOptions::default());
        assert!(matches!(
            codec.encode(&text, &Message::from("x"), &dir.path().join("x.png")),
            Err(SteganoError::UnsupportedMedia)
        ));
        assert!(matches!(codec.decode(&text), Err(SteganoError::UnsupportedMedia)));
    }
}
