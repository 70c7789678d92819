use criterion::{criterion_group, criterion_main, Criterion};
use stegalab_core::media::image::{DctCodec, LsbCodec, RasterCodec};
use stegalab_core::{CarrierImage, Message};

fn secret_image<C: RasterCodec>(codec: &C) -> CarrierImage {
    let samples = (0..256 * 256 * 3).map(|i: u32| (i * 31 % 251) as u8).collect();
    let mut img = CarrierImage::new(256, 256, 3, samples).expect("Carrier image is not valid.");
    codec
        .hide(&mut img, &Message::from("Hello World!"))
        .expect("Cannot hide secret message");
    img
}

pub fn image_decoding(c: &mut Criterion) {
    c.bench_function("LSB Decoding", |b| {
        let codec = LsbCodec::default();
        let img = secret_image(&codec);
        b.iter(|| codec.unveil(&img).expect("Failed to unveil message"))
    });

    c.bench_function("DCT Decoding", |b| {
        let codec = DctCodec::default();
        let img = secret_image(&codec);
        b.iter(|| codec.unveil(&img).expect("Failed to unveil message"))
    });
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
