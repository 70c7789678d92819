use criterion::{criterion_group, criterion_main, Criterion};
use stegalab_core::media::image::{DctCodec, LsbCodec, RasterCodec, XorCodec};
use stegalab_core::{CarrierImage, Message};

fn carrier() -> CarrierImage {
    let samples = (0..256 * 256 * 3).map(|i: u32| (i * 31 % 251) as u8).collect();
    CarrierImage::new(256, 256, 3, samples).expect("Carrier image is not valid.")
}

pub fn image_encoding(c: &mut Criterion) {
    let secret_message = Message::from("Hello World!");

    c.bench_function("LSB Encoding", |b| {
        let mut plain_image = carrier();
        b.iter(|| {
            LsbCodec::default()
                .hide(&mut plain_image, &secret_message)
                .expect("Cannot hide secret message");
        })
    });

    c.bench_function("XOR Encoding", |b| {
        let mut plain_image = carrier();
        b.iter(|| {
            XorCodec::default()
                .hide(&mut plain_image, &secret_message)
                .expect("Cannot hide secret message");
        })
    });

    c.bench_function("DCT Encoding", |b| {
        let plain_image = carrier();
        b.iter(|| {
            let mut img = plain_image.clone();
            DctCodec::default()
                .hide(&mut img, &secret_message)
                .expect("Cannot hide secret message");
        })
    });
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
