use criterion::{criterion_group, criterion_main, Criterion};
use stegalab_core::quality::{psnr, ssim};
use stegalab_core::CarrierImage;

pub fn quality(c: &mut Criterion) {
    let samples: Vec<u8> = (0..256 * 256 * 3).map(|i: u32| (i * 31 % 251) as u8).collect();
    let original =
        CarrierImage::new(256, 256, 3, samples.clone()).expect("Carrier image is not valid.");
    let encoded = CarrierImage::new(256, 256, 3, samples.iter().map(|s| s ^ 1).collect())
        .expect("Carrier image is not valid.");

    c.bench_function("SSIM", |b| b.iter(|| ssim(&original, &encoded)));
    c.bench_function("PSNR", |b| b.iter(|| psnr(&original, &encoded)));
}

criterion_group!(benches, quality);
criterion_main!(benches);
