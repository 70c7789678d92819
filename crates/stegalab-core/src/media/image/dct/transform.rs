//! Orthonormal 8x8 DCT-II and its inverse, on level shifted samples.

use std::sync::OnceLock;

pub(crate) const BLOCK: usize = 8;
pub(crate) const BLOCK_LEN: usize = BLOCK * BLOCK;

/// `COSINE[u][x] = C(u) * cos((2x + 1) * u * PI / 16)` with `C(0) = 1/sqrt(8)`, `C(u > 0) = 1/2`
static COSINE: OnceLock<[[f64; BLOCK]; BLOCK]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; BLOCK]; BLOCK] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; BLOCK]; BLOCK];
        for (u, row) in table.iter_mut().enumerate() {
            let norm = if u == 0 { (1.0 / BLOCK as f64).sqrt() } else { 0.5 };
            for (x, c) in row.iter_mut().enumerate() {
                *c = norm * ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

/// Pixels (0..=255, row-major) to coefficients, `coeffs[v * 8 + u]` for row frequency `v`.
pub(crate) fn forward(pixels: &[f64; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let cos = cosine_table();

    // rows
    let mut temp = [0.0f64; BLOCK_LEN];
    for row in 0..BLOCK {
        for u in 0..BLOCK {
            temp[row * BLOCK + u] = (0..BLOCK)
                .map(|x| (pixels[row * BLOCK + x] - 128.0) * cos[u][x])
                .sum();
        }
    }

    // columns
    let mut coeffs = [0.0f64; BLOCK_LEN];
    for col in 0..BLOCK {
        for v in 0..BLOCK {
            coeffs[v * BLOCK + col] = (0..BLOCK).map(|y| temp[y * BLOCK + col] * cos[v][y]).sum();
        }
    }
    coeffs
}

/// Coefficients back to pixels, not rounded nor clamped.
pub(crate) fn inverse(coeffs: &[f64; BLOCK_LEN]) -> [f64; BLOCK_LEN] {
    let cos = cosine_table();

    // columns
    let mut temp = [0.0f64; BLOCK_LEN];
    for col in 0..BLOCK {
        for y in 0..BLOCK {
            temp[y * BLOCK + col] = (0..BLOCK).map(|v| coeffs[v * BLOCK + col] * cos[v][y]).sum();
        }
    }

    // rows
    let mut pixels = [0.0f64; BLOCK_LEN];
    for row in 0..BLOCK {
        for x in 0..BLOCK {
            pixels[row * BLOCK + x] = (0..BLOCK)
                .map(|u| temp[row * BLOCK + u] * cos[u][x])
                .sum::<f64>()
                + 128.0;
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_invert_the_forward_transform() {
        let mut pixels = [0.0f64; BLOCK_LEN];
        for (i, p) in pixels.iter_mut().enumerate() {
            *p = ((i * 37) % 256) as f64;
        }

        let back = inverse(&forward(&pixels));

        for (a, b) in pixels.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn flat_block_should_only_have_a_dc_coefficient() {
        let coeffs = forward(&[200.0; BLOCK_LEN]);

        assert!((coeffs[0] - 72.0 * 8.0).abs() < 1e-9);
        assert!(coeffs[1..].iter().all(|c| c.abs() < 1e-9));
    }

    #[test]
    fn should_preserve_energy() {
        let mut pixels = [128.0f64; BLOCK_LEN];
        pixels[9] = 228.0;
        pixels[50] = 28.0;

        let energy: f64 = forward(&pixels).iter().map(|c| c * c).sum();

        assert!((energy - 20000.0).abs() < 1e-6);
    }
}
