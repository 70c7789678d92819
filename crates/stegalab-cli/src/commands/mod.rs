pub mod capacity;
pub mod compare;
pub mod evaluate;
pub mod hide;
pub mod unveil;

/// `n/a` for metrics that could not be computed
pub(crate) fn format_ssim(ssim: Option<f64>) -> String {
    ssim.map(|s| format!("{s:.4}")).unwrap_or_else(|| "n/a".to_string())
}

/// `inf` for identical images, `n/a` for metrics that could not be computed
pub(crate) fn format_psnr(psnr: Option<f64>) -> String {
    match psnr {
        Some(p) if p.is_infinite() => "inf".to_string(),
        Some(p) => format!("{p:.2}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_metrics() {
        assert_eq!(format_ssim(Some(0.987_654)), "0.9877");
        assert_eq!(format_ssim(None), "n/a");
        assert_eq!(format_psnr(Some(51.256)), "51.26");
        assert_eq!(format_psnr(Some(f64::INFINITY)), "inf");
        assert_eq!(format_psnr(None), "n/a");
    }
}
